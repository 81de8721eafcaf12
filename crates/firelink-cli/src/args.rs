//! CLI argument definitions using clap
//!
//! - firelink get users/ada                  # Read a value
//! - firelink set users/ada '{"age":36}'     # Replace a value
//! - firelink --email a@b.com --password pw get private/notes

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "firelink")]
#[command(about = "Firebase Auth and Realtime Database from the command line")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON); FIREBASE_* variables override it
    #[arg(long = "config", value_name = "FILE", env = "FIRELINK_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Sign in with this email before running the command
    #[arg(long, env = "FIREBASE_EMAIL", requires = "password")]
    pub email: Option<String>,

    /// Password for --email
    #[arg(long, env = "FIREBASE_PASSWORD", hide_env_values = true, requires = "email")]
    pub password: Option<String>,

    /// Sign in by exchanging a refresh token instead of a password
    #[arg(
        long,
        env = "FIREBASE_REFRESH_TOKEN",
        hide_env_values = true,
        conflicts_with = "email"
    )]
    pub refresh_token: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the value stored at PATH
    Get { path: String },

    /// Replace the value at PATH with JSON
    Set { path: String, json: String },

    /// Merge the JSON object into the value at PATH
    Update { path: String, json: String },

    /// Delete the value at PATH
    Delete { path: String },

    /// Print the fully-qualified URL of PATH
    Url { path: String },

    /// Create an account (does not sign in)
    SignUp { email: String, password: String },

    /// Send a password reset email
    ResetPassword { email: String },

    /// Sign in and print the session
    Whoami,
}

impl Cli {
    /// Whether any sign-in flag was given
    pub fn wants_sign_in(&self) -> bool {
        self.email.is_some() || self.refresh_token.is_some()
    }
}
