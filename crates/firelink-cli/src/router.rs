//! Command routing logic

use anyhow::Result;
use firelink_sdk::FirebaseApp;

use crate::args::{Cli, Commands};
use crate::commands::{self, Outcome};

/// Route CLI commands to their handlers
pub async fn route(cli: Cli) -> Result<Outcome> {
    let app = FirebaseApp::from_sources(cli.config_file.as_deref())?;

    if cli.wants_sign_in() && !commands::auth::sign_in(&app, &cli).await? {
        eprintln!("sign-in rejected");
        return Ok(Outcome::Rejected);
    }

    match cli.command {
        Commands::Get { path } => commands::data::get(&app, &path, cli.pretty).await,
        Commands::Set { path, json } => commands::data::set(&app, &path, &json).await,
        Commands::Update { path, json } => commands::data::update(&app, &path, &json).await,
        Commands::Delete { path } => commands::data::delete(&app, &path).await,
        Commands::Url { path } => commands::data::url(&app, &path),
        Commands::SignUp { email, password } => {
            commands::auth::sign_up(&app, &email, &password).await
        }
        Commands::ResetPassword { email } => commands::auth::reset_password(&app, &email).await,
        Commands::Whoami => commands::auth::whoami(&app),
    }
}
