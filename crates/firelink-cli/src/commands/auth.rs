//! Account commands

use anyhow::{Context, Result};
use firelink_sdk::FirebaseApp;
use tracing::info;

use super::Outcome;
use crate::args::Cli;

/// Sign in with whichever credentials were passed on the command line.
///
/// Returns `Ok(true)` when no sign-in was requested.
pub async fn sign_in(app: &FirebaseApp, cli: &Cli) -> Result<bool> {
    if let Some(token) = cli.refresh_token.as_deref() {
        return app
            .auth()
            .sign_in_with_token(token)
            .await
            .context("refresh token exchange failed");
    }

    match (cli.email.as_deref(), cli.password.as_deref()) {
        (Some(email), Some(password)) => {
            let accepted = app
                .auth()
                .sign_in_with_password(email, password)
                .await
                .context("password sign-in failed")?;
            if accepted {
                info!(email, "Signed in");
            }
            Ok(accepted)
        }
        _ => Ok(true),
    }
}

/// Create an account and print the returned session
pub async fn sign_up(app: &FirebaseApp, email: &str, password: &str) -> Result<Outcome> {
    match app.auth().sign_up(email, password).await? {
        Some(user) => {
            println!("{user}");
            Ok(Outcome::Done)
        }
        None => {
            eprintln!("sign-up rejected");
            Ok(Outcome::Rejected)
        }
    }
}

pub async fn reset_password(app: &FirebaseApp, email: &str) -> Result<Outcome> {
    let sent = app.auth().send_password_reset_email(email).await?;
    if sent {
        println!("password reset email sent to {email}");
    } else {
        eprintln!("password reset rejected");
    }
    Ok(Outcome::from_accepted(sent))
}

/// Print the current session, if any
pub fn whoami(app: &FirebaseApp) -> Result<Outcome> {
    match app.current_user() {
        Some(user) => {
            println!("{user}");
            Ok(Outcome::Done)
        }
        None => {
            eprintln!("not signed in (pass --email/--password or --refresh-token)");
            Ok(Outcome::Rejected)
        }
    }
}
