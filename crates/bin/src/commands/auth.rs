//! Login, status, and logout.

use cardfolio::Client;

use super::{CmdResult, prompt};
use crate::cli::LoginArgs;

pub async fn login(client: &Client, args: &LoginArgs) -> CmdResult {
    if let Some(session) = client.session().await {
        println!("Already logged in as {}.", session.email);
        return Ok(());
    }

    client.request_code(&args.email).await?;
    println!("A 6-digit code was sent to {}.", args.email);

    loop {
        let Some(code) = prompt("Code: ").await? else {
            client.cancel_login().await?;
            println!("Login cancelled.");
            return Ok(());
        };

        match client.verify_code(code.trim()).await {
            Ok(session) => {
                println!("Logged in as {}.", session.email);
                break;
            }
            Err(err) if err.is_validation_error() => {
                println!("{err}");
            }
            Err(err) => match err {
                cardfolio::Error::Auth(cardfolio::session::AuthError::CodeRejected) => {
                    println!("That code was not accepted; try again.");
                }
                other => return Err(other.into()),
            },
        }
    }

    // Combined backends deliver the profile with the grant; otherwise
    // fetch it now so `show` and `edit` start warm.
    if client.draft().await.is_none() {
        client.load_profile().await?;
    }
    if let Some(draft) = client.draft().await {
        println!("Profile loaded for {}.", draft.name);
    }
    Ok(())
}

pub async fn status(client: &Client) -> CmdResult {
    match client.session().await {
        Some(session) => {
            println!("Logged in as {} (until {}).", session.email, session.expires_at);
            if client.is_dirty().await {
                println!("There are unsaved changes.");
            }
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

pub async fn logout(client: &Client) -> CmdResult {
    client.logout().await?;
    println!("Logged out.");
    Ok(())
}
