//! Session inspection commands.

use super::{CliError, open_session};

/// Validate the stored token against the backend.
#[allow(clippy::print_stdout)]
pub async fn check() -> Result<(), CliError> {
    let session = open_session()?;

    let tenant = session.resolve_subdomain().clone();
    if session.retrieve_token().is_none() {
        println!("tenant {tenant}: no stored session");
        return Ok(());
    }

    if session.validate_session().await {
        println!("tenant {tenant}: session is valid");
        if let Some(user) = session.cached_user() {
            println!("signed in as {} <{}>", user.name, user.email);
        }
    } else {
        println!("tenant {tenant}: session was rejected");
    }

    Ok(())
}

/// Print the locally cached user profile.
#[allow(clippy::print_stdout)]
pub fn whoami() -> Result<(), CliError> {
    let session = open_session()?;

    match session.cached_user() {
        Some(user) => {
            println!("name:     {}", user.name);
            println!("email:    {}", user.email);
            println!("verified: {}", user.verified_email);
            if let Some(avatar) = user.avatar_url {
                println!("avatar:   {avatar}");
            }
        }
        None => println!("no cached profile; sign in first"),
    }

    Ok(())
}
