//! Sign in, sign out and identity.

use std::io::BufRead;

use secrecy::SecretString;
use thiserror::Error;
use tillpoint_client::{ApiClient, ApiError};

use super::emit;

#[derive(Debug, Error)]
pub enum AuthCommandError {
    #[error("could not read password: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("password must not be empty")]
    EmptyPassword,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Sign in and persist the session.
pub async fn login(
    client: &ApiClient,
    username: &str,
    password: Option<String>,
) -> Result<(), AuthCommandError> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    if password.is_empty() {
        return Err(AuthCommandError::EmptyPassword);
    }

    let user = client
        .login(username, &SecretString::from(password))
        .await?;
    tracing::info!(user = %user.username, "Signed in");
    emit(format_args!("Signed in as {}", user.display_name()));
    Ok(())
}

/// Sign out. Local credentials are discarded even if the server is unreachable.
pub async fn logout(client: &ApiClient) {
    client.logout().await;
    emit("Signed out");
}

/// Print the signed-in user, refreshing the cached profile.
pub async fn whoami(client: &ApiClient) -> Result<(), ApiError> {
    if !client.session().is_authenticated().await {
        emit("Not signed in");
        return Ok(());
    }
    let user = client.profile().await?;
    let role = if user.is_staff { "staff" } else { "user" };
    emit(format_args!(
        "{} <{}> ({role})",
        user.display_name(),
        user.email
    ));
    Ok(())
}

fn read_password() -> Result<String, std::io::Error> {
    #[allow(clippy::print_stderr)]
    {
        eprint!("Password: ");
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
