//! Authentication endpoints.
//!
//! These endpoints are sent without a bearer and never trigger the refresh
//! policy: a 401 from `auth/login/` means bad credentials, not an expired
//! token.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{ApiClient, ApiError, ApiRequest};
use crate::types::{Registration, UserProfile};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Token pair issued by `auth/login/`.
#[derive(Deserialize)]
struct TokenPair {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Response of `auth/token/refresh/`. Servers that rotate refresh tokens
/// send a new one alongside the access token.
#[derive(Deserialize)]
pub(crate) struct RefreshedTokens {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    password2: &'a str,
}

impl ApiClient {
    /// Log in with username and password.
    ///
    /// Stores the issued token pair in the session, then loads and caches
    /// the user profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (usually 401) for bad credentials,
    /// `ApiError::Store` if the session cannot be persisted.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::post("auth/login/")
            .json(&LoginRequest {
                username,
                password: password.expose_secret(),
            })?
            .without_auth();
        let response = self.execute_public(&request).await?;
        let tokens: TokenPair = response.json().await?;

        self.session()
            .establish(
                SecretString::from(tokens.access),
                tokens.refresh.map(SecretString::from),
            )
            .await?;

        let profile = self.profile().await?;
        debug!(user_id = %profile.id, "Logged in");
        Ok(profile)
    }

    /// Register a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let request = ApiRequest::post("auth/register/")
            .json(&RegisterRequest {
                username: &registration.username,
                email: &registration.email,
                password: registration.password.expose_secret(),
                password2: registration.password_confirmation.expose_secret(),
            })?
            .without_auth();
        self.execute_public(&request).await?;
        Ok(())
    }

    /// Fetch the signed-in user's profile and cache it in the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ReauthenticationRequired` if the session has expired.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        let profile: UserProfile = self.send_json(ApiRequest::get("auth/profile/")).await?;
        self.session().set_user(profile.clone()).await?;
        Ok(profile)
    }

    /// Log out.
    ///
    /// The refresh token is revoked server-side on a best-effort basis; the
    /// local session is always torn down.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Some(refresh) = self.session().refresh_token().await {
            let result = match ApiRequest::post("auth/logout/").json(&RefreshRequest {
                refresh: refresh.expose_secret(),
            }) {
                Ok(request) => self.execute_public(&request).await.map(drop),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                warn!(error = %e, "Server-side logout failed");
            }
        }
        self.session().teardown().await;
    }

    /// Exchange a refresh token for a new access token.
    #[instrument(skip(self, refresh))]
    pub(crate) async fn refresh_access_token(
        &self,
        refresh: &SecretString,
    ) -> Result<RefreshedTokens, ApiError> {
        let request = ApiRequest::post("auth/token/refresh/")
            .json(&RefreshRequest {
                refresh: refresh.expose_secret(),
            })?
            .without_auth();
        let response = self.execute_public(&request).await?;
        Ok(response.json().await?)
    }
}
