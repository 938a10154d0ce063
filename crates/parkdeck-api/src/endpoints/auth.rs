// Authentication endpoints.
//
// Partner accounts log in through the user-service gateway, platform
// administrators through the admin gateway; both receive the same
// bearer token pair. On success the tokens are stored into the
// client's shared TokenSource so every subsequent request carries them.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{Role, SessionTokens};
use crate::client::ApiClient;
use crate::error::Error;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Profile and token material returned by a login call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub partner_id: Option<i64>,
    #[serde(default)]
    pub registration_id: Option<Uuid>,
    #[serde(default)]
    pub registration_status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPairResponse {
    access_token: String,
    refresh_token: String,
}

impl ApiClient {
    /// Authenticate as the given role and load the returned token pair
    /// into the shared [`TokenSource`](crate::TokenSource).
    pub async fn login(
        &self,
        role: Role,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        debug!(?role, email, "logging in");

        let resp: LoginResponse = self
            .post(
                role.login_path(),
                &LoginRequest {
                    email,
                    password: password.expose_secret(),
                },
            )
            .await
            .map_err(|e| match e {
                // A rejected login is an auth failure, not a dead session.
                Error::SessionExpired | Error::Api { status: 403, .. } => Error::Authentication {
                    message: "invalid email or password".into(),
                },
                Error::Api { message, .. } => Error::Authentication { message },
                other => other,
            })?;

        self.tokens().set(SessionTokens {
            access: SecretString::from(resp.access_token.clone()),
            refresh: SecretString::from(resp.refresh_token.clone()),
        });

        debug!("login successful");
        Ok(resp)
    }

    /// Exchange the refresh token for a new token pair, rotating the
    /// shared [`TokenSource`](crate::TokenSource) in place.
    pub async fn refresh_session(&self, role: Role) -> Result<(), Error> {
        let refresh = self.tokens().refresh_token().ok_or(Error::MissingToken)?;

        debug!("refreshing session tokens");

        let pair: TokenPairResponse = self
            .post(
                role.refresh_path(),
                &RefreshRequest {
                    refresh_token: refresh.expose_secret(),
                },
            )
            .await?;

        self.tokens().set(SessionTokens {
            access: SecretString::from(pair.access_token),
            refresh: SecretString::from(pair.refresh_token),
        });

        Ok(())
    }

    /// End the session client-side.
    ///
    /// The platform has no logout endpoint -- tokens simply expire --
    /// so this only drops the local token material.
    pub fn logout(&self) {
        debug!("clearing session tokens");
        self.tokens().clear();
    }
}
