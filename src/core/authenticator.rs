use log::{debug, info};
use reqwest::StatusCode;

use crate::core::{
    authenticator::{
        authentication_error::AuthenticationError,
        common::{LoginPayload, LoginResult},
    },
    common::{http_client_factory::http_client_factory, transport::ApiError},
    session::store::{RememberedCredentials, SessionData, SessionStore},
};

pub mod authentication_error;
pub mod common;

/// Owns the credential exchange with the API and the local session
/// lifecycle that follows from it.
pub struct Authenticator {
    api_url: String,
    store: Box<dyn SessionStore>,
}

impl Authenticator {
    pub fn new(api_url: String, store: Box<dyn SessionStore>) -> Self {
        Self { api_url, store }
    }

    pub async fn is_logged_in(&self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let session = self.store.read().await?;

        Ok(session.is_some())
    }

    /// Exchanges the credentials for a token and persists the fresh session.
    ///
    /// Both fields are validated locally before anything goes on the wire.
    /// A response without a 200 status or without a token field counts as a
    /// failed login, the two cases are not told apart. On success the
    /// remembered credentials are written or erased according to `remember`.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<SessionData, Box<dyn std::error::Error + Send + Sync>> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(Box::new(ApiError::Validation(
                "Both username and password are required.".to_string(),
            )));
        }

        debug!("login in");

        let client = http_client_factory()?;

        let payload = LoginPayload {
            username: username.to_string(),
            password: password.to_string(),
        };

        let resp = client
            .post(format!("{}login", self.api_url))
            .json(&payload)
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(Box::new(AuthenticationError::new(
                "Failed login attempt, please try again".to_string(),
            )));
        }

        let result = resp.json::<LoginResult>().await?;

        let token = match result.token {
            Some(t) => t,
            None => {
                return Err(Box::new(AuthenticationError::new(
                    "Failed login attempt, please try again".to_string(),
                )))
            }
        };

        let session = SessionData::new(token, result.is_admin.unwrap_or(false), result.username);

        self.store.write(session.clone()).await?;

        if remember {
            self.store
                .write_remembered(RememberedCredentials {
                    username: username.to_string(),
                    password: password.to_string(),
                })
                .await?;
        } else {
            self.store.clear_remembered().await?;
        }

        info!("successfully logged in");

        Ok(session)
    }

    /// Clears the local session. No server call is made, logging out twice
    /// is a no-op.
    pub async fn logout(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.store.clear().await?;

        info!("logged out");

        Ok(())
    }
}
