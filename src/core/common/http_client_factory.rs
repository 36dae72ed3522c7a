use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
};

use crate::core::common::transport::ApiError;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Plain client for the unauthenticated endpoints (login, account
/// registration).
pub fn http_client_factory() -> Result<Client, ApiError> {
    debug!("creating HTTP client");

    let client = reqwest::ClientBuilder::new()
        .user_agent(APP_USER_AGENT)
        .build()
        .map_err(|_| ApiError::Unauthorized("cannot create HTTP client".to_string()))?;

    Ok(client)
}

/// Builds clients carrying the session's bearer token as a default header.
/// Every authenticated call site goes through here, so the token is attached
/// in exactly one place.
#[derive(Clone)]
pub struct AuthenticatedHttpClientFactory {
    pub api_url: String,
    token: String,
}

impl AuthenticatedHttpClientFactory {
    pub fn new(api_url: String, token: String) -> Self {
        Self { api_url, token }
    }

    pub fn create_client(&self) -> Result<Client, ApiError> {
        debug!("creating authenticated HTTP client");

        let mut headers = HeaderMap::new();

        let bearer = format!("Bearer {}", self.token);
        let value = HeaderValue::from_str(bearer.as_str())
            .map_err(|_| ApiError::Unauthorized("session token is not a valid header value".to_string()))?;

        headers.append(AUTHORIZATION, value);

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .user_agent(APP_USER_AGENT)
            .build()
            .map_err(|_| ApiError::Unauthorized("cannot create HTTP client".to_string()))?;

        Ok(client)
    }
}
