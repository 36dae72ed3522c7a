use chrono::NaiveDate;
use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::core::common::{http_client_factory::http_client_factory, transport::ApiError};

/// The full registration record the API expects.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub address: String,
    pub city: String,
    pub zip_code: u32,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub admin: bool,
}

/// Body of a 400 on registration, telling which unique field clashed.
#[derive(Deserialize, Debug)]
struct RegistrationConflict {
    #[serde(rename = "errorType")]
    error_type: Option<String>,
}

/// Account registration happens before any session exists, so this client is
/// unauthenticated.
pub struct AccountClient {
    api_url: String,
}

impl AccountClient {
    pub fn new(api_url: String) -> Self {
        Self { api_url }
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        debug!("registering account");

        let client = http_client_factory()?;

        let resp = client
            .post(format!("{}login/register-account", self.api_url))
            .json(registration)
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => Ok(()),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT => {
                let conflict = resp.json::<RegistrationConflict>().await?;

                let reason = match conflict.error_type.as_deref() {
                    Some("both") => "Username and email already exist",
                    Some("userName") => "Username already exists",
                    Some("email") => "Email already exists",
                    _ => "Account already exists",
                };

                Err(ApiError::Conflict(reason.to_string()))
            }
            other => Err(ApiError::UnexpectedStatus(other.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, method, path},
        Mock, MockServer,
    };

    fn sample_registration() -> Registration {
        Registration {
            user_name: "jane.doe".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 2),
            address: "1 Main Street".to_string(),
            city: "Springfield".to_string(),
            zip_code: 12345,
            email: "jane@example.org".to_string(),
            phone_number: "555-0101".to_string(),
            password: "jane".to_string(),
            admin: false,
        }
    }

    #[tokio::test]
    async fn register_sends_camel_case_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/register-account"))
            .and(body_partial_json(json!({
                "userName": "jane.doe",
                "firstName": "Jane",
                "zipCode": 12345,
                "phoneNumber": "555-0101",
                "admin": false,
            })))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = AccountClient::new(format!("{}/", mock_server.uri()));

        client.register(&sample_registration()).await.unwrap();
    }

    #[tokio::test]
    async fn register_maps_the_error_type_to_a_message() {
        let cases = [
            ("both", "Username and email already exist"),
            ("userName", "Username already exists"),
            ("email", "Email already exists"),
        ];

        for (error_type, expected) in cases {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/login/register-account"))
                .respond_with(
                    wiremock::ResponseTemplate::new(400)
                        .set_body_json(json!({ "errorType": error_type })),
                )
                .mount(&mock_server)
                .await;

            let client = AccountClient::new(format!("{}/", mock_server.uri()));

            let err = client.register(&sample_registration()).await.unwrap_err();

            assert_eq!(ApiError::Conflict(expected.to_string()), err);
        }
    }

    #[tokio::test]
    async fn register_surfaces_unexpected_statuses() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/register-account"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = AccountClient::new(format!("{}/", mock_server.uri()));

        let err = client.register(&sample_registration()).await.unwrap_err();

        assert_eq!(ApiError::UnexpectedStatus(500), err);
    }
}
