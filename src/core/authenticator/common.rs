use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

/// Body of a successful login response. The token may still be absent on a
/// 200, which counts as a failed login.
#[derive(Deserialize, Clone, Debug)]
pub struct LoginResult {
    pub token: Option<String>,
    #[serde(rename = "isAdmin")]
    pub is_admin: Option<bool>,
    pub username: Option<String>,
}
