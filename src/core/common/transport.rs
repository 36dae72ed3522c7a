use std::fmt::Display;

use reqwest::StatusCode;

/// Error taxonomy shared by every API call site. Each endpoint maps its
/// response through this one type so the same failure always carries the
/// same message, whichever command triggered it.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Local validation failure, raised before any network call.
    Validation(String),
    /// HTTP 404 on the addressed resource.
    NotFound(String),
    /// HTTP 400 or 409: the resource already exists. The API uses both codes
    /// across revisions, both land here.
    Conflict(String),
    /// Transport failure on an authenticated call, typically a rejected or
    /// expired token.
    Unauthorized(String),
    /// A status no branch accounts for; carries the numeric code.
    UnexpectedStatus(u16),
}

impl ApiError {
    /// Maps a non-success status to the taxonomy, with operation specific
    /// wording for the not-found and conflict cases.
    pub fn from_status(status: StatusCode, not_found: &str, conflict: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound(not_found.to_string()),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT => {
                ApiError::Conflict(conflict.to_string())
            }
            other => ApiError::UnexpectedStatus(other.as_u16()),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(reason) => write!(f, "{}", reason),
            ApiError::NotFound(reason) => write!(f, "{}", reason),
            ApiError::Conflict(reason) => write!(f, "{}", reason),
            ApiError::Unauthorized(reason) => write!(f, "{}", reason),
            ApiError::UnexpectedStatus(code) => {
                write!(f, "unexpected response status: {}", code)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(_: reqwest::Error) -> Self {
        ApiError::Unauthorized("Not authorized to perform this operation".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_maps_the_documented_codes() {
        assert_eq!(
            ApiError::from_status(StatusCode::NOT_FOUND, "Product not found", "exists"),
            ApiError::NotFound("Product not found".to_string())
        );
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "missing", "SKU already exists"),
            ApiError::Conflict("SKU already exists".to_string())
        );
        assert_eq!(
            ApiError::from_status(StatusCode::CONFLICT, "missing", "SKU already exists"),
            ApiError::Conflict("SKU already exists".to_string())
        );
        assert_eq!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "missing", "exists"),
            ApiError::UnexpectedStatus(500)
        );
    }
}
