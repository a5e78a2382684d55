use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Failures from the HTTP client. Callers decide what to do; the client
/// never retries.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server responded with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data.
    /// The cut is floored to a char boundary so multibyte bodies slice
    /// cleanly.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::Http {
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }

    /// 401 and 403 both mean the credential was rejected - during startup
    /// validation that is an invalid/expired session, during login it is
    /// a bad email/password pair.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Http { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_keeps_numeric_code() {
        let err = ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED, "nope");
        match err {
            ApiError::Http { status, ref body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "nope");
            }
            ApiError::Network(_) => panic!("expected Http variant"),
        }
    }

    #[test]
    fn test_auth_failure_classification() {
        assert!(ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED, "").is_auth_failure());
        assert!(ApiError::from_status(reqwest::StatusCode::FORBIDDEN, "").is_auth_failure());
        assert!(!ApiError::from_status(reqwest::StatusCode::NOT_FOUND, "").is_auth_failure());
        assert!(
            !ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "")
                .is_auth_failure()
        );
    }

    #[test]
    fn test_truncation_lands_on_a_char_boundary() {
        // 600 bytes of 3-byte characters; byte 500 falls mid-character
        let body = "あ".repeat(200);
        let err = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, &body);
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 502);
                assert!(body.contains("truncated"));
                assert!(body.starts_with('あ'));
            }
            ApiError::Network(_) => panic!("expected Http variant"),
        }
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, &body);
        match err {
            ApiError::Http { body, .. } => {
                assert!(body.len() < 600);
                assert!(body.contains("truncated"));
            }
            ApiError::Network(_) => panic!("expected Http variant"),
        }
    }
}
