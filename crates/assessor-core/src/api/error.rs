use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - credentials rejected")]
    Unauthorized { detail: Option<String> },

    #[error("Access denied")]
    AccessDenied { detail: Option<String> },

    #[error("Resource not found")]
    NotFound { detail: Option<String> },

    #[error("Request rejected with status {status}")]
    Rejected {
        status: u16,
        detail: Option<String>,
    },

    #[error("Server error (status {status})")]
    ServerError {
        status: u16,
        detail: Option<String>,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Pull the human-readable `detail` out of an error body.
    ///
    /// The backend sends `{"detail": "..."}` for handled errors and
    /// `{"detail": [{"msg": "..."}, ...]}` for request validation failures.
    pub(crate) fn extract_detail(body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body).ok()?;
        match value.get("detail")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = Self::extract_detail(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized { detail },
            403 => ApiError::AccessDenied { detail },
            404 => ApiError::NotFound { detail },
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                detail,
            },
            code => ApiError::Rejected {
                status: code,
                detail: detail.or_else(|| {
                    let truncated = Self::truncate_body(body);
                    (!truncated.trim().is_empty()).then_some(truncated)
                }),
            },
        }
    }

    /// The backend's explanation for a rejected request, if it sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail }
            | ApiError::AccessDenied { detail }
            | ApiError::NotFound { detail }
            | ApiError::Rejected { detail, .. }
            | ApiError::ServerError { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// True for a 404, including one the backend re-raised as a 500
    /// (`{"detail": "404: ..."}`).
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::NotFound { .. } => true,
            ApiError::ServerError {
                detail: Some(detail),
                ..
            } => detail.starts_with("404"),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_extracts_string_detail() {
        let err = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "Incorrect username or password"}"#,
        );
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(err.detail(), Some("Incorrect username or password"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_status_joins_validation_messages() {
        let body = r#"{"detail": [{"loc": ["body", "username"], "msg": "field required", "type": "value_error.missing"}, {"loc": ["body", "password"], "msg": "field required", "type": "value_error.missing"}]}"#;
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert!(matches!(err, ApiError::Rejected { status: 422, .. }));
        assert_eq!(err.detail(), Some("field required; field required"));
    }

    #[test]
    fn test_from_status_without_detail() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        assert!(matches!(err, ApiError::ServerError { status: 500, .. }));
        assert_eq!(err.detail(), None);

        let err = ApiError::from_status(StatusCode::NOT_FOUND, "{}");
        assert!(matches!(err, ApiError::NotFound { detail: None }));
    }

    #[test]
    fn test_is_not_found_sees_wrapped_404() {
        assert!(ApiError::from_status(StatusCode::NOT_FOUND, "").is_not_found());

        let wrapped = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail": "404: No assessment found for current user"}"#,
        );
        assert!(wrapped.is_not_found());

        let other = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail": "boom"}"#);
        assert!(!other.is_not_found());
    }

    #[test]
    fn test_rejected_falls_back_to_body() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "plain text problem");
        assert_eq!(err.detail(), Some("plain text problem"));

        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "  ");
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_truncate_body() {
        let short = "short body";
        assert_eq!(ApiError::truncate_body(short), short);

        let long = "é".repeat(400);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.contains("truncated, 800 total bytes"));
    }

    #[test]
    fn test_non_status_errors_have_no_detail() {
        let err = ApiError::InvalidResponse("bad json".to_string());
        assert!(!err.is_not_found());
        assert_eq!(err.detail(), None);
    }
}
