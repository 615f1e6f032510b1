use serde::Deserialize;
use thiserror::Error;

/// Uniform failure of an API request.
///
/// Callers that only display errors can rely on `Display`: for a non-success
/// response it is exactly the server-provided message (or the synthesized
/// status message), never decorated.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<ErrorMessage>,
}

/// Validation failures report a list of messages instead of one
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    Text(String),
    List(Vec<String>),
}

impl ErrorMessage {
    fn into_text(self) -> String {
        match self {
            ErrorMessage::Text(text) => text,
            ErrorMessage::List(items) => items
                .into_iter()
                .filter(|m| !m.trim().is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build an error from a non-success response.
    ///
    /// Uses the `message` field of a JSON error body when there is one,
    /// otherwise a message carrying the numeric status code.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .map(ErrorMessage::into_text)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error! Status: {}", status.as_u16()));

        ApiError::Request {
            status: status.as_u16(),
            message,
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the request never produced an HTTP response: DNS, refused
    /// or reset connection, timeout, or a body cut off mid-stream.
    pub fn is_unreachable(&self) -> bool {
        match self {
            ApiError::Network(e) => e.status().is_none(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_uses_server_message() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"message":"not found"}"#);
        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_from_status_unparsable_body() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_from_status_json_without_message() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error":"bad"}"#);
        assert_eq!(err.to_string(), "HTTP error! Status: 400");

        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message":""}"#);
        assert_eq!(err.to_string(), "HTTP error! Status: 400");
    }

    #[test]
    fn test_from_status_message_list() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"message":["title should not be empty","fundingGoal must be positive"]}"#,
        );
        assert_eq!(err.to_string(), "title should not be empty, fundingGoal must be positive");

        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message":[]}"#);
        assert_eq!(err.to_string(), "HTTP error! Status: 400");
    }

    #[test]
    fn test_request_errors_are_not_unreachable() {
        let err = ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, "");
        assert!(!err.is_unreachable());
        assert!(!ApiError::InvalidResponse("bad json".to_string()).is_unreachable());
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(ApiError::truncate_body("short"), "short");

        let long = "x".repeat(600);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));
    }
}
