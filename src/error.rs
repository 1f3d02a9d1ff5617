// Error types for the remote API layer. The UI and binary wrap these in
// `anyhow` so a failed call surfaces with its context chain.

use serde::Deserialize;
use thiserror::Error;

/// Error envelope returned by the OpenAI API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorPayload {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
}

/// Errors that can occur when talking to the remote resource service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport level failure (connect, TLS, timeout, body decode).
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The service answered with a structured error payload.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        kind: Option<String>,
        code: Option<String>,
    },

    /// Non-2xx response whose body was not an error payload.
    #[error("Unexpected response from API: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// `OPENAI_API_KEY` was not found in the environment or any `.env` file.
    #[error("Missing API key: set OPENAI_API_KEY in the environment or a .env file")]
    MissingApiKey,

    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
}

/// Turn a failed response into a `ClientError`, preferring the structured
/// payload when the body has one.
pub(crate) fn parse_error_response(status: reqwest::StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ApiErrorPayload>(body) {
        Ok(ApiErrorPayload {
            error: Some(error),
        }) => ClientError::Api {
            status: status.as_u16(),
            message: error.message,
            kind: error.kind,
            code: error.code,
        },
        _ => ClientError::UnexpectedResponse(format!("HTTP status {}: {}", status.as_u16(), body)),
    }
}
