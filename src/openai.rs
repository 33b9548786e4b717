//! OpenAI client configuration with a caller-supplied transport timeout.

use crate::error::{KursError, Result};
use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    Client,
};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with a custom timeout.
///
/// The timeout is the only way an in-flight request is abandoned by the
/// transport itself; a hung call returns an HTTP error once it elapses.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http_client))
}

/// Convert an async-openai failure, keeping only retryable ones as `OpenAI`.
///
/// The client already retries HTTP 429 on its own (except `insufficient_quota`),
/// so a rate-limit error that reaches here has exhausted that backoff.
pub(crate) fn classify_error(context: &str, err: OpenAIError) -> KursError {
    let message = format!("{}: {}", context, err);
    let transient = match &err {
        OpenAIError::Reqwest(e) => !e.is_builder() && !e.is_decode(),
        OpenAIError::ApiError(api) => is_retryable(api),
        _ => false,
    };
    if transient {
        KursError::OpenAI(message)
    } else {
        KursError::Provider(message)
    }
}

fn is_retryable(api: &ApiError) -> bool {
    let matches = |field: &Option<String>, values: &[&str]| {
        field.as_deref().is_some_and(|f| values.contains(&f))
    };
    matches(&api.r#type, &["server_error", "engine_overloaded", "requests", "tokens"])
        || matches(&api.code, &["rate_limit_exceeded", "server_error"])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(r#type: Option<&str>, code: Option<&str>) -> OpenAIError {
        OpenAIError::ApiError(ApiError {
            message: "request failed".to_string(),
            r#type: r#type.map(String::from),
            param: None,
            code: code.map(String::from),
        })
    }

    #[test]
    fn test_server_and_rate_limit_errors_are_transient() {
        let server = classify_error("Chat API error", api_error(Some("server_error"), None));
        assert!(server.is_transient());
        assert!(server.to_string().contains("Chat API error"));

        let limited = classify_error(
            "Chat API error",
            api_error(Some("tokens"), Some("rate_limit_exceeded")),
        );
        assert!(limited.is_transient());
    }

    #[test]
    fn test_client_errors_are_permanent() {
        let auth = classify_error(
            "Embedding API error",
            api_error(Some("invalid_request_error"), Some("invalid_api_key")),
        );
        assert!(matches!(auth, KursError::Provider(_)));
        assert!(!auth.is_transient());

        let quota = classify_error("Chat API error", api_error(Some("insufficient_quota"), None));
        assert!(!quota.is_transient());

        let args = classify_error(
            "Chat API error",
            OpenAIError::InvalidArgument("model".to_string()),
        );
        assert!(!args.is_transient());
    }

    #[test]
    fn test_client_builds_with_timeout() {
        assert!(create_client_with_timeout(Duration::from_secs(5)).is_ok());
    }
}
