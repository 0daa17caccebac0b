//! Agent HTTP Error Conversions
//!
//! Maps transport and decoding failures onto `AgentError`.

use crate::ports::AgentError;

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AgentError::Timeout
        } else if err.is_decode() {
            AgentError::Serialization(err.to_string())
        } else if err.is_builder() {
            AgentError::InvalidRequest(err.to_string())
        } else {
            AgentError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for AgentError {
    fn from(err: url::ParseError) -> Self {
        AgentError::InvalidRequest(format!("bad agent URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_is_serialization() {
        let err: AgentError = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, AgentError::Serialization(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_url_error_is_invalid_request() {
        let err: AgentError = url::Url::parse("::nope").unwrap_err().into();
        assert!(matches!(err, AgentError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_connect_error_is_network() {
        // grab a free port, then close it so nothing is listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let err: AgentError = client
            .get(format!("http://127.0.0.1:{}/", port))
            .send()
            .await
            .unwrap_err()
            .into();
        assert!(matches!(err, AgentError::Network(_)));
        assert!(err.is_retryable());
    }
}
