//! Bridge Integration Tests
//!
//! Drive the public API end to end:
//! 1. RequestPollBridge over the scripted agent (virtual clock)
//! 2. RequestPollBridge over the real HTTP client against a mockito server
//! 3. ChatService and RateService wiring from a loaded config file

use std::io::Write;
use std::time::Duration;

use globalpay_bridge::adapters::agent_http::AgentHttpClient;
use globalpay_bridge::adapters::cli::chat_service;
use globalpay_bridge::application::{
    BridgeError, BridgeMessages, RateService, RequestPollBridge,
};
use globalpay_bridge::config::load_config;
use globalpay_bridge::domain::{
    AskStatus, PollPolicy, RateSource, DEFAULT_EMPTY_RESULT_MESSAGE, DEFAULT_FALLBACK_MESSAGE,
};
use globalpay_bridge::ports::{AgentError, ScriptedAgent};
use rust_decimal_macros::dec;
use tokio::time::Instant;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Short schedule so HTTP tests finish in milliseconds
fn quick_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy::fixed(Duration::from_millis(10), max_attempts)
}

// ============================================================================
// Scripted agent
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_answer_after_three_waits() {
    let agent = ScriptedAgent::new()
        .with_job_id("job-abc")
        .then_waiting(3)
        .then_complete(Some("1 USD = 83.25 INR"));
    let bridge = RequestPollBridge::new(agent);

    let started = Instant::now();
    let response = bridge.ask("What is the USD to INR rate?").await;

    assert!(response.is_success());
    assert_eq!(response.response_text, "1 USD = 83.25 INR");
    // three waits, one delay after each
    assert_eq!(started.elapsed(), Duration::from_secs(6));

    let polls = bridge.agent().poll_calls();
    assert_eq!(polls.len(), 4);
    assert!(polls.iter().all(|id| id.as_str() == "job-abc"));
    assert_eq!(bridge.agent().start_calls(), vec!["What is the USD to INR rate?".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_never_finishing_job_degrades() {
    let agent = ScriptedAgent::new().then_waiting(100);
    let bridge = RequestPollBridge::new(agent);

    let started = Instant::now();
    let response = bridge.ask("slow").await;

    assert_eq!(response.status, AskStatus::Error);
    assert_eq!(response.response_text, DEFAULT_FALLBACK_MESSAGE);
    assert!(response.error.is_some());
    assert_eq!(bridge.agent().poll_calls().len(), 15);
    assert_eq!(started.elapsed(), Duration::from_secs(28));
}

#[tokio::test(start_paused = true)]
async fn test_flaky_polls_are_tolerated() {
    let agent = ScriptedAgent::new()
        .then_error(AgentError::Network("connection reset".into()))
        .then_error(AgentError::Http {
            status: 503,
            body: "busy".into(),
        })
        .then_complete(Some("ok"));
    let bridge = RequestPollBridge::new(agent);

    assert_eq!(bridge.run("q").await.unwrap(), "ok");
    assert_eq!(bridge.agent().poll_calls().len(), 3);
}

#[tokio::test]
async fn test_start_failure_skips_polling() {
    let agent = ScriptedAgent::new().with_start_error(AgentError::Http {
        status: 500,
        body: "down".into(),
    });
    let bridge = RequestPollBridge::new(agent);

    let err = bridge.submit("q").await.unwrap_err();
    assert!(matches!(err, BridgeError::StartFailed(_)));
    assert!(bridge.agent().poll_calls().is_empty());
}

#[tokio::test]
async fn test_custom_messages() {
    let agent = ScriptedAgent::new().then_complete(None);
    let messages = BridgeMessages {
        fallback: "Try later.".into(),
        empty_result: "Nothing to say.".into(),
    };
    let bridge = RequestPollBridge::new(agent).with_messages(messages);

    let response = bridge.ask("q").await;
    assert!(response.is_success());
    assert_eq!(response.response_text, "Nothing to say.");
}

// ============================================================================
// HTTP client against a mock agent
// ============================================================================

#[tokio::test]
async fn test_http_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let start = server
        .mock("POST", "/api/send-request")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"request_sent","request_id":"req-77"}"#)
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/api/get-response/req-77")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"complete","analysis_result":"Sent 100 USD."}"#)
        .expect(1)
        .create_async()
        .await;

    let client = AgentHttpClient::new(server.url()).unwrap();
    let bridge = RequestPollBridge::new(client).with_policy(quick_policy(3));
    let response = bridge.ask("send 100 USD").await;

    assert!(response.is_success());
    assert_eq!(response.response_text, "Sent 100 USD.");
    start.assert_async().await;
    poll.assert_async().await;
}

#[tokio::test]
async fn test_http_waiting_until_budget_exhausted() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/send-request")
        .with_status(200)
        .with_body(r#"{"request_id":"req-slow"}"#)
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/api/get-response/req-slow")
        .with_status(200)
        .with_body(r#"{"status":"waiting"}"#)
        .expect(3)
        .create_async()
        .await;

    let client = AgentHttpClient::new(server.url()).unwrap();
    let bridge = RequestPollBridge::new(client).with_policy(quick_policy(3));
    let err = bridge.run("slow").await.unwrap_err();

    match err {
        BridgeError::Timeout { job_id, attempts } => {
            assert_eq!(job_id.as_str(), "req-slow");
            assert_eq!(attempts, 3);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    poll.assert_async().await;
}

#[tokio::test]
async fn test_http_null_status_keeps_polling() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/send-request")
        .with_status(200)
        .with_body(r#"{"request_id":"req-null"}"#)
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/api/get-response/req-null")
        .with_status(200)
        .with_body(r#"{"status":null}"#)
        .expect(3)
        .create_async()
        .await;

    let client = AgentHttpClient::new(server.url()).unwrap();
    let bridge = RequestPollBridge::new(client).with_policy(quick_policy(3));
    let err = bridge.run("q").await.unwrap_err();

    assert!(matches!(err, BridgeError::Timeout { attempts: 3, .. }));
    poll.assert_async().await;
}

#[tokio::test]
async fn test_http_empty_result_uses_placeholder() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/send-request")
        .with_status(200)
        .with_body(r#"{"request_id":"req-empty"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/get-response/req-empty")
        .with_status(200)
        .with_body(r#"{"status":"complete"}"#)
        .create_async()
        .await;

    let client = AgentHttpClient::new(server.url()).unwrap();
    let bridge = RequestPollBridge::new(client).with_policy(quick_policy(2));

    assert_eq!(bridge.run("q").await.unwrap(), DEFAULT_EMPTY_RESULT_MESSAGE);
}

#[tokio::test]
async fn test_http_missing_request_id() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/send-request")
        .with_status(200)
        .with_body(r#"{"status":"request_sent"}"#)
        .create_async()
        .await;
    let poll = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = AgentHttpClient::new(server.url()).unwrap();
    let bridge = RequestPollBridge::new(client).with_policy(quick_policy(2));

    let response = bridge.ask("q").await;
    assert_eq!(response.status, AskStatus::Error);
    assert_eq!(response.response_text, DEFAULT_FALLBACK_MESSAGE);
    poll.assert_async().await;
}

// ============================================================================
// Config-driven services
// ============================================================================

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[tokio::test]
async fn test_config_without_agent_runs_offline() {
    // AGENT_BASE_URL would switch the service online
    if std::env::var("AGENT_BASE_URL").is_ok() {
        return;
    }
    let file = config_file("[polling]\nmax_attempts = 5\n\n[logging]\nlevel = \"debug\"\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(PollPolicy::from(&config.polling).max_attempts, 5);

    let service = chat_service(&config).unwrap();
    assert!(!service.is_online());

    let response = service.ask("I need to make a payment").await;
    assert!(response.is_success());
    assert_eq!(response.response_text, "I can help with payments! What do you need?");
}

#[tokio::test]
async fn test_config_with_agent_runs_online() {
    if std::env::var("AGENT_BASE_URL").is_ok() {
        return;
    }
    let mut server = mockito::Server::new_async().await;
    let start = server
        .mock("POST", "/api/send-request")
        .with_status(200)
        .with_body(r#"{"request_id":"req-cfg"}"#)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/api/get-response/req-cfg")
        .with_status(200)
        .with_body(r#"{"status":"complete","analysis_result":"Payment queued."}"#)
        .create_async()
        .await;

    let file = config_file(&format!(
        "[agent]\nbase_url = \"{}\"\n\n[polling]\ninterval_ms = 10\nmax_attempts = 3\n",
        server.url()
    ));
    let config = load_config(file.path()).unwrap();

    let service = chat_service(&config).unwrap();
    assert!(service.is_online());

    let response = service.ask("I need to make a payment").await;
    assert!(response.is_success());
    assert_eq!(response.response_text, "Payment queued.");
    start.assert_async().await;
}

#[tokio::test]
async fn test_rate_service_falls_back_when_agent_unreachable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", mockito::Matcher::Regex("^/api/exchange-rate".into()))
        .with_status(503)
        .create_async()
        .await;

    let client = AgentHttpClient::new(server.url()).unwrap();
    let service = RateService::new(Some(client));

    let conversion = service.convert(dec!(100), "usd", "inr").await.unwrap();
    assert_eq!(conversion.rate.source, RateSource::Mock);
    assert_eq!(conversion.rate.from, "USD");
    assert_eq!(conversion.converted, dec!(100) * conversion.rate.rate);
}
