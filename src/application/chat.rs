//! Chat Service
//!
//! Entry point for chat callers. Routes to the agent bridge when an agent is
//! configured and answers from canned replies otherwise.

use crate::domain::{offline_reply, AskResponse};
use crate::ports::AgentPort;

use super::bridge::RequestPollBridge;

pub enum ChatService<A> {
    /// Agent configured: full start/poll round trip
    Online(RequestPollBridge<A>),
    /// No agent URL: keyword replies, no network I/O
    Offline,
}

impl<A: AgentPort> ChatService<A> {
    pub fn online(bridge: RequestPollBridge<A>) -> Self {
        ChatService::Online(bridge)
    }

    pub fn offline() -> Self {
        ChatService::Offline
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ChatService::Online(_))
    }

    pub async fn ask(&self, query: &str) -> AskResponse {
        match self {
            ChatService::Online(bridge) => bridge.ask(query).await,
            ChatService::Offline => {
                tracing::info!("Agent URL not configured, using offline reply");
                AskResponse::success(offline_reply(query))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AskStatus;
    use crate::ports::ScriptedAgent;

    #[tokio::test]
    async fn test_offline_never_touches_agent() {
        let service: ChatService<ScriptedAgent> = ChatService::offline();
        assert!(!service.is_online());

        let resp = service.ask("Can you check the rate?").await;
        assert_eq!(resp.status, AskStatus::Success);
        assert!(resp.response_text.contains("exchange rate"));
    }

    #[tokio::test]
    async fn test_online_uses_bridge() {
        let agent = ScriptedAgent::new().then_complete(Some("hello from agent"));
        let service = ChatService::online(RequestPollBridge::new(agent));

        let resp = service.ask("hi").await;
        assert!(resp.is_success());
        assert_eq!(resp.response_text, "hello from agent");
    }
}
