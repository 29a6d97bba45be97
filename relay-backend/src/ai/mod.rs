pub mod orchestrate;

pub use orchestrate::OrchestrateClient;

use crate::config::Config;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

/// What went wrong when calling the agent. Callers can distinguish a
/// misconfigured endpoint from a transient transport failure instead of
/// matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentErrorKind {
    /// Missing or invalid agent configuration
    Config,
    /// Could not reach the agent endpoint
    Transport,
    /// The endpoint answered, but with an error or an unusable body
    Api,
}

#[derive(Debug, Clone)]
pub struct AgentError {
    pub kind: AgentErrorKind,
    pub message: String,
}

impl AgentError {
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: AgentErrorKind::Config,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: AgentErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self {
            kind: AgentErrorKind::Api,
            message: message.into(),
        }
    }
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Mock agent client for tests — returns pre-configured responses from a
/// queue and records every message it was asked.
#[derive(Clone, Default)]
pub struct MockAgentClient {
    responses: Arc<Mutex<VecDeque<Result<String, AgentError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAgentClient {
    pub fn new(responses: Vec<Result<String, AgentError>>) -> Self {
        MockAgentClient {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn next_response(&self, message: &str) -> Result<String, AgentError> {
        self.calls.lock().unwrap().push(message.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("(mock exhausted)".to_string()))
    }

    /// Messages forwarded to the agent, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

/// Unified agent client over the configured backend
pub enum AgentClient {
    Orchestrate(OrchestrateClient),
    Mock(MockAgentClient),
}

impl AgentClient {
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let client = OrchestrateClient::new(
            &config.orchestrate_api_url,
            &config.orchestrate_agent_id,
        )?;
        Ok(AgentClient::Orchestrate(client))
    }

    /// Forward a user message to the agent and return its text answer.
    pub async fn call_agent(&self, message: &str) -> Result<String, AgentError> {
        match self {
            AgentClient::Orchestrate(client) => client.call_agent(message).await,
            AgentClient::Mock(mock) => mock.next_response(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_queued_responses_in_order() {
        let agent = AgentClient::Mock(MockAgentClient::new(vec![
            Ok("first".to_string()),
            Err(AgentError::transport("connection refused")),
        ]));

        assert_eq!(agent.call_agent("a").await.unwrap(), "first");
        let err = agent.call_agent("b").await.unwrap_err();
        assert_eq!(err.kind, AgentErrorKind::Transport);
        assert_eq!(err.message, "connection refused");
    }

    #[tokio::test]
    async fn mock_records_forwarded_messages() {
        let mock = MockAgentClient::new(vec![Ok("ok".to_string())]);
        let agent = AgentClient::Mock(mock.clone());

        agent.call_agent("what is the refund policy?").await.unwrap();

        assert_eq!(mock.calls(), vec!["what is the refund policy?"]);
    }
}
