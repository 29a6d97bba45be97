//! watsonx Orchestrate agent API client — forwards a user question to the
//! configured agent and returns its text answer.

use crate::ai::AgentError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct AgentChatRequest {
    message: AgentMessage,
    agent_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct AgentMessage {
    role: String,
    content: Vec<AgentContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AgentContent {
    response_type: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct AgentChatResponse {
    message: AgentMessage,
}

pub struct OrchestrateClient {
    http: Client,
    base_url: String,
    agent_id: String,
}

impl OrchestrateClient {
    pub fn new(base_url: &str, agent_id: &str) -> Result<Self, String> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            agent_id: agent_id.to_string(),
        })
    }

    /// Send one user message to the agent. The payload targets the agent by
    /// id and carries the text as a single user-role content segment.
    pub async fn call_agent(&self, message: &str) -> Result<String, AgentError> {
        let url = format!("{}/chat", self.base_url);
        let payload = AgentChatRequest {
            message: AgentMessage {
                role: "user".to_string(),
                content: vec![AgentContent {
                    response_type: "text".to_string(),
                    text: message.to_string(),
                }],
            },
            agent_id: self.agent_id.clone(),
        };

        let resp = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AgentError::transport(format!("Failed to reach agent API: {}", e)))?;

        if !resp.status().is_success() {
            return Err(AgentError::api(format!(
                "Agent API returned HTTP {}",
                resp.status()
            )));
        }

        let body: AgentChatResponse = resp
            .json()
            .await
            .map_err(|e| AgentError::api(format!("Failed to parse agent response: {}", e)))?;

        body.message
            .content
            .into_iter()
            .find(|c| c.response_type == "text")
            .map(|c| c.text)
            .ok_or_else(|| AgentError::api("Agent response contained no text segment".to_string()))
    }
}
