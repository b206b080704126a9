use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::agent::{AgentResponse, ChatAgent};
use super::message::{ChatMessage, Conversation};
use crate::error::{Result, WorkflowError};
use crate::llm::{DynLlmClient, LlmRequest};

/// 基于 LLM 客户端的对话 Agent
///
/// 每次 `run` 以固定的 instructions 作为 system prompt，
/// 把整段对话发给模型，并把回复包装成一条 assistant 消息。
pub struct LlmAgent {
    name: String,
    instructions: Option<String>,
    client: DynLlmClient,
    temperature: Option<f32>,
    timeout: Option<Duration>,
}

impl LlmAgent {
    pub fn new(name: impl Into<String>, client: DynLlmClient) -> Self {
        Self {
            name: name.into(),
            instructions: None,
            client,
            temperature: None,
            timeout: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl ChatAgent for LlmAgent {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, conversation), fields(agent = %self.name, turns = conversation.len()))]
    async fn run(&self, conversation: &Conversation) -> Result<AgentResponse> {
        let mut request = LlmRequest::from_conversation(self.instructions.clone(), conversation);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let call = self.client.complete(request);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| WorkflowError::Timeout(limit))?,
            None => call.await,
        };

        let response = result.map_err(|err| match err {
            WorkflowError::Timeout(limit) => WorkflowError::Timeout(limit),
            other => WorkflowError::Agent {
                agent: self.name.clone(),
                message: other.to_string(),
            },
        })?;
        debug!(chars = response.content.len(), "agent replied");

        let message = ChatMessage::assistant(response.content).with_author(self.name.clone());
        Ok(AgentResponse::new(vec![message]))
    }
}
