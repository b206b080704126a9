use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::message::{ChatMessage, Conversation};

/// Agent 一次调用产生的新消息
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AgentResponse {
    pub messages: Vec<ChatMessage>,
}

impl AgentResponse {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    pub fn last_text(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content())
    }
}

#[async_trait]
pub trait ChatAgent: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, conversation: &Conversation) -> Result<AgentResponse>;
}

pub type DynChatAgent = Arc<dyn ChatAgent>;
