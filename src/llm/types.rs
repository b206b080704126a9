use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::{Conversation, Role};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LlmMessage {
    pub role: String,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmRequest {
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub messages: Vec<LlmMessage>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub metadata: Option<Value>,
}

fn default_temperature() -> f32 {
    0.2
}

impl LlmRequest {
    pub fn from_conversation(system: Option<String>, conversation: &Conversation) -> Self {
        let messages = conversation
            .iter()
            .filter(|m| m.role() != Role::System || system.is_none())
            .map(|m| LlmMessage {
                role: m.role().as_str().to_string(),
                content: m.content().to_string(),
            })
            .collect();
        Self {
            system,
            messages,
            temperature: default_temperature(),
            metadata: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// 最后一条消息的文本
    pub fn last_content(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}
