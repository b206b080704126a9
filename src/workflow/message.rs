use std::fmt;

use serde::{Deserialize, Serialize};

use crate::agent::{ChatMessage, Conversation};

/// 节点间路由的消息类型标签
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Conversation,
    Signal,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Conversation => "conversation",
            MessageKind::Signal => "signal",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 控制信号，不携带对话内容
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signal {
    pub name: String,
}

impl Signal {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn stop() -> Self {
        Self::new("stop")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum WorkflowMessage {
    Text(String),
    Conversation(Conversation),
    Signal(Signal),
}

impl WorkflowMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            WorkflowMessage::Text(_) => MessageKind::Text,
            WorkflowMessage::Conversation(_) => MessageKind::Conversation,
            WorkflowMessage::Signal(_) => MessageKind::Signal,
        }
    }
}

impl From<&str> for WorkflowMessage {
    fn from(text: &str) -> Self {
        WorkflowMessage::Text(text.to_string())
    }
}

impl From<String> for WorkflowMessage {
    fn from(text: String) -> Self {
        WorkflowMessage::Text(text)
    }
}

impl From<Conversation> for WorkflowMessage {
    fn from(conversation: Conversation) -> Self {
        WorkflowMessage::Conversation(conversation)
    }
}

impl From<Vec<ChatMessage>> for WorkflowMessage {
    fn from(messages: Vec<ChatMessage>) -> Self {
        WorkflowMessage::Conversation(Conversation::from(messages))
    }
}

impl From<ChatMessage> for WorkflowMessage {
    fn from(message: ChatMessage) -> Self {
        WorkflowMessage::Conversation(Conversation::from(message))
    }
}

impl From<Signal> for WorkflowMessage {
    fn from(signal: Signal) -> Self {
        WorkflowMessage::Signal(signal)
    }
}

/// 可被 handler 直接接收的强类型载荷
pub trait MessagePayload: Sized + Send + 'static {
    const KIND: MessageKind;

    fn from_message(message: WorkflowMessage) -> Option<Self>;
}

impl MessagePayload for String {
    const KIND: MessageKind = MessageKind::Text;

    fn from_message(message: WorkflowMessage) -> Option<Self> {
        match message {
            WorkflowMessage::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl MessagePayload for Conversation {
    const KIND: MessageKind = MessageKind::Conversation;

    fn from_message(message: WorkflowMessage) -> Option<Self> {
        match message {
            WorkflowMessage::Conversation(conversation) => Some(conversation),
            _ => None,
        }
    }
}

impl MessagePayload for Signal {
    const KIND: MessageKind = MessageKind::Signal;

    fn from_message(message: WorkflowMessage) -> Option<Self> {
        match message {
            WorkflowMessage::Signal(signal) => Some(signal),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_follow_payload() {
        assert_eq!(WorkflowMessage::from("start").kind(), MessageKind::Text);
        assert_eq!(
            WorkflowMessage::from(vec![ChatMessage::user("hi")]).kind(),
            MessageKind::Conversation
        );
        assert_eq!(WorkflowMessage::from(Signal::stop()).kind(), MessageKind::Signal);
    }

    #[test]
    fn payload_extraction_rejects_other_kinds() {
        assert!(String::from_message(WorkflowMessage::from(Signal::stop())).is_none());
        assert_eq!(
            String::from_message(WorkflowMessage::from("x")).as_deref(),
            Some("x")
        );
    }

    #[test]
    fn message_serializes_with_kind_tag() {
        let value = serde_json::to_value(WorkflowMessage::from("go")).unwrap();
        assert_eq!(value["kind"], "text");
        assert_eq!(value["payload"], "go");
    }
}
