pub mod agent;
pub mod chat;
pub mod message;

pub use agent::{AgentResponse, ChatAgent, DynChatAgent};
pub use chat::LlmAgent;
pub use message::{ChatMessage, Conversation, Role};

pub use message::uuid;
