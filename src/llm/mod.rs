//! LLM 客户端抽象
//!
//! - `LocalEchoClient`: 离线回显
//! - `ScriptedClient`: 预设回复，测试与演示使用
//! - `OpenAiChatClient`: OpenAI 兼容 HTTP 客户端（`openai-client` feature）

mod client;
mod echo;
mod scripted;
mod types;

#[cfg(feature = "openai-client")]
pub mod http;

pub use client::{DynLlmClient, LlmClient};
pub use echo::LocalEchoClient;
pub use scripted::ScriptedClient;
pub use types::{LlmMessage, LlmRequest, LlmResponse};

#[cfg(feature = "openai-client")]
pub use http::OpenAiChatClient;
