// 配置模块

pub mod dialogue;
pub mod env;

pub use dialogue::{DialogueConfig, LlmSettings, ParticipantConfig};
pub use env::EnvConfig;

