pub mod agent;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod llm;
pub mod runtime;
pub mod utils;
pub mod workflow;

pub use agent::{AgentResponse, ChatAgent, ChatMessage, Conversation, DynChatAgent, LlmAgent, Role};
pub use config::{DialogueConfig, EnvConfig, LlmSettings, ParticipantConfig};
pub use dialogue::{
    build_quiz_workflow, quiz_agents, student_executor, teacher_executor, DialogueSummary,
    TurnPolicy,
};
pub use error::{ConfigurationError, Result, WorkflowError};
pub use llm::{DynLlmClient, LlmClient, LlmRequest, LlmResponse, LocalEchoClient, ScriptedClient};
#[cfg(feature = "openai-client")]
pub use llm::OpenAiChatClient;
pub use runtime::{RunStatus, WorkflowEventStream, WorkflowRunResult};
pub use utils::{logging, validation};
pub use workflow::{
    Executor, GraphTopology, HandlerExecutor, MessageKind, MessagePayload, Signal, Workflow,
    WorkflowBuilder, WorkflowContext, WorkflowEvent, WorkflowMessage,
};
