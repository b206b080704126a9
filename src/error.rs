use std::time::Duration;

use thiserror::Error;

use crate::workflow::MessageKind;

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("invalid workflow: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("executor `{executor}` has no handler for `{kind}` messages")]
    UnsupportedMessage { executor: String, kind: MessageKind },
    #[error("executor `{executor}` failed: {source}")]
    Handler {
        executor: String,
        #[source]
        source: Box<WorkflowError>,
    },
    #[error("agent `{agent}` call failed: {message}")]
    Agent { agent: String, message: String },
    #[error("llm request failed: {0}")]
    Llm(String),
    #[error("external call timed out after {0:?}")]
    Timeout(Duration),
    #[error("maximum deliveries {0} exceeded")]
    MaxDeliveriesExceeded(usize),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WorkflowError {
    pub fn handler(executor: impl Into<String>, source: WorkflowError) -> Self {
        Self::Handler {
            executor: executor.into(),
            source: Box::new(source),
        }
    }
}

impl From<serde_json::Error> for WorkflowError {
    fn from(err: serde_json::Error) -> Self {
        WorkflowError::Serialization(err.to_string())
    }
}

/// 构建期拓扑错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no start executor set")]
    MissingStartExecutor,
    #[error("start executor `{0}` is not registered")]
    UnknownStartExecutor(String),
    #[error("start executor `{0}` is not connected by any edge")]
    DetachedStartExecutor(String),
    #[error("edge `{source_id}` -> `{target}` references unknown executor `{missing}`")]
    DanglingEdge {
        source_id: String,
        target: String,
        missing: String,
    },
    #[error("executor id `{0}` registered more than once")]
    DuplicateExecutor(String),
    #[error("invalid executor id `{0}`")]
    InvalidExecutorId(String),
    #[error("executor `{0}` declares no handlers")]
    NoHandlers(String),
    #[error("executor `{executor}` declares more than one handler for `{kind}`")]
    DuplicateHandler { executor: String, kind: MessageKind },
}
