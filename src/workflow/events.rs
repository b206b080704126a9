use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::MessageKind;
use crate::agent::ChatMessage;

/// 运行期间对外可见的事件，发出后不再修改
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    ExecutorInvoked {
        executor_id: String,
    },
    ExecutorCompleted {
        executor_id: String,
    },
    /// Agent 产生了一条新的对话消息
    AgentResponse {
        executor_id: String,
        message: ChatMessage,
    },
    Custom {
        executor_id: String,
        data: Value,
    },
    /// 没有任何边能接收该消息
    Undeliverable {
        source: String,
        kind: MessageKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    Output {
        executor_id: String,
        data: Value,
    },
    Completed,
}

impl WorkflowEvent {
    /// `Completed` 与 `Output` 都会结束本次运行
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowEvent::Completed | WorkflowEvent::Output { .. })
    }

    pub fn executor_id(&self) -> Option<&str> {
        match self {
            WorkflowEvent::ExecutorInvoked { executor_id }
            | WorkflowEvent::ExecutorCompleted { executor_id }
            | WorkflowEvent::AgentResponse { executor_id, .. }
            | WorkflowEvent::Custom { executor_id, .. }
            | WorkflowEvent::Output { executor_id, .. } => Some(executor_id),
            WorkflowEvent::Undeliverable { source, .. } => Some(source),
            WorkflowEvent::Completed => None,
        }
    }
}
