use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::events::WorkflowEvent;
use super::message::WorkflowMessage;
use crate::agent::ChatMessage;
use crate::error::Result;

/// 一次 handler 调用中产生的副作用，按发出顺序保存
#[derive(Debug)]
pub(crate) enum Effect {
    Message {
        message: WorkflowMessage,
        target: Option<String>,
    },
    Event(WorkflowEvent),
}

/// Handler 与运行时交互的唯一通道
///
/// 节点之间不会直接调用；所有输出消息和事件都先记录在这里，
/// 由运行时在 handler 返回后按顺序路由。一旦记录了终止事件
/// （`Completed` 或 `yield_output`），后续的发送都会被丢弃。
pub struct WorkflowContext {
    executor_id: String,
    effects: Vec<Effect>,
    terminated: bool,
}

impl WorkflowContext {
    pub(crate) fn new(executor_id: impl Into<String>) -> Self {
        Self {
            executor_id: executor_id.into(),
            effects: Vec::new(),
            terminated: false,
        }
    }

    pub fn executor_id(&self) -> &str {
        &self.executor_id
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn send_message(&mut self, message: impl Into<WorkflowMessage>) {
        self.push_message(message.into(), None);
    }

    /// 只发给指定下游；目标必须是本节点某条边的终点
    pub fn send_message_to(&mut self, target: impl Into<String>, message: impl Into<WorkflowMessage>) {
        self.push_message(message.into(), Some(target.into()));
    }

    pub fn add_event(&mut self, event: WorkflowEvent) {
        if self.terminated {
            debug!(executor = %self.executor_id, "dropping event after termination");
            return;
        }
        self.terminated = event.is_terminal();
        self.effects.push(Effect::Event(event));
    }

    pub fn emit_update(&mut self, data: Value) {
        let event = WorkflowEvent::Custom {
            executor_id: self.executor_id.clone(),
            data,
        };
        self.add_event(event);
    }

    pub fn emit_agent_response(&mut self, message: ChatMessage) {
        let event = WorkflowEvent::AgentResponse {
            executor_id: self.executor_id.clone(),
            message,
        };
        self.add_event(event);
    }

    pub fn complete(&mut self) {
        self.add_event(WorkflowEvent::Completed);
    }

    pub fn yield_output<T: Serialize>(&mut self, output: T) -> Result<()> {
        let data = serde_json::to_value(output)?;
        let event = WorkflowEvent::Output {
            executor_id: self.executor_id.clone(),
            data,
        };
        self.add_event(event);
        Ok(())
    }

    fn push_message(&mut self, message: WorkflowMessage, target: Option<String>) {
        if self.terminated {
            debug!(executor = %self.executor_id, kind = %message.kind(), "dropping message after termination");
            return;
        }
        self.effects.push(Effect::Message { message, target });
    }

    pub(crate) fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}
