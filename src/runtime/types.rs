use std::pin::Pin;

use futures::{Stream, StreamExt};
use serde_json::Value;

use crate::error::Result;
use crate::workflow::{WorkflowEvent, WorkflowMessage};

/// 运行时类型定义

pub type WorkflowEventStream = Pin<Box<dyn Stream<Item = Result<WorkflowEvent>> + Send>>;

/// 待投递的消息
#[derive(Clone, Debug)]
pub(crate) struct Delivery {
    pub(crate) source: String,
    pub(crate) target: String,
    pub(crate) message: WorkflowMessage,
}

/// 一次运行的结束方式
#[derive(Clone, Debug, PartialEq)]
pub enum RunStatus {
    Completed,
    Output(Value),
    /// 队列耗尽且没有终止事件
    Idle,
}

/// 收集完整事件流后的运行结果
#[derive(Clone, Debug)]
pub struct WorkflowRunResult {
    pub events: Vec<WorkflowEvent>,
    pub status: RunStatus,
}

impl WorkflowRunResult {
    pub async fn collect(mut stream: WorkflowEventStream) -> Result<Self> {
        let mut events = Vec::new();
        let mut status = RunStatus::Idle;
        while let Some(item) = stream.next().await {
            let event = item?;
            match &event {
                WorkflowEvent::Completed => status = RunStatus::Completed,
                WorkflowEvent::Output { data, .. } => status = RunStatus::Output(data.clone()),
                _ => {}
            }
            events.push(event);
        }
        Ok(Self { events, status })
    }

    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    pub fn output(&self) -> Option<&Value> {
        match &self.status {
            RunStatus::Output(value) => Some(value),
            _ => None,
        }
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&WorkflowEvent) -> bool,
    {
        self.events.iter().filter(|event| predicate(event)).count()
    }
}
