use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::executor::Executor;
use super::message::{MessageKind, WorkflowMessage};
use crate::error::Result;
use crate::runtime::{RunController, WorkflowEventStream, WorkflowRunResult};

/// 构建完成、不可再修改的工作流图
///
/// 一个 `Workflow` 只能运行一次：运行会取得全部节点的所有权，
/// 因此节点私有状态（例如轮次计数）不会泄漏到下一次运行。
/// 需要再次运行时重新构建即可。
pub struct Workflow {
    pub(crate) name: String,
    pub(crate) start: String,
    pub(crate) order: Vec<String>,
    pub(crate) executors: HashMap<String, Box<dyn Executor>>,
    pub(crate) kinds: HashMap<String, Vec<MessageKind>>,
    pub(crate) edges: Vec<(String, String)>,
    pub(crate) max_deliveries: Option<usize>,
}

impl Workflow {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_executor(&self) -> &str {
        &self.start
    }

    pub fn executor_ids(&self) -> &[String] {
        &self.order
    }

    /// 从 `source` 出发的所有下游节点，按添加顺序
    pub fn targets(&self, source: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(from, _)| from == source)
            .map(|(_, to)| to.as_str())
            .collect()
    }

    pub fn accepts(&self, executor: &str, kind: MessageKind) -> bool {
        self.kinds
            .get(executor)
            .map(|kinds| kinds.contains(&kind))
            .unwrap_or(false)
    }

    pub fn topology(&self) -> GraphTopology {
        GraphTopology {
            name: self.name.clone(),
            start: self.start.clone(),
            executors: self
                .order
                .iter()
                .map(|id| ExecutorTopology {
                    id: id.clone(),
                    accepts: self.kinds.get(id).cloned().unwrap_or_default(),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|(source, target)| EdgeTopology {
                    source: source.clone(),
                    target: target.clone(),
                })
                .collect(),
        }
    }

    /// 惰性事件流：只有在调用方拉取时才会推进执行
    pub fn run_stream(self, input: impl Into<WorkflowMessage>) -> WorkflowEventStream {
        RunController::new(self, input.into()).into_stream()
    }

    pub async fn run(self, input: impl Into<WorkflowMessage>) -> Result<WorkflowRunResult> {
        WorkflowRunResult::collect(self.run_stream(input)).await
    }
}

/// 可序列化的图结构，用于校验和调试输出
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GraphTopology {
    pub name: String,
    pub start: String,
    pub executors: Vec<ExecutorTopology>,
    pub edges: Vec<EdgeTopology>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExecutorTopology {
    pub id: String,
    pub accepts: Vec<MessageKind>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EdgeTopology {
    pub source: String,
    pub target: String,
}
