use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::executor::Executor;
use super::graph::Workflow;
use crate::error::{ConfigurationError, Result};
use crate::utils::validation::is_valid_node_id;

/// 工作流构建器
///
/// 允许环：teacher -> student -> teacher 这样的双节点循环是常规用法。
pub struct WorkflowBuilder {
    name: String,
    start: Option<String>,
    executors: Vec<Box<dyn Executor>>,
    edges: Vec<(String, String)>,
    max_deliveries: Option<usize>,
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new("workflow")
    }
}

impl WorkflowBuilder {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            start: None,
            executors: Vec::new(),
            edges: Vec::new(),
            max_deliveries: None,
        }
    }

    pub fn add_executor<E>(&mut self, executor: E) -> &mut Self
    where
        E: Executor + 'static,
    {
        self.executors.push(Box::new(executor));
        self
    }

    pub fn add_edge(&mut self, source: &str, target: &str) -> &mut Self {
        self.edges.push((source.to_string(), target.to_string()));
        self
    }

    pub fn set_start_executor(&mut self, id: &str) -> &mut Self {
        self.start = Some(id.to_string());
        self
    }

    /// 可选的投递次数上限，默认不限制
    pub fn with_max_deliveries(&mut self, limit: usize) -> &mut Self {
        self.max_deliveries = Some(limit);
        self
    }

    pub fn build(self) -> Result<Workflow> {
        let mut order = Vec::with_capacity(self.executors.len());
        let mut kinds = HashMap::new();
        let mut executors = HashMap::new();

        for executor in self.executors {
            let id = executor.id().to_string();
            if !is_valid_node_id(&id) {
                return Err(ConfigurationError::InvalidExecutorId(id).into());
            }
            if executors.contains_key(&id) {
                return Err(ConfigurationError::DuplicateExecutor(id).into());
            }

            let declared = executor.input_kinds();
            if declared.is_empty() {
                return Err(ConfigurationError::NoHandlers(id).into());
            }
            let mut seen = HashSet::new();
            for kind in &declared {
                if !seen.insert(*kind) {
                    return Err(ConfigurationError::DuplicateHandler {
                        executor: id,
                        kind: *kind,
                    }
                    .into());
                }
            }

            order.push(id.clone());
            kinds.insert(id.clone(), declared);
            executors.insert(id, executor);
        }

        let start = self.start.ok_or(ConfigurationError::MissingStartExecutor)?;
        if !executors.contains_key(&start) {
            return Err(ConfigurationError::UnknownStartExecutor(start).into());
        }

        let mut edges: Vec<(String, String)> = Vec::with_capacity(self.edges.len());
        for (source, target) in self.edges {
            for endpoint in [&source, &target] {
                if !executors.contains_key(endpoint) {
                    return Err(ConfigurationError::DanglingEdge {
                        source_id: source.clone(),
                        target: target.clone(),
                        missing: endpoint.clone(),
                    }
                    .into());
                }
            }
            if edges.iter().any(|(s, t)| *s == source && *t == target) {
                debug!(%source, %target, "ignoring duplicate edge");
                continue;
            }
            edges.push((source, target));
        }

        let connected = edges.iter().any(|(s, t)| *s == start || *t == start);
        if !connected && executors.len() > 1 {
            return Err(ConfigurationError::DetachedStartExecutor(start).into());
        }

        for id in &order {
            let reachable = *id == start || edges.iter().any(|(_, t)| t == id);
            if !reachable {
                warn!(executor = %id, "executor has no inbound edge and is not the start executor");
            }
        }

        Ok(Workflow {
            name: self.name,
            start,
            order,
            executors,
            kinds,
            edges,
            max_deliveries: self.max_deliveries,
        })
    }
}
