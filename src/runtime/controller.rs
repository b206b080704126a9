use std::collections::{HashMap, VecDeque};

use anyhow::anyhow;
use tracing::{debug, info, info_span, warn, Instrument, Span};

use super::processor::process_delivery;
use super::types::{Delivery, WorkflowEventStream};
use crate::agent::message::prefixed_id;
use crate::error::{Result, WorkflowError};
use crate::workflow::context::Effect;
use crate::workflow::{Executor, MessageKind, Workflow, WorkflowEvent, WorkflowMessage};

pub(crate) const START_SOURCE: &str = "__start__";

/// 单次运行的驱动器
///
/// 投递按 FIFO 顺序逐个执行，一个 handler 完全结束（包括其中的
/// 外部调用）之后才会开始下一个投递。事件先进入 `pending`，
/// 由事件流按顺序交给调用方。
pub(crate) struct RunController {
    executors: HashMap<String, Box<dyn Executor>>,
    kinds: HashMap<String, Vec<MessageKind>>,
    adjacency: HashMap<String, Vec<String>>,
    queue: VecDeque<Delivery>,
    pending: VecDeque<Result<WorkflowEvent>>,
    deliveries: usize,
    max_deliveries: Option<usize>,
    finished: bool,
    span: Span,
}

impl RunController {
    pub(crate) fn new(workflow: Workflow, input: WorkflowMessage) -> Self {
        let run_id = prefixed_id("run");
        let span = info_span!("workflow_run", workflow = %workflow.name, run_id = %run_id);

        let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
        for (source, target) in workflow.edges {
            adjacency.entry(source).or_default().push(target);
        }

        let mut controller = Self {
            executors: workflow.executors,
            kinds: workflow.kinds,
            adjacency,
            queue: VecDeque::new(),
            pending: VecDeque::new(),
            deliveries: 0,
            max_deliveries: workflow.max_deliveries,
            finished: false,
            span,
        };
        controller.seed(workflow.start, input);
        controller
    }

    fn seed(&mut self, start: String, input: WorkflowMessage) {
        let kind = input.kind();
        if !self.accepts(&start, kind) {
            self.fail(WorkflowError::UnsupportedMessage {
                executor: start,
                kind,
            });
            return;
        }
        self.span
            .in_scope(|| info!(start = %start, "workflow run started"));
        self.queue.push_back(Delivery {
            source: START_SOURCE.to_string(),
            target: start,
            message: input,
        });
    }

    pub(crate) fn into_stream(self) -> WorkflowEventStream {
        Box::pin(futures::stream::unfold(self, |mut controller| {
            let span = controller.span.clone();
            async move {
                let item = controller.next_event().await?;
                Some((item, controller))
            }
            .instrument(span)
        }))
    }

    /// 拉取下一个事件；`None` 表示运行已结束
    pub(crate) async fn next_event(&mut self) -> Option<Result<WorkflowEvent>> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(item);
            }
            if self.finished {
                return None;
            }
            match self.queue.pop_front() {
                Some(delivery) => self.deliver(delivery).await,
                None => {
                    info!(deliveries = self.deliveries, "workflow idle, no pending deliveries");
                    self.finished = true;
                }
            }
        }
    }

    async fn deliver(&mut self, delivery: Delivery) {
        if let Some(limit) = self.max_deliveries {
            if self.deliveries >= limit {
                self.fail(WorkflowError::MaxDeliveriesExceeded(limit));
                return;
            }
        }
        self.deliveries += 1;

        let target = delivery.target.clone();
        let Some(executor) = self.executors.get_mut(&target) else {
            self.fail(WorkflowError::Other(anyhow!("executor `{}` not found", target)));
            return;
        };

        self.pending.push_back(Ok(WorkflowEvent::ExecutorInvoked {
            executor_id: target.clone(),
        }));

        match process_delivery(executor.as_mut(), delivery).await {
            Ok(effects) => {
                if self.apply(&target, effects) {
                    return;
                }
                self.pending.push_back(Ok(WorkflowEvent::ExecutorCompleted {
                    executor_id: target,
                }));
            }
            Err((events, err)) => {
                self.apply(&target, events);
                self.fail(err);
            }
        }
    }

    /// 按发出顺序处理副作用；遇到终止事件时返回 `true`
    fn apply(&mut self, source: &str, effects: Vec<Effect>) -> bool {
        for effect in effects {
            match effect {
                Effect::Event(event) => {
                    let terminal = event.is_terminal();
                    self.pending.push_back(Ok(event));
                    if terminal {
                        info!(
                            executor = %source,
                            deliveries = self.deliveries,
                            dropped = self.queue.len(),
                            "workflow terminated"
                        );
                        self.finished = true;
                        self.queue.clear();
                        return true;
                    }
                }
                Effect::Message { message, target } => self.route(source, message, target),
            }
        }
        false
    }

    fn route(&mut self, source: &str, message: WorkflowMessage, wanted: Option<String>) {
        let kind = message.kind();
        let targets: Vec<String> = self
            .adjacency
            .get(source)
            .map(|targets| {
                targets
                    .iter()
                    .filter(|target| wanted.as_deref().map_or(true, |w| w == target.as_str()))
                    .filter(|target| self.accepts(target, kind))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let Some((last, rest)) = targets.split_last() else {
            warn!(%source, %kind, target = ?wanted, "message has no matching edge, dropping");
            self.pending.push_back(Ok(WorkflowEvent::Undeliverable {
                source: source.to_string(),
                kind,
                target: wanted,
            }));
            return;
        };

        for target in rest {
            debug!(%source, %target, %kind, "queueing fan-out copy");
            self.queue.push_back(Delivery {
                source: source.to_string(),
                target: target.clone(),
                message: message.clone(),
            });
        }
        self.queue.push_back(Delivery {
            source: source.to_string(),
            target: last.clone(),
            message,
        });
    }

    fn accepts(&self, executor: &str, kind: MessageKind) -> bool {
        self.kinds
            .get(executor)
            .map(|kinds| kinds.contains(&kind))
            .unwrap_or(false)
    }

    fn fail(&mut self, err: WorkflowError) {
        warn!(error = %err, "workflow run failed");
        self.pending.push_back(Err(err));
        self.finished = true;
        self.queue.clear();
    }
}

