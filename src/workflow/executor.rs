use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};

use super::context::WorkflowContext;
use super::message::{MessageKind, MessagePayload, WorkflowMessage};
use crate::error::{Result, WorkflowError};

/// 工作流中的一个执行节点
///
/// 运行时只会把 `input_kinds` 中声明过的消息类型交给 `execute`。
#[async_trait]
pub trait Executor: Send {
    fn id(&self) -> &str;

    fn input_kinds(&self) -> Vec<MessageKind>;

    async fn execute(&mut self, message: WorkflowMessage, ctx: &mut WorkflowContext) -> Result<()>;
}

type ErasedHandler<S> = Box<
    dyn for<'a> Fn(&'a mut S, WorkflowMessage, &'a mut WorkflowContext) -> BoxFuture<'a, Result<()>>
        + Send
        + Sync,
>;

fn erased<S, F>(handler: F) -> F
where
    F: for<'a> Fn(&'a mut S, WorkflowMessage, &'a mut WorkflowContext) -> BoxFuture<'a, Result<()>>,
{
    handler
}

/// 由“消息类型 -> handler”显式映射驱动的节点
///
/// 节点私有状态 `S` 随节点实例存在，每次运行都使用新的实例。
///
/// ```ignore
/// let node = HandlerExecutor::new("echo", Vec::<String>::new())
///     .on::<String, _>(|seen, text, ctx| {
///         async move {
///             seen.push(text.clone());
///             ctx.send_message(text);
///             Ok(())
///         }
///         .boxed()
///     });
/// ```
pub struct HandlerExecutor<S> {
    id: String,
    state: S,
    handlers: Vec<(MessageKind, ErasedHandler<S>)>,
}

impl<S> HandlerExecutor<S>
where
    S: Send + 'static,
{
    pub fn new(id: impl Into<String>, state: S) -> Self {
        Self {
            id: id.into(),
            state,
            handlers: Vec::new(),
        }
    }

    /// 为载荷类型 `P` 注册 handler；同一类型注册两次会在构建工作流时报错
    pub fn on<P, H>(mut self, handler: H) -> Self
    where
        P: MessagePayload,
        H: for<'a> Fn(&'a mut S, P, &'a mut WorkflowContext) -> BoxFuture<'a, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        let executor_id = self.id.clone();
        let dispatch = erased::<S, _>(move |state, message: WorkflowMessage, ctx| {
            let kind = message.kind();
            match P::from_message(message) {
                Some(payload) => handler(state, payload, ctx),
                None => future::ready(Err(WorkflowError::UnsupportedMessage {
                    executor: executor_id.clone(),
                    kind,
                }))
                .boxed(),
            }
        });
        self.handlers.push((P::KIND, Box::new(dispatch)));
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

#[async_trait]
impl<S> Executor for HandlerExecutor<S>
where
    S: Send + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn input_kinds(&self) -> Vec<MessageKind> {
        self.handlers.iter().map(|(kind, _)| *kind).collect()
    }

    async fn execute(&mut self, message: WorkflowMessage, ctx: &mut WorkflowContext) -> Result<()> {
        let kind = message.kind();
        let handler = self
            .handlers
            .iter()
            .find(|(registered, _)| *registered == kind)
            .map(|(_, handler)| handler)
            .ok_or_else(|| WorkflowError::UnsupportedMessage {
                executor: self.id.clone(),
                kind,
            })?;
        handler(&mut self.state, message, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> HandlerExecutor<u32> {
        HandlerExecutor::new("counter", 0u32).on::<String, _>(|count, text, ctx| {
            async move {
                *count += 1;
                ctx.send_message(format!("{}#{}", text, count));
                Ok(())
            }
            .boxed()
        })
    }

    #[tokio::test]
    async fn dispatches_by_kind_and_keeps_state() {
        let mut node = counter();
        let mut ctx = WorkflowContext::new("counter");
        node.execute("a".into(), &mut ctx).await.unwrap();
        node.execute("b".into(), &mut ctx).await.unwrap();

        assert_eq!(*node.state(), 2);
        assert_eq!(node.input_kinds(), vec![MessageKind::Text]);
        assert_eq!(ctx.into_effects().len(), 2);
    }

    #[tokio::test]
    async fn rejects_undeclared_kind() {
        let mut node = counter();
        let mut ctx = WorkflowContext::new("counter");
        let err = node
            .execute(crate::workflow::Signal::stop().into(), &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::UnsupportedMessage { kind: MessageKind::Signal, .. }
        ));
    }
}
