use std::time::Duration;

use futures::FutureExt;

use super::{respond, think};
use crate::agent::{Conversation, DynChatAgent};
use crate::error::Result;
use crate::workflow::{HandlerExecutor, WorkflowContext};

/// 答题方：收到问题后回答，并把对话交回出题方
pub struct StudentState {
    agent: DynChatAgent,
    think_delay: Duration,
}

impl StudentState {
    pub fn new(agent: DynChatAgent, think_delay: Duration) -> Self {
        Self { agent, think_delay }
    }

    async fn handle_teacher_question(
        &mut self,
        conversation: Conversation,
        ctx: &mut WorkflowContext,
    ) -> Result<()> {
        think(self.think_delay).await;
        respond(self.agent.as_ref(), conversation, ctx).await
    }
}

pub fn student_executor(
    id: &str,
    agent: DynChatAgent,
    think_delay: Duration,
) -> HandlerExecutor<StudentState> {
    HandlerExecutor::new(id, StudentState::new(agent, think_delay)).on::<Conversation, _>(
        |student, conversation, ctx| student.handle_teacher_question(conversation, ctx).boxed(),
    )
}
