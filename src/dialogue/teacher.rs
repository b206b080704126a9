use std::time::Duration;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::policy::TurnPolicy;
use super::{respond, think};
use crate::agent::{ChatMessage, Conversation, DynChatAgent};
use crate::error::Result;
use crate::workflow::{HandlerExecutor, WorkflowContext};

/// 哨兵词触发提前结束时产出的结果
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DialogueSummary {
    pub turns: u32,
    pub sentinel: String,
    pub last_message: String,
    pub transcript: Conversation,
}

/// 出题方：开启对话、统计轮次并决定何时结束
pub struct TeacherState {
    agent: DynChatAgent,
    policy: TurnPolicy,
    think_delay: Duration,
    turn_count: u32,
}

impl TeacherState {
    pub fn new(agent: DynChatAgent, policy: TurnPolicy, think_delay: Duration) -> Self {
        Self {
            agent,
            policy,
            think_delay,
            turn_count: 0,
        }
    }

    async fn handle_start_message(&mut self, prompt: String, ctx: &mut WorkflowContext) -> Result<()> {
        if self.policy.limit_reached(self.turn_count) {
            info!(max_turns = self.policy.max_turns, "turn limit reached before the first question");
            ctx.complete();
            return Ok(());
        }

        let conversation = Conversation::from(ChatMessage::user(prompt));
        respond(self.agent.as_ref(), conversation, ctx).await
    }

    async fn handle_student_answer(
        &mut self,
        conversation: Conversation,
        ctx: &mut WorkflowContext,
    ) -> Result<()> {
        self.turn_count += 1;

        if self.policy.sentinel_in(&conversation) {
            let sentinel = self.policy.sentinel.clone().unwrap_or_default();
            info!(turns = self.turn_count, %sentinel, "sentinel found, ending dialogue");
            let summary = DialogueSummary {
                turns: self.turn_count,
                sentinel,
                last_message: conversation
                    .last()
                    .map(|m| m.content().to_string())
                    .unwrap_or_default(),
                transcript: conversation,
            };
            return ctx.yield_output(summary);
        }

        think(self.think_delay).await;

        if self.policy.limit_reached(self.turn_count) {
            info!(turns = self.turn_count, "turn limit reached");
            ctx.complete();
            return Ok(());
        }

        respond(self.agent.as_ref(), conversation, ctx).await
    }
}

pub fn teacher_executor(
    id: &str,
    agent: DynChatAgent,
    policy: TurnPolicy,
    think_delay: Duration,
) -> HandlerExecutor<TeacherState> {
    HandlerExecutor::new(id, TeacherState::new(agent, policy, think_delay))
        .on::<String, _>(|teacher, prompt, ctx| teacher.handle_start_message(prompt, ctx).boxed())
        .on::<Conversation, _>(|teacher, conversation, ctx| {
            teacher.handle_student_answer(conversation, ctx).boxed()
        })
}
