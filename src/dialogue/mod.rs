//! 师生问答对话
//!
//! 两个 LLM Agent 分别包装成 teacher / student 节点，
//! 以 teacher -> student -> teacher 的循环连接。teacher 统计轮次，
//! 达到上限时发出 `Completed`；若配置了哨兵词且学生回答中出现，
//! 则改为 `yield_output` 一份 [`DialogueSummary`]。

mod policy;
mod student;
mod teacher;

use std::sync::Arc;
use std::time::Duration;

pub use policy::TurnPolicy;
pub use student::{student_executor, StudentState};
pub use teacher::{teacher_executor, DialogueSummary, TeacherState};

use crate::agent::{ChatAgent, Conversation, DynChatAgent, LlmAgent};
use crate::config::{DialogueConfig, ParticipantConfig};
use crate::error::Result;
use crate::llm::DynLlmClient;
use crate::workflow::{Workflow, WorkflowBuilder, WorkflowContext};

pub const QUIZ_WORKFLOW_NAME: &str = "student_teacher_quiz";

/// 调用 agent，把新消息作为进度事件发出，再把追加后的对话发往下游
pub(crate) async fn respond(
    agent: &dyn ChatAgent,
    mut conversation: Conversation,
    ctx: &mut WorkflowContext,
) -> Result<()> {
    let response = agent.run(&conversation).await?;
    for message in &response.messages {
        ctx.emit_agent_response(message.clone());
    }
    conversation.extend(response.messages);
    ctx.send_message(conversation);
    Ok(())
}

pub(crate) async fn think(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

pub fn participant_agent(
    participant: &ParticipantConfig,
    config: &DialogueConfig,
    client: DynLlmClient,
) -> DynChatAgent {
    let mut agent = LlmAgent::new(participant.name.clone(), client)
        .with_instructions(participant.instructions.clone())
        .with_temperature(config.llm.temperature);
    if let Some(timeout) = config.agent_timeout() {
        agent = agent.with_timeout(timeout);
    }
    Arc::new(agent)
}

/// 按配置创建 teacher / student 两个 agent，共用同一个 LLM 客户端
pub fn quiz_agents(config: &DialogueConfig, client: DynLlmClient) -> (DynChatAgent, DynChatAgent) {
    let teacher = participant_agent(&config.teacher, config, Arc::clone(&client));
    let student = participant_agent(&config.student, config, client);
    (teacher, student)
}

/// 构建师生问答工作流；每次运行都需要重新构建
pub fn build_quiz_workflow(
    config: &DialogueConfig,
    teacher: DynChatAgent,
    student: DynChatAgent,
) -> Result<Workflow> {
    let teacher_id = config.teacher.id.as_str();
    let student_id = config.student.id.as_str();
    let think_delay = config.think_delay();

    let mut builder = WorkflowBuilder::new(QUIZ_WORKFLOW_NAME);
    builder
        .add_executor(teacher_executor(
            teacher_id,
            teacher,
            TurnPolicy::from(config),
            think_delay,
        ))
        .add_executor(student_executor(student_id, student, think_delay))
        .add_edge(teacher_id, student_id)
        .add_edge(student_id, teacher_id)
        .set_start_executor(teacher_id);
    builder.build()
}
