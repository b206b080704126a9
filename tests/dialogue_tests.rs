use std::sync::Arc;

use turnflow::{
    build_quiz_workflow, quiz_agents, DialogueConfig, DialogueSummary, LocalEchoClient, Role,
    RunStatus, ScriptedClient, WorkflowError, WorkflowEvent, WorkflowRunResult,
};

fn quiz_config(max_turns: u32) -> DialogueConfig {
    DialogueConfig {
        max_turns,
        ..DialogueConfig::default()
    }
}

async fn run_quiz(config: &DialogueConfig, client: ScriptedClient) -> turnflow::Result<WorkflowRunResult> {
    let (teacher, student) = quiz_agents(config, Arc::new(client));
    let workflow = build_quiz_workflow(config, teacher, student)?;
    workflow.run(config.start_message.clone()).await
}

fn speakers(result: &WorkflowRunResult) -> Vec<String> {
    result
        .events
        .iter()
        .filter_map(|event| match event {
            WorkflowEvent::AgentResponse { executor_id, .. } => Some(executor_id.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn five_turn_quiz_alternates_and_completes_once() -> anyhow::Result<()> {
    let client = ScriptedClient::default().with_fallback("reply");
    let config = quiz_config(5);
    let result = run_quiz(&config, client.clone()).await?;

    assert!(result.is_completed());
    assert_eq!(result.count(|e| matches!(e, WorkflowEvent::Completed)), 1);
    assert!(matches!(result.events.last(), Some(WorkflowEvent::Completed)));

    let speakers = speakers(&result);
    assert_eq!(speakers.len(), 10);
    for (i, speaker) in speakers.iter().enumerate() {
        let expected = if i % 2 == 0 { "teacher" } else { "student" };
        assert_eq!(speaker, expected, "turn {} out of order", i);
    }

    // 每次调用都看到完整的对话：起始用户消息加上之前所有回复
    let requests = client.requests();
    assert_eq!(requests.len(), 10);
    for (i, request) in requests.iter().enumerate() {
        assert_eq!(request.messages.len(), i + 1);
        assert_eq!(request.messages[0].role, Role::User.as_str());
        assert_eq!(request.messages[0].content, "Start the quiz session.");
    }
    assert!(requests[0].system.as_deref().unwrap_or_default().contains("teacher"));
    assert!(requests[1].system.as_deref().unwrap_or_default().contains("student"));
    Ok(())
}

#[tokio::test]
async fn agent_responses_carry_author_names() -> anyhow::Result<()> {
    let client = ScriptedClient::new(["What is 2 + 2?", "4"]).with_fallback("ok");
    let result = run_quiz(&quiz_config(1), client).await?;

    let messages: Vec<_> = result
        .events
        .iter()
        .filter_map(|event| match event {
            WorkflowEvent::AgentResponse { message, .. } => Some(message.clone()),
            _ => None,
        })
        .collect();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].author_name(), Some("Teacher"));
    assert_eq!(messages[0].content(), "What is 2 + 2?");
    assert_eq!(messages[1].author_name(), Some("Student"));
    assert_eq!(messages[1].role(), Role::Assistant);
    Ok(())
}

#[tokio::test]
async fn single_turn_limit_stops_after_one_round_trip() -> anyhow::Result<()> {
    let client = ScriptedClient::default().with_fallback("reply");
    let result = run_quiz(&quiz_config(1), client.clone()).await?;

    assert!(result.is_completed());
    assert_eq!(speakers(&result), vec!["teacher", "student"]);
    assert_eq!(client.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn zero_turn_limit_completes_without_calling_agents() -> anyhow::Result<()> {
    let client = ScriptedClient::default();
    let result = run_quiz(&quiz_config(0), client.clone()).await?;

    assert_eq!(result.status, RunStatus::Completed);
    assert!(speakers(&result).is_empty());
    assert_eq!(client.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn sentinel_in_student_answer_yields_summary() -> anyhow::Result<()> {
    let client = ScriptedClient::new([
        "Name a planet.",
        "Mars.",
        "Say the word when you are done.",
        "Quiz Complete, thanks!",
    ]);
    let config = DialogueConfig {
        sentinel: Some("COMPLETE".to_string()),
        ..quiz_config(5)
    };
    let result = run_quiz(&config, client.clone()).await?;

    let output = result.output().cloned().expect("sentinel should produce an output");
    let summary: DialogueSummary = serde_json::from_value(output)?;
    assert_eq!(summary.turns, 2);
    assert_eq!(summary.sentinel, "COMPLETE");
    assert_eq!(summary.last_message, "Quiz Complete, thanks!");
    assert_eq!(summary.transcript.len(), 5);

    assert_eq!(result.count(|e| matches!(e, WorkflowEvent::Completed)), 0);
    assert_eq!(result.count(WorkflowEvent::is_terminal), 1);
    assert_eq!(client.call_count(), 4);
    Ok(())
}

#[tokio::test]
async fn sentinel_in_teacher_question_is_ignored() -> anyhow::Result<()> {
    let client = ScriptedClient::new(["Are you done?", "No."]).with_fallback("next");
    let config = DialogueConfig {
        sentinel: Some("done".to_string()),
        ..quiz_config(2)
    };
    let result = run_quiz(&config, client).await?;

    assert!(result.is_completed());
    assert_eq!(speakers(&result).len(), 4);
    Ok(())
}

#[tokio::test]
async fn agent_failure_surfaces_as_handler_error() -> anyhow::Result<()> {
    let client = ScriptedClient::new(["First question?"]);
    let err = run_quiz(&quiz_config(3), client).await.unwrap_err();

    match err {
        WorkflowError::Handler { executor, source } => {
            assert_eq!(executor, "student");
            assert!(matches!(*source, WorkflowError::Agent { ref agent, .. } if agent == "Student"));
        }
        other => panic!("expected handler error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn repeated_runs_start_from_a_fresh_turn_count() -> anyhow::Result<()> {
    let config = quiz_config(2);
    for _ in 0..2 {
        let client = ScriptedClient::default().with_fallback("reply");
        let result = run_quiz(&config, client.clone()).await?;
        assert!(result.is_completed());
        assert_eq!(client.call_count(), 4);
    }
    Ok(())
}

#[tokio::test]
async fn offline_echo_client_runs_full_quiz() -> anyhow::Result<()> {
    let config = quiz_config(3);
    let (teacher, student) = quiz_agents(&config, Arc::new(LocalEchoClient));
    let result = build_quiz_workflow(&config, teacher, student)?
        .run(config.start_message.clone())
        .await?;

    assert!(result.is_completed());
    assert_eq!(speakers(&result).len(), 6);
    Ok(())
}

#[test]
fn quiz_topology_is_a_two_node_cycle() -> anyhow::Result<()> {
    let config = DialogueConfig::default();
    let (teacher, student) = quiz_agents(&config, Arc::new(LocalEchoClient));
    let workflow = build_quiz_workflow(&config, teacher, student)?;

    assert_eq!(workflow.start_executor(), "teacher");
    assert_eq!(workflow.targets("teacher"), vec!["student"]);
    assert_eq!(workflow.targets("student"), vec!["teacher"]);
    Ok(())
}
