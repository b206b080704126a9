use futures::FutureExt;

use turnflow::workflow::EdgeTopology;
use turnflow::{
    ConfigurationError, Conversation, HandlerExecutor, MessageKind, WorkflowBuilder,
    WorkflowError,
};

fn node(id: &str) -> HandlerExecutor<()> {
    HandlerExecutor::new(id, ()).on::<String, _>(|_, text, ctx| {
        async move {
            ctx.send_message(text);
            Ok(())
        }
        .boxed()
    })
}

fn configuration_error(err: WorkflowError) -> ConfigurationError {
    match err {
        WorkflowError::Configuration(inner) => inner,
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn two_node_cycle_is_accepted() -> anyhow::Result<()> {
    let mut builder = WorkflowBuilder::new("cycle");
    builder
        .add_executor(node("teacher"))
        .add_executor(node("student"))
        .add_edge("teacher", "student")
        .add_edge("student", "teacher")
        .set_start_executor("teacher");

    let workflow = builder.build()?;
    assert_eq!(workflow.name(), "cycle");
    assert_eq!(workflow.start_executor(), "teacher");
    assert_eq!(workflow.executor_ids(), ["teacher", "student"]);
    assert_eq!(workflow.targets("teacher"), vec!["student"]);
    assert_eq!(workflow.targets("student"), vec!["teacher"]);
    assert!(workflow.accepts("student", MessageKind::Text));
    assert!(!workflow.accepts("student", MessageKind::Conversation));
    Ok(())
}

#[test]
fn missing_start_executor_is_rejected() {
    let mut builder = WorkflowBuilder::default();
    builder.add_executor(node("a"));
    let err = configuration_error(builder.build().err().expect("build must fail"));
    assert_eq!(err, ConfigurationError::MissingStartExecutor);
}

#[test]
fn unknown_start_executor_is_rejected() {
    let mut builder = WorkflowBuilder::default();
    builder.add_executor(node("a")).set_start_executor("ghost");
    let err = configuration_error(builder.build().err().expect("build must fail"));
    assert_eq!(err, ConfigurationError::UnknownStartExecutor("ghost".into()));
}

#[test]
fn edge_to_unregistered_executor_is_rejected() {
    let mut builder = WorkflowBuilder::default();
    builder
        .add_executor(node("a"))
        .add_edge("a", "missing")
        .set_start_executor("a");
    let err = configuration_error(builder.build().err().expect("build must fail"));
    assert_eq!(
        err,
        ConfigurationError::DanglingEdge {
            source_id: "a".into(),
            target: "missing".into(),
            missing: "missing".into(),
        }
    );
}

#[test]
fn duplicate_executor_ids_are_rejected() {
    let mut builder = WorkflowBuilder::default();
    builder
        .add_executor(node("a"))
        .add_executor(node("a"))
        .set_start_executor("a");
    let err = configuration_error(builder.build().err().expect("build must fail"));
    assert_eq!(err, ConfigurationError::DuplicateExecutor("a".into()));
}

#[test]
fn start_executor_without_edges_is_rejected_in_larger_graphs() {
    let mut builder = WorkflowBuilder::default();
    builder
        .add_executor(node("a"))
        .add_executor(node("b"))
        .add_executor(node("c"))
        .add_edge("b", "c")
        .set_start_executor("a");
    let err = configuration_error(builder.build().err().expect("build must fail"));
    assert_eq!(err, ConfigurationError::DetachedStartExecutor("a".into()));
}

#[test]
fn single_executor_graph_needs_no_edges() -> anyhow::Result<()> {
    let mut builder = WorkflowBuilder::default();
    builder.add_executor(node("solo")).set_start_executor("solo");
    let workflow = builder.build()?;
    assert!(workflow.targets("solo").is_empty());
    Ok(())
}

#[test]
fn executor_without_handlers_is_rejected() {
    let mut builder = WorkflowBuilder::default();
    builder
        .add_executor(HandlerExecutor::new("empty", ()))
        .set_start_executor("empty");
    let err = configuration_error(builder.build().err().expect("build must fail"));
    assert_eq!(err, ConfigurationError::NoHandlers("empty".into()));
}

#[test]
fn second_handler_for_same_kind_is_rejected() {
    let doubled = node("doubled").on::<String, _>(|_, _text, _ctx| async move { Ok(()) }.boxed());
    let mut builder = WorkflowBuilder::default();
    builder.add_executor(doubled).set_start_executor("doubled");
    let err = configuration_error(builder.build().err().expect("build must fail"));
    assert_eq!(
        err,
        ConfigurationError::DuplicateHandler {
            executor: "doubled".into(),
            kind: MessageKind::Text,
        }
    );
}

#[test]
fn invalid_executor_ids_are_rejected() {
    for id in ["", "has space", "slash/name"] {
        let mut builder = WorkflowBuilder::default();
        builder.add_executor(node(id)).set_start_executor(id);
        let err = configuration_error(builder.build().err().expect("build must fail"));
        assert_eq!(err, ConfigurationError::InvalidExecutorId(id.into()));
    }
}

#[test]
fn duplicate_edges_collapse_and_topology_serializes() -> anyhow::Result<()> {
    let receiver = HandlerExecutor::new("receiver", ())
        .on::<Conversation, _>(|_, _conversation, _ctx| async move { Ok(()) }.boxed());

    let mut builder = WorkflowBuilder::new("topology");
    builder
        .add_executor(node("sender"))
        .add_executor(receiver)
        .add_edge("sender", "receiver")
        .add_edge("sender", "receiver")
        .set_start_executor("sender");
    let topology = builder.build()?.topology();

    assert_eq!(
        topology.edges,
        vec![EdgeTopology {
            source: "sender".into(),
            target: "receiver".into(),
        }]
    );
    assert_eq!(topology.executors[1].accepts, vec![MessageKind::Conversation]);

    let json = serde_json::to_value(&topology)?;
    assert_eq!(json["start"], "sender");
    assert_eq!(json["executors"][0]["accepts"][0], "text");
    Ok(())
}
