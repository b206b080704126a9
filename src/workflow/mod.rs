// 工作流模块 - 节点、消息、图与构建器

pub mod builder;
pub mod context;
pub mod events;
pub mod executor;
pub mod graph;
pub mod message;

pub use builder::WorkflowBuilder;
pub use context::WorkflowContext;
pub use events::WorkflowEvent;
pub use executor::{Executor, HandlerExecutor};
pub use graph::{EdgeTopology, ExecutorTopology, GraphTopology, Workflow};
pub use message::{MessageKind, MessagePayload, Signal, WorkflowMessage};
