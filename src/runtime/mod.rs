// 运行时执行引擎模块

mod controller;
mod processor;
mod types;

pub(crate) use controller::RunController;
pub use types::{RunStatus, WorkflowEventStream, WorkflowRunResult};
