use tracing::{debug, warn};

use super::types::Delivery;
use crate::error::{Result, WorkflowError};
use crate::workflow::context::Effect;
use crate::workflow::{Executor, WorkflowContext};

/// 调用目标节点处理一次投递，返回按发出顺序排列的副作用
///
/// Handler 失败时，本次调用记录的消息和终止事件全部丢弃，其余事件随错误一起返回。
pub(crate) async fn process_delivery(
    executor: &mut dyn Executor,
    delivery: Delivery,
) -> std::result::Result<Vec<Effect>, (Vec<Effect>, WorkflowError)> {
    let Delivery {
        source,
        target,
        message,
    } = delivery;
    debug!(executor = %target, %source, kind = %message.kind(), "delivering message");

    let mut ctx = WorkflowContext::new(target.clone());
    let result: Result<()> = executor.execute(message, &mut ctx).await;
    let effects = ctx.into_effects();

    match result {
        Ok(()) => Ok(effects),
        Err(err) => {
            warn!(executor = %target, error = %err, "executor handler failed");
            let events = effects
                .into_iter()
                .filter(|effect| matches!(effect, Effect::Event(event) if !event.is_terminal()))
                .collect();
            Err((events, WorkflowError::handler(target, err)))
        }
    }
}
