use std::sync::Arc;

use caseflow_dto::{EventEnvelope, FlowEvent};

use crate::handler::FlowEventHandler;

/// 生命周期事件分发器：打上信封后逐个交给已注册 handler。
///
/// handler 内部失败自行消化，分发器不中断后续 handler。
pub struct FlowEventDispatcher {
    handlers: Vec<Arc<dyn FlowEventHandler>>,
}

impl FlowEventDispatcher {
    pub fn new(handlers: Vec<Arc<dyn FlowEventHandler>>) -> Self {
        Self { handlers }
    }

    /// 没有任何 handler 的空分发器
    pub fn noop() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub async fn dispatch(&self, event: FlowEvent) {
        let envelope = EventEnvelope::wrap(event);
        for handler in &self.handlers {
            handler.handle_event(envelope.clone()).await;
        }
    }
}
