use std::sync::Arc;

use tracing::info;

use caseflow_dto::EventEnvelope;

use crate::handler::FlowEventHandler;

/// 把生命周期事件写入结构化日志
pub struct LogHook;

impl LogHook {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait::async_trait]
impl FlowEventHandler for LogHook {
    async fn handle_event(&self, envelope: EventEnvelope) {
        info!(
            case_id = %envelope.case_id,
            event_id = %envelope.event_id,
            event = ?envelope.event,
            "flow event"
        );
    }
}
