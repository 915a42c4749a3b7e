use caseflow_dto::EventEnvelope;

#[async_trait::async_trait]
pub trait FlowEventHandler: Send + Sync {
    async fn handle_event(&self, envelope: EventEnvelope);
}
