use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::flow::{CollectionFlowStatus, StepState};
use crate::dto::merge::ArrayMergeOption;

/// 引擎生命周期事件，供观测/审计挂钩消费
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FlowEvent {
    EventReceived {
        case_id: String,
        event_type: String,
    },
    ContextMerged {
        case_id: String,
        array_merge_option: ArrayMergeOption,
    },
    StepTransitioned {
        case_id: String,
        step_name: String,
        state: StepState,
    },
    StatusChanged {
        case_id: String,
        status: CollectionFlowStatus,
    },
    PluginSucceeded {
        case_id: String,
        plugin_name: String,
    },
    PluginFailed {
        case_id: String,
        plugin_name: String,
        message: String,
    },
}

impl FlowEvent {
    pub fn case_id(&self) -> &str {
        match self {
            FlowEvent::EventReceived { case_id, .. }
            | FlowEvent::ContextMerged { case_id, .. }
            | FlowEvent::StepTransitioned { case_id, .. }
            | FlowEvent::StatusChanged { case_id, .. }
            | FlowEvent::PluginSucceeded { case_id, .. }
            | FlowEvent::PluginFailed { case_id, .. } => case_id,
        }
    }
}

/// 事件信封：附带 id 与时间戳后再交给各个 handler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub case_id: String,
    pub event: FlowEvent,
}

impl EventEnvelope {
    pub fn wrap(event: FlowEvent) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            case_id: event.case_id().to_string(),
            event,
        }
    }
}
