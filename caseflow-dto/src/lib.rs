pub mod dto;

// Re-export commonly used types
pub use dto::action::{ActionResult, ErrorAction, ProcessStatus, SuccessAction};
pub use dto::event::{CaseEvent, EditScope, EditSentinel, StepPatch};
pub use dto::flow::{CollectionFlowState, CollectionFlowStatus, Step, StepState};
pub use dto::flow_event::{EventEnvelope, FlowEvent};
pub use dto::merge::{ArrayMergeOption, MergeOperation};
pub use dto::plugin::{CommonParams, PathProperty, PluginPayloadProperty, RunOnBinding};
