pub mod derive;
pub mod error;
pub mod state;
pub mod transition;

pub use derive::{compute_current_status, compute_current_step, refresh_derived_state};
pub use error::{FlowError, Result};
pub use state::{
    build_collection_flow_state, get_collection_flow_state, put_collection_flow_state,
    COLLECTION_FLOW_STATE_PATH,
};
pub use transition::{set_step_state, set_steps_to_edit, update_step};
