pub mod error;
pub mod merge;
pub mod path;

pub use error::{ContextError, Result};
pub use merge::{deep_merge_with_options, merge};
pub use path::{get_path, set_path};
