pub mod error;
pub mod memory;
pub mod store;

pub use error::StorageError;
pub use memory::MemoryContextStore;
pub use store::{ContextRecord, ContextStore};
