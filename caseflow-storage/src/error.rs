use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("case not found: {0}")]
    NotFound(String),

    #[error("case already exists: {0}")]
    AlreadyExists(String),

    #[error("revision conflict for case '{case_id}': expected {expected}, found {actual}")]
    RevisionConflict {
        case_id: String,
        expected: u64,
        actual: u64,
    },
}
