// error.rs — Error types for the audit facility.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while composing or emitting audit records.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The warning flag was requested on a non-failure record. This is a
    /// contract violation at the call site; nothing is emitted.
    #[error("warning flag requires failure status")]
    WarningWithoutFailure,

    /// Failed to open or create an audit trail file.
    #[error("failed to open audit trail at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The sink rejected a write.
    #[error("failed to append audit record: {0}")]
    WriteFailed(#[from] std::io::Error),

    /// Failed to serialize or deserialize a record.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
