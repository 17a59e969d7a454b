//! # grid-audit
//!
//! Uniform audit-event emission for the Gridlink gateway.
//!
//! Components across the gateway record security-relevant operations
//! (successes, failures, failures caused by unhandled warnings) through a
//! single contract: an [`AuditRecord`] with a fixed field order is composed
//! from the caller's inputs, serialized to one JSON line, and handed to an
//! append-only [`AuditSink`] tagged [`AUDIT_TAG`].
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use grid_audit::{AuditLogger, EventFields, FileSink};
//! use serde_json::json;
//!
//! let sink = FileSink::open("/var/log/gridlink/audit.jsonl").unwrap();
//! let audit = AuditLogger::new(Box::new(sink));
//!
//! audit
//!     .log_success("login", EventFields::new().with_user("alice"))
//!     .unwrap();
//! audit
//!     .log_failure(
//!         "login",
//!         EventFields::new()
//!             .with_user("alice")
//!             .with_reason("bad password")
//!             .with_data(json!({"ip": "10.0.0.1"})),
//!     )
//!     .unwrap();
//! ```

pub mod error;
pub mod event;
pub mod logger;
pub mod sink;

// Re-export the main types at the crate root for convenience.
pub use error::AuditError;
pub use event::{AuditRecord, EventFields, GRID_USER};
pub use logger::{AuditLogger, AUDIT_TAG};
pub use sink::{AuditSink, FileSink, TracingSink};
