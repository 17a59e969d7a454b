// logger.rs — Sink-bound front-end for audit emission.
//
// Components across the gateway share one AuditLogger per process and call
// the log_* operations from wherever a security-relevant operation
// completes. Composition is pure; the only side effect of any operation is
// the single sink write at the end.

use crate::error::AuditError;
use crate::event::{AuditRecord, EventFields};
use crate::sink::AuditSink;

/// Classification tag attached to every audit line handed to the sink, so
/// downstream tooling can separate audit records from ordinary operational
/// log output.
pub const AUDIT_TAG: &str = "AUDIT";

/// Composes audit records and hands each one to the injected sink.
///
/// Stateless apart from the sink handle: every call reads only its own
/// arguments and performs exactly one sink write. No retries, no
/// buffering, no batching. Calls may run concurrently from any number of
/// threads.
pub struct AuditLogger {
    sink: Box<dyn AuditSink>,
}

impl AuditLogger {
    /// Bind a logger to the sink that will receive its records.
    pub fn new(sink: Box<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Record a successful event.
    ///
    /// With no actor in `fields`, the sentinel "system" actor is recorded.
    pub fn log_success(&self, event: &str, fields: EventFields) -> Result<(), AuditError> {
        self.log_record(&AuditRecord::success(event, fields))
    }

    /// Record a failed event: " failed" is appended to the event name and
    /// the record carries `warning: false`.
    pub fn log_failure(&self, event: &str, fields: EventFields) -> Result<(), AuditError> {
        self.log_record(&AuditRecord::failure(event, fields))
    }

    /// Record a failure caused by an unhandled warning: as
    /// [`log_failure`](Self::log_failure), but with `warning: true`.
    pub fn log_warning_failure(&self, event: &str, fields: EventFields) -> Result<(), AuditError> {
        self.log_record(&AuditRecord::warning_failure(event, fields))
    }

    /// General form with explicit outcome flags.
    ///
    /// Rejects `warning` without `failure` before composing; nothing is
    /// serialized and the sink is not touched on rejection.
    pub fn log_event(
        &self,
        event: &str,
        fields: EventFields,
        failure: bool,
        warning: bool,
    ) -> Result<(), AuditError> {
        let record = AuditRecord::compose(event, fields, failure, warning)?;
        self.log_record(&record)
    }

    /// Serialize an already-composed record and hand it to the sink.
    pub fn log_record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let line = record.to_json()?;
        self.log_raw(&line)
    }

    /// Forward a pre-built JSON line to the sink unchanged.
    ///
    /// Escape hatch for callers that already hold a fully formed record.
    /// No validation or re-serialization is performed.
    pub fn log_raw(&self, line: &str) -> Result<(), AuditError> {
        self.sink.write(AUDIT_TAG, line)?;
        Ok(())
    }
}
