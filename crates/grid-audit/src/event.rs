// event.rs — Audit record model and composition.
//
// Every security-relevant operation in the gateway is recorded as one
// AuditRecord: an ordered JSON object appended to the audit trail. The
// field order is part of the wire contract; downstream parsers rely on it,
// so the struct declaration order below must not change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AuditError;

/// Well-known actor recorded when the gateway itself initiates an operation
/// (certificate renewal, scheduled cleanup) rather than a human or a client
/// service.
pub const GRID_USER: &str = "gridlink";

/// Sentinel actor substituted when a composition operation is given no
/// actor at all.
const SYSTEM_USER: &str = "system";

/// Suffix appended to the event name of every failure record, exactly once.
const FAILURE_SUFFIX: &str = " failed";

/// One entry in the audit trail — a single security-relevant occurrence.
///
/// Serialized as one JSON object per line. `user` and `data` are always
/// present in the output (an absent value serializes as an explicit JSON
/// `null`); `reason`, `warning`, `auth` and `url` are omitted entirely when
/// not set. Existing consumers of the trail depend on this asymmetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Event name as supplied by the caller, with " failed" appended iff
    /// this record describes a failure.
    pub event: String,

    /// The actor who initiated the event. Always serialized, null allowed.
    pub user: Option<String>,

    /// Why the operation failed. Only present when a reason was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Present on failure records only: true when the failure stems from an
    /// unhandled-warning condition, false for a hard error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<bool>,

    /// Authentication type used for the operation, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,

    /// URL the operation targeted, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Arbitrary structured detail supplied by the caller. Always
    /// serialized, null allowed.
    pub data: Option<Value>,
}

/// The optional inputs of one audit event, independent of its outcome.
///
/// Call sites differ in which of these they can supply, so every field is
/// optional with a builder-style setter. An empty set is valid: the record
/// then carries the sentinel actor and a null `data` payload.
#[derive(Debug, Clone, Default)]
pub struct EventFields {
    pub user: Option<String>,
    pub reason: Option<String>,
    pub auth: Option<String>,
    pub url: Option<String>,
    pub data: Option<Value>,
}

impl EventFields {
    /// Empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initiating actor and return self (builder pattern).
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the failure reason and return self.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the authentication type and return self.
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Set the target URL and return self.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the structured detail payload and return self.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl AuditRecord {
    /// Build a record for a successful event.
    ///
    /// `reason` and `warning` never appear on success records; a reason left
    /// in `fields` is discarded.
    pub fn success(event: &str, fields: EventFields) -> Self {
        Self::assemble(event, EventFields { reason: None, ..fields }, false, false)
    }

    /// Build a record for a failed event: " failed" is appended to the
    /// event name and the record carries `warning: false`.
    pub fn failure(event: &str, fields: EventFields) -> Self {
        Self::assemble(event, fields, true, false)
    }

    /// Build a record for a failure caused by an unhandled warning: as
    /// [`failure`](Self::failure), but with `warning: true`.
    pub fn warning_failure(event: &str, fields: EventFields) -> Self {
        Self::assemble(event, fields, true, true)
    }

    /// General composition with explicit outcome flags.
    ///
    /// Rejects `warning` without `failure` before assembling anything;
    /// that combination is contradictory and must never reach a sink.
    pub fn compose(
        event: &str,
        fields: EventFields,
        failure: bool,
        warning: bool,
    ) -> Result<Self, AuditError> {
        if warning && !failure {
            return Err(AuditError::WarningWithoutFailure);
        }
        Ok(Self::assemble(event, fields, failure, warning))
    }

    /// Assemble the record fields in their fixed order. Callers have
    /// already ruled out the warning-without-failure combination.
    fn assemble(event: &str, fields: EventFields, failure: bool, warning: bool) -> Self {
        let mut name = event.to_string();
        if failure {
            name.push_str(FAILURE_SUFFIX);
        }

        Self {
            event: name,
            user: fields.user.or_else(|| Some(SYSTEM_USER.to_string())),
            reason: fields.reason,
            warning: if failure { Some(warning) } else { None },
            auth: fields.auth,
            url: fields.url,
            data: fields.data,
        }
    }

    /// Serialize to the single-line JSON wire form.
    pub fn to_json(&self) -> Result<String, AuditError> {
        Ok(serde_json::to_string(self)?)
    }
}
