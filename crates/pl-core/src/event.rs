//! Punch events, the raw material of the attendance log.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{PunchKind, RecordId};

/// A single punch in the attendance log.
///
/// The log is append-only: punches are recorded at "now", so insertion order
/// is chronological order by construction. Timestamps travel as epoch
/// milliseconds in the backup format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchEvent {
    /// Unique identifier for this punch.
    pub id: RecordId,
    /// When the punch happened.
    #[serde(rename = "timestampMs", with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Whether this punch opens or closes a session.
    pub kind: PunchKind,
}

impl PunchEvent {
    /// Creates a punch with a freshly generated ID.
    ///
    /// The timestamp is clamped to millisecond precision so in-memory state
    /// round-trips through the wire format unchanged.
    #[must_use]
    pub fn record(timestamp: DateTime<Utc>, kind: PunchKind) -> Self {
        let timestamp = Utc
            .timestamp_millis_opt(timestamp.timestamp_millis())
            .single()
            .unwrap_or(timestamp);
        Self {
            id: RecordId::generate(),
            timestamp,
            kind,
        }
    }
}
