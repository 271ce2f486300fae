//! Core type definitions with validation.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The value was not a canonical `YYYY-MM-DD` calendar day.
    #[error("invalid calendar day: {value}")]
    InvalidDay { value: String },

    /// A weekday index outside 0..=6.
    #[error("weekday index must be 0 (Sunday) through 6 (Saturday), got {value}")]
    WeekdayOutOfRange { value: u8 },

    /// Invalid punch kind value.
    #[error("unknown punch kind: {value}")]
    InvalidPunchKind { value: String },

    /// Invalid leave kind value.
    #[error("unknown leave kind: {value}")]
    InvalidLeaveKind { value: String },
}

/// A validated record identifier.
///
/// Record IDs must be non-empty strings. Freshly created records get a
/// generated UUID; imported records keep whatever ID the backup carried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty { field: "record ID" });
        }
        Ok(Self(id))
    }

    /// Generates a fresh random ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A canonical `YYYY-MM-DD` calendar-day key in local time.
///
/// Leave and holiday records are keyed by this form, and all date equality
/// in the ledger is string-exact on it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(String);

impl DayKey {
    /// Parses and canonicalizes a `YYYY-MM-DD` string.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDay {
                value: value.clone(),
            })?;
        // Re-format so "2025-1-5" style inputs never slip through as keys.
        Ok(Self::from_date(date))
    }

    /// Builds the key for a calendar date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the calendar date this key names.
    #[must_use]
    pub fn to_date(&self) -> NaiveDate {
        // Constructors guarantee the canonical format.
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").unwrap_or_default()
    }

    /// Returns the calendar year of this key.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.to_date().year()
    }
}

impl TryFrom<String> for DayKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.0
    }
}

impl FromStr for DayKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a punch event opens or closes a work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PunchKind {
    Entry,
    Exit,
}

impl PunchKind {
    /// String representation for storage and the export format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "ENTRY",
            Self::Exit => "EXIT",
        }
    }
}

impl fmt::Display for PunchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PunchKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENTRY" => Ok(Self::Entry),
            "EXIT" => Ok(Self::Exit),
            _ => Err(ValidationError::InvalidPunchKind {
                value: s.to_string(),
            }),
        }
    }
}

/// Leave category, each with its own yearly quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveKind {
    Sick,
    Casual,
}

impl LeaveKind {
    /// String representation for storage and the export format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sick => "SICK",
            Self::Casual => "CASUAL",
        }
    }
}

impl fmt::Display for LeaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LeaveKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SICK" => Ok(Self::Sick),
            "CASUAL" => Ok(Self::Casual),
            _ => Err(ValidationError::InvalidLeaveKind {
                value: s.to_string(),
            }),
        }
    }
}

/// Weekdays exempt from goal enforcement, as 0=Sunday..6=Saturday indices.
///
/// Serialized as a JSON array of integers to match the backup format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(BTreeSet<u8>);

impl WeekdaySet {
    /// Builds a set from weekday indices, rejecting values outside 0..=6.
    pub fn new(days: impl IntoIterator<Item = u8>) -> Result<Self, ValidationError> {
        let mut set = BTreeSet::new();
        for day in days {
            if day > 6 {
                return Err(ValidationError::WeekdayOutOfRange { value: day });
            }
            set.insert(day);
        }
        Ok(Self(set))
    }

    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether the given weekday index is in the set.
    #[must_use]
    pub fn contains_index(&self, index: u8) -> bool {
        self.0.contains(&index)
    }

    /// Whether the given weekday is in the set.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn contains(&self, weekday: Weekday) -> bool {
        self.contains_index(weekday.num_days_from_sunday() as u8)
    }

    /// Iterates the indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Number of weekdays in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for WeekdaySet {
    /// Sunday off, matching the stored-data default.
    fn default() -> Self {
        Self(BTreeSet::from([0]))
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = ValidationError;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.0.into_iter().collect()
    }
}
