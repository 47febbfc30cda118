//! Shared types for logsift
//!
//! This crate contains the data structures used across multiple logsift
//! crates: log records, search demands, and the constraints a demand
//! translates into.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp rendering used for stored log rows and range bounds.
///
/// Fixed-width and second-precision, so lexicographic comparison of two
/// rendered timestamps matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Log Records
// ============================================================================

/// Log severity level (PSR-3 style set used by the log table)
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LogLevel {
    /// Parse a log level from common spellings
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Some(Self::Debug),
            "info" | "information" => Some(Self::Info),
            "notice" => Some(Self::Notice),
            "warning" | "warn" => Some(Self::Warning),
            "error" | "err" => Some(Self::Error),
            "critical" | "crit" => Some(Self::Critical),
            "alert" => Some(Self::Alert),
            "emergency" | "panic" => Some(Self::Emergency),
            _ => None,
        }
    }

    /// Canonical lowercase name, as stored in log rows
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
            Self::Alert => "alert",
            Self::Emergency => "emergency",
        }
    }
}

/// A single persisted log row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// When the entry was written (local wall clock, second precision)
    pub datetime: NaiveDateTime,

    /// Severity level
    pub level: LogLevel,

    /// Execution-context tag (e.g. "BE", "FE", "CLI")
    #[serde(default)]
    pub mode: String,

    /// Logger channel the entry was written to
    #[serde(default)]
    pub channel: String,

    /// Request correlation id
    #[serde(default)]
    pub request_id: String,

    /// Id of the acting user, 0 when unattributed
    #[serde(default)]
    pub user_id: i64,

    /// Log message text
    #[serde(default)]
    pub message: String,
}

impl LogRecord {
    /// Create a record with minimal fields
    pub fn new(datetime: NaiveDateTime, level: LogLevel, message: String) -> Self {
        Self {
            datetime,
            level,
            mode: String::new(),
            channel: String::new(),
            request_id: String::new(),
            user_id: 0,
            message,
        }
    }

    /// Render a field the way constraints compare it
    pub fn field_value(&self, field: Field) -> String {
        match field {
            Field::Level => self.level.as_str().to_string(),
            Field::Mode => self.mode.clone(),
            Field::Channel => self.channel.clone(),
            Field::RequestId => self.request_id.clone(),
            Field::UserId => self.user_id.to_string(),
            Field::Datetime => self.datetime.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

// ============================================================================
// Constraints
// ============================================================================

/// Queryable field of a log row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Level,
    Mode,
    Channel,
    RequestId,
    UserId,
    Datetime,
}

impl Field {
    /// Column name in the backing store
    pub fn name(&self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::Mode => "mode",
            Self::Channel => "channel",
            Self::RequestId => "request_id",
            Self::UserId => "user_id",
            Self::Datetime => "datetime",
        }
    }
}

/// A single query predicate
///
/// A constraint list is always combined with logical AND; see [`all_of`].
/// Values are compared as strings; datetime bounds use the fixed-width
/// [`TIMESTAMP_FORMAT`] rendering, so string order equals time order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    Equals(Field, String),
    In(Field, BTreeSet<String>),
    GreaterOrEqual(Field, String),
    LessOrEqual(Field, String),
}

impl Constraint {
    /// The field this constraint applies to
    pub fn field(&self) -> Field {
        match self {
            Self::Equals(field, _)
            | Self::In(field, _)
            | Self::GreaterOrEqual(field, _)
            | Self::LessOrEqual(field, _) => *field,
        }
    }

    /// Check whether a record satisfies this constraint
    pub fn matches(&self, record: &LogRecord) -> bool {
        let actual = record.field_value(self.field());
        match self {
            Self::Equals(_, value) => actual == *value,
            Self::In(_, values) => values.contains(&actual),
            Self::GreaterOrEqual(_, value) => actual.as_str() >= value.as_str(),
            Self::LessOrEqual(_, value) => actual.as_str() <= value.as_str(),
        }
    }
}

/// AND combinator over a constraint list
///
/// An empty list matches every record.
pub fn all_of(constraints: &[Constraint], record: &LogRecord) -> bool {
    constraints.iter().all(|c| c.matches(record))
}

// ============================================================================
// Demands
// ============================================================================

/// Named calendar-relative time window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateRangePreset {
    ThisWeek,
    LastWeek,
    Last7Days,
    ThisMonth,
    LastMonth,
    Last31Days,
    Custom,
}

impl DateRangePreset {
    /// Map a numeric range code to a preset; unknown codes select nothing
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::ThisWeek),
            2 => Some(Self::LastWeek),
            3 => Some(Self::Last7Days),
            4 => Some(Self::ThisMonth),
            5 => Some(Self::LastMonth),
            6 => Some(Self::Last31Days),
            7 => Some(Self::Custom),
            _ => None,
        }
    }

    /// The numeric range code for this preset
    pub fn code(&self) -> u8 {
        match self {
            Self::ThisWeek => 1,
            Self::LastWeek => 2,
            Self::Last7Days => 3,
            Self::ThisMonth => 4,
            Self::LastMonth => 5,
            Self::Last31Days => 6,
            Self::Custom => 7,
        }
    }

    /// Display label for this preset
    pub fn label(&self) -> &'static str {
        match self {
            Self::ThisWeek => "this week",
            Self::LastWeek => "last week",
            Self::Last7Days => "last 7 days",
            Self::ThisMonth => "this month",
            Self::LastMonth => "last month",
            Self::Last31Days => "last 31 days",
            Self::Custom => "custom",
        }
    }
}

/// Immutable filter request for a log search
///
/// Built once with the `with_*` methods, then read-only: translation code
/// only sees the getters. Empty sets mean "unconstrained".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Demand {
    levels: BTreeSet<LogLevel>,
    modes: BTreeSet<String>,
    channels: BTreeSet<String>,
    request_id: Option<String>,
    actor: Option<String>,
    date_range: Option<DateRangePreset>,
    date_start: Option<String>,
    date_end: Option<String>,
}

impl Demand {
    /// Create an unconstrained demand (matches all rows)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set severity levels to filter by
    pub fn with_levels(mut self, levels: BTreeSet<LogLevel>) -> Self {
        self.levels = levels;
        self
    }

    /// Set execution-context tags to filter by
    pub fn with_modes(mut self, modes: BTreeSet<String>) -> Self {
        self.modes = modes;
        self
    }

    /// Set channels to filter by
    pub fn with_channels(mut self, channels: BTreeSet<String>) -> Self {
        self.channels = channels;
        self
    }

    /// Require an exact request id; an empty string clears the filter
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into()).filter(|s| !s.is_empty());
        self
    }

    /// Require an acting user, given as a `<mode>_<id>` selector
    /// (e.g. `BE_12`); an empty string clears the filter
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into()).filter(|s| !s.is_empty());
        self
    }

    /// Restrict results to a calendar-relative time window
    pub fn with_date_range(mut self, preset: DateRangePreset) -> Self {
        self.date_range = Some(preset);
        self
    }

    /// Lower bound for the custom range; an empty string clears it
    pub fn with_date_start(mut self, raw: impl Into<String>) -> Self {
        self.date_start = Some(raw.into()).filter(|s| !s.is_empty());
        self
    }

    /// Upper bound for the custom range; an empty string clears it
    pub fn with_date_end(mut self, raw: impl Into<String>) -> Self {
        self.date_end = Some(raw.into()).filter(|s| !s.is_empty());
        self
    }

    pub fn levels(&self) -> &BTreeSet<LogLevel> {
        &self.levels
    }

    pub fn modes(&self) -> &BTreeSet<String> {
        &self.modes
    }

    pub fn channels(&self) -> &BTreeSet<String> {
        &self.channels
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    pub fn date_range(&self) -> Option<DateRangePreset> {
        self.date_range
    }

    pub fn date_start(&self) -> Option<&str> {
        self.date_start.as_deref()
    }

    pub fn date_end(&self) -> Option<&str> {
        self.date_end.as_deref()
    }
}

/// Intent object for emptying the log store
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClearRequest {
    all: bool,
}

impl ClearRequest {
    pub fn new(all: bool) -> Self {
        Self { all }
    }

    /// Request a full truncation
    pub fn all() -> Self {
        Self { all: true }
    }

    pub fn is_all(&self) -> bool {
        self.all
    }
}
