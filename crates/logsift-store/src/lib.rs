//! Log persistence seam for logsift
//!
//! This crate defines the [`LogStore`] trait the query core runs against,
//! an in-memory implementation backed by a shared record vector, and a
//! JSONL loader for file-based stores.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

mod error;
mod jsonl;
mod memory;

pub use error::StoreError;
pub use jsonl::{load_records, parse_record};
pub use memory::MemoryStore;

use logsift_query::constraints_from_demand;

// Re-export types used in our public API
pub use logsift_types::{ClearRequest, Constraint, Demand, Field, LogRecord};

/// Result ordering by record datetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    /// Newest first; the default for log searches
    #[default]
    Descending,
}

/// Storage backend executing constraint lists against persisted log rows
///
/// Implementations own ordering, atomicity of truncation, and their own
/// failure modes; the query core never retries or batches.
pub trait LogStore {
    /// Return all records satisfying every constraint, in the given order
    fn execute(
        &self,
        constraints: &[Constraint],
        order: SortOrder,
    ) -> Result<Vec<LogRecord>, StoreError>;

    /// Unconditionally remove every record
    fn truncate(&self) -> Result<(), StoreError>;

    /// Distinct values of a field across all records, sorted
    fn distinct_values(&self, field: Field) -> Result<BTreeSet<String>, StoreError>;
}

/// Find records matching a demand
///
/// Translates the demand against the supplied reference instant and runs
/// the resulting constraints. Log searches order newest first by default;
/// pass `SortOrder::default()` unless the caller asked otherwise.
pub fn find_by_demand<S: LogStore + ?Sized>(
    store: &S,
    demand: &Demand,
    now: NaiveDateTime,
    order: SortOrder,
) -> Result<Vec<LogRecord>, StoreError> {
    let constraints = constraints_from_demand(demand, now);
    store.execute(&constraints, order)
}

/// Process a clear request
///
/// Returns `Ok(true)` when the store was truncated, `Ok(false)` when the
/// request asked for nothing. Issues at most one truncate call; truncate
/// failures propagate unchanged.
pub fn clear_by_request<S: LogStore + ?Sized>(
    store: &S,
    request: &ClearRequest,
) -> Result<bool, StoreError> {
    if request.is_all() {
        store.truncate()?;
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use logsift_types::{DateRangePreset, LogLevel};
    use std::cell::Cell;

    fn dt(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    /// Store stub counting truncate calls
    #[derive(Default)]
    struct RecordingStore {
        truncates: Cell<usize>,
    }

    impl LogStore for RecordingStore {
        fn execute(
            &self,
            _constraints: &[Constraint],
            _order: SortOrder,
        ) -> Result<Vec<LogRecord>, StoreError> {
            Ok(Vec::new())
        }

        fn truncate(&self) -> Result<(), StoreError> {
            self.truncates.set(self.truncates.get() + 1);
            Ok(())
        }

        fn distinct_values(&self, _field: Field) -> Result<BTreeSet<String>, StoreError> {
            Ok(BTreeSet::new())
        }
    }

    #[test]
    fn test_clear_all_truncates_once() {
        let store = RecordingStore::default();
        let processed = clear_by_request(&store, &ClearRequest::all()).unwrap();
        assert!(processed);
        assert_eq!(store.truncates.get(), 1);
    }

    #[test]
    fn test_clear_nothing_leaves_store_alone() {
        let store = RecordingStore::default();
        let processed = clear_by_request(&store, &ClearRequest::new(false)).unwrap();
        assert!(!processed);
        assert_eq!(store.truncates.get(), 0);
    }

    #[test]
    fn test_find_by_demand_filters_and_sorts_descending() {
        let store = MemoryStore::from_records(vec![
            LogRecord::new(dt(2, 10), LogLevel::Error, "old error".to_string()),
            LogRecord::new(dt(9, 12), LogLevel::Info, "recent info".to_string()),
            LogRecord::new(dt(10, 9), LogLevel::Error, "recent error".to_string()),
        ]);
        let demand = Demand::new()
            .with_levels([LogLevel::Error].into())
            .with_date_range(DateRangePreset::Last7Days);

        let rows = find_by_demand(&store, &demand, dt(10, 15), SortOrder::default()).unwrap();
        let messages: Vec<&str> = rows.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["recent error"]);
    }

    #[test]
    fn test_find_by_demand_unconstrained_returns_everything() {
        let store = MemoryStore::from_records(vec![
            LogRecord::new(dt(1, 8), LogLevel::Info, "first".to_string()),
            LogRecord::new(dt(2, 8), LogLevel::Info, "second".to_string()),
        ]);
        let rows = find_by_demand(&store, &Demand::new(), dt(10, 15), SortOrder::default()).unwrap();
        let messages: Vec<&str> = rows.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn test_find_by_demand_honors_requested_order() {
        let store = MemoryStore::from_records(vec![
            LogRecord::new(dt(1, 8), LogLevel::Info, "first".to_string()),
            LogRecord::new(dt(2, 8), LogLevel::Info, "second".to_string()),
        ]);
        let rows =
            find_by_demand(&store, &Demand::new(), dt(10, 15), SortOrder::Ascending).unwrap();
        let messages: Vec<&str> = rows.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
