use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::RwLock;

use logsift_types::{Constraint, Field, LogRecord, all_of};

use crate::{LogStore, SortOrder, StoreError};

/// Thread-safe in-memory log store
///
/// Cloning yields another handle to the same records.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<LogRecord>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given records
    pub fn from_records(records: Vec<LogRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Append a record
    pub fn push(&self, record: LogRecord) {
        self.records.write().push(record);
    }

    /// Total record count
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl LogStore for MemoryStore {
    fn execute(
        &self,
        constraints: &[Constraint],
        order: SortOrder,
    ) -> Result<Vec<LogRecord>, StoreError> {
        let records = self.records.read();
        let mut out: Vec<LogRecord> = records
            .iter()
            .filter(|record| all_of(constraints, record))
            .cloned()
            .collect();
        match order {
            SortOrder::Ascending => out.sort_by(|a, b| a.datetime.cmp(&b.datetime)),
            SortOrder::Descending => out.sort_by(|a, b| b.datetime.cmp(&a.datetime)),
        }
        Ok(out)
    }

    fn truncate(&self) -> Result<(), StoreError> {
        self.records.write().clear();
        Ok(())
    }

    fn distinct_values(&self, field: Field) -> Result<BTreeSet<String>, StoreError> {
        Ok(self
            .records
            .read()
            .iter()
            .map(|record| record.field_value(field))
            .collect())
    }
}
