use std::collections::BTreeMap;

use log::debug;

use super::{check_key_type, grouped_entries, Index, RecordId};
use crate::error::EngineResult;
use crate::table::Table;
use crate::value::{DataType, Value};

/// Point-lookup index backed by a balanced ordered map: O(log n)
/// `add`/`get`, with ordered iteration available for range lookups.
pub struct BTreeIndex {
    attribute: String,
    data_type: DataType,
    entries: BTreeMap<Value, Vec<RecordId>>,
}

impl BTreeIndex {
    pub fn from_table(table: &Table, attribute: &str) -> EngineResult<Self> {
        let (data_type, groups) = grouped_entries(table, attribute)?;
        let entries: BTreeMap<_, _> = groups.into_iter().collect();
        debug!(
            "built btree index on {}: {} entries over {} records",
            attribute,
            entries.len(),
            table.num_records()
        );
        Ok(Self {
            attribute: attribute.to_string(),
            data_type,
            entries,
        })
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Record ids for every key in the inclusive range `[low, high]`,
    /// grouped by ascending key. An inverted range is empty.
    pub fn get_range(&self, low: &Value, high: &Value) -> EngineResult<Vec<RecordId>> {
        check_key_type(self.data_type, low)?;
        check_key_type(self.data_type, high)?;
        if low > high {
            return Ok(Vec::new());
        }
        let mut record_ids = Vec::new();
        for (_, group) in self.entries.range(low..=high) {
            record_ids.extend_from_slice(group);
        }
        Ok(record_ids)
    }
}

impl Index for BTreeIndex {
    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn num_entries(&self) -> usize {
        self.entries.len()
    }

    fn add(&mut self, key: Value, record_id: RecordId) -> EngineResult<()> {
        check_key_type(self.data_type, &key)?;
        self.entries.entry(key).or_default().push(record_id);
        Ok(())
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn get(&self, key: &Value) -> EngineResult<Vec<RecordId>> {
        check_key_type(self.data_type, key)?;
        Ok(self.entries.get(key).cloned().unwrap_or_default())
    }
}
