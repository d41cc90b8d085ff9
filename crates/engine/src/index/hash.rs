use std::collections::HashMap;

use log::debug;

use super::{check_key_type, grouped_entries, Index, RecordId};
use crate::error::EngineResult;
use crate::table::Table;
use crate::value::{DataType, Value};

/// Point-lookup index backed by a hash map: expected O(1) `add`/`get`,
/// no ordering over keys.
pub struct HashIndex {
    attribute: String,
    data_type: DataType,
    entries: HashMap<Value, Vec<RecordId>>,
}

impl HashIndex {
    pub fn from_table(table: &Table, attribute: &str) -> EngineResult<Self> {
        let (data_type, groups) = grouped_entries(table, attribute)?;
        let entries: HashMap<_, _> = groups.into_iter().collect();
        debug!(
            "built hash index on {}: {} entries over {} records",
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
}

impl Index for HashIndex {
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
