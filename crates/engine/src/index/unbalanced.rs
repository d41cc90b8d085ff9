use log::debug;

use super::{check_key_type, grouped_entries, Index, RecordId};
use crate::error::EngineResult;
use crate::table::Table;
use crate::tree::UnbalancedSearchTree;
use crate::value::{DataType, Value};

/// Index backed by the unbalanced search tree: each tree node stores a key
/// and the whole group of record ids added for it.
pub struct UnbalancedTreeIndex {
    attribute: String,
    data_type: DataType,
    tree: UnbalancedSearchTree<Value, Vec<RecordId>>,
}

impl UnbalancedTreeIndex {
    pub fn from_table(table: &Table, attribute: &str) -> EngineResult<Self> {
        let (data_type, groups) = grouped_entries(table, attribute)?;
        let tree = UnbalancedSearchTree::with_entries(Value::cmp, groups);
        debug!(
            "built unbalanced-tree index on {}: {} entries, depth {}",
            attribute,
            tree.len(),
            tree.depth()
        );
        Ok(Self {
            attribute: attribute.to_string(),
            data_type,
            tree,
        })
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl Index for UnbalancedTreeIndex {
    fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Delegates to the tree's O(n) recount.
    fn num_entries(&self) -> usize {
        self.tree.len()
    }

    fn add(&mut self, key: Value, record_id: RecordId) -> EngineResult<()> {
        check_key_type(self.data_type, &key)?;
        // read-modify-write: the tree stores whole groups, not single ids
        let mut record_ids = self.tree.get(&key).cloned().unwrap_or_default();
        record_ids.push(record_id);
        self.tree.insert(key, record_ids);
        Ok(())
    }

    fn clear(&mut self) {
        self.tree.clear();
    }

    fn get(&self, key: &Value) -> EngineResult<Vec<RecordId>> {
        check_key_type(self.data_type, key)?;
        Ok(self.tree.get(key).cloned().unwrap_or_default())
    }
}
