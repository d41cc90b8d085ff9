mod btree;
mod hash;
mod unbalanced;

pub use btree::BTreeIndex;
pub use hash::HashIndex;
pub use unbalanced::UnbalancedTreeIndex;

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::table::Table;
use crate::value::{DataType, Value};

/// Opaque row identifier: the record's ordinal position within its table,
/// stable for the lifetime of the table instance an index was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub usize);

/// Capability contract shared by every index variant.
///
/// An index maps keys of one declared kind to the record ids added for that
/// key, in insertion order. It is built eagerly from a full table scan and
/// kept current by explicit `add`/`clear` calls; nothing subscribes it to
/// table mutation.
pub trait Index {
    /// Declared kind of keys this index accepts; fixed at construction.
    fn data_type(&self) -> DataType;

    /// Number of distinct keys currently indexed.
    fn num_entries(&self) -> usize;

    /// Associates one more record id with `key`, preserving the ids already
    /// present. The key's kind is checked before anything is stored.
    fn add(&mut self, key: Value, record_id: RecordId) -> EngineResult<()>;

    /// Removes every entry; the declared kind is retained and the index
    /// stays usable.
    fn clear(&mut self);

    /// All record ids associated with `key` in the order they were added;
    /// empty for an absent key, `TypeMismatch` for a key of the wrong kind.
    fn get(&self, key: &Value) -> EngineResult<Vec<RecordId>>;
}

/// Backing-store choice, made explicitly at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Hash,
    BTree,
    UnbalancedTree,
}

pub fn build_index(
    kind: IndexKind,
    table: &Table,
    attribute: &str,
) -> EngineResult<Box<dyn Index>> {
    let index: Box<dyn Index> = match kind {
        IndexKind::Hash => Box::new(HashIndex::from_table(table, attribute)?),
        IndexKind::BTree => Box::new(BTreeIndex::from_table(table, attribute)?),
        IndexKind::UnbalancedTree => Box::new(UnbalancedTreeIndex::from_table(table, attribute)?),
    };
    Ok(index)
}

fn check_key_type(declared: DataType, key: &Value) -> EngineResult<()> {
    let found = key.data_type();
    if found != declared {
        return Err(EngineError::TypeMismatch {
            expected: declared,
            found,
        });
    }
    Ok(())
}

/// Eager-build pass shared by all variants: scan every record, group record
/// ids by the attribute's value. Keys come out in first-seen order and the
/// ids within a group keep scan order. The declared kind comes from the
/// schema, independent of the data actually observed.
fn grouped_entries(
    table: &Table,
    attribute: &str,
) -> EngineResult<(DataType, Vec<(Value, Vec<RecordId>)>)> {
    let data_type = table.schema().data_type(attribute)?;
    let mut positions: HashMap<Value, usize> = HashMap::new();
    let mut groups: Vec<(Value, Vec<RecordId>)> = Vec::new();
    for ordinal in 0..table.num_records() {
        let record_id = RecordId(ordinal);
        let value = table.value(record_id, attribute)?.clone();
        match positions.get(&value) {
            Some(&position) => groups[position].1.push(record_id),
            None => {
                positions.insert(value.clone(), groups.len());
                groups.push((value, vec![record_id]));
            }
        }
    }
    Ok((data_type, groups))
}
