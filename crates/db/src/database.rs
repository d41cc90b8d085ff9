use std::collections::HashMap;

use anyhow::{anyhow, bail, Result};
use log::debug;

use engine::{build_index, Index, IndexKind, RecordId, Table, Value};

struct IndexEntry {
    kind: IndexKind,
    index: Box<dyn Index>,
}

/// Named-table catalog with an explicit index registry.
///
/// Indexes are registered per (table, attribute) pair and are NOT kept in
/// sync automatically: `insert` appends to the table only. The caller must
/// follow up with `Index::add` on every affected index (via `index_mut`),
/// or use `reindex` to rebuild one from the current table contents. A
/// forgotten `add` leaves an index that silently under-reports the new rows.
pub struct Database {
    tables: HashMap<String, Table>,
    indexes: HashMap<(String, String), IndexEntry>,
}

impl Database {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            indexes: HashMap::new(),
        }
    }

    pub fn register_table(&mut self, name: impl Into<String>, table: Table) {
        let name = name.into();
        debug!("registered table {} with {} records", name, table.num_records());
        self.tables.insert(name, table);
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn table_names(&self) -> Vec<String> {
        let mut names = self.tables.keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }

    /// Drops a table and every index registered on it.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        if self.tables.remove(name).is_none() {
            bail!("unknown table {}", name);
        }
        self.indexes.retain(|(table_name, _), _| table_name != name);
        Ok(())
    }

    /// Appends a row to a table. Registered indexes are deliberately left
    /// untouched; see the type-level contract.
    pub fn insert(&mut self, table_name: &str, values: Vec<Value>) -> Result<RecordId> {
        let table = self
            .tables
            .get_mut(table_name)
            .ok_or_else(|| anyhow!("unknown table {}", table_name))?;
        let record_id = table.insert(values)?;
        Ok(record_id)
    }

    /// Builds an index of the chosen kind over the table's current records
    /// and registers it under (table, attribute).
    pub fn create_index(&mut self, table_name: &str, attribute: &str, kind: IndexKind) -> Result<()> {
        let table = self
            .tables
            .get(table_name)
            .ok_or_else(|| anyhow!("unknown table {}", table_name))?;
        let key = (table_name.to_string(), attribute.to_string());
        if self.indexes.contains_key(&key) {
            bail!("index on {}.{} already exists", table_name, attribute);
        }
        let index = build_index(kind, table, attribute)?;
        self.indexes.insert(key, IndexEntry { kind, index });
        Ok(())
    }

    pub fn index(&self, table_name: &str, attribute: &str) -> Option<&dyn Index> {
        self.indexes
            .get(&(table_name.to_string(), attribute.to_string()))
            .map(|entry| entry.index.as_ref())
    }

    pub fn index_mut(&mut self, table_name: &str, attribute: &str) -> Option<&mut (dyn Index + 'static)> {
        self.indexes
            .get_mut(&(table_name.to_string(), attribute.to_string()))
            .map(|entry| entry.index.as_mut())
    }

    pub fn drop_index(&mut self, table_name: &str, attribute: &str) -> Result<()> {
        let key = (table_name.to_string(), attribute.to_string());
        if self.indexes.remove(&key).is_none() {
            bail!("no index on {}.{}", table_name, attribute);
        }
        Ok(())
    }

    /// Rebuilds one registered index from the table's current records:
    /// `clear` first, then one `add` per record in scan order. The backing
    /// kind chosen at `create_index` time is kept.
    pub fn reindex(&mut self, table_name: &str, attribute: &str) -> Result<()> {
        let table = self
            .tables
            .get(table_name)
            .ok_or_else(|| anyhow!("unknown table {}", table_name))?;
        let key = (table_name.to_string(), attribute.to_string());
        let entry = self
            .indexes
            .get_mut(&key)
            .ok_or_else(|| anyhow!("no index on {}.{}", table_name, attribute))?;

        entry.index.clear();
        for ordinal in 0..table.num_records() {
            let record_id = RecordId(ordinal);
            let value = table.value(record_id, attribute)?.clone();
            entry.index.add(value, record_id)?;
        }
        debug!(
            "rebuilt {:?} index on {}.{}: {} entries",
            entry.kind,
            table_name,
            attribute,
            entry.index.num_entries()
        );
        Ok(())
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
