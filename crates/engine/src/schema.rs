use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::value::DataType;

/// A named, typed attribute declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    /// Declared type of an attribute; fails on unknown names.
    pub fn data_type(&self, name: &str) -> EngineResult<DataType> {
        self.column(name)
            .map(|column| column.data_type)
            .ok_or_else(|| EngineError::UnknownAttribute(name.to_string()))
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exam_schema() -> Schema {
        Schema::new(vec![
            ColumnDef::new("subject", DataType::Text),
            ColumnDef::new("grade", DataType::Real),
        ])
    }

    #[test]
    fn resolves_declared_types_by_name() {
        let schema = exam_schema();
        assert_eq!(schema.data_type("subject").unwrap(), DataType::Text);
        assert_eq!(schema.data_type("grade").unwrap(), DataType::Real);
        assert_eq!(schema.column_index("grade"), Some(1));
    }

    #[test]
    fn unknown_attribute_is_an_error() {
        let schema = exam_schema();
        let error = schema.data_type("examiner").unwrap_err();
        assert!(matches!(error, EngineError::UnknownAttribute(_)));
    }
}
