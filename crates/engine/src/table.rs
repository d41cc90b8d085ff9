use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::{EngineError, EngineResult};
use crate::expr::{self, Expr};
use crate::index::{BTreeIndex, Index, RecordId};
use crate::schema::{ColumnDef, Schema};
use crate::value::{DataType, Value};

/// One row of a table; values are positional per the owning schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// In-memory record store with a declared schema.
///
/// Query operators return new tables and never mutate the receiver. Indexes
/// built over a table are NOT kept in sync by `insert`: the caller owns that
/// contract and must invoke `Index::add` for every appended record, or the
/// index silently under-reports matches for the new rows.
#[derive(Debug, Clone)]
pub struct Table {
    schema: Schema,
    records: Vec<Record>,
}

impl Table {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, record_id: RecordId) -> Option<&Record> {
        self.records.get(record_id.0)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Value of `attribute` in the record identified by `record_id`.
    pub fn value(&self, record_id: RecordId, attribute: &str) -> EngineResult<&Value> {
        let column_index = self.column_index(attribute)?;
        let record = self.record(record_id).ok_or_else(|| {
            EngineError::Schema(format!("record {} out of range", record_id.0))
        })?;
        record.get(column_index).ok_or_else(|| {
            EngineError::Schema(format!("record {} is missing column {}", record_id.0, attribute))
        })
    }

    /// Appends a row after checking arity and per-column kinds; nothing is
    /// stored when a check fails. Returns the new record's ordinal id.
    pub fn insert(&mut self, values: Vec<Value>) -> EngineResult<RecordId> {
        if values.len() != self.schema.columns.len() {
            return Err(EngineError::Schema(format!(
                "expected {} values, got {}",
                self.schema.columns.len(),
                values.len()
            )));
        }
        for (column, value) in self.schema.columns.iter().zip(&values) {
            if value.data_type() != column.data_type {
                return Err(EngineError::TypeMismatch {
                    expected: column.data_type,
                    found: value.data_type(),
                });
            }
        }
        let record_id = RecordId(self.records.len());
        self.records.push(Record::new(values));
        Ok(record_id)
    }

    /// Rows whose attribute compares equal to `key` under the declared
    /// ordering.
    pub fn filter_by_scan(&self, attribute: &str, key: &Value) -> EngineResult<Table> {
        let column_index = self.column_index(attribute)?;
        self.check_bound_kind(column_index, key)?;
        let mut filtered = Table::new(self.schema.clone());
        for record in &self.records {
            if record.values[column_index].cmp(key) == Ordering::Equal {
                filtered.records.push(record.clone());
            }
        }
        Ok(filtered)
    }

    /// Rows whose attribute lies in the inclusive range `[low, high]`.
    /// An inverted range (`low > high`) is empty, not an error.
    pub fn filter_range_by_scan(
        &self,
        attribute: &str,
        low: &Value,
        high: &Value,
    ) -> EngineResult<Table> {
        let column_index = self.column_index(attribute)?;
        self.check_bound_kind(column_index, low)?;
        self.check_bound_kind(column_index, high)?;
        let mut filtered = Table::new(self.schema.clone());
        for record in &self.records {
            let value = &record.values[column_index];
            if value.cmp(low) != Ordering::Less && value.cmp(high) != Ordering::Greater {
                filtered.records.push(record.clone());
            }
        }
        Ok(filtered)
    }

    /// Point lookup resolved through an index built on this table; the
    /// result matches `filter_by_scan` on the rows the index knows about.
    pub fn filter_by_index(&self, index: &dyn Index, key: &Value) -> EngineResult<Table> {
        let record_ids = index.get(key)?;
        self.collect_rows(&record_ids)
    }

    /// Inclusive range lookup resolved through an ordered index.
    pub fn filter_range_by_index(
        &self,
        index: &BTreeIndex,
        low: &Value,
        high: &Value,
    ) -> EngineResult<Table> {
        let record_ids = index.get_range(low, high)?;
        self.collect_rows(&record_ids)
    }

    fn collect_rows(&self, record_ids: &[RecordId]) -> EngineResult<Table> {
        let mut result = Table::new(self.schema.clone());
        for record_id in record_ids {
            let record = self.record(*record_id).ok_or_else(|| {
                EngineError::Schema(format!("stale record id {}", record_id.0))
            })?;
            result.records.push(record.clone());
        }
        Ok(result)
    }

    /// Inner join on every attribute the two schemas share by name. The
    /// result schema is this table's columns followed by the other table's
    /// remaining columns; a row matching nothing contributes nothing. With
    /// no shared attributes the join degenerates to the cross product.
    pub fn natural_join(&self, other: &Table) -> EngineResult<Table> {
        let mut shared = Vec::new();
        for (left_index, column) in self.schema.columns.iter().enumerate() {
            if let Some(right_index) = other.schema.column_index(&column.name) {
                let right_type = other.schema.columns[right_index].data_type;
                if right_type != column.data_type {
                    return Err(EngineError::Schema(format!(
                        "join attribute {} is {} on one side and {} on the other",
                        column.name, column.data_type, right_type
                    )));
                }
                shared.push((left_index, right_index));
            }
        }
        let right_only: Vec<usize> = (0..other.schema.columns.len())
            .filter(|index| !shared.iter().any(|(_, right_index)| right_index == index))
            .collect();

        let mut columns = self.schema.columns.clone();
        columns.extend(
            right_only
                .iter()
                .map(|&index| other.schema.columns[index].clone()),
        );
        let mut joined = Table::new(Schema::new(columns));

        for left_record in &self.records {
            for right_record in &other.records {
                let matches = shared.iter().all(|&(left_index, right_index)| {
                    left_record.values[left_index] == right_record.values[right_index]
                });
                if matches {
                    let mut values = left_record.values.clone();
                    values.extend(
                        right_only
                            .iter()
                            .map(|&index| right_record.values[index].clone()),
                    );
                    joined.records.push(Record::new(values));
                }
            }
        }
        Ok(joined)
    }

    /// Retains only the named attributes, in the order given.
    pub fn project(&self, attributes: &[&str]) -> EngineResult<Table> {
        let mut indices = Vec::with_capacity(attributes.len());
        let mut columns = Vec::with_capacity(attributes.len());
        for name in attributes {
            let index = self.column_index(name)?;
            indices.push(index);
            columns.push(self.schema.columns[index].clone());
        }
        let mut projected = Table::new(Schema::new(columns));
        for record in &self.records {
            let values = indices
                .iter()
                .map(|&index| record.values[index].clone())
                .collect();
            projected.records.push(Record::new(values));
        }
        Ok(projected)
    }

    /// Removes rows fully equal to an earlier row, keeping the first
    /// occurrence's position.
    pub fn distinct(&self) -> Table {
        let mut seen: HashSet<&Record> = HashSet::new();
        let mut result = Table::new(self.schema.clone());
        for record in &self.records {
            if seen.insert(record) {
                result.records.push(record.clone());
            }
        }
        result
    }

    /// Appends a computed `Real` column named `name`, evaluating the
    /// expression per row with the referenced numeric attributes bound.
    pub fn with_column(&self, name: &str, expression: &Expr) -> EngineResult<Table> {
        if self.schema.column_index(name).is_some() {
            return Err(EngineError::Schema(format!("column {} already exists", name)));
        }
        let mut bound_columns = Vec::new();
        for variable in expr::referenced_variables(expression) {
            let index = self
                .schema
                .column_index(&variable)
                .ok_or_else(|| EngineError::UnknownAttribute(variable.clone()))?;
            if self.schema.columns[index].data_type == DataType::Text {
                return Err(EngineError::Expression(format!(
                    "column {} is not numeric",
                    variable
                )));
            }
            bound_columns.push((variable, index));
        }

        let mut columns = self.schema.columns.clone();
        columns.push(ColumnDef::new(name, DataType::Real));
        let mut extended = Table::new(Schema::new(columns));

        for record in &self.records {
            let mut bindings = HashMap::with_capacity(bound_columns.len());
            for (variable, index) in &bound_columns {
                let value = record.values[*index].as_numeric().ok_or_else(|| {
                    EngineError::Expression(format!("column {} is not numeric", variable))
                })?;
                bindings.insert(variable.clone(), value);
            }
            let computed = expr::evaluate(expression, &bindings)?;
            let mut values = record.values.clone();
            values.push(Value::Real(computed));
            extended.records.push(Record::new(values));
        }
        Ok(extended)
    }

    fn column_index(&self, attribute: &str) -> EngineResult<usize> {
        self.schema
            .column_index(attribute)
            .ok_or_else(|| EngineError::UnknownAttribute(attribute.to_string()))
    }

    fn check_bound_kind(&self, column_index: usize, key: &Value) -> EngineResult<()> {
        let declared = self.schema.columns[column_index].data_type;
        if key.data_type() != declared {
            return Err(EngineError::TypeMismatch {
                expected: declared,
                found: key.data_type(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::BinaryOperator;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    fn exams() -> Table {
        let mut table = Table::new(Schema::new(vec![
            ColumnDef::new("student", DataType::Text),
            ColumnDef::new("subject", DataType::Text),
            ColumnDef::new("grade", DataType::Real),
        ]));
        let rows = vec![
            vec![text("Anna"), text("Software Design"), Value::Real(1.7)],
            vec![text("Ben"), text("Software Design"), Value::Real(4.0)],
            vec![text("Clara"), text("DSEA"), Value::Real(4.5)],
        ];
        for row in rows {
            table.insert(row).unwrap();
        }
        table
    }

    fn students() -> Table {
        let mut table = Table::new(Schema::new(vec![
            ColumnDef::new("student", DataType::Text),
            ColumnDef::new("semester", DataType::Integer),
        ]));
        table.insert(vec![text("Anna"), Value::Integer(4)]).unwrap();
        table.insert(vec![text("Ben"), Value::Integer(1)]).unwrap();
        table.insert(vec![text("Denis"), Value::Integer(2)]).unwrap();
        table
    }

    #[test]
    fn insert_checks_arity_before_storing() {
        let mut table = exams();
        let error = table.insert(vec![text("Eva")]).unwrap_err();
        assert!(matches!(error, EngineError::Schema(_)));
        assert_eq!(table.num_records(), 3);
    }

    #[test]
    fn insert_checks_kinds_before_storing() {
        let mut table = exams();
        let error = table
            .insert(vec![text("Eva"), text("DSEA"), Value::Integer(2)])
            .unwrap_err();
        assert!(matches!(error, EngineError::TypeMismatch { .. }));
        assert_eq!(table.num_records(), 3);
    }

    #[test]
    fn filter_by_scan_keeps_exact_matches() {
        let filtered = exams()
            .filter_by_scan("subject", &text("Software Design"))
            .unwrap();
        assert_eq!(filtered.num_records(), 2);
        assert_eq!(
            filtered.value(RecordId(0), "student").unwrap(),
            &text("Anna")
        );
        assert_eq!(filtered.value(RecordId(1), "student").unwrap(), &text("Ben"));
    }

    #[test]
    fn filter_range_is_inclusive_on_both_bounds() {
        let filtered = exams()
            .filter_range_by_scan("grade", &Value::Real(0.0), &Value::Real(4.1))
            .unwrap();
        assert_eq!(filtered.num_records(), 2);
        assert_eq!(
            filtered.value(RecordId(0), "grade").unwrap(),
            &Value::Real(1.7)
        );
        assert_eq!(
            filtered.value(RecordId(1), "grade").unwrap(),
            &Value::Real(4.0)
        );
    }

    #[test]
    fn inverted_range_yields_no_rows() {
        let filtered = exams()
            .filter_range_by_scan("grade", &Value::Real(4.0), &Value::Real(1.0))
            .unwrap();
        assert_eq!(filtered.num_records(), 0);
    }

    #[test]
    fn range_bounds_must_match_the_declared_kind() {
        let error = exams()
            .filter_range_by_scan("grade", &Value::Integer(0), &Value::Integer(5))
            .unwrap_err();
        assert!(matches!(error, EngineError::TypeMismatch { .. }));
    }

    #[test]
    fn natural_join_combines_shared_rows_once() {
        let joined = students().natural_join(&exams()).unwrap();
        assert_eq!(
            joined.schema().column_names(),
            vec!["student", "semester", "subject", "grade"]
        );
        // Clara has no student row, Denis has no exam row
        assert_eq!(joined.num_records(), 2);
        assert_eq!(joined.value(RecordId(0), "student").unwrap(), &text("Anna"));
        assert_eq!(
            joined.value(RecordId(0), "semester").unwrap(),
            &Value::Integer(4)
        );
        assert_eq!(
            joined.value(RecordId(1), "grade").unwrap(),
            &Value::Real(4.0)
        );
    }

    #[test]
    fn natural_join_rejects_conflicting_kinds() {
        let mut other = Table::new(Schema::new(vec![ColumnDef::new(
            "grade",
            DataType::Integer,
        )]));
        other.insert(vec![Value::Integer(1)]).unwrap();
        let error = exams().natural_join(&other).unwrap_err();
        assert!(matches!(error, EngineError::Schema(_)));
    }

    #[test]
    fn join_without_shared_attributes_is_a_cross_product() {
        let mut colors = Table::new(Schema::new(vec![ColumnDef::new("color", DataType::Text)]));
        colors.insert(vec![text("red")]).unwrap();
        colors.insert(vec![text("blue")]).unwrap();
        let joined = students().natural_join(&colors).unwrap();
        assert_eq!(joined.num_records(), 6);
    }

    #[test]
    fn project_reorders_and_drops_columns() {
        let projected = exams().project(&["grade", "student"]).unwrap();
        assert_eq!(projected.schema().column_names(), vec!["grade", "student"]);
        assert_eq!(
            projected.value(RecordId(0), "grade").unwrap(),
            &Value::Real(1.7)
        );
        let error = exams().project(&["examiner"]).unwrap_err();
        assert!(matches!(error, EngineError::UnknownAttribute(_)));
    }

    #[test]
    fn distinct_keeps_first_occurrences_in_order() {
        let projected = exams().project(&["subject"]).unwrap();
        let distinct = projected.distinct();
        assert_eq!(distinct.num_records(), 2);
        assert_eq!(
            distinct.value(RecordId(0), "subject").unwrap(),
            &text("Software Design")
        );
        assert_eq!(distinct.value(RecordId(1), "subject").unwrap(), &text("DSEA"));
    }

    #[test]
    fn with_column_computes_per_row() {
        let expression = Expr::BinaryOp {
            left: Box::new(Expr::Variable("grade".to_string())),
            op: BinaryOperator::Minus,
            right: Box::new(Expr::Literal(0.3)),
        };
        let extended = exams().with_column("adjusted", &expression).unwrap();
        assert_eq!(
            extended.schema().column_names(),
            vec!["student", "subject", "grade", "adjusted"]
        );
        assert_eq!(
            extended.value(RecordId(1), "adjusted").unwrap(),
            &Value::Real(4.0 - 0.3)
        );
    }

    #[test]
    fn with_column_rejects_text_operands_and_clashes() {
        let expression = Expr::Variable("subject".to_string());
        let error = exams().with_column("bad", &expression).unwrap_err();
        assert!(matches!(error, EngineError::Expression(_)));

        let clash = exams()
            .with_column("grade", &Expr::Literal(1.0))
            .unwrap_err();
        assert!(matches!(clash, EngineError::Schema(_)));
    }
}
