use anyhow::{Context, Result};

use engine::{ColumnDef, DataType, Schema, Table, Value};

/// Seed rows for the demo tables. Grades carry a decimal point so they
/// deserialize as REAL, not INTEGER.
const STUDENTS_JSON: &str = r#"[
    ["Anna", 4],
    ["Ben", 1],
    ["Clara", 6],
    ["Denis", 2],
    ["Eva", 1]
]"#;

const EXAMS_JSON: &str = r#"[
    ["Anna", "Software Design", 1.7],
    ["Ben", "Software Design", 1.3],
    ["Clara", "DSEA", 4.0],
    ["Anna", "DSEA", 1.0],
    ["Denis", "Databases", 2.3],
    ["Eva", "Software Design", 1.0],
    ["Clara", "Databases", 4.5]
]"#;

/// Demo student table: (student TEXT, semester INTEGER).
pub fn students() -> Result<Table> {
    let schema = Schema::new(vec![
        ColumnDef::new("student", DataType::Text),
        ColumnDef::new("semester", DataType::Integer),
    ]);
    load_table(schema, STUDENTS_JSON).context("load student seed data")
}

/// Demo exam table: (student TEXT, subject TEXT, grade REAL).
pub fn exams() -> Result<Table> {
    let schema = Schema::new(vec![
        ColumnDef::new("student", DataType::Text),
        ColumnDef::new("subject", DataType::Text),
        ColumnDef::new("grade", DataType::Real),
    ]);
    load_table(schema, EXAMS_JSON).context("load exam seed data")
}

fn load_table(schema: Schema, json: &str) -> Result<Table> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(json)?;
    let mut table = Table::new(schema);
    for row in rows {
        table.insert(row)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::RecordId;

    #[test]
    fn seed_rows_match_their_declared_kinds() {
        let students = students().unwrap();
        assert_eq!(students.num_records(), 5);
        assert_eq!(
            students.value(RecordId(0), "semester").unwrap(),
            &Value::Integer(4)
        );

        let exams = exams().unwrap();
        assert_eq!(exams.num_records(), 7);
        assert_eq!(
            exams.value(RecordId(2), "grade").unwrap(),
            &Value::Real(4.0)
        );
        assert_eq!(
            exams.value(RecordId(5), "student").unwrap(),
            &Value::Text("Eva".to_string())
        );
    }
}
