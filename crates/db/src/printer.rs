use comfy_table::{Cell, Table as DisplayTable};

use engine::Table;

const MAX_DISPLAY_ROWS: usize = 100;

/// Renders a table's rows with headers, capped at `MAX_DISPLAY_ROWS`, with
/// a total-row-count trailer.
pub fn format_table(table: &Table) -> String {
    let total_rows = table.num_records();
    let mut display = DisplayTable::new();
    let headers = table
        .schema()
        .columns
        .iter()
        .map(|column| Cell::new(&column.name))
        .collect::<Vec<_>>();
    display.set_header(headers);

    for record in table.records().take(MAX_DISPLAY_ROWS) {
        let cells = record
            .values()
            .iter()
            .map(Cell::new)
            .collect::<Vec<_>>();
        display.add_row(cells);
    }

    let mut output = display.to_string();
    output.push('\n');
    output.push_str(&format!("({} rows)", total_rows));

    let hidden_rows = total_rows.saturating_sub(MAX_DISPLAY_ROWS);
    if hidden_rows > 0 {
        output.push('\n');
        output.push_str(&format!("... ({} rows hidden)", hidden_rows));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{ColumnDef, DataType, Schema, Value};

    fn single_column_table(rows: usize) -> Table {
        let mut table = Table::new(Schema::new(vec![ColumnDef::new("n", DataType::Integer)]));
        for index in 0..rows {
            table.insert(vec![Value::Integer(index as i64)]).unwrap();
        }
        table
    }

    #[test]
    fn renders_headers_values_and_row_count() {
        let mut table = Table::new(Schema::new(vec![
            ColumnDef::new("subject", DataType::Text),
            ColumnDef::new("grade", DataType::Real),
        ]));
        table
            .insert(vec![Value::Text("DSEA".to_string()), Value::Real(4.0)])
            .unwrap();
        let output = format_table(&table);
        assert!(output.contains("subject"));
        assert!(output.contains("DSEA"));
        assert!(output.contains("4"));
        assert!(output.contains("(1 rows)"));
    }

    #[test]
    fn empty_table_still_renders_a_count() {
        let output = format_table(&single_column_table(0));
        assert!(output.contains("(0 rows)"));
        assert!(!output.contains("rows hidden"));
    }

    #[test]
    fn truncates_overflow_rows() {
        let output = format_table(&single_column_table(MAX_DISPLAY_ROWS + 3));
        assert!(output.contains(&format!("({} rows)", MAX_DISPLAY_ROWS + 3)));
        assert!(output.contains("... (3 rows hidden)"));
    }
}
