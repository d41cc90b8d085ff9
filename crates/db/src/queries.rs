use anyhow::Result;

use engine::{BinaryOperator, Expr, HashIndex, Table, Value};

/// Names of students with at least one exam at or below `threshold`
/// (lower grades are better), in join order, without duplicates.
pub fn top_students(students: &Table, exams: &Table, threshold: f64) -> Result<Table> {
    let passed = exams.filter_range_by_scan("grade", &Value::Real(0.0), &Value::Real(threshold))?;
    let report = students
        .natural_join(&passed)?
        .project(&["student"])?
        .distinct();
    Ok(report)
}

/// Students still in their first two semesters.
pub fn early_birds(students: &Table) -> Result<Table> {
    let filtered = students.filter_range_by_scan(
        "semester",
        &Value::Integer(1),
        &Value::Integer(2),
    )?;
    Ok(filtered.project(&["student"])?.distinct())
}

/// Exams extended with a computed `adjusted` column: the grade with a flat
/// bonus subtracted.
pub fn grades_with_bonus(exams: &Table, bonus: f64) -> Result<Table> {
    let adjusted = Expr::BinaryOp {
        left: Box::new(Expr::Variable("grade".to_string())),
        op: BinaryOperator::Minus,
        right: Box::new(Expr::Literal(bonus)),
    };
    Ok(exams.with_column("adjusted", &adjusted)?)
}

/// All exams in one subject, resolved through a freshly built hash index
/// rather than a table scan.
pub fn exams_for_subject(exams: &Table, subject: &str) -> Result<Table> {
    let index = HashIndex::from_table(exams, "subject")?;
    let rows = exams.filter_by_index(&index, &Value::Text(subject.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;
    use engine::RecordId;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    #[test]
    fn top_students_joins_filters_and_deduplicates() {
        let students = dataset::students().unwrap();
        let exams = dataset::exams().unwrap();
        let report = top_students(&students, &exams, 1.3).unwrap();
        assert_eq!(report.num_records(), 3);
        assert_eq!(report.value(RecordId(0), "student").unwrap(), &text("Anna"));
        assert_eq!(report.value(RecordId(1), "student").unwrap(), &text("Ben"));
        assert_eq!(report.value(RecordId(2), "student").unwrap(), &text("Eva"));
    }

    #[test]
    fn early_birds_keeps_first_and_second_semesters() {
        let students = dataset::students().unwrap();
        let report = early_birds(&students).unwrap();
        assert_eq!(report.num_records(), 3);
        assert_eq!(report.value(RecordId(0), "student").unwrap(), &text("Ben"));
        assert_eq!(report.value(RecordId(1), "student").unwrap(), &text("Denis"));
        assert_eq!(report.value(RecordId(2), "student").unwrap(), &text("Eva"));
    }

    #[test]
    fn grades_with_bonus_appends_a_real_column() {
        let exams = dataset::exams().unwrap();
        let adjusted = grades_with_bonus(&exams, 0.3).unwrap();
        assert_eq!(adjusted.num_records(), exams.num_records());
        assert_eq!(
            adjusted.value(RecordId(1), "adjusted").unwrap(),
            &Value::Real(1.3 - 0.3)
        );
    }

    #[test]
    fn subject_lookup_through_the_index_matches_the_data() {
        let exams = dataset::exams().unwrap();
        let software_design = exams_for_subject(&exams, "Software Design").unwrap();
        assert_eq!(software_design.num_records(), 3);
        let students: Vec<_> = software_design
            .records()
            .map(|record| record.values()[0].clone())
            .collect();
        assert_eq!(students, vec![text("Anna"), text("Ben"), text("Eva")]);
    }
}
