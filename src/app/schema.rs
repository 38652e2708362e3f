//! Schema validation for decoded rows
//!
//! Structural checks are made against the first row only: every required
//! column must be among its keys. Numeric columns are sampled and reported
//! as warnings; a dataset never fails validation because of them.

use tracing::{debug, warn};

use crate::app::models::{Row, Schema};
use crate::constants::validation::{NUMERIC_SAMPLE_ROWS, NUMERIC_STRIP_CHARS};
use crate::errors::{ValidationError, ValidationResult};

/// Advisory finding for a numeric column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericWarning {
    /// Column declared numeric
    pub column: String,
    /// Index of the first offending row
    pub row_index: usize,
    /// Offending cell text
    pub value: String,
}

/// Outcome of a successful validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Rows validated
    pub row_count: usize,
    /// Columns of the first row
    pub columns: Vec<String>,
    /// Numeric columns holding non-numeric samples
    pub warnings: Vec<NumericWarning>,
}

impl ValidationReport {
    /// Whether validation produced no warnings
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Validate rows against a schema
///
/// # Errors
///
/// * `ValidationError::EmptyDataset` if there are no rows
/// * `ValidationError::MissingColumns` listing every required column absent
///   from the first row, in schema order
pub fn validate(rows: &[Row], schema: &Schema) -> ValidationResult<ValidationReport> {
    let first = rows.first().ok_or(ValidationError::EmptyDataset)?;

    let missing: Vec<String> = schema
        .required_columns
        .iter()
        .filter(|column| !first.contains_key(column))
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingColumns { missing });
    }

    let warnings = schema
        .numeric_columns
        .iter()
        .filter_map(|column| sample_numeric_column(rows, column))
        .collect();

    let report = ValidationReport {
        row_count: rows.len(),
        columns: first.keys().map(str::to_string).collect(),
        warnings,
    };

    debug!(
        "Validated {} rows ({} columns, {} numeric warnings)",
        report.row_count,
        report.columns.len(),
        report.warnings.len()
    );
    Ok(report)
}

/// Check the leading rows of one column, stopping at the first bad value
fn sample_numeric_column(rows: &[Row], column: &str) -> Option<NumericWarning> {
    for (row_index, row) in rows.iter().take(NUMERIC_SAMPLE_ROWS).enumerate() {
        let text = row.get(column).map(|cell| cell.to_string()).unwrap_or_default();
        let stripped: String = text
            .chars()
            .filter(|c| !NUMERIC_STRIP_CHARS.contains(c))
            .collect();

        if !stripped.is_empty() && !is_numeric_like(&stripped) {
            warn!(
                "Column '{}' declared numeric but row {} holds '{}'",
                column, row_index, text
            );
            return Some(NumericWarning {
                column: column.to_string(),
                row_index,
                value: text,
            });
        }
    }
    None
}

/// Lenient numeric coercion
///
/// Surrounding whitespace is ignored and whitespace-only text coerces to
/// zero. Decimal, exponent, `Infinity` and `0x`/`0o`/`0b` integer forms are
/// accepted; `NaN` is not.
pub fn is_numeric_like(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }

    let radix = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .iter()
        .find_map(|(prefix, radix)| trimmed.strip_prefix(*prefix).map(|digits| (digits, *radix)));
    if let Some((digits, radix)) = radix {
        return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    }

    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if unsigned == "Infinity" {
        return trimmed.len() - unsigned.len() <= 1;
    }

    // Rust accepts "inf"/"nan" spellings that are not numbers here
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return false;
    }

    trimmed.parse::<f64>().map_or(false, |n| !n.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::CellValue;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::from(*v)))
            .collect()
    }

    fn schema(required: &[&str], numeric: &[&str]) -> Schema {
        Schema {
            required_columns: required.iter().map(|s| s.to_string()).collect(),
            numeric_columns: numeric.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let result = validate(&[], &schema(&["a"], &[]));
        assert_eq!(result, Err(ValidationError::EmptyDataset));
    }

    #[test]
    fn test_required_columns_present() {
        let rows = vec![row(&[("a", "1"), ("b", "2")]), row(&[("a", "3"), ("b", "4")])];
        let report = validate(&rows, &schema(&["a", "b"], &[])).unwrap();
        assert_eq!(report.row_count, 2);
        assert_eq!(report.columns, vec!["a", "b"]);
        assert!(report.is_clean());
    }

    #[test]
    fn test_missing_columns_listed_in_schema_order() {
        let rows = vec![row(&[("b", "1")])];
        let result = validate(&rows, &schema(&["c", "b", "a"], &[]));
        assert_eq!(
            result,
            Err(ValidationError::MissingColumns {
                missing: vec!["c".to_string(), "a".to_string()],
            })
        );
    }

    #[test]
    fn test_only_first_row_is_structurally_checked() {
        // Later rows lacking a column do not fail validation
        let rows = vec![row(&[("a", "1"), ("b", "2")]), row(&[("a", "3")])];
        assert!(validate(&rows, &schema(&["a", "b"], &[])).is_ok());

        // Missing-column outcome is independent of the order of later rows
        let first = row(&[("a", "1")]);
        let others = vec![row(&[("a", "2"), ("b", "x")]), row(&[("b", "y")])];
        let mut forward = vec![first.clone()];
        forward.extend(others.iter().cloned());
        let mut backward = vec![first];
        backward.extend(others.iter().rev().cloned());
        let s = schema(&["a", "b"], &[]);
        assert_eq!(validate(&forward, &s), validate(&backward, &s));
    }

    #[test]
    fn test_numeric_sampling_is_advisory() {
        let rows = vec![
            row(&[("price", "$1,200.50"), ("pct", "12%")]),
            row(&[("price", "n/a"), ("pct", "")]),
            row(&[("price", "oops"), ("pct", "7.5")]),
        ];
        let report = validate(&rows, &schema(&["price"], &["price", "pct", "absent"])).unwrap();

        // One warning per column, at the first bad row
        assert_eq!(
            report.warnings,
            vec![NumericWarning {
                column: "price".to_string(),
                row_index: 1,
                value: "n/a".to_string(),
            }]
        );
    }

    #[test]
    fn test_numeric_sampling_limited_to_leading_rows() {
        let mut rows: Vec<Row> = (0..NUMERIC_SAMPLE_ROWS)
            .map(|i| row(&[("n", i.to_string().as_str())]))
            .collect();
        rows.push(row(&[("n", "not a number")]));

        let report = validate(&rows, &schema(&[], &["n"])).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_numeric_coercion() {
        let accepted = [
            "1", " 2 ", "-3.5", "+4", "1e3", ".5", "0x1F", "0b101", "Infinity", "-Infinity", "  ",
        ];
        for text in accepted {
            assert!(is_numeric_like(text), "should accept {:?}", text);
        }
        let rejected = ["abc", "NaN", "nan", "inf", "1,2.3.4", "0x", "0xZZ", "--1", "12abc"];
        for text in rejected {
            assert!(!is_numeric_like(text), "should reject {:?}", text);
        }
    }
}
