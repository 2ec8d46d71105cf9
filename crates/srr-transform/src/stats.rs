//! Per-field statistics: imputation means and quartile-derived bounds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use srr_ingest::RawTable;
use srr_model::{CanonicalField, SchemaMapping};

/// Parses a cell as f64, rejecting empty strings and non-finite values.
#[must_use]
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rounds to 2 decimal places.
#[must_use]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Rounds to 3 decimal places.
#[must_use]
pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Arithmetic means per mean-imputed field, computed over parseable cells
/// of the resolved raw column.
///
/// A field with no resolved column, or whose column has zero parseable
/// cells, has no mean; the normalizer falls back to the field's hardcoded
/// default in that case.
#[derive(Debug, Clone, Default)]
pub struct FieldMeans {
    means: BTreeMap<CanonicalField, f64>,
}

impl FieldMeans {
    /// The mean for `field`, if one was computable.
    #[must_use]
    pub fn get(&self, field: CanonicalField) -> Option<f64> {
        self.means.get(&field).copied()
    }

    /// All computed means, keyed by field.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<CanonicalField, f64> {
        &self.means
    }
}

/// Pass A: compute imputation means over the raw table.
#[must_use]
pub fn compute_means(table: &RawTable, mapping: &SchemaMapping) -> FieldMeans {
    let mut means = BTreeMap::new();
    for field in CanonicalField::ALL {
        if !field.is_mean_imputed() {
            continue;
        }
        let Some(header) = mapping.raw_header(field) else {
            continue;
        };
        let values: Vec<f64> = (0..table.row_count())
            .filter_map(|row| table.cell(row, header).and_then(parse_f64))
            .collect();
        if values.is_empty() {
            continue;
        }
        let mean = round2(values.iter().sum::<f64>() / values.len() as f64);
        tracing::debug!(field = %field, mean, samples = values.len(), "computed column mean");
        means.insert(field, mean);
    }
    FieldMeans { means }
}

/// Accounting pass: per mean-imputed field with a resolved column, count
/// the cells that will need substitution during normalization. Fields with
/// nothing to fill are omitted.
#[must_use]
pub fn count_unparseable(
    table: &RawTable,
    mapping: &SchemaMapping,
) -> BTreeMap<CanonicalField, usize> {
    let mut counts = BTreeMap::new();
    for field in CanonicalField::ALL {
        if !field.is_mean_imputed() {
            continue;
        }
        let Some(header) = mapping.raw_header(field) else {
            continue;
        };
        let missing = (0..table.row_count())
            .filter(|&row| {
                table
                    .cell(row, header)
                    .is_none_or(|cell| parse_f64(cell).is_none())
            })
            .count();
        if missing > 0 {
            counts.insert(field, missing);
        }
    }
    counts
}

/// Quartile-derived outlier bounds for one bounded field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    /// `q1 - 1.5 * iqr`, rounded to 2 decimals.
    pub lower: f64,
    /// `q3 + 1.5 * iqr`, rounded to 2 decimals.
    pub upper: f64,
}

/// Pass B: index-based quartiles over a value set.
///
/// Quartiles are taken at the 25th/75th percentile indices of the sorted
/// values without interpolation. Returns `None` for fewer than 3 values
/// (statistically degenerate sample).
#[must_use]
pub fn iqr_bounds(values: &[f64]) -> Option<IqrBounds> {
    if values.len() < 3 {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = sorted[(sorted.len() as f64 * 0.25).floor() as usize];
    let q3 = sorted[(sorted.len() as f64 * 0.75).floor() as usize];
    let iqr = q3 - q1;
    Some(IqrBounds {
        q1,
        q3,
        lower: round2(q1 - 1.5 * iqr),
        upper: round2(q3 + 1.5 * iqr),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use srr_map::resolve_columns;

    #[test]
    fn parse_rejects_empty_and_non_numeric() {
        assert_eq!(parse_f64(" 42.5 "), Some(42.5));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64("n/a"), None);
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("inf"), None);
    }

    #[test]
    fn means_are_rounded_to_two_decimals() {
        let table = RawTable::parse("attendance_rate\n70\n71\n73\n").expect("parse");
        let mapping = resolve_columns(table.headers());
        let means = compute_means(&table, &mapping);
        // (70 + 71 + 73) / 3 = 71.333...
        assert_eq!(means.get(CanonicalField::AttendanceRate), Some(71.33));
    }

    #[test]
    fn column_with_no_parseable_cells_has_no_mean() {
        let table = RawTable::parse("attendance_rate,failure_ratio\nx,0.2\ny,0.4\n")
            .expect("parse");
        let mapping = resolve_columns(table.headers());
        let means = compute_means(&table, &mapping);
        assert_eq!(means.get(CanonicalField::AttendanceRate), None);
        assert_eq!(means.get(CanonicalField::FailureRatio), Some(0.3));
    }

    #[test]
    fn unparseable_counts_skip_clean_columns() {
        let table =
            RawTable::parse("attendance_rate,failure_ratio\n70,\n,0.2\n80,0.1\n").expect("parse");
        let mapping = resolve_columns(table.headers());
        let counts = count_unparseable(&table, &mapping);
        assert_eq!(counts.get(&CanonicalField::AttendanceRate), Some(&1));
        assert_eq!(counts.get(&CanonicalField::FailureRatio), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn iqr_bounds_use_index_based_quartiles() {
        let values = [70.0, 72.0, 71.0, 500.0, 69.0, 73.0, 74.0];
        let bounds = iqr_bounds(&values).expect("bounds");
        // sorted: [69, 70, 71, 72, 73, 74, 500]; q1 = idx 1, q3 = idx 5
        assert_eq!(bounds.q1, 70.0);
        assert_eq!(bounds.q3, 74.0);
        assert_eq!(bounds.lower, 64.0);
        assert_eq!(bounds.upper, 80.0);
    }

    #[test]
    fn degenerate_samples_have_no_bounds() {
        assert!(iqr_bounds(&[]).is_none());
        assert!(iqr_bounds(&[1.0, 2.0]).is_none());
        assert!(iqr_bounds(&[1.0, 2.0, 3.0]).is_some());
    }

    #[test]
    fn bounds_bracket_the_median() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        let bounds = iqr_bounds(&values).expect("bounds");
        let median = 30.0;
        assert!(bounds.lower <= median && median <= bounds.upper);
    }
}
