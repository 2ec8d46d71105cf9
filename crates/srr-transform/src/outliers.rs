//! IQR-based outlier capping over the normalized dataset.

use std::collections::BTreeMap;

use srr_model::{CanonicalField, CanonicalRecord};

use crate::stats::{IqrBounds, iqr_bounds};

/// Bounds and clamp counts produced by one capping pass.
#[derive(Debug, Clone, Default)]
pub struct CapReport {
    /// Computed bounds per bounded field (absent for degenerate samples).
    pub bounds: BTreeMap<CanonicalField, IqrBounds>,
    /// Number of values clamped per field; fields with no clamps are omitted.
    pub capped: BTreeMap<CanonicalField, usize>,
}

impl CapReport {
    /// Total values clamped across all fields.
    #[must_use]
    pub fn total_capped(&self) -> usize {
        self.capped.values().sum()
    }
}

/// Clamp every record's bounded fields into their IQR bounds, in place.
///
/// Bounds are recomputed from the normalized dataset itself; a field with
/// fewer than 3 values is skipped entirely.
pub fn cap_outliers(records: &mut [CanonicalRecord]) -> CapReport {
    let mut report = CapReport::default();
    for field in CanonicalField::ALL.into_iter().filter(|f| f.is_bounded()) {
        let values: Vec<f64> = records
            .iter()
            .filter_map(|record| record.bounded_value(field))
            .collect();
        let Some(bounds) = iqr_bounds(&values) else {
            continue;
        };
        report.bounds.insert(field, bounds);
        let mut capped = 0usize;
        for record in records.iter_mut() {
            let Some(value) = record.bounded_value(field) else {
                continue;
            };
            if value < bounds.lower {
                record.set_bounded_value(field, bounds.lower);
                capped += 1;
            } else if value > bounds.upper {
                record.set_bounded_value(field, bounds.upper);
                capped += 1;
            }
        }
        if capped > 0 {
            tracing::debug!(field = %field, capped, lower = bounds.lower, upper = bounds.upper, "capped outliers");
            report.capped.insert(field, capped);
        }
    }
    report
}
