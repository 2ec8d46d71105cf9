//! Column mapping types produced by the resolver.

use serde::{Deserialize, Serialize};

use crate::schema::CanonicalField;

/// The resolved raw column (if any) for one canonical field.
///
/// Built once per input during column resolution; immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// The canonical field this mapping is for.
    pub canonical: CanonicalField,
    /// The raw header claimed for this field, in its original spelling.
    pub raw_header: Option<String>,
}

impl ColumnMapping {
    /// True when a raw column was found for this field.
    #[must_use]
    pub fn matched(&self) -> bool {
        self.raw_header.is_some()
    }
}

/// Raw columns that feed derivation rules without being direct mappings.
///
/// Detected case-insensitively from the raw headers: mid-term subject score
/// columns (headers containing both `mid` and `subject`, first three in
/// header order) drive the engagement derivation, and the two semester-GPA
/// columns drive the performance-trend derivation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallbackColumns {
    /// Up to three mid-term subject score columns, in header order.
    pub midterm_subjects: Vec<String>,
    /// First-semester GPA column.
    pub sem1_gpa: Option<String>,
    /// Second-semester GPA column.
    pub sem2_gpa: Option<String>,
}

impl FallbackColumns {
    /// True when any derivation column was detected.
    #[must_use]
    pub fn any_present(&self) -> bool {
        !self.midterm_subjects.is_empty() || self.sem1_gpa.is_some() || self.sem2_gpa.is_some()
    }
}

/// Complete resolution result: one mapping per canonical field, plus the
/// detected fallback-derivation columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaMapping {
    /// One entry per canonical field, in schema order.
    pub mappings: Vec<ColumnMapping>,
    /// Derivation columns detected alongside the direct mappings.
    pub fallback: FallbackColumns,
}

impl SchemaMapping {
    /// The raw header resolved for `field`, if any.
    #[must_use]
    pub fn raw_header(&self, field: CanonicalField) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.canonical == field)
            .and_then(|m| m.raw_header.as_deref())
    }

    /// Number of canonical fields with a resolved raw column.
    #[must_use]
    pub fn mapped_count(&self) -> usize {
        self.mappings.iter().filter(|m| m.matched()).count()
    }

    /// Number of canonical fields without a resolved raw column.
    ///
    /// `mapped_count() + unmapped_count()` always equals the schema size.
    #[must_use]
    pub fn unmapped_count(&self) -> usize {
        CanonicalField::COUNT - self.mapped_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_and_unmapped_sum_to_schema_size() {
        let mappings = CanonicalField::ALL
            .into_iter()
            .map(|canonical| ColumnMapping {
                canonical,
                raw_header: canonical.is_bounded().then(|| canonical.as_str().to_string()),
            })
            .collect();
        let mapping = SchemaMapping {
            mappings,
            fallback: FallbackColumns::default(),
        };
        assert_eq!(mapping.mapped_count(), 3);
        assert_eq!(mapping.unmapped_count(), 8);
        assert_eq!(
            mapping.mapped_count() + mapping.unmapped_count(),
            CanonicalField::COUNT
        );
    }
}
