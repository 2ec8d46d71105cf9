//! Raw header resolution against the canonical alias registry.

use srr_model::{
    CanonicalField, ColumnMapping, FallbackColumns, RefineError, Result, SchemaMapping,
};

/// Normalizes a header for comparison: lowercase, trimmed, internal
/// whitespace runs collapsed to a single underscore.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn header_matches(normalized: &str, alias: &str) -> bool {
    normalized == alias || normalized.contains(alias) || alias.contains(normalized)
}

/// Resolve raw headers to canonical fields.
///
/// Canonical fields are visited in schema order; for each field, its
/// aliases are tried in priority order and the first raw header (in header
/// order) whose normalized form matches wins. A header claimed by an
/// earlier field is not offered to later fields, so each raw column feeds
/// at most one canonical field.
#[must_use]
pub fn resolve_columns(headers: &[String]) -> SchemaMapping {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let mut claimed = vec![false; headers.len()];
    let mut mappings = Vec::with_capacity(CanonicalField::COUNT);
    for field in CanonicalField::ALL {
        let mut found = None;
        'aliases: for alias in field.aliases() {
            for (idx, header) in normalized.iter().enumerate() {
                if claimed[idx] {
                    continue;
                }
                if header_matches(header, alias) {
                    found = Some(idx);
                    break 'aliases;
                }
            }
        }
        if let Some(idx) = found {
            claimed[idx] = true;
            tracing::debug!(field = %field, header = %headers[idx], "resolved column");
        }
        mappings.push(ColumnMapping {
            canonical: field,
            raw_header: found.map(|idx| headers[idx].clone()),
        });
    }
    SchemaMapping {
        mappings,
        fallback: detect_fallback_columns(headers),
    }
}

/// Detect derivation columns that are not direct alias matches.
#[must_use]
pub fn detect_fallback_columns(headers: &[String]) -> FallbackColumns {
    let mut fallback = FallbackColumns::default();
    for header in headers {
        let lower = header.to_lowercase();
        if lower.contains("mid") && lower.contains("subject") {
            if fallback.midterm_subjects.len() < 3 {
                fallback.midterm_subjects.push(header.clone());
            }
        } else if fallback.sem1_gpa.is_none() && lower.contains("gpa") && lower.contains("sem1") {
            fallback.sem1_gpa = Some(header.clone());
        } else if fallback.sem2_gpa.is_none() && lower.contains("gpa") && lower.contains("sem2") {
            fallback.sem2_gpa = Some(header.clone());
        }
    }
    fallback
}

/// Guardrail: fail when the input has no recognizable metric content.
///
/// An input is refinable when at least one metric-bearing field resolved,
/// or when derivation columns exist for engagement or the trend. Otherwise
/// the whole run aborts with an [`RefineError::UnrecognizedSchema`] that
/// echoes the detected headers.
pub fn ensure_recognizable(mapping: &SchemaMapping, headers: &[String]) -> Result<()> {
    let metrics_mapped = mapping
        .mappings
        .iter()
        .filter(|m| m.canonical.is_metric() && m.matched())
        .count();
    if metrics_mapped == 0 && !mapping.fallback.any_present() {
        tracing::warn!(
            headers = headers.len(),
            "no metric columns or derivation columns detected"
        );
        return Err(RefineError::unrecognized_schema(headers));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_header("  Student  ID "), "student_id");
        assert_eq!(normalize_header("Attendance_%"), "attendance_%");
    }

    #[test]
    fn matches_on_containment_both_ways() {
        assert!(header_matches("attendance_%", "attendance"));
        assert!(header_matches("gpa", "cgpa"));
        assert!(!header_matches("foo", "attendance"));
    }

    #[test]
    fn midterm_detection_caps_at_three() {
        let headers: Vec<String> = (1..=4).map(|i| format!("MID1_Subject{i}")).collect();
        let fallback = detect_fallback_columns(&headers);
        assert_eq!(fallback.midterm_subjects.len(), 3);
        assert_eq!(fallback.midterm_subjects[0], "MID1_Subject1");
    }

    #[test]
    fn sem_gpa_detection_is_case_insensitive() {
        let headers = vec!["Sem1_GPA".to_string(), "sem2_gpa".to_string()];
        let fallback = detect_fallback_columns(&headers);
        assert_eq!(fallback.sem1_gpa.as_deref(), Some("Sem1_GPA"));
        assert_eq!(fallback.sem2_gpa.as_deref(), Some("sem2_gpa"));
    }
}
