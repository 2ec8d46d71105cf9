//! Canonical CSV serialization.

use std::path::Path;

use srr_model::{CanonicalField, CanonicalRecord, Result};

/// Render the canonical record set as CSV text.
///
/// The header row is exactly the eleven canonical field names; fields
/// containing a comma or quote are wrapped in quotes with internal quotes
/// doubled. Lines end with `\n`, including the last one.
#[must_use]
pub fn render_csv(records: &[CanonicalRecord]) -> String {
    let mut out = String::new();
    let header: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.as_str()).collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for record in records {
        let fields: Vec<String> = CanonicalField::ALL
            .iter()
            .map(|&field| escape_field(record.render_field(field)))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Write the canonical record set to a CSV file.
pub fn write_csv(path: &Path, records: &[CanonicalRecord]) -> Result<()> {
    std::fs::write(path, render_csv(records))?;
    Ok(())
}

fn escape_field(value: String) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value
    }
}
