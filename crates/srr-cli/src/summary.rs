//! Terminal summary tables.

use std::collections::BTreeMap;
use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use srr_model::RefineSummary;

fn header_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

fn count_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Print the terminal refinement summary.
pub fn print_refine_summary(summary: &RefineSummary, output: &Path) {
    println!("Output: {}", output.display());
    let mut table = base_table();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    table.add_row(vec![Cell::new("Rows refined"), count_cell(summary.total_rows)]);
    table.add_row(vec![
        Cell::new("Columns mapped"),
        count_cell(summary.mapped_columns),
    ]);
    table.add_row(vec![
        Cell::new("Columns unmapped"),
        count_cell(summary.unmapped_columns),
    ]);
    table.add_row(vec![
        Cell::new("Missing values filled"),
        count_cell(summary.missing_values_filled),
    ]);
    table.add_row(vec![
        Cell::new("Outliers capped"),
        count_cell(summary.outliers_capped),
    ]);
    println!("{table}");
}

/// Print the final risk-category distribution after an import.
pub fn print_distribution(distribution: &BTreeMap<String, u64>) {
    if distribution.is_empty() {
        return;
    }
    let mut table = base_table();
    table.set_header(vec![header_cell("Risk category"), header_cell("Students")]);
    for (category, count) in distribution {
        table.add_row(vec![Cell::new(category), count_cell(count)]);
    }
    println!("{table}");
}
