use std::fmt::Write;

use comfy_table::{Cell, Color as TableColor};

use crate::records::NeatConfig;

use super::styling::{bright, bright_green, bright_yellow, dim};
use super::tables::{create_table, disposition_cell};

/// Prints a human-readable disposition report to stdout.
///
/// Displays one row per NEAT config found in the bucket:
/// - Key: the full object key
/// - Last Modified: the upload timestamp, formatted as it will appear in
///   downloaded filenames
/// - Disposition: "will be run" (green) or "will NOT be run" (red)
pub fn print_summary(records: &[NeatConfig]) {
    println!("{}", render_summary(records));
}

// Helper functions

fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

#[allow(clippy::format_push_string)]
fn render_summary(records: &[NeatConfig]) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📋", "NEAT configs");

    if records.is_empty() {
        output.push_str(&format!(
            "  {}\n",
            bright_yellow("No NEAT configs found; nothing to do.")
        ));
        return output;
    }

    let eligible = records.iter().filter(|record| record.to_run).count();
    let eligible_display = if eligible > 0 {
        bright_green(eligible)
    } else {
        bright_yellow(eligible)
    };

    output.push_str(&format!(
        "  {} {}\n  {} {}\n\n",
        dim("Found:"),
        bright_yellow(records.len()),
        dim("Will be run:"),
        eligible_display
    ));

    let mut table = create_table();
    table.set_header(create_cyan_header(&["Key", "Last Modified", "Disposition"]));

    for record in records {
        table.add_row(vec![
            Cell::new(&record.key),
            Cell::new(&record.last_modified),
            disposition_cell(record.to_run),
        ]);
    }

    let _ = writeln!(output, "{table}");

    output
}
