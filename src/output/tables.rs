use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn disposition_cell(to_run: bool) -> Cell {
    if to_run {
        Cell::new("will be run").fg(TableColor::Green)
    } else {
        Cell::new("will NOT be run").fg(TableColor::Red)
    }
}
