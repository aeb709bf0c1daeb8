//! Tables rendered with comfy-table.

use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use pkgchain_core::OrderedGraph;

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(*h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        )
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn flag(value: bool, color: Color) -> Cell {
    if value {
        Cell::new("yes").fg(color)
    } else {
        Cell::new("no").fg(Color::DarkGrey)
    }
}

pub fn print_order_table(graph: &OrderedGraph) {
    let mut table = new_table(&["#", "Package", "Version", "Provides", "Cycle", "Location"]);
    for (idx, node) in graph.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1).fg(Color::DarkGrey),
            Cell::new(&node.symbolic_name).fg(Color::White),
            Cell::new(node.manifest.version.as_deref().unwrap_or("-")).fg(Color::Cyan),
            flag(node.is_dependency_of_another, Color::Green),
            flag(node.participates_in_cycle, Color::Yellow),
            Cell::new(node.location.display()).fg(Color::DarkGrey),
        ]);
    }
    println!("{}", table);
}

/// One line of `check` output.
pub struct ActualityRow {
    pub name: String,
    pub declared: String,
    pub actual: Option<String>,
    pub relaxed: bool,
    pub actual_ok: bool,
}

pub fn print_actuality_table(rows: &[ActualityRow]) {
    let mut table = new_table(&["Dependency", "Declared", "Current", "Mode", "Status"]);
    for row in rows {
        let status = if row.actual_ok {
            Cell::new("actual").fg(Color::Green)
        } else {
            Cell::new("stale").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&row.name).fg(Color::White),
            Cell::new(&row.declared),
            Cell::new(row.actual.as_deref().unwrap_or("-")).fg(Color::Cyan),
            Cell::new(if row.relaxed { "range" } else { "exact" }).fg(Color::DarkGrey),
            status,
        ]);
    }
    println!("{}", table);
}
