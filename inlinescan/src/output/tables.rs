use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use std::io::Write;

use crate::cfg::CfgStore;
use crate::matcher::MatchedClass;

fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);

    if cfg!(test) {
        table.set_width(120);
    }
    table
}

fn format_path(path: &[u32], cfg: &CfgStore) -> String {
    let nodes: Vec<String> = path
        .iter()
        .map(|&id| {
            cfg.get(id)
                .map_or_else(|| format!("{id}"), |b| format!("{id}@{:x}", b.start))
        })
        .collect();
    format!("[{}]", nodes.join(" "))
}

/// Print the repeated-subgraph classes of one function.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_matched_classes(
    writer: &mut impl Write,
    title: &str,
    classes: &[MatchedClass],
    cfg: &CfgStore,
) -> std::io::Result<()> {
    if classes.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", title.bold().underline())?;
    let mut table = create_table(vec!["Subgraph", "Blocks", "Copies", "Node Sets"]);

    for class in classes {
        let sets = class
            .paths
            .iter()
            .map(|p| format_path(p, cfg))
            .collect::<Vec<_>>()
            .join(", ");
        let short_id: String = class.subgraph_hash.chars().take(12).collect();

        table.add_row(vec![
            Cell::new(short_id).add_attribute(Attribute::Dim),
            Cell::new(class.paths.first().map_or(0, Vec::len)),
            Cell::new(class.paths.len()).fg(Color::Yellow),
            Cell::new(sets),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}
