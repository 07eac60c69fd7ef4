use colored::Colorize;
use std::io::Write;

/// Print the main header with box-drawing characters.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "{}",
        "╔════════════════════════════════════════╗".cyan()
    )?;
    writeln!(
        writer,
        "{}",
        "║  Repeated Subgraph Scan Results        ║".cyan().bold()
    )?;
    writeln!(
        writer,
        "{}",
        "╚════════════════════════════════════════╝".cyan()
    )?;
    writeln!(writer)?;
    Ok(())
}

/// Print summary with colored "pills".
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary_pills(
    writer: &mut impl Write,
    classes: usize,
    occurrences: usize,
    functions_with_duplicates: usize,
) -> std::io::Result<()> {
    fn pill(label: &str, count: usize) -> String {
        if count == 0 {
            format!("{}: {}", label, count.to_string().green())
        } else {
            format!("{}: {}", label, count.to_string().red().bold())
        }
    }

    writeln!(
        writer,
        "{}  {}  {}",
        pill("Classes", classes),
        pill("Copies", occurrences),
        pill("Functions w/ duplication", functions_with_duplicates),
    )?;
    writeln!(writer)?;
    Ok(())
}

/// Print scan statistics (functions and blocks processed).
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_scan_stats(
    writer: &mut impl Write,
    total_functions: usize,
    total_blocks: usize,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "{}",
        format!(
            "Scanned {} functions ({} basic blocks)",
            total_functions.to_string().bold(),
            total_blocks.to_string().bold()
        )
        .dimmed()
    )?;
    writeln!(writer)?;
    Ok(())
}
