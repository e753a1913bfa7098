//! Terminal and JSON output for CLI results.

use blockmesh::TopologyReport;
use colored::Colorize;
use serde::Serialize;

use crate::OutputFormat;

/// Print `value` as pretty JSON when JSON output was requested.
pub fn json<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet || format != OutputFormat::Json {
        return;
    }

    if let Ok(text) = serde_json::to_string_pretty(value) {
        println!("{}", text);
    }
}

/// Print a success message.
pub fn success(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format == OutputFormat::Json {
        return;
    }
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print a warning message to stderr.
pub fn warning(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format == OutputFormat::Json {
        return;
    }
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print a topology report, one finding per line.
pub fn report(report: &TopologyReport, format: OutputFormat, quiet: bool) {
    if format == OutputFormat::Json {
        json(report, format, quiet);
        return;
    }
    if quiet {
        return;
    }

    println!("{}", "Block mesh".bold());
    println!("  vertices  {}", report.vertex_count);
    println!("  blocks    {}", report.block_count);
    println!("  cells     {}", report.cell_count);
    println!("  patches   {}", report.patch_count);

    for pf in &report.orphan_faces {
        println!(
            "  {} face {} of patch {:?} {:?} is not on a block",
            "orphan".red(),
            pf.face,
            pf.patch,
            pf.vertices
        );
    }
    for pf in &report.internal_faces {
        println!(
            "  {} face {} of patch {:?} {:?} is shared by two blocks",
            "internal".red(),
            pf.face,
            pf.patch,
            pf.vertices
        );
    }
    for edge in &report.stray_edges {
        println!("  {} edge {} does not follow a block edge", "stray".yellow(), edge);
    }
    for edge in &report.duplicate_edges {
        println!("  {} edge {} repeats an earlier edge", "duplicate".yellow(), edge);
    }
    if report.unpatched_face_count > 0 {
        println!(
            "  {} exposed faces fall into the default patch",
            report.unpatched_face_count.to_string().dimmed()
        );
    }
}
