//! Check command: validate a description and report topology findings.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use blockmesh::{load_description, log_report};
use clap::Args;

use crate::output;
use crate::OutputFormat;

#[derive(Args)]
pub struct CheckArgs {
    /// Mesh description (.json or .toml)
    pub description: PathBuf,

    /// Fail when the topology report has findings
    #[arg(long)]
    pub strict: bool,
}

pub fn execute(args: CheckArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let description = load_description(&args.description)
        .with_context(|| format!("Failed to load {}", args.description.display()))?;
    let mesh = description
        .build()
        .with_context(|| format!("Invalid mesh in {}", args.description.display()))?;

    // The scale is only checked when rendering.
    mesh.to_dict(&description.dict_options())
        .with_context(|| format!("Cannot encode {}", args.description.display()))?;

    let report = mesh.topology_report();
    log_report(&report);

    output::report(&report, format, quiet);
    if report.is_clean() {
        output::success("No topology findings", format, quiet);
    } else {
        output::warning(
            &format!("{} topology findings", report.issue_count()),
            format,
            quiet,
        );
    }

    if args.strict && !report.is_clean() {
        bail!(
            "{} has {} topology findings",
            args.description.display(),
            report.issue_count()
        );
    }

    Ok(())
}
