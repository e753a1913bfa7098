//! Render command: description in, blockMeshDict out.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blockmesh::{load_description, load_header};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::output;
use crate::OutputFormat;

#[derive(Args)]
pub struct RenderArgs {
    /// Mesh description (.json or .toml)
    pub description: PathBuf,

    /// Output path (default: system/blockMeshDict beside the description)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the description's scale factor
    #[arg(long)]
    pub scale: Option<f64>,

    /// File copied verbatim in place of the standard FoamFile header
    #[arg(long)]
    pub header: Option<PathBuf>,
}

#[derive(Serialize)]
struct RenderSummary {
    output: PathBuf,
    vertices: usize,
    blocks: usize,
    edges: usize,
    patches: usize,
    cells: u64,
}

fn default_output(description: &Path) -> PathBuf {
    description
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("system")
        .join("blockMeshDict")
}

pub fn execute(args: RenderArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let description = load_description(&args.description)
        .with_context(|| format!("Failed to load {}", args.description.display()))?;
    let mesh = description
        .build()
        .with_context(|| format!("Invalid mesh in {}", args.description.display()))?;

    let mut options = description.dict_options();
    if let Some(scale) = args.scale {
        options.scale = scale;
    }
    if let Some(path) = &args.header {
        options.header = load_header(path)
            .with_context(|| format!("Failed to read header {}", path.display()))?;
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.description));
    mesh.save(&options, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!("Rendered {:?} to {:?}", args.description, output_path);

    let summary = RenderSummary {
        output: output_path,
        vertices: mesh.vertex_count(),
        blocks: mesh.blocks().len(),
        edges: mesh.edges().len(),
        patches: mesh.patches().len(),
        cells: mesh.cell_count(),
    };

    output::json(&summary, format, quiet);
    output::success(
        &format!(
            "Wrote {} ({} blocks, {} cells, {} patches)",
            summary.output.display(),
            summary.blocks,
            summary.cells,
            summary.patches
        ),
        format,
        quiet,
    );

    Ok(())
}
