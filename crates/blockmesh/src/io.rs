//! File I/O: mesh descriptions in, blockMeshDict out.

use std::fs;
use std::path::Path;

use tracing::info;
#[cfg(feature = "description")]
use tracing::debug;

use crate::dict::{write_dict, DictOptions};
use crate::error::{MeshError, MeshResult};
use crate::BlockMesh;

#[cfg(feature = "description")]
use crate::description::MeshDescription;

/// Supported description file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionFormat {
    Json,
    Toml,
}

impl DescriptionFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "json" => Some(DescriptionFormat::Json),
                "toml" => Some(DescriptionFormat::Toml),
                _ => None,
            })
    }
}

fn read_text(path: &Path) -> MeshResult<String> {
    fs::read_to_string(path).map_err(|e| MeshError::IoRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a mesh description, auto-detecting format from extension.
#[cfg(feature = "description")]
pub fn load_description(path: &Path) -> MeshResult<MeshDescription> {
    let format = DescriptionFormat::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path.extension().and_then(|e| e.to_str()).map(String::from),
    })?;

    info!("Loading mesh description from {:?} (format: {:?})", path, format);

    let text = read_text(path)?;
    let parsed = match format {
        DescriptionFormat::Json => MeshDescription::from_json(&text),
        DescriptionFormat::Toml => MeshDescription::from_toml(&text),
    };

    // Report the real file instead of the inline placeholder.
    let description = parsed.map_err(|e| match e {
        MeshError::ParseError { details, .. } => MeshError::ParseError {
            path: path.to_path_buf(),
            details,
        },
        other => other,
    })?;

    debug!(
        "Description has {} vertices, {} blocks, {} edges, {} patches",
        description.vertices.len(),
        description.blocks.len(),
        description.edges.len(),
        description.boundary.len()
    );

    Ok(description)
}

/// Read a header template to be copied verbatim into the dictionary.
pub fn load_header(path: &Path) -> MeshResult<String> {
    read_text(path)
}

/// Serialize the mesh and write it to `path`.
///
/// The text is rendered completely before the file is created, so an
/// encoding failure never leaves a partial dictionary behind. Missing parent
/// directories are created.
pub fn save_dict(mesh: &BlockMesh, options: &DictOptions, path: &Path) -> MeshResult<()> {
    let text = write_dict(mesh, options)?;

    info!("Saving blockMeshDict to {:?}", path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| MeshError::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, text.as_bytes()).map_err(|e| MeshError::IoWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(
        "Saved {} blocks and {} patches to {:?}",
        mesh.blocks().len(),
        mesh.patches().len(),
        path
    );

    Ok(())
}
