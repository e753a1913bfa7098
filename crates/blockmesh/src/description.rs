//! Serializable mesh descriptions.
//!
//! A geometry provider can hand over a [`MeshDescription`] as JSON or TOML
//! instead of driving [`MeshBuilder`] directly. Patches are a list, so the
//! output order always matches the file.
//!
//! ```toml
//! scale = 0.001
//! vertices = [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0],
//!             [0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]]
//!
//! [[blocks]]
//! vertices = [0, 1, 2, 3, 4, 5, 6, 7]
//! cells = [10, 10, 10]
//! grading = [1, 1, 2]
//!
//! [[boundary]]
//! name = "top"
//! type = "wall"
//! block_faces = [{ block = 0, side = "top" }]
//! ```

use std::path::PathBuf;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dict::DictOptions;
use crate::error::{MeshError, MeshResult, Owner};
use crate::types::{BlockSide, Curve, Grading, PatchType};
use crate::{BlockMesh, BlockSpec, MeshBuilder};

/// Whole-mesh description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshDescription {
    /// Global scale factor written to the dictionary.
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Vertex coordinates; a vertex's index is its position here.
    pub vertices: Vec<[f64; 3]>,

    #[serde(default)]
    pub blocks: Vec<BlockDescription>,

    #[serde(default)]
    pub edges: Vec<EdgeDescription>,

    #[serde(default)]
    pub boundary: Vec<PatchDescription>,

    /// Pairs of patch names to merge.
    #[serde(default)]
    pub merge_patch_pairs: Vec<[String; 2]>,
}

/// One hexahedral block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockDescription {
    pub vertices: Vec<usize>,

    /// Signed so that zero and negative counts surface as shape errors
    /// rather than parse errors.
    pub cells: Vec<i64>,

    /// 3 or 12 expansion ratios; uniform when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Curve type of a described edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    #[serde(rename = "arc")]
    Arc,
    #[serde(rename = "spline")]
    Spline,
    #[serde(rename = "polyLine")]
    PolyLine,
    #[serde(rename = "BSpline")]
    BSpline,
}

/// One curved edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeDescription {
    #[serde(rename = "type")]
    pub kind: CurveKind,
    pub start: usize,
    pub end: usize,
    /// Interior points; exactly one for an arc.
    pub points: Vec<[f64; 3]>,
}

/// A block side used as a boundary face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockFaceRef {
    pub block: usize,
    pub side: String,
}

/// One boundary patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchDescription {
    pub name: String,

    #[serde(rename = "type", default = "default_patch_type")]
    pub kind: String,

    /// Faces as explicit vertex indices.
    #[serde(default)]
    pub faces: Vec<Vec<usize>>,

    /// Faces as named block sides, appended after `faces`.
    #[serde(default)]
    pub block_faces: Vec<BlockFaceRef>,
}

fn default_scale() -> f64 {
    1.0
}

fn default_patch_type() -> String {
    "patch".to_string()
}

impl MeshDescription {
    /// Parse a JSON description.
    pub fn from_json(json: &str) -> MeshResult<Self> {
        serde_json::from_str(json).map_err(|e| MeshError::ParseError {
            path: PathBuf::from("<json>"),
            details: e.to_string(),
        })
    }

    /// Parse a TOML description.
    pub fn from_toml(toml_str: &str) -> MeshResult<Self> {
        toml::from_str(toml_str).map_err(|e| MeshError::ParseError {
            path: PathBuf::from("<toml>"),
            details: e.to_string(),
        })
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> MeshResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MeshError::encoding(e.to_string()))
    }

    /// TOML text.
    pub fn to_toml(&self) -> MeshResult<String> {
        toml::to_string(self).map_err(|e| MeshError::encoding(e.to_string()))
    }

    /// Dictionary options carrying this description's scale.
    pub fn dict_options(&self) -> DictOptions {
        DictOptions::with_scale(self.scale)
    }

    /// Feed the description through [`MeshBuilder`] and validate it.
    ///
    /// Entities are added in file order: vertices, blocks, edges, patches,
    /// merge pairs.
    pub fn build(&self) -> MeshResult<BlockMesh> {
        let mut builder = MeshBuilder::new();
        builder.add_vertices(self.vertices.iter().copied());

        for (i, block) in self.blocks.iter().enumerate() {
            let owner = Owner::Block(i);
            let cells = cell_counts(&block.cells, &owner)?;
            let mut spec = BlockSpec::new(block.vertices.clone(), cells);
            if let Some(values) = &block.grading {
                spec.grading = Grading::from_values(values, owner)?;
            }
            spec.zone = block.zone.clone();
            spec.description = block.description.clone();
            builder.add_block_with(spec)?;
        }

        for (i, edge) in self.edges.iter().enumerate() {
            builder.add_edge(edge.start, edge.end, edge.curve(i)?)?;
        }

        for patch in &self.boundary {
            let mut faces = patch.faces.clone();
            for face_ref in &patch.block_faces {
                let side: BlockSide = face_ref.side.parse().map_err(|details| {
                    MeshError::shape(
                        Owner::Face {
                            patch: patch.name.clone(),
                            face: faces.len(),
                        },
                        details,
                    )
                })?;
                let face = builder.block_face(face_ref.block, side)?;
                faces.push(face.0.to_vec());
            }
            let kind = match patch.kind.parse::<PatchType>() {
                Ok(kind) => kind,
                Err(never) => match never {},
            };
            builder.add_boundary_patch(patch.name.clone(), kind, faces)?;
        }

        for [master, slave] in &self.merge_patch_pairs {
            builder.add_merge_pair(master.clone(), slave.clone())?;
        }

        debug!(
            "Built mesh description: {} vertices, {} blocks",
            self.vertices.len(),
            self.blocks.len()
        );

        builder.validate()
    }
}

impl EdgeDescription {
    fn curve(&self, index: usize) -> MeshResult<Curve> {
        let points: Vec<Point3<f64>> = self.points.iter().map(|&p| Point3::from(p)).collect();
        match self.kind {
            CurveKind::Arc => match points.as_slice() {
                [through] => Ok(Curve::Arc { through: *through }),
                _ => Err(MeshError::shape(
                    Owner::Edge(index),
                    format!("arc needs exactly one point, got {}", points.len()),
                )),
            },
            CurveKind::Spline => Ok(Curve::Spline(points)),
            CurveKind::PolyLine => Ok(Curve::PolyLine(points)),
            CurveKind::BSpline => Ok(Curve::BSpline(points)),
        }
    }
}

fn cell_counts(cells: &[i64], owner: &Owner) -> MeshResult<[u32; 3]> {
    let [nx, ny, nz] = <[i64; 3]>::try_from(cells).map_err(|_| {
        MeshError::shape(
            owner.clone(),
            format!("cell counts need 3 values, got {}", cells.len()),
        )
    })?;

    let mut counts = [0u32; 3];
    for (slot, n) in counts.iter_mut().zip([nx, ny, nz]) {
        *slot = u32::try_from(n)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                MeshError::shape(
                    owner.clone(),
                    format!("cell counts must be positive integers, got {}", n),
                )
            })?;
    }
    Ok(counts)
}
