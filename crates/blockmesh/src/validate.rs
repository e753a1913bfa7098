//! Topology checks and reporting.
//!
//! Nothing here rejects a mesh. The findings point at inputs that blockMesh
//! will most likely complain about, and are logged as warnings.

use hashbrown::HashSet;
use tracing::{debug, info, warn};

use crate::adjacency::{edge_key, BlockAdjacency};
use crate::BlockMesh;

/// A face of a boundary patch, identified by patch name and position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "description", derive(serde::Serialize))]
pub struct PatchFace {
    pub patch: String,
    pub face: usize,
    pub vertices: [usize; 4],
}

/// Topology report for a validated mesh.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "description", derive(serde::Serialize))]
pub struct TopologyReport {
    /// Total vertex count.
    pub vertex_count: usize,

    /// Total block count.
    pub block_count: usize,

    /// Total number of cells blockMesh will generate.
    pub cell_count: u64,

    /// Number of boundary patches.
    pub patch_count: usize,

    /// Boundary faces that lie on no block surface.
    pub orphan_faces: Vec<PatchFace>,

    /// Boundary faces shared by two blocks (internal faces).
    pub internal_faces: Vec<PatchFace>,

    /// Curved edges whose endpoints are not joined by any block edge.
    pub stray_edges: Vec<usize>,

    /// Curved edges that repeat an earlier edge's vertex pair.
    pub duplicate_edges: Vec<usize>,

    /// Exposed block faces not listed in any patch (blockMesh collects
    /// these in its default patch).
    pub unpatched_face_count: usize,
}

impl TopologyReport {
    /// No findings at all.
    pub fn is_clean(&self) -> bool {
        self.orphan_faces.is_empty()
            && self.internal_faces.is_empty()
            && self.stray_edges.is_empty()
            && self.duplicate_edges.is_empty()
    }

    /// Number of findings, not counting unpatched faces.
    pub fn issue_count(&self) -> usize {
        self.orphan_faces.len()
            + self.internal_faces.len()
            + self.stray_edges.len()
            + self.duplicate_edges.len()
    }
}

impl std::fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Block Mesh Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Blocks: {}", self.block_count)?;
        writeln!(f, "  Cells: {}", self.cell_count)?;
        writeln!(f, "  Patches: {}", self.patch_count)?;

        writeln!(
            f,
            "  Boundary faces on blocks: {} (orphan: {}, internal: {})",
            if self.orphan_faces.is_empty() && self.internal_faces.is_empty() {
                "yes"
            } else {
                "NO"
            },
            self.orphan_faces.len(),
            self.internal_faces.len()
        )?;
        for pf in self.orphan_faces.iter().chain(&self.internal_faces) {
            writeln!(
                f,
                "    {} face {}: {:?}",
                pf.patch, pf.face, pf.vertices
            )?;
        }

        writeln!(
            f,
            "  Curved edges on blocks: {} (stray: {}, duplicate: {})",
            if self.stray_edges.is_empty() && self.duplicate_edges.is_empty() {
                "yes"
            } else {
                "NO"
            },
            self.stray_edges.len(),
            self.duplicate_edges.len()
        )?;

        writeln!(f, "  Unpatched faces: {}", self.unpatched_face_count)?;

        Ok(())
    }
}

/// Inspect a validated mesh and return a report.
pub fn topology_report(mesh: &BlockMesh) -> TopologyReport {
    let adjacency = BlockAdjacency::build(mesh.blocks());

    let mut report = TopologyReport {
        vertex_count: mesh.vertex_count(),
        block_count: mesh.blocks().len(),
        cell_count: mesh.cell_count(),
        patch_count: mesh.patches().len(),
        ..TopologyReport::default()
    };

    let mut patched: HashSet<[usize; 4]> = HashSet::new();
    for patch in mesh.patches() {
        for (face_idx, face) in patch.faces.iter().enumerate() {
            patched.insert(face.key());
            let owners = adjacency.blocks_for_face(face);
            let entry = || PatchFace {
                patch: patch.name.clone(),
                face: face_idx,
                vertices: face.0,
            };
            match owners.len() {
                0 => report.orphan_faces.push(entry()),
                1 => {}
                _ => report.internal_faces.push(entry()),
            }
        }
    }

    report.unpatched_face_count = adjacency
        .exposed_faces()
        .filter(|key| !patched.contains(*key))
        .count();

    let mut curved: HashSet<(usize, usize)> = HashSet::new();
    for (i, edge) in mesh.edges().iter().enumerate() {
        if !curved.insert(edge_key(edge.start, edge.end)) {
            report.duplicate_edges.push(i);
        }
        if adjacency.blocks_for_edge(edge.start, edge.end).is_empty() {
            report.stray_edges.push(i);
        }
    }

    for pf in &report.orphan_faces {
        warn!(
            "Face {} of patch {:?} {:?} is not on any block surface",
            pf.face, pf.patch, pf.vertices
        );
    }
    for pf in &report.internal_faces {
        warn!(
            "Face {} of patch {:?} {:?} is shared by two blocks",
            pf.face, pf.patch, pf.vertices
        );
    }
    if !report.stray_edges.is_empty() {
        warn!(
            "{} curved edges do not follow a block edge: {:?}",
            report.stray_edges.len(),
            report.stray_edges
        );
    }
    if !report.duplicate_edges.is_empty() {
        warn!(
            "{} curved edges are defined more than once: {:?}",
            report.duplicate_edges.len(),
            report.duplicate_edges
        );
    }

    debug!("{}", report);

    report
}

/// Log a summary of the report.
pub fn log_report(report: &TopologyReport) {
    info!(
        "Block mesh: {} verts, {} blocks, {} cells, {} patches",
        report.vertex_count, report.block_count, report.cell_count, report.patch_count
    );

    if report.is_clean() {
        info!("Boundary faces and curved edges all sit on blocks");
    } else {
        warn!("Topology report has {} findings", report.issue_count());
    }

    if report.unpatched_face_count > 0 {
        info!(
            "{} exposed faces go to the default patch",
            report.unpatched_face_count
        );
    }
}
