//! Incremental assembly of a block topology.
//!
//! Every `add_*` call checks its own references eagerly, and
//! [`MeshBuilder::validate`] re-checks the whole model before handing out an
//! immutable [`BlockMesh`]. Anything the dictionary grammar cannot carry
//! (non-finite numbers, names with whitespace or punctuation) is rejected
//! here too. Winding order is taken as given: blockMesh itself rejects
//! inside-out blocks and faces.

use std::ops::Range;

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info};

use crate::error::{MeshError, MeshResult, Owner};
use crate::types::{
    Block, BlockMesh, BlockSide, BoundaryPatch, Curve, Edge, Face, Grading, MergePatchPair,
    PatchType, Vertex, AXIS_CORNER_PAIRS, is_word,
};

/// Everything needed to add one block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSpec {
    /// Exactly 8 global vertex indices.
    pub vertices: Vec<usize>,
    /// Cell counts along x, y, z; all must be positive.
    pub cells: [u32; 3],
    pub grading: Grading,
    pub zone: Option<String>,
    pub description: Option<String>,
}

impl BlockSpec {
    /// A uniformly graded block without zone or comment.
    pub fn new(vertices: impl Into<Vec<usize>>, cells: [u32; 3]) -> Self {
        Self {
            vertices: vertices.into(),
            cells,
            grading: Grading::default(),
            zone: None,
            description: None,
        }
    }

    pub fn grading(mut self, grading: Grading) -> Self {
        self.grading = grading;
        self
    }

    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Mutable block topology under construction.
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    blocks: Vec<Block>,
    edges: Vec<Edge>,
    patches: Vec<BoundaryPatch>,
    patch_index: HashMap<String, usize>,
    merge_pairs: Vec<MergePatchPair>,
}

impl MeshBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices added so far.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of blocks added so far.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Whether a patch with this name is registered.
    pub fn has_patch(&self, name: &str) -> bool {
        self.patch_index.contains_key(name)
    }

    /// Append one vertex and return its index.
    ///
    /// Coordinates are checked for finiteness by [`validate`](Self::validate).
    pub fn add_vertex(&mut self, vertex: impl Into<Vertex>) -> usize {
        self.vertices.push(vertex.into());
        self.vertices.len() - 1
    }

    /// Append vertices in order and return the index range they received.
    ///
    /// Duplicate coordinates are legal and simply occupy another index.
    pub fn add_vertices<I, V>(&mut self, coords: I) -> Range<usize>
    where
        I: IntoIterator<Item = V>,
        V: Into<Vertex>,
    {
        let start = self.vertices.len();
        self.vertices.extend(coords.into_iter().map(Into::into));
        start..self.vertices.len()
    }

    /// Add a hexahedral block with optional grading (uniform when `None`).
    pub fn add_block(
        &mut self,
        vertex_indices: &[usize],
        cell_counts: [u32; 3],
        grading: Option<Grading>,
    ) -> MeshResult<usize> {
        let mut spec = BlockSpec::new(vertex_indices, cell_counts);
        if let Some(grading) = grading {
            spec.grading = grading;
        }
        self.add_block_with(spec)
    }

    /// Add a block described by a [`BlockSpec`].
    pub fn add_block_with(&mut self, spec: BlockSpec) -> MeshResult<usize> {
        let owner = Owner::Block(self.blocks.len());
        let block = Block {
            vertices: block_corners(&spec.vertices, &owner)?,
            cells: spec.cells,
            grading: spec.grading,
            zone: spec.zone,
            description: spec.description,
        };
        self.check_block(&owner, &block)?;

        self.blocks.push(block);
        Ok(self.blocks.len() - 1)
    }

    /// Add a curved edge between two existing vertices.
    pub fn add_edge(&mut self, v0: usize, v1: usize, curve: Curve) -> MeshResult<usize> {
        let edge = Edge {
            start: v0,
            end: v1,
            curve,
        };
        let owner = Owner::Edge(self.edges.len());
        self.check_edge(&owner, &edge)?;
        self.edges.push(edge);
        Ok(self.edges.len() - 1)
    }

    /// Register a named boundary patch.
    ///
    /// Each face is given as a slice of vertex indices and must have exactly 4.
    pub fn add_boundary_patch<I, F>(
        &mut self,
        name: impl Into<String>,
        kind: PatchType,
        faces: I,
    ) -> MeshResult<usize>
    where
        I: IntoIterator<Item = F>,
        F: AsRef<[usize]>,
    {
        let name = name.into();
        if self.patch_index.contains_key(&name) {
            return Err(MeshError::DuplicateName { name });
        }
        check_patch_words(&name, &kind)?;

        let mut checked = Vec::new();
        for (face_idx, indices) in faces.into_iter().enumerate() {
            let owner = Owner::Face {
                patch: name.clone(),
                face: face_idx,
            };
            let face = Face::from_slice(indices.as_ref(), owner.clone())?;
            for &index in &face.0 {
                self.check_vertex(&owner, index)?;
            }
            checked.push(face);
        }

        debug!("Patch {:?} ({}): {} faces", name, kind, checked.len());

        let idx = self.patches.len();
        self.patch_index.insert(name.clone(), idx);
        self.patches.push(BoundaryPatch {
            name,
            kind,
            faces: checked,
        });
        Ok(idx)
    }

    /// Resolve a named side of an existing block to global vertex indices.
    pub fn block_face(&self, block: usize, side: BlockSide) -> MeshResult<Face> {
        self.blocks
            .get(block)
            .map(|b| b.face(side))
            .ok_or(MeshError::BlockReference {
                block,
                block_count: self.blocks.len(),
            })
    }

    /// Cell counts that give roughly `cell_size` along each block axis.
    ///
    /// Block size along an axis is the mean length of the four block edges on
    /// that axis. An edge already added with [`add_edge`](Self::add_edge)
    /// is measured along its curve, any other by its straight length.
    /// At least one cell is returned per axis.
    pub fn cell_counts_for_size(
        &self,
        vertex_indices: &[usize],
        cell_size: [f64; 3],
    ) -> MeshResult<[u32; 3]> {
        let owner = Owner::Block(self.blocks.len());
        let corners = block_corners(vertex_indices, &owner)?;
        for &index in &corners {
            self.check_vertex(&owner, index)?;
        }

        let mut counts = [1u32; 3];
        for (axis, pairs) in AXIS_CORNER_PAIRS.iter().enumerate() {
            let size = cell_size[axis];
            if !(size.is_finite() && size > 0.0) {
                return Err(MeshError::shape(
                    owner,
                    format!("cell size along axis {} must be positive, got {}", axis, size),
                ));
            }

            let length = pairs
                .iter()
                .map(|&(a, b)| self.edge_length(corners[a], corners[b]))
                .sum::<f64>()
                / pairs.len() as f64;

            counts[axis] = ((length / size) as u32).max(1);
        }
        Ok(counts)
    }

    /// Declare two registered patches to be merged.
    pub fn add_merge_pair(
        &mut self,
        master: impl Into<String>,
        slave: impl Into<String>,
    ) -> MeshResult<usize> {
        let pair = MergePatchPair {
            master: master.into(),
            slave: slave.into(),
        };
        let owner = Owner::MergePair(self.merge_pairs.len());
        self.check_merge_pair(&owner, &pair)?;
        self.merge_pairs.push(pair);
        Ok(self.merge_pairs.len() - 1)
    }

    /// Re-check every cross reference and freeze the model.
    ///
    /// Returns the first reference or shape error encountered, in the order
    /// vertices, blocks, edges, patches, merge pairs. A mesh that passes can
    /// always be written with [`write_dict`](crate::write_dict).
    pub fn validate(self) -> MeshResult<BlockMesh> {
        for (i, vertex) in self.vertices.iter().enumerate() {
            if !is_finite(&vertex.position) {
                return Err(MeshError::shape(
                    Owner::Vertex(i),
                    format!("non-finite coordinates {:?}", vertex.position),
                ));
            }
        }

        for (i, block) in self.blocks.iter().enumerate() {
            self.check_block(&Owner::Block(i), block)?;
        }

        for (i, edge) in self.edges.iter().enumerate() {
            self.check_edge(&Owner::Edge(i), edge)?;
        }

        self.check_patches()?;

        for (i, pair) in self.merge_pairs.iter().enumerate() {
            self.check_merge_pair(&Owner::MergePair(i), pair)?;
        }

        info!(
            "Validated block mesh: {} vertices, {} blocks, {} edges, {} patches, {} merge pairs",
            self.vertices.len(),
            self.blocks.len(),
            self.edges.len(),
            self.patches.len(),
            self.merge_pairs.len()
        );

        Ok(BlockMesh {
            vertices: self.vertices,
            blocks: self.blocks,
            edges: self.edges,
            patches: self.patches,
            merge_pairs: self.merge_pairs,
        })
    }

    /// Straight or curved length between two vertices.
    fn edge_length(&self, v0: usize, v1: usize) -> f64 {
        let p0 = &self.vertices[v0].position;
        let p1 = &self.vertices[v1].position;
        let curved = self.edges.iter().find_map(|e| match (e.start, e.end) {
            (s, t) if s == v0 && t == v1 => Some(e.curve.length(p0, p1)),
            (s, t) if s == v1 && t == v0 => Some(e.curve.length(p1, p0)),
            _ => None,
        });
        curved.unwrap_or_else(|| nalgebra::distance(p0, p1))
    }

    fn check_patches(&self) -> MeshResult<()> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.patches.len());
        for patch in &self.patches {
            if !seen.insert(patch.name.as_str()) {
                return Err(MeshError::DuplicateName {
                    name: patch.name.clone(),
                });
            }
            check_patch_words(&patch.name, &patch.kind)?;
            for (face_idx, face) in patch.faces.iter().enumerate() {
                let owner = Owner::Face {
                    patch: patch.name.clone(),
                    face: face_idx,
                };
                for &index in &face.0 {
                    self.check_vertex(&owner, index)?;
                }
            }
        }
        Ok(())
    }

    fn check_vertex(&self, owner: &Owner, index: usize) -> MeshResult<()> {
        if index < self.vertices.len() {
            Ok(())
        } else {
            Err(MeshError::VertexReference {
                owner: owner.clone(),
                index,
                vertex_count: self.vertices.len(),
            })
        }
    }

    fn check_block(&self, owner: &Owner, block: &Block) -> MeshResult<()> {
        check_cells(&block.cells, owner)?;
        for &index in &block.vertices {
            self.check_vertex(owner, index)?;
        }
        if let Some(&ratio) = block.grading.ratios().iter().find(|r| !r.is_finite()) {
            return Err(MeshError::shape(
                owner.clone(),
                format!("grading ratio {} is not finite", ratio),
            ));
        }
        if let Some(zone) = &block.zone {
            if !is_word(zone) {
                return Err(MeshError::shape(
                    owner.clone(),
                    format!("cell zone {:?} is not a single word", zone),
                ));
            }
        }
        Ok(())
    }

    fn check_edge(&self, owner: &Owner, edge: &Edge) -> MeshResult<()> {
        self.check_vertex(owner, edge.start)?;
        self.check_vertex(owner, edge.end)?;
        if edge.start == edge.end {
            return Err(MeshError::shape(
                owner.clone(),
                format!("edge starts and ends at vertex {}", edge.start),
            ));
        }
        if edge.curve.points().is_empty() {
            return Err(MeshError::shape(
                owner.clone(),
                format!("{} edge needs at least one interior point", edge.curve.keyword()),
            ));
        }
        if !edge.curve.points().iter().all(is_finite) {
            return Err(MeshError::shape(
                owner.clone(),
                format!("{} edge has non-finite points", edge.curve.keyword()),
            ));
        }
        Ok(())
    }

    fn check_merge_pair(&self, owner: &Owner, pair: &MergePatchPair) -> MeshResult<()> {
        for name in [&pair.master, &pair.slave] {
            if !self.patch_index.contains_key(name.as_str()) {
                return Err(MeshError::PatchReference {
                    owner: owner.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}

fn block_corners(indices: &[usize], owner: &Owner) -> MeshResult<[usize; 8]> {
    <[usize; 8]>::try_from(indices).map_err(|_| {
        MeshError::shape(
            owner.clone(),
            format!("a hex block needs exactly 8 vertices, got {}", indices.len()),
        )
    })
}

fn is_finite(p: &nalgebra::Point3<f64>) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}

fn check_patch_words(name: &str, kind: &PatchType) -> MeshResult<()> {
    let owner = || Owner::Patch(name.to_string());
    if !is_word(name) {
        return Err(MeshError::shape(owner(), "patch name is not a single word"));
    }
    if !is_word(kind.as_str()) {
        return Err(MeshError::shape(
            owner(),
            format!("patch type {:?} is not a single word", kind.as_str()),
        ));
    }
    Ok(())
}

fn check_cells(cells: &[u32; 3], owner: &Owner) -> MeshResult<()> {
    if cells.contains(&0) {
        return Err(MeshError::shape(
            owner.clone(),
            format!(
                "cell counts must be positive, got ({} {} {})",
                cells[0], cells[1], cells[2]
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use nalgebra::Point3;

    fn cube_builder() -> MeshBuilder {
        let mut builder = MeshBuilder::new();
        builder.add_vertices([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ]);
        builder
    }

    #[test]
    fn test_vertices_indexed_by_insertion() {
        let mut builder = MeshBuilder::new();
        let first = builder.add_vertices([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let second = builder.add_vertices([[0.0, 0.0, 0.0]]);
        assert_eq!(first, 0..2);
        assert_eq!(second, 2..3);
        assert_eq!(builder.vertex_count(), 3);
    }

    #[test]
    fn test_add_block() {
        let mut builder = cube_builder();
        let idx = builder
            .add_block(&[0, 1, 2, 3, 4, 5, 6, 7], [10, 10, 1], None)
            .unwrap();
        assert_eq!(idx, 0);
        assert_eq!(builder.block_count(), 1);
    }

    #[test]
    fn test_block_with_wrong_arity() {
        let mut builder = cube_builder();
        for indices in [&[0, 1, 2, 3, 4, 5, 6][..], &[0, 1, 2, 3, 4, 5, 6, 7, 0][..]] {
            let err = builder.add_block(indices, [1, 1, 1], None).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Shape);
        }
        assert_eq!(builder.block_count(), 0);
    }

    #[test]
    fn test_block_with_zero_cells() {
        let mut builder = cube_builder();
        let err = builder
            .add_block(&[0, 1, 2, 3, 4, 5, 6, 7], [1, 0, 1], None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_block_dangling_index() {
        let mut builder = cube_builder();
        let err = builder
            .add_block(&[0, 1, 2, 3, 4, 5, 6, 8], [1, 1, 1], None)
            .unwrap_err();
        match err {
            MeshError::VertexReference {
                owner,
                index,
                vertex_count,
            } => {
                assert_eq!(owner, Owner::Block(0));
                assert_eq!(index, 8);
                assert_eq!(vertex_count, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_edge_checks() {
        let mut builder = cube_builder();
        let arc = Curve::Arc {
            through: Point3::new(0.5, -0.1, 0.0),
        };
        assert_eq!(builder.add_edge(0, 1, arc.clone()).unwrap(), 0);

        let err = builder.add_edge(0, 9, arc.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);

        let err = builder.add_edge(2, 2, arc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);

        let err = builder.add_edge(0, 1, Curve::Spline(Vec::new())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_duplicate_patch_name() {
        let mut builder = cube_builder();
        builder
            .add_boundary_patch("inlet", PatchType::Patch, [[0usize, 4, 7, 3]])
            .unwrap();
        let err = builder
            .add_boundary_patch("inlet", PatchType::Patch, [[1usize, 2, 6, 5]])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
        assert!(err.to_string().contains("inlet"));
    }

    #[test]
    fn test_face_index_equal_to_vertex_count() {
        let mut builder = cube_builder();
        let err = builder
            .add_boundary_patch("top", PatchType::Patch, [[4usize, 5, 6, 8]])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert!(!builder.has_patch("top"));
    }

    #[test]
    fn test_face_with_three_vertices() {
        let mut builder = cube_builder();
        let faces: Vec<Vec<usize>> = vec![vec![4, 5, 6, 7], vec![0, 1, 2]];
        let err = builder
            .add_boundary_patch("walls", PatchType::Wall, faces)
            .unwrap_err();
        match err {
            MeshError::Shape { owner, .. } => assert_eq!(
                owner,
                Owner::Face {
                    patch: "walls".into(),
                    face: 1
                }
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merge_pair_requires_patches() {
        let mut builder = cube_builder();
        builder
            .add_boundary_patch("a", PatchType::Patch, [[0usize, 1, 2, 3]])
            .unwrap();
        let err = builder.add_merge_pair("a", "b").unwrap_err();
        assert!(matches!(err, MeshError::PatchReference { ref name, .. } if name == "b"));

        builder
            .add_boundary_patch("b", PatchType::Patch, [[4usize, 5, 6, 7]])
            .unwrap();
        assert_eq!(builder.add_merge_pair("a", "b").unwrap(), 0);
    }

    #[test]
    fn test_block_face_lookup() {
        let mut builder = cube_builder();
        builder
            .add_block(&[0, 1, 2, 3, 4, 5, 6, 7], [1, 1, 1], None)
            .unwrap();
        assert_eq!(
            builder.block_face(0, BlockSide::Top).unwrap(),
            Face([4, 5, 6, 7])
        );
        let err = builder.block_face(1, BlockSide::Top).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
    }

    #[test]
    fn test_cell_counts_for_size() {
        let mut builder = MeshBuilder::new();
        builder.add_vertices([
            [0.0, 0.0, 0.0],
            [4.0, 0.0, 0.0],
            [4.0, 2.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 0.0, 0.5],
            [4.0, 0.0, 0.5],
            [4.0, 2.0, 0.5],
            [0.0, 2.0, 0.5],
        ]);
        let counts = builder
            .cell_counts_for_size(&[0, 1, 2, 3, 4, 5, 6, 7], [0.5, 0.5, 1.0])
            .unwrap();
        assert_eq!(counts, [8, 4, 1]);

        let err = builder
            .cell_counts_for_size(&[0, 1, 2, 3, 4, 5, 6, 7], [0.5, 0.0, 1.0])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_cell_counts_follow_curved_edges() {
        let mut builder = MeshBuilder::new();
        builder.add_vertices([
            [0.0, 0.0, 0.0],
            [4.0, 0.0, 0.0],
            [4.0, 2.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 0.0, 0.5],
            [4.0, 0.0, 0.5],
            [4.0, 2.0, 0.5],
            [0.0, 2.0, 0.5],
        ]);
        let corners = [0usize, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(
            builder.cell_counts_for_size(&corners, [0.25, 1.0, 1.0]).unwrap(),
            [16, 2, 1]
        );

        // Edge 1-0 bows out to 5 long; the x axis mean becomes (5 + 3 * 4) / 4.
        builder
            .add_edge(1, 0, Curve::PolyLine(vec![Point3::new(2.0, -1.5, 0.0)]))
            .unwrap();
        assert_eq!(
            builder.cell_counts_for_size(&corners, [0.25, 1.0, 1.0]).unwrap(),
            [17, 2, 1]
        );
    }

    #[test]
    fn test_names_must_be_single_words() {
        let mut builder = cube_builder();
        let err = builder
            .add_boundary_patch("top wall", PatchType::Wall, [[4usize, 5, 6, 7]])
            .unwrap_err();
        assert!(matches!(
            err,
            MeshError::Shape { owner: Owner::Patch(ref name), .. } if name == "top wall"
        ));
        assert!(!builder.has_patch("top wall"));

        let odd_type = PatchType::Other("my type".into());
        let err = builder
            .add_boundary_patch("top", odd_type, [[4usize, 5, 6, 7]])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);

        let spec = BlockSpec::new([0usize, 1, 2, 3, 4, 5, 6, 7], [1, 1, 1]).zone("my zone");
        let err = builder.add_block_with(spec).unwrap_err();
        assert!(matches!(err, MeshError::Shape { owner: Owner::Block(0), .. }));
        assert_eq!(builder.block_count(), 0);
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut builder = cube_builder();
        let err = builder
            .add_block(
                &[0, 1, 2, 3, 4, 5, 6, 7],
                [1, 1, 1],
                Some(Grading::Simple([1.0, f64::INFINITY, 1.0])),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);

        let err = builder
            .add_edge(0, 1, Curve::Spline(vec![Point3::new(0.5, f64::NAN, 0.0)]))
            .unwrap_err();
        assert!(matches!(err, MeshError::Shape { owner: Owner::Edge(0), .. }));

        builder.add_vertex([f64::NAN, 0.0, 0.0]);
        let err = builder.validate().unwrap_err();
        assert!(matches!(err, MeshError::Shape { owner: Owner::Vertex(8), .. }));
    }

    #[test]
    fn test_validate_rechecks_names() {
        let mut builder = cube_builder();
        builder
            .add_boundary_patch("top", PatchType::Patch, [[4usize, 5, 6, 7]])
            .unwrap();
        builder.patches[0].name = "top wall".into();

        let err = builder.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_validate_unit_cube() {
        let mut builder = cube_builder();
        builder
            .add_block(&[0, 1, 2, 3, 4, 5, 6, 7], [2, 3, 4], None)
            .unwrap();
        builder
            .add_boundary_patch("top", PatchType::Patch, [[4usize, 5, 6, 7]])
            .unwrap();

        let mesh = builder.validate().unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.blocks().len(), 1);
        assert_eq!(mesh.cell_count(), 24);
        assert!(mesh.edges().is_empty());
        assert!(mesh.merge_pairs().is_empty());
        assert_eq!(mesh.patch("top").unwrap().faces, vec![Face([4, 5, 6, 7])]);
    }

    #[test]
    fn test_validate_catches_out_of_order_state() {
        let mut builder = cube_builder();
        builder
            .add_block(&[0, 1, 2, 3, 4, 5, 6, 7], [1, 1, 1], None)
            .unwrap();
        // Simulate a model whose vertex list shrank after the block was added.
        builder.vertices.truncate(7);

        let err = builder.validate().unwrap_err();
        assert!(matches!(
            err,
            MeshError::VertexReference { index: 7, vertex_count: 7, .. }
        ));
    }
}
