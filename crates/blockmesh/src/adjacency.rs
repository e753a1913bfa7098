//! Block topology queries via adjacency structures.

use hashbrown::HashMap;

use crate::types::{Block, BlockSide, Face};

/// Canonical key of an edge: (smaller index, larger index).
#[inline]
pub fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Lightweight lookup of which blocks own which faces and edges.
#[derive(Debug, Clone, Default)]
pub struct BlockAdjacency {
    /// Maps sorted face indices → blocks that have this face on their surface.
    pub face_to_blocks: HashMap<[usize; 4], Vec<usize>>,

    /// Maps edge (min_idx, max_idx) → blocks that have this straight edge.
    pub edge_to_blocks: HashMap<(usize, usize), Vec<usize>>,
}

impl BlockAdjacency {
    /// Build adjacency structures from a block list.
    pub fn build(blocks: &[Block]) -> Self {
        let mut face_to_blocks: HashMap<[usize; 4], Vec<usize>> = HashMap::new();
        let mut edge_to_blocks: HashMap<(usize, usize), Vec<usize>> = HashMap::new();

        for (block_idx, block) in blocks.iter().enumerate() {
            for side in BlockSide::ALL {
                face_to_blocks
                    .entry(block.face(side).key())
                    .or_default()
                    .push(block_idx);
            }

            for (a, b) in block.edges() {
                // Collapsed corners (wedges) do not form an edge.
                if a == b {
                    continue;
                }
                let owners = edge_to_blocks.entry(edge_key(a, b)).or_default();
                if owners.last() != Some(&block_idx) {
                    owners.push(block_idx);
                }
            }
        }

        Self {
            face_to_blocks,
            edge_to_blocks,
        }
    }

    /// Blocks whose surface contains this face, in any winding.
    pub fn blocks_for_face(&self, face: &Face) -> &[usize] {
        self.face_to_blocks
            .get(&face.key())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Blocks that have a straight edge between these vertices.
    /// The edge is automatically canonicalized (min, max).
    pub fn blocks_for_edge(&self, v0: usize, v1: usize) -> &[usize] {
        self.edge_to_blocks
            .get(&edge_key(v0, v1))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Faces shared by exactly two blocks.
    pub fn internal_face_count(&self) -> usize {
        self.face_to_blocks
            .values()
            .filter(|blocks| blocks.len() == 2)
            .count()
    }

    /// Faces owned by a single block; these must all end up in some patch or
    /// blockMesh puts them into its default patch.
    pub fn exposed_faces(&self) -> impl Iterator<Item = &[usize; 4]> + '_ {
        self.face_to_blocks
            .iter()
            .filter(|(_, blocks)| blocks.len() == 1)
            .map(|(key, _)| key)
    }
}
