//! blockMeshDict assembly and serialization.
//!
//! This crate turns a block-structured hexahedral topology into the
//! `system/blockMeshDict` file read by OpenFOAM's `blockMesh` utility:
//!
//! - **Building**: vertices, hex blocks, curved edges, boundary patches and
//!   merge pairs, with every index and name checked as it is added
//! - **Validation**: a final cross-reference pass that freezes the model,
//!   plus a non-fatal topology report
//! - **Serialization**: the fixed section layout blockMesh expects
//!
//! Geometric correctness (winding, inside-out blocks) is left to blockMesh.
//!
//! # Example
//!
//! ```
//! use blockmesh::{write_dict, DictOptions, MeshBuilder, PatchType};
//!
//! let mut builder = MeshBuilder::new();
//! builder.add_vertices([
//!     [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0],
//! ]);
//! builder.add_block(&[0, 1, 2, 3, 4, 5, 6, 7], [10, 10, 10], None)?;
//! builder.add_boundary_patch("top", PatchType::Wall, [[4usize, 5, 6, 7]])?;
//!
//! let mesh = builder.validate()?;
//! let text = write_dict(&mesh, &DictOptions::default())?;
//! assert!(text.contains("hex ( 0 1 2 3 4 5 6 7 ) ( 10 10 10 )"));
//! # Ok::<(), blockmesh::MeshError>(())
//! ```

mod builder;
mod error;
mod types;

pub mod adjacency;
#[cfg(feature = "description")]
pub mod description;
pub mod dict;
pub mod io;
pub mod validate;

// Re-export core types at crate root
pub use builder::{BlockSpec, MeshBuilder};
pub use error::{ErrorKind, MeshError, MeshResult, Owner};
pub use types::{
    Block, BlockMesh, BlockSide, BoundaryPatch, Curve, Edge, Face, Grading, MergePatchPair,
    PatchType, Vertex,
};

// Re-export adjacency at crate root for convenience
pub use adjacency::BlockAdjacency;

// Re-export commonly used functions
#[cfg(feature = "description")]
pub use description::MeshDescription;
pub use dict::{write_dict, DictOptions, FOAM_HEADER};
#[cfg(feature = "description")]
pub use io::load_description;
pub use io::{load_header, save_dict, DescriptionFormat};
pub use validate::{log_report, topology_report, PatchFace, TopologyReport};

// Convenience methods on BlockMesh
impl BlockMesh {
    /// Render the mesh as blockMeshDict text.
    pub fn to_dict(&self, options: &DictOptions) -> MeshResult<String> {
        dict::write_dict(self, options)
    }

    /// Render and write the mesh to a file.
    pub fn save(&self, options: &DictOptions, path: impl AsRef<std::path::Path>) -> MeshResult<()> {
        io::save_dict(self, options, path.as_ref())
    }

    /// Inspect block surfaces and curved edges for likely blockMesh errors.
    pub fn topology_report(&self) -> TopologyReport {
        validate::topology_report(self)
    }
}
