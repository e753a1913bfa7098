//! Error types for mesh assembly and serialization.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for blockMesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// The entity that carries an offending reference or shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    /// Vertex by insertion index.
    Vertex(usize),
    /// Block by insertion index.
    Block(usize),
    /// Curved edge by insertion index.
    Edge(usize),
    /// Boundary patch by name.
    Patch(String),
    /// Face `face` of the named boundary patch.
    Face { patch: String, face: usize },
    /// Merge pair by insertion index.
    MergePair(usize),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Vertex(i) => write!(f, "vertex {}", i),
            Owner::Block(i) => write!(f, "block {}", i),
            Owner::Edge(i) => write!(f, "edge {}", i),
            Owner::Patch(name) => write!(f, "patch {:?}", name),
            Owner::Face { patch, face } => write!(f, "face {} of patch {:?}", face, patch),
            Owner::MergePair(i) => write!(f, "merge pair {}", i),
        }
    }
}

/// Coarse error category, matching how callers usually react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Dangling vertex index, block index, or patch name.
    Reference,
    /// Wrong arity, non-positive cell count, non-finite number, or a name
    /// that is not a single word.
    Shape,
    /// Boundary patch name registered twice.
    DuplicateName,
    /// Serialization of a model that bypassed validation, or a bad scale.
    Encoding,
    /// Reading, parsing, or writing files.
    Io,
}

/// Errors that can occur while assembling or writing a blockMesh dictionary.
#[derive(Debug, Error)]
pub enum MeshError {
    /// A vertex index outside `[0, vertex_count)`.
    #[error("{owner} references vertex {index}, but only {vertex_count} vertices exist")]
    VertexReference {
        owner: Owner,
        index: usize,
        vertex_count: usize,
    },

    /// A block index outside `[0, block_count)`.
    #[error("block {block} does not exist ({block_count} blocks defined)")]
    BlockReference { block: usize, block_count: usize },

    /// A patch name that was never registered.
    #[error("{owner} references unknown patch {name:?}")]
    PatchReference { owner: Owner, name: String },

    /// Wrong number of indices, zero cell counts, non-finite numbers, names
    /// that are not single words, or a degenerate definition.
    #[error("invalid shape for {owner}: {details}")]
    Shape { owner: Owner, details: String },

    /// Boundary patch name collision.
    #[error("boundary patch {name:?} is already defined")]
    DuplicateName { name: String },

    /// The model cannot be rendered in the dictionary grammar.
    #[error("cannot encode blockMeshDict: {details}")]
    Encoding { details: String },

    /// Error reading from a file.
    #[error("failed to read {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing to a file.
    #[error("failed to write {path}: {source}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a mesh description.
    #[error("failed to parse mesh description {path}: {details}")]
    ParseError { path: PathBuf, details: String },

    /// Unsupported description format.
    #[error("unsupported description format: {extension:?}")]
    UnsupportedFormat { extension: Option<String> },
}

impl MeshError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeshError::VertexReference { .. }
            | MeshError::BlockReference { .. }
            | MeshError::PatchReference { .. } => ErrorKind::Reference,
            MeshError::Shape { .. } => ErrorKind::Shape,
            MeshError::DuplicateName { .. } => ErrorKind::DuplicateName,
            MeshError::Encoding { .. } => ErrorKind::Encoding,
            MeshError::IoRead { .. }
            | MeshError::IoWrite { .. }
            | MeshError::ParseError { .. }
            | MeshError::UnsupportedFormat { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn shape(owner: Owner, details: impl Into<String>) -> Self {
        MeshError::Shape {
            owner,
            details: details.into(),
        }
    }

    pub(crate) fn encoding(details: impl Into<String>) -> Self {
        MeshError::Encoding {
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_owner_and_index() {
        let err = MeshError::VertexReference {
            owner: Owner::Block(0),
            index: 8,
            vertex_count: 8,
        };
        assert_eq!(
            err.to_string(),
            "block 0 references vertex 8, but only 8 vertices exist"
        );
        assert_eq!(err.kind(), ErrorKind::Reference);
    }

    #[test]
    fn test_face_owner_display() {
        let owner = Owner::Face {
            patch: "inlet".to_string(),
            face: 2,
        };
        assert_eq!(owner.to_string(), "face 2 of patch \"inlet\"");
        assert_eq!(Owner::Patch("top wall".into()).to_string(), "patch \"top wall\"");
        assert_eq!(Owner::Vertex(3).to_string(), "vertex 3");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            MeshError::DuplicateName { name: "a".into() }.kind(),
            ErrorKind::DuplicateName
        );
        assert_eq!(MeshError::encoding("x").kind(), ErrorKind::Encoding);
        assert_eq!(MeshError::shape(Owner::Edge(1), "x").kind(), ErrorKind::Shape);
        assert_eq!(
            MeshError::UnsupportedFormat { extension: None }.kind(),
            ErrorKind::Io
        );
    }
}
