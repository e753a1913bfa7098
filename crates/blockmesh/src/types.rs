//! Core blockMesh data types.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, MeshResult, Owner};

/// A vertex of the block topology.
///
/// Vertices are addressed only by their position in the vertex list.
/// Coordinates are unit-agnostic; the dictionary `scale` converts them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,
}

impl Vertex {
    /// Create a new vertex.
    #[inline]
    pub fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

impl From<[f64; 3]> for Vertex {
    fn from(c: [f64; 3]) -> Self {
        Self::from_coords(c[0], c[1], c[2])
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(p: Point3<f64>) -> Self {
        Self::new(p)
    }
}

/// Cell size distribution inside a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Grading {
    /// One expansion ratio per block axis (x, y, z).
    Simple([f64; 3]),
    /// One expansion ratio per block edge, 4 edges per axis.
    Edge([f64; 12]),
}

impl Grading {
    /// Uniform cells in every direction.
    pub const UNIFORM: Grading = Grading::Simple([1.0, 1.0, 1.0]);

    /// Build a grading from 3 (simple) or 12 (per-edge) expansion ratios.
    pub fn from_values(values: &[f64], owner: Owner) -> MeshResult<Self> {
        match values.len() {
            3 => Ok(Grading::Simple([values[0], values[1], values[2]])),
            12 => {
                let mut ratios = [0.0; 12];
                ratios.copy_from_slice(values);
                Ok(Grading::Edge(ratios))
            }
            n => Err(MeshError::shape(
                owner,
                format!("grading needs 3 or 12 expansion ratios, got {}", n),
            )),
        }
    }

    /// Dictionary keyword for this grading.
    pub fn keyword(&self) -> &'static str {
        match self {
            Grading::Simple(_) => "simpleGrading",
            Grading::Edge(_) => "edgeGrading",
        }
    }

    /// Expansion ratios in dictionary order.
    pub fn ratios(&self) -> &[f64] {
        match self {
            Grading::Simple(r) => r,
            Grading::Edge(r) => r,
        }
    }
}

impl Default for Grading {
    fn default() -> Self {
        Grading::UNIFORM
    }
}

/// Named sides of a hexahedral block, in local corner numbers.
///
/// Corners 0-3 form the bottom face and 4-7 the top face, both numbered
/// counter-clockwise when seen from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockSide {
    Bottom,
    Top,
    Left,
    Right,
    Front,
    Back,
}

impl BlockSide {
    /// All six sides.
    pub const ALL: [BlockSide; 6] = [
        BlockSide::Bottom,
        BlockSide::Top,
        BlockSide::Left,
        BlockSide::Right,
        BlockSide::Front,
        BlockSide::Back,
    ];

    /// Local corner numbers (0-7) that make up this side.
    pub fn corners(self) -> [usize; 4] {
        match self {
            BlockSide::Bottom => [0, 1, 2, 3],
            BlockSide::Top => [4, 5, 6, 7],
            BlockSide::Left => [4, 0, 3, 7],
            BlockSide::Right => [5, 1, 2, 6],
            BlockSide::Front => [4, 5, 1, 0],
            BlockSide::Back => [7, 6, 2, 3],
        }
    }

    /// Lower-case name used in descriptions.
    pub fn name(self) -> &'static str {
        match self {
            BlockSide::Bottom => "bottom",
            BlockSide::Top => "top",
            BlockSide::Left => "left",
            BlockSide::Right => "right",
            BlockSide::Front => "front",
            BlockSide::Back => "back",
        }
    }
}

impl FromStr for BlockSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockSide::ALL
            .into_iter()
            .find(|side| side.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown block side {:?}", s))
    }
}

/// Local corner pairs along each block axis (x, y, z).
pub(crate) const AXIS_CORNER_PAIRS: [[(usize, usize); 4]; 3] = [
    [(0, 1), (3, 2), (4, 5), (7, 6)],
    [(0, 3), (1, 2), (5, 6), (4, 7)],
    [(0, 4), (1, 5), (2, 6), (3, 7)],
];

/// A hexahedral block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Global vertex indices, in the downstream tool's corner order.
    pub vertices: [usize; 8],

    /// Number of cells along x, y, z.
    pub cells: [u32; 3],

    /// Cell size distribution.
    pub grading: Grading,

    /// Optional cellZone the block belongs to.
    pub zone: Option<String>,

    /// Free text written as a trailing comment.
    pub description: Option<String>,
}

impl Block {
    /// Global indices of one side, in outward winding.
    pub fn face(&self, side: BlockSide) -> Face {
        let c = side.corners();
        Face([
            self.vertices[c[0]],
            self.vertices[c[1]],
            self.vertices[c[2]],
            self.vertices[c[3]],
        ])
    }

    /// The 12 straight edges of the block as global index pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        AXIS_CORNER_PAIRS
            .iter()
            .flatten()
            .map(|&(a, b)| (self.vertices[a], self.vertices[b]))
    }
}

/// Curve definition of a non-straight edge.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// Circular arc through an interior point.
    Arc { through: Point3<f64> },
    /// Spline through interior points.
    Spline(Vec<Point3<f64>>),
    /// Piecewise-linear path through interior points.
    PolyLine(Vec<Point3<f64>>),
    /// B-spline with interior control points.
    BSpline(Vec<Point3<f64>>),
}

impl Curve {
    /// Dictionary keyword for this curve.
    pub fn keyword(&self) -> &'static str {
        match self {
            Curve::Arc { .. } => "arc",
            Curve::Spline(_) => "spline",
            Curve::PolyLine(_) => "polyLine",
            Curve::BSpline(_) => "BSpline",
        }
    }

    /// All control points, in order.
    pub fn points(&self) -> &[Point3<f64>] {
        match self {
            Curve::Arc { through } => std::slice::from_ref(through),
            Curve::Spline(p) | Curve::PolyLine(p) | Curve::BSpline(p) => p,
        }
    }

    /// Length of the curve from `start` to `end`.
    ///
    /// An arc is the circular arc through `start`, its point and `end`; the
    /// interpolated curves are measured along the polyline of their points.
    pub fn length(&self, start: &Point3<f64>, end: &Point3<f64>) -> f64 {
        match self {
            Curve::Arc { through } => arc_length(start, through, end),
            curve => {
                let mut length = 0.0;
                let mut prev = start;
                for p in curve.points().iter().chain(std::iter::once(end)) {
                    length += nalgebra::distance(prev, p);
                    prev = p;
                }
                length
            }
        }
    }
}

fn arc_length(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let u = b - a;
    let v = c - a;
    let w = u.cross(&v);
    let w2 = w.norm_squared();

    // Collinear points: no circle, measure the two segments.
    if w2 <= f64::EPSILON * u.norm_squared() * v.norm_squared() {
        return u.norm() + (c - b).norm();
    }

    let offset = (v.cross(&w) * u.norm_squared() + w.cross(&u) * v.norm_squared()) / (2.0 * w2);
    let center = a + offset;
    let ra: Vector3<f64> = a - center;
    let rc: Vector3<f64> = c - center;

    // a, b, c run counter-clockwise around w, so the arc is the positive
    // rotation from ra to rc.
    let normal = w / w2.sqrt();
    let mut angle = ra.cross(&rc).dot(&normal).atan2(ra.dot(&rc));
    if angle <= 0.0 {
        angle += 2.0 * std::f64::consts::PI;
    }
    ra.norm() * angle
}

/// A curved connector between two vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub start: usize,
    pub end: usize,
    pub curve: Curve,
}

/// A name the dictionary parser reads back as one word.
pub(crate) fn is_word(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with("//")
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !"(){};\"\\".contains(c))
}

/// A quadrilateral boundary face as 4 global vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face(pub [usize; 4]);

impl Face {
    /// Build a face from a slice, rejecting anything that is not 4 indices.
    pub fn from_slice(indices: &[usize], owner: Owner) -> MeshResult<Self> {
        <[usize; 4]>::try_from(indices).map(Face).map_err(|_| {
            MeshError::shape(
                owner,
                format!("a face needs exactly 4 vertices, got {}", indices.len()),
            )
        })
    }

    /// Canonical key independent of winding and starting corner.
    pub fn key(&self) -> [usize; 4] {
        let mut k = self.0;
        k.sort_unstable();
        k
    }
}

/// Boundary condition type of a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchType {
    Patch,
    Wall,
    SymmetryPlane,
    Symmetry,
    Empty,
    Wedge,
    Cyclic,
    CyclicAmi,
    /// Any other type name understood by the downstream tool.
    Other(String),
}

impl PatchType {
    pub fn as_str(&self) -> &str {
        match self {
            PatchType::Patch => "patch",
            PatchType::Wall => "wall",
            PatchType::SymmetryPlane => "symmetryPlane",
            PatchType::Symmetry => "symmetry",
            PatchType::Empty => "empty",
            PatchType::Wedge => "wedge",
            PatchType::Cyclic => "cyclic",
            PatchType::CyclicAmi => "cyclicAMI",
            PatchType::Other(s) => s,
        }
    }
}

impl Default for PatchType {
    fn default() -> Self {
        PatchType::Patch
    }
}

impl fmt::Display for PatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatchType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "patch" => PatchType::Patch,
            "wall" => PatchType::Wall,
            "symmetryPlane" => PatchType::SymmetryPlane,
            "symmetry" => PatchType::Symmetry,
            "empty" => PatchType::Empty,
            "wedge" => PatchType::Wedge,
            "cyclic" => PatchType::Cyclic,
            "cyclicAMI" => PatchType::CyclicAmi,
            other => PatchType::Other(other.to_string()),
        })
    }
}

/// A named, typed group of boundary faces.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPatch {
    pub name: String,
    pub kind: PatchType,
    pub faces: Vec<Face>,
}

/// Two patches whose coincident faces are stitched together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePatchPair {
    pub master: String,
    pub slave: String,
}

/// A validated, immutable block topology ready for serialization.
///
/// Obtained from [`MeshBuilder::validate`](crate::MeshBuilder::validate).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) blocks: Vec<Block>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) patches: Vec<BoundaryPatch>,
    pub(crate) merge_pairs: Vec<MergePatchPair>,
}

impl BlockMesh {
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn patches(&self) -> &[BoundaryPatch] {
        &self.patches
    }

    #[inline]
    pub fn merge_pairs(&self) -> &[MergePatchPair] {
        &self.merge_pairs
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Total number of cells the downstream tool will generate, saturating
    /// at `u64::MAX`.
    pub fn cell_count(&self) -> u64 {
        self.blocks
            .iter()
            .map(|b| b.cells.iter().fold(1u64, |acc, &n| acc.saturating_mul(n as u64)))
            .fold(0u64, |acc, n| acc.saturating_add(n))
    }

    /// Look up a patch by name.
    pub fn patch(&self, name: &str) -> Option<&BoundaryPatch> {
        self.patches.iter().find(|p| p.name == name)
    }
}
