//! blockMeshDict serialization.
//!
//! Sections are always emitted in the order the blockMesh grammar expects:
//! header, `scale`, `vertices`, `blocks`, `edges`, `boundary`,
//! `mergePatchPairs`. Entities keep their insertion order. Numbers use the
//! shortest decimal that round-trips, which never falls back to exponent
//! notation.

use std::fmt::Display;

use hashbrown::HashSet;
use nalgebra::Point3;
use tracing::{debug, info};

use crate::error::{MeshError, MeshResult};
use crate::types::{is_word, Block, BlockMesh, Curve, Edge};

/// Default FoamFile banner and header.
pub const FOAM_HEADER: &str = r#"/*--------------------------------*- C++ -*----------------------------------*\
| =========                 |                                                 |
| \\      /  F ield         | OpenFOAM: The Open Source CFD Toolbox           |
|  \\    /   O peration     |                                                 |
|   \\  /    A nd           |                                                 |
|    \\/     M anipulation  |                                                 |
\*---------------------------------------------------------------------------*/
FoamFile
{
    version     2.0;
    format      ascii;
    class       dictionary;
    object      blockMeshDict;
}
// * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * //
"#;

const FOAM_FOOTER: &str =
    "// ************************************************************************* //\n";

const INDENT: &str = "    ";

/// Options controlling dictionary output.
#[derive(Debug, Clone, PartialEq)]
pub struct DictOptions {
    /// Global scale factor applied to all vertex coordinates by blockMesh.
    pub scale: f64,

    /// Header block copied verbatim before the first section.
    pub header: String,

    /// Append `// index` after each vertex.
    pub vertex_comments: bool,
}

impl Default for DictOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            header: FOAM_HEADER.to_string(),
            vertex_comments: true,
        }
    }
}

impl DictOptions {
    /// Default options with a different scale.
    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }
}

/// Render a validated mesh as blockMeshDict text.
///
/// A mesh returned by [`MeshBuilder::validate`](crate::MeshBuilder::validate)
/// always renders; only a bad `scale` fails. The content checks below repeat
/// what validation guarantees and report [`MeshError::Encoding`] if the
/// model was altered afterwards.
pub fn write_dict(mesh: &BlockMesh, options: &DictOptions) -> MeshResult<String> {
    check_encodable(mesh, options)?;

    let mut out = String::with_capacity(
        options.header.len() + mesh.vertices.len() * 40 + mesh.blocks.len() * 80 + 256,
    );

    out.push_str(&options.header);
    if !options.header.is_empty() && !options.header.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&format!("scale {};\n\n", options.scale));

    open_section(&mut out, "vertices");
    for (i, v) in mesh.vertices.iter().enumerate() {
        out.push_str(INDENT);
        out.push_str(&point(&v.position));
        if options.vertex_comments {
            out.push_str(&format!(" // {}", i));
        }
        out.push('\n');
    }
    close_section(&mut out);
    debug!("Wrote {} vertices", mesh.vertices.len());

    open_section(&mut out, "blocks");
    for (i, block) in mesh.blocks.iter().enumerate() {
        out.push_str(INDENT);
        out.push_str(&block_entry(i, block));
        out.push('\n');
    }
    close_section(&mut out);
    debug!("Wrote {} blocks", mesh.blocks.len());

    open_section(&mut out, "edges");
    for edge in &mesh.edges {
        out.push_str(INDENT);
        out.push_str(&edge_entry(edge));
        out.push('\n');
    }
    close_section(&mut out);
    debug!("Wrote {} edges", mesh.edges.len());

    open_section(&mut out, "boundary");
    for patch in &mesh.patches {
        out.push_str(&format!("{INDENT}{}\n", patch.name));
        out.push_str(&format!("{INDENT}{{\n"));
        out.push_str(&format!("{INDENT}{INDENT}type {};\n", patch.kind));
        out.push_str(&format!("{INDENT}{INDENT}faces\n"));
        out.push_str(&format!("{INDENT}{INDENT}(\n"));
        for face in &patch.faces {
            out.push_str(&format!("{INDENT}{INDENT}{INDENT}{}\n", list(&face.0)));
        }
        out.push_str(&format!("{INDENT}{INDENT});\n"));
        out.push_str(&format!("{INDENT}}}\n"));
    }
    close_section(&mut out);
    debug!("Wrote {} boundary patches", mesh.patches.len());

    open_section(&mut out, "mergePatchPairs");
    for pair in &mesh.merge_pairs {
        out.push_str(&format!("{INDENT}( {} {} )\n", pair.master, pair.slave));
    }
    close_section(&mut out);

    out.push_str(FOAM_FOOTER);

    info!(
        "Serialized blockMeshDict: {} vertices, {} blocks, {} bytes",
        mesh.vertices.len(),
        mesh.blocks.len(),
        out.len()
    );

    Ok(out)
}

fn open_section(out: &mut String, name: &str) {
    out.push_str(name);
    out.push_str("\n(\n");
}

fn close_section(out: &mut String) {
    out.push_str(");\n\n");
}

/// `( a b c ... )`
fn list<T: Display>(items: &[T]) -> String {
    let mut s = String::from("(");
    for item in items {
        s.push(' ');
        s.push_str(&item.to_string());
    }
    s.push_str(" )");
    s
}

fn point(p: &Point3<f64>) -> String {
    list(&[p.x, p.y, p.z])
}

fn block_entry(index: usize, block: &Block) -> String {
    let mut s = format!("hex {} ", list(&block.vertices));
    if let Some(zone) = &block.zone {
        s.push_str(zone);
        s.push(' ');
    }
    s.push_str(&format!(
        "{} {} {} // {}",
        list(&block.cells),
        block.grading.keyword(),
        list(block.grading.ratios()),
        index
    ));
    if let Some(description) = &block.description {
        let flat: String = description
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        s.push(' ');
        s.push_str(flat.trim());
    }
    s
}

fn edge_entry(edge: &Edge) -> String {
    let data = match &edge.curve {
        Curve::Arc { through } => point(through),
        curve => {
            let inner: Vec<String> = curve.points().iter().map(point).collect();
            format!("( {} )", inner.join(" "))
        }
    };
    format!("{} {} {} {}", edge.curve.keyword(), edge.start, edge.end, data)
}

fn check_encodable(mesh: &BlockMesh, options: &DictOptions) -> MeshResult<()> {
    if !(options.scale.is_finite() && options.scale > 0.0) {
        return Err(MeshError::encoding(format!(
            "scale must be finite and positive, got {}",
            options.scale
        )));
    }

    let n = mesh.vertices.len();
    let finite = |p: &Point3<f64>| p.coords.iter().all(|c| c.is_finite());

    for (i, v) in mesh.vertices.iter().enumerate() {
        if !finite(&v.position) {
            return Err(MeshError::encoding(format!(
                "vertex {} has non-finite coordinates {:?}",
                i, v.position
            )));
        }
    }

    for (i, block) in mesh.blocks.iter().enumerate() {
        if let Some(&bad) = block.vertices.iter().find(|&&v| v >= n) {
            return Err(MeshError::encoding(format!(
                "block {} references vertex {} of {}",
                i, bad, n
            )));
        }
        if block.cells.contains(&0) {
            return Err(MeshError::encoding(format!("block {} has a zero cell count", i)));
        }
        if block.grading.ratios().iter().any(|r| !r.is_finite()) {
            return Err(MeshError::encoding(format!(
                "block {} has a non-finite grading",
                i
            )));
        }
        if let Some(zone) = &block.zone {
            if !is_word(zone) {
                return Err(MeshError::encoding(format!(
                    "block {} cell zone {:?} is not a single word",
                    i, zone
                )));
            }
        }
    }

    for (i, edge) in mesh.edges.iter().enumerate() {
        if edge.start >= n || edge.end >= n {
            return Err(MeshError::encoding(format!(
                "edge {} ({} {}) references a vertex outside 0..{}",
                i, edge.start, edge.end, n
            )));
        }
        if edge.curve.points().is_empty() || !edge.curve.points().iter().all(finite) {
            return Err(MeshError::encoding(format!(
                "edge {} has missing or non-finite control points",
                i
            )));
        }
    }

    let mut names = HashSet::with_capacity(mesh.patches.len());
    for patch in &mesh.patches {
        if !is_word(&patch.name) {
            return Err(MeshError::encoding(format!(
                "patch name {:?} is not a single word",
                patch.name
            )));
        }
        if !is_word(patch.kind.as_str()) {
            return Err(MeshError::encoding(format!(
                "patch {:?} has type {:?}, which is not a single word",
                patch.name,
                patch.kind.as_str()
            )));
        }
        if !names.insert(patch.name.as_str()) {
            return Err(MeshError::encoding(format!(
                "patch name {:?} appears twice",
                patch.name
            )));
        }
        if let Some(face) = patch.faces.iter().find(|f| f.0.iter().any(|&v| v >= n)) {
            return Err(MeshError::encoding(format!(
                "patch {:?} face {:?} references a vertex outside 0..{}",
                patch.name, face.0, n
            )));
        }
    }

    for pair in &mesh.merge_pairs {
        for name in [&pair.master, &pair.slave] {
            if !names.contains(name.as_str()) {
                return Err(MeshError::encoding(format!(
                    "merge pair references unknown patch {:?}",
                    name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{Grading, PatchType};
    use crate::{BlockSpec, MeshBuilder};

    fn unit_cube() -> BlockMesh {
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
            .add_block(&[0, 1, 2, 3, 4, 5, 6, 7], [1, 1, 1], None)
            .unwrap();
        builder
            .add_boundary_patch("top", PatchType::Patch, [[4usize, 5, 6, 7]])
            .unwrap();
        builder.validate().unwrap()
    }

    fn body(text: &str) -> &str {
        let start = text.find("scale").expect("scale entry");
        &text[start..]
    }

    #[test]
    fn test_unit_cube_exact_output() {
        let text = write_dict(&unit_cube(), &DictOptions::default()).unwrap();
        let expected = "\
scale 1;

vertices
(
    ( 0 0 0 ) // 0
    ( 1 0 0 ) // 1
    ( 1 1 0 ) // 2
    ( 0 1 0 ) // 3
    ( 0 0 1 ) // 4
    ( 1 0 1 ) // 5
    ( 1 1 1 ) // 6
    ( 0 1 1 ) // 7
);

blocks
(
    hex ( 0 1 2 3 4 5 6 7 ) ( 1 1 1 ) simpleGrading ( 1 1 1 ) // 0
);

edges
(
);

boundary
(
    top
    {
        type patch;
        faces
        (
            ( 4 5 6 7 )
        );
    }
);

mergePatchPairs
(
);

// ************************************************************************* //
";
        assert_eq!(body(&text), expected);
        assert!(text.starts_with(FOAM_HEADER));
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let mesh = unit_cube();
        let options = DictOptions::with_scale(0.001);
        let a = write_dict(&mesh, &options).unwrap();
        let b = write_dict(&mesh, &options).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("scale 0.001;\n"));
    }

    #[test]
    fn test_numbers_never_use_exponent() {
        let mut builder = MeshBuilder::new();
        builder.add_vertices([[1e-7, 2.5e10, -0.125]]);
        let mesh = builder.validate().unwrap();
        let text = write_dict(&mesh, &DictOptions::default()).unwrap();
        assert!(text.contains("( 0.0000001 25000000000 -0.125 ) // 0"));
    }

    #[test]
    fn test_block_zone_grading_and_comment() {
        let mut builder = MeshBuilder::new();
        builder.add_vertices([[0.0, 0.0, 0.0]; 8]);
        builder
            .add_block_with(
                BlockSpec::new([0usize, 1, 2, 3, 4, 5, 6, 7], [10, 20, 1])
                    .grading(Grading::Simple([2.0, 0.5, 1.0]))
                    .zone("fluid")
                    .description("inlet\nduct"),
            )
            .unwrap();
        builder
            .add_block_with(
                BlockSpec::new([0usize, 1, 2, 3, 4, 5, 6, 7], [1, 1, 1])
                    .grading(Grading::Edge([1.0; 12])),
            )
            .unwrap();
        let mesh = builder.validate().unwrap();
        let text = write_dict(&mesh, &DictOptions::default()).unwrap();

        assert!(text.contains(
            "    hex ( 0 1 2 3 4 5 6 7 ) fluid ( 10 20 1 ) simpleGrading ( 2 0.5 1 ) // 0 inlet duct\n"
        ));
        assert!(text.contains(
            "    hex ( 0 1 2 3 4 5 6 7 ) ( 1 1 1 ) edgeGrading ( 1 1 1 1 1 1 1 1 1 1 1 1 ) // 1\n"
        ));
    }

    #[test]
    fn test_edge_entries() {
        let mut builder = MeshBuilder::new();
        builder.add_vertices([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        builder
            .add_edge(
                0,
                1,
                Curve::Arc {
                    through: Point3::new(0.5, 0.2, 0.0),
                },
            )
            .unwrap();
        builder
            .add_edge(
                1,
                0,
                Curve::Spline(vec![Point3::new(0.7, 0.1, 0.0), Point3::new(0.3, 0.1, 0.0)]),
            )
            .unwrap();
        builder
            .add_edge(0, 1, Curve::PolyLine(vec![Point3::new(0.5, 0.0, 0.5)]))
            .unwrap();
        let mesh = builder.validate().unwrap();
        let text = write_dict(&mesh, &DictOptions::default()).unwrap();

        assert!(text.contains("    arc 0 1 ( 0.5 0.2 0 )\n"));
        assert!(text.contains("    spline 1 0 ( ( 0.7 0.1 0 ) ( 0.3 0.1 0 ) )\n"));
        assert!(text.contains("    polyLine 0 1 ( ( 0.5 0 0.5 ) )\n"));
    }

    #[test]
    fn test_merge_pairs_and_patch_order() {
        let mut builder = MeshBuilder::new();
        builder.add_vertices([[0.0, 0.0, 0.0]; 8]);
        builder
            .add_boundary_patch("zeta", PatchType::Wall, [[0usize, 1, 2, 3]])
            .unwrap();
        builder
            .add_boundary_patch("alpha", PatchType::Patch, [[4usize, 5, 6, 7]])
            .unwrap();
        builder.add_merge_pair("zeta", "alpha").unwrap();
        let mesh = builder.validate().unwrap();
        let text = write_dict(&mesh, &DictOptions::default()).unwrap();

        let zeta = text.find("    zeta\n").unwrap();
        let alpha = text.find("    alpha\n").unwrap();
        assert!(zeta < alpha);
        assert!(text.contains("        type wall;\n"));
        assert!(text.contains("mergePatchPairs\n(\n    ( zeta alpha )\n);\n"));
    }

    #[test]
    fn test_custom_header_copied_verbatim() {
        let options = DictOptions {
            header: "// generated\nFoamFile { class dictionary; object blockMeshDict; }".into(),
            vertex_comments: false,
            ..DictOptions::default()
        };
        let text = write_dict(&unit_cube(), &options).unwrap();
        assert!(text.starts_with(
            "// generated\nFoamFile { class dictionary; object blockMeshDict; }\n\nscale 1;\n"
        ));
        assert!(text.contains("    ( 0 0 0 )\n"));
    }

    #[test]
    fn test_non_finite_coordinate_after_validation_is_encoding_error() {
        let mut mesh = unit_cube();
        mesh.vertices[2].position.y = f64::NAN;
        let err = write_dict(&mesh, &DictOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);

        let mut mesh = unit_cube();
        mesh.blocks[0].zone = Some("my zone".into());
        let err = write_dict(&mesh, &DictOptions::default()).unwrap_err();
        assert!(err.to_string().contains("cell zone"));
    }

    #[test]
    fn test_bad_scale_is_encoding_error() {
        let err = write_dict(&unit_cube(), &DictOptions::with_scale(0.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_bypassed_validation_is_encoding_error() {
        let mut mesh = unit_cube();
        mesh.vertices.truncate(7);
        let err = write_dict(&mesh, &DictOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);

        let mut mesh = unit_cube();
        mesh.patches[0].name = "top wall".into();
        let err = write_dict(&mesh, &DictOptions::default()).unwrap_err();
        assert!(err.to_string().contains("single word"));
    }
}
