//! Example: describe a graded cube with a curved top edge and print its
//! blockMeshDict.
//!
//! Run with: `cargo run --example cube`

use blockmesh::{
    BlockSide, BlockSpec, Curve, DictOptions, Grading, MeshBuilder, MeshDescription, PatchType,
};
use nalgebra::Point3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // =========================================================================
    // 1. Build a model programmatically
    // =========================================================================

    let mut builder = MeshBuilder::new();
    let corners = builder.add_vertices([
        [0.0, 0.0, 0.0],
        [10.0, 0.0, 0.0],
        [10.0, 10.0, 0.0],
        [0.0, 10.0, 0.0],
        [0.0, 0.0, 10.0],
        [10.0, 0.0, 10.0],
        [10.0, 10.0, 10.0],
        [0.0, 10.0, 10.0],
    ]);
    let corners: Vec<usize> = corners.collect();

    let cells = builder.cell_counts_for_size(&corners, [0.5, 0.5, 1.0])?;
    let block = builder.add_block_with(
        BlockSpec::new(corners, cells)
            .grading(Grading::Simple([1.0, 1.0, 4.0]))
            .description("cube"),
    )?;

    builder.add_edge(
        4,
        5,
        Curve::Arc {
            through: Point3::new(5.0, 0.0, 11.0),
        },
    )?;

    let top = builder.block_face(block, BlockSide::Top)?;
    builder.add_boundary_patch("lid", PatchType::Wall, [top.0])?;
    let walls: Vec<[usize; 4]> = [BlockSide::Left, BlockSide::Right, BlockSide::Bottom]
        .into_iter()
        .map(|side| builder.block_face(block, side).map(|f| f.0))
        .collect::<Result<_, _>>()?;
    builder.add_boundary_patch("walls", PatchType::Wall, walls)?;

    let mesh = builder.validate()?;
    println!("{}", mesh.topology_report());

    // =========================================================================
    // 2. Serialize with millimetre scaling
    // =========================================================================

    let text = mesh.to_dict(&DictOptions::with_scale(0.001))?;
    println!("{}", text);

    // =========================================================================
    // 3. The same kind of model from a TOML description
    // =========================================================================

    let description = MeshDescription::from_toml(
        r#"
        scale = 0.001
        vertices = [[0, 0, 0], [10, 0, 0], [10, 10, 0], [0, 10, 0],
                    [0, 0, 10], [10, 0, 10], [10, 10, 10], [0, 10, 10]]

        [[blocks]]
        vertices = [0, 1, 2, 3, 4, 5, 6, 7]
        cells = [20, 20, 10]

        [[boundary]]
        name = "lid"
        type = "wall"
        block_faces = [{ block = 0, side = "top" }]
        "#,
    )?;
    let described = description.build()?;
    println!(
        "Description: {} blocks, {} cells",
        described.blocks().len(),
        described.cell_count()
    );

    Ok(())
}
