//! Halo exchange regression test
//!
//! Splits seeded random volumes into chunks, exchanges halos and checks:
//!
//! 1. Trimming an exchanged halo restores the core blocks exactly
//! 2. Every interior halo slab is a copy of the neighbor's inner slab
//! 3. Domain-edge halo follows the boundary policy
//! 4. Ragged layouts reassemble to the original array
//!
//! Run with:
//! ```
//! cargo test -p chunkshed-core --test halo_reg
//! ```

use chunkshed_core::{
    BoundaryPolicy, ChunkBox, ChunkLayout, ChunkedArray, GridGeometry, Neighbor, border_ring,
    exchange,
};
use chunkshed_test::{RegParams, random_surface};
use ndarray::{ArrayD, Zip};

fn check_trim_identity(rp: &mut RegParams, data: &ArrayD<f32>, geometry: &GridGeometry) {
    let depth = geometry.halo_depth();
    let chunks = ChunkedArray::split(data, geometry).expect("split failed");

    for policy in [BoundaryPolicy::Nearest, BoundaryPolicy::Constant(-1.0)] {
        let padded = exchange(&chunks, depth, &policy).expect("exchange failed");
        rp.compare_values(depth as f64, padded.halo() as f64, 0.0);

        let trimmed = padded.trim().expect("trim failed");
        let same = trimmed == chunks;
        rp.compare_values(1.0, if same { 1.0 } else { 0.0 }, 0.0);

        // Assembling either the padded or the trimmed blocks gives the input
        let assembled = padded.assemble().expect("assemble failed");
        rp.compare_labels(data, &assembled);
    }
}

fn check_face_slabs(rp: &mut RegParams, data: &ArrayD<f32>, geometry: &GridGeometry) {
    let depth = geometry.halo_depth();
    let chunks = ChunkedArray::split(data, geometry).expect("split failed");
    let padded = exchange(&chunks, depth, &BoundaryPolicy::Nearest).expect("exchange failed");

    let mut checked = 0usize;
    let mut mismatched = 0usize;
    for chunk in 0..geometry.num_chunks() {
        let core = geometry.core_box(chunk).expect("core_box failed");
        let block = padded.block(chunk).expect("block failed");
        let origin = ChunkBox::new(core.start().to_vec(), block.shape().to_vec())
            .expect("ChunkBox::new failed");

        for face in geometry.faces(chunk, depth).expect("faces failed") {
            let (neighbor, outer) = match (face.neighbor, &face.outer) {
                (Neighbor::Chunk(n), Some(outer)) => (n, outer),
                _ => continue,
            };
            // Slab in padded-block coordinates
            let local = outer
                .translate(&vec![depth; geometry.ndim()])
                .relative_to(&origin)
                .expect("relative_to failed");
            let borrowed = local.view(block).expect("view failed");
            let owned = outer.view(data).expect("view failed");
            if borrowed != owned {
                mismatched += 1;
            }

            // The neighbor sees the same face from the other side
            let back = geometry
                .faces(neighbor, depth)
                .expect("faces failed")
                .into_iter()
                .find(|f| f.neighbor == Neighbor::Chunk(chunk))
                .expect("missing opposite face");
            if back.inner != *outer || back.side != face.side.opposite() {
                mismatched += 1;
            }
            checked += 1;
        }
    }
    eprintln!("  Interior faces checked: {}", checked);
    rp.compare_values(1.0, if checked > 0 { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(0.0, mismatched as f64, 0.0);
}

#[test]
fn halo_reg_exact_3d() {
    let mut rp = RegParams::new("halo_exact");

    let data = random_surface(&[12, 10, 8], 17);
    for depth in [1, 2] {
        let geometry = GridGeometry::new(&[12, 10, 8], &[4, 5, 4], depth, ChunkLayout::Exact)
            .expect("GridGeometry::new failed");
        rp.compare_values(12.0, geometry.num_chunks() as f64, 0.0);
        check_trim_identity(&mut rp, &data, &geometry);
        check_face_slabs(&mut rp, &data, &geometry);
    }

    assert!(rp.cleanup(), "halo exact regression test failed");
}

#[test]
fn halo_reg_ragged_2d() {
    let mut rp = RegParams::new("halo_ragged");

    let data = random_surface(&[10, 8], 3);
    let geometry = GridGeometry::new(&[10, 8], &[4, 3], 1, ChunkLayout::Ragged)
        .expect("GridGeometry::new failed");
    rp.compare_values(9.0, geometry.num_chunks() as f64, 0.0);
    check_trim_identity(&mut rp, &data, &geometry);
    check_face_slabs(&mut rp, &data, &geometry);

    // The same tiling is rejected without the ragged layout
    let exact = GridGeometry::new(&[10, 8], &[4, 3], 1, ChunkLayout::Exact);
    rp.compare_values(1.0, if exact.is_err() { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "halo ragged regression test failed");
}

#[test]
fn halo_reg_constant_edges() {
    let mut rp = RegParams::new("halo_constant");

    let data = random_surface(&[8, 8], 5);
    let geometry = GridGeometry::new(&[8, 8], &[8, 8], 2, ChunkLayout::Exact)
        .expect("GridGeometry::new failed");
    let chunks = ChunkedArray::split(&data, &geometry).expect("split failed");

    // A single chunk borders the domain on every side: its whole halo ring
    // is filled by the policy.
    let padded = exchange(&chunks, 2, &BoundaryPolicy::Constant(-1.0)).expect("exchange failed");
    let block = padded.block(0).expect("block failed");
    let ring = border_ring(block.shape(), 2);
    let wrong = Zip::from(block)
        .and(&ring)
        .fold(0usize, |acc, &v, &r| acc + usize::from(r && v != -1.0));
    rp.compare_values(0.0, wrong as f64, 0.0);
    rp.compare_values(80.0, ring.iter().filter(|&&r| r).count() as f64, 0.0);

    assert!(rp.cleanup(), "halo constant regression test failed");
}
