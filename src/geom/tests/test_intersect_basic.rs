use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::{
    ExecPath, FlatTriangles, Float3, IndexedTriangles, RayHit, SoaTriangles, Tolerance,
    TriangleLayout, ray_triangles_intersection,
};

/// `n x n` vertices spanning [-1, 1] in the xz plane, two triangles per cell.
fn xz_grid(n: u32) -> (Vec<Float3>, Vec<u32>) {
    let step = 2.0 / (n - 1) as f32;
    let vertices = (0..n * n)
        .map(|i| Float3::new(-1.0 + (i % n) as f32 * step, 0.0, -1.0 + (i / n) as f32 * step))
        .collect();
    let mut indices = Vec::new();
    for row in 0..n - 1 {
        for col in 0..n - 1 {
            let a = row * n + col;
            let (b, c, d) = (a + 1, a + n + 1, a + n);
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
    (vertices, indices)
}

struct Buffers {
    flat: Vec<Float3>,
    soa: [Vec<f32>; 9],
}

fn flatten(vertices: &[Float3], indices: &[u32]) -> Buffers {
    let flat: Vec<Float3> = indices.iter().map(|&i| vertices[i as usize]).collect();
    let mut soa: [Vec<f32>; 9] = Default::default();
    for tri in flat.chunks_exact(3) {
        for (corner, p) in tri.iter().enumerate() {
            soa[corner * 3].push(p.x);
            soa[corner * 3 + 1].push(p.y);
            soa[corner * 3 + 2].push(p.z);
        }
    }
    Buffers { flat, soa }
}

fn soa_layout(b: &Buffers) -> SoaTriangles<'_> {
    let s = &b.soa;
    SoaTriangles::new([&s[0], &s[1], &s[2]], [&s[3], &s[4], &s[5]], [&s[6], &s[7], &s[8]])
        .expect("equal component lengths")
}

fn all_hits(origin: Float3, dir: Float3, layouts: &[&dyn TriangleLayout]) -> Vec<RayHit> {
    let mut hits = Vec::new();
    for layout in layouts {
        for path in [ExecPath::Generic, ExecPath::Lanes] {
            hits.push(ray_triangles_intersection(path, origin, dir, *layout));
        }
    }
    hits
}

fn assert_consistent(hits: &[RayHit]) {
    let first = hits[0];
    for hit in &hits[1..] {
        assert_eq!(hit.hit_count, first.hit_count);
        assert_eq!(hit.nearest, first.nearest);
        if first.is_hit() {
            assert!(Tolerance::NEAR_EQUAL.near_eq(hit.distance, first.distance));
        }
    }
}

#[test]
fn downward_ray_hits_grid_once_on_every_layout_and_path() {
    let (vertices, indices) = xz_grid(70);
    let buffers = flatten(&vertices, &indices);
    let indexed = IndexedTriangles::new(&vertices, &indices).expect("indexed");
    let flat = FlatTriangles::new(&buffers.flat).expect("flat");
    let soa = soa_layout(&buffers);
    assert_eq!(soa.triangle_count(), 69 * 69 * 2);

    let origin = Float3::new(0.0123, 10.0, 0.0071);
    let dir = Float3::new(0.0, -1.0, 0.0);
    let hits = all_hits(origin, dir, &[&indexed, &flat, &soa]);
    assert_consistent(&hits);

    let hit = hits[0];
    assert_eq!(hit.hit_count, 1);
    assert!((hit.distance - 10.0).abs() < 1e-4);
    let position = hit.position(origin, dir).expect("hit position");
    assert!(Tolerance::NEAR_EQUAL.approx_eq_float3(position, Float3::new(0.0123, 0.0, 0.0071)));

    let tri = indexed.triangle(hit.nearest.expect("nearest"));
    assert!(tri.iter().all(|p| (p.x - 0.0123).abs() < 0.03 && (p.z - 0.0071).abs() < 0.03));
}

#[test]
fn ray_missing_the_grid_reports_nothing() {
    let (vertices, indices) = xz_grid(20);
    let indexed = IndexedTriangles::new(&vertices, &indices).expect("indexed");
    let hits = all_hits(Float3::new(1.5, 5.0, 0.0), Float3::new(0.0, -1.0, 0.0), &[&indexed]);
    assert_consistent(&hits);
    assert_eq!(hits[0], RayHit::MISS);

    // Parallel to the plane: every determinant is zero.
    let hits = all_hits(Float3::new(-2.0, 0.0, 0.1), Float3::new(1.0, 0.0, 0.0), &[&indexed]);
    assert_consistent(&hits);
    assert!(!hits[0].is_hit());
}

#[test]
fn random_soups_agree_between_paths() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..20 {
        let count = rng.random_range(1..200usize) * 3;
        let vertices: Vec<Float3> = (0..count)
            .map(|_| {
                Float3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                )
            })
            .collect();
        let buffers = flatten(&vertices, &(0..count as u32).collect::<Vec<_>>());
        let flat = FlatTriangles::new(&vertices).expect("flat");
        let soa = soa_layout(&buffers);

        let origin = Float3::new(
            rng.random_range(-0.5..0.5),
            rng.random_range(-0.5..0.5),
            -3.0,
        );
        let dir = Float3::new(rng.random_range(-0.2..0.2), rng.random_range(-0.2..0.2), 1.0);
        assert_consistent(&all_hits(origin, dir, &[&flat, &soa]));
    }
}
