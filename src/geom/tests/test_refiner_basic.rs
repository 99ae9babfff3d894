use crate::geom::{
    Float2, Float3, MeshRefiner, RefineSettings, RefinedMesh, Tolerance, TriangulationPolicy,
};

/// Two unit quads folded 90 degrees along the edge 1-2.
fn folded_quads() -> (Vec<Float3>, Vec<u32>) {
    let points = vec![
        Float3::new(0.0, 0.0, 0.0),
        Float3::new(1.0, 0.0, 0.0),
        Float3::new(1.0, 1.0, 0.0),
        Float3::new(0.0, 1.0, 0.0),
        Float3::new(1.0, 0.0, -1.0),
        Float3::new(1.0, 1.0, -1.0),
    ];
    (points, vec![0, 1, 2, 3, 1, 4, 5, 2])
}

fn refine_with_angle(angle: f32) -> (Vec<Float3>, RefinedMesh) {
    let (points, indices) = folded_quads();
    let mut refiner =
        MeshRefiner::prepare_uniform(&indices, 4, &points, RefineSettings::default()).expect("prepare");
    refiner.gen_normals_with_smooth_angle(angle, false).expect("normals");
    let corners = refiner.normals().expect("generated").to_vec();
    refiner.refine(false).expect("refine");
    (corners, refiner.finish().expect("finish"))
}

#[test]
fn zero_angle_gives_flat_normals() {
    let (corners, mesh) = refine_with_angle(0.0);
    assert!(corners[..4].iter().all(|n| *n == Float3::Z));
    assert!(corners[4..].iter().all(|n| *n == Float3::X));

    // Vertices 1 and 2 are split along the crease.
    assert_eq!(mesh.points.len(), 8);
    assert_eq!(mesh.diagnostics.seam_duplicate_count, 2);
    assert_eq!(mesh.triangle_count(), 4);
}

#[test]
fn wide_angle_averages_across_the_crease() {
    let (corners, mesh) = refine_with_angle(180.0);
    let diagonal = Float3::new(1.0, 0.0, 1.0).normalize_or_zero();
    let tol = Tolerance::NEAR_EQUAL;
    assert!(tol.near_eq_float3(corners[1], diagonal));
    assert!(tol.near_eq_float3(corners[4], diagonal));
    assert_eq!(corners[0], Float3::Z);
    assert_eq!(mesh.points.len(), 6);
    assert_eq!(mesh.diagnostics.seam_duplicate_count, 0);

    let (points, indices) = folded_quads();
    let mut refiner =
        MeshRefiner::prepare_uniform(&indices, 4, &points, RefineSettings::default()).expect("prepare");
    refiner.gen_normals(false).expect("normals");
    let full = refiner.normals().expect("generated");
    assert!(tol.near_eq_float3(full[1], corners[1]));
    assert!(tol.near_eq_float3(full[7], corners[7]));
}

#[test]
fn flipped_normals_point_the_other_way() {
    let (points, indices) = folded_quads();
    let mut refiner =
        MeshRefiner::prepare_uniform(&indices, 4, &points, RefineSettings::default()).expect("prepare");
    refiner.gen_normals_with_smooth_angle(30.0, true).expect("normals");
    assert_eq!(refiner.normals().expect("generated")[0], -Float3::Z);
}

#[test]
fn refining_a_refined_mesh_keeps_its_counts() {
    let n = 5u32;
    let points: Vec<Float3> = (0..n * n)
        .map(|i| Float3::new((i % n) as f32, 0.0, (i / n) as f32))
        .collect();
    let uv: Vec<Float2> = points.iter().map(|p| Float2::new(p.x * 0.25, p.z * 0.25)).collect();
    let mut indices = Vec::new();
    for row in 0..n - 1 {
        for col in 0..n - 1 {
            let a = row * n + col;
            indices.extend_from_slice(&[a, a + 1, a + n + 1, a, a + n + 1, a + n]);
        }
    }

    let run = |indices: &[u32], points: &[Float3], uv: &[Float2]| {
        let mut refiner =
            MeshRefiner::prepare_uniform(indices, 3, points, RefineSettings::default()).expect("prepare");
        refiner.set_uv(uv).expect("uv");
        refiner.refine(false).expect("refine");
        refiner.finish().expect("finish")
    };

    let first = run(&indices, &points, &uv);
    assert_eq!(first.split_count(), 1);
    let second = run(&first.indices, &first.points, &first.uv);
    assert_eq!(second.points.len(), first.points.len());
    assert_eq!(second.indices.len(), first.indices.len());
    assert_eq!(second.points.len(), points.len());
}

#[test]
fn ear_clipping_handles_concave_faces() {
    // Arrow-shaped hexagon; a fan from corner 0 would leave the polygon.
    let points = vec![
        Float3::new(0.0, 0.0, 0.0),
        Float3::new(2.0, 0.0, 0.0),
        Float3::new(2.0, 2.0, 0.0),
        Float3::new(1.0, 1.0, 0.0),
        Float3::new(0.0, 2.0, 0.0),
        Float3::new(0.5, 1.0, 0.0),
    ];
    let indices: Vec<u32> = (0..6).collect();
    let settings = RefineSettings::default().with_triangulation(TriangulationPolicy::EarClip);
    let mut refiner = MeshRefiner::prepare(&[6], &indices, &points, settings).expect("prepare");
    refiner.refine(false).expect("refine");
    let mesh = refiner.finish().expect("finish");

    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(mesh.diagnostics.triangulation_fallback_count, 0);
    let areas: Vec<f32> = mesh
        .indices
        .chunks_exact(3)
        .map(|t| {
            let [a, b, c] = [t[0], t[1], t[2]].map(|i| mesh.points[i as usize]);
            (b - a).cross(c - a).z * 0.5
        })
        .collect();
    assert!(areas.iter().all(|a| *a > 0.0), "{areas:?}");
    assert!((areas.iter().sum::<f32>() - 2.5).abs() < 1e-5);
}
