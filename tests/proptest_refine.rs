use mesh_utils::{Float3, MeshRefiner, RefineSettings};
use proptest::prelude::*;

/// Polygon soup over `vertex_count` random points: `(points, counts, indices)`.
fn soup() -> impl Strategy<Value = (Vec<Float3>, Vec<u32>, Vec<u32>)> {
    (4usize..40).prop_flat_map(|vertex_count| {
        let points = prop::collection::vec(
            (-10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0).prop_map(|(x, y, z)| Float3::new(x, y, z)),
            vertex_count,
        );
        let faces = prop::collection::vec(
            prop::collection::vec(0..vertex_count as u32, 1..7),
            1..30,
        );
        (points, faces).prop_map(|(points, faces)| {
            let counts = faces.iter().map(|f| f.len() as u32).collect();
            let indices = faces.into_iter().flatten().collect();
            (points, counts, indices)
        })
    })
}

proptest! {
    #[test]
    fn refine_preserves_faces_and_respects_split_unit(
        (points, counts, indices) in soup(),
        split_unit in 3usize..24,
        flip in any::<bool>(),
    ) {
        let settings = RefineSettings::default().with_split_unit(split_unit);
        let mut refiner = MeshRefiner::prepare(&counts, &indices, &points, settings).unwrap();
        refiner.gen_normals(false).unwrap();
        refiner.refine(flip).unwrap();
        let mesh = refiner.finish().unwrap();

        let expected: usize = counts.iter().filter(|&&n| n >= 3).map(|&n| n as usize - 2).sum();
        let degenerate = counts.iter().filter(|&&n| n < 3).count();
        prop_assert_eq!(mesh.triangle_count(), expected);
        prop_assert_eq!(mesh.diagnostics.degenerate_face_count, degenerate);

        let mut triangles = 0;
        for (split, view) in mesh.splits.iter().zip(mesh.split_views()) {
            prop_assert!(split.vertex_count <= split_unit || split.face_count == 1);
            prop_assert_eq!(view.points.len(), split.vertex_count);
            prop_assert!(view.indices.iter().all(|&i| (i as usize) < split.vertex_count));
            for (k, &src) in view.new_to_old.iter().enumerate() {
                prop_assert_eq!(view.points[k], points[src as usize]);
            }
            triangles += split.triangle_count();
        }
        prop_assert_eq!(triangles, expected);
        prop_assert_eq!(mesh.points.len(), mesh.new_to_old.len());
        prop_assert_eq!(mesh.normals.len(), mesh.points.len());
    }
}
