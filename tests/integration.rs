use mesh_utils::geom::{
    ExecPath, FaceSet, FlatTriangles, IndexedArray, SoaPolygon, Topology, Weights4, min_max,
    poly_inside, ray_triangles_intersection, select_edge_indices,
};
use mesh_utils::{
    Float2, Float3, Float4, MeshRefiner, RefineError, RefineSettings, TriangulationPolicy,
};

/// `n x n` quad grid in the xz plane with per-vertex uv and colors.
fn grid(n: u32) -> (Vec<Float3>, Vec<u32>, Vec<Float2>, Vec<Float4>) {
    let points: Vec<Float3> = (0..n * n)
        .map(|i| Float3::new((i % n) as f32, 0.0, (i / n) as f32))
        .collect();
    let uv = points
        .iter()
        .map(|p| Float2::new(p.x / (n - 1) as f32, p.z / (n - 1) as f32))
        .collect();
    let colors = points.iter().map(|p| Float4::new(p.x, p.z, 0.0, 1.0)).collect();
    let mut indices = Vec::new();
    for row in 0..n - 1 {
        for col in 0..n - 1 {
            let i = row * n + col;
            indices.extend_from_slice(&[i, i + n, i + n + 1, i + 1]);
        }
    }
    (points, indices, uv, colors)
}

#[test]
fn facade_receives_aligned_split_streams() {
    mesh_utils::init_logger();
    let (points, indices, uv, colors) = grid(12);
    let face_count = indices.len() / 4;
    let materials: Vec<i32> = (0..face_count as i32).map(|f| f % 3).collect();
    let weights: Vec<Weights4> = (0..points.len() as u32).map(|v| Weights4::single(v % 4)).collect();

    let settings = RefineSettings::default()
        .with_split_unit(40)
        .with_triangulation(TriangulationPolicy::EarClip);
    let mut refiner = MeshRefiner::prepare_uniform(&indices, 4, &points, settings).expect("prepare");
    refiner.set_uv(&uv).expect("uv");
    refiner.set_colors(&colors).expect("colors");
    refiner.set_weights(&weights).expect("weights");
    refiner.gen_normals_with_smooth_angle(60.0, false).expect("normals");
    refiner.gen_tangents().expect("tangents");
    refiner.refine(false).expect("refine");
    refiner.gen_submesh(&materials).expect("submesh");
    let mesh = refiner.finish().expect("finish");

    assert!(mesh.split_count() > 1);
    assert_eq!(mesh.triangle_count(), face_count * 2);
    assert_eq!(mesh.diagnostics.triangle_count, mesh.triangle_count());
    assert_eq!(mesh.diagnostics.vertex_count, mesh.points.len());
    assert_eq!(mesh.diagnostics.seam_duplicate_count, 0);
    assert!(mesh.diagnostics.is_clean(), "{}", mesh.diagnostics);

    let mut triangles = 0;
    for view in mesh.split_views() {
        let n = view.points.len();
        assert!(n <= 40);
        assert_eq!(view.normals.len(), n);
        assert_eq!(view.tangents.len(), n);
        assert_eq!(view.uv.len(), n);
        assert_eq!(view.colors.len(), n);
        assert_eq!(view.weights.len(), n);
        assert!(view.indices.iter().all(|&i| (i as usize) < n));

        let mut previous = i32::MIN;
        let mut submesh_indices = 0;
        for submesh in view.submeshes {
            assert_eq!(submesh.topology, Topology::Triangles);
            assert!(submesh.material_id > previous);
            previous = submesh.material_id;
            let local = view.submesh_indices(submesh);
            assert!(local.iter().all(|&i| (i as usize) < n));
            submesh_indices += local.len();
        }
        assert_eq!(submesh_indices, view.indices.len());
        triangles += view.indices.len() / 3;

        for (k, &src) in view.new_to_old.iter().enumerate() {
            assert_eq!(view.points[k], points[src as usize]);
            assert_eq!(view.uv[k], uv[src as usize]);
            assert_eq!(view.weights[k], weights[src as usize]);
        }
    }
    assert_eq!(triangles, mesh.triangle_count());
}

#[test]
fn tangent_generation_needs_inputs() {
    let (points, indices, _, _) = grid(3);
    let mut refiner =
        MeshRefiner::prepare_uniform(&indices, 4, &points, RefineSettings::default()).expect("prepare");
    assert!(matches!(refiner.gen_tangents(), Err(RefineError::MissingNormals)));
}

#[test]
fn grid_border_selection_and_queries() {
    let (points, indices, _, _) = grid(6);
    let faces = FaceSet::uniform(&indices, 4).expect("quads");
    let border = select_edge_indices(&faces, &points, &[0]).expect("select");
    assert_eq!(border.len(), 20);

    let lookup = IndexedArray::new(&border, &points).expect("in range");
    assert!(lookup.iter().all(|p| p.x == 0.0 || p.x == 5.0 || p.z == 0.0 || p.z == 5.0));

    let outline: Vec<Float3> = [0u32, 5, 35, 35, 30, 0]
        .into_iter()
        .map(|i| points[i as usize])
        .collect();
    let soup = FlatTriangles::new(&outline).expect("two triangles");
    let hit = ray_triangles_intersection(
        ExecPath::Lanes,
        Float3::new(2.3, 4.0, 1.7),
        Float3::new(0.0, -1.0, 0.0),
        &soup,
    );
    assert_eq!(hit.hit_count, 1);

    let xs: Vec<f32> = border.iter().map(|&i| points[i as usize].x).collect();
    let zs: Vec<f32> = border.iter().map(|&i| points[i as usize].z).collect();
    let cloud = SoaPolygon::new(&xs, &zs).expect("lengths");
    let bbox = min_max(ExecPath::Lanes, &cloud).expect("non-empty");
    assert_eq!(bbox.max, Float2::new(5.0, 5.0));

    let square = [
        Float2::new(0.0, 0.0),
        Float2::new(5.0, 0.0),
        Float2::new(5.0, 5.0),
        Float2::new(0.0, 5.0),
    ];
    assert!(poly_inside(ExecPath::Generic, &square[..], bbox, Float2::new(2.5, 2.5)));
}
