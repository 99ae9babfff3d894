use crate::geom::{ConnectionData, FaceSet, Float3, on_edge, select_edge_indices, select_edge_with};

/// `n x n` vertices in the xy plane, quads wound counter-clockwise, optionally
/// skipping the quad whose lower-left corner is `hole`.
fn quad_grid(n: u32, hole: Option<u32>) -> (Vec<Float3>, Vec<u32>) {
    let points = (0..n * n)
        .map(|i| Float3::new((i % n) as f32, (i / n) as f32, 0.0))
        .collect();
    let mut indices = Vec::new();
    for row in 0..n - 1 {
        for col in 0..n - 1 {
            let i = row * n + col;
            if Some(i) == hole {
                continue;
            }
            indices.extend_from_slice(&[i, i + 1, i + n + 1, i + n]);
        }
    }
    (points, indices)
}

fn edge_vertices(points: &[Float3], faces: &FaceSet<'_>) -> Vec<usize> {
    let conn = ConnectionData::build(faces, points).expect("connectivity");
    (0..points.len()).filter(|&v| on_edge(faces, &conn, v)).collect()
}

#[test]
fn open_grid_perimeter_is_on_edge() {
    let (points, indices) = quad_grid(4, None);
    let faces = FaceSet::uniform(&indices, 4).expect("quads");

    let on = edge_vertices(&points, &faces);
    assert_eq!(on.len(), 12);
    for interior in [5, 6, 9, 10] {
        assert!(!on.contains(&interior));
    }

    let selected = select_edge_indices(&faces, &points, &[0]).expect("select");
    assert_eq!(selected, vec![0, 1, 2, 3, 4, 7, 8, 11, 12, 13, 14, 15]);
}

#[test]
fn hole_grid_selects_each_loop_separately() {
    let (points, indices) = quad_grid(4, Some(5));
    let faces = FaceSet::uniform(&indices, 4).expect("quads");
    assert_eq!(faces.face_count(), 8);

    assert_eq!(edge_vertices(&points, &faces).len(), 16);

    let outer = select_edge_indices(&faces, &points, &[1]).expect("outer loop");
    assert_eq!(outer.len(), 12);
    assert!(!outer.contains(&5));

    let inner = select_edge_indices(&faces, &points, &[5]).expect("inner loop");
    assert_eq!(inner, vec![5, 6, 9, 10]);
}

#[test]
fn closed_cube_has_no_edge() {
    let points: Vec<Float3> = (0..8)
        .map(|i| Float3::new((i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32))
        .collect();
    let indices = [
        0, 2, 3, 1, // -z
        4, 5, 7, 6, // +z
        0, 1, 5, 4, // -y
        2, 6, 7, 3, // +y
        0, 4, 6, 2, // -x
        1, 3, 7, 5, // +x
    ];
    let faces = FaceSet::uniform(&indices, 4).expect("quads");
    let conn = ConnectionData::build(&faces, &points).expect("connectivity");

    assert!(edge_vertices(&points, &faces).is_empty());
    assert_eq!(conn.edge_topology(), (0, 0));

    let mut seen = Vec::new();
    select_edge_with(&faces, &conn, &[3], |v| seen.push(v)).expect("select");
    assert_eq!(seen, vec![3]);
}

#[test]
fn welded_seam_is_not_an_edge() {
    // Two quads whose shared edge uses duplicated vertices (4, 5 repeat 1, 2).
    let points = vec![
        Float3::new(0.0, 0.0, 0.0),
        Float3::new(1.0, 0.0, 0.0),
        Float3::new(1.0, 1.0, 0.0),
        Float3::new(0.0, 1.0, 0.0),
        Float3::new(1.0, 0.0, 0.0),
        Float3::new(1.0, 1.0, 0.0),
        Float3::new(2.0, 0.0, 0.0),
        Float3::new(2.0, 1.0, 0.0),
    ];
    let indices = [0, 1, 2, 3, 4, 6, 7, 5];
    let faces = FaceSet::uniform(&indices, 4).expect("quads");
    let conn = ConnectionData::build(&faces, &points).expect("connectivity");

    assert_eq!(conn.welded_vertex_count(), 2);
    assert_eq!(conn.edge_face_count(1, 2), 2);
    assert_eq!(conn.edge_face_count(4, 5), 2);
    assert_eq!(conn.edge_topology().0, 6);
}
