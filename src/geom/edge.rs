//! Open-edge classification and edge-loop flood selection.

use std::collections::VecDeque;

use super::Float3;
use super::connection::ConnectionData;
use super::topology::{FaceSet, TopologyError};

/// `true` when some edge around `v` belongs to exactly one face.
///
/// Closed meshes report `false` everywhere; a vertex with no faces is not on an edge.
#[must_use]
pub fn on_edge(faces: &FaceSet<'_>, conn: &ConnectionData, v: usize) -> bool {
    if v >= conn.vertex_count() {
        return false;
    }
    let rep = conn.welded(v);
    for &f in conn.faces_of(v) {
        let face = faces.face(f as usize);
        let n = face.len();
        if n < 3 {
            continue;
        }
        for k in 0..n {
            if conn.welded(face[k] as usize) != rep {
                continue;
            }
            let prev = face[(k + n - 1) % n] as usize;
            let next = face[(k + 1) % n] as usize;
            if conn.edge_face_count(v, prev) == 1 || conn.edge_face_count(v, next) == 1 {
                return true;
            }
        }
    }
    false
}

/// Build connectivity for `faces` and flood along open edges from `seeds`.
///
/// See [`select_edge_with`].
pub fn select_edge(
    faces: &FaceSet<'_>,
    points: &[Float3],
    seeds: &[u32],
    emit: impl FnMut(usize),
) -> Result<(), TopologyError> {
    let conn = ConnectionData::build(faces, points)?;
    select_edge_with(faces, &conn, seeds, emit)
}

/// Breadth-first walk from `seeds` that only crosses edges shared by a single face.
///
/// `emit` sees every reached vertex index once, seeds and welded twins included.
pub fn select_edge_with(
    faces: &FaceSet<'_>,
    conn: &ConnectionData,
    seeds: &[u32],
    mut emit: impl FnMut(usize),
) -> Result<(), TopologyError> {
    let vertex_count = conn.vertex_count();
    if let Some((position, &index)) = seeds
        .iter()
        .enumerate()
        .find(|(_, s)| **s as usize >= vertex_count)
    {
        return Err(TopologyError::IndexOutOfRange {
            position,
            index: index as usize,
            vertex_count,
        });
    }
    debug_assert_eq!(conn.corner_total(), faces.indices().len());

    let mut visited = vec![false; vertex_count];
    let mut queue = VecDeque::new();
    for &seed in seeds {
        let rep = conn.welded(seed as usize);
        if !visited[rep] {
            visited[rep] = true;
            queue.push_back(rep);
        }
    }

    let mut reached = 0usize;
    while let Some(rep) = queue.pop_front() {
        for &v in conn.group_of(rep) {
            emit(v as usize);
            reached += 1;
        }
        for (n, count) in conn.edges_of(rep) {
            let n = n as usize;
            if count == 1 && !visited[n] {
                visited[n] = true;
                queue.push_back(n);
            }
        }
    }
    log::debug!("select_edge: {} seeds reached {} vertices", seeds.len(), reached);
    Ok(())
}

/// [`select_edge`] collected into a sorted index list.
pub fn select_edge_indices(
    faces: &FaceSet<'_>,
    points: &[Float3],
    seeds: &[u32],
) -> Result<Vec<u32>, TopologyError> {
    let mut out = Vec::new();
    select_edge(faces, points, seeds, |v| out.push(v as u32))?;
    out.sort_unstable();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_tetrahedron_has_no_edge_vertices() {
        let points = [
            Float3::new(0.0, 0.0, 0.0),
            Float3::new(1.0, 0.0, 0.0),
            Float3::new(0.0, 1.0, 0.0),
            Float3::new(0.0, 0.0, 1.0),
        ];
        let indices = [0, 2, 1, 0, 1, 3, 1, 2, 3, 2, 0, 3];
        let faces = FaceSet::uniform(&indices, 3).unwrap();
        let conn = ConnectionData::build(&faces, &points).unwrap();
        assert!((0..4).all(|v| !on_edge(&faces, &conn, v)));
    }

    #[test]
    fn isolated_vertex_is_not_on_edge() {
        let points = [
            Float3::new(0.0, 0.0, 0.0),
            Float3::new(1.0, 0.0, 0.0),
            Float3::new(0.0, 1.0, 0.0),
            Float3::new(5.0, 5.0, 5.0),
        ];
        let indices = [0, 1, 2];
        let faces = FaceSet::uniform(&indices, 3).unwrap();
        let conn = ConnectionData::build(&faces, &points).unwrap();
        assert!(on_edge(&faces, &conn, 0));
        assert!(!on_edge(&faces, &conn, 3));
        assert!(!on_edge(&faces, &conn, 17));
    }

    #[test]
    fn seed_without_open_edges_emits_itself() {
        let points = [
            Float3::new(0.0, 0.5, 0.0),
            Float3::new(1.0, 0.0, 0.0),
            Float3::new(0.0, 1.0, 0.0),
            Float3::new(-1.0, 0.0, 0.0),
        ];
        let indices = [0, 1, 2, 0, 2, 3, 0, 3, 1];
        let faces = FaceSet::uniform(&indices, 3).unwrap();
        assert_eq!(select_edge_indices(&faces, &points, &[0]).unwrap(), vec![0]);
    }

    #[test]
    fn out_of_range_seed_is_rejected() {
        let points = [Float3::ZERO, Float3::X, Float3::Y];
        let indices = [0, 1, 2];
        let faces = FaceSet::uniform(&indices, 3).unwrap();
        assert!(matches!(
            select_edge(&faces, &points, &[1, 3], |_| {}),
            Err(TopologyError::IndexOutOfRange { position: 1, index: 3, .. })
        ));
    }
}
