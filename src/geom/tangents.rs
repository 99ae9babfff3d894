//! Tangent frames from UV gradients.
//!
//! Each triangle contributes its UV → position Jacobian to its corners. Corners that
//! share a welded position, a UV and a normal pool their contributions; UV or normal
//! seams therefore keep separate frames. The result is Gram-Schmidt orthogonalized
//! against the corner normal and carries the bitangent handedness in `w`.

use std::collections::HashMap;

use super::connection::ConnectionData;
use super::topology::FaceSet;
use super::triangulation::fan_triangles;
use super::{Float2, Float3, Float4, Tolerance};

#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    tangent: Float3,
    bitangent: Float3,
}

/// Per-corner tangents; `normals` and `uv` are per-corner streams.
#[must_use]
pub fn corner_tangents(
    points: &[Float3],
    faces: &FaceSet<'_>,
    conn: &ConnectionData,
    normals: &[Float3],
    uv: &[Float2],
) -> Vec<Float4> {
    let indices = faces.indices();
    let mut slot_of_corner = Vec::with_capacity(indices.len());
    let mut slots: HashMap<(u32, [u32; 2], [u32; 3]), usize> = HashMap::new();
    for (corner, &v) in indices.iter().enumerate() {
        let key = (
            conn.welded(v as usize) as u32,
            uv[corner].bits(),
            normals[corner].bits(),
        );
        let next = slots.len();
        slot_of_corner.push(*slots.entry(key).or_insert(next));
    }

    let mut frames = vec![Frame::default(); slots.len()];
    let mut tris = Vec::new();
    let mut degenerate = 0usize;
    for f in 0..faces.face_count() {
        let offset = faces.face_offset(f);
        tris.clear();
        fan_triangles(faces.face_len(f), &mut tris);
        for tri in &tris {
            let c = tri.map(|k| offset + k as usize);
            let Some(frame) = triangle_frame(
                [0, 1, 2].map(|i| points[indices[c[i]] as usize]),
                [0, 1, 2].map(|i| uv[c[i]]),
            ) else {
                degenerate += 1;
                continue;
            };
            for corner in c {
                let acc = &mut frames[slot_of_corner[corner]];
                acc.tangent += frame.tangent;
                acc.bitangent += frame.bitangent;
            }
        }
    }
    if degenerate > 0 {
        log::debug!("tangents: {degenerate} triangles with degenerate UVs skipped");
    }

    slot_of_corner
        .iter()
        .zip(normals)
        .map(|(slot, n)| finish_frame(frames[*slot], *n))
        .collect()
}

fn triangle_frame(p: [Float3; 3], uv: [Float2; 3]) -> Option<Frame> {
    let e1 = p[1] - p[0];
    let e2 = p[2] - p[0];
    let d1 = uv[1] - uv[0];
    let d2 = uv[2] - uv[0];

    let det = d1.x * d2.y - d2.x * d1.y;
    if !det.is_finite() || det.abs() < Tolerance::ZERO_LENGTH.eps {
        return None;
    }
    let inv = 1.0 / det;
    Some(Frame {
        tangent: (e1 * d2.y - e2 * d1.y) * inv,
        bitangent: (e2 * d1.x - e1 * d2.x) * inv,
    })
}

fn finish_frame(frame: Frame, n: Float3) -> Float4 {
    let n = n.normalize_or_zero();
    // Gram-Schmidt: T' = T - (N . T) N
    let t = frame.tangent - n * n.dot(frame.tangent);
    let Some(t) = t.normalized() else {
        return Float4::new(0.0, 0.0, 0.0, 1.0);
    };
    let w = if n.cross(t).dot(frame.bitangent) < 0.0 {
        -1.0
    } else {
        1.0
    };
    Float4::from_xyz(t, w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> (Vec<Float3>, Vec<u32>) {
        let points = vec![
            Float3::new(0.0, 0.0, 0.0),
            Float3::new(1.0, 0.0, 0.0),
            Float3::new(1.0, 1.0, 0.0),
            Float3::new(0.0, 1.0, 0.0),
        ];
        (points, vec![0, 1, 2, 3])
    }

    #[test]
    fn planar_uv_gives_x_tangent() {
        let (points, indices) = unit_quad();
        let faces = FaceSet::uniform(&indices, 4).unwrap();
        let conn = ConnectionData::build(&faces, &points).unwrap();
        let normals = vec![Float3::Z; 4];
        let uv: Vec<Float2> = points.iter().map(|p| Float2::new(p.x, p.y)).collect();
        let tangents = corner_tangents(&points, &faces, &conn, &normals, &uv);
        for t in tangents {
            assert!((t.x - 1.0).abs() < 1e-5 && t.y.abs() < 1e-5 && t.z.abs() < 1e-5);
            assert_eq!(t.w, 1.0);
        }
    }

    #[test]
    fn mirrored_uv_flips_handedness() {
        let (points, indices) = unit_quad();
        let faces = FaceSet::uniform(&indices, 4).unwrap();
        let conn = ConnectionData::build(&faces, &points).unwrap();
        let normals = vec![Float3::Z; 4];
        let uv: Vec<Float2> = points.iter().map(|p| Float2::new(p.x, 1.0 - p.y)).collect();
        let tangents = corner_tangents(&points, &faces, &conn, &normals, &uv);
        assert!(tangents.iter().all(|t| t.w == -1.0));
    }

    #[test]
    fn degenerate_uv_yields_fallback() {
        let (points, indices) = unit_quad();
        let faces = FaceSet::uniform(&indices, 4).unwrap();
        let conn = ConnectionData::build(&faces, &points).unwrap();
        let normals = vec![Float3::Z; 4];
        let uv = vec![Float2::ZERO; 4];
        let tangents = corner_tangents(&points, &faces, &conn, &normals, &uv);
        assert!(tangents.iter().all(|t| *t == Float4::new(0.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn unnormalized_normals_still_orthogonalize() {
        let (points, indices) = unit_quad();
        let faces = FaceSet::uniform(&indices, 4).unwrap();
        let conn = ConnectionData::build(&faces, &points).unwrap();
        let normals = vec![Float3::new(3.0, 0.0, 3.0); 4];
        let uv: Vec<Float2> = points.iter().map(|p| Float2::new(p.x, p.y)).collect();
        let tangents = corner_tangents(&points, &faces, &conn, &normals, &uv);
        let unit_n = normals[0].normalize_or_zero();
        for t in tangents {
            let t = t.xyz();
            assert!((t.length() - 1.0).abs() < 1e-5);
            assert!(t.dot(unit_n).abs() < 1e-5);
        }
    }
}
