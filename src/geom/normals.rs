//! Face and smoothed vertex/corner normal synthesis.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::Float3;
use super::connection::ConnectionData;
use super::topology::FaceSet;
use super::triangulation::newell_normal;

/// Slack on the smoothing cosine so that coplanar faces always merge.
const SMOOTH_COS_EPS: f32 = 1e-6;

/// Area-weighted face normals (Newell). Zero-area faces yield zero.
#[must_use]
pub fn face_normals(points: &[Float3], faces: &FaceSet<'_>) -> Vec<Float3> {
    faces
        .faces()
        .map(|face| {
            if face.len() < 3 {
                return Float3::ZERO;
            }
            newell_normal(face.len(), |i| points[face[i] as usize])
        })
        .collect()
}

/// Per-vertex normals averaged over every incident face.
///
/// A vertex with no faces, or whose faces cancel out, gets a zero normal.
#[must_use]
pub fn vertex_normals(
    points: &[Float3],
    faces: &FaceSet<'_>,
    conn: &ConnectionData,
    flip: bool,
) -> Vec<Float3> {
    let raw = face_normals(points, faces);
    (0..points.len())
        .map(|v| {
            let mut sum = Float3::ZERO;
            for &f in conn.faces_of(v) {
                sum += raw[f as usize];
            }
            orient(sum.normalize_or_zero(), flip)
        })
        .collect()
}

/// Per-corner normals with a smoothing-angle threshold, in index-stream order.
///
/// The corner of face `f` at vertex `v` sums the area-weighted normals of the faces
/// around `v` whose direction is within `angle_deg` of `f`'s. At `0°` this yields
/// flat shading; at `180°` and above every incident face contributes.
#[must_use]
pub fn corner_normals(
    points: &[Float3],
    faces: &FaceSet<'_>,
    conn: &ConnectionData,
    angle_deg: f32,
    flip: bool,
) -> Vec<Float3> {
    let raw = face_normals(points, faces);
    let unit: Vec<Float3> = raw.iter().map(|n| n.normalize_or_zero()).collect();
    let smoothing = Smoothing {
        raw: &raw,
        unit: &unit,
        conn,
        cos_limit: angle_deg.to_radians().cos() - SMOOTH_COS_EPS,
        all: angle_deg >= 180.0,
        flip,
    };

    let mut corner_face = Vec::with_capacity(faces.indices().len());
    for f in 0..faces.face_count() {
        corner_face.extend(std::iter::repeat_n(f as u32, faces.face_len(f)));
    }
    let corners: Vec<(u32, u32)> = corner_face
        .iter()
        .zip(faces.indices())
        .map(|(f, v)| (*f, *v))
        .collect();
    smooth_corners(&smoothing, &corners)
}

struct Smoothing<'a> {
    raw: &'a [Float3],
    unit: &'a [Float3],
    conn: &'a ConnectionData,
    cos_limit: f32,
    all: bool,
    flip: bool,
}

impl Smoothing<'_> {
    fn corner(&self, face: u32, vertex: u32) -> Float3 {
        let own = self.unit[face as usize];
        let mut sum = Float3::ZERO;
        for &g in self.conn.faces_of(vertex as usize) {
            if g == face || self.all || own.dot(self.unit[g as usize]) >= self.cos_limit {
                sum += self.raw[g as usize];
            }
        }
        orient(sum.normalize_or_zero(), self.flip)
    }
}

#[cfg(feature = "parallel")]
fn smooth_corners(smoothing: &Smoothing<'_>, corners: &[(u32, u32)]) -> Vec<Float3> {
    corners
        .par_iter()
        .map(|(f, v)| smoothing.corner(*f, *v))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn smooth_corners(smoothing: &Smoothing<'_>, corners: &[(u32, u32)]) -> Vec<Float3> {
    corners
        .iter()
        .map(|(f, v)| smoothing.corner(*f, *v))
        .collect()
}

fn orient(n: Float3, flip: bool) -> Float3 {
    if flip { -n } else { n }
}
