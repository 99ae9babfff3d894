//! Polygon → triangle decomposition used by the refiner.
//!
//! Both policies emit exactly `n - 2` triangles for an `n`-gon and keep the face's
//! winding; triangles are returned as local corner indices into the face.

use serde::{Deserialize, Serialize};

use super::{Float2, Float3, Tolerance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TriangulationPolicy {
    /// `(0, i, i + 1)` from the first corner.
    #[default]
    Fan,
    /// Ear clipping on the polygon projected to its dominant plane; falls back to `Fan`.
    EarClip,
}

/// Newell normal of a closed polygon. Its length is twice the polygon area.
#[must_use]
pub fn newell_normal(n: usize, at: impl Fn(usize) -> Float3) -> Float3 {
    let mut normal = Float3::ZERO;
    for i in 0..n {
        let a = at(i);
        let b = at((i + 1) % n);
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

pub fn fan_triangles(n: usize, out: &mut Vec<[u32; 3]>) {
    for i in 1..n.saturating_sub(1) {
        out.push([0, i as u32, i as u32 + 1]);
    }
}

/// Triangulate one face given its corner positions. Returns `false` when ear
/// clipping was requested but the fan fallback was used.
pub fn triangulate_polygon(
    policy: TriangulationPolicy,
    corners: &[Float3],
    out: &mut Vec<[u32; 3]>,
) -> bool {
    let n = corners.len();
    if n < 3 {
        return true;
    }
    if n == 3 || policy == TriangulationPolicy::Fan {
        fan_triangles(n, out);
        return true;
    }

    let start = out.len();
    let projected = project_dominant(corners);
    if earclip_polygon(&projected, Tolerance::ZERO_LENGTH, out) {
        return true;
    }
    out.truncate(start);
    log::debug!("ear clipping found no ear on a {n}-gon; using fan");
    fan_triangles(n, out);
    false
}

fn project_dominant(corners: &[Float3]) -> Vec<Float2> {
    let normal = newell_normal(corners.len(), |i| corners[i]);
    let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
    corners
        .iter()
        .map(|p| {
            if az >= ax && az >= ay {
                Float2::new(p.x, p.y)
            } else if ax >= ay {
                Float2::new(p.y, p.z)
            } else {
                Float2::new(p.z, p.x)
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Ear clipping
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Node {
    idx: u32,
    point: Float2,
    prev: usize,
    next: usize,
}

fn build_ring(points: &[Float2]) -> Vec<Node> {
    let len = points.len();
    points
        .iter()
        .enumerate()
        .map(|(i, &point)| Node {
            idx: i as u32,
            point,
            prev: (i + len - 1) % len,
            next: (i + 1) % len,
        })
        .collect()
}

fn earclip_polygon(points: &[Float2], tol: Tolerance, out: &mut Vec<[u32; 3]>) -> bool {
    let mut nodes = build_ring(points);
    let is_ccw = signed_area(points) > 0.0;
    let mut remaining = nodes.len();
    let mut ear = 0usize;
    let mut stop = 0usize;

    while remaining > 3 {
        let prev = nodes[ear].prev;
        let next = nodes[ear].next;
        if is_ear(prev, ear, next, &nodes, is_ccw, tol) {
            out.push([nodes[prev].idx, nodes[ear].idx, nodes[next].idx]);
            remove_node(ear, &mut nodes);
            remaining -= 1;
            ear = next;
            stop = next;
            continue;
        }

        ear = next;
        if ear == stop {
            return false;
        }
    }

    let next = nodes[ear].next;
    out.push([nodes[nodes[ear].prev].idx, nodes[ear].idx, nodes[next].idx]);
    true
}

fn is_ear(prev: usize, ear: usize, next: usize, nodes: &[Node], is_ccw: bool, tol: Tolerance) -> bool {
    let a = nodes[prev].point;
    let b = nodes[ear].point;
    let c = nodes[next].point;

    let cross = orient2d(a, b, c);
    if is_ccw {
        if cross <= tol.eps {
            return false;
        }
    } else if cross >= -tol.eps {
        return false;
    }

    let mut p = nodes[next].next;
    while p != prev {
        let pt = nodes[p].point;
        if point_in_triangle(a, b, c, pt, is_ccw) {
            return false;
        }
        p = nodes[p].next;
    }
    true
}

fn signed_area(points: &[Float2]) -> f32 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    0.5 * area
}

fn remove_node(node: usize, nodes: &mut [Node]) {
    let prev = nodes[node].prev;
    let next = nodes[node].next;
    nodes[prev].next = next;
    nodes[next].prev = prev;
}

fn orient2d(a: Float2, b: Float2, c: Float2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn point_in_triangle(a: Float2, b: Float2, c: Float2, p: Float2, is_ccw: bool) -> bool {
    let ab = orient2d(a, b, p);
    let bc = orient2d(b, c, p);
    let ca = orient2d(c, a, p);
    if is_ccw {
        ab >= 0.0 && bc >= 0.0 && ca >= 0.0
    } else {
        ab <= 0.0 && bc <= 0.0 && ca <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_sum(corners: &[Float3], tris: &[[u32; 3]]) -> f32 {
        tris.iter()
            .map(|t| {
                let a = corners[t[0] as usize];
                let b = corners[t[1] as usize];
                let c = corners[t[2] as usize];
                (b - a).cross(c - a).z * 0.5
            })
            .sum()
    }

    #[test]
    fn fan_emits_n_minus_two() {
        let mut out = Vec::new();
        fan_triangles(5, &mut out);
        assert_eq!(out, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
        out.clear();
        fan_triangles(2, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn ear_clip_handles_concave_polygon() {
        // Arrow shape, concave at corner 3; the fan from 0 would cover the notch.
        let corners = [
            Float3::new(0.0, 0.0, 0.0),
            Float3::new(2.0, 0.0, 0.0),
            Float3::new(2.0, 2.0, 0.0),
            Float3::new(1.0, 0.5, 0.0),
            Float3::new(0.0, 2.0, 0.0),
        ];
        let mut out = Vec::new();
        assert!(triangulate_polygon(TriangulationPolicy::EarClip, &corners, &mut out));
        assert_eq!(out.len(), 3);
        let area = area_sum(&corners, &out);
        assert!((area - 2.5).abs() < 1e-5, "area {area}");
        for t in &out {
            let a = corners[t[0] as usize];
            let b = corners[t[1] as usize];
            let c = corners[t[2] as usize];
            assert!((b - a).cross(c - a).z > 0.0, "winding flipped in {t:?}");
        }
    }

    #[test]
    fn ear_clip_keeps_clockwise_winding() {
        let corners = [
            Float3::new(0.0, 0.0, 0.0),
            Float3::new(0.0, 0.0, 1.0),
            Float3::new(1.0, 0.0, 1.0),
            Float3::new(1.0, 0.0, 0.0),
        ];
        let normal = newell_normal(4, |i| corners[i]);
        let mut out = Vec::new();
        triangulate_polygon(TriangulationPolicy::EarClip, &corners, &mut out);
        assert_eq!(out.len(), 2);
        for t in &out {
            let a = corners[t[0] as usize];
            let b = corners[t[1] as usize];
            let c = corners[t[2] as usize];
            assert!((b - a).cross(c - a).dot(normal) > 0.0);
        }
    }

    #[test]
    fn newell_normal_of_unit_square() {
        let sq = [
            Float3::new(0.0, 0.0, 0.0),
            Float3::new(1.0, 0.0, 0.0),
            Float3::new(1.0, 1.0, 0.0),
            Float3::new(0.0, 1.0, 0.0),
        ];
        assert_eq!(newell_normal(4, |i| sq[i]), Float3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn collinear_polygon_falls_back_to_fan() {
        let corners = [
            Float3::new(0.0, 0.0, 0.0),
            Float3::new(1.0, 0.0, 0.0),
            Float3::new(2.0, 0.0, 0.0),
            Float3::new(3.0, 0.0, 0.0),
        ];
        let mut out = Vec::new();
        assert!(!triangulate_polygon(TriangulationPolicy::EarClip, &corners, &mut out));
        assert_eq!(out, vec![[0, 1, 2], [0, 2, 3]]);
    }
}
