//! Ray/triangle-soup intersection over indexed, flattened and component-split layouts.
//!
//! Möller–Trumbore, double-sided. A hit needs `t >= 0` and barycentrics inside the
//! triangle; `|det| < Tolerance::DETERMINANT` never hits. The nearest hit has the smallest
//! `t`, ties resolved to the lowest triangle index. The lane kernel evaluates the same
//! expressions per lane as the scalar kernel, so both report the same hits.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::lanes::{ExecPath, Float3x8, LANES, Lane, Mask, active_mask};
use super::{Float3, Tolerance};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("{layout} buffer holds {len} elements, not a multiple of 3")]
    NotTriangles { layout: &'static str, len: usize },
    #[error("component arrays differ in length: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: usize,
        vertex_count: usize,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Layouts
// ────────────────────────────────────────────────────────────────────────────

/// Random access to a triangle soup.
pub trait TriangleLayout: Sync {
    fn triangle_count(&self) -> usize;

    fn triangle(&self, i: usize) -> [Float3; 3];

    /// Corners of triangles `start..start + count` as lane batches, zero-padded.
    fn gather(&self, start: usize, count: usize) -> [Float3x8; 3] {
        let mut corners = [Float3x8::zeros(); 3];
        for lane in 0..count.min(LANES) {
            let tri = self.triangle(start + lane);
            for (c, p) in corners.iter_mut().zip(tri) {
                c.xs[lane] = p.x;
                c.ys[lane] = p.y;
                c.zs[lane] = p.z;
            }
        }
        corners
    }
}

/// Shared vertex buffer plus three indices per triangle.
#[derive(Debug, Clone, Copy)]
pub struct IndexedTriangles<'a> {
    vertices: &'a [Float3],
    indices: &'a [u32],
}

impl<'a> IndexedTriangles<'a> {
    pub fn new(vertices: &'a [Float3], indices: &'a [u32]) -> Result<Self, QueryError> {
        if indices.len() % 3 != 0 {
            return Err(QueryError::NotTriangles {
                layout: "index",
                len: indices.len(),
            });
        }
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= vertices.len())
        {
            return Err(QueryError::IndexOutOfRange {
                position,
                index: index as usize,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }
}

impl TriangleLayout for IndexedTriangles<'_> {
    fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn triangle(&self, i: usize) -> [Float3; 3] {
        let t = &self.indices[i * 3..i * 3 + 3];
        [
            self.vertices[t[0] as usize],
            self.vertices[t[1] as usize],
            self.vertices[t[2] as usize],
        ]
    }
}

/// Three consecutive vertices per triangle.
#[derive(Debug, Clone, Copy)]
pub struct FlatTriangles<'a> {
    vertices: &'a [Float3],
}

impl<'a> FlatTriangles<'a> {
    pub fn new(vertices: &'a [Float3]) -> Result<Self, QueryError> {
        if vertices.len() % 3 != 0 {
            return Err(QueryError::NotTriangles {
                layout: "vertex",
                len: vertices.len(),
            });
        }
        Ok(Self { vertices })
    }
}

impl TriangleLayout for FlatTriangles<'_> {
    fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    fn triangle(&self, i: usize) -> [Float3; 3] {
        [
            self.vertices[i * 3],
            self.vertices[i * 3 + 1],
            self.vertices[i * 3 + 2],
        ]
    }
}

/// One array per corner component: `v1x[i]` is the x of triangle `i`'s first corner.
#[derive(Debug, Clone, Copy)]
pub struct SoaTriangles<'a> {
    v1x: &'a [f32],
    v1y: &'a [f32],
    v1z: &'a [f32],
    v2x: &'a [f32],
    v2y: &'a [f32],
    v2z: &'a [f32],
    v3x: &'a [f32],
    v3y: &'a [f32],
    v3z: &'a [f32],
}

impl<'a> SoaTriangles<'a> {
    /// Each argument is `[xs, ys, zs]` for one corner.
    pub fn new(v1: [&'a [f32]; 3], v2: [&'a [f32]; 3], v3: [&'a [f32]; 3]) -> Result<Self, QueryError> {
        let expected = v1[0].len();
        if let Some(found) = v1
            .iter()
            .chain(&v2)
            .chain(&v3)
            .map(|c| c.len())
            .find(|len| *len != expected)
        {
            return Err(QueryError::LengthMismatch { expected, found });
        }
        Ok(Self {
            v1x: v1[0],
            v1y: v1[1],
            v1z: v1[2],
            v2x: v2[0],
            v2y: v2[1],
            v2z: v2[2],
            v3x: v3[0],
            v3y: v3[1],
            v3z: v3[2],
        })
    }
}

impl TriangleLayout for SoaTriangles<'_> {
    fn triangle_count(&self) -> usize {
        self.v1x.len()
    }

    fn triangle(&self, i: usize) -> [Float3; 3] {
        [
            Float3::new(self.v1x[i], self.v1y[i], self.v1z[i]),
            Float3::new(self.v2x[i], self.v2y[i], self.v2z[i]),
            Float3::new(self.v3x[i], self.v3y[i], self.v3z[i]),
        ]
    }

    fn gather(&self, start: usize, count: usize) -> [Float3x8; 3] {
        let end = start + count.min(LANES);
        [
            Float3x8::from_soa(&self.v1x[start..end], &self.v1y[start..end], &self.v1z[start..end]),
            Float3x8::from_soa(&self.v2x[start..end], &self.v2y[start..end], &self.v2z[start..end]),
            Float3x8::from_soa(&self.v3x[start..end], &self.v3y[start..end], &self.v3z[start..end]),
        ]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub hit_count: usize,
    /// Index of the closest hit triangle.
    pub nearest: Option<usize>,
    /// Ray parameter of the closest hit; infinite when nothing was hit.
    pub distance: f32,
}

impl Default for RayHit {
    fn default() -> Self {
        Self::MISS
    }
}

impl RayHit {
    pub const MISS: Self = Self {
        hit_count: 0,
        nearest: None,
        distance: f32::INFINITY,
    };

    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.nearest.is_some()
    }

    /// Hit point along `origin + distance * dir`.
    #[must_use]
    pub fn position(&self, origin: Float3, dir: Float3) -> Option<Float3> {
        self.nearest.map(|_| origin + dir * self.distance)
    }

    fn record(&mut self, index: usize, t: f32) {
        self.hit_count += 1;
        if t < self.distance {
            self.distance = t;
            self.nearest = Some(index);
        }
    }

    /// Combine partial results; equal distances keep the lower index.
    #[must_use]
    fn merge(self, other: Self) -> Self {
        let take_other = match (self.nearest, other.nearest) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(a), Some(b)) => other.distance < self.distance || (other.distance == self.distance && b < a),
        };
        let nearest = if take_other { other } else { self };
        Self {
            hit_count: self.hit_count + other.hit_count,
            nearest: nearest.nearest,
            distance: nearest.distance,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Kernels
// ────────────────────────────────────────────────────────────────────────────

fn moller_trumbore(origin: Float3, dir: Float3, tri: [Float3; 3]) -> Option<f32> {
    let e1 = tri[1] - tri[0];
    let e2 = tri[2] - tri[0];
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < Tolerance::DETERMINANT.eps {
        return None;
    }
    let inv = 1.0 / det;
    let s = origin - tri[0];
    let u = s.dot(p) * inv;
    let q = s.cross(e1);
    let v = dir.dot(q) * inv;
    let t = e2.dot(q) * inv;
    // Accept only on comparisons that hold, so NaN never hits.
    ((0.0..=1.0).contains(&u) && v >= 0.0 && u + v <= 1.0 && t >= 0.0).then_some(t)
}

/// Lane form of [`moller_trumbore`]; inactive lanes never hit.
fn moller_trumbore_lanes(origin: &Float3x8, dir: &Float3x8, tri: &[Float3x8; 3], active: Mask) -> (Mask, Lane) {
    let e1 = tri[1].sub(&tri[0]);
    let e2 = tri[2].sub(&tri[0]);
    let p = dir.cross(&e2);
    let det = e1.dot(&p);
    let s = origin.sub(&tri[0]);
    let sp = s.dot(&p);
    let q = s.cross(&e1);
    let dq = dir.dot(&q);
    let e2q = e2.dot(&q);

    let mut hit = [false; LANES];
    let mut t = [f32::INFINITY; LANES];
    for i in 0..LANES {
        if !active[i] || det[i].abs() < Tolerance::DETERMINANT.eps {
            continue;
        }
        let inv = 1.0 / det[i];
        let u = sp[i] * inv;
        let v = dq[i] * inv;
        let ti = e2q[i] * inv;
        if (0.0..=1.0).contains(&u) && v >= 0.0 && u + v <= 1.0 && ti >= 0.0 {
            hit[i] = true;
            t[i] = ti;
        }
    }
    (hit, t)
}

/// Scalar path.
#[must_use]
pub fn ray_triangles_intersection_generic<L: TriangleLayout + ?Sized>(
    origin: Float3,
    dir: Float3,
    layout: &L,
) -> RayHit {
    let mut result = RayHit::MISS;
    for i in 0..layout.triangle_count() {
        if let Some(t) = moller_trumbore(origin, dir, layout.triangle(i)) {
            result.record(i, t);
        }
    }
    result
}

fn lane_chunk<L: TriangleLayout + ?Sized>(
    origin: &Float3x8,
    dir: &Float3x8,
    layout: &L,
    chunk: usize,
) -> RayHit {
    let start = chunk * LANES;
    let count = (layout.triangle_count() - start).min(LANES);
    let tri = layout.gather(start, count);
    let (hit, t) = moller_trumbore_lanes(origin, dir, &tri, active_mask(count));
    let mut result = RayHit::MISS;
    for lane in 0..count {
        if hit[lane] {
            result.record(start + lane, t[lane]);
        }
    }
    result
}

cfg_if::cfg_if! {
    if #[cfg(feature = "parallel")] {
        fn run_lane_chunks<L: TriangleLayout + ?Sized>(origin: &Float3x8, dir: &Float3x8, layout: &L) -> RayHit {
            let chunks = layout.triangle_count().div_ceil(LANES);
            (0..chunks)
                .into_par_iter()
                .map(|c| lane_chunk(origin, dir, layout, c))
                .reduce(|| RayHit::MISS, RayHit::merge)
        }
    } else {
        fn run_lane_chunks<L: TriangleLayout + ?Sized>(origin: &Float3x8, dir: &Float3x8, layout: &L) -> RayHit {
            let chunks = layout.triangle_count().div_ceil(LANES);
            (0..chunks)
                .map(|c| lane_chunk(origin, dir, layout, c))
                .fold(RayHit::MISS, RayHit::merge)
        }
    }
}

/// Lane-batched path; same hits as [`ray_triangles_intersection_generic`].
#[must_use]
pub fn ray_triangles_intersection_lanes<L: TriangleLayout + ?Sized>(
    origin: Float3,
    dir: Float3,
    layout: &L,
) -> RayHit {
    run_lane_chunks(&Float3x8::splat(origin), &Float3x8::splat(dir), layout)
}

#[must_use]
pub fn ray_triangles_intersection<L: TriangleLayout + ?Sized>(
    path: ExecPath,
    origin: Float3,
    dir: Float3,
    layout: &L,
) -> RayHit {
    match path {
        ExecPath::Generic => ray_triangles_intersection_generic(origin, dir, layout),
        ExecPath::Lanes => ray_triangles_intersection_lanes(origin, dir, layout),
    }
}
