//! 2D polygon queries: bounding box and even-odd point containment.
//!
//! Polygons are implicit rings; the last vertex connects back to the first.

use super::intersect::QueryError;
use super::lanes::{ExecPath, LANES, Lane, active_mask};
use super::{BBox2, Float2};

/// Random access to polygon vertices.
pub trait PolygonLayout {
    fn vertex_count(&self) -> usize;

    fn vertex(&self, i: usize) -> Float2;

    /// Vertices `start..start + count` as x and y lanes, zero-padded.
    fn gather(&self, start: usize, count: usize) -> (Lane, Lane) {
        let mut xs = [0.0; LANES];
        let mut ys = [0.0; LANES];
        for lane in 0..count.min(LANES) {
            let p = self.vertex(start + lane);
            xs[lane] = p.x;
            ys[lane] = p.y;
        }
        (xs, ys)
    }
}

impl PolygonLayout for [Float2] {
    fn vertex_count(&self) -> usize {
        self.len()
    }

    fn vertex(&self, i: usize) -> Float2 {
        self[i]
    }
}

/// Split x and y arrays.
#[derive(Debug, Clone, Copy)]
pub struct SoaPolygon<'a> {
    xs: &'a [f32],
    ys: &'a [f32],
}

impl<'a> SoaPolygon<'a> {
    pub fn new(xs: &'a [f32], ys: &'a [f32]) -> Result<Self, QueryError> {
        if xs.len() != ys.len() {
            return Err(QueryError::LengthMismatch {
                expected: xs.len(),
                found: ys.len(),
            });
        }
        Ok(Self { xs, ys })
    }
}

impl PolygonLayout for SoaPolygon<'_> {
    fn vertex_count(&self) -> usize {
        self.xs.len()
    }

    fn vertex(&self, i: usize) -> Float2 {
        Float2::new(self.xs[i], self.ys[i])
    }

    fn gather(&self, start: usize, count: usize) -> (Lane, Lane) {
        let n = count.min(LANES);
        let mut xs = [0.0; LANES];
        let mut ys = [0.0; LANES];
        xs[..n].copy_from_slice(&self.xs[start..start + n]);
        ys[..n].copy_from_slice(&self.ys[start..start + n]);
        (xs, ys)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Bounds
// ────────────────────────────────────────────────────────────────────────────

/// Axis-aligned bounds; `None` for an empty polygon.
#[must_use]
pub fn min_max_generic<P: PolygonLayout + ?Sized>(poly: &P) -> Option<BBox2> {
    let n = poly.vertex_count();
    if n == 0 {
        return None;
    }
    let first = poly.vertex(0);
    let (min, max) = (1..n).fold((first, first), |(lo, hi), i| {
        let p = poly.vertex(i);
        (lo.min(p), hi.max(p))
    });
    Some(BBox2::new(min, max))
}

#[must_use]
pub fn min_max_lanes<P: PolygonLayout + ?Sized>(poly: &P) -> Option<BBox2> {
    let n = poly.vertex_count();
    if n == 0 {
        return None;
    }
    let mut lo_x = [f32::INFINITY; LANES];
    let mut lo_y = [f32::INFINITY; LANES];
    let mut hi_x = [f32::NEG_INFINITY; LANES];
    let mut hi_y = [f32::NEG_INFINITY; LANES];

    for start in (0..n).step_by(LANES) {
        let count = (n - start).min(LANES);
        let (xs, ys) = poly.gather(start, count);
        let active = active_mask(count);
        for i in 0..LANES {
            if active[i] {
                lo_x[i] = lo_x[i].min(xs[i]);
                lo_y[i] = lo_y[i].min(ys[i]);
                hi_x[i] = hi_x[i].max(xs[i]);
                hi_y[i] = hi_y[i].max(ys[i]);
            }
        }
    }

    let reduce_min = |lane: Lane| lane.into_iter().fold(f32::INFINITY, f32::min);
    let reduce_max = |lane: Lane| lane.into_iter().fold(f32::NEG_INFINITY, f32::max);
    Some(BBox2::new(
        Float2::new(reduce_min(lo_x), reduce_min(lo_y)),
        Float2::new(reduce_max(hi_x), reduce_max(hi_y)),
    ))
}

#[must_use]
pub fn min_max<P: PolygonLayout + ?Sized>(path: ExecPath, poly: &P) -> Option<BBox2> {
    match path {
        ExecPath::Generic => min_max_generic(poly),
        ExecPath::Lanes => min_max_lanes(poly),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Containment
// ────────────────────────────────────────────────────────────────────────────

/// Whether edge `a -> b` crosses the horizontal ray from `p` toward +x.
#[inline]
fn crosses(ax: f32, ay: f32, bx: f32, by: f32, p: Float2) -> bool {
    if (ay > p.y) == (by > p.y) {
        return false;
    }
    let x = (bx - ax) * (p.y - ay) / (by - ay) + ax;
    p.x < x
}

/// Even-odd test. `bbox` is the polygon's bounds from [`min_max`]; points outside it
/// are rejected without visiting any edge.
#[must_use]
pub fn poly_inside_generic<P: PolygonLayout + ?Sized>(poly: &P, bbox: BBox2, p: Float2) -> bool {
    let n = poly.vertex_count();
    if n < 3 || !bbox.contains_point(p) {
        return false;
    }
    let mut inside = false;
    let mut prev = poly.vertex(n - 1);
    for i in 0..n {
        let cur = poly.vertex(i);
        if crosses(cur.x, cur.y, prev.x, prev.y, p) {
            inside = !inside;
        }
        prev = cur;
    }
    inside
}

#[must_use]
pub fn poly_inside_lanes<P: PolygonLayout + ?Sized>(poly: &P, bbox: BBox2, p: Float2) -> bool {
    let n = poly.vertex_count();
    if n < 3 || !bbox.contains_point(p) {
        return false;
    }
    let mut crossings = 0usize;
    for start in (0..n).step_by(LANES) {
        let count = (n - start).min(LANES);
        let (cx, cy) = poly.gather(start, count);
        // Previous vertex per lane: lane 0 takes the end of the last batch (or the ring's end).
        let mut px = [0.0; LANES];
        let mut py = [0.0; LANES];
        let before = poly.vertex(if start == 0 { n - 1 } else { start - 1 });
        px[0] = before.x;
        py[0] = before.y;
        px[1..].copy_from_slice(&cx[..LANES - 1]);
        py[1..].copy_from_slice(&cy[..LANES - 1]);

        let active = active_mask(count);
        for i in 0..LANES {
            if active[i] && crosses(cx[i], cy[i], px[i], py[i], p) {
                crossings += 1;
            }
        }
    }
    crossings % 2 == 1
}

#[must_use]
pub fn poly_inside<P: PolygonLayout + ?Sized>(path: ExecPath, poly: &P, bbox: BBox2, p: Float2) -> bool {
    match path {
        ExecPath::Generic => poly_inside_generic(poly, bbox, p),
        ExecPath::Lanes => poly_inside_lanes(poly, bbox, p),
    }
}
