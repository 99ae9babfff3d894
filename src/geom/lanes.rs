//! Lane-batched structure-of-arrays primitives for the data-parallel paths.
//!
//! [`Float3x8`] stores 8 [`Float3`] values as three component arrays so that the
//! per-lane loops below compile down to packed SIMD on targets that have it:
//!
//! ```text
//! xs: [x0, x1, x2, x3, x4, x5, x6, x7]
//! ys: [y0, y1, y2, y3, y4, y5, y6, y7]
//! zs: [z0, z1, z2, z3, z4, z5, z6, z7]
//! ```
//!
//! Every lane operation evaluates the same expression, in the same order, as the
//! matching scalar method on [`Float3`]. The lane kernels therefore reach the same
//! accept/reject decisions as the generic kernels for identical input.

use super::Float3;

/// Number of lanes processed per batch.
pub const LANES: usize = 8;

/// One `f32` per lane.
pub type Lane = [f32; LANES];

/// Lane mask; `true` marks an active lane.
pub type Mask = [bool; LANES];

/// Which kernel family a bulk operation runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum ExecPath {
    /// Portable one-element-at-a-time loop.
    #[default]
    Generic,
    /// Structure-of-arrays batches of [`LANES`] elements.
    Lanes,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C, align(32))]
pub struct Float3x8 {
    pub xs: Lane,
    pub ys: Lane,
    pub zs: Lane,
}

impl Default for Float3x8 {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Float3x8 {
    #[must_use]
    #[inline]
    pub const fn zeros() -> Self {
        Self {
            xs: [0.0; LANES],
            ys: [0.0; LANES],
            zs: [0.0; LANES],
        }
    }

    /// Broadcast a single vector to all lanes.
    #[must_use]
    #[inline]
    pub const fn splat(v: Float3) -> Self {
        Self {
            xs: [v.x; LANES],
            ys: [v.y; LANES],
            zs: [v.z; LANES],
        }
    }

    /// Gather `count` vectors produced by `fetch`, zero-padding the remaining lanes.
    #[must_use]
    #[inline]
    pub fn gather(count: usize, mut fetch: impl FnMut(usize) -> Float3) -> Self {
        debug_assert!(count <= LANES);
        let mut result = Self::zeros();
        for lane in 0..count.min(LANES) {
            let v = fetch(lane);
            result.xs[lane] = v.x;
            result.ys[lane] = v.y;
            result.zs[lane] = v.z;
        }
        result
    }

    /// Load from component slices, zero-padding when fewer than 8 elements remain.
    #[must_use]
    #[inline]
    pub fn from_soa(xs: &[f32], ys: &[f32], zs: &[f32]) -> Self {
        let mut result = Self::zeros();
        let n = xs.len().min(ys.len()).min(zs.len()).min(LANES);
        result.xs[..n].copy_from_slice(&xs[..n]);
        result.ys[..n].copy_from_slice(&ys[..n]);
        result.zs[..n].copy_from_slice(&zs[..n]);
        result
    }

    #[must_use]
    #[inline]
    pub fn get(&self, lane: usize) -> Float3 {
        debug_assert!(lane < LANES);
        Float3::new(self.xs[lane], self.ys[lane], self.zs[lane])
    }

    /// Write the first `out.len()` lanes back as interleaved vectors.
    #[inline]
    pub fn scatter(&self, out: &mut [Float3]) {
        for (lane, dst) in out.iter_mut().take(LANES).enumerate() {
            *dst = self.get(lane);
        }
    }

    #[must_use]
    #[inline]
    pub fn sub(&self, rhs: &Self) -> Self {
        let mut r = Self::zeros();
        for i in 0..LANES {
            r.xs[i] = self.xs[i] - rhs.xs[i];
            r.ys[i] = self.ys[i] - rhs.ys[i];
            r.zs[i] = self.zs[i] - rhs.zs[i];
        }
        r
    }

    #[must_use]
    #[inline]
    pub fn dot(&self, rhs: &Self) -> Lane {
        let mut r = [0.0; LANES];
        for i in 0..LANES {
            r[i] = self.xs[i] * rhs.xs[i] + self.ys[i] * rhs.ys[i] + self.zs[i] * rhs.zs[i];
        }
        r
    }

    #[must_use]
    #[inline]
    pub fn cross(&self, rhs: &Self) -> Self {
        let mut r = Self::zeros();
        for i in 0..LANES {
            r.xs[i] = self.ys[i] * rhs.zs[i] - self.zs[i] * rhs.ys[i];
            r.ys[i] = self.zs[i] * rhs.xs[i] - self.xs[i] * rhs.zs[i];
            r.zs[i] = self.xs[i] * rhs.ys[i] - self.ys[i] * rhs.xs[i];
        }
        r
    }
}

/// Mask with the first `count` lanes active.
#[must_use]
#[inline]
pub fn active_mask(count: usize) -> Mask {
    let mut mask = [false; LANES];
    for (lane, m) in mask.iter_mut().enumerate() {
        *m = lane < count;
    }
    mask
}
