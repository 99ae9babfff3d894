//! Bulk point/vector transforms with a scalar path and a lane-batched path.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::lanes::{ExecPath, Float3x8, LANES};
use super::{Float3, Float4x4};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("source has {src} elements but destination has {dst}")]
    LengthMismatch { src: usize, dst: usize },
}

fn check_lengths(src: &[Float3], dst: &[Float3]) -> Result<(), TransformError> {
    if src.len() == dst.len() {
        Ok(())
    } else {
        Err(TransformError::LengthMismatch {
            src: src.len(),
            dst: dst.len(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generic
// ────────────────────────────────────────────────────────────────────────────

/// `dst[i] = m * (src[i], 1)`.
pub fn mul_points_generic(
    m: &Float4x4,
    src: &[Float3],
    dst: &mut [Float3],
) -> Result<(), TransformError> {
    check_lengths(src, dst)?;
    for (d, s) in dst.iter_mut().zip(src) {
        *d = m.apply_point(*s);
    }
    Ok(())
}

/// `dst[i] = m * (src[i], 0)`; translation is ignored.
pub fn mul_vectors_generic(
    m: &Float4x4,
    src: &[Float3],
    dst: &mut [Float3],
) -> Result<(), TransformError> {
    check_lengths(src, dst)?;
    for (d, s) in dst.iter_mut().zip(src) {
        *d = m.apply_vec(*s);
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Lanes
// ────────────────────────────────────────────────────────────────────────────

#[inline]
fn transform_batch(m: &Float4x4, v: &Float3x8, w: f32) -> Float3x8 {
    let m = &m.m;
    let mut r = Float3x8::zeros();
    for i in 0..LANES {
        let (x, y, z) = (v.xs[i], v.ys[i], v.zs[i]);
        r.xs[i] = m[0][0] * x + m[0][1] * y + m[0][2] * z + m[0][3] * w;
        r.ys[i] = m[1][0] * x + m[1][1] * y + m[1][2] * z + m[1][3] * w;
        r.zs[i] = m[2][0] * x + m[2][1] * y + m[2][2] * z + m[2][3] * w;
    }
    r
}

fn transform_chunk(m: &Float4x4, src: &[Float3], dst: &mut [Float3], w: f32) {
    let batch = Float3x8::gather(src.len(), |i| src[i]);
    transform_batch(m, &batch, w).scatter(dst);
}

cfg_if::cfg_if! {
    if #[cfg(feature = "parallel")] {
        fn transform_lanes(m: &Float4x4, src: &[Float3], dst: &mut [Float3], w: f32) {
            dst.par_chunks_mut(LANES)
                .zip(src.par_chunks(LANES))
                .for_each(|(d, s)| transform_chunk(m, s, d, w));
        }
    } else {
        fn transform_lanes(m: &Float4x4, src: &[Float3], dst: &mut [Float3], w: f32) {
            for (d, s) in dst.chunks_mut(LANES).zip(src.chunks(LANES)) {
                transform_chunk(m, s, d, w);
            }
        }
    }
}

/// Lane-batched [`mul_points_generic`].
pub fn mul_points_lanes(
    m: &Float4x4,
    src: &[Float3],
    dst: &mut [Float3],
) -> Result<(), TransformError> {
    check_lengths(src, dst)?;
    transform_lanes(m, src, dst, 1.0);
    Ok(())
}

/// Lane-batched [`mul_vectors_generic`].
pub fn mul_vectors_lanes(
    m: &Float4x4,
    src: &[Float3],
    dst: &mut [Float3],
) -> Result<(), TransformError> {
    check_lengths(src, dst)?;
    transform_lanes(m, src, dst, 0.0);
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatch
// ────────────────────────────────────────────────────────────────────────────

pub fn mul_points(
    path: ExecPath,
    m: &Float4x4,
    src: &[Float3],
    dst: &mut [Float3],
) -> Result<(), TransformError> {
    match path {
        ExecPath::Generic => mul_points_generic(m, src, dst),
        ExecPath::Lanes => mul_points_lanes(m, src, dst),
    }
}

pub fn mul_vectors(
    path: ExecPath,
    m: &Float4x4,
    src: &[Float3],
    dst: &mut [Float3],
) -> Result<(), TransformError> {
    match path {
        ExecPath::Generic => mul_vectors_generic(m, src, dst),
        ExecPath::Lanes => mul_vectors_lanes(m, src, dst),
    }
}
