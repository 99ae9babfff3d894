//! Face/index topology descriptors shared by the connectivity builder and the refiner.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: usize,
        vertex_count: usize,
    },
    #[error("face stride must be at least 1")]
    ZeroStride,
    #[error("index count {index_count} is not a multiple of face stride {stride}")]
    StrideMismatch { index_count: usize, stride: usize },
    #[error("face counts sum to {corner_count} but {index_count} indices were supplied")]
    CountMismatch {
        corner_count: usize,
        index_count: usize,
    },
    #[error("counts and offsets differ in length: {counts} counts, {offsets} offsets")]
    OffsetCountMismatch { counts: usize, offsets: usize },
    #[error("face {face} spans [{start}, {end}) outside {index_count} indices")]
    FaceOutOfRange {
        face: usize,
        start: usize,
        end: usize,
        index_count: usize,
    },
}

/// Primitive kind of a submesh index range, as consumed by the export side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topology {
    Points,
    Lines,
    Triangles,
    Quads,
}

impl Topology {
    /// Indices per primitive.
    #[must_use]
    pub const fn corner_count(self) -> usize {
        match self {
            Self::Points => 1,
            Self::Lines => 2,
            Self::Triangles => 3,
            Self::Quads => 4,
        }
    }
}

#[derive(Debug, Clone)]
enum FaceLayout<'a> {
    Uniform {
        stride: usize,
    },
    Variable {
        counts: Cow<'a, [u32]>,
        offsets: Cow<'a, [u32]>,
    },
}

/// Borrowed view of a polygon index buffer.
///
/// Faces either share one corner count (`uniform`) or carry explicit per-face counts
/// and offsets (`variable`). Construction checks the layout; index bounds against a
/// vertex buffer are checked separately by [`FaceSet::validate`].
#[derive(Debug, Clone)]
pub struct FaceSet<'a> {
    indices: &'a [u32],
    layout: FaceLayout<'a>,
}

impl<'a> FaceSet<'a> {
    /// Every face has `stride` corners, e.g. 3 for a triangle list.
    pub fn uniform(indices: &'a [u32], stride: usize) -> Result<Self, TopologyError> {
        if stride == 0 {
            return Err(TopologyError::ZeroStride);
        }
        if indices.len() % stride != 0 {
            return Err(TopologyError::StrideMismatch {
                index_count: indices.len(),
                stride,
            });
        }
        Ok(Self {
            indices,
            layout: FaceLayout::Uniform { stride },
        })
    }

    /// Explicit per-face counts and start offsets into `indices`.
    pub fn variable(
        indices: &'a [u32],
        counts: &'a [u32],
        offsets: &'a [u32],
    ) -> Result<Self, TopologyError> {
        if counts.len() != offsets.len() {
            return Err(TopologyError::OffsetCountMismatch {
                counts: counts.len(),
                offsets: offsets.len(),
            });
        }
        Self::checked_variable(indices, Cow::Borrowed(counts), Cow::Borrowed(offsets))
    }

    /// Per-face counts with offsets implied by a running sum.
    pub fn from_counts(indices: &'a [u32], counts: &'a [u32]) -> Result<Self, TopologyError> {
        let mut offsets = Vec::with_capacity(counts.len());
        let mut running = 0u32;
        for &count in counts {
            offsets.push(running);
            running = running.saturating_add(count);
        }
        Self::checked_variable(indices, Cow::Borrowed(counts), Cow::Owned(offsets))
    }

    /// Layout already checked by one of the public constructors.
    pub(crate) fn from_validated(
        indices: &'a [u32],
        counts: &'a [u32],
        offsets: &'a [u32],
    ) -> Self {
        Self {
            indices,
            layout: FaceLayout::Variable {
                counts: Cow::Borrowed(counts),
                offsets: Cow::Borrowed(offsets),
            },
        }
    }

    /// Per-face start offsets, materialized.
    #[must_use]
    pub fn offsets(&self) -> Vec<u32> {
        (0..self.face_count()).map(|f| self.face_offset(f) as u32).collect()
    }

    /// Per-face corner counts, materialized.
    #[must_use]
    pub fn counts(&self) -> Vec<u32> {
        (0..self.face_count()).map(|f| self.face_len(f) as u32).collect()
    }

    fn checked_variable(
        indices: &'a [u32],
        counts: Cow<'a, [u32]>,
        offsets: Cow<'a, [u32]>,
    ) -> Result<Self, TopologyError> {
        let index_count = indices.len();
        let corner_count: usize = counts.iter().map(|c| *c as usize).sum();
        if corner_count != index_count {
            return Err(TopologyError::CountMismatch {
                corner_count,
                index_count,
            });
        }
        for (face, (&count, &offset)) in counts.iter().zip(offsets.iter()).enumerate() {
            let start = offset as usize;
            let end = start + count as usize;
            if end > index_count {
                return Err(TopologyError::FaceOutOfRange {
                    face,
                    start,
                    end,
                    index_count,
                });
            }
        }
        Ok(Self {
            indices,
            layout: FaceLayout::Variable { counts, offsets },
        })
    }

    /// Check every index against `vertex_count`.
    pub fn validate(&self, vertex_count: usize) -> Result<(), TopologyError> {
        match self
            .indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= vertex_count)
        {
            Some((position, &index)) => Err(TopologyError::IndexOutOfRange {
                position,
                index: index as usize,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn indices(&self) -> &'a [u32] {
        self.indices
    }

    /// Uniform corner count, if the layout has one.
    #[must_use]
    pub fn stride(&self) -> Option<usize> {
        match self.layout {
            FaceLayout::Uniform { stride } => Some(stride),
            FaceLayout::Variable { .. } => None,
        }
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        match &self.layout {
            FaceLayout::Uniform { stride } => self.indices.len() / stride,
            FaceLayout::Variable { counts, .. } => counts.len(),
        }
    }

    /// Position of the face's first corner in the flattened index stream.
    #[must_use]
    pub fn face_offset(&self, face: usize) -> usize {
        match &self.layout {
            FaceLayout::Uniform { stride } => face * stride,
            FaceLayout::Variable { offsets, .. } => offsets[face] as usize,
        }
    }

    #[must_use]
    pub fn face_len(&self, face: usize) -> usize {
        match &self.layout {
            FaceLayout::Uniform { stride } => *stride,
            FaceLayout::Variable { counts, .. } => counts[face] as usize,
        }
    }

    #[must_use]
    pub fn face(&self, face: usize) -> &'a [u32] {
        let start = self.face_offset(face);
        &self.indices[start..start + self.face_len(face)]
    }

    pub fn faces(&self) -> impl Iterator<Item = &'a [u32]> + '_ {
        (0..self.face_count()).map(move |f| self.face(f))
    }

    /// Triangles produced by triangulating every face: `max(n - 2, 0)` each.
    #[must_use]
    pub fn triangulated_count(&self) -> usize {
        (0..self.face_count())
            .map(|f| self.face_len(f).saturating_sub(2))
            .sum()
    }
}
