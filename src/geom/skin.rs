//! Per-vertex skin bindings carried through refinement.

use serde::{Deserialize, Serialize};

/// Up to four bone influences. Unused slots have zero weight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Weights4 {
    pub indices: [u32; 4],
    pub weights: [f32; 4],
}

impl Weights4 {
    #[must_use]
    pub const fn new(indices: [u32; 4], weights: [f32; 4]) -> Self {
        Self { indices, weights }
    }

    /// Full weight on a single bone.
    #[must_use]
    pub const fn single(bone: u32) -> Self {
        Self::new([bone, 0, 0, 0], [1.0, 0.0, 0.0, 0.0])
    }

    #[must_use]
    pub fn total(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Rescale so the weights sum to one. An all-zero binding is left untouched.
    #[must_use]
    pub fn normalize(self) -> Self {
        let total = self.total();
        if !total.is_finite() || total <= 0.0 {
            return self;
        }
        Self {
            indices: self.indices,
            weights: self.weights.map(|w| w / total),
        }
    }

    /// Influences with non-zero weight, heaviest first.
    pub fn influences(&self) -> impl Iterator<Item = (u32, f32)> {
        let mut pairs: Vec<(u32, f32)> = self
            .indices
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
            .filter(|(_, w)| *w > 0.0)
            .collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs.into_iter()
    }
}
