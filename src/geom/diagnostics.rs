//! Refinement diagnostics.
//!
//! Collected while a [`MeshRefiner`](super::refiner::MeshRefiner) runs and returned with
//! the [`RefinedMesh`](super::refiner::RefinedMesh). Degenerate input is never an error;
//! it is skipped and counted here instead.
//!
//! ```ignore
//! let mesh = refiner.finish();
//! if !mesh.diagnostics.is_clean() {
//!     for warning in &mesh.diagnostics.warnings {
//!         log::warn!("{warning}");
//!     }
//! }
//! ```

use std::fmt;

use super::metrics::RefineTimingReport;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RefineDiagnostics {
    /// Output vertices across all splits.
    pub vertex_count: usize,

    /// Output triangles across all splits.
    pub triangle_count: usize,

    pub split_count: usize,

    pub submesh_count: usize,

    /// Extra output vertices created because corners of one source vertex
    /// disagree on normal, UV, color or tangent.
    pub seam_duplicate_count: usize,

    /// Source vertices emitted again because their faces landed in another split.
    pub split_duplicate_count: usize,

    /// Input vertices sharing a position with an earlier vertex.
    pub welded_vertex_count: usize,

    /// Faces with fewer than three corners, skipped during refinement.
    pub degenerate_face_count: usize,

    /// Faces with more corners than the split budget; each got a split of its own.
    pub oversize_face_count: usize,

    /// Faces where ear clipping failed and the fan was used instead.
    pub triangulation_fallback_count: usize,

    /// Edges with exactly one adjacent face.
    pub open_edge_count: usize,

    /// Edges with more than two adjacent faces.
    pub non_manifold_edge_count: usize,

    /// Stage timing; only set with the `refine_metrics` feature.
    pub timing: Option<RefineTimingReport>,

    pub warnings: Vec<String>,
}

impl RefineDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No open edges.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    /// Nothing was skipped, no face overflowed a split, and no warnings were raised.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.degenerate_face_count == 0
            && self.oversize_face_count == 0
            && self.triangulation_fallback_count == 0
            && self.warnings.is_empty()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Output vertices beyond one per source vertex.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.seam_duplicate_count + self.split_duplicate_count
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Sum counts and append warnings. `timing` is left as is.
    pub fn merge(&mut self, other: &RefineDiagnostics) {
        self.vertex_count += other.vertex_count;
        self.triangle_count += other.triangle_count;
        self.split_count += other.split_count;
        self.submesh_count += other.submesh_count;
        self.seam_duplicate_count += other.seam_duplicate_count;
        self.split_duplicate_count += other.split_duplicate_count;
        self.welded_vertex_count += other.welded_vertex_count;
        self.degenerate_face_count += other.degenerate_face_count;
        self.oversize_face_count += other.oversize_face_count;
        self.triangulation_fallback_count += other.triangulation_fallback_count;
        self.open_edge_count += other.open_edge_count;
        self.non_manifold_edge_count += other.non_manifold_edge_count;
        self.warnings.extend(other.warnings.iter().cloned());
    }

    /// One-line form for logging: `"V:{vertices} T:{triangles} S:{splits} [issues...]"`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "V:{} T:{} S:{}",
            self.vertex_count, self.triangle_count, self.split_count
        )];
        if self.submesh_count > 0 {
            parts.push(format!("submeshes:{}", self.submesh_count));
        }
        if self.seam_duplicate_count > 0 {
            parts.push(format!("seams:{}", self.seam_duplicate_count));
        }
        if self.split_duplicate_count > 0 {
            parts.push(format!("split-dup:{}", self.split_duplicate_count));
        }
        if self.degenerate_face_count > 0 {
            parts.push(format!("degenerate:{}", self.degenerate_face_count));
        }
        if self.oversize_face_count > 0 {
            parts.push(format!("oversize:{}", self.oversize_face_count));
        }
        if self.triangulation_fallback_count > 0 {
            parts.push(format!("fan-fallback:{}", self.triangulation_fallback_count));
        }
        if self.open_edge_count > 0 {
            parts.push(format!("open:{}", self.open_edge_count));
        }
        if self.non_manifold_edge_count > 0 {
            parts.push(format!("non-manifold:{}", self.non_manifold_edge_count));
        }
        parts.join(" ")
    }
}

impl fmt::Display for RefineDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Refine Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        writeln!(f, "  Splits: {}", self.split_count)?;
        writeln!(f, "  Submeshes: {}", self.submesh_count)?;

        if self.duplicate_count() > 0 {
            writeln!(f, "  Duplicated vertices:")?;
            if self.seam_duplicate_count > 0 {
                writeln!(f, "    - Attribute seams: {}", self.seam_duplicate_count)?;
            }
            if self.split_duplicate_count > 0 {
                writeln!(f, "    - Split borders: {}", self.split_duplicate_count)?;
            }
        }

        if self.degenerate_face_count > 0 || self.oversize_face_count > 0 {
            writeln!(f, "  Skipped or isolated faces:")?;
            if self.degenerate_face_count > 0 {
                writeln!(f, "    - Degenerate: {}", self.degenerate_face_count)?;
            }
            if self.oversize_face_count > 0 {
                writeln!(f, "    - Oversize: {}", self.oversize_face_count)?;
            }
        }

        if self.open_edge_count > 0 || self.non_manifold_edge_count > 0 {
            writeln!(f, "  Topology:")?;
            writeln!(f, "    - Open edges: {}", self.open_edge_count)?;
            writeln!(f, "    - Non-manifold edges: {}", self.non_manifold_edge_count)?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        if let Some(timing) = &self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }

        writeln!(f, "  Status: {}", if self.is_clean() { "CLEAN" } else { "ISSUES DETECTED" })
    }
}
