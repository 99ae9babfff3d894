//! Polygon soup → triangulated, split-bounded, material-grouped vertex buffers.
//!
//! [`MeshRefiner`] is a single-pass state machine:
//!
//! 1. [`prepare`](MeshRefiner::prepare) validates the topology and builds connectivity.
//! 2. `set_*` attach optional per-vertex or per-corner attribute streams.
//! 3. [`gen_normals_with_smooth_angle`](MeshRefiner::gen_normals_with_smooth_angle) /
//!    [`gen_normals`](MeshRefiner::gen_normals) and [`gen_tangents`](MeshRefiner::gen_tangents)
//!    synthesize missing attributes.
//! 4. [`refine`](MeshRefiner::refine) fills in missing normals and tangents, deduplicates
//!    corners into output vertices, buckets faces into splits of at most `split_unit`
//!    vertices and triangulates them.
//! 5. [`gen_submesh`](MeshRefiner::gen_submesh) groups each split's triangles by material.
//!
//! [`finish`](MeshRefiner::finish) hands back the [`RefinedMesh`].

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::connection::ConnectionData;
use super::diagnostics::RefineDiagnostics;
use super::indexed::IndexedArray;
use super::metrics::{RefineMetrics, TimingBucket};
use super::normals::{corner_normals, vertex_normals};
use super::skin::Weights4;
use super::tangents::corner_tangents;
use super::topology::{FaceSet, Topology, TopologyError};
use super::triangulation::{TriangulationPolicy, triangulate_polygon};
use super::{Float2, Float3, Float4, Tolerance};

// ────────────────────────────────────────────────────────────────────────────
// Settings & errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineSettings {
    /// Maximum vertices per split.
    pub split_unit: usize,
    pub triangulation: TriangulationPolicy,
    /// Positions closer than this share connectivity for smoothing and edge queries.
    pub weld_tolerance: Tolerance,
    /// Share output vertices between corners with identical attributes. When `false`
    /// every corner becomes its own vertex.
    pub optimize: bool,
}

impl Default for RefineSettings {
    fn default() -> Self {
        Self {
            split_unit: 65_000,
            triangulation: TriangulationPolicy::Fan,
            weld_tolerance: Tolerance::WELD,
            optimize: true,
        }
    }
}

impl RefineSettings {
    #[must_use]
    pub fn with_split_unit(mut self, split_unit: usize) -> Self {
        self.split_unit = split_unit;
        self
    }

    #[must_use]
    pub fn with_triangulation(mut self, policy: TriangulationPolicy) -> Self {
        self.triangulation = policy;
        self
    }
}

/// Where a refiner is in its stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Prepared,
    Refined,
    Submeshed,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RefineError {
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(
        "{attribute} stream has {len} elements; expected {vertex_count} per vertex or {corner_count} per corner"
    )]
    AttributeLength {
        attribute: &'static str,
        len: usize,
        vertex_count: usize,
        corner_count: usize,
    },
    #[error("skin weights have {len} elements for {vertex_count} vertices")]
    WeightLength { len: usize, vertex_count: usize },
    #[error("tangent generation requires normals")]
    MissingNormals,
    #[error("tangent generation requires UVs")]
    MissingUv,
    #[error("{operation} is not allowed in stage {stage:?}")]
    StageOrder {
        operation: &'static str,
        stage: Stage,
    },
    #[error("{len} material ids supplied for {face_count} faces")]
    MaterialCount { len: usize, face_count: usize },
    #[error("split unit must be at least 1")]
    ZeroSplitUnit,
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

/// Contiguous block of output vertices and triangles addressed with split-local indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Split {
    pub vertex_offset: usize,
    pub vertex_count: usize,
    pub index_offset: usize,
    pub index_count: usize,
    pub face_count: usize,
    pub submesh_offset: usize,
    pub submesh_count: usize,
}

impl Split {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.index_count / 3
    }
}

/// Triangles of one split sharing a material id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submesh {
    pub topology: Topology,
    pub material_id: i32,
    pub split: usize,
    /// Range into [`RefinedMesh::submesh_indices`]; values are split-local.
    pub index_offset: usize,
    pub index_count: usize,
}

/// Refined vertex streams. Attribute vectors are empty when the stream was never set.
#[derive(Debug, Clone, Default)]
pub struct RefinedMesh {
    pub points: Vec<Float3>,
    pub normals: Vec<Float3>,
    pub tangents: Vec<Float4>,
    pub uv: Vec<Float2>,
    pub colors: Vec<Float4>,
    pub weights: Vec<Weights4>,
    /// Source vertex of every output vertex.
    pub new_to_old: Vec<u32>,
    /// Triangles in split order, split-local.
    pub indices: Vec<u32>,
    pub submesh_indices: Vec<u32>,
    pub splits: Vec<Split>,
    pub submeshes: Vec<Submesh>,
    pub diagnostics: RefineDiagnostics,
}

/// Borrowed per-split slices of a [`RefinedMesh`].
#[derive(Debug, Clone, Copy)]
pub struct SplitView<'a> {
    pub points: &'a [Float3],
    pub normals: &'a [Float3],
    pub tangents: &'a [Float4],
    pub uv: &'a [Float2],
    pub colors: &'a [Float4],
    pub weights: &'a [Weights4],
    pub new_to_old: &'a [u32],
    pub indices: &'a [u32],
    pub submeshes: &'a [Submesh],
    submesh_indices: &'a [u32],
}

impl<'a> SplitView<'a> {
    /// Split-local triangle indices of `submesh`.
    #[must_use]
    pub fn submesh_indices(&self, submesh: &Submesh) -> &'a [u32] {
        &self.submesh_indices[submesh.index_offset..submesh.index_offset + submesh.index_count]
    }
}

fn window<T>(values: &[T], offset: usize, count: usize) -> &[T] {
    values.get(offset..offset + count).unwrap_or(&[])
}

impl RefinedMesh {
    #[must_use]
    pub fn split_count(&self) -> usize {
        self.splits.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn split_view(&self, split: usize) -> Option<SplitView<'_>> {
        let s = self.splits.get(split)?;
        let (vo, vc) = (s.vertex_offset, s.vertex_count);
        Some(SplitView {
            points: window(&self.points, vo, vc),
            normals: window(&self.normals, vo, vc),
            tangents: window(&self.tangents, vo, vc),
            uv: window(&self.uv, vo, vc),
            colors: window(&self.colors, vo, vc),
            weights: window(&self.weights, vo, vc),
            new_to_old: window(&self.new_to_old, vo, vc),
            indices: window(&self.indices, s.index_offset, s.index_count),
            submeshes: window(&self.submeshes, s.submesh_offset, s.submesh_count),
            submesh_indices: &self.submesh_indices,
        })
    }

    pub fn split_views(&self) -> impl Iterator<Item = SplitView<'_>> + '_ {
        (0..self.splits.len()).filter_map(|i| self.split_view(i))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Refiner
// ────────────────────────────────────────────────────────────────────────────

/// Identity of an output vertex inside a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CornerKey {
    vertex: u32,
    normal: [u32; 3],
    uv: [u32; 2],
    color: [u32; 4],
    tangent: [u32; 4],
    /// Corner position when vertex sharing is disabled, else `u32::MAX`.
    corner: u32,
}

#[derive(Debug)]
pub struct MeshRefiner {
    settings: RefineSettings,
    points: Vec<Float3>,
    counts: Vec<u32>,
    offsets: Vec<u32>,
    indices: Vec<u32>,
    normals: Option<Vec<Float3>>,
    tangents: Option<Vec<Float4>>,
    uv: Option<Vec<Float2>>,
    colors: Option<Vec<Float4>>,
    weights: Option<Vec<Weights4>>,
    conn: ConnectionData,
    stage: Stage,
    out: RefinedMesh,
    /// Source face of every output triangle.
    triangle_faces: Vec<u32>,
    metrics: RefineMetrics,
}

impl MeshRefiner {
    /// Validate the polygon soup and build the working copy.
    ///
    /// `counts[f]` is the corner count of face `f`; faces are packed back to back in
    /// `indices`.
    pub fn prepare(
        counts: &[u32],
        indices: &[u32],
        points: &[Float3],
        settings: RefineSettings,
    ) -> Result<Self, RefineError> {
        if settings.split_unit == 0 {
            return Err(RefineError::ZeroSplitUnit);
        }
        let mut metrics = RefineMetrics::default();
        metrics.begin();

        let (offsets, conn) = metrics.time(TimingBucket::Prepare, || {
            let faces = FaceSet::from_counts(indices, counts)?;
            faces.validate(points.len())?;
            let conn = ConnectionData::build_with_tolerance(&faces, points, settings.weld_tolerance)?;
            Ok::<_, RefineError>((faces.offsets(), conn))
        })?;

        let mut diagnostics = RefineDiagnostics::new();
        diagnostics.welded_vertex_count = conn.welded_vertex_count();
        let (open, non_manifold) = conn.edge_topology();
        diagnostics.open_edge_count = open;
        diagnostics.non_manifold_edge_count = non_manifold;

        log::debug!(
            "refiner: prepared {} faces, {} corners, {} vertices",
            counts.len(),
            indices.len(),
            points.len()
        );

        Ok(Self {
            settings,
            points: points.to_vec(),
            counts: counts.to_vec(),
            offsets,
            indices: indices.to_vec(),
            normals: None,
            tangents: None,
            uv: None,
            colors: None,
            weights: None,
            conn,
            stage: Stage::Prepared,
            out: RefinedMesh {
                diagnostics,
                ..RefinedMesh::default()
            },
            triangle_faces: Vec::new(),
            metrics,
        })
    }

    /// [`prepare`](Self::prepare) for faces that all have `stride` corners.
    pub fn prepare_uniform(
        indices: &[u32],
        stride: usize,
        points: &[Float3],
        settings: RefineSettings,
    ) -> Result<Self, RefineError> {
        let faces = FaceSet::uniform(indices, stride)?;
        Self::prepare(&faces.counts(), indices, points, settings)
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn settings(&self) -> &RefineSettings {
        &self.settings
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn connection(&self) -> &ConnectionData {
        &self.conn
    }

    #[must_use]
    pub fn faces(&self) -> FaceSet<'_> {
        FaceSet::from_validated(&self.indices, &self.counts, &self.offsets)
    }

    /// Per-corner normals, once set or generated.
    #[must_use]
    pub fn normals(&self) -> Option<&[Float3]> {
        self.normals.as_deref()
    }

    /// Per-corner tangents, once set or generated.
    #[must_use]
    pub fn tangents(&self) -> Option<&[Float4]> {
        self.tangents.as_deref()
    }

    fn require_stage(&self, operation: &'static str, allowed: &[Stage]) -> Result<(), RefineError> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(RefineError::StageOrder {
                operation,
                stage: self.stage,
            })
        }
    }

    /// Expand a per-vertex or per-corner stream to per-corner.
    fn bind<T: Clone>(&self, attribute: &'static str, values: &[T]) -> Result<Vec<T>, RefineError> {
        self.require_stage(attribute, &[Stage::Prepared])?;
        let vertex_count = self.points.len();
        let corner_count = self.indices.len();
        if values.len() == corner_count {
            Ok(values.to_vec())
        } else if values.len() == vertex_count {
            Ok(IndexedArray::new(&self.indices, values)?.to_vec())
        } else {
            Err(RefineError::AttributeLength {
                attribute,
                len: values.len(),
                vertex_count,
                corner_count,
            })
        }
    }

    pub fn set_uv(&mut self, uv: &[Float2]) -> Result<(), RefineError> {
        self.uv = Some(self.bind("uv", uv)?);
        Ok(())
    }

    pub fn set_colors(&mut self, colors: &[Float4]) -> Result<(), RefineError> {
        self.colors = Some(self.bind("colors", colors)?);
        Ok(())
    }

    pub fn set_normals(&mut self, normals: &[Float3]) -> Result<(), RefineError> {
        self.normals = Some(self.bind("normals", normals)?);
        Ok(())
    }

    pub fn set_tangents(&mut self, tangents: &[Float4]) -> Result<(), RefineError> {
        self.tangents = Some(self.bind("tangents", tangents)?);
        Ok(())
    }

    /// Skin bindings, one per source vertex.
    pub fn set_weights(&mut self, weights: &[Weights4]) -> Result<(), RefineError> {
        self.require_stage("weights", &[Stage::Prepared])?;
        if weights.len() != self.points.len() {
            return Err(RefineError::WeightLength {
                len: weights.len(),
                vertex_count: self.points.len(),
            });
        }
        self.weights = Some(weights.to_vec());
        Ok(())
    }

    /// Per-corner normals smoothed across faces within `angle_deg` of each other.
    pub fn gen_normals_with_smooth_angle(&mut self, angle_deg: f32, flip: bool) -> Result<(), RefineError> {
        self.require_stage("gen_normals_with_smooth_angle", &[Stage::Prepared])?;
        let faces = FaceSet::from_validated(&self.indices, &self.counts, &self.offsets);
        let normals = self.metrics.time(TimingBucket::Normals, || {
            corner_normals(&self.points, &faces, &self.conn, angle_deg, flip)
        });
        log::debug!("refiner: generated {} corner normals at {angle_deg} deg", normals.len());
        self.normals = Some(normals);
        Ok(())
    }

    /// Fully smoothed normals, one per welded position.
    pub fn gen_normals(&mut self, flip: bool) -> Result<(), RefineError> {
        self.require_stage("gen_normals", &[Stage::Prepared])?;
        let faces = FaceSet::from_validated(&self.indices, &self.counts, &self.offsets);
        let per_vertex = self.metrics.time(TimingBucket::Normals, || {
            vertex_normals(&self.points, &faces, &self.conn, flip)
        });
        self.normals = Some(self.indices.iter().map(|&v| per_vertex[v as usize]).collect());
        Ok(())
    }

    pub fn gen_tangents(&mut self) -> Result<(), RefineError> {
        self.require_stage("gen_tangents", &[Stage::Prepared])?;
        let normals = self.normals.as_deref().ok_or(RefineError::MissingNormals)?;
        let uv = self.uv.as_deref().ok_or(RefineError::MissingUv)?;
        let faces = FaceSet::from_validated(&self.indices, &self.counts, &self.offsets);
        let tangents = self.metrics.time(TimingBucket::Tangents, || {
            corner_tangents(&self.points, &faces, &self.conn, normals, uv)
        });
        self.tangents = Some(tangents);
        Ok(())
    }

    fn corner_key(&self, corner: usize) -> CornerKey {
        CornerKey {
            vertex: self.indices[corner],
            normal: self.normals.as_ref().map_or([0; 3], |n| n[corner].bits()),
            uv: self.uv.as_ref().map_or([0; 2], |n| n[corner].bits()),
            color: self.colors.as_ref().map_or([0; 4], |n| n[corner].bits()),
            tangent: self.tangents.as_ref().map_or([0; 4], |n| n[corner].bits()),
            corner: if self.settings.optimize { u32::MAX } else { corner as u32 },
        }
    }

    /// Deduplicate corners, bucket faces into splits and triangulate.
    ///
    /// `flip` reverses the winding of every output triangle. Missing normals are generated
    /// fully smoothed with the same `flip`, and missing tangents are generated when UVs are set.
    pub fn refine(&mut self, flip: bool) -> Result<(), RefineError> {
        self.require_stage("refine", &[Stage::Prepared])?;
        if self.normals.is_none() {
            self.gen_normals(flip)?;
        }
        if self.tangents.is_none() && self.uv.is_some() {
            self.gen_tangents()?;
        }
        let mut metrics = std::mem::take(&mut self.metrics);
        let builder = metrics.time(TimingBucket::Refine, || self.refine_faces(flip));
        self.metrics = metrics;

        let diag = &mut self.out.diagnostics;
        diag.vertex_count = self.out.new_to_old.len();
        diag.triangle_count = self.out.indices.len() / 3;
        diag.split_count = self.out.splits.len();
        diag.seam_duplicate_count = builder.seam_duplicates;
        diag.split_duplicate_count = builder.split_duplicates;
        log::debug!("refiner: {}", diag.summary());

        self.stage = Stage::Refined;
        Ok(())
    }

    fn refine_faces(&mut self, flip: bool) -> SplitBuilder {
        let split_unit = self.settings.split_unit;
        let mut builder = SplitBuilder::new(self.points.len(), split_unit);
        let mut corner_positions = Vec::new();
        let mut local = Vec::new();
        let mut tris = Vec::new();
        let mut distinct = HashSet::new();

        for f in 0..self.counts.len() {
            let n = self.counts[f] as usize;
            let offset = self.offsets[f] as usize;
            if n < 3 {
                self.out.diagnostics.degenerate_face_count += 1;
                continue;
            }

            let keys: Vec<CornerKey> = (offset..offset + n).map(|c| self.corner_key(c)).collect();
            distinct.clear();
            distinct.extend(keys.iter().copied());
            let oversize = distinct.len() > split_unit;
            if oversize {
                self.out.diagnostics.oversize_face_count += 1;
                let warning = format!(
                    "face {f} needs {} vertices, more than the split unit {split_unit}",
                    distinct.len()
                );
                log::warn!("refiner: {warning}");
                self.out.diagnostics.add_warning(warning);
                builder.close(&mut self.out);
            } else if builder.current_vertex_count() + builder.fresh_count(&distinct) > split_unit {
                builder.close(&mut self.out);
            }

            local.clear();
            for (k, key) in keys.iter().enumerate() {
                local.push(builder.emit(*key, offset + k, self));
            }

            corner_positions.clear();
            corner_positions
                .extend((offset..offset + n).map(|c| self.points[self.indices[c] as usize]));
            tris.clear();
            if !triangulate_polygon(self.settings.triangulation, &corner_positions, &mut tris) {
                self.out.diagnostics.triangulation_fallback_count += 1;
            }
            for t in &tris {
                let [a, b, c] = t.map(|k| local[k as usize]);
                let tri = if flip { [a, c, b] } else { [a, b, c] };
                self.out.indices.extend_from_slice(&tri);
                self.triangle_faces.push(f as u32);
            }
            builder.face_done();

            if oversize {
                builder.close(&mut self.out);
            }
        }
        builder.close(&mut self.out);
        builder
    }

    /// Group each split's triangles by the material of their source face.
    ///
    /// Groups are ordered by ascending material id; an empty slice means material 0
    /// for every face.
    pub fn gen_submesh(&mut self, material_ids: &[i32]) -> Result<(), RefineError> {
        self.require_stage("gen_submesh", &[Stage::Refined, Stage::Submeshed])?;
        if !material_ids.is_empty() && material_ids.len() != self.counts.len() {
            return Err(RefineError::MaterialCount {
                len: material_ids.len(),
                face_count: self.counts.len(),
            });
        }

        let mut metrics = std::mem::take(&mut self.metrics);
        metrics.time(TimingBucket::Submesh, || self.group_submeshes(material_ids));
        self.metrics = metrics;

        self.out.diagnostics.submesh_count = self.out.submeshes.len();
        self.stage = Stage::Submeshed;
        Ok(())
    }

    fn group_submeshes(&mut self, material_ids: &[i32]) {
        let out = &mut self.out;
        out.submeshes.clear();
        out.submesh_indices.clear();

        for (split_index, split) in out.splits.iter_mut().enumerate() {
            let first_triangle = split.index_offset / 3;
            let mut groups: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
            for t in first_triangle..first_triangle + split.triangle_count() {
                let face = self.triangle_faces[t] as usize;
                let material = material_ids.get(face).copied().unwrap_or(0);
                groups.entry(material).or_default().push(t);
            }

            split.submesh_offset = out.submeshes.len();
            split.submesh_count = groups.len();
            for (material_id, triangles) in groups {
                let index_offset = out.submesh_indices.len();
                for t in triangles {
                    out.submesh_indices
                        .extend_from_slice(&out.indices[t * 3..t * 3 + 3]);
                }
                out.submeshes.push(Submesh {
                    topology: Topology::Triangles,
                    material_id,
                    split: split_index,
                    index_offset,
                    index_count: out.submesh_indices.len() - index_offset,
                });
            }
        }
    }

    /// Hand back the refined buffers. Submeshes default to material 0 when
    /// [`gen_submesh`](Self::gen_submesh) was not called.
    pub fn finish(mut self) -> Result<RefinedMesh, RefineError> {
        self.require_stage("finish", &[Stage::Refined, Stage::Submeshed])?;
        if self.stage == Stage::Refined {
            self.gen_submesh(&[])?;
        }
        self.out.diagnostics.timing = self.metrics.end();
        Ok(self.out)
    }
}

/// Output-vertex bookkeeping for the split currently being filled.
struct SplitBuilder {
    split_unit: usize,
    current: HashMap<CornerKey, u32>,
    /// Source vertices referenced by the current split.
    in_split: Vec<bool>,
    /// Source vertices referenced by any earlier split.
    emitted: Vec<bool>,
    touched: Vec<u32>,
    split: Split,
    seam_duplicates: usize,
    split_duplicates: usize,
}

impl SplitBuilder {
    fn new(vertex_count: usize, split_unit: usize) -> Self {
        Self {
            split_unit,
            current: HashMap::new(),
            in_split: vec![false; vertex_count],
            emitted: vec![false; vertex_count],
            touched: Vec::new(),
            split: Split::default(),
            seam_duplicates: 0,
            split_duplicates: 0,
        }
    }

    fn current_vertex_count(&self) -> usize {
        self.current.len()
    }

    /// Output vertices the face's `distinct` keys would add to the current split.
    fn fresh_count(&self, distinct: &HashSet<CornerKey>) -> usize {
        distinct.iter().filter(|k| !self.current.contains_key(k)).count()
    }

    fn emit(&mut self, key: CornerKey, corner: usize, refiner: &mut MeshRefiner) -> u32 {
        if let Some(&local) = self.current.get(&key) {
            return local;
        }
        let local = self.current.len() as u32;
        self.current.insert(key, local);

        let v = key.vertex as usize;
        if self.in_split[v] {
            self.seam_duplicates += 1;
        } else {
            if self.emitted[v] {
                self.split_duplicates += 1;
            }
            self.in_split[v] = true;
            self.touched.push(key.vertex);
        }

        let out = &mut refiner.out;
        out.points.push(refiner.points[v]);
        out.new_to_old.push(key.vertex);
        if let Some(n) = &refiner.normals {
            out.normals.push(n[corner]);
        }
        if let Some(t) = &refiner.tangents {
            out.tangents.push(t[corner]);
        }
        if let Some(uv) = &refiner.uv {
            out.uv.push(uv[corner]);
        }
        if let Some(c) = &refiner.colors {
            out.colors.push(c[corner]);
        }
        if let Some(w) = &refiner.weights {
            out.weights.push(w[v]);
        }
        local
    }

    fn face_done(&mut self) {
        self.split.face_count += 1;
    }

    /// Seal the current split if it holds anything and start an empty one.
    fn close(&mut self, out: &mut RefinedMesh) {
        if self.split.face_count > 0 {
            debug_assert!(self.current.len() <= self.split_unit || self.split.face_count == 1);
            self.split.vertex_count = self.current.len();
            self.split.index_count = out.indices.len() - self.split.index_offset;
            out.splits.push(self.split);
        }
        for v in self.touched.drain(..) {
            self.in_split[v as usize] = false;
            self.emitted[v as usize] = true;
        }
        self.current.clear();
        self.split = Split {
            vertex_offset: out.new_to_old.len(),
            index_offset: out.indices.len(),
            ..Split::default()
        };
    }
}
