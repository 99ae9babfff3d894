//! Vertex connectivity derived from a face set.
//!
//! Incidence is tracked per *welded position*: indices whose points coincide within the
//! weld tolerance share one record, so duplicated seam vertices still see each other's
//! faces and neighbors. The graph is built once and never updated.

use std::collections::HashMap;

use super::topology::{FaceSet, TopologyError};
use super::{Float3, Tolerance};

/// Compressed adjacency lists: the items of record `r` are `items[offsets[r]..offsets[r + 1]]`.
#[derive(Debug, Clone, Default)]
struct Csr<T> {
    offsets: Vec<u32>,
    items: Vec<T>,
}

impl<T: Copy + Default> Csr<T> {
    /// Counting sort of `(record, item)` pairs; insertion order is kept inside a record.
    fn from_pairs(record_count: usize, pairs: &[(u32, T)]) -> Self {
        let mut offsets = vec![0u32; record_count + 1];
        for (record, _) in pairs {
            offsets[*record as usize + 1] += 1;
        }
        for r in 0..record_count {
            offsets[r + 1] += offsets[r];
        }
        let mut cursor = offsets.clone();
        let mut items = vec![T::default(); pairs.len()];
        for (record, item) in pairs {
            let slot = &mut cursor[*record as usize];
            items[*slot as usize] = *item;
            *slot += 1;
        }
        Self { offsets, items }
    }

    fn get(&self, record: usize) -> &[T] {
        match (self.offsets.get(record), self.offsets.get(record + 1)) {
            (Some(&start), Some(&end)) => &self.items[start as usize..end as usize],
            _ => &[],
        }
    }
}

/// Read-only vertex → faces / corners / neighbors graph.
#[derive(Debug, Clone, Default)]
pub struct ConnectionData {
    welded: Vec<u32>,
    groups: Csr<u32>,
    faces: Csr<u32>,
    corners: Csr<u32>,
    neighbors: Csr<u32>,
    /// Parallel to `neighbors.items`: faces sharing that edge.
    edge_faces: Vec<u32>,
    welded_vertex_count: usize,
}

impl ConnectionData {
    /// Every face has `stride` corners.
    pub fn build_uniform(
        indices: &[u32],
        stride: usize,
        points: &[Float3],
    ) -> Result<Self, TopologyError> {
        Self::build(&FaceSet::uniform(indices, stride)?, points)
    }

    /// Explicit per-face corner counts and start offsets.
    pub fn build_variable(
        indices: &[u32],
        counts: &[u32],
        offsets: &[u32],
        points: &[Float3],
    ) -> Result<Self, TopologyError> {
        Self::build(&FaceSet::variable(indices, counts, offsets)?, points)
    }

    pub fn build(faces: &FaceSet<'_>, points: &[Float3]) -> Result<Self, TopologyError> {
        Self::build_with_tolerance(faces, points, Tolerance::WELD)
    }

    pub fn build_with_tolerance(
        faces: &FaceSet<'_>,
        points: &[Float3],
        tol: Tolerance,
    ) -> Result<Self, TopologyError> {
        faces.validate(points.len())?;
        let vertex_count = points.len();
        let welded = weld_positions(points, tol);
        let welded_vertex_count = welded
            .iter()
            .enumerate()
            .filter(|(v, rep)| **rep as usize != *v)
            .count();

        let group_pairs: Vec<(u32, u32)> = welded
            .iter()
            .enumerate()
            .map(|(v, rep)| (*rep, v as u32))
            .collect();

        let mut face_pairs = Vec::with_capacity(faces.indices().len());
        let mut corner_pairs = Vec::with_capacity(faces.indices().len());
        let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();
        let mut edge_order: Vec<(u32, u32)> = Vec::new();

        for f in 0..faces.face_count() {
            let face = faces.face(f);
            let offset = faces.face_offset(f);
            for (k, &v) in face.iter().enumerate() {
                let rep = welded[v as usize];
                corner_pairs.push((rep, (offset + k) as u32));
                // A face touching the same position twice is listed once.
                if !face[..k].iter().any(|&u| welded[u as usize] == rep) {
                    face_pairs.push((rep, f as u32));
                }
            }
            if face.len() < 3 {
                continue;
            }
            for k in 0..face.len() {
                let a = welded[face[k] as usize];
                let b = welded[face[(k + 1) % face.len()] as usize];
                if a == b {
                    continue;
                }
                let key = (a.min(b), a.max(b));
                let count = edge_counts.entry(key).or_insert_with(|| {
                    edge_order.push(key);
                    0
                });
                *count += 1;
            }
        }

        let mut neighbor_pairs = Vec::with_capacity(edge_order.len() * 2);
        let mut count_pairs = Vec::with_capacity(edge_order.len() * 2);
        for key in &edge_order {
            let count = edge_counts.get(key).copied().unwrap_or(0);
            neighbor_pairs.push((key.0, key.1));
            neighbor_pairs.push((key.1, key.0));
            count_pairs.push((key.0, count));
            count_pairs.push((key.1, count));
        }

        let data = Self {
            groups: Csr::from_pairs(vertex_count, &group_pairs),
            faces: Csr::from_pairs(vertex_count, &face_pairs),
            corners: Csr::from_pairs(vertex_count, &corner_pairs),
            neighbors: Csr::from_pairs(vertex_count, &neighbor_pairs),
            edge_faces: Csr::from_pairs(vertex_count, &count_pairs).items,
            welded,
            welded_vertex_count,
        };
        log::debug!(
            "connectivity: {} vertices, {} welded, {} edges",
            vertex_count,
            welded_vertex_count,
            edge_order.len()
        );
        Ok(data)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.welded.len()
    }

    /// Corners indexed while building; equals the face set's index count.
    #[must_use]
    pub fn corner_total(&self) -> usize {
        self.corners.items.len()
    }

    /// Representative index of `v`'s welded position. Out-of-range `v` is returned as is.
    #[must_use]
    pub fn welded(&self, v: usize) -> usize {
        self.welded.get(v).map_or(v, |rep| *rep as usize)
    }

    /// Every vertex index sharing `v`'s position, `v` included.
    #[must_use]
    pub fn group_of(&self, v: usize) -> &[u32] {
        self.groups.get(self.welded(v))
    }

    /// Faces incident to `v`'s position.
    #[must_use]
    pub fn faces_of(&self, v: usize) -> &[u32] {
        self.faces.get(self.welded(v))
    }

    /// Positions in the flattened index stream whose vertex welds to `v`.
    #[must_use]
    pub fn corners_of(&self, v: usize) -> &[u32] {
        self.corners.get(self.welded(v))
    }

    /// Edge-adjacent positions, as representative indices.
    #[must_use]
    pub fn neighbors_of(&self, v: usize) -> &[u32] {
        self.neighbors.get(self.welded(v))
    }

    /// `(neighbor, faces sharing the edge)` for every edge around `v`.
    pub fn edges_of(&self, v: usize) -> impl Iterator<Item = (u32, u32)> + '_ {
        let rep = self.welded(v);
        let counts = match (
            self.neighbors.offsets.get(rep),
            self.neighbors.offsets.get(rep + 1),
        ) {
            (Some(&start), Some(&end)) => &self.edge_faces[start as usize..end as usize],
            _ => &[],
        };
        self.neighbors
            .get(rep)
            .iter()
            .copied()
            .zip(counts.iter().copied())
    }

    /// Faces sharing the edge between the positions of `a` and `b`.
    #[must_use]
    pub fn edge_face_count(&self, a: usize, b: usize) -> usize {
        let target = self.welded(b) as u32;
        self.edges_of(a)
            .find(|(n, _)| *n == target)
            .map_or(0, |(_, c)| c as usize)
    }

    /// Vertex indices merged into another index's position.
    #[must_use]
    pub fn welded_vertex_count(&self) -> usize {
        self.welded_vertex_count
    }

    /// `(open, non_manifold)` edge counts: edges with one face and with more than two.
    #[must_use]
    pub fn edge_topology(&self) -> (usize, usize) {
        let mut open = 0usize;
        let mut non_manifold = 0usize;
        for v in 0..self.vertex_count() {
            if self.welded(v) != v {
                continue;
            }
            for (n, count) in self.edges_of(v) {
                // Each edge is stored at both endpoints; count it at the lower one.
                if (n as usize) < v {
                    continue;
                }
                match count {
                    1 => open += 1,
                    c if c > 2 => non_manifold += 1,
                    _ => {}
                }
            }
        }
        (open, non_manifold)
    }
}

/// Map every vertex to the first earlier index within `tol` of it.
///
/// Grid hash with 27-cell neighbor lookup. Non-finite points are never merged.
pub(crate) fn weld_positions(points: &[Float3], tol: Tolerance) -> Vec<u32> {
    let mut welded: Vec<u32> = (0..points.len() as u32).collect();
    if !tol.eps.is_finite() || tol.eps <= 0.0 {
        return welded;
    }

    let inv = 1.0 / tol.eps;
    let quantize = |value: f32| -> i64 {
        let q = (value * inv).floor();
        q.clamp(i64::MIN as f32, i64::MAX as f32) as i64
    };

    let mut buckets: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (i, p) in points.iter().copied().enumerate() {
        if !p.is_finite() {
            continue;
        }
        let key = (quantize(p.x), quantize(p.y), quantize(p.z));

        let mut found = None;
        'search: for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                for dz in -1i64..=1 {
                    let lookup = (
                        key.0.saturating_add(dx),
                        key.1.saturating_add(dy),
                        key.2.saturating_add(dz),
                    );
                    let Some(candidates) = buckets.get(&lookup) else {
                        continue;
                    };
                    if let Some(&cand) = candidates
                        .iter()
                        .find(|&&c| tol.approx_eq_float3(points[c as usize], p))
                    {
                        found = Some(cand);
                        break 'search;
                    }
                }
            }
        }

        match found {
            Some(rep) => welded[i] = rep,
            None => buckets.entry(key).or_default().push(i as u32),
        }
    }
    welded
}
