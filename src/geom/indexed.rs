//! Zero-copy "value at position P" view that resolves through an index buffer.

use std::iter::FusedIterator;

use super::topology::TopologyError;

/// Integer types accepted as index buffer elements.
pub trait VertexIndex: Copy {
    /// Convert to a slot index. Negative values map to `usize::MAX` so they fail bounds checks.
    fn to_usize(self) -> usize;
}

impl VertexIndex for u16 {
    fn to_usize(self) -> usize {
        usize::from(self)
    }
}

impl VertexIndex for u32 {
    fn to_usize(self) -> usize {
        self as usize
    }
}

impl VertexIndex for i32 {
    fn to_usize(self) -> usize {
        usize::try_from(self).unwrap_or(usize::MAX)
    }
}

impl VertexIndex for usize {
    fn to_usize(self) -> usize {
        self
    }
}

/// Logical sequence `values[indices[0]], values[indices[1]], ...` without copying.
#[derive(Debug, Clone, Copy)]
pub struct IndexedArray<'a, I, T> {
    indices: &'a [I],
    values: &'a [T],
}

impl<'a, I: VertexIndex, T> IndexedArray<'a, I, T> {
    /// Bounds are checked once here so that iteration never fails.
    pub fn new(indices: &'a [I], values: &'a [T]) -> Result<Self, TopologyError> {
        let vertex_count = values.len();
        if let Some((position, index)) = indices
            .iter()
            .map(|i| i.to_usize())
            .enumerate()
            .find(|(_, i)| *i >= vertex_count)
        {
            return Err(TopologyError::IndexOutOfRange {
                position,
                index,
                vertex_count,
            });
        }
        Ok(Self { indices, values })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&'a T> {
        let slot = self.indices.get(position)?.to_usize();
        self.values.get(slot)
    }

    #[must_use]
    pub fn iter(&self) -> IndexedIter<'a, I, T> {
        IndexedIter {
            indices: self.indices.iter(),
            values: self.values,
        }
    }

    /// Materialize the view into an owned, flattened buffer.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<'a, I: VertexIndex, T> IntoIterator for &IndexedArray<'a, I, T> {
    type Item = &'a T;
    type IntoIter = IndexedIter<'a, I, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct IndexedIter<'a, I, T> {
    indices: std::slice::Iter<'a, I>,
    values: &'a [T],
}

impl<'a, I: VertexIndex, T> Iterator for IndexedIter<'a, I, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.indices.next()?.to_usize();
        self.values.get(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<I: VertexIndex, T> ExactSizeIterator for IndexedIter<'_, I, T> {}

impl<I: VertexIndex, T> FusedIterator for IndexedIter<'_, I, T> {}
