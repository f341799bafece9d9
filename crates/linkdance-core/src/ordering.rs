//! Link ordering
//!
//! Single-element moves over an ordered sequence, as produced by a
//! drag-and-drop gesture. The element at `source` is taken out and reinserted
//! at `destination`; everything else keeps its relative order.

use thiserror::Error;

/// A move index was outside the sequence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error("Move index {index} is out of bounds for {len} item(s)")]
    OutOfBounds { index: usize, len: usize },
}

/// Return a copy of `items` with the element at `source` moved to `destination`
///
/// Both indices must be `< items.len()`.
pub fn reorder<T: Clone>(
    items: &[T],
    source: usize,
    destination: usize,
) -> Result<Vec<T>, OrderingError> {
    let len = items.len();
    for index in [source, destination] {
        if index >= len {
            return Err(OrderingError::OutOfBounds { index, len });
        }
    }

    let mut result = items.to_vec();
    let moved = result.remove(source);
    result.insert(destination, moved);
    Ok(result)
}

/// Outcome of a drag gesture
///
/// A gesture dropped outside any valid target has no destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkMove {
    pub source: usize,
    pub destination: Option<usize>,
}

impl LinkMove {
    /// A completed move
    pub fn to(source: usize, destination: usize) -> Self {
        Self {
            source,
            destination: Some(destination),
        }
    }

    /// A cancelled drag
    pub fn cancelled(source: usize) -> Self {
        Self {
            source,
            destination: None,
        }
    }

    /// Apply the move
    ///
    /// Returns `Ok(None)` for a cancelled drag; the caller must leave its state
    /// untouched in that case.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Result<Option<Vec<T>>, OrderingError> {
        match self.destination {
            Some(destination) => reorder(items, self.source, destination).map(Some),
            None => Ok(None),
        }
    }
}
