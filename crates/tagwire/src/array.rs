// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Arrays of arbitrary rank.
//!
//! Cells are stored row-major: the last index varies fastest, which is also
//! the order they appear on the wire.

use crate::error::{CodecError, CodecResult};

/// Product of `dims`, or `None` on overflow.
pub(crate) fn cell_count(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// A rectangular array of rank `dims.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray<T> {
    dims: Vec<usize>,
    cells: Vec<T>,
}

impl<T> NdArray<T> {
    /// Build an array from its dimensions and row-major cells.
    ///
    /// Rank must be at least 1 and the cell count must equal the product of
    /// the dimensions.
    pub fn new(dims: Vec<usize>, cells: Vec<T>) -> CodecResult<Self> {
        if dims.is_empty() {
            return Err(CodecError::UnsupportedShape("array of rank 0".into()));
        }
        match cell_count(&dims) {
            Some(expected) if expected == cells.len() => Ok(Self { dims, cells }),
            Some(expected) => Err(CodecError::UnsupportedShape(format!(
                "array dims {:?} need {} cells, got {}",
                dims,
                expected,
                cells.len()
            ))),
            None => Err(CodecError::UnsupportedShape(format!(
                "array dims {:?} overflow",
                dims
            ))),
        }
    }

    /// Rank-1 array.
    pub fn from_vec(cells: Vec<T>) -> Self {
        Self {
            dims: vec![cells.len()],
            cells,
        }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<T>) {
        (self.dims, self.cells)
    }

    /// Cell at a multi-index, or `None` if the index is out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.dims.len() {
            return None;
        }
        let mut offset = 0;
        for (&i, &d) in index.iter().zip(&self.dims) {
            if i >= d {
                return None;
            }
            offset = offset * d + i;
        }
        self.cells.get(offset)
    }
}
