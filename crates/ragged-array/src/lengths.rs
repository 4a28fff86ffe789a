//! Per-row lengths and the derived row start offsets.
use std::ops::Range;

use crate::error::{RaggedError, Result};

/// Prefix sums of `lengths`: `starts[0] == 0`, `starts[i] == starts[i-1] + lengths[i-1]`.
pub fn starts_from_lengths(lengths: &[usize]) -> Vec<usize> {
    lengths
        .iter()
        .scan(0usize, |acc, &len| {
            let start = *acc;
            *acc += len;
            Some(start)
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct LengthIndex {
    lengths: Vec<usize>,
    starts: Vec<usize>,
}

impl LengthIndex {
    pub fn new(lengths: Vec<usize>) -> Self {
        let starts = starts_from_lengths(&lengths);
        Self { lengths, starts }
    }

    /// Recompute `starts` from `lengths`. Every structural mutation ends here;
    /// `starts` is only valid once this has run.
    pub fn rebuild(&mut self) {
        self.starts = starts_from_lengths(&self.lengths);
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    pub fn rows(&self) -> usize {
        self.lengths.len()
    }

    /// Sum of all row lengths.
    pub fn total(&self) -> usize {
        self.lengths.iter().sum()
    }

    pub fn row_range(&self, row: usize) -> Range<usize> {
        let start = self.starts[row];
        start..start + self.lengths[row]
    }

    /// Length shared by every row, if there is at least one row and all agree.
    pub fn common_length(&self) -> Option<usize> {
        let first = *self.lengths.first()?;
        if self.lengths.iter().all(|&len| len == first) {
            Some(first)
        } else {
            None
        }
    }

    pub(crate) fn extend(&mut self, lengths: &[usize]) {
        self.lengths.extend_from_slice(lengths);
        self.rebuild();
    }
}

/// Split `list` into consecutive chunks of the given lengths.
pub fn partition_list<'a, T>(list: &'a [T], lengths: &[usize]) -> Result<Vec<&'a [T]>> {
    let total: usize = lengths.iter().sum();
    if total != list.len() {
        return Err(RaggedError::invalid(format!(
            "Number of elements in list ({}) does not equal the sum of the lengths to partition ({})",
            list.len(),
            total
        )));
    }
    let mut parts = Vec::with_capacity(lengths.len());
    let mut start = 0;
    for &len in lengths {
        parts.push(&list[start..start + len]);
        start += len;
    }
    Ok(parts)
}

/// Map indices into a concatenation of rows back to `(row, col)` pairs by
/// walking `lengths`. Indices past the last row are dropped.
pub fn partition_indices(indices: &[usize], lengths: &[usize]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(indices.len());
    for &index in indices {
        let mut remaining = index;
        for (row, &len) in lengths.iter().enumerate() {
            if len > remaining {
                pairs.push((row, remaining));
                break;
            }
            remaining -= len;
        }
    }
    pairs
}
