//! Conversion between 2D `(row, col)` index expressions and 1D flat offsets.
//!
//! Everything here is a pure function of its arguments; the row layout is
//! passed in explicitly as `lengths` and/or `starts`.
use std::borrow::Cow;

use ndarray::ArrayView2;

use crate::error::{RaggedError, Result};
use crate::index::{Selector, SliceSpec};
use crate::lengths::starts_from_lengths;

/// Parallel row/column arrays addressing individual elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coords {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl Coords {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().copied().zip(self.cols.iter().copied())
    }
}

/// Coordinates grouped by row, together with how many of them fall in each
/// selected row. `new_lengths` is the row layout of the selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RaggedCoords {
    pub coords: Coords,
    pub new_lengths: Vec<usize>,
}

fn resolve_starts<'a>(
    lengths: Option<&'a [usize]>,
    starts: Option<&'a [usize]>,
) -> Result<Cow<'a, [usize]>> {
    match (starts, lengths) {
        (Some(starts), Some(lengths)) if starts.len() != lengths.len() => {
            Err(RaggedError::invalid(format!(
                "{} row starts do not match {} row lengths",
                starts.len(),
                lengths.len()
            )))
        }
        (Some(starts), _) => Ok(Cow::Borrowed(starts)),
        (None, Some(lengths)) => Ok(Cow::Owned(starts_from_lengths(lengths))),
        (None, None) => Err(RaggedError::config("No lengths or starts supplied")),
    }
}

/// Convert flat offsets into `(row, col)` pairs.
///
/// The row of an offset is the largest row whose start is `<=` the offset,
/// so empty rows sharing a start are skipped over. Offsets may be unsorted
/// and repeated.
pub fn flat_to_2d(
    flat: &[usize],
    lengths: Option<&[usize]>,
    starts: Option<&[usize]>,
) -> Result<Coords> {
    let starts = resolve_starts(lengths, starts)?;
    if starts.is_empty() && !flat.is_empty() {
        return Err(RaggedError::RowOutOfBounds {
            index: flat[0] as isize,
            rows: 0,
        });
    }
    let mut coords = Coords {
        rows: Vec::with_capacity(flat.len()),
        cols: Vec::with_capacity(flat.len()),
    };
    for &offset in flat {
        let row = starts.partition_point(|&s| s <= offset) - 1;
        coords.rows.push(row);
        coords.cols.push(offset - starts[row]);
    }
    Ok(coords)
}

/// Normalize a possibly negative row index against `rows`.
pub fn normalize_row(row: isize, rows: usize) -> Result<usize> {
    let fixed = if row < 0 { row + rows as isize } else { row };
    if fixed < 0 || fixed as usize >= rows {
        return Err(RaggedError::RowOutOfBounds { index: row, rows });
    }
    Ok(fixed as usize)
}

fn normalize_col(row: usize, col: isize, lengths: Option<&[usize]>, check: bool) -> Result<usize> {
    let len = match lengths {
        Some(l) => Some(*l.get(row).ok_or(RaggedError::RowOutOfBounds {
            index: row as isize,
            rows: l.len(),
        })?),
        None => None,
    };
    let fixed = if col < 0 {
        match len {
            Some(len) => col + len as isize,
            None => {
                return Err(RaggedError::config(
                    "Must supply lengths if indices are negative.",
                ))
            }
        }
    } else {
        col
    };
    if fixed < 0 {
        return Err(RaggedError::ColumnOutOfBounds {
            row,
            index: col,
            len: len.unwrap_or(0),
        });
    }
    if let (true, Some(len)) = (check, len) {
        if fixed as usize >= len {
            return Err(RaggedError::ColumnOutOfBounds {
                row,
                index: col,
                len,
            });
        }
    }
    Ok(fixed as usize)
}

/// Broadcast a single row across many columns or a single column across many
/// rows, so both sides end up the same length.
fn broadcast_pairs(rows: &[isize], cols: &[isize]) -> Result<(Vec<isize>, Vec<isize>)> {
    if rows.len() == cols.len() {
        Ok((rows.to_vec(), cols.to_vec()))
    } else if cols.len() == 1 {
        Ok((rows.to_vec(), vec![cols[0]; rows.len()]))
    } else if rows.len() == 1 {
        Ok((vec![rows[0]; cols.len()], cols.to_vec()))
    } else {
        Err(RaggedError::invalid(format!(
            "row indices of length {} cannot be paired with column indices of length {}",
            rows.len(),
            cols.len()
        )))
    }
}

/// Normalize negative indices in a batch of 2D indices.
///
/// Rows are corrected against the row count, columns against their own row's
/// length. Bounds are checked against `lengths` when `check` is set.
pub fn normalize_negative(
    rows: &[isize],
    cols: &[isize],
    row_count: usize,
    lengths: Option<&[usize]>,
    check: bool,
) -> Result<Coords> {
    let (rows, cols) = broadcast_pairs(rows, cols)?;
    let mut coords = Coords {
        rows: Vec::with_capacity(rows.len()),
        cols: Vec::with_capacity(cols.len()),
    };
    for (&r, &c) in rows.iter().zip(cols.iter()) {
        let row = normalize_row(r, row_count)?;
        coords.cols.push(normalize_col(row, c, lengths, check)?);
        coords.rows.push(row);
    }
    Ok(coords)
}

/// Convert 2D indices into flat offsets: `starts[row] + col`.
///
/// Needs either `lengths` or `starts`. Negative columns need `lengths`.
/// With `error_check` and `lengths`, every column must be inside its row.
pub fn flat_from_2d(
    rows: &[isize],
    cols: &[isize],
    lengths: Option<&[usize]>,
    starts: Option<&[usize]>,
    error_check: bool,
) -> Result<Vec<usize>> {
    let starts = resolve_starts(lengths, starts)?;
    let coords = normalize_negative(rows, cols, starts.len(), lengths, error_check)?;
    Ok(offsets(&coords, &starts))
}

/// Flat offsets of already normalized coordinates.
pub fn offsets(coords: &Coords, starts: &[usize]) -> Vec<usize> {
    coords.pairs().map(|(r, c)| starts[r] + c).collect()
}

/// Resolve a slice against an axis into concrete indices.
///
/// Without an axis length the slice must be bounded and non-negative. With
/// one, bounds are clipped to the axis as numpy does, and a
/// negative step with no bounds walks the whole axis backwards.
pub fn slice_indices(spec: &SliceSpec, length: Option<usize>) -> Result<Vec<usize>> {
    let step = spec.step.unwrap_or(1);
    if step == 0 {
        return Err(RaggedError::invalid("slice step cannot be zero"));
    }

    let Some(length) = length else {
        let stop = spec.stop.ok_or_else(|| {
            RaggedError::config("Must supply length of array if stop is None")
        })?;
        let start = spec.start.unwrap_or(0);
        if start < 0 || stop < 0 || step < 0 {
            return Err(RaggedError::config(
                "Must supply length of array if slicing to negative indices",
            ));
        }
        return Ok((start..stop).step_by(step as usize).map(|i| i as usize).collect());
    };

    let len = length as isize;
    let clip = |bound: isize, low: isize, high: isize| -> isize {
        let b = if bound < 0 { bound + len } else { bound };
        b.clamp(low, high)
    };

    let mut indices = Vec::new();
    if step > 0 {
        let start = spec.start.map_or(0, |s| clip(s, 0, len));
        let stop = spec.stop.map_or(len, |s| clip(s, 0, len));
        let mut i = start;
        while i < stop {
            indices.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
    } else {
        let start = spec.start.map_or(len - 1, |s| clip(s, -1, len - 1));
        let stop = spec.stop.map_or(-1, |s| clip(s, -1, len - 1));
        let mut i = start;
        while i > stop {
            indices.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
    }
    Ok(indices)
}

/// Resolve a column slice separately for every selected row.
///
/// Each row's own length bounds the slice, so a `stop` past the end of a
/// short row is clipped to that row rather than rejected.
pub fn per_row_slice(rows: &[usize], spec: &SliceSpec, lengths: &[usize]) -> Result<RaggedCoords> {
    let mut out = RaggedCoords {
        coords: Coords::default(),
        new_lengths: Vec::with_capacity(rows.len()),
    };
    for &row in rows {
        let len = *lengths.get(row).ok_or(RaggedError::RowOutOfBounds {
            index: row as isize,
            rows: lengths.len(),
        })?;
        let cols = slice_indices(spec, Some(len))?;
        out.new_lengths.push(cols.len());
        out.coords.rows.extend(std::iter::repeat(row).take(cols.len()));
        out.coords.cols.extend(cols);
    }
    Ok(out)
}

/// Cartesian product of a row list and a column list, row-major.
///
/// Columns are left unnormalized; every selected row gets `cols.len()`
/// entries.
pub fn list_broadcast(rows: &[usize], cols: &[isize]) -> (Vec<isize>, Vec<isize>, Vec<usize>) {
    let mut out_rows = Vec::with_capacity(rows.len() * cols.len());
    let mut out_cols = Vec::with_capacity(rows.len() * cols.len());
    for &row in rows {
        for &col in cols {
            out_rows.push(row as isize);
            out_cols.push(col);
        }
    }
    (out_rows, out_cols, vec![cols.len(); rows.len()])
}

/// Positions of `true` entries.
pub fn mask_positions(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &m)| if m { Some(i) } else { None })
        .collect()
}

/// `(row, col)` of every `true` entry of a ragged mask, located through the
/// mask's own layout.
pub fn where_ragged(values: &[bool], lengths: &[usize]) -> Result<Coords> {
    flat_to_2d(&mask_positions(values), Some(lengths), None)
}

/// `(row, col)` of every `true` entry of a rectangular mask, in row-major order.
pub fn where_true(mask: &ArrayView2<bool>) -> Coords {
    let mut coords = Coords::default();
    for ((r, c), &m) in mask.indexed_iter() {
        if m {
            coords.rows.push(r);
            coords.cols.push(c);
        }
    }
    coords
}

/// Resolve a row selector into concrete, in-bounds row indices.
pub fn resolve_rows(selector: &Selector, row_count: usize) -> Result<Vec<usize>> {
    match selector {
        Selector::Scalar(row) => Ok(vec![normalize_row(*row, row_count)?]),
        Selector::List(rows) => rows.iter().map(|&r| normalize_row(r, row_count)).collect(),
        Selector::Slice(spec) => slice_indices(spec, Some(row_count)),
        Selector::Mask(mask) => {
            if mask.len() != row_count {
                return Err(RaggedError::MaskLength {
                    expected: row_count,
                    found: mask.len(),
                });
            }
            Ok(mask_positions(mask))
        }
    }
}

/// Raw (possibly negative) indices of a non-slice selector. A mask becomes
/// the positions of its `true` entries; its length is not checked here.
pub fn selector_indices(selector: &Selector) -> Option<Vec<isize>> {
    match selector {
        Selector::Scalar(i) => Some(vec![*i]),
        Selector::List(list) => Some(list.clone()),
        Selector::Mask(mask) => Some(mask_positions(mask).into_iter().map(|i| i as isize).collect()),
        Selector::Slice(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_to_2d_skips_empty_rows() {
        let coords = flat_to_2d(&[3, 0, 4], Some(&[3, 0, 2]), None).unwrap();
        assert_eq!(coords.rows, vec![2, 0, 2]);
        assert_eq!(coords.cols, vec![0, 0, 1]);
    }

    #[test]
    fn flat_to_2d_requires_layout() {
        let err = flat_to_2d(&[0], None, None).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn broadcast_rules() {
        assert_eq!(
            broadcast_pairs(&[0, 1, 2], &[4]).unwrap(),
            (vec![0, 1, 2], vec![4, 4, 4])
        );
        assert_eq!(
            broadcast_pairs(&[1], &[0, 2]).unwrap(),
            (vec![1, 1], vec![0, 2])
        );
        assert!(broadcast_pairs(&[0, 1], &[0, 1, 2]).is_err());
    }

    #[test]
    fn reversed_slice_walks_whole_axis() {
        assert_eq!(
            slice_indices(&SliceSpec::reversed(), Some(4)).unwrap(),
            vec![3, 2, 1, 0]
        );
        assert!(slice_indices(&SliceSpec::reversed(), Some(0)).unwrap().is_empty());
    }
}
