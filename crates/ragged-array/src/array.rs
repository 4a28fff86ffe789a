//! The ragged array container: construction, indexed reads and writes,
//! and appending rows.
//!
//! Rows live back to back in a single [`FlatStorage`]; a [`LengthIndex`]
//! records where each row starts. Index expressions are translated to flat
//! offsets by [`crate::translate`] and then gathered from, or scattered into,
//! the buffer.
use ndarray::Array2;

use crate::config::RaggedConfig;
use crate::error::{RaggedError, Result};
use crate::index::{Index, MaskIndex, Selector};
use crate::lengths::LengthIndex;
use crate::storage::FlatStorage;
use crate::translate::{
    flat_from_2d, list_broadcast, normalize_row, offsets, per_row_slice, resolve_rows,
    selector_indices, slice_indices, where_ragged,
};

/// One untrusted input item: either a whole row or a bare scalar.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry<T> {
    Row(Vec<T>),
    Scalar(T),
}

impl<T> Entry<T> {
    fn is_row(&self) -> bool {
        matches!(self, Entry::Row(_))
    }
}

/// Data accepted when building or appending to a ragged array.
#[derive(Clone, Debug)]
pub enum RowInput<T> {
    /// One `Vec` per row.
    Nested(Vec<Vec<T>>),
    /// All scalars: a single row.
    Flat(Vec<T>),
    /// Items whose kind is only known at runtime; checked for consistency.
    Entries(Vec<Entry<T>>),
    Ragged(RaggedArray<T>),
    /// Not row-like; rejected.
    Scalar(T),
}

impl<T> From<Vec<Vec<T>>> for RowInput<T> {
    fn from(rows: Vec<Vec<T>>) -> Self {
        RowInput::Nested(rows)
    }
}

impl<T> From<Vec<Entry<T>>> for RowInput<T> {
    fn from(entries: Vec<Entry<T>>) -> Self {
        RowInput::Entries(entries)
    }
}

impl<T> From<RaggedArray<T>> for RowInput<T> {
    fn from(array: RaggedArray<T>) -> Self {
        RowInput::Ragged(array)
    }
}

/// Values written by [`RaggedArray::set`].
#[derive(Clone, Debug)]
pub enum Values<T> {
    /// Broadcast to every addressed value.
    Scalar(T),
    /// Row-major values; for row assignment, a single replacement row.
    Flat(Vec<T>),
    Nested(Vec<Vec<T>>),
    Ragged(RaggedArray<T>),
}

/// Result of [`RaggedArray::get`].
#[derive(Clone, Debug, PartialEq)]
pub enum Selection<T> {
    /// A single materialized row (or a slice of one).
    Row(Vec<T>),
    /// Exactly the addressed elements, in order.
    Values(Vec<T>),
    /// Several rows, possibly with new lengths.
    Ragged(RaggedArray<T>),
}

impl<T> Selection<T> {
    pub fn into_ragged(self) -> Option<RaggedArray<T>> {
        match self {
            Selection::Ragged(array) => Some(array),
            _ => None,
        }
    }

    /// Flat values of any selection.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Selection::Row(values) | Selection::Values(values) => values,
            Selection::Ragged(array) => array.storage.into_vec(),
        }
    }

    /// The value of a selection that addressed exactly one scalar.
    pub fn into_scalar(self) -> Option<T> {
        let mut values = self.into_vec();
        if values.len() == 1 {
            values.pop()
        } else {
            None
        }
    }
}

/// `(rows, common row length, trailing width)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    /// `None` when rows differ in length (or there are none).
    pub row_length: Option<usize>,
    /// `None` when elements are scalars.
    pub trailing: Option<usize>,
}

/// Where an index expression landed in the flat buffer.
enum Resolved {
    /// Part of a single row, addressed by a scalar row and a column slice.
    Row(Vec<usize>),
    /// Several rows with a new row layout.
    Ragged {
        offsets: Vec<usize>,
        new_lengths: Vec<usize>,
    },
    /// Individually addressed elements.
    Elements(Vec<usize>),
}

/// A sequence of rows of possibly different lengths stored in one buffer.
#[derive(Clone, PartialEq)]
pub struct RaggedArray<T> {
    pub(crate) storage: FlatStorage<T>,
    pub(crate) index: LengthIndex,
}

impl<T> Default for RaggedArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RaggedArray<T> {
    /// An array with no rows.
    pub fn new() -> Self {
        Self {
            storage: FlatStorage::from_vec(Vec::new()),
            index: LengthIndex::default(),
        }
    }

    pub fn from_rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
    {
        let mut data = Vec::new();
        let mut lengths = Vec::new();
        for row in rows {
            let before = data.len();
            data.extend(row);
            lengths.push(data.len() - before);
        }
        Self::from_trusted(FlatStorage::from_vec(data), LengthIndex::new(lengths))
    }

    /// A single row holding `values`; no rows at all when `values` is empty.
    pub fn from_scalars(values: Vec<T>) -> Self {
        if values.is_empty() {
            return Self::new();
        }
        let len = values.len();
        Self::from_trusted(FlatStorage::from_vec(values), LengthIndex::new(vec![len]))
    }

    /// Wrap an existing flat buffer, partitioned by `lengths`.
    pub fn from_parts(flat: Vec<T>, lengths: Vec<usize>) -> Result<Self> {
        Self::from_storage(FlatStorage::from_vec(flat), lengths)
    }

    /// Like [`from_parts`](Self::from_parts), with each element a
    /// `width`-long vector.
    pub fn from_parts_with_width(flat: Vec<T>, width: usize, lengths: Vec<usize>) -> Result<Self> {
        Self::from_storage(FlatStorage::with_width(flat, width)?, lengths)
    }

    pub fn from_storage(storage: FlatStorage<T>, lengths: Vec<usize>) -> Result<Self> {
        let mut array = Self::from_trusted(storage, LengthIndex::new(lengths));
        array.rebuild()?;
        Ok(array)
    }

    /// Skips every check; the caller guarantees the lengths fit the buffer.
    pub(crate) fn from_trusted(storage: FlatStorage<T>, index: LengthIndex) -> Self {
        Self { storage, index }
    }

    /// Build from any [`RowInput`] with the default configuration.
    pub fn build<I: Into<RowInput<T>>>(input: I) -> Result<Self> {
        Self::build_with(input, &RaggedConfig::default())
    }

    pub fn build_with<I: Into<RowInput<T>>>(input: I, config: &RaggedConfig) -> Result<Self> {
        match input.into() {
            RowInput::Nested(rows) => Ok(Self::from_rows(rows)),
            RowInput::Flat(values) => Ok(Self::from_scalars(values)),
            RowInput::Entries(entries) => Self::from_entries(entries, config),
            RowInput::Ragged(array) => Ok(array),
            RowInput::Scalar(_) => Err(RaggedError::invalid(
                "Must supply an array or list of arrays as input",
            )),
        }
    }

    /// Build from items whose kind is only known at runtime.
    ///
    /// Items must be all rows or all scalars. Above
    /// `config.validation_row_limit` items the check is skipped with a
    /// warning; unchecked input is then read according to its first item.
    pub fn from_entries(entries: Vec<Entry<T>>, config: &RaggedConfig) -> Result<Self> {
        if config.error_checking {
            if entries.len() > config.validation_row_limit {
                log::warn!(
                    "error checking is turned off for ragged arrays with first dimension greater than {} (got {})",
                    config.validation_row_limit,
                    entries.len()
                );
            } else {
                ensure_ragged_data(&entries)?;
            }
        }

        let rows_first = match entries.first() {
            None => return Ok(Self::new()),
            Some(entry) => entry.is_row(),
        };
        if rows_first {
            Ok(Self::from_rows(entries.into_iter().map(|entry| match entry {
                Entry::Row(row) => row,
                Entry::Scalar(value) => vec![value],
            })))
        } else {
            let mut values = Vec::with_capacity(entries.len());
            for entry in entries {
                match entry {
                    Entry::Row(row) => values.extend(row),
                    Entry::Scalar(value) => values.push(value),
                }
            }
            Ok(Self::from_scalars(values))
        }
    }

    /// Recompute the row layout after a structural change and check that it
    /// still partitions the buffer exactly.
    pub fn rebuild(&mut self) -> Result<()> {
        self.index.rebuild();
        let total = self.index.total();
        if total != self.storage.len() {
            return Err(RaggedError::invalid(format!(
                "Number of elements in list ({}) does not equal the sum of the lengths to partition ({})",
                self.storage.len(),
                total
            )));
        }
        log::debug!(
            "rebuilt ragged layout: {} rows, {} elements",
            self.index.rows(),
            total
        );
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.index.rows() == 0
    }

    /// Number of elements across all rows.
    pub fn size(&self) -> usize {
        self.storage.len()
    }

    pub fn lengths(&self) -> &[usize] {
        self.index.lengths()
    }

    pub fn starts(&self) -> &[usize] {
        self.index.starts()
    }

    /// Trailing vector width of each element, if elements are not scalars.
    pub fn width(&self) -> Option<usize> {
        self.storage.width()
    }

    pub fn shape(&self) -> Shape {
        Shape {
            rows: self.len(),
            row_length: self.index.common_length(),
            trailing: self.storage.width(),
        }
    }

    /// The whole buffer, rows concatenated.
    pub fn flat(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Mutable access to the buffer. The row layout cannot change through it.
    pub fn flat_mut(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    pub fn storage(&self) -> &FlatStorage<T> {
        &self.storage
    }

    /// Borrowed view of one row; negative indices count from the end.
    pub fn row(&self, row: isize) -> Result<&[T]> {
        let row = normalize_row(row, self.len())?;
        Ok(self.storage.range(self.index.row_range(row)))
    }

    pub fn row_mut(&mut self, row: isize) -> Result<&mut [T]> {
        let row = normalize_row(row, self.len())?;
        let range = self.index.row_range(row);
        Ok(self.storage.range_mut(range))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.len()).map(move |row| self.storage.range(self.index.row_range(row)))
    }

    /// Element at `(row, col)`; a one-value slice, or `width` values.
    pub fn element(&self, row: isize, col: isize) -> Result<&[T]> {
        let offsets = flat_from_2d(
            &[row],
            &[col],
            Some(self.index.lengths()),
            Some(self.index.starts()),
            true,
        )?;
        Ok(self.storage.element(offsets[0]))
    }

    pub fn into_parts(self) -> (Vec<T>, Vec<usize>) {
        let lengths = self.index.lengths().to_vec();
        (self.storage.into_vec(), lengths)
    }

    fn resolve_pair(&self, rows: &Selector, cols: &Selector) -> Result<Resolved> {
        let lengths = self.index.lengths();
        let starts = self.index.starts();
        match (rows, cols) {
            (Selector::Slice(row_spec), _) => {
                let row_ids = slice_indices(row_spec, Some(self.len()))?;
                if let Selector::Slice(col_spec) = cols {
                    let ragged = per_row_slice(&row_ids, col_spec, lengths)?;
                    Ok(Resolved::Ragged {
                        offsets: offsets(&ragged.coords, starts),
                        new_lengths: ragged.new_lengths,
                    })
                } else {
                    let addressed: Vec<isize> = row_ids.iter().map(|&r| r as isize).collect();
                    let col_ids = self.column_ids(cols, &addressed)?;
                    let (r, c, new_lengths) = list_broadcast(&row_ids, &col_ids);
                    let flat = flat_from_2d(&r, &c, Some(lengths), Some(starts), true)?;
                    Ok(Resolved::Ragged {
                        offsets: flat,
                        new_lengths,
                    })
                }
            }
            (Selector::Scalar(row), Selector::Slice(col_spec)) => {
                let row = normalize_row(*row, self.len())?;
                let start = starts[row];
                let cols = slice_indices(col_spec, Some(lengths[row]))?;
                Ok(Resolved::Row(cols.into_iter().map(|c| start + c).collect()))
            }
            (_, Selector::Slice(col_spec)) => {
                let row_ids = resolve_rows(rows, self.len())?;
                let ragged = per_row_slice(&row_ids, col_spec, lengths)?;
                Ok(Resolved::Ragged {
                    offsets: offsets(&ragged.coords, starts),
                    new_lengths: ragged.new_lengths,
                })
            }
            _ => {
                let row_ids: Vec<isize> = match rows {
                    Selector::Mask(_) => resolve_rows(rows, self.len())?
                        .into_iter()
                        .map(|r| r as isize)
                        .collect(),
                    _ => selector_indices(rows).unwrap_or_default(),
                };
                let col_ids = self.column_ids(cols, &row_ids)?;
                let flat = flat_from_2d(&row_ids, &col_ids, Some(lengths), Some(starts), true)?;
                Ok(Resolved::Elements(flat))
            }
        }
    }

    /// Column indices of a non-slice selector. A column mask must match the
    /// length of every row it addresses.
    fn column_ids(&self, cols: &Selector, rows: &[isize]) -> Result<Vec<isize>> {
        if let Selector::Mask(mask) = cols {
            for &r in rows {
                let len = self.index.lengths()[normalize_row(r, self.len())?];
                if mask.len() != len {
                    return Err(RaggedError::MaskLength {
                        expected: len,
                        found: mask.len(),
                    });
                }
            }
        }
        Ok(selector_indices(cols).unwrap_or_default())
    }

    fn mask_offsets(&self, mask: &MaskIndex) -> Result<Vec<usize>> {
        let coords = where_ragged(mask.values(), mask.lengths())?;
        let rows: Vec<isize> = coords.rows.iter().map(|&r| r as isize).collect();
        let cols: Vec<isize> = coords.cols.iter().map(|&c| c as isize).collect();
        flat_from_2d(
            &rows,
            &cols,
            Some(self.index.lengths()),
            Some(self.index.starts()),
            true,
        )
    }
}

impl<T: Clone> RaggedArray<T> {
    /// Materialize every row.
    pub fn to_vecs(&self) -> Vec<Vec<T>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    /// All values, ignoring row boundaries.
    pub fn flatten(&self) -> Vec<T> {
        self.storage.to_vec()
    }

    /// New array holding the given rows, in order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut data = Vec::new();
        let mut lengths = Vec::with_capacity(rows.len());
        for &row in rows {
            data.extend_from_slice(self.storage.range(self.index.row_range(row)));
            lengths.push(self.index.lengths()[row]);
        }
        Self::from_trusted(
            FlatStorage::trusted(data, self.storage.width()),
            LengthIndex::new(lengths),
        )
    }

    fn wrap(&self, values: Vec<T>, new_lengths: Vec<usize>) -> Self {
        Self::from_trusted(
            FlatStorage::trusted(values, self.storage.width()),
            LengthIndex::new(new_lengths),
        )
    }

    /// Read the elements addressed by `index`.
    ///
    /// * a scalar row gives that row, materialized;
    /// * a slice, list or mask over rows gives a new array of those rows;
    /// * a pair with a slice on either side gives a new array whose lengths
    ///   follow the (per-row clipped) selection, except that a scalar row
    ///   with a column slice gives a single row;
    /// * a pair without slices, or a ragged mask, gives exactly the
    ///   addressed elements.
    pub fn get<I: Into<Index>>(&self, index: I) -> Result<Selection<T>> {
        let index = index.into();
        log::trace!("get {:?}", index);
        match index {
            Index::Rows(Selector::Scalar(row)) => Ok(Selection::Row(self.row(row)?.to_vec())),
            Index::Rows(selector) => {
                let rows = resolve_rows(&selector, self.len())?;
                Ok(Selection::Ragged(self.select_rows(&rows)))
            }
            Index::Pair(rows, cols) => match self.resolve_pair(&rows, &cols)? {
                Resolved::Row(offsets) => Ok(Selection::Row(self.storage.gather(&offsets))),
                Resolved::Ragged {
                    offsets,
                    new_lengths,
                } => Ok(Selection::Ragged(
                    self.wrap(self.storage.gather(&offsets), new_lengths),
                )),
                Resolved::Elements(offsets) => {
                    Ok(Selection::Values(self.storage.gather(&offsets)))
                }
            },
            Index::Mask(mask) => {
                let offsets = self.mask_offsets(&mask)?;
                Ok(Selection::Values(self.storage.gather(&offsets)))
            }
        }
    }

    /// Write `values` into the elements addressed by `index`.
    ///
    /// Selecting rows only replaces whole rows and rebuilds the layout.
    /// Every other form writes into existing elements and leaves the lengths
    /// untouched; nested values written through a column slice are clipped
    /// to each row's existing width.
    pub fn set<I: Into<Index>>(&mut self, index: I, values: Values<T>) -> Result<()> {
        let index = index.into();
        log::trace!("set {:?}", index);
        match index {
            Index::Rows(selector) => {
                let rows = resolve_rows(&selector, self.len())?;
                self.replace_rows(&rows, values)
            }
            Index::Pair(rows, cols) => match self.resolve_pair(&rows, &cols)? {
                Resolved::Row(offsets) | Resolved::Elements(offsets) => {
                    self.write_offsets(&offsets, values)
                }
                Resolved::Ragged {
                    offsets,
                    new_lengths,
                } => self.write_clipped(&offsets, &new_lengths, values),
            },
            Index::Mask(mask) => {
                let offsets = self.mask_offsets(&mask)?;
                self.write_offsets(&offsets, values)
            }
        }
    }

    fn write_offsets(&mut self, offsets: &[usize], values: Values<T>) -> Result<()> {
        match values {
            Values::Scalar(value) => self.storage.fill(offsets, &value),
            Values::Flat(flat) => self.storage.scatter(offsets, &flat),
            Values::Nested(rows) => {
                let flat: Vec<T> = rows.into_iter().flatten().collect();
                self.storage.scatter(offsets, &flat)
            }
            Values::Ragged(array) => self.storage.scatter(offsets, array.flat()),
        }
    }

    fn write_clipped(
        &mut self,
        offsets: &[usize],
        new_lengths: &[usize],
        values: Values<T>,
    ) -> Result<()> {
        let rows = match values {
            Values::Nested(rows) => rows,
            Values::Ragged(array) => array.to_vecs(),
            other => return self.write_offsets(offsets, other),
        };
        if rows.len() != new_lengths.len() {
            return Err(RaggedError::invalid(format!(
                "expected {} rows of values, got {}",
                new_lengths.len(),
                rows.len()
            )));
        }
        let stride = self.storage.stride();
        let mut flat = Vec::with_capacity(offsets.len() * stride);
        for (i, (row, &len)) in rows.iter().zip(new_lengths).enumerate() {
            let needed = len * stride;
            if row.len() < needed {
                return Err(RaggedError::invalid(format!(
                    "row {} of values has {} entries but {} are addressed",
                    i,
                    row.len(),
                    needed
                )));
            }
            flat.extend_from_slice(&row[..needed]);
        }
        self.storage.scatter(offsets, &flat)
    }

    fn replace_rows(&mut self, selected: &[usize], values: Values<T>) -> Result<()> {
        let mut rows = self.to_vecs();
        match values {
            Values::Scalar(value) => {
                for &r in selected {
                    rows[r].iter_mut().for_each(|v| *v = value.clone());
                }
            }
            Values::Flat(row) => {
                for &r in selected {
                    rows[r] = row.clone();
                }
            }
            Values::Nested(replacements) => self.assign_rows(&mut rows, selected, replacements)?,
            Values::Ragged(array) => {
                if array.width() != self.width() {
                    return Err(RaggedError::invalid(format!(
                        "cannot assign rows of width {:?} into an array of width {:?}",
                        array.width(),
                        self.width()
                    )));
                }
                self.assign_rows(&mut rows, selected, array.to_vecs())?
            }
        }

        let stride = self.storage.stride();
        let mut lengths = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() % stride != 0 {
                return Err(RaggedError::invalid(format!(
                    "row {} has {} values, not a multiple of the trailing width {}",
                    i,
                    row.len(),
                    stride
                )));
            }
            lengths.push(row.len() / stride);
        }
        let data: Vec<T> = rows.into_iter().flatten().collect();
        self.storage = FlatStorage::from_parts(data, self.storage.width())?;
        self.index = LengthIndex::new(lengths);
        self.rebuild()
    }

    fn assign_rows(
        &self,
        rows: &mut [Vec<T>],
        selected: &[usize],
        replacements: Vec<Vec<T>>,
    ) -> Result<()> {
        if replacements.len() == selected.len() {
            for (&r, replacement) in selected.iter().zip(replacements) {
                rows[r] = replacement;
            }
        } else if replacements.len() == 1 {
            for &r in selected {
                rows[r] = replacements[0].clone();
            }
        } else {
            return Err(RaggedError::invalid(format!(
                "cannot assign {} rows to {} selected rows",
                replacements.len(),
                selected.len()
            )));
        }
        Ok(())
    }

    /// Append rows. A bare scalar is rejected; flat values always add
    /// exactly one row, even when empty. Appending to an array with no rows
    /// is otherwise the same as building from `values`.
    pub fn append<I: Into<RowInput<T>>>(&mut self, values: I) -> Result<()> {
        let incoming = match values.into() {
            RowInput::Scalar(_) => {
                return Err(RaggedError::invalid(
                    "Expected an array of values or a ragged array",
                ))
            }
            RowInput::Flat(row) => {
                let len = row.len();
                Self::from_trusted(FlatStorage::from_vec(row), LengthIndex::new(vec![len]))
            }
            other => Self::build(other)?,
        };
        if self.is_empty() {
            *self = incoming;
            return Ok(());
        }

        let lengths: Vec<usize> = match (incoming.width(), self.width()) {
            (None, None) => incoming.lengths().to_vec(),
            (None, Some(width)) => {
                // raw values: each row must hold whole elements
                let mut lengths = Vec::with_capacity(incoming.len());
                for row in incoming.rows() {
                    if row.len() % width != 0 {
                        return Err(RaggedError::invalid(format!(
                            "appended row of {} values is not a multiple of the trailing width {}",
                            row.len(),
                            width
                        )));
                    }
                    lengths.push(row.len() / width);
                }
                lengths
            }
            (theirs, ours) if theirs == ours => incoming.lengths().to_vec(),
            (theirs, ours) => {
                return Err(RaggedError::invalid(format!(
                    "cannot append elements of width {:?} to an array of width {:?}",
                    theirs, ours
                )))
            }
        };
        self.storage.extend_from_slice(incoming.flat())?;
        self.index.extend(&lengths);
        self.rebuild()
    }

    /// Append a single row.
    pub fn push_row(&mut self, row: Vec<T>) -> Result<()> {
        self.append(RowInput::Flat(row))
    }
}

impl<T: Clone> From<Array2<T>> for RaggedArray<T> {
    fn from(array: Array2<T>) -> Self {
        let (rows, cols) = array.dim();
        let data: Vec<T> = array.iter().cloned().collect();
        Self::from_trusted(FlatStorage::from_vec(data), LengthIndex::new(vec![cols; rows]))
    }
}

impl<T> From<Vec<Vec<T>>> for RaggedArray<T> {
    fn from(rows: Vec<Vec<T>>) -> Self {
        Self::from_rows(rows)
    }
}

/// Entries must be uniformly rows or uniformly scalars.
fn ensure_ragged_data<T>(entries: &[Entry<T>]) -> Result<()> {
    for (i, pair) in entries.windows(2).enumerate() {
        if pair[0].is_row() != pair[1].is_row() {
            return Err(RaggedError::invalid(format!(
                "The array elements in the input are not consistent (entries {} and {}).",
                i,
                i + 1
            )));
        }
    }
    Ok(())
}
