//! Index expressions accepted by [`RaggedArray::get`](crate::RaggedArray::get)
//! and [`RaggedArray::set`](crate::RaggedArray::set).
//!
//! The kind of every selector is decided when the expression is built, so the
//! translation code never has to guess whether something is a row or a scalar.
use std::fmt;
use std::str::FromStr;

use crate::error::{RaggedError, Result};

/// A `start:stop:step` slice. Absent fields take numpy defaults; negative
/// `start`/`stop` count from the end of the axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SliceSpec {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl SliceSpec {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// `:`
    pub fn full() -> Self {
        Self::default()
    }

    /// `start:stop`
    pub fn range(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop), None)
    }

    /// `start:`
    pub fn start_at(start: isize) -> Self {
        Self::new(Some(start), None, None)
    }

    /// `:stop`
    pub fn stop_at(stop: isize) -> Self {
        Self::new(None, Some(stop), None)
    }

    /// `::-1`
    pub fn reversed() -> Self {
        Self::new(None, None, Some(-1))
    }

    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }
}

impl fmt::Display for SliceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = |v: Option<isize>| v.map(|x| x.to_string()).unwrap_or_default();
        write!(f, "{}:{}", field(self.start), field(self.stop))?;
        if let Some(step) = self.step {
            write!(f, ":{}", step)?;
        }
        Ok(())
    }
}

impl FromStr for SliceSpec {
    type Err = RaggedError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(RaggedError::invalid(format!("'{}' is not a slice", s)));
        }
        let field = |text: &str| -> Result<Option<isize>> {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse::<isize>()
                    .map(Some)
                    .map_err(|_| RaggedError::invalid(format!("'{}' is not an integer", text)))
            }
        };
        Ok(SliceSpec {
            start: field(parts[0])?,
            stop: field(parts[1])?,
            step: match parts.get(2) {
                Some(text) => field(text)?,
                None => None,
            },
        })
    }
}

/// One side of an index expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    Scalar(isize),
    List(Vec<isize>),
    Slice(SliceSpec),
    Mask(Vec<bool>),
}

impl Selector {
    pub fn scalar(index: isize) -> Self {
        Selector::Scalar(index)
    }

    pub fn list<I: IntoIterator<Item = isize>>(indices: I) -> Self {
        Selector::List(indices.into_iter().collect())
    }

    pub fn slice(spec: SliceSpec) -> Self {
        Selector::Slice(spec)
    }

    pub fn mask<I: IntoIterator<Item = bool>>(mask: I) -> Self {
        Selector::Mask(mask.into_iter().collect())
    }

    pub fn is_slice(&self) -> bool {
        matches!(self, Selector::Slice(_))
    }
}

impl From<isize> for Selector {
    fn from(index: isize) -> Self {
        Selector::Scalar(index)
    }
}

impl From<Vec<isize>> for Selector {
    fn from(indices: Vec<isize>) -> Self {
        Selector::List(indices)
    }
}

impl From<SliceSpec> for Selector {
    fn from(spec: SliceSpec) -> Self {
        Selector::Slice(spec)
    }
}

impl From<Vec<bool>> for Selector {
    fn from(mask: Vec<bool>) -> Self {
        Selector::Mask(mask)
    }
}

/// Parses the numpy spellings `3`, `-1`, `0,2,5`, `1:`, `::-1` and `:`.
impl FromStr for Selector {
    type Err = RaggedError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.contains(':') {
            return Ok(Selector::Slice(s.parse()?));
        }
        if s.contains(',') {
            let indices = s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| {
                    t.parse::<isize>()
                        .map_err(|_| RaggedError::invalid(format!("'{}' is not an integer", t)))
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(Selector::List(indices));
        }
        s.parse::<isize>()
            .map(Selector::Scalar)
            .map_err(|_| RaggedError::invalid(format!("'{}' is not a valid selector", s)))
    }
}

/// A boolean mask with its own ragged layout, typically the result of an
/// elementwise comparison on a ragged array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskIndex {
    values: Vec<bool>,
    lengths: Vec<usize>,
}

impl MaskIndex {
    pub fn new(values: Vec<bool>, lengths: Vec<usize>) -> Result<Self> {
        let total: usize = lengths.iter().sum();
        if total != values.len() {
            return Err(RaggedError::invalid(format!(
                "mask of {} values cannot be partitioned by lengths summing to {}",
                values.len(),
                total
            )));
        }
        Ok(Self { values, lengths })
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }
}

/// A complete index expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Index {
    /// Select along the first axis only.
    Rows(Selector),
    /// `(row_selector, column_selector)`.
    Pair(Selector, Selector),
    /// Ragged boolean mask.
    Mask(MaskIndex),
}

impl Index {
    /// A single row.
    pub fn row(row: isize) -> Self {
        Index::Rows(Selector::Scalar(row))
    }

    pub fn rows<S: Into<Selector>>(rows: S) -> Self {
        Index::Rows(rows.into())
    }

    /// A single element.
    pub fn at(row: isize, col: isize) -> Self {
        Index::Pair(Selector::Scalar(row), Selector::Scalar(col))
    }

    pub fn pair<R: Into<Selector>, C: Into<Selector>>(rows: R, cols: C) -> Self {
        Index::Pair(rows.into(), cols.into())
    }
}

impl From<Selector> for Index {
    fn from(selector: Selector) -> Self {
        Index::Rows(selector)
    }
}

impl From<(Selector, Selector)> for Index {
    fn from((rows, cols): (Selector, Selector)) -> Self {
        Index::Pair(rows, cols)
    }
}

impl From<MaskIndex> for Index {
    fn from(mask: MaskIndex) -> Self {
        Index::Mask(mask)
    }
}
