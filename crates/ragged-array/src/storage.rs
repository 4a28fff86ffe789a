//! Contiguous element buffer backing a ragged array.
//!
//! An element is either a single value or, when a trailing width is set, a
//! fixed-width run of values. All offsets handled here are element offsets.
use std::ops::Range;

use crate::error::{RaggedError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct FlatStorage<T> {
    data: Vec<T>,
    width: Option<usize>,
}

impl<T> FlatStorage<T> {
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data, width: None }
    }

    /// Storage whose elements are `width`-long vectors.
    pub fn with_width(data: Vec<T>, width: usize) -> Result<Self> {
        if width == 0 {
            return Err(RaggedError::invalid("trailing width must be at least 1"));
        }
        if data.len() % width != 0 {
            return Err(RaggedError::invalid(format!(
                "buffer of length {} is not divisible by trailing width {}",
                data.len(),
                width
            )));
        }
        Ok(Self {
            data,
            width: Some(width),
        })
    }

    pub(crate) fn from_parts(data: Vec<T>, width: Option<usize>) -> Result<Self> {
        match width {
            Some(w) => Self::with_width(data, w),
            None => Ok(Self::from_vec(data)),
        }
    }

    /// The caller guarantees `data.len()` is a multiple of `width`.
    pub(crate) fn trusted(data: Vec<T>, width: Option<usize>) -> Self {
        Self { data, width }
    }

    pub fn width(&self) -> Option<usize> {
        self.width
    }

    /// Number of values per element.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width.unwrap_or(1)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len() / self.stride()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    #[inline]
    fn span(&self, elements: Range<usize>) -> Range<usize> {
        let stride = self.stride();
        elements.start * stride..elements.end * stride
    }

    /// Values of the elements in `elements`, as a borrowed view.
    pub fn range(&self, elements: Range<usize>) -> &[T] {
        let span = self.span(elements);
        &self.data[span]
    }

    pub fn range_mut(&mut self, elements: Range<usize>) -> &mut [T] {
        let span = self.span(elements);
        &mut self.data[span]
    }

    pub fn element(&self, offset: usize) -> &[T] {
        self.range(offset..offset + 1)
    }

    pub fn mapv<U, F>(&self, mut f: F) -> FlatStorage<U>
    where
        F: FnMut(&T) -> U,
    {
        FlatStorage {
            data: self.data.iter().map(|v| f(v)).collect(),
            width: self.width,
        }
    }

    /// Combine with another buffer of the same value count.
    pub fn zip_map<U, F>(&self, other: &[T], mut f: F) -> Result<FlatStorage<U>>
    where
        F: FnMut(&T, &T) -> U,
    {
        if other.len() != self.data.len() {
            return Err(RaggedError::invalid(format!(
                "operand of length {} does not match buffer of length {}",
                other.len(),
                self.data.len()
            )));
        }
        Ok(FlatStorage {
            data: self.data.iter().zip(other.iter()).map(|(a, b)| f(a, b)).collect(),
            width: self.width,
        })
    }

    pub(crate) fn check_offsets(&self, offsets: &[usize]) -> Result<()> {
        let len = self.len();
        match offsets.iter().find(|&&o| o >= len) {
            Some(&bad) => Err(RaggedError::invalid(format!(
                "flat offset {} is outside a buffer of {} elements",
                bad, len
            ))),
            None => Ok(()),
        }
    }
}

impl<T: Clone> FlatStorage<T> {
    /// Copy out the elements at `offsets`, in order.
    pub fn gather(&self, offsets: &[usize]) -> Vec<T> {
        let mut values = Vec::with_capacity(offsets.len() * self.stride());
        for &offset in offsets {
            values.extend_from_slice(self.element(offset));
        }
        values
    }

    /// Write `values` into the elements at `offsets`.
    ///
    /// `values` holds either one element per offset or exactly one element,
    /// which is then broadcast to every offset.
    pub fn scatter(&mut self, offsets: &[usize], values: &[T]) -> Result<()> {
        self.check_offsets(offsets)?;
        let stride = self.stride();
        if values.len() == offsets.len() * stride {
            for (chunk, &offset) in values.chunks(stride).zip(offsets) {
                self.range_mut(offset..offset + 1).clone_from_slice(chunk);
            }
        } else if values.len() == stride {
            for &offset in offsets {
                self.range_mut(offset..offset + 1).clone_from_slice(values);
            }
        } else {
            return Err(RaggedError::invalid(format!(
                "cannot assign {} values to {} elements of width {}",
                values.len(),
                offsets.len(),
                stride
            )));
        }
        Ok(())
    }

    /// Set every value of the elements at `offsets` to `value`.
    pub fn fill(&mut self, offsets: &[usize], value: &T) -> Result<()> {
        self.check_offsets(offsets)?;
        for &offset in offsets {
            self.range_mut(offset..offset + 1)
                .iter_mut()
                .for_each(|v| *v = value.clone());
        }
        Ok(())
    }

    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<()> {
        if values.len() % self.stride() != 0 {
            return Err(RaggedError::invalid(format!(
                "cannot append {} values to a buffer of width {}",
                values.len(),
                self.stride()
            )));
        }
        self.data.extend_from_slice(values);
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_elements() {
        let s = FlatStorage::from_vec(vec![1, 2, 3, 4]);
        assert_eq!(s.len(), 4);
        assert_eq!(s.stride(), 1);
        assert_eq!(s.gather(&[3, 0, 0]), vec![4, 1, 1]);
    }

    #[test]
    fn vector_elements() {
        let s = FlatStorage::with_width(vec![1, 2, 3, 4, 5, 6], 2).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.element(1), &[3, 4]);
        assert_eq!(s.range(1..3), &[3, 4, 5, 6]);
        assert_eq!(s.gather(&[2, 0]), vec![5, 6, 1, 2]);
    }

    #[test]
    fn width_must_divide_buffer() {
        assert!(FlatStorage::with_width(vec![1, 2, 3], 2).is_err());
        assert!(FlatStorage::with_width(vec![1, 2], 0).is_err());
    }

    #[test]
    fn scatter_per_element_and_broadcast() {
        let mut s = FlatStorage::with_width(vec![0; 6], 2).unwrap();
        s.scatter(&[0, 2], &[1, 2, 5, 6]).unwrap();
        assert_eq!(s.as_slice(), &[1, 2, 0, 0, 5, 6]);
        s.scatter(&[1], &[9, 9]).unwrap();
        assert_eq!(s.as_slice(), &[1, 2, 9, 9, 5, 6]);
        assert!(s.scatter(&[0, 1], &[1, 2, 3]).is_err());
        assert!(s.scatter(&[3], &[1, 2]).is_err());
    }

    #[test]
    fn fill_offsets() {
        let mut s = FlatStorage::from_vec(vec![1, 2, 3]);
        s.fill(&[0, 2], &7).unwrap();
        assert_eq!(s.as_slice(), &[7, 2, 7]);
    }
}
