//! Non-owning 2-D views over flat `i32` buffers.
//!
//! A view is an `(extent, borrowed buffer)` pair. It never copies or resizes
//! the buffer, and the borrow ties its lifetime to the caller's scope. Read
//! views are `Copy` and may alias freely; a write view holds the only
//! borrow of its buffer until it is dropped.

use crate::error::{MatmulError, Result};
use crate::extent::{Extent, Index2};

fn check_len(extent: Extent, len: usize) -> Result<()> {
    match extent.checked_numel() {
        Some(n) if n == len => Ok(()),
        _ => Err(MatmulError::ShapeMismatch {
            rows: extent.rows(),
            cols: extent.cols(),
            len,
        }),
    }
}

/// Read-only view of a row-major matrix.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    extent: Extent,
    data: &'a [i32],
}

impl<'a> MatrixView<'a> {
    /// Bind `data` to `extent`.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if `rows * cols != data.len()`.
    pub fn new(extent: impl Into<Extent>, data: &'a [i32]) -> Result<Self> {
        let extent = extent.into();
        check_len(extent, data.len())?;
        Ok(MatrixView { extent, data })
    }

    /// Caller guarantees `rows * cols == data.len()`.
    pub(crate) fn from_parts(extent: Extent, data: &'a [i32]) -> Self {
        debug_assert_eq!(extent.checked_numel(), Some(data.len()));
        MatrixView { extent, data }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn rows(&self) -> usize {
        self.extent.rows()
    }

    pub fn cols(&self) -> usize {
        self.extent.cols()
    }

    /// Element at (`row`, `col`).
    ///
    /// Bounds are the caller's responsibility: an index outside the extent
    /// either panics or reads a neighbouring row.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> i32 {
        self.data[self.extent.offset(Index2::new(row, col))]
    }

    pub fn as_slice(&self) -> &'a [i32] {
        self.data
    }
}

/// Write view of a row-major matrix.
///
/// Carries a "discard previous contents" hint which lets an accelerator skip
/// uploading data that is about to be overwritten.
#[derive(Debug)]
pub struct MatrixViewMut<'a> {
    extent: Extent,
    data: &'a mut [i32],
    discard: bool,
}

impl<'a> MatrixViewMut<'a> {
    /// Bind `data` to `extent` for writing.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if `rows * cols != data.len()`; `data` is left untouched.
    pub fn new(extent: impl Into<Extent>, data: &'a mut [i32]) -> Result<Self> {
        let extent = extent.into();
        check_len(extent, data.len())?;
        Ok(MatrixViewMut {
            extent,
            data,
            discard: false,
        })
    }

    /// Caller guarantees `rows * cols == data.len()`.
    pub(crate) fn from_parts(extent: Extent, data: &'a mut [i32]) -> Self {
        debug_assert_eq!(extent.checked_numel(), Some(data.len()));
        MatrixViewMut {
            extent,
            data,
            discard: false,
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn rows(&self) -> usize {
        self.extent.rows()
    }

    pub fn cols(&self) -> usize {
        self.extent.cols()
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> i32 {
        self.data[self.extent.offset(Index2::new(row, col))]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        let offset = self.extent.offset(Index2::new(row, col));
        self.data[offset] = value;
    }

    /// Hint that every element will be overwritten before it is read.
    pub fn discard_data(&mut self) {
        self.discard = true;
    }

    pub fn is_discarded(&self) -> bool {
        self.discard
    }

    /// Host-only views have nothing pending; returns the contents as-is.
    pub fn synchronize(&mut self) -> Result<&[i32]> {
        Ok(&*self.data)
    }

    pub fn as_slice(&self) -> &[i32] {
        &*self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut *self.data
    }

    /// Read-only view of the same buffer, borrowed from this one.
    pub fn as_view(&self) -> MatrixView<'_> {
        MatrixView {
            extent: self.extent,
            data: &*self.data,
        }
    }

    /// A shorter-lived write view over the same buffer.
    pub fn reborrow(&mut self) -> MatrixViewMut<'_> {
        MatrixViewMut {
            extent: self.extent,
            data: &mut *self.data,
            discard: self.discard,
        }
    }

    /// Split into extent and buffer.
    pub fn into_parts(self) -> (Extent, &'a mut [i32]) {
        (self.extent, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_at() {
        let data = vec![1, 2, 3, 4, 5, 6];
        let v = MatrixView::new((2, 3), &data).unwrap();
        assert_eq!(v.at(0, 0), 1);
        assert_eq!(v.at(1, 2), 6);
        assert_eq!(v.at(1, 0), 4);
    }

    #[test]
    fn test_view_shape_mismatch() {
        let data = vec![1, 2, 3];
        let err = MatrixView::new((2, 2), &data).unwrap_err();
        assert_eq!(
            err,
            MatmulError::ShapeMismatch {
                rows: 2,
                cols: 2,
                len: 3
            }
        );
    }

    #[test]
    fn test_view_mut_mismatch_leaves_buffer() {
        let mut data = vec![7, 8, 9];
        assert!(MatrixViewMut::new((1, 2), &mut data).is_err());
        assert_eq!(data, vec![7, 8, 9]);
    }

    #[test]
    fn test_overflowing_shape_rejected() {
        let data = vec![0; 4];
        assert!(MatrixView::new((usize::MAX, 2), &data).is_err());
    }

    #[test]
    fn test_view_mut_set_and_sync() {
        let mut data = vec![0; 4];
        let mut v = MatrixViewMut::new((2, 2), &mut data).unwrap();
        v.set(1, 0, 42);
        v.discard_data();
        assert!(v.is_discarded());
        assert_eq!(v.synchronize().unwrap(), &[0, 0, 42, 0]);
        assert_eq!(v.synchronize().unwrap(), &[0, 0, 42, 0]);
        drop(v);
        assert_eq!(data[2], 42);
    }

    #[test]
    fn test_empty_view() {
        let data: Vec<i32> = vec![];
        let v = MatrixView::new((0, 5), &data).unwrap();
        assert_eq!(v.rows(), 0);
        assert!(v.extent().is_empty());
    }

    #[test]
    fn test_aliasing_read_views() {
        let data = vec![1, 2, 3, 4];
        let a = MatrixView::new((2, 2), &data).unwrap();
        let b = MatrixView::new((4, 1), &data).unwrap();
        assert_eq!(a.at(1, 1), b.at(3, 0));
    }
}
