use crate::engine::MultiplyEngine;
use crate::error::{MatmulError, Result};
use crate::extent::{Extent, Index2};
use crate::view::{MatrixView, MatrixViewMut};

/// An owned row-major `i32` matrix: the buffer views are built over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    data: Vec<i32>,
    extent: Extent,
}

impl Matrix {
    /// Create a matrix from row-major data and an extent.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if `data.len()` does not match the extent.
    pub fn new(data: Vec<i32>, extent: impl Into<Extent>) -> Result<Self> {
        let extent = extent.into();
        if extent.checked_numel() != Some(data.len()) {
            return Err(MatmulError::ShapeMismatch {
                rows: extent.rows(),
                cols: extent.cols(),
                len: data.len(),
            });
        }
        Ok(Matrix { data, extent })
    }

    /// Create a zero-filled matrix.
    ///
    /// # Errors
    /// Returns `ExtentOverflow` if `rows * cols` does not fit in `usize`.
    pub fn zeros(extent: impl Into<Extent>) -> Result<Self> {
        let extent = extent.into();
        let len = extent
            .checked_numel()
            .ok_or(MatmulError::ExtentOverflow {
                rows: extent.rows(),
                cols: extent.cols(),
            })?;
        Ok(Matrix {
            data: vec![0; len],
            extent,
        })
    }

    /// Create a matrix whose element at each position is `f(index)`.
    pub fn from_fn(extent: impl Into<Extent>, f: impl FnMut(Index2) -> i32) -> Self {
        let extent = extent.into();
        let data = extent.indices().map(f).collect();
        Matrix { data, extent }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.data
    }

    pub fn view(&self) -> MatrixView<'_> {
        MatrixView::from_parts(self.extent, &self.data)
    }

    pub fn view_mut(&mut self) -> MatrixViewMut<'_> {
        MatrixViewMut::from_parts(self.extent, &mut self.data)
    }

    /// Reinterpret the same data with a different extent.
    pub fn reshape(self, extent: impl Into<Extent>) -> Result<Matrix> {
        Matrix::new(self.data, extent)
    }

    /// `self @ other` computed by `engine`.
    ///
    /// self is [m, w], other is [w, n], result is [m, n].
    pub fn matmul(&self, other: &Matrix, engine: &dyn MultiplyEngine) -> Result<Matrix> {
        let mut out = Matrix::zeros((self.extent.rows(), other.extent.cols()))?;
        engine.multiply(&self.view(), &other.view(), &mut out.view_mut())?;
        Ok(out)
    }
}
