use std::fmt::Debug;

use crate::error::{MatmulError, Result};
use crate::view::{MatrixView, MatrixViewMut};

/// Trait for pluggable multiply engines (host loop, accelerator, ...).
///
/// Every engine computes the same thing with 32-bit wrapping arithmetic, so
/// outputs of different engines can be compared bit for bit.
pub trait MultiplyEngine: Send + Sync + Debug {
    /// Returns the name of this engine (e.g., "cpu", "accelerator").
    fn name(&self) -> &str;

    /// Matrix multiplication: C = A @ B.
    ///
    /// - `a`: view of shape [m, w]
    /// - `b`: view of shape [w, n]
    /// - `c`: view of shape [m, n]; every element is overwritten
    ///
    /// When this returns `Ok`, `c` holds the result and is readable on the host.
    fn multiply(
        &self,
        a: &MatrixView<'_>,
        b: &MatrixView<'_>,
        c: &mut MatrixViewMut<'_>,
    ) -> Result<()>;
}

/// Checks that `a @ b` fits into `c` and returns `(m, w, n)`.
pub fn check_operands(
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    c: &MatrixViewMut<'_>,
) -> Result<(usize, usize, usize)> {
    let (m, w) = (a.rows(), a.cols());
    let (w2, n) = (b.rows(), b.cols());
    if w != w2 || c.rows() != m || c.cols() != n {
        return Err(MatmulError::MatmulMismatch {
            m,
            k: w,
            k2: w2,
            n,
            out_rows: c.rows(),
            out_cols: c.cols(),
        });
    }
    Ok((m, w, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_operands_ok() {
        let a = vec![0; 6];
        let b = vec![0; 12];
        let mut c = vec![0; 8];
        let av = MatrixView::new((2, 3), &a).unwrap();
        let bv = MatrixView::new((3, 4), &b).unwrap();
        let cv = MatrixViewMut::new((2, 4), &mut c).unwrap();
        assert_eq!(check_operands(&av, &bv, &cv).unwrap(), (2, 3, 4));
    }

    #[test]
    fn test_check_operands_inner_mismatch() {
        let a = vec![0; 6];
        let b = vec![0; 8];
        let mut c = vec![0; 8];
        let av = MatrixView::new((2, 3), &a).unwrap();
        let bv = MatrixView::new((2, 4), &b).unwrap();
        let cv = MatrixViewMut::new((2, 4), &mut c).unwrap();
        assert!(matches!(
            check_operands(&av, &bv, &cv),
            Err(MatmulError::MatmulMismatch { k: 3, k2: 2, .. })
        ));
    }

    #[test]
    fn test_check_operands_output_mismatch() {
        let a = vec![0; 4];
        let b = vec![0; 4];
        let mut c = vec![0; 4];
        let av = MatrixView::new((2, 2), &a).unwrap();
        let bv = MatrixView::new((2, 2), &b).unwrap();
        let cv = MatrixViewMut::new((4, 1), &mut c).unwrap();
        assert!(check_operands(&av, &bv, &cv).is_err());
    }
}
