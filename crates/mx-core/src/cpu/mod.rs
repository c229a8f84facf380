pub mod matmul;

use tracing::trace;

use crate::engine::{check_operands, MultiplyEngine};
use crate::error::Result;
use crate::view::{MatrixView, MatrixViewMut};

/// Single-threaded host engine.
///
/// A straightforward triple loop optimized for correctness rather than peak
/// performance. Intended as the reference the accelerator is checked against.
#[derive(Debug, Clone)]
pub struct CpuEngine;

impl CpuEngine {
    pub fn new() -> Self {
        CpuEngine
    }
}

impl Default for CpuEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiplyEngine for CpuEngine {
    fn name(&self) -> &str {
        "cpu"
    }

    fn multiply(
        &self,
        a: &MatrixView<'_>,
        b: &MatrixView<'_>,
        c: &mut MatrixViewMut<'_>,
    ) -> Result<()> {
        let (m, w, n) = check_operands(a, b, c)?;
        trace!(m, w, n, "cpu multiply");
        matmul::matmul_naive(a.as_slice(), b.as_slice(), c.as_mut_slice(), m, w, n);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatmulError;

    fn run(a: &[i32], b: &[i32], m: usize, w: usize, n: usize) -> Vec<i32> {
        let mut c = vec![0; m * n];
        let av = MatrixView::new((m, w), a).unwrap();
        let bv = MatrixView::new((w, n), b).unwrap();
        let mut cv = MatrixViewMut::new((m, n), &mut c).unwrap();
        CpuEngine::new().multiply(&av, &bv, &mut cv).unwrap();
        c
    }

    #[test]
    fn test_multiply_identity() {
        // 2x2 identity @ [1,2;3,4]
        let c = run(&[1, 0, 0, 1], &[1, 2, 3, 4], 2, 2, 2);
        assert_eq!(c, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_multiply_basic() {
        // [1,2;3,4] @ [5,6;7,8] = [19,22;43,50]
        let c = run(&[1, 2, 3, 4], &[5, 6, 7, 8], 2, 2, 2);
        assert_eq!(c, vec![19, 22, 43, 50]);
    }

    #[test]
    fn test_multiply_dot_product() {
        let c = run(&[1, 2, 3], &[4, 5, 6], 1, 3, 1);
        assert_eq!(c, vec![32]);
    }

    #[test]
    fn test_multiply_rectangular() {
        // [2x3] @ [3x2]
        let c = run(&[1, 2, 3, 4, 5, 6], &[7, 8, 9, 10, 11, 12], 2, 3, 2);
        assert_eq!(c, vec![58, 64, 139, 154]);
    }

    #[test]
    fn test_multiply_zero_rows() {
        let c = run(&[], &[1, 2, 3, 4], 0, 2, 2);
        assert!(c.is_empty());
    }

    #[test]
    fn test_multiply_mismatch() {
        let a = vec![1, 2, 3];
        let b = vec![1, 2, 3, 4];
        let mut c = vec![0; 2];
        let av = MatrixView::new((1, 3), &a).unwrap();
        let bv = MatrixView::new((2, 2), &b).unwrap();
        let mut cv = MatrixViewMut::new((1, 2), &mut c).unwrap();
        let err = CpuEngine::new().multiply(&av, &bv, &mut cv).unwrap_err();
        assert!(matches!(err, MatmulError::MatmulMismatch { .. }));
    }

    #[test]
    fn test_name() {
        assert_eq!(CpuEngine::new().name(), "cpu");
    }
}
