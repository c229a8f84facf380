use tracing::debug;

use crate::accel::accelerator::Accelerator;
use crate::accel::array_view::{ArrayView, ArrayViewMut};
use crate::engine::{check_operands, MultiplyEngine};
use crate::error::Result;
use crate::view::{MatrixView, MatrixViewMut};

/// Multiply engine that fans out one unit of work per output element.
///
/// Each unit reduces row `row` of A against column `col` of B with the same
/// wrapping arithmetic as [`CpuEngine`](crate::cpu::CpuEngine) and writes
/// only its own slot of C.
#[derive(Debug, Clone)]
pub struct AcceleratorEngine {
    accelerator: Accelerator,
}

impl AcceleratorEngine {
    pub fn new(accelerator: Accelerator) -> Self {
        AcceleratorEngine { accelerator }
    }

    pub fn accelerator(&self) -> &Accelerator {
        &self.accelerator
    }
}

impl MultiplyEngine for AcceleratorEngine {
    fn name(&self) -> &str {
        "accelerator"
    }

    fn multiply(
        &self,
        a: &MatrixView<'_>,
        b: &MatrixView<'_>,
        c: &mut MatrixViewMut<'_>,
    ) -> Result<()> {
        let (_, w, _) = check_operands(a, b, c)?;

        let a = ArrayView::new(&self.accelerator, *a)?;
        let b = ArrayView::new(&self.accelerator, *b)?;
        let mut out = ArrayViewMut::new(&self.accelerator, c.reborrow());
        out.discard_data();

        debug!(device = %self.accelerator.path(), "beginning accelerator calc");
        self.accelerator.parallel_for_each(&mut out, |idx| {
            let mut sum = 0i32;
            for k in 0..w {
                sum = sum.wrapping_add(a.at(idx.row, k).wrapping_mul(b.at(k, idx.col)));
            }
            sum
        })?;
        out.synchronize()?;
        debug!(device = %self.accelerator.path(), "finished accelerator calc");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accel::device::{Capabilities, DeviceDescriptor};
    use crate::error::MatmulError;

    fn engine(shared: bool, mb: usize) -> AcceleratorEngine {
        let descriptor = DeviceDescriptor::new("test", "test\\engine", 4)
            .with_dedicated_memory_mb(mb)
            .with_capabilities(Capabilities {
                host_shared_memory: shared,
                ..Capabilities::default()
            });
        AcceleratorEngine::new(Accelerator::new(descriptor).unwrap())
    }

    fn run(engine: &AcceleratorEngine, a: &[i32], b: &[i32], m: usize, w: usize, n: usize) -> Vec<i32> {
        let mut c = vec![-1; m * n];
        let av = MatrixView::new((m, w), a).unwrap();
        let bv = MatrixView::new((w, n), b).unwrap();
        let mut cv = MatrixViewMut::new((m, n), &mut c).unwrap();
        engine.multiply(&av, &bv, &mut cv).unwrap();
        c
    }

    #[test]
    fn test_multiply_basic() {
        for shared in [true, false] {
            let e = engine(shared, 0);
            assert_eq!(run(&e, &[1, 2, 3, 4], &[5, 6, 7, 8], 2, 2, 2), vec![19, 22, 43, 50]);
        }
    }

    #[test]
    fn test_multiply_dot_product() {
        let e = engine(false, 0);
        assert_eq!(run(&e, &[1, 2, 3], &[4, 5, 6], 1, 3, 1), vec![32]);
    }

    #[test]
    fn test_multiply_zero_rows() {
        let e = engine(true, 0);
        assert!(run(&e, &[], &[1, 2], 0, 1, 2).is_empty());
    }

    #[test]
    fn test_multiply_wraps() {
        let e = engine(true, 0);
        assert_eq!(run(&e, &[i32::MAX, 1], &[2, 2], 1, 2, 1), vec![0]);
    }

    #[test]
    fn test_staged_memory_released() {
        let e = engine(false, 1);
        run(&e, &[1, 2, 3, 4], &[5, 6, 7, 8], 2, 2, 2);
        assert_eq!(e.accelerator().bytes_in_use(), 0);
    }

    #[test]
    fn test_out_of_device_memory() {
        let e = engine(false, 1);
        let a = vec![1; 300_000];
        let b = vec![1; 300_000];
        let mut c = vec![0; 1];
        let av = MatrixView::new((1, 300_000), &a).unwrap();
        let bv = MatrixView::new((300_000, 1), &b).unwrap();
        let mut cv = MatrixViewMut::new((1, 1), &mut c).unwrap();
        let err = e.multiply(&av, &bv, &mut cv).unwrap_err();
        assert!(matches!(err, MatmulError::DeviceExecution { .. }));
    }
}
