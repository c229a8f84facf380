/// Reference triple-loop multiplication over raw row-major buffers.
///
/// - `a`: [m, w]
/// - `b`: [w, n]
/// - `c`: [m, n], overwritten
///
/// Uses wrapping `i32` arithmetic. Buffer lengths are the caller's
/// responsibility; a short buffer panics on the first out-of-range index.
pub fn matmul_naive(a: &[i32], b: &[i32], c: &mut [i32], m: usize, w: usize, n: usize) {
    for row in 0..m {
        for col in 0..n {
            let mut sum = 0i32;
            for k in 0..w {
                sum = sum.wrapping_add(a[row * w + k].wrapping_mul(b[k * n + col]));
            }
            c[row * n + col] = sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_times_column() {
        let mut c = [0];
        matmul_naive(&[1, 2, 3], &[4, 5, 6], &mut c, 1, 3, 1);
        assert_eq!(c, [32]);
    }

    #[test]
    fn test_overwrites_output() {
        let mut c = [99, 99, 99, 99];
        matmul_naive(&[1, 0, 0, 1], &[1, 2, 3, 4], &mut c, 2, 2, 2);
        assert_eq!(c, [1, 2, 3, 4]);
    }

    #[test]
    fn test_wraps_on_overflow() {
        let mut c = [0];
        matmul_naive(&[i32::MAX, 1], &[2, 2], &mut c, 1, 2, 1);
        // MAX * 2 wraps to -2, then + 2 = 0
        assert_eq!(c, [0]);
    }

    #[test]
    fn test_empty_shared_dimension_zeroes_output() {
        let mut c = [5, 5];
        matmul_naive(&[], &[], &mut c, 1, 0, 2);
        assert_eq!(c, [0, 0]);
    }
}
