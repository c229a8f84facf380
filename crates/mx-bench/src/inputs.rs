use mx_core::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{BenchConfig, FillPattern};

/// Build A ([m, w]) and B ([w, n]) for a run.
pub fn generate(config: &BenchConfig) -> (Matrix, Matrix) {
    match config.fill {
        FillPattern::Sequential => sequential(config.m, config.w, config.n),
        FillPattern::Random => random(config.m, config.w, config.n, config.seed),
    }
}

/// A counts up from 0; B continues from there counting down. Wraps.
fn sequential(m: usize, w: usize, n: usize) -> (Matrix, Matrix) {
    let mut counter = 0i32;
    let a = Matrix::from_fn((m, w), |_| {
        let v = counter;
        counter = counter.wrapping_add(1);
        v
    });
    let b = Matrix::from_fn((w, n), |_| {
        let v = counter;
        counter = counter.wrapping_sub(1);
        v
    });
    (a, b)
}

fn random(m: usize, w: usize, n: usize, seed: u64) -> (Matrix, Matrix) {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = Matrix::from_fn((m, w), |_| rng.gen());
    let b = Matrix::from_fn((w, n), |_| rng.gen());
    (a, b)
}
