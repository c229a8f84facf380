//! mx-bench: multiply two matrices on the host and on an accelerator and
//! report how long each took.
//!
//! Settings come from `MX_*` environment variables; log output is filtered
//! with `RUST_LOG`.

use anyhow::{Context, Result};
use mx_bench::{logging, BenchConfig, BenchContext};
use mx_core::AcceleratorRegistry;

fn main() -> Result<()> {
    logging::init().context("installing log subscriber")?;

    let config = BenchConfig::from_env().context("reading MX_* settings")?;
    let mut ctx = BenchContext::new(config, AcceleratorRegistry::system());
    ctx.run()?;

    Ok(())
}
