//! `mx-bench` - times the CPU and accelerator multiply engines of `mx-core`.
//!
//! A run lists the available devices, selects one according to
//! [`DevicePolicy`](config::DevicePolicy), multiplies the same inputs with
//! every engine, reports elapsed milliseconds per engine, and optionally
//! checks that all outputs are identical.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
pub mod context;
pub mod error;
pub mod inputs;
pub mod logging;
pub mod report;
pub mod timing;

pub use config::{BenchConfig, DevicePolicy, FillPattern};
pub use context::{BenchContext, EngineRun, RunOutcome, Summary};
pub use error::{BenchError, Result};
