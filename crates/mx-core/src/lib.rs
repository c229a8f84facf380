//! `mx-core` - Dense `i32` matrix multiplication on the host and on an accelerator.
//!
//! This crate provides:
//! - `MatrixView` / `MatrixViewMut`, non-owning 2-D views over flat buffers
//! - A `MultiplyEngine` trait with a reference `CpuEngine`
//! - An `AcceleratorRegistry` that enumerates devices and tracks the active one
//! - An `AcceleratorEngine` that runs one unit of work per output element on
//!   the active device's worker pool, with explicit synchronize
//!
//! All engines use wrapping 32-bit arithmetic, so their outputs agree bit for bit.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod accel;
pub mod cpu;
pub mod engine;
pub mod error;
pub mod extent;
pub mod matrix;
pub mod view;

// Re-export primary types at the crate root for convenience.
pub use accel::{AcceleratorEngine, AcceleratorRegistry, DeviceDescriptor};
pub use cpu::CpuEngine;
pub use engine::MultiplyEngine;
pub use error::{MatmulError, Result};
pub use extent::{Extent, Index2};
pub use matrix::Matrix;
pub use view::{MatrixView, MatrixViewMut};
