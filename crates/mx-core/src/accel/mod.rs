//! Accelerator side: device registry, dispatch context, device-bound views
//! and the data-parallel multiply engine.

pub mod accelerator;
pub mod array_view;
pub mod device;
pub mod engine;
pub mod registry;

pub use accelerator::Accelerator;
pub use array_view::{ArrayView, ArrayViewMut};
pub use device::{Capabilities, DeviceDescriptor};
pub use engine::AcceleratorEngine;
pub use registry::AcceleratorRegistry;
