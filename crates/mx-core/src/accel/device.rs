use std::fmt;
use std::num::NonZeroUsize;

/// Device path of the host worker pool (the system default).
pub const POOL_DEVICE_PATH: &str = "rayon\\pool";
/// Device path of the staged-copy device.
pub const STAGED_DEVICE_PATH: &str = "rayon\\staged";
/// Device path of the single-worker reference device.
pub const REF_DEVICE_PATH: &str = "rayon\\ref";

/// Memory budget of the staged-copy device, in megabytes.
const STAGED_DEVICE_MEMORY_MB: usize = 1024;

/// Capability flags reported for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities {
    /// Host and device address the same memory; no upload or copy-back.
    pub host_shared_memory: bool,
    pub double_precision: bool,
    pub limited_double_precision: bool,
}

/// Immutable description of one compute device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceDescriptor {
    name: String,
    path: String,
    dedicated_memory_mb: usize,
    capabilities: Capabilities,
    compute_units: usize,
}

impl DeviceDescriptor {
    /// Create a descriptor with no dedicated memory and no capabilities.
    ///
    /// `compute_units` is clamped to at least one.
    pub fn new(name: impl Into<String>, path: impl Into<String>, compute_units: usize) -> Self {
        DeviceDescriptor {
            name: name.into(),
            path: path.into(),
            dedicated_memory_mb: 0,
            capabilities: Capabilities::default(),
            compute_units: compute_units.max(1),
        }
    }

    /// Dedicated memory budget in megabytes; `0` means unbounded.
    pub fn with_dedicated_memory_mb(mut self, mb: usize) -> Self {
        self.dedicated_memory_mb = mb;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn dedicated_memory_mb(&self) -> usize {
        self.dedicated_memory_mb
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Number of workers the device runs units of work on.
    pub fn compute_units(&self) -> usize {
        self.compute_units
    }

    pub fn supports_host_shared_memory(&self) -> bool {
        self.capabilities.host_shared_memory
    }

    pub fn supports_double_precision(&self) -> bool {
        self.capabilities.double_precision
    }

    pub fn supports_limited_double_precision(&self) -> bool {
        self.capabilities.limited_double_precision
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}

/// Snapshot of the devices the host runtime offers, in runtime order.
///
/// The first entry is the system default.
pub fn enumerate_system_devices() -> Vec<DeviceDescriptor> {
    let workers = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);

    vec![
        DeviceDescriptor::new("Host worker pool", POOL_DEVICE_PATH, workers).with_capabilities(
            Capabilities {
                host_shared_memory: true,
                double_precision: true,
                limited_double_precision: true,
            },
        ),
        DeviceDescriptor::new("Staged copy device", STAGED_DEVICE_PATH, workers)
            .with_dedicated_memory_mb(STAGED_DEVICE_MEMORY_MB)
            .with_capabilities(Capabilities {
                host_shared_memory: false,
                double_precision: true,
                limited_double_precision: true,
            }),
        DeviceDescriptor::new("Reference device", REF_DEVICE_PATH, 1).with_capabilities(
            Capabilities {
                host_shared_memory: false,
                double_precision: true,
                limited_double_precision: true,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_devices() {
        let devices = enumerate_system_devices();
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].path(), POOL_DEVICE_PATH);
        assert!(devices[0].supports_host_shared_memory());
        assert!(!devices[1].supports_host_shared_memory());
        assert_eq!(devices[1].dedicated_memory_mb(), 1024);
        assert_eq!(devices[2].compute_units(), 1);
    }

    #[test]
    fn test_paths_unique() {
        let devices = enumerate_system_devices();
        for (i, d) in devices.iter().enumerate() {
            assert!(devices[i + 1..].iter().all(|o| o.path() != d.path()));
        }
    }

    #[test]
    fn test_compute_units_clamped() {
        let d = DeviceDescriptor::new("empty", "test\\empty", 0);
        assert_eq!(d.compute_units(), 1);
    }

    #[test]
    fn test_display() {
        let d = DeviceDescriptor::new("Reference device", REF_DEVICE_PATH, 1);
        assert_eq!(d.to_string(), "Reference device (rayon\\ref)");
    }
}
