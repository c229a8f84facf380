use tracing::{debug, warn};

use crate::accel::accelerator::Accelerator;
use crate::accel::device::{self, DeviceDescriptor};
use crate::error::{MatmulError, Result};

/// The devices visible to this process and the one currently selected.
///
/// The device list is a snapshot taken at construction; hardware changes
/// after that are not picked up. Exactly one device is active at any time.
/// Before any selection that is the runtime's system default.
#[derive(Debug)]
pub struct AcceleratorRegistry {
    devices: Vec<DeviceDescriptor>,
    default: usize,
    active: usize,
    contexts: Vec<Option<Accelerator>>,
}

impl AcceleratorRegistry {
    /// Snapshot the devices of the host runtime.
    pub fn system() -> Self {
        let devices = device::enumerate_system_devices();
        let contexts = vec![None; devices.len()];
        AcceleratorRegistry {
            devices,
            default: 0,
            active: 0,
            contexts,
        }
    }

    /// Build a registry from an explicit device list.
    ///
    /// # Errors
    /// Returns `UnknownDevice` if no device has `default_path`.
    pub fn from_devices(devices: Vec<DeviceDescriptor>, default_path: &str) -> Result<Self> {
        let default = devices
            .iter()
            .position(|d| d.path() == default_path)
            .ok_or_else(|| MatmulError::UnknownDevice(default_path.to_string()))?;
        let contexts = vec![None; devices.len()];
        Ok(AcceleratorRegistry {
            devices,
            default,
            active: default,
            contexts,
        })
    }

    /// All devices, in runtime order.
    pub fn list_devices(&self) -> &[DeviceDescriptor] {
        &self.devices
    }

    pub fn default_device(&self) -> &DeviceDescriptor {
        &self.devices[self.default]
    }

    pub fn active_device(&self) -> &DeviceDescriptor {
        &self.devices[self.active]
    }

    /// Make the first device matching `predicate` active.
    ///
    /// Returns false and keeps the current selection when nothing matches.
    pub fn select_device<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut(&DeviceDescriptor) -> bool,
    {
        match self.devices.iter().position(|d| predicate(d)) {
            Some(i) => {
                self.active = i;
                debug!(device = %self.devices[i], "device selected");
                true
            }
            None => {
                warn!(active = %self.active_device(), "no device matches predicate, keeping active device");
                false
            }
        }
    }

    /// Like [`select_device`](Self::select_device), but a miss is an error.
    pub fn require_device<P>(&mut self, predicate: P) -> Result<&DeviceDescriptor>
    where
        P: FnMut(&DeviceDescriptor) -> bool,
    {
        if self.select_device(predicate) {
            Ok(self.active_device())
        } else {
            Err(MatmulError::NoMatchingDevice)
        }
    }

    /// Make the device with `path` active.
    pub fn select_by_path(&mut self, path: &str) -> bool {
        self.select_device(|d| d.path() == path)
    }

    /// Return to the system default device.
    pub fn reset_to_default(&mut self) {
        self.active = self.default;
    }

    /// The dispatch context for the active device.
    ///
    /// The worker pool of each device is started once and reused by later
    /// calls. Handles given out earlier keep working after a reselection.
    pub fn accelerator(&mut self) -> Result<Accelerator> {
        if let Some(acc) = &self.contexts[self.active] {
            return Ok(acc.clone());
        }
        let acc = Accelerator::new(self.devices[self.active].clone())?;
        self.contexts[self.active] = Some(acc.clone());
        Ok(acc)
    }
}
