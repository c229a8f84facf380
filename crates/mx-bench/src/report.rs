//! Human-readable reports, emitted as `tracing` events.

use mx_core::DeviceDescriptor;
use tracing::{info, warn};

use crate::context::{RunOutcome, Summary};

const RULE: &str = "---------------------------";

/// One line per field, capability flags as `true`/`false` text.
pub fn device_lines(device: &DeviceDescriptor) -> Vec<String> {
    vec![
        device.name().to_string(),
        device.path().to_string(),
        format!("dedicated memory: {} MB", device.dedicated_memory_mb()),
        format!("CPU shared memory: {}", device.supports_host_shared_memory()),
        format!("double precision: {}", device.supports_double_precision()),
        format!(
            "limited double precision: {}",
            device.supports_limited_double_precision()
        ),
    ]
}

pub fn log_devices(devices: &[DeviceDescriptor]) {
    info!("{RULE}");
    info!("All accelerators:");
    for device in devices {
        for line in device_lines(device) {
            info!("  {line}");
        }
        info!("");
    }
    info!("{RULE}");
}

pub fn log_active_device(device: &DeviceDescriptor) {
    info!("{RULE}");
    info!("Chosen accelerator: {}", device.name());
    info!("Chosen device path: {}", device.path());
    info!("{RULE}");
}

/// Full property listing of a single device.
pub fn log_device_properties(device: &DeviceDescriptor) {
    for line in device_lines(device) {
        info!(device = %device.path(), "{line}");
    }
}

pub fn log_summary(summary: &Summary) {
    for run in &summary.runs {
        match &run.outcome {
            RunOutcome::Completed { elapsed_ms, .. } => {
                info!(engine = %run.engine, elapsed_ms, "{} took {} milliseconds", run.engine, elapsed_ms);
            }
            RunOutcome::Failed { reason } => {
                warn!(engine = %run.engine, "{} failed: {}", run.engine, reason);
            }
        }
    }
    match summary.outputs_match {
        Some(true) => info!("engine outputs match"),
        Some(false) => warn!("engine outputs differ"),
        None => {}
    }
}
