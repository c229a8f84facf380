//! Views bound to an accelerator.
//!
//! On host-shared devices both flavours work on the host buffer directly.
//! Otherwise a read view uploads a device-side copy when it is bound, and a
//! write view stages a device-side buffer at its first dispatch and copies it
//! back on `synchronize`. Staged buffers hold a lease on the device's memory
//! budget until the view is dropped.

use std::borrow::Cow;

use tracing::debug;

use crate::accel::accelerator::{Accelerator, MemoryLease};
use crate::error::Result;
use crate::extent::Extent;
use crate::view::{MatrixView, MatrixViewMut};

/// Read-only view of a matrix as seen by a device.
#[derive(Debug)]
pub struct ArrayView<'a> {
    extent: Extent,
    data: Cow<'a, [i32]>,
    accelerator: Accelerator,
    _lease: Option<MemoryLease>,
}

impl<'a> ArrayView<'a> {
    /// Bind `view` to `accelerator`, uploading it if the device does not
    /// share host memory.
    ///
    /// # Errors
    /// Returns `DeviceExecution` if the device has no room for the copy.
    pub fn new(accelerator: &Accelerator, view: MatrixView<'a>) -> Result<Self> {
        let host = view.as_slice();
        let (data, lease) = if accelerator.shares_host_memory() {
            (Cow::Borrowed(host), None)
        } else {
            let lease = accelerator.lease(std::mem::size_of_val(host))?;
            let mut copy = Vec::new();
            copy.try_reserve_exact(host.len())
                .map_err(|e| accelerator.execution_error(format!("upload failed: {e}")))?;
            copy.extend_from_slice(host);
            debug!(device = %accelerator.path(), extent = %view.extent(), "uploaded input");
            (Cow::Owned(copy), lease)
        };

        Ok(ArrayView {
            extent: view.extent(),
            data,
            accelerator: accelerator.clone(),
            _lease: lease,
        })
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn accelerator(&self) -> &Accelerator {
        &self.accelerator
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> i32 {
        self.data[row * self.extent.cols() + col]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SyncState {
    /// Host buffer reflects every completed dispatch.
    Clean,
    /// A dispatch completed; its results may still live only on the device.
    Pending,
    /// A dispatch faulted; the output is undefined.
    Faulted(String),
}

/// Write view of a matrix as seen by a device.
#[derive(Debug)]
pub struct ArrayViewMut<'a> {
    extent: Extent,
    host: &'a mut [i32],
    staging: Option<Vec<i32>>,
    lease: Option<MemoryLease>,
    accelerator: Accelerator,
    discard: bool,
    state: SyncState,
}

impl<'a> ArrayViewMut<'a> {
    /// Bind `view` to `accelerator`. Nothing is transferred until the first
    /// dispatch; the view's discard hint carries over.
    pub fn new(accelerator: &Accelerator, view: MatrixViewMut<'a>) -> Self {
        let discard = view.is_discarded();
        let (extent, host) = view.into_parts();
        ArrayViewMut {
            extent,
            host,
            staging: None,
            lease: None,
            accelerator: accelerator.clone(),
            discard,
            state: SyncState::Clean,
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn accelerator(&self) -> &Accelerator {
        &self.accelerator
    }

    /// Previous contents need not reach the device; every element will be
    /// overwritten by the next dispatch.
    pub fn discard_data(&mut self) {
        self.discard = true;
    }

    /// The host buffer as it is right now, without waiting for the device.
    pub fn host_slice(&self) -> &[i32] {
        &*self.host
    }

    /// The buffer units of work write into, staging it on first use.
    pub(crate) fn device_slice_mut(&mut self) -> Result<&mut [i32]> {
        if self.accelerator.shares_host_memory() {
            return Ok(&mut *self.host);
        }
        if self.staging.is_none() {
            let bytes = std::mem::size_of_val(&*self.host);
            let lease = self.accelerator.lease(bytes)?;
            let mut buf = self.accelerator.allocate(self.host.len())?;
            if !self.discard {
                buf.copy_from_slice(self.host);
            }
            self.lease = lease;
            self.staging = Some(buf);
        }
        match self.staging.as_mut() {
            Some(buf) => Ok(buf.as_mut_slice()),
            None => Ok(&mut *self.host),
        }
    }

    /// Record how a dispatch into this view ended.
    pub(crate) fn complete(&mut self, outcome: std::result::Result<(), String>) {
        self.state = match outcome {
            Ok(()) => SyncState::Pending,
            Err(reason) => SyncState::Faulted(reason),
        };
    }

    /// Block until device results are visible in the host buffer, then
    /// return it.
    ///
    /// Calling this again without a new dispatch returns the same contents.
    ///
    /// # Errors
    /// Returns `DeviceExecution` if the last dispatch faulted; the host
    /// buffer must not be trusted in that case.
    pub fn synchronize(&mut self) -> Result<&[i32]> {
        match &self.state {
            SyncState::Faulted(reason) => {
                return Err(self.accelerator.execution_error(reason.clone()));
            }
            SyncState::Pending => {
                if let Some(staging) = &self.staging {
                    self.host.copy_from_slice(staging);
                }
                debug!(device = %self.accelerator.path(), extent = %self.extent, "synchronized");
                self.state = SyncState::Clean;
            }
            SyncState::Clean => {}
        }
        Ok(self.host_slice())
    }
}
