use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::accel::array_view::ArrayViewMut;
use crate::accel::device::DeviceDescriptor;
use crate::error::{MatmulError, Result};
use crate::extent::Index2;

const BYTES_PER_MB: usize = 1024 * 1024;

/// Handle to a device that can run dispatches.
///
/// Cloning is cheap and every clone drives the same worker pool and memory
/// budget. Views keep their own clone, so the device a view was bound to
/// stays valid for as long as the view lives.
#[derive(Debug, Clone)]
pub struct Accelerator {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    descriptor: DeviceDescriptor,
    pool: ThreadPool,
    memory: Arc<MemoryBudget>,
}

impl Accelerator {
    /// Start the worker pool for `descriptor`.
    ///
    /// # Errors
    /// Returns `DeviceExecution` if the pool cannot be started.
    pub fn new(descriptor: DeviceDescriptor) -> Result<Self> {
        let label = descriptor
            .path()
            .rsplit('\\')
            .next()
            .unwrap_or("device")
            .to_string();
        let pool = ThreadPoolBuilder::new()
            .num_threads(descriptor.compute_units())
            .thread_name(move |i| format!("mx-{label}-{i}"))
            .build()
            .map_err(|e| MatmulError::DeviceExecution {
                device: descriptor.name().to_string(),
                reason: format!("failed to start worker pool: {e}"),
            })?;

        let limit = match descriptor.dedicated_memory_mb() {
            0 => None,
            mb => Some(mb.saturating_mul(BYTES_PER_MB)),
        };
        debug!(device = %descriptor, workers = descriptor.compute_units(), "accelerator ready");

        Ok(Accelerator {
            inner: Arc::new(Inner {
                descriptor,
                pool,
                memory: Arc::new(MemoryBudget::new(limit)),
            }),
        })
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.inner.descriptor
    }

    pub fn name(&self) -> &str {
        self.inner.descriptor.name()
    }

    pub fn path(&self) -> &str {
        self.inner.descriptor.path()
    }

    pub fn shares_host_memory(&self) -> bool {
        self.inner.descriptor.supports_host_shared_memory()
    }

    /// Bytes of dedicated memory currently held by staged views.
    pub fn bytes_in_use(&self) -> usize {
        self.inner.memory.in_use.load(Ordering::Acquire)
    }

    /// True if both handles refer to the same device path.
    pub fn same_device(&self, other: &Accelerator) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.path() == other.path()
    }

    /// Reserve `bytes` of device memory for a staged buffer.
    ///
    /// Host-shared devices stage nothing and get `None`.
    pub(crate) fn lease(&self, bytes: usize) -> Result<Option<MemoryLease>> {
        if self.shares_host_memory() {
            return Ok(None);
        }
        MemoryBudget::lease(&self.inner.memory, bytes)
            .map(Some)
            .map_err(|available| {
                self.execution_error(format!(
                    "out of device memory: requested {bytes} bytes, {available} available"
                ))
            })
    }

    /// Allocate a zeroed device-side buffer of `len` elements.
    pub(crate) fn allocate(&self, len: usize) -> Result<Vec<i32>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|e| self.execution_error(format!("allocation failed: {e}")))?;
        buf.resize(len, 0);
        Ok(buf)
    }

    pub(crate) fn execution_error(&self, reason: String) -> MatmulError {
        MatmulError::DeviceExecution {
            device: self.name().to_string(),
            reason,
        }
    }

    /// Run `kernel` once for every element of `out`, in parallel.
    ///
    /// Each unit of work receives its (row, col) and returns the value of its
    /// own output slot; units never see each other's slots. Submission
    /// problems (wrong device, no device memory) fail here. A fault inside the
    /// kernel is recorded on `out` and reported by its `synchronize`.
    pub fn parallel_for_each<K>(&self, out: &mut ArrayViewMut<'_>, kernel: K) -> Result<()>
    where
        K: Fn(Index2) -> i32 + Send + Sync,
    {
        if !self.same_device(out.accelerator()) {
            return Err(MatmulError::DeviceMismatch {
                expected: self.path().to_string(),
                got: out.accelerator().path().to_string(),
            });
        }

        let extent = out.extent();
        debug!(device = %self.path(), extent = %extent, "dispatch");

        let slots = out.device_slice_mut()?;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.inner.pool.install(|| {
                slots
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(offset, slot)| {
                        *slot = kernel(extent.index_of(offset));
                    });
            })
        }));

        out.complete(outcome.map_err(panic_reason));
        Ok(())
    }
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("kernel fault: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("kernel fault: {s}")
    } else {
        "kernel fault".to_string()
    }
}

#[derive(Debug)]
struct MemoryBudget {
    limit: Option<usize>,
    in_use: AtomicUsize,
}

impl MemoryBudget {
    fn new(limit: Option<usize>) -> Self {
        MemoryBudget {
            limit,
            in_use: AtomicUsize::new(0),
        }
    }

    /// On failure returns the number of bytes still available.
    fn lease(budget: &Arc<MemoryBudget>, bytes: usize) -> std::result::Result<MemoryLease, usize> {
        let limit = budget.limit.unwrap_or(usize::MAX);
        budget
            .in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(bytes).filter(|&total| total <= limit)
            })
            .map(|_| MemoryLease {
                budget: Arc::clone(budget),
                bytes,
            })
            .map_err(|used| limit.saturating_sub(used))
    }
}

/// Device memory held by one staged buffer; returned on drop.
#[derive(Debug)]
pub(crate) struct MemoryLease {
    budget: Arc<MemoryBudget>,
    bytes: usize,
}

impl Drop for MemoryLease {
    fn drop(&mut self) {
        self.budget.in_use.fetch_sub(self.bytes, Ordering::AcqRel);
    }
}
