use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatmulError {
    #[error("shape mismatch: [{rows}x{cols}] does not fit a buffer of {len} elements")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },
    #[error("extent [{rows}x{cols}] has more elements than fit in memory")]
    ExtentOverflow { rows: usize, cols: usize },
    #[error("matmul dimension mismatch: [{m}x{k}] @ [{k2}x{n}] into [{out_rows}x{out_cols}]")]
    MatmulMismatch {
        m: usize,
        k: usize,
        k2: usize,
        n: usize,
        out_rows: usize,
        out_cols: usize,
    },
    #[error("no device matches the selection predicate")]
    NoMatchingDevice,
    #[error("unknown device path: {0}")]
    UnknownDevice(String),
    #[error("device '{device}' failed: {reason}")]
    DeviceExecution { device: String, reason: String },
    #[error("view is bound to device '{got}' but dispatch targets '{expected}'")]
    DeviceMismatch { expected: String, got: String },
}

pub type Result<T> = std::result::Result<T, MatmulError>;
