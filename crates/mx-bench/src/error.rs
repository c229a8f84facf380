use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Config {
        key: String,
        value: String,
        reason: String,
    },
    #[error("failed to install log subscriber: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
    #[error("matmul error: {0}")]
    Matmul(#[from] mx_core::MatmulError),
}

pub type Result<T> = std::result::Result<T, BenchError>;
