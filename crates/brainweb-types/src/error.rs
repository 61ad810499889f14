use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhantomError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown tissue label: {0}")]
    UnknownLabel(String),

    #[error("Unknown coordinate system: {0}")]
    UnknownGeometry(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Label registry error: {0}")]
    Registry(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("NPZ read error: {0}")]
    NpzRead(#[from] ndarray_npy::ReadNpzError),

    #[error("NPZ write error: {0}")]
    NpzWrite(#[from] ndarray_npy::WriteNpzError),
}

pub type PhantomResult<T> = Result<T, PhantomError>;
