use thiserror::Error;

#[derive(Error, Debug)]
pub enum NeatScanError {
    #[error("Storage request failed: {0}")]
    Storage(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NeatScanError>;
