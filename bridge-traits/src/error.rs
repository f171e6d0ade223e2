use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Host node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid DOM operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
