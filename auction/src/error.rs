/// Which mutating operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    PlaceBid,
    Close,
}

/// Marker text the signing wallet puts in its error when the user declines.
const USER_REJECTED_MARKER: &str = "user rejected transaction";

/// Domain-specific error types for the auction client.
#[derive(Debug, thiserror::Error)]
pub enum AuctionError {
    #[error("Auction store is not available")]
    StoreUnavailable,

    #[error("Malformed stored value: {0}")]
    Decode(String),

    #[error("Failed to encode value: {0}")]
    Encode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transaction rejected by user")]
    UserRejected,

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Creation failed: {0}")]
    CreateFailed(String),

    #[error("No wallet connected")]
    NotConnected,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store operation failed: {0}")]
    Store(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AuctionError {
    /// Classify a failed store write for the given operation.
    pub fn from_write_failure(op: Operation, err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        if message.contains(USER_REJECTED_MARKER) {
            return Self::UserRejected;
        }
        match op {
            Operation::Create => Self::CreateFailed(message),
            Operation::PlaceBid | Operation::Close => Self::WriteFailed(message),
        }
    }

    /// Status line shown to the user when `op` ends with this error.
    pub fn user_message(&self, op: Operation) -> String {
        match self {
            Self::UserRejected => "Transaction rejected by user".to_string(),
            Self::NotConnected => "Please connect wallet first".to_string(),
            Self::Validation(msg) => msg.clone(),
            other => {
                let cause = match other {
                    Self::CreateFailed(msg) | Self::WriteFailed(msg) => msg.clone(),
                    Self::NotFound(_) => "Auction not found".to_string(),
                    e => e.to_string(),
                };
                let prefix = match op {
                    Operation::Create => "Creation failed",
                    Operation::PlaceBid => "Bid failed",
                    Operation::Close => "Close failed",
                };
                format!("{prefix}: {cause}")
            }
        }
    }
}

/// Convenience type alias.
pub type AuctionResult<T> = Result<T, AuctionError>;
