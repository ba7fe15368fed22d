use thiserror::Error;

/// Errors surfaced by broker collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// Request-level failure on the broker channel (network, timeout, 5xx)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The position-change subscription ended or was torn down
    #[error("Position stream closed")]
    StreamClosed,

    #[error("Not found: {0}")]
    NotFound(String),

    /// The broker refused the request (bad arguments, insufficient funds)
    #[error("Rejected: {0}")]
    Rejected(String),
}

impl BrokerError {
    /// Transport-level failures that warrant a retry or resubscription
    pub fn is_transient(&self) -> bool {
        matches!(self, BrokerError::Transport(_) | BrokerError::StreamClosed)
    }
}

pub type BrokerResult<T> = std::result::Result<T, BrokerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(BrokerError::Transport("reset by peer".into()).is_transient());
        assert!(BrokerError::StreamClosed.is_transient());
        assert!(!BrokerError::NotFound("uid".into()).is_transient());
        assert!(!BrokerError::Rejected("no funds".into()).is_transient());
    }
}
