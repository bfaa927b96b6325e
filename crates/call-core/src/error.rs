//! Error types for the call session

use thiserror::Error;

use crate::peer::PeerRole;
use crate::session::CallState;

/// Result type for call operations
pub type Result<T> = std::result::Result<T, CallError>;

/// Errors that can occur while running a call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    /// A negotiation step failed on one of the peers
    #[error("{action} failed on {peer}: {reason}")]
    Negotiation {
        peer: PeerRole,
        action: String,
        reason: String,
    },

    /// The peer rejected an ICE candidate
    #[error("Failed to add ICE candidate on {peer}: {reason}")]
    IceCandidate { peer: PeerRole, reason: String },

    /// Statistics could not be collected
    #[error("Failed to get stats: {reason}")]
    Stats { reason: String },

    /// Operation not allowed in the current state
    #[error("Invalid state for {operation}: {state:?}")]
    InvalidState { operation: String, state: CallState },

    /// Error reported by the peer connection itself
    #[error("Peer connection error: {message}")]
    Peer { message: String },
}

impl CallError {
    /// Create a negotiation error
    pub fn negotiation(peer: PeerRole, action: impl Into<String>, reason: impl ToString) -> Self {
        Self::Negotiation {
            peer,
            action: action.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an ICE candidate error
    pub fn ice_candidate(peer: PeerRole, reason: impl ToString) -> Self {
        Self::IceCandidate {
            peer,
            reason: reason.to_string(),
        }
    }

    /// Create a stats error
    pub fn stats(reason: impl ToString) -> Self {
        Self::Stats {
            reason: reason.to_string(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(operation: impl Into<String>, state: CallState) -> Self {
        Self::InvalidState {
            operation: operation.into(),
            state,
        }
    }

    /// Create a peer connection error
    pub fn peer(message: impl Into<String>) -> Self {
        Self::Peer {
            message: message.into(),
        }
    }
}
