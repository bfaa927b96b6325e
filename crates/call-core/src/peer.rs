//! Peer connection abstraction
//!
//! The WebRTC engine (capture, ICE gathering, DTLS, RTP) lives outside this
//! crate. A call only needs the offer/answer and candidate surface of a peer
//! connection, which [`PeerConnection`] describes.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::stats::StatsReport;

/// Which side of the loopback call a peer is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerRole {
    /// Creates the offer and sends the local stream
    Caller,
    /// Answers and receives the remote stream
    Callee,
}

impl PeerRole {
    /// The other side of the call
    pub fn other(&self) -> PeerRole {
        match self {
            PeerRole::Caller => PeerRole::Callee,
            PeerRole::Callee => PeerRole::Caller,
        }
    }
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerRole::Caller => write!(f, "caller"),
            PeerRole::Callee => write!(f, "callee"),
        }
    }
}

/// Offer or answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    /// SDP offer
    Offer,
    /// SDP answer
    Answer,
}

/// A session description as exchanged between peers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    /// Offer or answer
    #[serde(rename = "type")]
    pub sdp_type: SdpType,
    /// SDP text
    pub sdp: String,
}

impl SessionDescription {
    /// Create an offer
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Offer,
            sdp: sdp.into(),
        }
    }

    /// Create an answer
    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Answer,
            sdp: sdp.into(),
        }
    }

    /// Same description with its SDP text replaced
    pub fn with_sdp(&self, sdp: String) -> Self {
        Self {
            sdp_type: self.sdp_type,
            sdp,
        }
    }
}

/// An ICE candidate gathered by one peer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    /// `candidate:` attribute value
    pub candidate: String,
    /// Media stream identification tag
    pub sdp_mid: Option<String>,
    /// Index of the m= line the candidate belongs to
    pub sdp_m_line_index: Option<u16>,
}

impl IceCandidate {
    /// Create a candidate with no mid/index
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: None,
            sdp_m_line_index: None,
        }
    }
}

/// Options used when creating an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferOptions {
    /// Offer to receive audio
    pub offer_to_receive_audio: bool,
    /// Offer to receive video
    pub offer_to_receive_video: bool,
    /// Enable voice activity detection
    pub voice_activity_detection: bool,
}

impl Default for OfferOptions {
    fn default() -> Self {
        Self {
            offer_to_receive_audio: true,
            offer_to_receive_video: false,
            voice_activity_detection: false,
        }
    }
}

/// The negotiation surface of a WebRTC peer connection
#[async_trait]
pub trait PeerConnection: Send + Sync {
    /// Create an SDP offer
    async fn create_offer(&self, options: &OfferOptions) -> Result<SessionDescription>;

    /// Create an SDP answer to the current remote offer
    async fn create_answer(&self) -> Result<SessionDescription>;

    /// Apply a local description
    async fn set_local_description(&self, description: SessionDescription) -> Result<()>;

    /// Apply a remote description
    async fn set_remote_description(&self, description: SessionDescription) -> Result<()>;

    /// Add a candidate gathered by the remote peer
    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    /// Snapshot of the connection statistics
    async fn get_stats(&self) -> Result<StatsReport>;

    /// Close the connection
    async fn close(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_role_other() {
        assert_eq!(PeerRole::Caller.other(), PeerRole::Callee);
        assert_eq!(PeerRole::Callee.other(), PeerRole::Caller);
    }

    #[test]
    fn test_offer_options_default() {
        let options = OfferOptions::default();
        assert!(options.offer_to_receive_audio);
        assert!(!options.offer_to_receive_video);
        assert!(!options.voice_activity_detection);
    }

    #[test]
    fn test_description_with_sdp_keeps_type() {
        let answer = SessionDescription::answer("v=0");
        let munged = answer.with_sdp("v=1".to_string());
        assert_eq!(munged.sdp_type, SdpType::Answer);
        assert_eq!(munged.sdp, "v=1");
    }
}
