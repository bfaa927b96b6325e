//! # Call-Core: Loopback Audio Call
//!
//! Wires two peer connections together in-process, negotiates a session with
//! a preferred audio codec, relays ICE candidates between the peers and
//! samples outbound RTP statistics into bitrate and packet-rate series.
//!
//! The peer connections are supplied by the caller through the
//! [`PeerConnection`] trait; this crate drives them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use audiopref_call_core::{CallSession, OfferOptions, PeerRole, StatsConfig, StatsPoller};
//! use audiopref_sdp_core::CodecPreference;
//! use tokio::sync::watch;
//!
//! let mut call = CallSession::new(
//!     Arc::new(caller_pc),
//!     Arc::new(callee_pc),
//!     CodecPreference::audio_send("opus/48000"),
//!     OfferOptions::default(),
//! );
//! call.negotiate().await?;
//!
//! // forward candidates as the engine gathers them
//! call.relay_ice_candidate(PeerRole::Caller, candidate).await?;
//!
//! let (stop_tx, stop_rx) = watch::channel(false);
//! let poller = tokio::spawn(
//!     StatsPoller::new(StatsConfig::default()).run(call.caller().clone(), stop_rx),
//! );
//!
//! // ... later
//! stop_tx.send(true)?;
//! let sampler = poller.await?;
//! call.hangup().await?;
//! ```

pub mod error;
pub mod peer;
pub mod poller;
pub mod session;
pub mod stats;

pub use error::{CallError, Result};
pub use peer::{IceCandidate, OfferOptions, PeerConnection, PeerRole, SdpType, SessionDescription};
pub use poller::{StatsConfig, StatsPoller};
pub use session::{CallSession, CallState};
pub use stats::{RtcStats, StatsReport, StatsSample, StatsSampler, TimelineSeries};
