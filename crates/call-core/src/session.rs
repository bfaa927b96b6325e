//! Loopback call session
//!
//! Owns both ends of an in-process call. The caller's offer and the callee's
//! answer are each passed through the session's [`CodecPreference`] before
//! being handed to the other peer, so the chosen codec ends up first on both
//! legs of the negotiation.
//!
//! ```text
//! caller.create_offer ─► caller.set_local ─► munge ─► callee.set_remote
//!                                                         │
//! caller.set_remote ◄─ munge ◄─ callee.set_local ◄─ callee.create_answer
//! ```

use std::sync::Arc;

use audiopref_sdp_core::CodecPreference;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::{CallError, Result};
use crate::peer::{IceCandidate, OfferOptions, PeerConnection, PeerRole, SessionDescription};

/// Lifecycle of a call session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallState {
    /// Created, nothing negotiated yet
    Idle,
    /// Offer/answer in progress
    Negotiating,
    /// Both descriptions applied on both peers
    Connected,
    /// A negotiation step failed
    Failed,
    /// Hung up
    Closed,
}

/// A two-peer loopback call
pub struct CallSession<P: PeerConnection> {
    caller: Arc<P>,
    callee: Arc<P>,
    preference: CodecPreference,
    offer_options: OfferOptions,
    state: CallState,
    closed_tx: watch::Sender<bool>,
}

impl<P: PeerConnection> CallSession<P> {
    /// Create a session over two peer connections
    pub fn new(
        caller: Arc<P>,
        callee: Arc<P>,
        preference: CodecPreference,
        offer_options: OfferOptions,
    ) -> Self {
        Self {
            caller,
            callee,
            preference,
            offer_options,
            state: CallState::Idle,
            closed_tx: watch::channel(false).0,
        }
    }

    /// Current state
    pub fn state(&self) -> CallState {
        self.state
    }

    /// Codec preference applied to offer and answer
    pub fn preference(&self) -> &CodecPreference {
        &self.preference
    }

    /// The offering peer
    pub fn caller(&self) -> &Arc<P> {
        &self.caller
    }

    /// The answering peer
    pub fn callee(&self) -> &Arc<P> {
        &self.callee
    }

    /// Turns true once the call is hung up; the sender goes away with the
    /// session. Suitable as the shutdown signal of a
    /// [`StatsPoller`](crate::StatsPoller) watching either peer.
    pub fn closed_signal(&self) -> watch::Receiver<bool> {
        self.closed_tx.subscribe()
    }

    fn peer(&self, role: PeerRole) -> &Arc<P> {
        match role {
            PeerRole::Caller => &self.caller,
            PeerRole::Callee => &self.callee,
        }
    }

    /// Run offer/answer between the two peers.
    ///
    /// On failure the session moves to [`CallState::Failed`] and the error
    /// names the peer and the step that failed.
    pub async fn negotiate(&mut self) -> Result<()> {
        if self.state != CallState::Idle {
            return Err(CallError::invalid_state("negotiate", self.state));
        }

        info!("Starting call");
        self.state = CallState::Negotiating;

        match self.run_offer_answer().await {
            Ok(()) => {
                self.state = CallState::Connected;
                info!("Call connected");
                Ok(())
            }
            Err(e) => {
                error!("Negotiation failed: {}", e);
                self.state = CallState::Failed;
                Err(e)
            }
        }
    }

    async fn run_offer_answer(&self) -> Result<()> {
        let offer = self
            .caller
            .create_offer(&self.offer_options)
            .await
            .map_err(|e| CallError::negotiation(PeerRole::Caller, "createOffer", e))?;
        debug!("Offer from caller\n{}", offer.sdp);

        self.caller
            .set_local_description(offer.clone())
            .await
            .map_err(|e| CallError::negotiation(PeerRole::Caller, "setLocalDescription", e))?;

        let offer = self.munge(&offer);
        self.callee
            .set_remote_description(offer)
            .await
            .map_err(|e| CallError::negotiation(PeerRole::Callee, "setRemoteDescription", e))?;

        let answer = self
            .callee
            .create_answer()
            .await
            .map_err(|e| CallError::negotiation(PeerRole::Callee, "createAnswer", e))?;
        debug!("Answer from callee\n{}", answer.sdp);

        self.callee
            .set_local_description(answer.clone())
            .await
            .map_err(|e| CallError::negotiation(PeerRole::Callee, "setLocalDescription", e))?;

        let answer = self.munge(&answer);
        self.caller
            .set_remote_description(answer)
            .await
            .map_err(|e| CallError::negotiation(PeerRole::Caller, "setRemoteDescription", e))?;

        Ok(())
    }

    /// The description as it is sent to the other peer; the local copy keeps
    /// the engine's original codec order.
    fn munge(&self, description: &SessionDescription) -> SessionDescription {
        description.with_sdp(self.preference.apply(&description.sdp))
    }

    /// Hand a candidate gathered by `from` to the other peer
    pub async fn relay_ice_candidate(&self, from: PeerRole, candidate: IceCandidate) -> Result<()> {
        if self.state == CallState::Closed {
            return Err(CallError::invalid_state("relay_ice_candidate", self.state));
        }

        let to = from.other();
        debug!("{} ICE candidate: {}", from, candidate.candidate);

        match self.peer(to).add_ice_candidate(candidate).await {
            Ok(()) => {
                debug!("AddIceCandidate success on {}", to);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to add ICE candidate on {}: {}", to, e);
                Err(CallError::ice_candidate(to, e))
            }
        }
    }

    /// Close both peers. Calling this on a closed session does nothing.
    ///
    /// Both peers are closed even if the first close fails; the first error
    /// is returned.
    pub async fn hangup(&mut self) -> Result<()> {
        if self.state == CallState::Closed {
            return Ok(());
        }

        info!("Ending call");
        let caller = self.caller.close().await;
        let callee = self.callee.close().await;
        self.state = CallState::Closed;
        self.closed_tx.send_replace(true);

        if let Err(e) = &caller {
            warn!("Failed to close caller: {}", e);
        }
        if let Err(e) = &callee {
            warn!("Failed to close callee: {}", e);
        }
        caller.and(callee)
    }
}
