//! Codec preference rewriting
//!
//! Promotes a codec to the front of a media section's format list so the
//! remote peer picks it first during offer/answer. This is pure text munging
//! over the SDP produced by the WebRTC engine:
//!
//! 1. find the first `m=` line mentioning the media type
//! 2. find the first `a=rtpmap` line mentioning the codec
//! 3. pull the payload type out of that rtpmap line
//! 4. move the payload type to the front of the `m=` format list
//!
//! Any step that finds nothing leaves the SDP untouched. Only the first
//! matching `m=` line is rewritten, even when several sections share the
//! same media type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SdpError;
use crate::lines::{find_line, CRLF};
use crate::media_line::set_default_codec;
use crate::rtpmap::codec_payload_type;

/// Transport direction a preference is applied for
///
/// Only used to label log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Outgoing media
    #[default]
    Send,
    /// Incoming media
    Recv,
}

impl Direction {
    /// SDP-style lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Send => "send",
            Direction::Recv => "recv",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = SdpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "send" => Ok(Direction::Send),
            "recv" => Ok(Direction::Recv),
            _ => Err(SdpError::invalid_direction(s)),
        }
    }
}

/// Sets `codec` as the default `media_type` codec if it's present.
///
/// `codec` is usually given as `NAME/RATE`, e.g. `opus/48000`, but any
/// substring of an `a=rtpmap` line works; matching is case-insensitive. An
/// empty `codec` means "no preference" and returns the SDP as it is.
///
/// The SDP is returned unchanged when there is no matching `m=` line, no
/// matching `a=rtpmap` line, or the rtpmap line has no recognisable payload
/// type. This function never fails.
///
/// # Examples
///
/// ```
/// use audiopref_sdp_core::{apply_codec_preference, Direction};
///
/// let sdp = "v=0\r\nm=audio 9 UDP/TLS/RTP/SAVPF 111 103 104\r\na=rtpmap:103 ISAC/16000\r\n";
/// let munged = apply_codec_preference(sdp, "audio", Direction::Send, "ISAC/16000");
/// assert_eq!(
///     munged,
///     "v=0\r\nm=audio 9 UDP/TLS/RTP/SAVPF 103 111 104\r\na=rtpmap:103 ISAC/16000\r\n"
/// );
/// ```
pub fn apply_codec_preference(
    sdp: &str,
    media_type: &str,
    direction: Direction,
    codec: &str,
) -> String {
    if codec.is_empty() {
        debug!("No preference on {} {} codec.", media_type, direction);
        return sdp.to_string();
    }

    info!("Prefer {} {} codec: {}", media_type, direction, codec);

    let mut sdp_lines: Vec<String> = sdp.split(CRLF).map(str::to_string).collect();

    let Some(m_line_index) = find_line(&sdp_lines, "m=", media_type) else {
        debug!("No {} m= line, leaving SDP unchanged", media_type);
        return sdp.to_string();
    };

    let Some(codec_index) = find_line(&sdp_lines, "a=rtpmap", codec) else {
        debug!("Codec {} not offered, leaving SDP unchanged", codec);
        return sdp.to_string();
    };

    let Some(payload) = codec_payload_type(&sdp_lines[codec_index]) else {
        debug!(
            "No payload type in {:?}, leaving SDP unchanged",
            sdp_lines[codec_index]
        );
        return sdp.to_string();
    };

    let rewritten = set_default_codec(&sdp_lines[m_line_index], payload);
    debug!("Rewrote {:?} as {:?}", sdp_lines[m_line_index], rewritten);
    sdp_lines[m_line_index] = rewritten;

    sdp_lines.join(CRLF)
}

/// A codec preference for one media type and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecPreference {
    /// Media type matched against `m=` lines
    pub media_type: String,
    /// Direction, for log output
    pub direction: Direction,
    /// Codec matched against `a=rtpmap` lines; empty means no preference
    pub codec: String,
}

impl Default for CodecPreference {
    fn default() -> Self {
        CodecPreference {
            media_type: "audio".to_string(),
            direction: Direction::Send,
            codec: String::new(),
        }
    }
}

impl CodecPreference {
    /// Create a new codec preference
    pub fn new(media_type: impl Into<String>, direction: Direction, codec: impl Into<String>) -> Self {
        CodecPreference {
            media_type: media_type.into(),
            direction,
            codec: codec.into(),
        }
    }

    /// Prefer `codec` for outgoing audio
    pub fn audio_send(codec: impl Into<String>) -> Self {
        Self::new("audio", Direction::Send, codec)
    }

    /// Whether applying this preference can never change an SDP
    pub fn is_noop(&self) -> bool {
        self.codec.is_empty()
    }

    /// Apply this preference to `sdp`
    pub fn apply(&self, sdp: &str) -> String {
        apply_codec_preference(sdp, &self.media_type, self.direction, &self.codec)
    }
}
