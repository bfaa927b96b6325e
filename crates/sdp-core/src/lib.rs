//! # SDP-Core: Codec Preference Rewriting
//!
//! This crate reorders the codec list of an SDP offer or answer so that a
//! chosen codec is negotiated first. It is meant to sit between a WebRTC
//! engine's `create_offer`/`create_answer` and the point where the
//! description is handed to the remote peer.
//!
//! ## Usage
//!
//! ```rust
//! use audiopref_sdp_core::{CodecPreference, Direction};
//!
//! let offer = "v=0\r\n\
//! m=audio 9 UDP/TLS/RTP/SAVPF 111 103 104\r\n\
//! a=rtpmap:111 opus/48000/2\r\n\
//! a=rtpmap:103 ISAC/16000\r\n";
//!
//! let preference = CodecPreference::new("audio", Direction::Send, "ISAC/16000");
//! let munged = preference.apply(offer);
//! assert!(munged.contains("m=audio 9 UDP/TLS/RTP/SAVPF 103 111 104\r\n"));
//! ```
//!
//! ## Behaviour
//!
//! - Only the first `m=` line matching the media type is touched
//! - The codec is matched by case-insensitive substring against `a=rtpmap`
//!   lines; the first hit wins
//! - Every lookup miss returns the SDP unchanged, nothing here fails
//!
//! The typed parsers ([`RtpMap`], [`MediaLine`]) are strict and return
//! [`SdpError`]; they back [`list_codecs`] and are available to callers.

pub mod codecs;
pub mod error;
pub mod lines;
pub mod media_line;
pub mod preference;
pub mod rtpmap;

pub use codecs::list_codecs;
pub use error::{Result, SdpError};
pub use media_line::MediaLine;
pub use preference::{apply_codec_preference, CodecPreference, Direction};
pub use rtpmap::RtpMap;
