//! Error types for strict SDP parsing
//!
//! The codec preference rewriter never returns these: every failure on its
//! path degrades to passing the SDP through unchanged. They are produced by
//! the typed parsers (`RtpMap::parse`, `MediaLine::parse`, `Direction::from_str`)
//! that callers use when they want to know *why* a line was rejected.

use thiserror::Error;

/// Result type alias for SDP parsing operations
pub type Result<T> = std::result::Result<T, SdpError>;

/// Errors raised by the strict SDP line parsers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdpError {
    /// Malformed `m=` line
    #[error("Invalid m= line: {details}")]
    InvalidMediaLine { details: String },

    /// Malformed `a=rtpmap` attribute
    #[error("Invalid rtpmap attribute: {details}")]
    InvalidRtpMap { details: String },

    /// Unknown transport direction
    #[error("Invalid direction: {value} (expected send or recv)")]
    InvalidDirection { value: String },
}

impl SdpError {
    /// Create a new invalid media line error
    pub fn invalid_media_line(details: impl Into<String>) -> Self {
        Self::InvalidMediaLine {
            details: details.into(),
        }
    }

    /// Create a new invalid rtpmap error
    pub fn invalid_rtpmap(details: impl Into<String>) -> Self {
        Self::InvalidRtpMap {
            details: details.into(),
        }
    }

    /// Create a new invalid direction error
    pub fn invalid_direction(value: impl Into<String>) -> Self {
        Self::InvalidDirection {
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SdpError::invalid_rtpmap("a=rtpmap:x opus");
        assert_eq!(
            err.to_string(),
            "Invalid rtpmap attribute: a=rtpmap:x opus"
        );

        let err = SdpError::invalid_direction("sideways");
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            SdpError::invalid_media_line("m=audio"),
            SdpError::InvalidMediaLine { .. }
        ));
    }
}
