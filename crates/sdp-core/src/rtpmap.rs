//! `a=rtpmap` attribute parsing
//!
//! Two parsers live here. [`codec_payload_type`] is the lenient lookup used by
//! the codec preference rewriter: it looks for `a=rtpmap:<digits> <word>/<digits>`
//! anywhere in the line and yields the payload type, or nothing. [`RtpMap::parse`]
//! is the strict parser that returns every field of the attribute
//! ([RFC 8866 Section 6.6](https://datatracker.ietf.org/doc/html/rfc8866#section-6.6)).

use std::fmt;

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, space1},
    combinator::{all_consuming, opt, rest},
    sequence::{preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SdpError};

const RTPMAP_TAG: &str = "a=rtpmap:";

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `a=rtpmap:<digits> <word>/<digits>`, yielding the digits after the tag
fn payload_type_pattern(input: &str) -> IResult<&str, &str> {
    let (input, _) = tag(RTPMAP_TAG)(input)?;
    let (input, payload) = digit1(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, _) = take_while1(is_word_char)(input)?;
    let (input, _) = char('/')(input)?;
    let (input, _) = digit1(input)?;
    Ok((input, payload))
}

/// Get the codec payload type from an `a=rtpmap:X` line.
///
/// The pattern may start anywhere in the line. Lines that do not match yield
/// `None`; this never fails.
///
/// # Examples
///
/// ```
/// use audiopref_sdp_core::rtpmap::codec_payload_type;
///
/// assert_eq!(codec_payload_type("a=rtpmap:111 opus/48000/2"), Some("111"));
/// assert_eq!(codec_payload_type("a=rtpmap:96 H264-SVC/90000"), None);
/// assert_eq!(codec_payload_type("a=fmtp:111 minptime=10"), None);
/// ```
pub fn codec_payload_type(line: &str) -> Option<&str> {
    line.match_indices(RTPMAP_TAG)
        .find_map(|(idx, _)| payload_type_pattern(&line[idx..]).ok())
        .map(|(_, payload)| payload)
}

/// A parsed `a=rtpmap` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtpMap {
    /// Payload type exactly as written in the SDP
    pub payload_type: String,
    /// Encoding name, e.g. `opus`, `PCMU`
    pub encoding_name: String,
    /// Clock rate in Hz
    pub clock_rate: u32,
    /// Encoding parameters (channel count for audio)
    pub encoding_params: Option<String>,
}

type RtpMapParts<'a> = (&'a str, &'a str, &'a str, Option<&'a str>);

fn rtpmap_value(input: &str) -> IResult<&str, RtpMapParts<'_>> {
    let (input, (payload_type, _, encoding_name, _, clock_rate, encoding_params)) = tuple((
        digit1,
        space1,
        take_while1(|c: char| c != '/' && !c.is_ascii_whitespace()),
        char('/'),
        digit1,
        opt(preceded(char('/'), rest)),
    ))(input)?;

    Ok((input, (payload_type, encoding_name, clock_rate, encoding_params)))
}

impl RtpMap {
    /// Parse an rtpmap attribute, with or without the `a=rtpmap:` prefix.
    ///
    /// Format: `<payload type> <encoding name>/<clock rate>[/<encoding parameters>]`
    ///
    /// # Examples
    ///
    /// ```
    /// use audiopref_sdp_core::RtpMap;
    ///
    /// let map = RtpMap::parse("a=rtpmap:111 opus/48000/2").unwrap();
    /// assert_eq!(map.payload_type, "111");
    /// assert_eq!(map.encoding_name, "opus");
    /// assert_eq!(map.clock_rate, 48000);
    /// assert_eq!(map.encoding_params.as_deref(), Some("2"));
    /// assert_eq!(map.codec_spec(), "opus/48000");
    /// ```
    pub fn parse(line: &str) -> Result<Self> {
        let value = line.trim();
        let value = value.strip_prefix(RTPMAP_TAG).unwrap_or(value);

        let (_, (payload_type, encoding_name, clock_rate, encoding_params)) =
            all_consuming(rtpmap_value)(value)
                .map_err(|_| SdpError::invalid_rtpmap(line))?;

        let clock_rate = clock_rate
            .parse::<u32>()
            .map_err(|_| SdpError::invalid_rtpmap(format!("clock rate out of range: {}", line)))?;

        let encoding_params = match encoding_params {
            Some("") => return Err(SdpError::invalid_rtpmap(line)),
            other => other.map(str::to_string),
        };

        Ok(RtpMap {
            payload_type: payload_type.to_string(),
            encoding_name: encoding_name.to_string(),
            clock_rate,
            encoding_params,
        })
    }

    /// `NAME/RATE`, the form a codec preference is expressed in
    pub fn codec_spec(&self) -> String {
        format!("{}/{}", self.encoding_name, self.clock_rate)
    }
}

impl fmt::Display for RtpMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}/{}",
            RTPMAP_TAG, self.payload_type, self.encoding_name, self.clock_rate
        )?;
        if let Some(params) = &self.encoding_params {
            write!(f, "/{}", params)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_type_from_common_lines() {
        assert_eq!(codec_payload_type("a=rtpmap:103 ISAC/16000"), Some("103"));
        assert_eq!(codec_payload_type("a=rtpmap:0 PCMU/8000"), Some("0"));
        assert_eq!(codec_payload_type("a=rtpmap:126 telephone_event/8000"), Some("126"));
    }

    #[test]
    fn test_payload_type_rejects_non_word_names() {
        // '-' is not a word character, so the name never reaches the '/'
        assert_eq!(codec_payload_type("a=rtpmap:126 telephone-event/8000"), None);
    }

    #[test]
    fn test_payload_type_rejects_malformed_lines() {
        assert_eq!(codec_payload_type("a=rtpmap:abc opus/48000"), None);
        assert_eq!(codec_payload_type("a=rtpmap:111 opus"), None);
        assert_eq!(codec_payload_type("a=rtpmap:111  opus/48000"), None);
        assert_eq!(codec_payload_type("a=rtpmap:111 opus/"), None);
        assert_eq!(codec_payload_type(""), None);
    }

    #[test]
    fn test_payload_type_unanchored() {
        assert_eq!(codec_payload_type("x a=rtpmap:8 PCMA/8000"), Some("8"));
        // First occurrence is malformed, second one matches
        assert_eq!(
            codec_payload_type("a=rtpmap:z a=rtpmap:9 G722/8000"),
            Some("9")
        );
    }

    #[test]
    fn test_parse_rtpmap() {
        let map = RtpMap::parse("a=rtpmap:0 PCMU/8000").unwrap();
        assert_eq!(map.payload_type, "0");
        assert_eq!(map.encoding_name, "PCMU");
        assert_eq!(map.clock_rate, 8000);
        assert_eq!(map.encoding_params, None);

        let map = RtpMap::parse("101 telephone-event/8000").unwrap();
        assert_eq!(map.encoding_name, "telephone-event");
    }

    #[test]
    fn test_parse_rtpmap_invalid() {
        assert!(RtpMap::parse("a=rtpmap:111").is_err());
        assert!(RtpMap::parse("a=rtpmap:111 opus").is_err());
        assert!(RtpMap::parse("a=rtpmap:x opus/48000").is_err());
        assert!(RtpMap::parse("a=rtpmap:111 opus/48000/").is_err());
        assert!(RtpMap::parse("a=rtpmap:111 opus/99999999999").is_err());
    }

    #[test]
    fn test_rtpmap_display() {
        let line = "a=rtpmap:111 opus/48000/2";
        assert_eq!(RtpMap::parse(line).unwrap().to_string(), line);
    }
}
