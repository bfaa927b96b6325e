// Media description (m=) line handling
//
// Format: m=<media> <port>[/<port-count>] <proto> <fmt> [<fmt>]*

use std::fmt;

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, space0, space1},
    combinator::{map_res, opt},
    multi::many0,
    sequence::{preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SdpError};

/// Returns a new m= line with `payload` as the first format.
///
/// The line is split on single spaces. The first three elements (media,
/// port, protocol) are copied as they are, then `payload`, then every other
/// element in its original order with any copy of `payload` dropped.
///
/// # Examples
///
/// ```
/// use audiopref_sdp_core::media_line::set_default_codec;
///
/// assert_eq!(
///     set_default_codec("m=audio 9 UDP/TLS/RTP/SAVPF 111 103 104", "103"),
///     "m=audio 9 UDP/TLS/RTP/SAVPF 103 111 104"
/// );
/// ```
pub fn set_default_codec(m_line: &str, payload: &str) -> String {
    let elements: Vec<&str> = m_line.split(' ').collect();

    let mut new_line: Vec<&str> = elements.iter().take(3).copied().collect();
    new_line.push(payload);
    new_line.extend(elements.iter().skip(3).filter(|fmt| **fmt != payload));

    new_line.join(" ")
}

/// A parsed media description line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLine {
    /// Media type (audio, video, application, ...)
    pub media: String,
    /// Transport port
    pub port: u16,
    /// Number of ports, when given as `<port>/<count>`
    pub port_count: Option<u16>,
    /// Transport protocol, e.g. `UDP/TLS/RTP/SAVPF`
    pub protocol: String,
    /// Format list in preference order
    pub formats: Vec<String>,
}

fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_ascii_whitespace())(input)
}

fn port(input: &str) -> IResult<&str, u16> {
    map_res(digit1, str::parse::<u16>)(input)
}

fn media_line(input: &str) -> IResult<&str, MediaLine> {
    let (input, _) = opt(tag("m="))(input)?;
    let (input, (media, _, port, port_count, _, protocol, formats, _)) = tuple((
        token,
        space1,
        port,
        opt(preceded(char('/'), port)),
        space1,
        token,
        many0(preceded(space1, token)),
        space0,
    ))(input)?;

    Ok((
        input,
        MediaLine {
            media: media.to_string(),
            port,
            port_count,
            protocol: protocol.to_string(),
            formats: formats.into_iter().map(str::to_string).collect(),
        },
    ))
}

impl MediaLine {
    /// Parse an m= line, with or without the `m=` prefix.
    ///
    /// At least one format is required.
    pub fn parse(line: &str) -> Result<Self> {
        match media_line(line.trim()) {
            Ok(("", media)) if !media.formats.is_empty() => Ok(media),
            Ok((_, media)) if media.formats.is_empty() => {
                Err(SdpError::invalid_media_line(format!("no formats in: {}", line)))
            }
            _ => Err(SdpError::invalid_media_line(line)),
        }
    }

    /// Position of `payload_type` in the format list
    pub fn format_position(&self, payload_type: &str) -> Option<usize> {
        self.formats.iter().position(|fmt| fmt == payload_type)
    }
}

impl fmt::Display for MediaLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m={} {}", self.media, self.port)?;
        if let Some(count) = self.port_count {
            write!(f, "/{}", count)?;
        }
        write!(f, " {}", self.protocol)?;
        for format in &self.formats {
            write!(f, " {}", format)?;
        }
        Ok(())
    }
}
