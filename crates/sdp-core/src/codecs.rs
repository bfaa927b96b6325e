//! Codec listing for a media section

use tracing::debug;

use crate::lines::{find_line, find_line_in_range};
use crate::media_line::MediaLine;
use crate::rtpmap::RtpMap;

/// List the rtpmap entries of the first media section matching `media_type`.
///
/// The section runs from its `m=` line to the next `m=` line. Entries come
/// back in the order of the `m=` format list; rtpmap lines for payload types
/// the `m=` line does not carry, and lines that fail to parse, are skipped.
/// Static payload types without an rtpmap line are not reported.
///
/// Accepts both CRLF and LF line endings.
///
/// # Examples
///
/// ```
/// use audiopref_sdp_core::list_codecs;
///
/// let sdp = "v=0\r\nm=audio 9 RTP/AVP 8 0\r\na=rtpmap:0 PCMU/8000\r\na=rtpmap:8 PCMA/8000\r\n";
/// let codecs: Vec<String> = list_codecs(sdp, "audio").iter().map(|c| c.codec_spec()).collect();
/// assert_eq!(codecs, vec!["PCMA/8000", "PCMU/8000"]);
/// ```
pub fn list_codecs(sdp: &str, media_type: &str) -> Vec<RtpMap> {
    let lines: Vec<&str> = sdp.lines().collect();

    let Some(m_line_index) = find_line(&lines, "m=", media_type) else {
        return Vec::new();
    };

    let media = match MediaLine::parse(lines[m_line_index]) {
        Ok(media) => media,
        Err(e) => {
            debug!("Cannot list codecs: {}", e);
            return Vec::new();
        }
    };

    let section_end = find_line_in_range(&lines, m_line_index + 1, None, "m=", "");

    let mut codecs: Vec<(usize, RtpMap)> = lines[m_line_index + 1..section_end.unwrap_or(lines.len())]
        .iter()
        .filter(|line| line.starts_with("a=rtpmap:"))
        .filter_map(|line| match RtpMap::parse(line) {
            Ok(map) => Some(map),
            Err(e) => {
                debug!("Skipping rtpmap: {}", e);
                None
            }
        })
        .filter_map(|map| media.format_position(&map.payload_type).map(|pos| (pos, map)))
        .collect();

    codecs.sort_by_key(|(pos, _)| *pos);
    codecs.into_iter().map(|(_, map)| map).collect()
}
