//! Line search over split SDP text
//!
//! SDP is handled here as an ordered slice of lines. Lookups match on a line
//! prefix (`m=`, `a=rtpmap`) and, optionally, a case-insensitive substring
//! anywhere in the line.

/// SDP line separator
pub const CRLF: &str = "\r\n";

/// Find the first line that starts with `prefix` and, if `substr` is not
/// empty, contains `substr` (case-insensitive).
///
/// # Examples
///
/// ```
/// use audiopref_sdp_core::lines::find_line;
///
/// let lines = ["v=0", "m=audio 9 UDP/TLS/RTP/SAVPF 111", "a=rtpmap:111 opus/48000/2"];
/// assert_eq!(find_line(&lines, "m=", "AUDIO"), Some(1));
/// assert_eq!(find_line(&lines, "a=rtpmap", "opus"), Some(2));
/// assert_eq!(find_line(&lines, "m=", "video"), None);
/// ```
pub fn find_line<S: AsRef<str>>(lines: &[S], prefix: &str, substr: &str) -> Option<usize> {
    find_line_in_range(lines, 0, None, prefix, substr)
}

/// Find the first line in `lines[start..end]` that starts with `prefix` and,
/// if `substr` is not empty, contains `substr` (case-insensitive).
///
/// `end = None` searches to the end of the slice. Out of range bounds are
/// clamped rather than rejected.
pub fn find_line_in_range<S: AsRef<str>>(
    lines: &[S],
    start: usize,
    end: Option<usize>,
    prefix: &str,
    substr: &str,
) -> Option<usize> {
    let end = end.unwrap_or(lines.len()).min(lines.len());
    if start >= end {
        return None;
    }

    let needle = substr.to_lowercase();
    lines[start..end]
        .iter()
        .position(|line| {
            let line = line.as_ref();
            line.starts_with(prefix) && (needle.is_empty() || line.to_lowercase().contains(&needle))
        })
        .map(|offset| start + offset)
}
