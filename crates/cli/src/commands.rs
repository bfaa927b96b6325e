use std::borrow::Cow;
use std::io::{Read, Write};

use anyhow::{Context, Result};
use audiopref_sdp_core::{list_codecs, CodecPreference};
use tracing::debug;

/// Normalise line endings to CRLF; every `\n` not already preceded by `\r`
/// gains one
pub fn normalize_line_endings(sdp: &str) -> Cow<'_, str> {
    let has_lone_lf = sdp
        .match_indices('\n')
        .any(|(idx, _)| !sdp[..idx].ends_with('\r'));
    if !has_lone_lf {
        return Cow::Borrowed(sdp);
    }

    debug!("Converting LF line endings to CRLF");
    let mut normalized = String::with_capacity(sdp.len() + sdp.len() / 16);
    let mut previous = None;
    for c in sdp.chars() {
        if c == '\n' && previous != Some('\r') {
            normalized.push('\r');
        }
        normalized.push(c);
        previous = Some(c);
    }
    Cow::Owned(normalized)
}

fn read_sdp(input: &mut dyn Read) -> Result<String> {
    let mut sdp = String::new();
    input
        .read_to_string(&mut sdp)
        .context("Failed to read SDP input")?;
    Ok(sdp)
}

/// Apply `preference` to the SDP read from `input`, writing the result to `output`
pub fn run_prefer(
    preference: &CodecPreference,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let sdp = read_sdp(input)?;
    let munged = preference.apply(&normalize_line_endings(&sdp));
    output
        .write_all(munged.as_bytes())
        .context("Failed to write SDP")?;
    Ok(())
}

/// List the codecs of the first `media_type` section, one `<pt> <name>/<rate>` per line
pub fn run_codecs(media_type: &str, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
    let sdp = read_sdp(input)?;
    let codecs = list_codecs(&sdp, media_type);
    if codecs.is_empty() {
        debug!("No {} codecs found", media_type);
    }

    for codec in codecs {
        let mut line = format!("{} {}", codec.payload_type, codec.codec_spec());
        if let Some(params) = &codec.encoding_params {
            line.push('/');
            line.push_str(params);
        }
        writeln!(output, "{}", line).context("Failed to write codec list")?;
    }
    Ok(())
}
