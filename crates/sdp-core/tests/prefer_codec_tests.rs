//! Codec preference rewriting against whole SDP documents
//!
//! Covers the documented passthrough cases and, with proptest, the
//! invariants that hold for every rewrite: payload first, formats
//! preserved, other lines untouched, idempotence.

use audiopref_sdp_core::{apply_codec_preference, CodecPreference, Direction};
use proptest::prelude::*;

const CRLF: &str = "\r\n";

fn base_sdp() -> String {
    [
        "v=0",
        "o=- 1433832402044130222 3 IN IP4 127.0.0.1",
        "s=-",
        "t=0 0",
        "a=group:BUNDLE audio",
        "m=audio 9 UDP/TLS/RTP/SAVPF 111 103 104",
        "c=IN IP4 0.0.0.0",
        "a=rtcp:9 IN IP4 0.0.0.0",
        "a=mid:audio",
        "a=sendrecv",
        "a=rtpmap:111 opus/48000/2",
        "a=fmtp:111 minptime=10;useinbandfec=1",
        "a=rtpmap:103 ISAC/16000",
        "a=rtpmap:104 ISAC/32000",
        "",
    ]
    .join(CRLF)
}

fn m_line(sdp: &str) -> String {
    sdp.split(CRLF)
        .find(|line| line.starts_with("m="))
        .expect("SDP has an m= line")
        .to_string()
}

#[test]
fn test_prefer_isac_16000() {
    let sdp = base_sdp();
    let munged = apply_codec_preference(&sdp, "audio", Direction::Send, "ISAC/16000");
    assert_eq!(m_line(&munged), "m=audio 9 UDP/TLS/RTP/SAVPF 103 111 104");
}

#[test]
fn test_empty_codec_returns_input() {
    let sdp = base_sdp();
    assert_eq!(apply_codec_preference(&sdp, "audio", Direction::Send, ""), sdp);
}

#[test]
fn test_missing_media_section_returns_input() {
    let sdp = base_sdp();
    assert_eq!(
        apply_codec_preference(&sdp, "video", Direction::Send, "ISAC/16000"),
        sdp
    );
}

#[test]
fn test_codec_not_offered_returns_input() {
    let sdp = base_sdp().replace("a=rtpmap:111 opus/48000/2", "a=rtpmap:111 G722/8000");
    assert_eq!(apply_codec_preference(&sdp, "audio", Direction::Send, "opus"), sdp);
}

#[test]
fn test_only_first_audio_section_is_rewritten() {
    let sdp = [
        "v=0",
        "m=audio 9 RTP/AVP 0 8",
        "a=rtpmap:0 PCMU/8000",
        "a=rtpmap:8 PCMA/8000",
        "m=audio 9 RTP/AVP 0 8",
        "a=rtpmap:0 PCMU/8000",
        "a=rtpmap:8 PCMA/8000",
    ]
    .join(CRLF);

    let munged = apply_codec_preference(&sdp, "audio", Direction::Recv, "PCMA/8000");
    let lines: Vec<&str> = munged.split(CRLF).collect();
    assert_eq!(lines[1], "m=audio 9 RTP/AVP 8 0");
    assert_eq!(lines[4], "m=audio 9 RTP/AVP 0 8");
}

#[test]
fn test_rtpmap_lookup_spans_whole_document() {
    // The rtpmap search is not limited to the matched media section
    let sdp = [
        "v=0",
        "m=video 9 RTP/AVP 96",
        "a=rtpmap:96 VP8/90000",
        "m=audio 9 RTP/AVP 0 8",
        "a=rtpmap:0 PCMU/8000",
    ]
    .join(CRLF);

    let munged = apply_codec_preference(&sdp, "audio", Direction::Send, "VP8");
    assert!(munged.contains("m=audio 9 RTP/AVP 96 0 8"));
}

#[test]
fn test_offer_and_answer_legs() {
    let preference = CodecPreference::audio_send("ISAC/32000");
    let offer = preference.apply(&base_sdp());
    let answer = preference.apply(&offer);
    assert_eq!(m_line(&offer), "m=audio 9 UDP/TLS/RTP/SAVPF 104 111 103");
    assert_eq!(offer, answer);
}

#[test]
fn test_preference_from_json() {
    let preference: CodecPreference =
        serde_json::from_str(r#"{"codec": "ISAC/16000", "direction": "recv"}"#).unwrap();
    assert_eq!(preference.media_type, "audio");
    assert_eq!(preference.direction, Direction::Recv);
    assert_eq!(
        m_line(&preference.apply(&base_sdp())),
        "m=audio 9 UDP/TLS/RTP/SAVPF 103 111 104"
    );
}

/// Build an SDP with one audio section carrying `payloads`, each mapped to a
/// distinct codec name.
fn sdp_with_payloads(payloads: &[u8]) -> String {
    let mut lines = vec![
        "v=0".to_string(),
        "s=-".to_string(),
        format!(
            "m=audio 9 UDP/TLS/RTP/SAVPF {}",
            payloads.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" ")
        ),
        "a=sendrecv".to_string(),
    ];
    for payload in payloads {
        lines.push(format!("a=rtpmap:{} codec{}x/8000", payload, payload));
    }
    lines.join(CRLF)
}

fn sorted(mut tokens: Vec<String>) -> Vec<String> {
    tokens.sort();
    tokens
}

fn formats(m_line: &str) -> Vec<String> {
    m_line.split(' ').skip(3).map(str::to_string).collect()
}

fn payload_lists() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::btree_set(0u8..128, 1..8).prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_empty_codec_is_identity(sdp in "[ -~]{0,40}(\r\n[ -~]{0,40}){0,8}") {
        prop_assert_eq!(apply_codec_preference(&sdp, "audio", Direction::Send, ""), sdp);
    }

    #[test]
    fn prop_no_media_line_is_identity(
        lines in prop::collection::vec("[a-lo-z]=[ -~]{0,30}", 0..10),
        codec in "[a-z]{1,6}",
    ) {
        let sdp = lines.join(CRLF);
        prop_assert_eq!(apply_codec_preference(&sdp, "audio", Direction::Send, &codec), sdp);
    }

    #[test]
    fn prop_unknown_codec_is_identity(payloads in payload_lists()) {
        let sdp = sdp_with_payloads(&payloads);
        prop_assert_eq!(
            apply_codec_preference(&sdp, "audio", Direction::Send, "opus/48000"),
            sdp
        );
    }

    #[test]
    fn prop_rewrite_preserves_formats(payloads in payload_lists(), pick in any::<prop::sample::Index>()) {
        let sdp = sdp_with_payloads(&payloads);
        let chosen = payloads[pick.index(payloads.len())];
        let codec = format!("codec{}x/8000", chosen);

        let munged = apply_codec_preference(&sdp, "audio", Direction::Send, &codec);

        let before: Vec<&str> = sdp.split(CRLF).collect();
        let after: Vec<&str> = munged.split(CRLF).collect();
        prop_assert_eq!(before.len(), after.len());

        for (i, (old, new)) in before.iter().zip(after.iter()).enumerate() {
            if old.starts_with("m=") {
                let new_formats = formats(new);
                prop_assert_eq!(&new_formats[0], &chosen.to_string());
                prop_assert_eq!(sorted(new_formats), sorted(formats(old)));
                prop_assert_eq!(new.split(' ').take(3).collect::<Vec<_>>(), old.split(' ').take(3).collect::<Vec<_>>());
            } else {
                prop_assert_eq!(old, new, "line {} changed", i);
            }
        }
    }

    #[test]
    fn prop_rewrite_is_idempotent(payloads in payload_lists(), pick in any::<prop::sample::Index>()) {
        let sdp = sdp_with_payloads(&payloads);
        let codec = format!("codec{}x/8000", payloads[pick.index(payloads.len())]);

        let once = apply_codec_preference(&sdp, "audio", Direction::Send, &codec);
        let twice = apply_codec_preference(&once, "audio", Direction::Send, &codec);
        prop_assert_eq!(once, twice);
    }
}
