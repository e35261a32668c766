//! Sliding-window live playlist synthesis
//!
//! Turns a DVR/media playlist into a short live playlist covering only its
//! most recent segments. The output keeps the source segment order, restates
//! the rolling header, renumbers the media sequence for the window, and
//! resolves every segment URI to absolute form. No `#EXT-X-ENDLIST` is ever
//! emitted: the result is an open-ended live playlist.

use url::Url;

use super::error::RelayError;
use crate::parsers::playlist::{
    extract_segments, playlist_lines, resolve_uri, MediaHeader, Segment,
};

/// Build a sliding-window live playlist from media playlist text.
///
/// `window_size` must be at least 1 (enforced by config validation). When the
/// source holds fewer segments than the window, all of them are kept. Fails
/// with [`RelayError::NoSegmentsFound`] when the source has no segment pairs;
/// the caller must not write any output in that case.
pub fn build_live(content: &str, base: &Url, window_size: usize) -> Result<String, RelayError> {
    let lines = playlist_lines(content);
    let segments = extract_segments(&lines);

    if segments.is_empty() {
        return Err(RelayError::NoSegmentsFound);
    }

    let header = MediaHeader::from_lines(&lines);
    let window = tail_window(&segments, window_size);

    // The first windowed segment inherits the sequence number it had in the
    // full list: media_sequence plus however many segments were dropped.
    let first_sequence = header.media_sequence + (segments.len() - window.len()) as u64;

    let mut out_lines = vec![
        "#EXTM3U".to_string(),
        "#EXT-X-VERSION:3".to_string(),
        format!("#EXT-X-TARGETDURATION:{}", header.target_duration),
        format!("#EXT-X-MEDIA-SEQUENCE:{}", first_sequence),
    ];

    for segment in window {
        let absolute = resolve_uri(base, &segment.uri).map_err(|e| RelayError::InvalidUrl {
            url: segment.uri.clone(),
            message: e.to_string(),
        })?;
        out_lines.push(segment.extinf.clone());
        out_lines.push(absolute);
    }

    Ok(out_lines.join("\n") + "\n")
}

fn tail_window(segments: &[Segment], window_size: usize) -> &[Segment] {
    if segments.len() >= window_size {
        &segments[segments.len() - window_size..]
    } else {
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media_playlist(media_sequence: Option<u64>, segment_count: usize) -> String {
        let mut text = String::from("#EXTM3U\n#EXT-X-VERSION:3\n");
        if let Some(seq) = media_sequence {
            text.push_str("#EXT-X-TARGETDURATION:6\n");
            text.push_str(&format!("#EXT-X-MEDIA-SEQUENCE:{}\n", seq));
        }
        for i in 0..segment_count {
            text.push_str(&format!("#EXTINF:6.000,\nseg_{}.ts\n", i));
        }
        text
    }

    fn base() -> Url {
        Url::parse("https://cdn.example.com/rdxgoa/").unwrap()
    }

    #[test]
    fn test_window_keeps_last_n_segments_in_order() {
        let text = media_playlist(Some(0), 7);
        let live = build_live(&text, &base(), 4).unwrap();

        for kept in 3..7 {
            assert!(live.contains(&format!("https://cdn.example.com/rdxgoa/seg_{}.ts", kept)));
        }
        for dropped in 0..3 {
            assert!(!live.contains(&format!("seg_{}.ts", dropped)));
        }

        let seg3 = live.find("seg_3.ts").unwrap();
        let seg6 = live.find("seg_6.ts").unwrap();
        assert!(seg3 < seg6, "window must preserve source order");
    }

    #[test]
    fn test_window_smaller_than_available() {
        let text = media_playlist(Some(0), 2);
        let live = build_live(&text, &base(), 4).unwrap();

        assert!(live.contains("seg_0.ts"));
        assert!(live.contains("seg_1.ts"));
        assert!(live.contains("#EXT-X-MEDIA-SEQUENCE:0\n"));
    }

    #[test]
    fn test_sequence_arithmetic() {
        // media_sequence=10, 7 segments, window 4 => first emitted seq is 13.
        let text = media_playlist(Some(10), 7);
        let live = build_live(&text, &base(), 4).unwrap();

        assert!(live.contains("#EXT-X-MEDIA-SEQUENCE:13\n"));
    }

    #[test]
    fn test_header_defaults_without_directives() {
        let text = media_playlist(None, 5);
        let live = build_live(&text, &base(), 4).unwrap();

        assert!(live.contains("#EXT-X-TARGETDURATION:6\n"));
        assert!(live.contains("#EXT-X-MEDIA-SEQUENCE:1\n"));
    }

    #[test]
    fn test_no_endlist_marker() {
        let text = format!("{}#EXT-X-ENDLIST\n", media_playlist(Some(0), 5));
        let live = build_live(&text, &base(), 4).unwrap();

        assert!(!live.contains("#EXT-X-ENDLIST"));
        assert!(live.ends_with(".ts\n"));
    }

    #[test]
    fn test_exact_output_shape() {
        let text = media_playlist(Some(2), 3);
        let live = build_live(&text, &base(), 2).unwrap();

        assert_eq!(
            live,
            "#EXTM3U\n\
             #EXT-X-VERSION:3\n\
             #EXT-X-TARGETDURATION:6\n\
             #EXT-X-MEDIA-SEQUENCE:3\n\
             #EXTINF:6.000,\n\
             https://cdn.example.com/rdxgoa/seg_1.ts\n\
             #EXTINF:6.000,\n\
             https://cdn.example.com/rdxgoa/seg_2.ts\n"
        );
    }

    #[test]
    fn test_absolute_uris_pass_through() {
        let text = "#EXTM3U\n#EXTINF:6.000,\nhttps://other.cdn/seg.ts\n";
        let live = build_live(text, &base(), 4).unwrap();

        assert!(live.contains("\nhttps://other.cdn/seg.ts\n"));
    }

    #[test]
    fn test_no_segments_is_fatal() {
        let text = "#EXTM3U\n#EXT-X-TARGETDURATION:6\n";
        assert!(matches!(
            build_live(text, &base(), 4),
            Err(RelayError::NoSegmentsFound)
        ));
    }
}
