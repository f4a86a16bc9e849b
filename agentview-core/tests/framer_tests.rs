//! Split-invariance tests for chunk framing and classification

use agentview_core::stream::{ChunkFramer, EventClassifier};
use agentview_core::{ProtocolEvent, TranscriptAccumulator};
use proptest::prelude::*;
use serde_json::json;

/// Decode a stream delivered as the given chunks
fn decode(chunks: &[&[u8]]) -> Vec<ProtocolEvent> {
    let mut framer = ChunkFramer::new();
    let mut classifier = EventClassifier::new();
    let mut events = Vec::new();

    for chunk in chunks {
        for line in framer.feed(chunk) {
            events.extend(classifier.classify(&line));
        }
    }
    if let Some(line) = framer.flush() {
        events.extend(classifier.classify(&line));
    }
    events
}

/// Build a protocol stream with keep-alives and a thought step mixed in
fn build_stream(texts: &[String], trailing_newline: bool) -> String {
    let mut out = String::new();
    for (i, text) in texts.iter().enumerate() {
        if i % 3 == 1 {
            out.push_str(": keep-alive\n\n");
        }
        if i == 1 {
            let thought = json!({"thought": {"tool": "run_sql", "input": {"q": text}}});
            out.push_str(&format!("data: {}\n", thought));
        }
        out.push_str(&format!("data: {}\n", json!({ "text": text })));
    }
    if !trailing_newline {
        out.pop();
    }
    out
}

fn split_at_offsets<'a>(bytes: &'a [u8], offsets: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for &offset in offsets {
        chunks.push(&bytes[start..offset]);
        start = offset;
    }
    chunks.push(&bytes[start..]);
    chunks
}

proptest! {
    #[test]
    fn split_stream_decodes_like_single_chunk(
        texts in prop::collection::vec("[a-zA-Z0-9 é中😀\\[\\]{}\"/:]{0,16}", 1..8),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..12),
        trailing_newline in any::<bool>(),
    ) {
        let stream = build_stream(&texts, trailing_newline);
        let bytes = stream.as_bytes();

        let mut offsets: Vec<usize> = cuts.iter().map(|i| i.index(bytes.len() + 1)).collect();
        offsets.sort_unstable();
        offsets.dedup();

        let whole = decode(&[bytes]);
        let split = decode(&split_at_offsets(bytes, &offsets));
        prop_assert_eq!(&split, &whole);

        let text_events = whole
            .iter()
            .filter(|e| matches!(e, ProtocolEvent::TextDelta { .. }))
            .count();
        prop_assert_eq!(text_events, texts.len());
    }

    #[test]
    fn lines_and_carry_reconstruct_text(
        text in "[a-z é😀\n]{0,64}",
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let bytes = text.as_bytes();
        let mut offsets: Vec<usize> = cuts.iter().map(|i| i.index(bytes.len() + 1)).collect();
        offsets.sort_unstable();
        offsets.dedup();

        let mut framer = ChunkFramer::new();
        let mut lines = Vec::new();
        for chunk in split_at_offsets(bytes, &offsets) {
            lines.extend(framer.feed(chunk));
        }

        let mut rebuilt: Vec<u8> = lines.iter().flat_map(|l| format!("{}\n", l).into_bytes()).collect();
        rebuilt.extend_from_slice(framer.carry());
        prop_assert_eq!(rebuilt, bytes.to_vec());
    }

    #[test]
    fn accumulated_text_never_shrinks(
        texts in prop::collection::vec("[a-z😀 ]{0,8}", 1..10),
    ) {
        let mut acc = TranscriptAccumulator::new();
        let mut previous = String::new();
        for text in texts {
            acc.apply(ProtocolEvent::TextDelta { text });
            prop_assert!(acc.text().starts_with(&previous));
            previous = acc.text().to_string();
        }
    }
}

#[test]
fn test_every_byte_its_own_chunk() {
    let stream = "data: {\"text\":\"caf\u{e9} \u{1F600}\"}\ndata: {\"text\":\"!\"}";
    let chunks: Vec<&[u8]> = stream.as_bytes().chunks(1).collect();
    let events = decode(&chunks);
    assert_eq!(
        events,
        vec![
            ProtocolEvent::TextDelta {
                text: "caf\u{e9} \u{1F600}".to_string()
            },
            ProtocolEvent::TextDelta {
                text: "!".to_string()
            },
        ]
    );
}
