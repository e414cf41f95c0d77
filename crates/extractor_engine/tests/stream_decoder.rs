use bytes::Bytes;
use extractor_engine::{decode_stream, ProgressEvent, StreamDecoder, TerminalKind};
use futures_util::{stream, StreamExt};
use pretty_assertions::assert_eq;

const STREAM: &str = concat!(
    "{\"status\":\"progress\",\"current\":1,\"total\":3,\"message\":\"Retrieved video 1/3 – café\"}\n",
    "{\"status\":\"progress\",\"message\":\"Retrieved video 2/3 ✓\"}\n",
    "not json at all\n",
    "\n",
    "{\"status\":\"progress\",\"current\":3,\"total\":3,\"message\":\"日本語\"}\r\n",
    "{\"status\":\"success\",\"message\":\"Playlist information saved to p_3.json\"}\n",
);

fn progress(current: Option<u64>, total: Option<u64>, message: &str) -> ProgressEvent {
    ProgressEvent::Progress {
        current,
        total,
        message: message.to_string(),
    }
}

fn decode_chunks(chunks: &[&[u8]]) -> Vec<ProgressEvent> {
    let mut decoder = StreamDecoder::new();
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(decoder.push(chunk));
    }
    decoder.finish();
    events
}

fn is_malformed(event: &ProgressEvent) -> bool {
    matches!(
        event,
        ProgressEvent::Terminal {
            kind: TerminalKind::Malformed,
            ..
        }
    )
}

#[test]
fn record_split_across_two_chunks_yields_both_events() {
    let first = br#"{"status":"progress","current":1,"total":4,"message":"a"}
{"status":"pro"#;
    let second = br#"gress","current":2,"total":4,"message":"b"}
"#;

    let events = decode_chunks(&[&first[..], &second[..]]);
    assert_eq!(
        events,
        vec![
            progress(Some(1), Some(4), "a"),
            progress(Some(2), Some(4), "b"),
        ]
    );
}

#[test]
fn whole_stream_decodes_in_order() {
    let events = decode_chunks(&[STREAM.as_bytes()]);

    assert_eq!(events.len(), 5);
    assert_eq!(
        events[0],
        progress(Some(1), Some(3), "Retrieved video 1/3 – café")
    );
    assert_eq!(events[1], progress(None, None, "Retrieved video 2/3 ✓"));
    assert!(is_malformed(&events[2]));
    assert_eq!(events[3], progress(Some(3), Some(3), "日本語"));
    assert_eq!(
        events[4],
        ProgressEvent::Terminal {
            kind: TerminalKind::Completed,
            message: "Playlist information saved to p_3.json".to_string(),
        }
    );
}

#[test]
fn every_two_way_split_matches_whole_stream() {
    let bytes = STREAM.as_bytes();
    let expected = decode_chunks(&[bytes]);

    for split in 0..=bytes.len() {
        let (head, tail) = bytes.split_at(split);
        assert_eq!(decode_chunks(&[head, tail]), expected, "split at {split}");
    }
}

#[test]
fn byte_at_a_time_matches_whole_stream() {
    let bytes = STREAM.as_bytes();
    let expected = decode_chunks(&[bytes]);
    let single_bytes: Vec<&[u8]> = bytes.chunks(1).collect();

    assert_eq!(decode_chunks(&single_bytes), expected);
}

#[test]
fn uneven_chunk_sizes_match_whole_stream() {
    let bytes = STREAM.as_bytes();
    let expected = decode_chunks(&[bytes]);

    for size in [2, 3, 5, 7, 13, 64] {
        let chunks: Vec<&[u8]> = bytes.chunks(size).collect();
        assert_eq!(decode_chunks(&chunks), expected, "chunk size {size}");
    }
}

#[test]
fn unterminated_record_waits_for_newline() {
    let mut decoder = StreamDecoder::new();

    let events = decoder.push(br#"{"status":"progress","current":1,"total":2,"message":"x"}"#);
    assert!(events.is_empty());
    assert!(decoder.pending().starts_with("{\"status\""));

    let events = decoder.push(b"\n");
    assert_eq!(events, vec![progress(Some(1), Some(2), "x")]);
    assert_eq!(decoder.pending(), "");
}

#[test]
fn split_multibyte_character_is_reassembled() {
    let record = "{\"status\":\"error\",\"message\":\"ошибка\"}\n".as_bytes();
    let cyrillic_start = record
        .iter()
        .position(|&b| b >= 0x80)
        .expect("record contains multibyte text");

    let mut decoder = StreamDecoder::new();
    let mut events = decoder.push(&record[..cyrillic_start + 1]);
    events.extend(decoder.push(&record[cyrillic_start + 1..]));

    assert_eq!(
        events,
        vec![ProgressEvent::Terminal {
            kind: TerminalKind::Failed,
            message: "ошибка".to_string(),
        }]
    );
}

#[test]
fn malformed_record_does_not_stop_later_records() {
    let events = decode_chunks(&[
        &b"{\"status\":\"progress\",\"current\":1\n"[..],
        &b"[1,2,3]\n"[..],
        &b"{\"status\":\"progress\",\"current\":2,\"total\":2,\"message\":\"ok\"}\n"[..],
    ]);

    assert_eq!(events.len(), 3);
    assert!(is_malformed(&events[0]));
    assert!(is_malformed(&events[1]));
    match &events[0] {
        ProgressEvent::Terminal { message, .. } => {
            assert!(message.starts_with("Error parsing response:"))
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(events[2], progress(Some(2), Some(2), "ok"));
}

#[test]
fn unknown_or_missing_status_is_terminal() {
    let events = decode_chunks(&[
        &b"{\"status\":\"complete\",\"message\":\"done\"}\n{\"message\":\"no status\"}\n"[..],
    ]);

    assert_eq!(
        events,
        vec![
            ProgressEvent::Terminal {
                kind: TerminalKind::Other("complete".to_string()),
                message: "done".to_string(),
            },
            ProgressEvent::Terminal {
                kind: TerminalKind::Other(String::new()),
                message: "no status".to_string(),
            },
        ]
    );
}

#[test]
fn dangling_record_is_discarded_at_end() {
    let mut decoder = StreamDecoder::new();
    let events = decoder.push(b"{\"status\":\"progress\",\"message\":\"a\"}\n{\"status\":\"progress\"");

    assert_eq!(events.len(), 1);
    assert_eq!(decoder.finish(), "{\"status\":\"progress\"".len());
    assert_eq!(decoder.pending(), "");
    assert!(decoder.push(b"}\n").is_empty());
}

#[tokio::test]
async fn decode_stream_yields_events_lazily() {
    let chunks = stream::iter(vec![
        Ok::<_, String>(Bytes::from_static(b"{\"status\":\"progress\",\"current\":1,")),
        Ok(Bytes::from_static(b"\"total\":2,\"message\":\"a\"}\n{\"status\":\"progress\",")),
        Ok(Bytes::from_static(b"\"message\":\"b\"}\n{\"status\":\"progress\"")),
    ]);

    let events: Vec<_> = decode_stream(chunks).collect().await;
    assert_eq!(
        events,
        vec![
            Ok(progress(Some(1), Some(2), "a")),
            Ok(progress(None, None, "b")),
        ]
    );
}

#[tokio::test]
async fn decode_stream_stops_after_transport_error() {
    let chunks = stream::iter(vec![
        Ok(Bytes::from_static(b"{\"status\":\"progress\",\"message\":\"a\"}\n")),
        Err("connection reset".to_string()),
        Ok(Bytes::from_static(b"{\"status\":\"progress\",\"message\":\"b\"}\n")),
    ]);

    let events: Vec<_> = decode_stream(chunks).collect().await;
    assert_eq!(
        events,
        vec![
            Ok(progress(None, None, "a")),
            Err("connection reset".to_string()),
        ]
    );
}
