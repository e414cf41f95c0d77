use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use encoding_rs::{CoderResult, Decoder, UTF_8};
use extractor_logging::{ext_debug, ext_warn};
use futures_util::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;

use crate::{ProgressEvent, TerminalKind};

/// Reassembles newline-delimited JSON records from arbitrarily split chunks.
///
/// Chunk boundaries carry no meaning: a record, or a multi-byte character
/// inside it, may be split anywhere. Text after the last newline is kept as
/// carry-over until a later chunk terminates it.
pub struct StreamDecoder {
    decoder: Decoder,
    carry: String,
    finished: bool,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    status: Option<String>,
    current: Option<u64>,
    total: Option<u64>,
    message: Option<String>,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder(),
            carry: String::new(),
            finished: false,
        }
    }

    /// Feeds one chunk and returns the records it completed, in arrival order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<ProgressEvent> {
        if self.finished {
            ext_warn!("progress stream chunk after end of stream dropped");
            return Vec::new();
        }
        self.decode_into_carry(chunk, false);

        let mut events = Vec::new();
        while let Some(pos) = self.carry.find('\n') {
            let record: String = self.carry.drain(..=pos).collect();
            let record = record.trim_end_matches(['\n', '\r']);
            if record.trim().is_empty() {
                continue;
            }
            events.push(parse_record(record));
        }
        events
    }

    /// Ends the stream. An unterminated trailing record is discarded, never
    /// parsed. Returns the number of discarded bytes.
    pub fn finish(&mut self) -> usize {
        if self.finished {
            return 0;
        }
        self.decode_into_carry(&[], true);
        self.finished = true;

        let discarded = self.carry.len();
        if discarded > 0 {
            ext_debug!(
                "discarding {} bytes of unterminated progress record",
                discarded
            );
        }
        self.carry.clear();
        discarded
    }

    /// Text received but not yet terminated by a newline.
    pub fn pending(&self) -> &str {
        &self.carry
    }

    fn decode_into_carry(&mut self, mut input: &[u8], last: bool) {
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(input.len())
                .unwrap_or(input.len() + 4);
            self.carry.reserve(needed);
            let (result, read, had_errors) =
                self.decoder.decode_to_string(input, &mut self.carry, last);
            if had_errors {
                ext_warn!("invalid UTF-8 in progress stream replaced");
            }
            input = &input[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }
}

fn parse_record(record: &str) -> ProgressEvent {
    let raw = serde_json::from_str::<Value>(record).and_then(|value| {
        if value.is_object() {
            RawRecord::deserialize(value)
        } else {
            Err(serde::de::Error::custom("expected a JSON object"))
        }
    });

    match raw {
        Ok(raw) => classify(raw),
        Err(err) => {
            ext_warn!("malformed progress record ({} bytes): {}", record.len(), err);
            ProgressEvent::Terminal {
                kind: TerminalKind::Malformed,
                message: format!("Error parsing response: {err}"),
            }
        }
    }
}

fn classify(raw: RawRecord) -> ProgressEvent {
    let message = raw.message.unwrap_or_default();
    match raw.status.as_deref() {
        Some("progress") => ProgressEvent::Progress {
            current: raw.current,
            total: raw.total,
            message,
        },
        Some("success") => ProgressEvent::Terminal {
            kind: TerminalKind::Completed,
            message,
        },
        Some("error") => ProgressEvent::Terminal {
            kind: TerminalKind::Failed,
            message,
        },
        other => ProgressEvent::Terminal {
            kind: TerminalKind::Other(other.unwrap_or_default().to_string()),
            message,
        },
    }
}

struct DecodeState<S> {
    chunks: Pin<Box<S>>,
    decoder: StreamDecoder,
    pending: VecDeque<ProgressEvent>,
    done: bool,
}

/// Lazily decodes a byte-chunk stream into progress events.
///
/// A transport error is yielded once and ends the stream.
pub fn decode_stream<S, E>(chunks: S) -> impl Stream<Item = Result<ProgressEvent, E>>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    let state = DecodeState {
        chunks: Box::pin(chunks),
        decoder: StreamDecoder::new(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((Ok(event), state));
            }
            if state.done {
                return None;
            }
            match state.chunks.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.push(&chunk);
                    state.pending.extend(events);
                }
                Some(Err(err)) => {
                    state.done = true;
                    return Some((Err(err), state));
                }
                None => {
                    state.decoder.finish();
                    state.done = true;
                }
            }
        }
    })
}
