//! Streaming Output Decoder
//!
//! Turns the child's raw output chunks into semantic events. The child
//! speaks a human-oriented line protocol: fixed marker substrings announce
//! counts and prompts, and result lists arrive as box-drawn tables. Chunks
//! can split anywhere, including inside a UTF-8 sequence or halfway through
//! a table, so the decoder accumulates everything seen so far and only
//! emits an event once it is provably complete.
//!
//! Scanning a grown buffer is idempotent: consumed offsets track what has
//! already been reported, and nothing is discarded short of a full session
//! reset.

pub mod table;

pub use table::TableStyle;

use crate::models::TableFrame;

/// Marker announcing the number of seasons of a series
pub const SEASONS_MARKER: &str = "Seasons found:";
/// Marker announcing the number of episodes of a season
pub const EPISODES_MARKER: &str = "Episodes find:";
/// Marker announcing that the child is waiting for a selection on stdin
pub const PROMPT_MARKER: &str = "Insert";

/// Semantic events decoded from the output stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// `Seasons found: N` was printed
    SeasonsFound(u32),
    /// `Episodes find: N` was printed
    EpisodesFound(u32),
    /// A selection prompt is pending; the child is blocked on stdin
    PromptPending,
    /// A complete table frame was parsed
    Table(TableFrame),
}

/// Incremental decoder over the child's output stream
#[derive(Debug, Default)]
pub struct StreamDecoder {
    /// Everything decoded so far this session, append-only
    buffer: String,
    /// Raw bytes held back until a complete UTF-8 sequence arrives
    pending: Vec<u8>,
    /// Offset up to which complete lines were scanned for count markers
    line_consumed: usize,
    /// Offset just past the last reported prompt marker
    prompt_consumed: usize,
    /// Offset just past the last reported table frame
    frame_consumed: usize,
}

impl StreamDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything decoded so far this session
    pub fn contents(&self) -> &str {
        &self.buffer
    }

    /// Append a raw chunk and return any newly completed events, ordered
    /// by where they start in the stream
    pub fn push(&mut self, chunk: &[u8]) -> Vec<DecodeEvent> {
        self.decode_chunk(chunk);
        self.scan()
    }

    /// Buffer text from a byte offset onward. With the length captured
    /// before a `push`, this yields exactly the text that push decoded.
    ///
    /// Useful for mirroring raw output to a console view without waiting
    /// for semantic events.
    pub fn tail_from(&self, offset: usize) -> &str {
        &self.buffer[offset.min(self.buffer.len())..]
    }

    /// Current buffer length in bytes, for use with [`Self::tail_from`]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been decoded yet
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Full session reset: buffer, held-back bytes and all consumed
    /// offsets. The only operation that ever discards buffered text.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pending.clear();
        self.line_consumed = 0;
        self.prompt_consumed = 0;
        self.frame_consumed = 0;
        debug!("decoder reset");
    }

    /// Append raw bytes, decoding as UTF-8 and holding back an incomplete
    /// trailing sequence until its continuation bytes arrive. Invalid
    /// bytes are replaced, never fatal.
    fn decode_chunk(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(s) => {
                    self.buffer.push_str(s);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    if let Ok(s) = std::str::from_utf8(&self.pending[..valid]) {
                        self.buffer.push_str(s);
                    }
                    match e.error_len() {
                        Some(bad) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + bad);
                        }
                        None => {
                            // Incomplete sequence at the end of the chunk
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Re-scan the buffer for events not yet reported. Each scanner tags
    /// its findings with the buffer offset they start at, so events come
    /// out in stream order even though markers, prompts and frames become
    /// complete under different conditions.
    fn scan(&mut self) -> Vec<DecodeEvent> {
        let mut found = Vec::new();
        self.scan_markers(&mut found);
        self.scan_prompts(&mut found);
        self.scan_frames(&mut found);
        found.sort_by_key(|(offset, _)| *offset);
        found.into_iter().map(|(_, event)| event).collect()
    }

    /// Count markers are only trusted once their line is complete: the
    /// numeric payload could otherwise still be mid-delivery
    fn scan_markers(&mut self, found: &mut Vec<(usize, DecodeEvent)>) {
        while let Some(nl) = self.buffer[self.line_consumed..].find('\n') {
            let line_start = self.line_consumed;
            let line_end = line_start + nl;
            let line = &self.buffer[line_start..line_end];

            if let Some((at, count)) = marker_payload(line, SEASONS_MARKER) {
                found.push((line_start + at, DecodeEvent::SeasonsFound(count)));
            }
            if let Some((at, count)) = marker_payload(line, EPISODES_MARKER) {
                found.push((line_start + at, DecodeEvent::EpisodesFound(count)));
            }

            self.line_consumed = line_end + 1;
        }
    }

    /// The prompt marker is reported as soon as it appears: prompt lines
    /// are never newline-terminated because the child is blocked on them
    fn scan_prompts(&mut self, found: &mut Vec<(usize, DecodeEvent)>) {
        while let Some(pos) = self.buffer[self.prompt_consumed..].find(PROMPT_MARKER) {
            found.push((self.prompt_consumed + pos, DecodeEvent::PromptPending));
            self.prompt_consumed += pos + PROMPT_MARKER.len();
        }
    }

    fn scan_frames(&mut self, found: &mut Vec<(usize, DecodeEvent)>) {
        while let Some((parsed, span)) = table::next_frame(&self.buffer[self.frame_consumed..]) {
            match parsed {
                Ok(frame) => {
                    found.push((self.frame_consumed + span.start, DecodeEvent::Table(frame)));
                }
                Err(e) => {
                    // That frame is lost but the stream goes on
                    warn!("discarding malformed table frame: {}", e);
                }
            }
            self.frame_consumed += span.end;
        }
    }
}

/// Extract the integer payload following a marker in a completed line,
/// together with the marker's offset within the line.
///
/// A marker with no parsable count is a decode anomaly: logged and
/// dropped, never an error.
fn marker_payload(line: &str, marker: &str) -> Option<(usize, u32)> {
    let idx = line.find(marker)?;
    let rest = &line[idx + marker.len()..];
    match rest.split_whitespace().next().map(str::parse::<u32>) {
        Some(Ok(count)) => Some((idx, count)),
        _ => {
            warn!("marker '{}' without parsable count: {:?}", marker, rest);
            None
        }
    }
}
