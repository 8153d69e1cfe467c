//! Incremental server-sent-event frame parsing.
//!
//! The analysis endpoint pushes frames of the form `data: <json>\n\n`.
//! Transport chunks do not line up with frame boundaries, so the parser
//! buffers bytes across `push` calls and yields only completed frames.
//! Non-`data` lines (`event:`, `id:`, `retry:`, comments) are ignored;
//! multiple `data:` lines inside one frame are joined with newlines per
//! the SSE specification.

/// Stateful decoder turning transport chunks into `data` payloads.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one transport chunk, returning the payload of every frame the
    /// chunk completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut payloads = Vec::new();
        while let Some((frame_end, rest_start)) = next_frame_boundary(&self.buffer) {
            let frame: String = self.buffer.drain(..rest_start).collect();
            if let Some(payload) = parse_frame(&frame[..frame_end]) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Whether bytes of an unterminated frame are still buffered.
    pub fn has_partial_frame(&self) -> bool {
        !self.buffer.trim().is_empty()
    }
}

/// Finds the earliest blank-line delimiter (`\n\n` or `\r\n\r\n`),
/// returning the frame length and the offset where the next frame starts.
fn next_frame_boundary(buffer: &str) -> Option<(usize, usize)> {
    let lf = buffer.find("\n\n").map(|i| (i, i + 2));
    let crlf = buffer.find("\r\n\r\n").map(|i| (i, i + 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

fn parse_frame(frame: &str) -> Option<String> {
    let mut data_lines: Vec<&str> = Vec::new();
    for line in frame.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}
