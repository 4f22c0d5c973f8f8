//! Incremental decoder for streamed chat-completion responses
//!
//! The endpoint streams server-sent-event lines of the form
//! `data: {...}` with the text delta at `choices[0].delta.content`,
//! terminated by a literal `data: [DONE]` line. The decoder is fed raw
//! bytes as they arrive and yields events for every completed line;
//! partial lines (and partial UTF-8 sequences) stay buffered until the
//! rest arrives.

use serde_json::Value;

/// One decoded stream event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A text chunk to append to the accumulating reply
    Delta(String),
    /// The `[DONE]` terminator
    Done,
}

/// Stateful line assembler over the response byte stream
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning the events completed by it
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buf.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = parse_line(line.trim_end_matches(['\r', '\n'])) {
                events.push(event);
            }
        }
        events
    }
}

/// Decode one complete SSE line. Lines without a `data:` field (comments,
/// blank keep-alives) and payloads without a text delta yield nothing.
fn parse_line(line: &str) -> Option<SseEvent> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return Some(SseEvent::Done);
    }
    let value: Value = serde_json::from_str(data).ok()?;
    let delta = value
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()?;
    if delta.is_empty() {
        return None;
    }
    Some(SseEvent::Delta(delta.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_line(text: &str) -> String {
        format!(
            "data: {}\n",
            serde_json::json!({"choices": [{"delta": {"content": text}}]})
        )
    }

    #[test]
    fn test_single_line() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(delta_line("hello").as_bytes());
        assert_eq!(events, vec![SseEvent::Delta("hello".to_string())]);
    }

    #[test]
    fn test_done_terminator() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: [DONE]\n");
        assert_eq!(events, vec![SseEvent::Done]);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let line = delta_line("مرحبا");
        let bytes = line.as_bytes();
        // split inside a multi-byte character
        let mid = bytes.len() / 2;
        assert!(decoder.feed(&bytes[..mid]).is_empty());
        let events = decoder.feed(&bytes[mid..]);
        assert_eq!(events, vec![SseEvent::Delta("مرحبا".to_string())]);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let chunk = format!("{}\n{}data: [DONE]\n", delta_line("a"), delta_line("b"));
        let events = decoder.feed(chunk.as_bytes());
        assert_eq!(
            events,
            vec![
                SseEvent::Delta("a".to_string()),
                SseEvent::Delta("b".to_string()),
                SseEvent::Done,
            ]
        );
    }

    #[test]
    fn test_role_only_and_blank_lines_skipped() {
        let mut decoder = SseDecoder::new();
        let chunk = "\r\ndata: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n: keep-alive\n";
        assert!(decoder.feed(chunk.as_bytes()).is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: [DONE]\r\n");
        assert_eq!(events, vec![SseEvent::Done]);
    }
}
