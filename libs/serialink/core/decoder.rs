//! Delimited-text frame decoding
//!
//! The device emits ASCII messages separated by a single delimiter byte.
//! Chunk boundaries on the wire are arbitrary, so the decoder buffers the
//! unresolved tail between reads and drains every complete frame it can on
//! each call. Decoding is pure: the same concatenated byte stream yields
//! the same message sequence no matter how it was chunked.

/// A decoded, trimmed text message extracted from the byte stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(String);

impl Message {
    /// Build a message from framed text; surrounding whitespace is trimmed
    /// the same way the decoder trims frames.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Message(text.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Message> for String {
    fn from(message: Message) -> Self {
        message.0
    }
}

/// Accumulates raw byte chunks and emits complete messages
///
/// At most one partial trailing fragment persists between calls. Empty
/// frames (consecutive delimiters, or delimiters surrounded only by
/// whitespace) are discarded. Non-UTF-8 bytes are replaced lossily; the
/// wire protocol is plain ASCII, so this only matters for line noise.
pub struct FrameDecoder {
    delimiter: u8,
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            buffer: Vec::with_capacity(256),
        }
    }

    /// Append a chunk and drain every complete frame it resolves
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Message> {
        self.buffer.extend_from_slice(bytes);

        let mut messages = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == self.delimiter) {
            // Remove the frame and its delimiter from the buffer
            let frame: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&frame[..pos]);
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                messages.push(Message::new(trimmed));
            }
        }
        messages
    }

    /// Bytes of the unresolved trailing fragment
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(messages: Vec<Message>) -> Vec<String> {
        messages.into_iter().map(Message::into_string).collect()
    }

    #[test]
    fn single_chunk_drains_all_frames() {
        let mut decoder = FrameDecoder::new(b';');
        let messages = decoder.feed(b"TEMP:23.5,HUM:60.0;ERROR;TEMP:19");

        assert_eq!(texts(messages), vec!["TEMP:23.5,HUM:60.0", "ERROR"]);
        assert_eq!(decoder.pending(), b"TEMP:19");
    }

    #[test]
    fn partial_frame_completes_on_next_chunk() {
        let mut decoder = FrameDecoder::new(b';');

        assert!(decoder.feed(b"TEMP:2").is_empty());
        let messages = decoder.feed(b"1.0,HUM:55.5;");
        assert_eq!(texts(messages), vec!["TEMP:21.0,HUM:55.5"]);
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut decoder = FrameDecoder::new(b';');
        let messages = decoder.feed(b"  ERROR \r\n;\t OK ;");

        assert_eq!(texts(messages), vec!["ERROR", "OK"]);
    }

    #[test]
    fn empty_frames_are_discarded() {
        let mut decoder = FrameDecoder::new(b';');
        let messages = decoder.feed(b";;  ;DATA;;");

        assert_eq!(texts(messages), vec!["DATA"]);
    }

    #[test]
    fn alternate_delimiter() {
        let mut decoder = FrameDecoder::new(b'\n');
        let messages = decoder.feed(b"one\ntwo\nthree");

        assert_eq!(texts(messages), vec!["one", "two"]);
        assert_eq!(decoder.pending(), b"three");
    }

    #[test]
    fn chunk_boundary_invariance() {
        let stream = b"TEMP:23.5,HUM:60.0;ERROR;TEMP:19";

        let mut whole = FrameDecoder::new(b';');
        let expected = texts(whole.feed(stream));
        let expected_pending = whole.pending().to_vec();

        // Every two-way split must decode identically to the whole stream
        for split in 0..=stream.len() {
            let mut decoder = FrameDecoder::new(b';');
            let mut messages = decoder.feed(&stream[..split]);
            messages.extend(decoder.feed(&stream[split..]));

            assert_eq!(texts(messages), expected, "split at {}", split);
            assert_eq!(decoder.pending(), expected_pending, "split at {}", split);
        }

        // Byte-at-a-time feeding as the degenerate chunking
        let mut decoder = FrameDecoder::new(b';');
        let mut messages = Vec::new();
        for &b in stream.iter() {
            messages.extend(decoder.feed(&[b]));
        }
        assert_eq!(texts(messages), expected);
        assert_eq!(decoder.pending(), expected_pending);
    }
}
