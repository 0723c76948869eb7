//! Incremental UTF-8 decoding for the streamed response body.
//!
//! The stream endpoint delivers an undifferentiated byte stream; a chunk
//! boundary can land inside a multi-byte scalar. Each chunk is therefore
//! decoded together with up to three bytes carried over from the previous
//! one, and invalid sequences decode to U+FFFD.

const REPLACEMENT: &str = "\u{FFFD}";

/// Streaming-safe UTF-8 decoder.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    /// Incomplete trailing scalar from the previous chunk, at most 3 bytes.
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, including any bytes held over from the previous one.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let buffered;
        let bytes: &[u8] = if self.pending.is_empty() {
            chunk
        } else {
            self.pending.extend_from_slice(chunk);
            buffered = std::mem::take(&mut self.pending);
            &buffered
        };

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    out.push_str(
                        std::str::from_utf8(&rest[..valid_up_to])
                            .expect("prefix validated by valid_up_to"),
                    );
                    match err.error_len() {
                        Some(invalid_len) => {
                            out.push_str(REPLACEMENT);
                            rest = &rest[valid_up_to + invalid_len..];
                        }
                        None => {
                            // Incomplete trailing scalar; hold it for the
                            // next chunk.
                            self.pending = rest[valid_up_to..].to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush at end of stream. A dangling partial scalar becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            REPLACEMENT.to_string()
        }
    }
}
