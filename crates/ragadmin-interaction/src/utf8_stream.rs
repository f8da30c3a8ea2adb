//! Incremental UTF-8 decoding of a byte stream.

use futures::stream::{Stream, StreamExt};

/// Buffers bytes until they form complete UTF-8 sequences.
///
/// A multi-byte character split across two network chunks is emitted whole
/// with the later chunk. Invalid bytes are replaced with U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds `bytes` and returns the text that is complete so far.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut text = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    text.push_str(valid);
                    self.pending.clear();
                    return text;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
                    match e.error_len() {
                        // Incomplete sequence at the end: wait for more bytes.
                        None => {
                            self.pending.drain(..valid_up_to);
                            return text;
                        }
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + len);
                        }
                    }
                }
            }
        }
    }

    /// Flushes whatever is left at end of stream.
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}

/// Maps a stream of byte chunks to a stream of text chunks, skipping chunks
/// that decode to nothing yet.
pub fn decode_utf8<S, B, E>(chunks: S) -> impl Stream<Item = Result<String, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    chunks
        .map(Some)
        .chain(futures::stream::once(async { None }))
        .scan(Utf8ChunkDecoder::new(), |decoder, item| {
            let out = match item {
                Some(Ok(bytes)) => Ok(decoder.push(bytes.as_ref())),
                Some(Err(e)) => Err(e),
                None => Ok(decoder.finish()),
            };
            futures::future::ready(Some(out))
        })
        .filter(|item| futures::future::ready(!matches!(item, Ok(text) if text.is_empty())))
}
