//! Chunked text.
//!
//! Variable-length text travels as a bounded number of fixed-width slots:
//! full 31-byte words, then the trailing partial word and its byte length.

use worldsmith_foundation::Felt;

/// Bytes packed into one full word.
pub const WORD_BYTES: usize = 31;

/// Text chunked into fixed-width words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ByteArray {
    /// Full 31-byte words, in order.
    pub data: Vec<Felt>,
    /// Trailing partial word, big-endian packed.
    pub pending_word: Felt,
    /// Number of bytes in `pending_word` (0..31).
    pub pending_word_len: usize,
}

impl ByteArray {
    /// Chunks a string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let bytes = text.as_bytes();
        let full = bytes.len() / WORD_BYTES * WORD_BYTES;
        let data = bytes[..full]
            .chunks(WORD_BYTES)
            .filter_map(Felt::from_be_slice)
            .collect();
        let tail = &bytes[full..];
        Self {
            data,
            pending_word: Felt::from_be_slice(tail).unwrap_or_default(),
            pending_word_len: tail.len(),
        }
    }

    /// Byte length of the chunked text.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.data.len() * WORD_BYTES + self.pending_word_len
    }

    /// Reassembles the text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        let mut bytes = Vec::with_capacity(self.byte_len());
        for word in &self.data {
            bytes.extend_from_slice(&word.to_be_bytes()[32 - WORD_BYTES..]);
        }
        let pending = self.pending_word.to_be_bytes();
        bytes.extend_from_slice(&pending[32 - self.pending_word_len.min(WORD_BYTES)..]);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Wire form: `[data.len, data.., pending_word, pending_word_len]`.
    #[must_use]
    pub fn to_felts(&self) -> Vec<Felt> {
        let mut out = Vec::with_capacity(self.data.len() + 3);
        out.push(Felt::from(self.data.len()));
        out.extend_from_slice(&self.data);
        out.push(self.pending_word);
        out.push(Felt::from(self.pending_word_len));
        out
    }
}
