//! Character-at-a-time word segmentation with a fixed-size accumulator.
//!
//! The tokenizer is a two-state machine: idle (empty accumulator) or
//! accumulating. Each byte is handled to completion before the next one
//! arrives, and memory stays bounded by the accumulator capacity no matter
//! how long the stream runs.

use crate::config::HistogramConfig;
use crate::error::TableError;

/// Bytes that end a word in addition to the configured sentinel.
#[inline]
pub fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

/// Word-like bytes are everything except whitespace and the sentinel.
/// Only the printable subset of them is ever stored.
#[inline]
pub fn is_word_byte(c: u8, sentinel: u8) -> bool {
    c != sentinel && !is_whitespace(c)
}

#[inline]
pub fn is_printable(c: u8) -> bool {
    (b'!'..=b'~').contains(&c)
}

/// Fixed-capacity buffer holding the word currently being typed.
///
/// `len() + 1 < capacity()` holds between calls to the tokenizer. The last
/// slot stays reserved for a terminator, so a word reaches at most
/// `capacity() - 2` bytes.
#[derive(Debug, Clone)]
pub struct WordAccumulator {
    pending: Box<[u8]>,
    len: usize,
}

impl WordAccumulator {
    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        let mut pending = Vec::new();
        pending
            .try_reserve_exact(capacity)
            .map_err(|_| TableError::OutOfMemory {
                what: "word accumulator",
                requested: capacity,
            })?;
        pending.resize(capacity, 0);
        Ok(Self {
            pending: pending.into_boxed_slice(),
            len: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.pending.len()
    }
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pending[..self.len]
    }

    /// Append one byte. Returns false, storing nothing, when full.
    pub fn push(&mut self, c: u8) -> bool {
        match self.pending.get_mut(self.len) {
            Some(slot) => {
                *slot = c;
                self.len += 1;
                true
            }
            None => false,
        }
    }

    /// Drop the last byte; no-op when empty.
    pub fn pop(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len -= 1;
        true
    }

    /// Reset to empty and hand back the bytes that were pending. The slice
    /// stays readable until the next mutation.
    pub fn take(&mut self) -> &[u8] {
        let n = core::mem::replace(&mut self.len, 0);
        &self.pending[..n]
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// True once another byte plus a terminator would no longer fit.
    fn at_limit(&self) -> bool {
        self.len + 1 >= self.capacity()
    }
}

/// Result of feeding one byte to [`StreamTokenizer::handle_char`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// Nothing changed: a non-printable word byte, a boundary with nothing
    /// pending, or an erase on an empty buffer.
    Ignored,
    Appended,
    Erased,
    /// A boundary closed a non-empty word. The slice borrows the
    /// accumulator and must be copied before the next byte.
    Completed(&'a [u8]),
    /// The accumulator hit its limit and the partial word was thrown away.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct StreamTokenizer {
    acc: WordAccumulator,
    erase: u8,
    sentinel: u8,
}

impl StreamTokenizer {
    pub fn new(config: &HistogramConfig) -> Result<Self, TableError> {
        Ok(Self {
            acc: WordAccumulator::with_capacity(config.max_word_len)?,
            erase: config.erase_byte,
            sentinel: config.sentinel_byte,
        })
    }

    pub fn pending(&self) -> &[u8] {
        self.acc.as_bytes()
    }

    pub fn reset(&mut self) {
        self.acc.clear();
    }

    pub fn handle_char(&mut self, c: u8) -> Step<'_> {
        if c == self.erase {
            return if self.acc.pop() {
                Step::Erased
            } else {
                Step::Ignored
            };
        }

        if is_word_byte(c, self.sentinel) {
            if !is_printable(c) {
                return Step::Ignored;
            }
            self.acc.push(c);
            if self.acc.at_limit() {
                // Over-long tokens are dropped whole, never truncated.
                self.acc.clear();
                return Step::Discarded;
            }
            return Step::Appended;
        }

        if self.acc.is_empty() {
            return Step::Ignored;
        }
        Step::Completed(self.acc.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> StreamTokenizer {
        StreamTokenizer::new(&HistogramConfig::default()).unwrap()
    }

    /// Feed `input` and collect every completed word.
    fn words(t: &mut StreamTokenizer, input: &[u8]) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        for &c in input {
            if let Step::Completed(w) = t.handle_char(c) {
                out.push(w.to_vec());
            }
        }
        out
    }

    #[test]
    fn whitespace_and_sentinel_end_words() {
        let mut t = tokenizer();
        let got = words(&mut t, b"hi there\tyou\nall\rof\x01us ");
        let expected: Vec<Vec<u8>> = ["hi", "there", "you", "all", "of", "us"]
            .iter()
            .map(|w| w.as_bytes().to_vec())
            .collect();
        assert_eq!(got, expected);
        assert!(t.pending().is_empty());
    }

    /// Invariant: runs of boundary bytes never yield an empty word.
    #[test]
    fn consecutive_boundaries_are_ignored() {
        let mut t = tokenizer();
        for &c in b"  \t\n\r\x01 " {
            assert_eq!(t.handle_char(c), Step::Ignored);
        }
        assert_eq!(words(&mut t, b"a   b  "), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn erase_removes_last_character() {
        let mut t = tokenizer();
        assert_eq!(t.handle_char(b'a'), Step::Appended);
        assert_eq!(t.handle_char(b'b'), Step::Appended);
        assert_eq!(t.handle_char(b'c'), Step::Appended);
        assert_eq!(t.handle_char(0x7f), Step::Erased);
        assert_eq!(t.handle_char(b' '), Step::Completed(b"ab"));
    }

    #[test]
    fn erase_on_empty_is_noop() {
        let mut t = tokenizer();
        assert_eq!(t.handle_char(0x7f), Step::Ignored);
        assert_eq!(t.handle_char(0x7f), Step::Ignored);
        assert_eq!(words(&mut t, b"x "), vec![b"x".to_vec()]);
    }

    /// Non-printable word-like bytes neither extend nor end a word.
    #[test]
    fn non_printable_word_bytes_are_skipped() {
        let mut t = tokenizer();
        let got = words(&mut t, b"c\x02a\x80t\x1b ");
        assert_eq!(got, vec![b"cat".to_vec()]);
    }

    /// Invariant: the longest word that survives is capacity - 2 bytes; one
    /// more discards it without emitting anything.
    #[test]
    fn overflow_discards_partial_word() {
        let mut t = tokenizer();
        let cap = HistogramConfig::default().max_word_len;

        let fits = vec![b'w'; cap - 2];
        let mut input = fits.clone();
        input.push(b' ');
        assert_eq!(words(&mut t, &input), vec![fits]);

        for _ in 0..cap - 2 {
            assert_eq!(t.handle_char(b'x'), Step::Appended);
        }
        assert_eq!(t.handle_char(b'x'), Step::Discarded);
        assert!(t.pending().is_empty());
        assert_eq!(t.handle_char(b' '), Step::Ignored);
    }

    /// After a discard the tail of the long token starts a fresh word.
    #[test]
    fn tail_after_overflow_counts_as_new_word() {
        let config = HistogramConfig::default().with_max_word_len(4);
        let mut t = StreamTokenizer::new(&config).unwrap();
        // Capacity 4: "abc" trips the limit, "de" survives.
        assert_eq!(words(&mut t, b"abcde "), vec![b"de".to_vec()]);
    }

    #[test]
    fn accumulator_push_pop_take() {
        let mut acc = WordAccumulator::with_capacity(3).unwrap();
        assert!(acc.push(b'a'));
        assert!(acc.push(b'b'));
        assert!(acc.push(b'c'));
        assert!(!acc.push(b'd'));
        assert_eq!(acc.as_bytes(), b"abc");
        assert!(acc.pop());
        assert_eq!(acc.take(), b"ab");
        assert!(acc.is_empty());
        assert!(!acc.pop());
    }

    #[test]
    fn custom_control_bytes() {
        let config = HistogramConfig::default()
            .with_erase_byte(0x08)
            .with_sentinel_byte(0x00);
        let mut t = StreamTokenizer::new(&config).unwrap();
        let got = words(&mut t, b"ab\x08c\x00de\x01f ");
        // 0x01 is no longer special and is not printable: skipped.
        assert_eq!(got, vec![b"ac".to_vec(), b"def".to_vec()]);
    }

    #[test]
    fn reset_drops_pending_word() {
        let mut t = tokenizer();
        words(&mut t, b"half");
        assert_eq!(t.pending(), b"half");
        t.reset();
        assert_eq!(t.handle_char(b' '), Step::Ignored);
    }

    /// An accumulator too large to allocate is an error, not an abort.
    #[test]
    fn oversized_accumulator_is_an_error() {
        let config = HistogramConfig::default().with_max_word_len(usize::MAX - 64);
        let err = StreamTokenizer::new(&config).err().expect("allocation must fail");
        assert_eq!(
            err,
            TableError::OutOfMemory {
                what: "word accumulator",
                requested: usize::MAX - 64,
            }
        );
    }
}
