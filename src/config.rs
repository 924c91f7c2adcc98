//! Tunables for the table, the tokenizer and the report renderer.

use crate::error::ConfigError;
use crate::report::LINE_SEPARATOR;

/// Number of bucket chains in the word table.
pub const DEFAULT_BUCKETS_NB: usize = 128;
/// Accumulator capacity, counting the terminator slot.
pub const DEFAULT_MAX_WORD_LEN: usize = 32;
/// First allocation of a rendered report, in bytes.
pub const DEFAULT_REPORT_CAPACITY: usize = 1024;
/// ASCII DEL, delivered by the keyboard for backspace.
pub const DEFAULT_ERASE_BYTE: u8 = 0x7f;
/// Byte that ends a word without being whitespace.
pub const DEFAULT_SENTINEL_BYTE: u8 = 0x01;

/// Widest decimal rendering of a `u64` count.
const COUNT_DIGITS_MAX: usize = 20;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HistogramConfig {
    pub buckets_nb: usize,
    pub max_word_len: usize,
    pub initial_report_capacity: usize,
    pub erase_byte: u8,
    pub sentinel_byte: u8,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            buckets_nb: DEFAULT_BUCKETS_NB,
            max_word_len: DEFAULT_MAX_WORD_LEN,
            initial_report_capacity: DEFAULT_REPORT_CAPACITY,
            erase_byte: DEFAULT_ERASE_BYTE,
            sentinel_byte: DEFAULT_SENTINEL_BYTE,
        }
    }
}

impl HistogramConfig {
    pub fn with_buckets(mut self, buckets_nb: usize) -> Self {
        self.buckets_nb = buckets_nb;
        self
    }

    pub fn with_max_word_len(mut self, max_word_len: usize) -> Self {
        self.max_word_len = max_word_len;
        self
    }

    pub fn with_initial_report_capacity(mut self, capacity: usize) -> Self {
        self.initial_report_capacity = capacity;
        self
    }

    pub fn with_erase_byte(mut self, byte: u8) -> Self {
        self.erase_byte = byte;
        self
    }

    pub fn with_sentinel_byte(mut self, byte: u8) -> Self {
        self.sentinel_byte = byte;
        self
    }

    /// Check every field; the first violation wins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buckets_nb == 0 {
            return Err(ConfigError::NoBuckets);
        }
        if self.max_word_len < 2 {
            return Err(ConfigError::WordLengthTooSmall(self.max_word_len));
        }
        if self.checked_line_margin().is_none() {
            return Err(ConfigError::WordLengthTooLarge(self.max_word_len));
        }
        if self.initial_report_capacity == 0 {
            return Err(ConfigError::ZeroReportCapacity);
        }
        if self.erase_byte == self.sentinel_byte {
            return Err(ConfigError::ControlBytesCollide(self.erase_byte));
        }
        for b in [self.erase_byte, self.sentinel_byte] {
            if is_text_byte(b) {
                return Err(ConfigError::ControlByteIsText(b));
            }
        }
        Ok(())
    }

    /// Upper bound on one formatted report line for any word the tokenizer
    /// can produce: `word: count\n`.
    /// Saturates for word lengths that `validate` rejects.
    pub fn report_line_margin(&self) -> usize {
        self.checked_line_margin().unwrap_or(usize::MAX)
    }

    fn checked_line_margin(&self) -> Option<usize> {
        self.max_word_len
            .checked_add(LINE_SEPARATOR.len() + COUNT_DIGITS_MAX + 1)
    }
}

fn is_text_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'!'..=b'~')
}
