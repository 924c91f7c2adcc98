//! Rendering the table into a `word: count` text report.

use crate::error::TableError;
use crate::word_table::WordTable;
use tracing::debug;

pub(crate) const LINE_SEPARATOR: &[u8] = b": ";

/// A rendered snapshot of the table, one `word: count\n` line per entry.
///
/// The blob is delimited by its length; it does not follow later changes to
/// the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    bytes: Vec<u8>,
    capacity: usize,
    doublings: u32,
}

impl Report {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reports built from tokenizer output are always ASCII; tables fed
    /// arbitrary bytes may not be.
    pub fn as_str(&self) -> Result<&str, core::str::Utf8Error> {
        core::str::from_utf8(&self.bytes)
    }

    /// Lines without their trailing newline.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.bytes
            .strip_suffix(b"\n")
            .unwrap_or(&self.bytes)
            .split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
    }

    /// Logical buffer size reached while rendering.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many times the buffer doubled while rendering.
    pub fn doublings(&self) -> u32 {
        self.doublings
    }

    /// Copy up to `buf.len()` bytes starting at `offset` and return how many
    /// were copied. Zero means end of data.
    pub fn read_at(&self, offset: usize, buf: &mut [u8]) -> usize {
        let Some(rest) = self.bytes.get(offset..) else {
            return 0;
        };
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        n
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Output buffer that doubles its capacity ahead of any line that might
/// not fit.
struct ReportBuffer {
    bytes: Vec<u8>,
    capacity: usize,
    doublings: u32,
}

impl ReportBuffer {
    fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| TableError::OutOfMemory {
                what: "report buffer",
                requested: capacity,
            })?;
        Ok(Self {
            bytes,
            capacity,
            doublings: 0,
        })
    }

    /// Double until `needed` more bytes fit.
    fn ensure(&mut self, needed: usize) -> Result<(), TableError> {
        while self.bytes.len() + needed > self.capacity {
            let doubled = self.capacity.saturating_mul(2);
            self.bytes
                .try_reserve_exact(doubled - self.bytes.len())
                .map_err(|_| TableError::OutOfMemory {
                    what: "report buffer",
                    requested: doubled,
                })?;
            self.capacity = doubled;
            self.doublings += 1;
        }
        Ok(())
    }

    fn push_line(&mut self, word: &[u8], count: &[u8]) {
        self.bytes.extend_from_slice(word);
        self.bytes.extend_from_slice(LINE_SEPARATOR);
        self.bytes.extend_from_slice(count);
        self.bytes.push(b'\n');
    }

    fn finish(self) -> Report {
        Report {
            bytes: self.bytes,
            capacity: self.capacity,
            doublings: self.doublings,
        }
    }
}

/// Serialize every entry in table order.
///
/// `margin` is the room demanded before each line, normally the longest
/// line the tokenizer can produce. Longer lines (words inserted directly
/// into the table) demand their own length instead. On allocation failure
/// the partial buffer is freed and nothing is returned.
pub fn render<H>(
    table: &WordTable<H>,
    initial_capacity: usize,
    margin: usize,
) -> Result<Report, TableError> {
    let mut buf = ReportBuffer::with_capacity(initial_capacity.max(1))?;
    let mut digits = itoa::Buffer::new();
    for (_h, word, count) in table.iter() {
        let count = digits.format(count).as_bytes();
        let line_len = word.len() + LINE_SEPARATOR.len() + count.len() + 1;
        buf.ensure(margin.max(line_len))?;
        buf.push_line(word, count);
    }
    let report = buf.finish();
    debug!(
        entries = table.len(),
        bytes = report.len(),
        capacity = report.capacity(),
        doublings = report.doublings(),
        "rendered report"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistogramConfig;

    fn table_of(words: &[&str]) -> WordTable {
        let mut t = WordTable::with_buckets(128).unwrap();
        for w in words {
            t.increment(w.as_bytes()).unwrap();
        }
        t
    }

    fn margin() -> usize {
        HistogramConfig::default().report_line_margin()
    }

    /// cat hashes to bucket 41 and dog to 59, so cat comes first.
    #[test]
    fn renders_word_count_lines_in_bucket_order() {
        let t = table_of(&["cat", "dog", "cat"]);
        let r = render(&t, 1024, margin()).unwrap();
        assert_eq!(r.as_str().unwrap(), "cat: 2\ndog: 1\n");
        assert_eq!(r.lines().collect::<Vec<_>>(), vec![&b"cat: 2"[..], b"dog: 1"]);
        assert_eq!(r.doublings(), 0);
        assert_eq!(r.into_bytes(), b"cat: 2\ndog: 1\n".to_vec());
    }

    #[test]
    fn empty_table_renders_empty_report() {
        let t = table_of(&[]);
        let r = render(&t, 1024, margin()).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.lines().count(), 0);
        assert_eq!(r.capacity(), 1024);
    }

    /// Invariant: growth never drops or duplicates bytes; a grown report is
    /// identical to one rendered into a buffer that never had to grow.
    #[test]
    fn grown_report_matches_presized_report() {
        let words: Vec<String> = (0..200).map(|i| format!("word{i}")).collect();
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let t = table_of(&refs);

        let grown = render(&t, 64, margin()).unwrap();
        let presized = render(&t, 1 << 20, margin()).unwrap();
        assert!(grown.doublings() >= 2, "expected repeated growth");
        assert_eq!(presized.doublings(), 0);
        assert_eq!(grown.as_bytes(), presized.as_bytes());
        assert_eq!(grown.len(), presized.len());
        assert_eq!(grown.lines().count(), 200);
        assert!(grown.len() <= grown.capacity());
    }

    /// Invariant: the buffer grows before a line is written, never after.
    #[test]
    fn capacity_always_covers_margin_after_growth() {
        let t = table_of(&["a", "b", "c", "d", "e"]);
        let r = render(&t, 1, margin()).unwrap();
        // One margin's worth of room had to exist before the last line.
        assert!(r.capacity() >= r.len());
        assert!(r.capacity() >= margin());
        assert_eq!(r.capacity(), 1 << r.doublings());
    }

    /// Words longer than the margin still render whole.
    #[test]
    fn oversized_word_is_not_truncated() {
        let long = "x".repeat(500);
        let t = table_of(&[&long]);
        let r = render(&t, 16, margin()).unwrap();
        assert_eq!(r.as_str().unwrap(), format!("{long}: 1\n"));
    }

    #[test]
    fn read_at_honors_offset_and_length() {
        let t = table_of(&["cat", "dog", "cat"]);
        let r = render(&t, 1024, margin()).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(r.read_at(0, &mut buf), 4);
        assert_eq!(&buf, b"cat:");
        assert_eq!(r.read_at(12, &mut buf), 2);
        assert_eq!(&buf[..2], b"1\n");
        assert_eq!(r.read_at(r.len(), &mut buf), 0);
        assert_eq!(r.read_at(r.len() + 10, &mut buf), 0);
        assert_eq!(r.read_at(0, &mut []), 0);
    }

    /// A snapshot does not change when the table does.
    #[test]
    fn report_is_a_snapshot() {
        let mut t = table_of(&["cat"]);
        let before = render(&t, 1024, margin()).unwrap();
        t.increment(b"cat").unwrap();
        assert_eq!(before.as_str().unwrap(), "cat: 1\n");
        let after = render(&t, 1024, margin()).unwrap();
        assert_eq!(after.as_str().unwrap(), "cat: 2\n");
    }
}
