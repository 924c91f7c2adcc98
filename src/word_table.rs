//! WordTable: separate-chaining word -> count map with stable entry handles.
//!
//! Entries live in a generational arena and each bucket holds the arena key
//! of its chain head. Chains are singly linked through `next` keys, newest
//! first-seen word at the head. The bucket array is sized once and never
//! rehashed; only chains grow.

use crate::error::TableError;
use crate::jenkins::{BucketHasher, Jenkins};
use core::fmt::Write as _;
use core::mem::size_of;
use slotmap::{new_key_type, SlotMap};
use tracing::trace;

new_key_type! {
    struct EntryKey;
}

/// Stable reference to one entry. Entries are never removed individually,
/// so a handle stays valid until the table is cleared or dropped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EntryHandle(EntryKey);

impl EntryHandle {
    pub fn word<'a, H>(&self, table: &'a WordTable<H>) -> Option<&'a [u8]> {
        table.entries.get(self.0).map(|e| &*e.key)
    }

    pub fn count<H>(&self, table: &WordTable<H>) -> Option<u64> {
        table.entries.get(self.0).map(|e| e.count)
    }
}

#[derive(Debug)]
struct WordEntry {
    key: Box<[u8]>,
    count: u64,
    next: Option<EntryKey>,
}

pub struct WordTable<H = Jenkins> {
    hasher: H,
    buckets: Box<[Option<EntryKey>]>,
    entries: SlotMap<EntryKey, WordEntry>, // every chain node, owned here
}

impl WordTable {
    pub fn with_buckets(buckets_nb: usize) -> Result<Self, TableError> {
        Self::with_hasher(buckets_nb, Jenkins)
    }
}

impl<H: BucketHasher> WordTable<H> {
    /// Allocate `buckets_nb` empty chains. Zero buckets is an error.
    pub fn with_hasher(buckets_nb: usize, hasher: H) -> Result<Self, TableError> {
        if buckets_nb == 0 {
            return Err(TableError::NoBuckets);
        }
        let mut heads = Vec::new();
        heads
            .try_reserve_exact(buckets_nb)
            .map_err(|_| TableError::OutOfMemory {
                what: "bucket array",
                requested: buckets_nb.saturating_mul(size_of::<Option<EntryKey>>()),
            })?;
        heads.resize(buckets_nb, None);
        Ok(Self {
            hasher,
            buckets: heads.into_boxed_slice(),
            entries: SlotMap::with_key(),
        })
    }

    pub fn bucket_index(&self, word: &[u8]) -> usize {
        self.hasher.hash_bytes(word) as usize % self.buckets.len()
    }

    fn find_in_bucket(&self, bucket: usize, word: &[u8]) -> Option<EntryKey> {
        let mut cursor = self.buckets[bucket];
        while let Some(k) = cursor {
            let entry = self.entries.get(k)?;
            if *entry.key == *word {
                return Some(k);
            }
            cursor = entry.next;
        }
        None
    }

    /// Count one occurrence of `word`.
    ///
    /// An existing entry is bumped in place without allocating. A new word
    /// gets its own copy of the bytes, a count of 1, and becomes the head of
    /// its bucket's chain. If the copy cannot be allocated the table is left
    /// untouched.
    pub fn increment(&mut self, word: &[u8]) -> Result<EntryHandle, TableError> {
        let bucket = self.bucket_index(word);
        let found = self.find_in_bucket(bucket, word);
        if let Some((k, entry)) = found.and_then(|k| self.entries.get_mut(k).map(|e| (k, e))) {
            entry.count = entry.count.saturating_add(1);
            return Ok(EntryHandle(k));
        }

        let key = copy_key(word)?;
        let next = self.buckets[bucket];
        let k = self.entries.insert(WordEntry {
            key,
            count: 1,
            next,
        });
        self.buckets[bucket] = Some(k);
        Ok(EntryHandle(k))
    }

    pub fn find(&self, word: &[u8]) -> Option<EntryHandle> {
        self.find_in_bucket(self.bucket_index(word), word)
            .map(EntryHandle)
    }

    /// Occurrences of `word`, or `None` if it was never counted.
    pub fn get(&self, word: &[u8]) -> Option<u64> {
        self.find(word).and_then(|h| h.count(self))
    }

    pub fn contains(&self, word: &[u8]) -> bool {
        self.find(word).is_some()
    }
}

impl<H> WordTable<H> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn buckets_nb(&self) -> usize {
        self.buckets.len()
    }

    /// Entries of one bucket in chain order. Out-of-range buckets are empty.
    pub fn chain(&self, bucket: usize) -> Chain<'_, H> {
        Chain {
            table: self,
            cursor: self.buckets.get(bucket).copied().flatten(),
        }
    }

    /// Every entry, bucket index ascending, then chain order.
    pub fn iter(&self) -> Iter<'_, H> {
        Iter {
            table: self,
            bucket: 0,
            cursor: None,
        }
    }

    /// Release every entry and empty all chains. The bucket array is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets.fill(None);
    }

    /// Log each non-empty chain at trace level.
    pub fn dump(&self) {
        if !tracing::enabled!(tracing::Level::TRACE) {
            return;
        }
        for bucket in 0..self.buckets.len() {
            let mut line = String::new();
            for (_h, word, count) in self.chain(bucket) {
                if !line.is_empty() {
                    line.push_str(" -> ");
                }
                let _ = write!(line, "{} ({})", String::from_utf8_lossy(word), count);
            }
            if !line.is_empty() {
                trace!(bucket, "[{}] = {}", bucket, line);
            }
        }
    }
}

fn copy_key(word: &[u8]) -> Result<Box<[u8]>, TableError> {
    let mut key = Vec::new();
    key.try_reserve_exact(word.len())
        .map_err(|_| TableError::OutOfMemory {
            what: "word key",
            requested: word.len(),
        })?;
    key.extend_from_slice(word);
    Ok(key.into_boxed_slice())
}

/// Iterator over one bucket's chain.
pub struct Chain<'a, H> {
    table: &'a WordTable<H>,
    cursor: Option<EntryKey>,
}

impl<'a, H> Iterator for Chain<'a, H> {
    type Item = (EntryHandle, &'a [u8], u64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let entry = self.table.entries.get(k)?;
        self.cursor = entry.next;
        Some((EntryHandle(k), &*entry.key, entry.count))
    }
}

/// Iterator over the whole table in report order.
pub struct Iter<'a, H> {
    table: &'a WordTable<H>,
    bucket: usize,
    cursor: Option<EntryKey>,
}

impl<'a, H> Iterator for Iter<'a, H> {
    type Item = (EntryHandle, &'a [u8], u64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cursor {
                let entry = self.table.entries.get(k)?;
                self.cursor = entry.next;
                return Some((EntryHandle(k), &*entry.key, entry.count));
            }
            let head = self.table.buckets.get(self.bucket)?;
            self.cursor = *head;
            self.bucket += 1;
        }
    }
}
