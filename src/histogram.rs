//! Histogram: the single context object tying the tokenizer, the table and
//! the open report session together.
//!
//! Every mutating entry point takes `&mut self`. Hosts that deliver
//! characters and serve reads from different threads wrap the context in
//! one lock, which serializes increments against renders.

use crate::config::HistogramConfig;
use crate::error::HistogramError;
use crate::event::{KeyAction, KeyEvent, Notify};
use crate::jenkins::{BucketHasher, Jenkins};
use crate::report::{self, Report};
use crate::tokenizer::{Step, StreamTokenizer};
use crate::word_table::{EntryHandle, WordTable};
use tracing::{debug, info, trace, warn};

/// What one character did to the histogram.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CharOutcome {
    Ignored,
    Appended,
    Erased,
    /// A word was completed and counted.
    Recorded(EntryHandle),
    /// A word was completed but could not be stored (allocation failure).
    Dropped,
    /// An over-long word was thrown away.
    Discarded,
}

pub struct Histogram<H = Jenkins> {
    config: HistogramConfig,
    table: WordTable<H>,
    tokenizer: StreamTokenizer,
    session: Option<Report>, // cached blob of the open reader
}

impl Histogram {
    pub fn new(config: HistogramConfig) -> Result<Self, HistogramError> {
        Self::with_hasher(config, Jenkins)
    }
}

impl<H: BucketHasher> Histogram<H> {
    pub fn with_hasher(config: HistogramConfig, hasher: H) -> Result<Self, HistogramError> {
        config.validate()?;
        let table = WordTable::with_hasher(config.buckets_nb, hasher)?;
        let tokenizer = StreamTokenizer::new(&config)?;
        Ok(Self {
            tokenizer,
            config,
            table,
            session: None,
        })
    }

    pub fn handle_char(&mut self, c: u8) -> CharOutcome {
        trace!(byte = c, "character");
        match self.tokenizer.handle_char(c) {
            Step::Ignored => CharOutcome::Ignored,
            Step::Appended => CharOutcome::Appended,
            Step::Erased => CharOutcome::Erased,
            Step::Discarded => {
                debug!(
                    limit = self.config.max_word_len,
                    "discarded over-long word"
                );
                CharOutcome::Discarded
            }
            Step::Completed(word) => match self.table.increment(word) {
                Ok(handle) => {
                    debug!(
                        len = word.len(),
                        count = handle.count(&self.table),
                        "recorded word"
                    );
                    self.table.dump();
                    CharOutcome::Recorded(handle)
                }
                Err(e) => {
                    warn!(error = %e, len = word.len(), "dropped word");
                    CharOutcome::Dropped
                }
            },
        }
    }

    /// Notifier-chain entry point. Only key presses at the keysym stage
    /// reach the tokenizer; a notification with no payload is logged and
    /// skipped.
    pub fn handle_event(&mut self, event: Option<&KeyEvent>) -> Notify {
        let Some(event) = event else {
            warn!("keyboard notification without parameters");
            return Notify::Done;
        };
        if !event.down {
            return Notify::Done;
        }
        if event.action != KeyAction::Keysym {
            trace!(action = ?event.action, "skipping notification");
            return Notify::Done;
        }
        self.handle_char(event.value);
        Notify::Ok
    }

    pub fn count(&self, word: &[u8]) -> Option<u64> {
        self.table.get(word)
    }
}

impl<H> Histogram<H> {
    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    pub fn table(&self) -> &WordTable<H> {
        &self.table
    }

    /// The word typed so far, not yet counted.
    pub fn pending(&self) -> &[u8] {
        self.tokenizer.pending()
    }

    /// Render a fresh snapshot without touching the session.
    pub fn render(&self) -> Result<Report, HistogramError> {
        let report = report::render(
            &self.table,
            self.config.initial_report_capacity,
            self.config.report_line_margin(),
        )?;
        Ok(report)
    }

    /// Render and cache a report for one reader. Returns its length.
    pub fn open_report(&mut self) -> Result<usize, HistogramError> {
        if self.session.is_some() {
            debug!("report already open");
            return Err(HistogramError::Busy);
        }
        let report = self.render()?;
        let len = report.len();
        self.session = Some(report);
        info!(bytes = len, "report opened");
        Ok(len)
    }

    /// Copy from the cached report at `offset`. `Ok(0)` is end of data.
    pub fn read_report(&self, offset: usize, buf: &mut [u8]) -> Result<usize, HistogramError> {
        let report = self.session.as_ref().ok_or(HistogramError::NoSession)?;
        Ok(report.read_at(offset, buf))
    }

    /// Release the cached report. Returns whether one was open.
    pub fn close_report(&mut self) -> bool {
        let was_open = self.session.take().is_some();
        if was_open {
            info!("report closed");
        }
        was_open
    }

    pub fn is_report_open(&self) -> bool {
        self.session.is_some()
    }

    /// Drop the session, the pending word and every counted word.
    pub fn clear(&mut self) {
        self.close_report();
        self.tokenizer.reset();
        self.table.clear();
    }
}
