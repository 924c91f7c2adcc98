//! word-histogram: an incremental word-frequency histogram fed one
//! character at a time, with an on-demand text report.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: count words typed on a keyboard without ever buffering more than
//!   one word, and render the counts on request.
//! - Layers:
//!   - WordTable<H>: fixed bucket array of singly linked chains, keyed by
//!     Jenkins one-at-a-time hash. Entries live in a slotmap arena and link
//!     to each other by arena key, so teardown is a plain drop.
//!   - StreamTokenizer: two-state machine (idle / accumulating) over a
//!     fixed-capacity `WordAccumulator`; yields completed words, erases on
//!     DEL, drops words that outgrow the accumulator.
//!   - report::render: walks the table bucket by bucket into a buffer that
//!     doubles ahead of each line.
//!   - Histogram<H>: the one context object owning all of the above plus
//!     the cached report of the single open reader.
//!   - HistogramModule: registers the histogram with the host's keyboard
//!     hook and report endpoint, all-or-nothing, and unregisters on
//!     teardown.
//!
//! Constraints
//! - Single producer: characters are handled one at a time, to completion.
//!   All mutation goes through `&mut Histogram`, so a host serving reads
//!   from another thread shares one lock across events and renders.
//! - Bounded input memory: the accumulator never grows. The table itself
//!   grows without bound until torn down.
//! - The bucket count is fixed at construction; there is no rehashing and
//!   no per-entry removal.
//! - Bucket placement depends only on the key bytes, so reports list words
//!   in the same order across runs.
//!
//! Failure policy
//! - Allocation failures that the standard library reports (`try_reserve`)
//!   surface as `TableError::OutOfMemory`. During an increment the word is
//!   dropped and logged; during init or report open the error is returned.
//! - Notifications without parameters are logged and ignored.
//! - A second report open while one is active fails with `Busy`.
//! - Registration failures unwind whatever was already registered.
//!
//! Logging
//! - Events go through `tracing`; installing a subscriber is up to the host.

pub mod config;
pub mod error;
pub mod event;
pub mod histogram;
pub mod jenkins;
pub mod module;
pub mod report;
pub mod tokenizer;
pub mod word_table;
mod word_table_proptest;

// Public surface
pub use config::HistogramConfig;
pub use error::{ConfigError, HistogramError, RegistrationFailure, TableError};
pub use event::{KeyAction, KeyEvent, Notify};
pub use histogram::{CharOutcome, Histogram};
pub use jenkins::{one_at_a_time, BucketHasher, Jenkins};
pub use module::{HistogramModule, KeyboardHook, ReportMount};
pub use report::Report;
pub use word_table::{EntryHandle, WordTable};
