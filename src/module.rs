//! Lifecycle: wiring a histogram to its host's character source and report
//! endpoint, and taking it down again.

use crate::config::HistogramConfig;
use crate::error::{HistogramError, RegistrationFailure};
use crate::event::{KeyEvent, Notify};
use crate::histogram::Histogram;
use crate::jenkins::{BucketHasher, Jenkins};
use tracing::{error, info};

/// The host's keyboard notifier chain.
pub trait KeyboardHook {
    fn register(&mut self) -> Result<(), RegistrationFailure>;
    fn unregister(&mut self);
}

/// The host's read-only file exposing the report.
pub trait ReportMount {
    fn mount(&mut self) -> Result<(), RegistrationFailure>;
    fn unmount(&mut self);
}

/// A histogram registered with both collaborators.
///
/// Construction either registers everything or nothing. Teardown runs
/// once, through [`HistogramModule::teardown`] or on drop.
pub struct HistogramModule<K: KeyboardHook, M: ReportMount, H = Jenkins> {
    histogram: Histogram<H>,
    hook: K,
    mount: M,
    live: bool,
}

impl<K: KeyboardHook, M: ReportMount> HistogramModule<K, M> {
    pub fn init(config: HistogramConfig, hook: K, mount: M) -> Result<Self, HistogramError> {
        Self::init_with_hasher(config, Jenkins, hook, mount)
    }
}

impl<K: KeyboardHook, M: ReportMount, H: BucketHasher> HistogramModule<K, M, H> {
    pub fn init_with_hasher(
        config: HistogramConfig,
        hasher: H,
        mut hook: K,
        mut mount: M,
    ) -> Result<Self, HistogramError> {
        info!(buckets = config.buckets_nb, "histogram init");
        // The table exists before anything can deliver into it.
        let histogram = Histogram::with_hasher(config, hasher).map_err(|e| {
            error!(error = %e, "failed to build histogram");
            e
        })?;

        if let Err(source) = mount.mount() {
            error!(error = %source, "failed to mount report endpoint");
            return Err(HistogramError::Registration {
                collaborator: "report endpoint",
                source,
            });
        }
        if let Err(source) = hook.register() {
            error!(error = %source, "failed to register keyboard hook");
            mount.unmount();
            return Err(HistogramError::Registration {
                collaborator: "keyboard hook",
                source,
            });
        }

        Ok(Self {
            histogram,
            hook,
            mount,
            live: true,
        })
    }

    pub fn handle_event(&mut self, event: Option<&KeyEvent>) -> Notify {
        self.histogram.handle_event(event)
    }
}

impl<K: KeyboardHook, M: ReportMount, H> HistogramModule<K, M, H> {
    pub fn histogram(&self) -> &Histogram<H> {
        &self.histogram
    }

    pub fn histogram_mut(&mut self) -> &mut Histogram<H> {
        &mut self.histogram
    }

    pub fn open_report(&mut self) -> Result<usize, HistogramError> {
        self.histogram.open_report()
    }

    pub fn read_report(&self, offset: usize, buf: &mut [u8]) -> Result<usize, HistogramError> {
        self.histogram.read_report(offset, buf)
    }

    pub fn close_report(&mut self) -> bool {
        self.histogram.close_report()
    }

    /// Unregister from the host and release every counted word.
    pub fn teardown(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;
        info!(words = self.histogram.table().len(), "histogram exit");
        self.hook.unregister();
        self.mount.unmount();
        self.histogram.clear();
    }
}

impl<K: KeyboardHook, M: ReportMount, H> Drop for HistogramModule<K, M, H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
