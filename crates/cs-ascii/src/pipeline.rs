use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use cs_core::config::RenderConfig;
use cs_core::frame::SourceFrame;
use cs_core::traits::FramePublisher;

use crate::renderer::{FrameRenderer, RenderError};
use crate::throttle::FrameThrottle;

/// Compteurs de conversion, lisibles depuis le thread UI.
#[derive(Debug, Default)]
pub struct RenderStats {
    accepted: AtomicU64,
    throttled: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of [`RenderStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Conversions published.
    pub accepted: u64,
    /// Frames dropped at the throttle gate.
    pub throttled: u64,
    /// Conversions aborted on a malformed frame.
    pub failed: u64,
}

impl RenderStats {
    /// Current counter values.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            throttled: self.throttled.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// What happened to a submitted frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Converted and handed to the publisher.
    Published,
    /// Dropped at the gate (busy or too soon). Not an error.
    Throttled,
    /// Conversion aborted; the previous frame stays on display.
    Failed(RenderError),
}

/// Throttle → render → publish, one frame at a time.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::time::Instant;
/// use cs_core::config::RenderConfig;
/// use cs_core::frame::{RenderedFrame, SourceFrame};
/// use cs_core::traits::FramePublisher;
/// use cs_ascii::pipeline::{FramePipeline, SubmitOutcome};
///
/// struct Discard;
/// impl FramePublisher for Discard {
///     fn publish(&self, _frame: Arc<RenderedFrame>) {}
///     fn notify(&self, _message: String) {}
/// }
///
/// let pipeline = FramePipeline::new(&RenderConfig::default(), Discard);
/// let frame = SourceFrame::packed(8, 8, vec![128; 64]);
/// assert_eq!(pipeline.submit(&frame, Instant::now()), SubmitOutcome::Published);
/// ```
pub struct FramePipeline<P: FramePublisher> {
    throttle: FrameThrottle,
    renderer: Mutex<FrameRenderer>,
    publisher: P,
    stats: Arc<RenderStats>,
}

impl<P: FramePublisher> FramePipeline<P> {
    /// Create a pipeline publishing to `publisher`.
    #[must_use]
    pub fn new(config: &RenderConfig, publisher: P) -> Self {
        Self {
            throttle: FrameThrottle::new(config.throttle_interval()),
            renderer: Mutex::new(FrameRenderer::new(config)),
            publisher,
            stats: Arc::new(RenderStats::default()),
        }
    }

    /// Apply a new config (hot reload, key toggles).
    pub fn reconfigure(&self, config: &RenderConfig) {
        self.throttle.set_interval(config.throttle_interval());
        self.renderer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .update_if_needed(config);
    }

    /// Shared handle on the counters.
    #[must_use]
    pub fn stats(&self) -> Arc<RenderStats> {
        Arc::clone(&self.stats)
    }

    /// The gate, for inspection.
    #[must_use]
    pub fn throttle(&self) -> &FrameThrottle {
        &self.throttle
    }

    /// Offer one frame arriving at `now`.
    ///
    /// Dropped silently if a conversion is in flight or the interval has not
    /// elapsed. A failed conversion is reported to the publisher as a notice.
    pub fn submit(&self, frame: &SourceFrame, now: Instant) -> SubmitOutcome {
        let Some(_permit) = self.throttle.try_acquire(now) else {
            self.stats.throttled.fetch_add(1, Ordering::Relaxed);
            log::trace!("Frame ignorée par le throttle");
            return SubmitOutcome::Throttled;
        };

        let result = self
            .renderer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .render(frame);

        match result {
            Ok(rendered) => {
                self.publisher.publish(Arc::new(rendered));
                self.stats.accepted.fetch_add(1, Ordering::Relaxed);
                SubmitOutcome::Published
            }
            Err(e) => {
                log::warn!("Conversion abandonnée : {e}");
                self.publisher.notify(e.to_string());
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                SubmitOutcome::Failed(e)
            }
        }
    }
}
