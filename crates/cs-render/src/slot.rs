use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;
use cs_core::frame::RenderedFrame;
use cs_core::traits::FramePublisher;

/// Durée d'affichage d'une notice transitoire.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
struct Notice {
    message: String,
    posted: Instant,
}

/// Frame courante partagée entre le thread de conversion et le thread UI.
///
/// Publication = un seul remplacement atomique du pointeur : le lecteur voit
/// soit l'ancienne frame complète, soit la nouvelle, jamais un mélange.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use cs_core::frame::RenderedFrame;
/// use cs_core::traits::FramePublisher;
/// use cs_render::slot::DisplaySlot;
///
/// let slot = DisplaySlot::new();
/// assert!(slot.current().is_none());
/// slot.publish(Arc::new(RenderedFrame::default()));
/// assert!(slot.current().is_some());
/// ```
#[derive(Debug, Default)]
pub struct DisplaySlot {
    frame: ArcSwapOption<RenderedFrame>,
    notice: Mutex<Option<Notice>>,
    unavailable: ArcSwapOption<String>,
}

impl DisplaySlot {
    /// Empty slot: no frame, no notice.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest published frame, if any.
    #[must_use]
    pub fn current(&self) -> Option<Arc<RenderedFrame>> {
        self.frame.load_full()
    }

    /// Notice still within its display window at `now`.
    #[must_use]
    pub fn notice(&self, now: Instant) -> Option<String> {
        let guard = self.notice.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.posted) < NOTICE_TTL)
            .map(|n| n.message.clone())
    }

    /// Bascule l'affichage sur un message statique (source indisponible).
    pub fn mark_unavailable(&self, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("Source indisponible : {reason}");
        self.unavailable.store(Some(Arc::new(reason)));
    }

    /// Reason the source is unavailable, if it is.
    #[must_use]
    pub fn unavailable(&self) -> Option<Arc<String>> {
        self.unavailable.load_full()
    }
}

impl FramePublisher for DisplaySlot {
    fn publish(&self, frame: Arc<RenderedFrame>) {
        self.frame.store(Some(frame));
    }

    fn notify(&self, message: String) {
        *self.notice.lock().unwrap_or_else(PoisonError::into_inner) = Some(Notice {
            message,
            posted: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_replaces_frame() {
        let slot = DisplaySlot::new();
        let a = Arc::new(RenderedFrame {
            width: 1,
            ..RenderedFrame::default()
        });
        let b = Arc::new(RenderedFrame {
            width: 2,
            ..RenderedFrame::default()
        });
        slot.publish(Arc::clone(&a));
        let held = slot.current().unwrap();
        slot.publish(b);
        assert_eq!(held.width, 1);
        assert_eq!(slot.current().unwrap().width, 2);
    }

    #[test]
    fn notice_expires() {
        let slot = DisplaySlot::new();
        slot.notify("frame invalide".into());
        let now = Instant::now();
        assert_eq!(slot.notice(now).as_deref(), Some("frame invalide"));
        assert!(slot.notice(now + NOTICE_TTL + Duration::from_millis(1)).is_none());
    }

    #[test]
    fn unavailable_is_sticky() {
        let slot = DisplaySlot::new();
        assert!(slot.unavailable().is_none());
        slot.mark_unavailable("caméra absente");
        assert_eq!(slot.unavailable().unwrap().as_str(), "caméra absente");
    }
}
