use std::sync::Arc;

use crate::frame::{RenderedFrame, SourceFrame};

/// Fournit des frames de luminance au pipeline.
///
/// Implémenté par : `ImageSource`, `PatternSource`.
///
/// # Example
/// ```
/// use cs_core::traits::FrameSource;
/// use cs_core::frame::SourceFrame;
///
/// struct DummySource;
/// impl FrameSource for DummySource {
///     fn next_frame(&mut self) -> Option<SourceFrame> { None }
///     fn native_size(&self) -> (u32, u32) { (0, 0) }
///     fn is_live(&self) -> bool { false }
/// }
/// ```
pub trait FrameSource: Send + 'static {
    /// Retourne la prochaine frame disponible.
    ///
    /// Retourne `None` si la source est épuisée.
    fn next_frame(&mut self) -> Option<SourceFrame>;

    /// Dimensions natives de la source.
    fn native_size(&self) -> (u32, u32);

    /// Indique si la source est infinie (caméra, procédural) ou finie (fichier).
    fn is_live(&self) -> bool;
}

/// Receives finished frames and transient notices from the renderer.
///
/// `publish` replaces whatever was shown before; implementations must make
/// the replacement a single atomic store.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use cs_core::traits::FramePublisher;
/// use cs_core::frame::RenderedFrame;
///
/// struct Discard;
/// impl FramePublisher for Discard {
///     fn publish(&self, _frame: Arc<RenderedFrame>) {}
///     fn notify(&self, _message: String) {}
/// }
/// ```
pub trait FramePublisher: Send + Sync {
    /// Replace the current frame.
    fn publish(&self, frame: Arc<RenderedFrame>);

    /// Surface a transient, non-fatal message (e.g. a malformed frame).
    fn notify(&self, message: String);
}

impl<T: FramePublisher + ?Sized> FramePublisher for Arc<T> {
    fn publish(&self, frame: Arc<RenderedFrame>) {
        (**self).publish(frame);
    }

    fn notify(&self, message: String) {
        (**self).notify(message);
    }
}
