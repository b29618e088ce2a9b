/// ASCII conversion engine for camscii.
///
/// Converts luminance frames to rows of colored glyph segments, with
/// throttling and single-slot frame handoff for live sources.
pub mod color_map;
pub mod equalize;
pub mod mailbox;
pub mod pipeline;
pub mod quantize;
pub mod renderer;
pub mod runs;
pub mod sampler;
pub mod throttle;

pub use pipeline::{FramePipeline, SubmitOutcome};
pub use renderer::{FrameRenderer, RenderError};
pub use throttle::FrameThrottle;
