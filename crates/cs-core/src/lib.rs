/// Configuration, types, and shared structures for camscii.
///
/// This crate contains all shared types, traits, and configuration logic
/// used across the camscii workspace.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use charset::GlyphRamp;
pub use color::{ColorRamp, PaletteName, Rgb};
pub use config::RenderConfig;
pub use error::{CoreError, FrameError};
pub use frame::{RenderedFrame, Row, Segment, SourceFrame};
