use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A glyph ramp needs at least one glyph.
    #[error("Rampe de glyphes vide")]
    EmptyGlyphRamp,

    /// A palette needs at least one color.
    #[error("Palette vide")]
    EmptyPalette,

    /// Palette name not among the built-in schemes.
    #[error("Palette inconnue : {name}")]
    UnknownPalette {
        /// Name as given by the user.
        name: String,
    },
}

/// Geometry problems that abort a single frame's conversion.
///
/// Never fatal to the pipeline: the previously published frame is kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Width or height is zero.
    #[error("Dimensions invalides : {width}×{height}")]
    ZeroDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Pixel stride of zero makes every column read the same byte.
    #[error("Pixel stride nul")]
    ZeroPixelStride,

    /// The frame carries no bytes at all.
    #[error("Buffer de frame vide")]
    EmptyBuffer,

    /// Source so tall that the derived grid would exceed the row cap.
    #[error("Grille trop haute : {rows} lignes (max {max})")]
    GridTooTall {
        /// Rows the grid would need.
        rows: u64,
        /// Row cap.
        max: u16,
    },
}
