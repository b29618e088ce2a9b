use cs_core::error::FrameError;
use cs_core::frame::SourceFrame;

/// Plafond de lignes d'une grille ; au-delà la frame est rejetée.
pub const MAX_GRID_ROWS: u16 = 4096;

/// Character grid derived from a source frame for one conversion.
///
/// # Example
/// ```
/// use cs_ascii::sampler::TargetGrid;
/// let grid = TargetGrid::for_source(640, 480, 80, 0.5).unwrap();
/// assert_eq!((grid.width, grid.height), (80, 30));
/// assert!((grid.x_scale - 8.0).abs() < 1e-9);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetGrid {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
    /// Source pixels per column.
    pub x_scale: f64,
    /// Source pixels per row.
    pub y_scale: f64,
}

impl TargetGrid {
    /// `height = max(1, round(src_h / src_w * target_width * char_aspect))`.
    ///
    /// Callers guarantee non-zero source dimensions (see `SourceFrame::validate`).
    ///
    /// # Errors
    /// Returns [`FrameError::GridTooTall`] when the height would exceed
    /// [`MAX_GRID_ROWS`] (pathologically tall sources).
    pub fn for_source(
        src_width: u32,
        src_height: u32,
        target_width: u16,
        char_aspect: f32,
    ) -> Result<Self, FrameError> {
        let width = target_width.max(1);
        let src_w = f64::from(src_width.max(1));
        let src_h = f64::from(src_height.max(1));
        let rows = (src_h / src_w * f64::from(width) * f64::from(char_aspect))
            .round()
            .max(1.0);
        if rows > f64::from(MAX_GRID_ROWS) {
            return Err(FrameError::GridTooTall {
                rows: rows as u64,
                max: MAX_GRID_ROWS,
            });
        }
        let height = rows as u16;
        Ok(Self {
            width,
            height,
            x_scale: src_w / f64::from(width),
            y_scale: src_h / f64::from(height),
        })
    }
}

/// Source row for target row `ty`, clamped into the frame.
#[inline(always)]
#[must_use]
pub fn source_row(grid: &TargetGrid, ty: u16, height: u32) -> u32 {
    let y = (f64::from(ty) * grid.y_scale).floor();
    (y.max(0.0) as u32).min(height.saturating_sub(1))
}

/// Source column for target column `tx`, mirrored if requested.
#[inline(always)]
#[must_use]
pub fn source_col(grid: &TargetGrid, tx: u16, width: u32, mirror: bool) -> u32 {
    let last = i64::from(width.saturating_sub(1));
    let raw = (f64::from(tx) * grid.x_scale).floor() as i64;
    let x = if mirror { last - raw } else { raw };
    x.clamp(0, last) as u32
}

/// Byte offset of the nearest-neighbor source pixel for cell `(tx, ty)`.
///
/// `None` if the offset falls outside the buffer (truncated frame); the
/// caller renders that cell blank.
///
/// # Example
/// ```
/// use cs_core::frame::SourceFrame;
/// use cs_ascii::sampler::{sample_index, TargetGrid};
/// let frame = SourceFrame::packed(4, 1, vec![0, 1, 2, 3]);
/// let grid = TargetGrid::for_source(4, 1, 4, 0.5).unwrap();
/// assert_eq!(sample_index(&frame, &grid, 1, 0), Some(1));
/// let mirrored = frame.with_mirror(true);
/// assert_eq!(sample_index(&mirrored, &grid, 1, 0), Some(2));
/// ```
#[inline(always)]
#[must_use]
pub fn sample_index(frame: &SourceFrame, grid: &TargetGrid, tx: u16, ty: u16) -> Option<usize> {
    let sy = source_row(grid, ty, frame.height) as usize;
    let sx = source_col(grid, tx, frame.width, frame.mirror) as usize;
    let index = sy
        .checked_mul(frame.row_stride)?
        .checked_add(sx.checked_mul(frame.pixel_stride)?)?;
    (index < frame.bytes.len()).then_some(index)
}

/// Luminance of the sampled pixel, `None` for an out-of-bounds cell.
#[inline(always)]
#[must_use]
pub fn sample(frame: &SourceFrame, grid: &TargetGrid, tx: u16, ty: u16) -> Option<u8> {
    sample_index(frame, grid, tx, ty).and_then(|i| frame.byte_at(i))
}
