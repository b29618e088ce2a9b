use crate::color::Rgb;
use crate::error::FrameError;

/// Frame de luminance mono-canal livrée par le collaborateur de capture.
///
/// La géométrie (`row_stride`, `pixel_stride`) est déclarée par l'appelant et
/// n'est pas garantie cohérente avec `bytes` : le renderer tolère un buffer
/// tronqué cellule par cellule.
///
/// # Example
/// ```
/// use cs_core::frame::SourceFrame;
/// let frame = SourceFrame::packed(4, 1, vec![0, 128, 212, 255]);
/// assert_eq!(frame.row_stride, 4);
/// assert_eq!(frame.byte_at(2), Some(212));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SourceFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Distance in bytes between the starts of two consecutive rows.
    pub row_stride: usize,
    /// Distance in bytes between two horizontally adjacent pixels.
    pub pixel_stride: usize,
    /// Raw luminance bytes.
    pub bytes: Vec<u8>,
    /// Sample columns right-to-left (front-facing camera).
    pub mirror: bool,
}

impl SourceFrame {
    /// Tightly packed 8-bit luma buffer, one byte per pixel, not mirrored.
    #[must_use]
    pub fn packed(width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            width,
            height,
            row_stride: width as usize,
            pixel_stride: 1,
            bytes,
            mirror: false,
        }
    }

    /// Same frame with the mirror flag replaced.
    #[must_use]
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Minimum buffer length implied by the declared geometry.
    ///
    /// `None` when the geometry is degenerate or the computation overflows.
    #[must_use]
    pub fn required_len(&self) -> Option<usize> {
        let last_row = (self.height as usize).checked_sub(1)?;
        let last_col = (self.width as usize).checked_sub(1)?;
        self.row_stride
            .checked_mul(last_row)?
            .checked_add(self.pixel_stride.checked_mul(last_col)?)?
            .checked_add(1)
    }

    /// `true` if the buffer is shorter than the declared geometry requires.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.required_len().is_none_or(|len| self.bytes.len() < len)
    }

    /// Checks the geometry before any cell is processed.
    ///
    /// Only conditions that make the whole conversion meaningless are
    /// rejected; a short buffer is not an error here.
    ///
    /// # Errors
    /// Returns a [`FrameError`] describing the first inconsistency found.
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.width == 0 || self.height == 0 {
            return Err(FrameError::ZeroDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.pixel_stride == 0 {
            return Err(FrameError::ZeroPixelStride);
        }
        if self.bytes.is_empty() {
            return Err(FrameError::EmptyBuffer);
        }
        Ok(())
    }

    /// Byte at `index`, or `None` outside the buffer.
    #[inline(always)]
    #[must_use]
    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }
}

/// Run of consecutive glyphs sharing one color. `text` is never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Glyphs of the run, left to right.
    pub text: String,
    /// Couleur du run. `None` = couleur par défaut du collaborateur d'affichage.
    pub color: Option<Rgb>,
}

/// One rendered text row.
///
/// # Example
/// ```
/// use cs_core::frame::{Row, Segment};
/// let row = Row {
///     segments: vec![
///         Segment { text: "ab".into(), color: None },
///         Segment { text: "c".into(), color: None },
///     ],
/// };
/// assert_eq!(row.text(), "abc");
/// assert_eq!(row.char_len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    /// Segments in display order.
    pub segments: Vec<Segment>,
}

impl Row {
    /// Concatenated text of all segments, colors ignored.
    #[must_use]
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Number of glyphs in the row.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.segments.iter().map(|s| s.text.chars().count()).sum()
    }
}

/// Résultat complet d'une conversion. Publié d'un bloc, jamais partiellement.
///
/// # Example
/// ```
/// use cs_core::frame::RenderedFrame;
/// let frame = RenderedFrame::default();
/// assert!(frame.rows.is_empty());
/// assert_eq!(frame.to_plain_text(), "");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Rows, top to bottom.
    pub rows: Vec<Row>,
    /// Grid width in characters.
    pub width: u16,
    /// Grid height in characters.
    pub height: u16,
}

impl RenderedFrame {
    /// All rows joined by `\n`, colors ignored.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.rows
            .iter()
            .map(Row::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Total number of segments over all rows.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.rows.iter().map(|r| r.segments.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_len_follows_strides() {
        let frame = SourceFrame {
            width: 3,
            height: 2,
            row_stride: 8,
            pixel_stride: 2,
            bytes: vec![0; 13],
            mirror: false,
        };
        assert_eq!(frame.required_len(), Some(8 + 4 + 1));
        assert!(!frame.is_truncated());

        let short = SourceFrame {
            bytes: vec![0; 12],
            ..frame
        };
        assert!(short.is_truncated());
    }

    #[test]
    fn validate_rejects_degenerate_geometry() {
        assert!(matches!(
            SourceFrame::packed(0, 4, vec![1]).validate(),
            Err(FrameError::ZeroDimensions { width: 0, height: 4 })
        ));
        assert!(matches!(
            SourceFrame::packed(2, 2, Vec::new()).validate(),
            Err(FrameError::EmptyBuffer)
        ));
        let mut frame = SourceFrame::packed(2, 2, vec![0; 4]);
        frame.pixel_stride = 0;
        assert!(matches!(frame.validate(), Err(FrameError::ZeroPixelStride)));
    }

    #[test]
    fn truncated_buffer_is_still_valid() {
        let frame = SourceFrame::packed(4, 4, vec![0; 5]);
        assert!(frame.is_truncated());
        assert!(frame.validate().is_ok());
    }
}
