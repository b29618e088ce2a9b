//! Coalescing of per-cell colors into styled segments.

use cs_core::color::Rgb;
use cs_core::frame::{Row, Segment};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunState {
    NoSegment,
    InSegment(Option<Rgb>),
}

/// Accumulates one row of (glyph, color) cells into the minimal list of
/// segments. Adjacent cells share a segment only on exact color equality.
///
/// # Example
/// ```
/// use cs_core::color::Rgb;
/// use cs_ascii::runs::RunBuilder;
///
/// let red = Some(Rgb::new(255, 0, 0));
/// let mut builder = RunBuilder::with_capacity(3);
/// builder.push('a', red);
/// builder.push('b', red);
/// builder.push('c', None);
/// let row = builder.finish();
/// assert_eq!(row.segments.len(), 2);
/// assert_eq!(row.segments[0].text, "ab");
/// ```
pub struct RunBuilder {
    state: RunState,
    buf: String,
    segments: Vec<Segment>,
}

impl RunBuilder {
    /// Builder sized for rows of `width` glyphs.
    #[must_use]
    pub fn with_capacity(width: usize) -> Self {
        Self {
            state: RunState::NoSegment,
            buf: String::with_capacity(width),
            segments: Vec::new(),
        }
    }

    /// Append one cell.
    #[inline]
    pub fn push(&mut self, glyph: char, color: Option<Rgb>) {
        match self.state {
            RunState::InSegment(current) if current == color => {}
            RunState::InSegment(current) => {
                self.flush(current);
                self.state = RunState::InSegment(color);
            }
            RunState::NoSegment => self.state = RunState::InSegment(color),
        }
        self.buf.push(glyph);
    }

    /// End the row and return it. The builder is reset for the next row.
    pub fn finish(&mut self) -> Row {
        if let RunState::InSegment(current) = self.state {
            self.flush(current);
        }
        self.state = RunState::NoSegment;
        Row {
            segments: std::mem::take(&mut self.segments),
        }
    }

    fn flush(&mut self, color: Option<Rgb>) {
        if self.buf.is_empty() {
            return;
        }
        let cap = self.buf.capacity();
        let text = std::mem::replace(&mut self.buf, String::with_capacity(cap));
        self.segments.push(Segment { text, color });
    }
}

/// Monochrome row: exactly one segment carrying the default color.
#[must_use]
pub fn monochrome_row(text: String) -> Row {
    if text.is_empty() {
        return Row::default();
    }
    Row {
        segments: vec![Segment { text, color: None }],
    }
}
