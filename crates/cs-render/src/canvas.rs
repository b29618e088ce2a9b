use cs_core::color::Rgb;
use cs_core::frame::RenderedFrame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

/// Écrit directement une `RenderedFrame` dans un `ratatui::Buffer`.
///
/// Pas de widget Paragraph : un segment = une couleur posée sur ses cellules.
/// Tout ce qui dépasse `area` est coupé. Les segments sans couleur gardent le
/// style par défaut du terminal.
///
/// # Example
/// ```
/// use cs_core::frame::{RenderedFrame, Row, Segment};
/// use cs_render::canvas::render_frame;
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
///
/// let frame = RenderedFrame {
///     rows: vec![Row { segments: vec![Segment { text: "ab".into(), color: None }] }],
///     width: 2,
///     height: 1,
/// };
/// let area = Rect::new(0, 0, 4, 1);
/// let mut buf = Buffer::empty(area);
/// render_frame(&mut buf, area, &frame);
/// assert_eq!(buf[(1, 0)].symbol(), "b");
/// ```
pub fn render_frame(buf: &mut Buffer, area: Rect, frame: &RenderedFrame) {
    for (cy, row) in frame.rows.iter().enumerate().take(usize::from(area.height)) {
        let buf_y = area.y + cy as u16;
        let mut cx: u16 = 0;
        'row: for segment in &row.segments {
            let fg = segment.color.map(to_color);
            for ch in segment.text.chars() {
                if cx >= area.width {
                    break 'row;
                }
                if let Some(cell) = buf.cell_mut((area.x + cx, buf_y)) {
                    cell.set_char(ch);
                    if let Some(fg) = fg {
                        cell.set_fg(fg);
                    }
                }
                cx += 1;
            }
        }
    }
}

/// Conversion couleur core → ratatui.
#[must_use]
pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

#[cfg(test)]
mod tests {
    use cs_core::frame::{Row, Segment};

    use super::*;

    fn frame() -> RenderedFrame {
        RenderedFrame {
            rows: vec![
                Row {
                    segments: vec![
                        Segment {
                            text: "##".into(),
                            color: Some(Rgb::new(255, 0, 0)),
                        },
                        Segment {
                            text: "..".into(),
                            color: Some(Rgb::new(0, 0, 255)),
                        },
                    ],
                },
                Row {
                    segments: vec![Segment {
                        text: "abcd".into(),
                        color: None,
                    }],
                },
            ],
            width: 4,
            height: 2,
        }
    }

    #[test]
    fn colors_follow_segments() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        render_frame(&mut buf, area, &frame());
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(2, 0)].symbol(), ".");
        assert_eq!(buf[(3, 0)].fg, Color::Rgb(0, 0, 255));
        assert_eq!(buf[(0, 1)].fg, Color::Reset);
    }

    #[test]
    fn clips_to_area() {
        let area = Rect::new(1, 0, 3, 1);
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 2));
        render_frame(&mut buf, area, &frame());
        assert_eq!(buf[(1, 0)].symbol(), "#");
        assert_eq!(buf[(3, 0)].symbol(), ".");
        assert_eq!(buf[(4, 0)].symbol(), " ");
        assert_eq!(buf[(1, 1)].symbol(), " ");
    }
}
