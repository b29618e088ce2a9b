use std::fmt::Write;

use cs_core::frame::RenderedFrame;

/// Reset SGR, émis en fin de ligne colorée.
pub const RESET: &str = "\x1b[0m";
/// Curseur en haut à gauche : chaque frame écrase la précédente.
pub const CURSOR_HOME: &str = "\x1b[H";
/// Efface du curseur jusqu'à la fin de l'écran (reste d'une frame plus haute).
pub const CLEAR_BELOW: &str = "\x1b[J";

/// Sérialise une frame en séquences truecolor (`ESC[38;2;r;g;bm`).
///
/// Un code couleur par segment, jamais par caractère. Une ligne sans couleur
/// est écrite telle quelle, sans reset.
///
/// # Example
/// ```
/// use cs_core::color::Rgb;
/// use cs_core::frame::{RenderedFrame, Row, Segment};
/// use cs_render::ansi::frame_to_ansi;
///
/// let frame = RenderedFrame {
///     rows: vec![Row { segments: vec![Segment { text: "##".into(), color: Some(Rgb::new(1, 2, 3)) }] }],
///     width: 2,
///     height: 1,
/// };
/// assert_eq!(frame_to_ansi(&frame), "\x1b[38;2;1;2;3m##\x1b[0m\n");
/// ```
#[must_use]
pub fn frame_to_ansi(frame: &RenderedFrame) -> String {
    frame_to_ansi_with(frame, "\n")
}

/// Comme [`frame_to_ansi`], avec une fin de ligne choisie.
///
/// En mode raw le terminal ne fait plus le retour chariot : il faut `"\r\n"`.
#[must_use]
pub fn frame_to_ansi_with(frame: &RenderedFrame, eol: &str) -> String {
    let mut out = String::with_capacity(
        (usize::from(frame.width) + eol.len()) * usize::from(frame.height)
            + frame.segment_count() * 20,
    );
    for row in &frame.rows {
        let mut colored = false;
        for segment in &row.segments {
            if let Some(c) = segment.color {
                // write! sur String ne peut pas échouer
                let _ = write!(out, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b);
                colored = true;
            }
            out.push_str(&segment.text);
        }
        if colored {
            out.push_str(RESET);
        }
        out.push_str(eol);
    }
    out
}

/// En-tête affiché au-dessus du flux ANSI, sans fin de ligne.
#[must_use]
pub fn header_line(palette_label: &str, width: u16, height: u16) -> String {
    format!("camscii · {palette_label} · {width}×{height} · q pour quitter")
}

#[cfg(test)]
mod tests {
    use cs_core::color::Rgb;
    use cs_core::frame::{Row, Segment};

    use super::*;

    #[test]
    fn monochrome_rows_have_no_escape_codes() {
        let frame = RenderedFrame {
            rows: vec![
                Row {
                    segments: vec![Segment {
                        text: " .+#".into(),
                        color: None,
                    }],
                },
                Row {
                    segments: vec![Segment {
                        text: "#+. ".into(),
                        color: None,
                    }],
                },
            ],
            width: 4,
            height: 2,
        };
        assert_eq!(frame_to_ansi(&frame), " .+#\n#+. \n");
    }

    #[test]
    fn one_escape_per_segment() {
        let frame = RenderedFrame {
            rows: vec![Row {
                segments: vec![
                    Segment {
                        text: "aa".into(),
                        color: Some(Rgb::new(255, 0, 0)),
                    },
                    Segment {
                        text: "b".into(),
                        color: Some(Rgb::new(0, 255, 0)),
                    },
                ],
            }],
            width: 3,
            height: 1,
        };
        let out = frame_to_ansi(&frame);
        assert_eq!(out.matches("\x1b[38;2;").count(), 2);
        assert_eq!(out, "\x1b[38;2;255;0;0maa\x1b[38;2;0;255;0mb\x1b[0m\n");
    }

    #[test]
    fn raw_mode_rows_end_with_crlf() {
        let frame = RenderedFrame {
            rows: vec![
                Row {
                    segments: vec![Segment {
                        text: "ab".into(),
                        color: Some(Rgb::new(9, 9, 9)),
                    }],
                },
                Row {
                    segments: vec![Segment {
                        text: "cd".into(),
                        color: None,
                    }],
                },
            ],
            width: 2,
            height: 2,
        };
        assert_eq!(
            frame_to_ansi_with(&frame, "\r\n"),
            "\x1b[38;2;9;9;9mab\x1b[0m\r\ncd\r\n"
        );
    }

    #[test]
    fn header_mentions_palette() {
        let header = header_line("Neon Rainbow", 80, 40);
        assert!(header.contains("Neon Rainbow"));
        assert!(!header.ends_with('\n'));
    }
}
