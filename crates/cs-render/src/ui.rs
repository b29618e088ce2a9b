use cs_core::frame::RenderedFrame;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::canvas;

/// Everything the status line displays, gathered by the app each redraw.
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    /// Nom affiché de la palette (ou "Custom").
    pub palette: String,
    /// Grid of the frame on screen, if any.
    pub grid: Option<(u16, u16)>,
    /// Frames converties par seconde.
    pub render_fps: f64,
    /// Conversions published so far.
    pub accepted: u64,
    /// Frames dropped at the throttle.
    pub dropped: u64,
    /// Conversions aborted on a malformed frame.
    pub failed: u64,
    /// Miroir horizontal actif.
    pub mirror: bool,
    /// Histogram equalization active.
    pub equalize: bool,
    /// Notice transitoire (erreur de frame, rechargement de config…).
    pub notice: Option<String>,
}

/// Texte de la barre d'état, hors notice.
#[must_use]
pub fn status_text(info: &StatusInfo) -> String {
    let grid = info
        .grid
        .map_or_else(|| "-".to_string(), |(w, h)| format!("{w}×{h}"));
    let flag = |on: bool| if on { "ON" } else { "OFF" };
    let mut text = format!(
        " {} | {grid} | {:.0} fps | ok {} drop {}",
        info.palette, info.render_fps, info.accepted, info.dropped
    );
    if info.failed > 0 {
        text.push_str(&format!(" err {}", info.failed));
    }
    text.push_str(&format!(
        " | mirror {} | eq {} | p m e q",
        flag(info.mirror),
        flag(info.equalize)
    ));
    text
}

/// Draw one TUI frame: ASCII canvas on top, one status line below.
///
/// `unavailable` prend le pas sur la frame : la source est perdue, on
/// affiche un message fixe plutôt qu'une image figée.
pub fn draw(
    frame: &mut Frame,
    rendered: Option<&RenderedFrame>,
    unavailable: Option<&str>,
    info: &StatusInfo,
) {
    let [canvas_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    match (unavailable, rendered) {
        (Some(reason), _) => draw_message(
            frame,
            canvas_area,
            " Source indisponible ",
            &format!("{reason}\n\nVérifiez la caméra ou le fichier d'entrée, puis relancez."),
            Color::Red,
        ),
        (None, Some(rendered)) => canvas::render_frame(frame.buffer_mut(), canvas_area, rendered),
        (None, None) => draw_message(
            frame,
            canvas_area,
            " camscii ",
            "En attente de la première frame…",
            Color::DarkGray,
        ),
    }

    draw_status(frame, status_area, info);
}

fn draw_status(frame: &mut Frame, area: Rect, info: &StatusInfo) {
    let mut spans = vec![Span::styled(
        status_text(info),
        Style::default().fg(Color::Black).bg(Color::Gray),
    )];
    if let Some(notice) = &info.notice {
        spans.push(Span::styled(
            format!(" {notice} "),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_message(frame: &mut Frame, area: Rect, title: &str, body: &str, color: Color) {
    let width = area.width.min(60);
    let height = area.height.min(7);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let boxed = Rect::new(x, y, width, height);

    let message = Paragraph::new(body.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .style(Style::default().fg(color)),
        );
    frame.render_widget(message, boxed);
}
