use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use cs_core::config::RenderConfig;
use cs_core::frame::RenderedFrame;
use cs_render::DisplaySlot;
use cs_render::ansi;

use crate::pipeline::SourceEvent;

/// Ce que le flux lit du terminal entre deux frames.
pub trait StreamInput {
    /// Largeur courante du terminal, si elle est connue.
    fn columns(&mut self) -> Option<u16>;

    /// `true` si une touche de sortie a été pressée depuis le dernier appel.
    fn quit_requested(&mut self) -> bool;
}

/// Terminal réel via crossterm. Les touches ne sont lues qu'en mode raw.
struct TerminalInput {
    raw: bool,
}

impl StreamInput for TerminalInput {
    fn columns(&mut self) -> Option<u16> {
        terminal::size().ok().map(|(cols, _)| cols)
    }

    fn quit_requested(&mut self) -> bool {
        if !self.raw {
            return false;
        }
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => return false,
                Err(e) => {
                    log::debug!("Lecture clavier impossible : {e}");
                    return false;
                }
            }
            match event::read() {
                Ok(Event::Key(key))
                    if key.kind == KeyEventKind::Press && is_quit_key(key.code, key.modifiers) =>
                {
                    return true;
                }
                Ok(_) => {}
                Err(e) => {
                    log::debug!("Lecture clavier impossible : {e}");
                    return false;
                }
            }
        }
    }
}

/// q, Q, Esc ou Ctrl-C (en mode raw, Ctrl-C arrive comme une touche).
#[must_use]
pub fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Mode `--ansi` : écrit chaque nouvelle frame sur stdout en truecolor.
///
/// Curseur masqué et terminal en mode raw pendant le flux, restaurés à la
/// sortie. Si le mode raw est refusé (stdout redirigé...), seul Ctrl-C
/// arrête le flux.
///
/// # Errors
/// Returns an error if stdout cannot be written or the Ctrl-C handler cannot
/// be installed.
pub fn run_ansi(
    config: &ArcSwap<RenderConfig>,
    slot: &DisplaySlot,
    columns: &AtomicU16,
    events: &flume::Receiver<SourceEvent>,
    max_frames: Option<u64>,
) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::Relaxed))
            .context("Impossible d'installer le handler Ctrl-C")?;
    }

    let raw = match terminal::enable_raw_mode() {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Mode raw indisponible, touches désactivées : {e}");
            false
        }
    };
    let stream = AnsiStream {
        config,
        slot,
        columns,
        events,
        eol: if raw { "\r\n" } else { "\n" },
        max_frames,
    };

    let mut stdout = std::io::stdout().lock();
    let mut input = TerminalInput { raw };
    let result = execute!(stdout, cursor::Hide, terminal::Clear(terminal::ClearType::All))
        .map_err(anyhow::Error::from)
        .and_then(|()| stream.run(&mut stdout, &mut input, &running));

    // Toujours restaurer le terminal, même après une erreur d'écriture
    let restored = write!(stdout, "{}", ansi::RESET)
        .and_then(|()| execute!(stdout, cursor::Show))
        .and_then(|()| stdout.flush());
    if raw && let Err(e) = terminal::disable_raw_mode() {
        log::warn!("Impossible de quitter le mode raw : {e}");
    }
    result?;
    restored?;
    Ok(())
}

/// Une session de flux : où lire les frames, où publier la largeur.
struct AnsiStream<'a> {
    config: &'a ArcSwap<RenderConfig>,
    slot: &'a DisplaySlot,
    columns: &'a AtomicU16,
    events: &'a flume::Receiver<SourceEvent>,
    eol: &'static str,
    max_frames: Option<u64>,
}

impl AnsiStream<'_> {
    fn run(
        &self,
        out: &mut impl Write,
        input: &mut impl StreamInput,
        running: &AtomicBool,
    ) -> Result<u64> {
        let eol = self.eol;
        let mut shown: Option<Arc<RenderedFrame>> = None;
        let mut written = 0u64;

        while running.load(Ordering::Relaxed) && self.max_frames.is_none_or(|max| written < max) {
            if input.quit_requested() {
                log::info!("Sortie demandée au clavier");
                break;
            }
            // Lue à chaque tour : un redimensionnement vaut pour la capture suivante
            if let Some(cols) = input.columns() {
                self.columns.store(cols, Ordering::Relaxed);
            }
            if let Ok(SourceEvent::Lost(reason)) = self.events.try_recv() {
                write!(out, "{}{eol}Source indisponible : {reason}{eol}", ansi::RESET)?;
                break;
            }
            let Some(frame) = self.slot.current() else {
                std::thread::sleep(Duration::from_millis(5));
                continue;
            };
            if shown.as_ref().is_some_and(|s| Arc::ptr_eq(s, &frame)) {
                std::thread::sleep(Duration::from_millis(5));
                continue;
            }

            let header =
                ansi::header_line(self.config.load().palette_label(), frame.width, frame.height);
            write!(
                out,
                "{}{header}{eol}{}{}{}",
                ansi::CURSOR_HOME,
                ansi::frame_to_ansi_with(&frame, eol),
                ansi::RESET,
                ansi::CLEAR_BELOW
            )?;
            out.flush()?;
            written += 1;
            shown = Some(frame);
        }
        log::info!("Flux ANSI terminé après {written} frames");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use cs_core::frame::{Row, Segment};
    use cs_core::traits::FramePublisher;

    use super::*;

    struct FakeInput {
        cols: Option<u16>,
        quit: bool,
    }

    impl StreamInput for FakeInput {
        fn columns(&mut self) -> Option<u16> {
            self.cols
        }

        fn quit_requested(&mut self) -> bool {
            self.quit
        }
    }

    fn idle() -> FakeInput {
        FakeInput {
            cols: None,
            quit: false,
        }
    }

    fn rows(texts: &[&str]) -> Arc<RenderedFrame> {
        Arc::new(RenderedFrame {
            rows: texts
                .iter()
                .map(|t| Row {
                    segments: vec![Segment {
                        text: (*t).into(),
                        color: None,
                    }],
                })
                .collect(),
            width: 2,
            height: texts.len() as u16,
        })
    }

    fn stream<'a>(
        config: &'a ArcSwap<RenderConfig>,
        slot: &'a DisplaySlot,
        columns: &'a AtomicU16,
        events: &'a flume::Receiver<SourceEvent>,
        max_frames: Option<u64>,
    ) -> AnsiStream<'a> {
        AnsiStream {
            config,
            slot,
            columns,
            events,
            eol: "\n",
            max_frames,
        }
    }

    #[test]
    fn writes_requested_number_of_frames() {
        let config = ArcSwap::from_pointee(RenderConfig::default());
        let slot = DisplaySlot::new();
        slot.publish(rows(&["ab"]));
        let (_tx, rx) = flume::unbounded();
        let columns = AtomicU16::new(0);
        let running = AtomicBool::new(true);

        let mut out = Vec::new();
        let written = stream(&config, &slot, &columns, &rx, Some(1))
            .run(&mut out, &mut idle(), &running)
            .unwrap();

        assert_eq!(written, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(ansi::CURSOR_HOME));
        assert!(text.contains("Monochrome"));
        assert!(text.contains("ab\n"));
        assert!(text.ends_with(ansi::CLEAR_BELOW));
    }

    #[test]
    fn shorter_frame_erases_leftover_rows() {
        let config = ArcSwap::from_pointee(RenderConfig::default());
        let slot = DisplaySlot::new();
        let (_tx, rx) = flume::unbounded();
        let columns = AtomicU16::new(0);
        let running = AtomicBool::new(true);
        let session = stream(&config, &slot, &columns, &rx, Some(1));

        slot.publish(rows(&["aa", "bb", "cc", "dd", "ee"]));
        let mut tall = Vec::new();
        session.run(&mut tall, &mut idle(), &running).unwrap();
        slot.publish(rows(&["xx", "yy"]));
        let mut short = Vec::new();
        session.run(&mut short, &mut idle(), &running).unwrap();

        // L'effacement suit immédiatement la dernière ligne de chaque frame
        let tall = String::from_utf8(tall).unwrap();
        assert!(tall.ends_with(&format!("ee\n{}{}", ansi::RESET, ansi::CLEAR_BELOW)));
        let short = String::from_utf8(short).unwrap();
        assert!(short.ends_with(&format!("yy\n{}{}", ansi::RESET, ansi::CLEAR_BELOW)));
        assert!(!short.contains("cc"));
    }

    #[test]
    fn quit_key_stops_before_writing() {
        let config = ArcSwap::from_pointee(RenderConfig::default());
        let slot = DisplaySlot::new();
        slot.publish(rows(&["ab"]));
        let (_tx, rx) = flume::unbounded();
        let columns = AtomicU16::new(0);
        let running = AtomicBool::new(true);
        let mut input = FakeInput {
            cols: None,
            quit: true,
        };

        let mut out = Vec::new();
        let written = stream(&config, &slot, &columns, &rx, None)
            .run(&mut out, &mut input, &running)
            .unwrap();
        assert_eq!(written, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn terminal_width_is_followed_while_streaming() {
        let config = ArcSwap::from_pointee(RenderConfig::default());
        let slot = DisplaySlot::new();
        slot.publish(rows(&["ab"]));
        let (_tx, rx) = flume::unbounded();
        let columns = AtomicU16::new(80);
        let running = AtomicBool::new(true);
        let mut input = FakeInput {
            cols: Some(57),
            quit: false,
        };

        stream(&config, &slot, &columns, &rx, Some(1))
            .run(&mut Vec::new(), &mut input, &running)
            .unwrap();
        assert_eq!(columns.load(Ordering::Relaxed), 57);
    }

    #[test]
    fn quit_keys() {
        assert!(is_quit_key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(is_quit_key(KeyCode::Char('Q'), KeyModifiers::SHIFT));
        assert!(is_quit_key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(is_quit_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!is_quit_key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!is_quit_key(KeyCode::Char('p'), KeyModifiers::NONE));
    }

    #[test]
    fn stops_on_lost_source() {
        let config = ArcSwap::from_pointee(RenderConfig::default());
        let slot = DisplaySlot::new();
        let (tx, rx) = flume::unbounded();
        tx.send(SourceEvent::Lost("fin".into())).unwrap();
        let columns = AtomicU16::new(0);
        let running = AtomicBool::new(true);

        let mut out = Vec::new();
        let written = stream(&config, &slot, &columns, &rx, None)
            .run(&mut out, &mut idle(), &running)
            .unwrap();
        assert_eq!(written, 0);
        assert!(String::from_utf8(out).unwrap().contains("fin"));
    }
}
