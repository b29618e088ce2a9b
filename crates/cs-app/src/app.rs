use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{Duration, Instant};

use anyhow::Result;
use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use cs_ascii::pipeline::RenderStats;
use cs_core::config::RenderConfig;
use cs_core::frame::RenderedFrame;
use cs_core::traits::FramePublisher;
use cs_render::DisplaySlot;
use cs_render::fps::FpsCounter;
use cs_render::ui::{self, StatusInfo};
use ratatui::DefaultTerminal;

use crate::pipeline::SourceEvent;

/// Application state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    /// Normal running state.
    Running,
    /// Sortie demandée.
    Quitting,
}

/// Boucle TUI : lit la frame courante, dessine, traite le clavier.
pub struct App {
    /// Current application state.
    pub state: AppState,
    config: Arc<ArcSwap<RenderConfig>>,
    slot: Arc<DisplaySlot>,
    stats: Arc<RenderStats>,
    columns: Arc<AtomicU16>,
    events: flume::Receiver<SourceEvent>,
    render_fps: FpsCounter,
    last_shown: Option<Arc<RenderedFrame>>,
}

impl App {
    /// Create a new App instance.
    #[must_use]
    pub fn new(
        config: Arc<ArcSwap<RenderConfig>>,
        slot: Arc<DisplaySlot>,
        stats: Arc<RenderStats>,
        columns: Arc<AtomicU16>,
        events: flume::Receiver<SourceEvent>,
    ) -> Self {
        Self {
            state: AppState::Running,
            config,
            slot,
            stats,
            columns,
            events,
            render_fps: FpsCounter::new(30),
            last_shown: None,
        }
    }

    /// Main event loop.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut last_frame = Instant::now();

        while self.state != AppState::Quitting {
            let frame_duration =
                Duration::from_secs_f64(1.0 / f64::from(self.config.load().target_fps.max(1)));

            let elapsed = last_frame.elapsed();
            if elapsed < frame_duration {
                // Dormir le temps restant, mais rester réactif aux événements
                if event::poll(frame_duration.saturating_sub(elapsed))? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            let size = terminal.size()?;
            self.columns.store(size.width, Ordering::Relaxed);

            while let Ok(SourceEvent::Lost(reason)) = self.events.try_recv() {
                self.slot.mark_unavailable(reason);
            }

            let current = self.slot.current();
            if let Some(ref frame) = current
                && !self
                    .last_shown
                    .as_ref()
                    .is_some_and(|shown| Arc::ptr_eq(shown, frame))
            {
                self.render_fps.tick();
                self.last_shown = Some(Arc::clone(frame));
            }

            let info = self.status_info(current.as_deref(), last_frame);
            let unavailable = self.slot.unavailable();
            terminal.draw(|f| {
                ui::draw(f, current.as_deref(), unavailable.as_deref().map(String::as_str), &info);
            })?;
        }
        Ok(())
    }

    fn status_info(&self, frame: Option<&RenderedFrame>, now: Instant) -> StatusInfo {
        let config = self.config.load();
        let stats = self.stats.snapshot();
        StatusInfo {
            palette: config.palette_label().to_string(),
            grid: frame.map(|f| (f.width, f.height)),
            render_fps: self.render_fps.fps(),
            accepted: stats.accepted,
            dropped: stats.throttled,
            failed: stats.failed,
            mirror: config.mirror,
            equalize: config.equalize,
            notice: self.slot.notice(now),
        }
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        {
            self.handle_key(*code, *modifiers);
        }
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.state = AppState::Quitting,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.state = AppState::Quitting;
            }
            KeyCode::Char('p') => {
                let label = self.toggle_config(|c| {
                    // Une palette custom sort du cycle dès la première pression
                    if c.custom_palette.take().is_none() {
                        c.palette = c.palette.next();
                    }
                });
                self.slot.notify(format!("Palette : {label}"));
            }
            KeyCode::Char('m') => {
                self.toggle_config(|c| c.mirror = !c.mirror);
            }
            KeyCode::Char('e') => {
                self.toggle_config(|c| c.equalize = !c.equalize);
            }
            _ => {}
        }
    }

    /// Mute une copie de la config et la publie ; retourne le label de palette.
    fn toggle_config(&self, mutate: impl FnOnce(&mut RenderConfig)) -> &'static str {
        let config = self.config.load();
        let mut new = (**config).clone();
        mutate(&mut new);
        let label = new.palette_label();
        self.config.store(Arc::new(new));
        label
    }
}
