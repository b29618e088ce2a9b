use std::collections::VecDeque;
use std::time::Instant;

/// Compteur FPS par fenêtre glissante. Zéro allocation après init.
///
/// Sert deux fois dans l'UI : cadence de redessin et cadence des frames
/// converties (un tick par nouvelle frame publiée).
///
/// # Example
/// ```
/// use cs_render::fps::FpsCounter;
/// let mut counter = FpsCounter::new(30);
/// counter.tick();
/// assert!(counter.fps() >= 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct FpsCounter {
    timestamps: VecDeque<Instant>,
    window: usize,
    fps: f64,
}

impl FpsCounter {
    /// New counter averaging over the last `window` ticks (at least 2).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            timestamps: VecDeque::with_capacity(window + 1),
            window,
            fps: 0.0,
        }
    }

    /// Appeler une fois par événement compté.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Same as [`tick`](Self::tick) with an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) {
        self.timestamps.push_back(now);
        if self.timestamps.len() > self.window {
            self.timestamps.pop_front();
        }
        if let Some(&first) = self.timestamps.front() {
            let secs = now.saturating_duration_since(first).as_secs_f64();
            if secs > 0.0 {
                self.fps = (self.timestamps.len() - 1) as f64 / secs;
            }
        }
    }

    /// FPS moyen sur la fenêtre.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}
