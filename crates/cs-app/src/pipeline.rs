use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use cs_ascii::mailbox::{MailboxReceiver, MailboxSender, frame_mailbox};
use cs_ascii::pipeline::FramePipeline;
use cs_core::config::RenderConfig;
use cs_core::traits::{FramePublisher, FrameSource};

use crate::cli::Cli;

/// Résolution des motifs procéduraux.
const PATTERN_SIZE: (u32, u32) = (640, 360);
/// Cadence de capture (~30 fps), indépendante du throttle de conversion.
const CAPTURE_INTERVAL: Duration = Duration::from_millis(33);
/// Attente du thread de conversion quand la boîte aux lettres est vide.
const IDLE_WAIT: Duration = Duration::from_millis(2);

/// Événements remontés par le thread de capture vers l'UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// The source stopped producing frames.
    Lost(String),
}

/// Largeur effective : `max(20, cols - 1)` si `fit_terminal`, sinon celle
/// de la config.
#[must_use]
pub fn effective_config(base: &RenderConfig, columns: u16) -> RenderConfig {
    let mut config = base.clone();
    if config.fit_terminal && columns > 0 {
        config.target_width = columns.saturating_sub(1).max(20);
        config.clamp_all();
    }
    config
}

/// Ouvre la source demandée en ligne de commande.
///
/// `Ok(None)` : aucune source fournie.
///
/// # Errors
/// Returns an error if the image cannot be decoded or the pattern is unknown.
pub fn open_source(cli: &Cli) -> anyhow::Result<Option<Box<dyn FrameSource>>> {
    if let Some(ref path) = cli.image {
        let source = cs_source::image::ImageSource::new(path)?;
        return Ok(Some(Box::new(source)));
    }
    if let Some(ref name) = cli.pattern {
        log::info!("Démarrage du motif procédural : {name}");
        let source = cs_source::pattern::create_pattern_source(name, PATTERN_SIZE.0, PATTERN_SIZE.1)?;
        return Ok(Some(Box::new(source)));
    }
    Ok(None)
}

/// Threads de capture et de conversion reliés par la boîte aux lettres.
pub struct Workers {
    running: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl Workers {
    /// Start both threads.
    ///
    /// The capture thread tags each frame with the current mirror flag and
    /// overwrites the mailbox; the conversion thread offers the freshest
    /// frame to `pipeline` and reconfigures it whenever the config or the
    /// terminal width changes.
    ///
    /// # Errors
    /// Returns an error if a thread cannot be spawned. A capture thread
    /// already running is stopped and joined first.
    pub fn spawn<P: FramePublisher + 'static>(
        source: Box<dyn FrameSource>,
        pipeline: Arc<FramePipeline<P>>,
        config: Arc<ArcSwap<RenderConfig>>,
        columns: Arc<AtomicU16>,
        events: flume::Sender<SourceEvent>,
    ) -> anyhow::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let (tx, rx) = frame_mailbox();

        let capture = {
            let running = Arc::clone(&running);
            let config = Arc::clone(&config);
            std::thread::Builder::new()
                .name("capture".into())
                .spawn(move || capture_loop(source, tx, &config, &running, &events))?
        };
        let handles = spawn_or_stop(&running, capture, || {
            let running = Arc::clone(&running);
            std::thread::Builder::new()
                .name("conversion".into())
                .spawn(move || conversion_loop(rx, &pipeline, &config, &columns, &running))
        })?;

        Ok(Self { running, handles })
    }

    /// Signal both threads to stop and wait for them.
    pub fn shutdown(self) {
        self.running.store(false, Ordering::Relaxed);
        for handle in self.handles {
            if handle.join().is_err() {
                log::error!("Un thread du pipeline a paniqué");
            }
        }
    }
}

/// Lance le second thread ; en cas d'échec, arrête et joint `first`.
fn spawn_or_stop(
    running: &AtomicBool,
    first: JoinHandle<()>,
    spawn_second: impl FnOnce() -> std::io::Result<JoinHandle<()>>,
) -> anyhow::Result<Vec<JoinHandle<()>>> {
    match spawn_second() {
        Ok(second) => Ok(vec![first, second]),
        Err(e) => {
            running.store(false, Ordering::Relaxed);
            if first.join().is_err() {
                log::error!("Le thread de capture a paniqué");
            }
            Err(anyhow::Error::new(e).context("Impossible de lancer le thread de conversion"))
        }
    }
}

fn capture_loop(
    mut source: Box<dyn FrameSource>,
    mut tx: MailboxSender,
    config: &ArcSwap<RenderConfig>,
    running: &AtomicBool,
    events: &flume::Sender<SourceEvent>,
) {
    let (w, h) = source.native_size();
    log::info!("Capture démarrée ({w}×{h}, live = {})", source.is_live());
    while running.load(Ordering::Relaxed) {
        let start = Instant::now();
        let Some(frame) = source.next_frame() else {
            let _ = events.send(SourceEvent::Lost("La source ne produit plus de frames".into()));
            log::warn!("Source épuisée, arrêt de la capture");
            return;
        };
        tx.send(frame.with_mirror(config.load().mirror));
        std::thread::sleep(CAPTURE_INTERVAL.saturating_sub(start.elapsed()));
    }
    log::info!("Capture arrêtée");
}

fn conversion_loop<P: FramePublisher>(
    mut rx: MailboxReceiver,
    pipeline: &FramePipeline<P>,
    config: &ArcSwap<RenderConfig>,
    columns: &AtomicU16,
    running: &AtomicBool,
) {
    let mut applied = config.load_full();
    let mut applied_columns = columns.load(Ordering::Relaxed);
    pipeline.reconfigure(&effective_config(&applied, applied_columns));

    while running.load(Ordering::Relaxed) {
        let current = config.load_full();
        let cols = columns.load(Ordering::Relaxed);
        if !Arc::ptr_eq(&current, &applied) || cols != applied_columns {
            pipeline.reconfigure(&effective_config(&current, cols));
            applied = current;
            applied_columns = cols;
        }

        match rx.take_latest() {
            Some(frame) => {
                pipeline.submit(&frame, Instant::now());
            }
            None => std::thread::sleep(IDLE_WAIT),
        }
    }
}
