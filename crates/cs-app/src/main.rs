use std::sync::Arc;
use std::sync::atomic::AtomicU16;

use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;
use cs_ascii::pipeline::FramePipeline;
use cs_core::config::RenderConfig;
use cs_render::DisplaySlot;

pub mod app;
pub mod cli;
pub mod hotreload;
pub mod pipeline;
pub mod stream;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider la source
    cli.validate_source()?;

    // 4. Charger la config, puis les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config)?;
    log::info!(
        "Config : {} colonnes, palette {}, intervalle {} ms",
        config.target_width,
        config.palette_label(),
        config.throttle_interval_ms
    );
    let config = Arc::new(ArcSwap::from_pointee(config));

    // 5. Affichage et pipeline de conversion
    let slot = Arc::new(DisplaySlot::new());
    let pipeline = Arc::new(FramePipeline::new(&config.load(), Arc::clone(&slot)));
    let stats = pipeline.stats();
    let columns = Arc::new(AtomicU16::new(0));
    let (events_tx, events_rx) = flume::unbounded();

    // 6. Hot-reload config (thread interne notify)
    let _watcher = if cli.config.exists() {
        let overrides = cli.clone();
        match hotreload::spawn_config_watcher(
            &cli.config,
            &config,
            Arc::clone(&slot),
            move |c: &mut RenderConfig| {
                if let Err(e) = overrides.apply_overrides(c) {
                    log::warn!("Overrides CLI ignorés : {e}");
                }
            },
        ) {
            Ok(w) => Some(w),
            Err(e) => {
                log::warn!("Hot-reload indisponible : {e}");
                None
            }
        }
    } else {
        None
    };

    // 7. Ouvrir la source et démarrer capture + conversion
    let workers = match pipeline::open_source(&cli) {
        Ok(Some(source)) => Some(pipeline::Workers::spawn(
            source,
            Arc::clone(&pipeline),
            Arc::clone(&config),
            Arc::clone(&columns),
            events_tx,
        )?),
        Ok(None) => {
            slot.mark_unavailable("Aucune source : utilisez --image <fichier> ou --pattern <motif>.");
            None
        }
        Err(e) => {
            slot.mark_unavailable(format!("{e:#}"));
            None
        }
    };

    // 8. Boucle principale
    let result = if cli.ansi {
        match slot.unavailable() {
            Some(reason) => Err(anyhow::anyhow!("{reason}")),
            None => stream::run_ansi(&config, &slot, &columns, &events_rx, cli.frames),
        }
    } else {
        let terminal = ratatui::init();
        let result =
            app::App::new(Arc::clone(&config), Arc::clone(&slot), stats, columns, events_rx)
                .run(terminal);
        // Restaurer le terminal (TOUJOURS, même en cas d'erreur)
        ratatui::restore();
        result
    };

    if let Some(workers) = workers {
        workers.shutdown();
    }
    result
}

/// Config fichier si présente, sinon les défauts.
fn resolve_config(cli: &cli::Cli) -> Result<RenderConfig> {
    if cli.config.exists() {
        cs_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(RenderConfig::default())
    }
}
