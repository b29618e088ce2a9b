use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use cs_core::config::RenderConfig;
use cs_core::traits::FramePublisher;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Relit `path`, réapplique `adjust` (overrides CLI) et publie la config.
///
/// En cas d'erreur l'ancienne config reste en place.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn reload_into(
    path: &Path,
    config: &ArcSwap<RenderConfig>,
    adjust: &dyn Fn(&mut RenderConfig),
) -> Result<()> {
    let mut new_config = cs_core::config::load_config(path)?;
    adjust(&mut new_config);
    config.store(Arc::new(new_config));
    Ok(())
}

/// Lance un thread qui surveille le fichier config et met à jour l'ArcSwap.
///
/// Retourne le Watcher (doit rester vivant tant que l'app tourne). Chaque
/// rechargement, réussi ou non, est signalé à `notices`.
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use arc_swap::ArcSwap;
/// use cs_core::config::RenderConfig;
/// use cs_render::DisplaySlot;
/// use cs_app::hotreload::spawn_config_watcher;
/// use std::path::Path;
///
/// let config = Arc::new(ArcSwap::from_pointee(RenderConfig::default()));
/// let slot = Arc::new(DisplaySlot::new());
/// let _watcher = spawn_config_watcher(Path::new("config/default.toml"), &config, slot, |_| {});
/// ```
pub fn spawn_config_watcher<P, F>(
    config_path: &Path,
    config: &Arc<ArcSwap<RenderConfig>>,
    notices: P,
    adjust: F,
) -> Result<RecommendedWatcher>
where
    P: FramePublisher + 'static,
    F: Fn(&mut RenderConfig) + Send + 'static,
{
    let config = Arc::clone(config);
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let Ok(event) = res else { return };
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        match reload_into(&path, &config, &adjust) {
            Ok(()) => {
                log::info!("Config rechargée depuis {}", path.display());
                notices.notify("Config rechargée".to_string());
            }
            Err(e) => {
                log::warn!("Erreur de rechargement config : {e:#}");
                notices.notify(format!("Config ignorée : {e}"));
            }
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use cs_core::color::PaletteName;

    use super::*;

    #[test]
    fn reload_applies_file_then_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\npalette = \"warm-sunset\"\ntarget_width = 40").unwrap();
        let config = ArcSwap::from_pointee(RenderConfig::default());

        reload_into(file.path(), &config, &|c| c.mirror = true).unwrap();

        let loaded = config.load();
        assert_eq!(loaded.palette, PaletteName::WarmSunset);
        assert_eq!(loaded.target_width, 40);
        assert!(loaded.mirror);
    }

    #[test]
    fn broken_file_keeps_previous_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render\ntarget_width = ").unwrap();
        let config = ArcSwap::from_pointee(RenderConfig {
            target_width: 33,
            ..RenderConfig::default()
        });

        assert!(reload_into(file.path(), &config, &|_| {}).is_err());
        assert_eq!(config.load().target_width, 33);
    }
}
