use std::path::PathBuf;

use clap::Parser;
use cs_core::color::PaletteName;
use cs_core::config::RenderConfig;

/// camscii: live ASCII art from a luminance stream.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source visuelle : chemin vers une image (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Motif animé de test : "gradient", "bars", "rings".
    #[arg(long)]
    pub pattern: Option<String>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Palette : monochrome, warm-sunset, neon-rainbow, emerald-glow.
    #[arg(long)]
    pub palette: Option<String>,

    /// Largeur de la grille en caractères.
    #[arg(short, long)]
    pub width: Option<u16>,

    /// Ajuster la largeur au terminal.
    #[arg(long, default_value_t = false)]
    pub fit: bool,

    /// Rampe de glyphes (littérale ou "compact", "blocks").
    #[arg(long)]
    pub ramp: Option<String>,

    /// Miroir horizontal.
    #[arg(long, default_value_t = false)]
    pub mirror: bool,

    /// Égalisation d'histogramme.
    #[arg(long, default_value_t = false)]
    pub equalize: bool,

    /// Intervalle minimal entre deux conversions (ms).
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Flux ANSI truecolor sur stdout au lieu de la TUI.
    #[arg(long, default_value_t = false)]
    pub ansi: bool,

    /// Arrêter après N frames affichées (mode --ansi).
    #[arg(long)]
    pub frames: Option<u64>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Check that at most one visual source is given.
    ///
    /// No source at all is allowed: the display then shows the
    /// "source unavailable" state.
    ///
    /// # Errors
    /// Returns an error if both `--image` and `--pattern` are given.
    pub fn validate_source(&self) -> anyhow::Result<()> {
        if self.image.is_some() && self.pattern.is_some() {
            anyhow::bail!("Une seule source visuelle à la fois : --image OU --pattern.");
        }
        Ok(())
    }

    /// Applique les overrides CLI par-dessus la config fichier.
    ///
    /// # Errors
    /// Returns an error if `--palette` names an unknown scheme.
    pub fn apply_overrides(&self, config: &mut RenderConfig) -> anyhow::Result<()> {
        if let Some(ref name) = self.palette {
            config.palette = name.parse::<PaletteName>()?;
            config.custom_palette = None;
        }
        if let Some(width) = self.width {
            config.target_width = width;
        }
        if let Some(ref ramp) = self.ramp {
            config.glyph_ramp.clone_from(ramp);
        }
        if let Some(ms) = self.interval_ms {
            config.throttle_interval_ms = ms;
        }
        // Les drapeaux booléens ne font qu'activer
        config.fit_terminal |= self.fit;
        config.mirror |= self.mirror;
        config.equalize |= self.equalize;
        config.clamp_all();
        Ok(())
    }
}
