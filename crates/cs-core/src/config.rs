use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{self, GlyphRamp};
use crate::color::{ColorRamp, PaletteName, Rgb};

/// Configuration complète du rendu, hot-rechargeable.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use cs_core::config::RenderConfig;
/// let config = RenderConfig::default();
/// assert_eq!(config.target_width, 80);
/// assert_eq!(config.throttle_interval_ms, 90);
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    // === Grille ===
    /// Nombre de colonnes de caractères.
    pub target_width: u16,
    /// Correction de hauteur des cellules (glyphes ~2× plus hauts que larges).
    pub char_aspect: f32,
    /// Derive `target_width` from the terminal (`max(20, cols - 1)`).
    pub fit_terminal: bool,

    // === Conversion ===
    /// Glyphes du plus sombre au plus clair, ou nom de preset.
    pub glyph_ramp: String,
    /// Égalisation d'histogramme avant quantification.
    pub equalize: bool,
    /// Miroir horizontal (caméra frontale).
    pub mirror: bool,

    // === Couleur ===
    /// Schéma de couleur nommé.
    pub palette: PaletteName,
    /// Palette explicite ; remplace `palette` si non vide.
    pub custom_palette: Option<Vec<Rgb>>,

    // === Cadence ===
    /// Espacement minimal entre deux conversions, en millisecondes.
    pub throttle_interval_ms: u64,
    /// FPS cible du rafraîchissement de l'affichage.
    pub target_fps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            target_width: 80,
            char_aspect: 0.5,
            fit_terminal: false,
            glyph_ramp: charset::CHARSET_DEFAULT.to_string(),
            equalize: false,
            mirror: false,
            palette: PaletteName::Monochrome,
            custom_palette: None,
            throttle_interval_ms: 90,
            target_fps: 30,
        }
    }
}

impl RenderConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.target_width = self.target_width.clamp(1, 1000);
        self.char_aspect = if self.char_aspect.is_finite() {
            self.char_aspect.clamp(0.05, 4.0)
        } else {
            0.5
        };
        self.throttle_interval_ms = self.throttle_interval_ms.min(10_000);
        self.target_fps = self.target_fps.clamp(1, 120);
        if self.glyph_ramp.is_empty() {
            log::warn!("glyph_ramp vide, retour à la rampe par défaut");
            self.glyph_ramp = charset::CHARSET_DEFAULT.to_string();
        }
        if self.custom_palette.as_ref().is_some_and(Vec::is_empty) {
            self.custom_palette = None;
        }
    }

    /// Glyph ramp after preset resolution. Falls back to the default ramp.
    #[must_use]
    pub fn glyph_ramp(&self) -> GlyphRamp {
        GlyphRamp::new(charset::resolve_charset(&self.glyph_ramp)).unwrap_or_default()
    }

    /// Active color ramp: the custom palette if set, else the named scheme.
    #[must_use]
    pub fn color_ramp(&self) -> ColorRamp {
        match &self.custom_palette {
            Some(colors) => ColorRamp::palette(colors.clone()).unwrap_or_else(|_| self.palette.ramp()),
            None => self.palette.ramp(),
        }
    }

    /// Label of the active scheme for display.
    #[must_use]
    pub fn palette_label(&self) -> &'static str {
        if self.custom_palette.is_some() {
            "Custom"
        } else {
            self.palette.label()
        }
    }

    /// Throttle interval as a `Duration`.
    #[must_use]
    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_interval_ms)
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    target_width: Option<u16>,
    char_aspect: Option<f32>,
    fit_terminal: Option<bool>,
    glyph_ramp: Option<String>,
    equalize: Option<bool>,
    mirror: Option<bool>,
    palette: Option<PaletteName>,
    custom_palette: Option<Vec<Rgb>>,
    throttle_interval_ms: Option<u64>,
    target_fps: Option<u32>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema.
///
/// # Example
/// ```
/// use cs_core::config::parse_config;
/// let config = parse_config("[render]\ntarget_width = 120\n").unwrap();
/// assert_eq!(config.target_width, 120);
/// assert_eq!(config.throttle_interval_ms, 90);
/// ```
pub fn parse_config(content: &str) -> Result<RenderConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = RenderConfig::default();

    if let Some(r) = file.render {
        if let Some(v) = r.target_width {
            config.target_width = v;
        }
        if let Some(v) = r.char_aspect {
            config.char_aspect = v;
        }
        if let Some(v) = r.fit_terminal {
            config.fit_terminal = v;
        }
        if let Some(v) = r.glyph_ramp {
            config.glyph_ramp = v;
        }
        if let Some(v) = r.equalize {
            config.equalize = v;
        }
        if let Some(v) = r.mirror {
            config.mirror = v;
        }
        if let Some(v) = r.palette {
            config.palette = v;
        }
        if let Some(v) = r.custom_palette {
            config.custom_palette = Some(v);
        }
        if let Some(v) = r.throttle_interval_ms {
            config.throttle_interval_ms = v;
        }
        if let Some(v) = r.target_fps {
            config.target_fps = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use cs_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Config invalide dans {}", path.display()))
}
