use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 24-bit color. Serialized as `[r, g, b]`.
///
/// # Example
/// ```
/// use cs_core::color::Rgb;
/// let c = Rgb::new(255, 128, 0);
/// assert_eq!(c.r, 255);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// Build a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Interpolation linéaire canal par canal, arrondie au plus proche.
    ///
    /// # Example
    /// ```
    /// use cs_core::color::Rgb;
    /// let mid = Rgb::new(0, 0, 0).lerp(Rgb::new(255, 255, 255), 0.5);
    /// assert_eq!(mid, Rgb::new(128, 128, 128));
    /// ```
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let channel = |a: u8, b: u8| -> u8 {
            let a = f32::from(a);
            let b = f32::from(b);
            (a + t * (b - a)).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Niveaux du cube 6×6×6 de la palette xterm-256.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// 16 couleurs système xterm (valeurs par défaut d'xterm).
const SYSTEM_COLORS: [Rgb; 16] = [
    Rgb::new(0, 0, 0),
    Rgb::new(205, 0, 0),
    Rgb::new(0, 205, 0),
    Rgb::new(205, 205, 0),
    Rgb::new(0, 0, 238),
    Rgb::new(205, 0, 205),
    Rgb::new(0, 205, 205),
    Rgb::new(229, 229, 229),
    Rgb::new(127, 127, 127),
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(92, 92, 255),
    Rgb::new(255, 0, 255),
    Rgb::new(0, 255, 255),
    Rgb::new(255, 255, 255),
];

/// Convert an xterm-256 color index to RGB.
///
/// # Example
/// ```
/// use cs_core::color::{xterm_to_rgb, Rgb};
/// assert_eq!(xterm_to_rgb(196), Rgb::new(255, 0, 0));
/// assert_eq!(xterm_to_rgb(232), Rgb::new(8, 8, 8));
/// ```
#[must_use]
pub const fn xterm_to_rgb(index: u8) -> Rgb {
    match index {
        0..=15 => SYSTEM_COLORS[index as usize],
        16..=231 => {
            let i = (index - 16) as usize;
            Rgb::new(
                CUBE_LEVELS[i / 36],
                CUBE_LEVELS[(i / 6) % 6],
                CUBE_LEVELS[i % 6],
            )
        }
        _ => {
            let v = 8 + (index - 232) * 10;
            Rgb::new(v, v, v)
        }
    }
}

/// Palette "coucher de soleil" : rouge sombre → jaune.
const WARM_SUNSET: [u8; 10] = [52, 88, 124, 160, 166, 172, 178, 184, 220, 226];
/// Palette arc-en-ciel néon : bleu → magenta → orange.
const NEON_RAINBOW: [u8; 13] = [21, 27, 33, 39, 45, 51, 93, 129, 165, 201, 198, 214, 220];
/// Palette émeraude : vert sombre → jaune-vert.
const EMERALD_GLOW: [u8; 10] = [22, 28, 34, 40, 46, 82, 118, 154, 190, 226];

/// Named color schemes selectable from config, CLI and the TUI.
///
/// # Example
/// ```
/// use cs_core::color::PaletteName;
/// let name: PaletteName = "neon-rainbow".parse().unwrap();
/// assert_eq!(name, PaletteName::NeonRainbow);
/// assert_eq!(PaletteName::default(), PaletteName::Monochrome);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteName {
    /// One default color for the whole frame.
    #[default]
    Monochrome,
    /// Dark red to yellow.
    WarmSunset,
    /// Blue, cyan, magenta, orange.
    NeonRainbow,
    /// Dark green to yellow-green.
    EmeraldGlow,
}

impl PaletteName {
    /// Every built-in scheme, in menu order.
    pub const ALL: [PaletteName; 4] = [
        PaletteName::Monochrome,
        PaletteName::WarmSunset,
        PaletteName::NeonRainbow,
        PaletteName::EmeraldGlow,
    ];

    /// Kebab-case identifier used in config files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PaletteName::Monochrome => "monochrome",
            PaletteName::WarmSunset => "warm-sunset",
            PaletteName::NeonRainbow => "neon-rainbow",
            PaletteName::EmeraldGlow => "emerald-glow",
        }
    }

    /// Human label for the status line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PaletteName::Monochrome => "Monochrome",
            PaletteName::WarmSunset => "Warm sunset",
            PaletteName::NeonRainbow => "Neon rainbow",
            PaletteName::EmeraldGlow => "Emerald glow",
        }
    }

    /// Next scheme in menu order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Build the color ramp for this scheme.
    #[must_use]
    pub fn ramp(self) -> ColorRamp {
        let codes: &[u8] = match self {
            PaletteName::Monochrome => return ColorRamp::Monochrome,
            PaletteName::WarmSunset => &WARM_SUNSET,
            PaletteName::NeonRainbow => &NEON_RAINBOW,
            PaletteName::EmeraldGlow => &EMERALD_GLOW,
        };
        ColorRamp::Palette(codes.iter().map(|&c| xterm_to_rgb(c)).collect())
    }
}

impl fmt::Display for PaletteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaletteName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownPalette { name: s.to_string() })
    }
}

/// How luminance turns into color.
///
/// # Example
/// ```
/// use cs_core::color::{ColorRamp, Rgb};
/// let ramp = ColorRamp::palette(vec![Rgb::new(0, 0, 0)]).unwrap();
/// assert!(!ramp.is_monochrome());
/// assert!(ColorRamp::palette(Vec::new()).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ColorRamp {
    /// No per-cell color; the display uses its default foreground.
    #[default]
    Monochrome,
    /// Ordered stops, dark to bright. Never empty.
    Palette(Vec<Rgb>),
}

impl ColorRamp {
    /// Build a palette ramp, rejecting an empty stop list.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyPalette`] if `colors` is empty.
    pub fn palette(colors: Vec<Rgb>) -> Result<Self, CoreError> {
        if colors.is_empty() {
            return Err(CoreError::EmptyPalette);
        }
        Ok(Self::Palette(colors))
    }

    /// `true` for the monochrome variant.
    #[must_use]
    pub fn is_monochrome(&self) -> bool {
        matches!(self, ColorRamp::Monochrome)
    }
}
