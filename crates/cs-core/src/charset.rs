use crate::error::CoreError;

/// Rampe par défaut, du plus sombre au plus clair. L'ordre est figé.
pub const CHARSET_DEFAULT: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/*tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// 10 caractères, compact, bon contraste.
pub const CHARSET_COMPACT: &str = " .:-=+*#%@";

/// Blocs Unicode, pseudo-pixels.
pub const CHARSET_BLOCKS: &str = " ░▒▓█";

/// Resolve a preset name (`default`, `compact`, `blocks`) or return the
/// argument unchanged as a literal ramp.
///
/// # Example
/// ```
/// use cs_core::charset::{resolve_charset, CHARSET_COMPACT};
/// assert_eq!(resolve_charset("compact"), CHARSET_COMPACT);
/// assert_eq!(resolve_charset(" .+#"), " .+#");
/// ```
#[must_use]
pub fn resolve_charset(name_or_literal: &str) -> &str {
    match name_or_literal {
        "default" | "standard" => CHARSET_DEFAULT,
        "compact" => CHARSET_COMPACT,
        "blocks" => CHARSET_BLOCKS,
        other => other,
    }
}

/// Ordered glyphs, index 0 darkest, last brightest. Never empty.
///
/// # Example
/// ```
/// use cs_core::charset::GlyphRamp;
/// let ramp = GlyphRamp::new(" .+#").unwrap();
/// assert_eq!(ramp.len(), 4);
/// assert_eq!(ramp.glyph(3), '#');
/// assert!(GlyphRamp::new("").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    /// Build a ramp from a string, one glyph per `char`.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyGlyphRamp`] for an empty string.
    pub fn new(glyphs: &str) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            return Err(CoreError::EmptyGlyphRamp);
        }
        Ok(Self { glyphs })
    }

    /// Number of glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph at `index`, clamped to the last glyph.
    #[inline(always)]
    #[must_use]
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self {
            glyphs: CHARSET_DEFAULT.chars().collect(),
        }
    }
}
