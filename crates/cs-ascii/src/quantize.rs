use cs_core::charset::GlyphRamp;

/// Index into a ramp of `levels` glyphs for a luminance byte.
///
/// `floor(lum / 255 * (levels - 1))`, clamped. Values exactly on a bucket
/// boundary resolve to the lower glyph.
///
/// # Example
/// ```
/// use cs_ascii::quantize::quantize;
/// assert_eq!(quantize(0, 4), 0);
/// assert_eq!(quantize(128, 4), 1);
/// assert_eq!(quantize(212, 4), 2);
/// assert_eq!(quantize(255, 4), 3);
/// ```
#[inline(always)]
#[must_use]
pub fn quantize(luminance: u8, levels: usize) -> usize {
    let last = levels.saturating_sub(1);
    let normalized = f32::from(luminance) / 255.0;
    let scaled = (normalized * last as f32).floor();
    (scaled.max(0.0) as usize).min(last)
}

/// Lookup table mapping luminance [0..255] → glyph.
///
/// Pre-computed once per ramp for O(1) per-cell cost.
///
/// # Example
/// ```
/// use cs_core::charset::GlyphRamp;
/// use cs_ascii::quantize::GlyphLut;
/// let lut = GlyphLut::new(&GlyphRamp::new(" .+#").unwrap());
/// assert_eq!(lut.map(0), ' ');
/// assert_eq!(lut.map(255), '#');
/// ```
pub struct GlyphLut {
    lut: [char; 256],
}

impl GlyphLut {
    /// Build the table for `ramp`.
    #[must_use]
    pub fn new(ramp: &GlyphRamp) -> Self {
        let mut lut = [' '; 256];
        for (lum, slot) in lut.iter_mut().enumerate() {
            *slot = ramp.glyph(quantize(lum as u8, ramp.len()));
        }
        Self { lut }
    }

    /// Map a luminance value [0..255] to a glyph.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.lut[luminance as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_is_monotonic_and_in_range() {
        for levels in [1usize, 2, 4, 10, 71] {
            let mut prev = 0;
            for lum in 0..=255u8 {
                let idx = quantize(lum, levels);
                assert!(idx < levels, "index {idx} out of range for {levels} levels");
                assert!(idx >= prev, "non monotone à luminance {lum}");
                prev = idx;
            }
            assert_eq!(quantize(255, levels), levels - 1);
        }
    }

    #[test]
    fn single_glyph_ramp_always_zero() {
        assert!((0..=255u8).all(|lum| quantize(lum, 1) == 0));
    }

    #[test]
    fn boundaries_floor_not_round() {
        // 127 / 255 * 2 = 0.996 → floor 0 (rounding would give 1)
        assert_eq!(quantize(127, 3), 0);
        assert_eq!(quantize(128, 3), 1);
    }

    #[test]
    fn lut_agrees_with_quantize() {
        let ramp = GlyphRamp::default();
        let lut = GlyphLut::new(&ramp);
        for lum in 0..=255u8 {
            assert_eq!(lut.map(lum), ramp.glyph(quantize(lum, ramp.len())));
        }
    }
}
