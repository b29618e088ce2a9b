use cs_core::color::{ColorRamp, Rgb};

/// Map a normalized luminance to a color of `ramp`.
///
/// `Monochrome` yields `None`. A palette of M ≥ 2 stops is interpolated
/// linearly between the two stops around `v * (M - 1)`, so the first and
/// last stops are hit exactly at 0 and 1.
///
/// # Example
/// ```
/// use cs_core::color::{ColorRamp, Rgb};
/// use cs_ascii::color_map::map_color;
/// let ramp = ColorRamp::Palette(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]);
/// assert_eq!(map_color(&ramp, 0.5), Some(Rgb::new(128, 128, 128)));
/// assert_eq!(map_color(&ColorRamp::Monochrome, 0.5), None);
/// ```
#[must_use]
pub fn map_color(ramp: &ColorRamp, normalized: f32) -> Option<Rgb> {
    let colors = match ramp {
        ColorRamp::Monochrome => return None,
        ColorRamp::Palette(colors) => colors,
    };
    match colors.len() {
        0 => None,
        1 => Some(colors[0]),
        m => {
            let last = m - 1;
            let v = if normalized.is_nan() {
                0.0
            } else {
                normalized.clamp(0.0, 1.0)
            };
            let scaled = v * last as f32;
            let lower = (scaled.floor() as usize).min(last);
            let upper = (lower + 1).min(last);
            let t = scaled - lower as f32;
            Some(colors[lower].lerp(colors[upper], t))
        }
    }
}

/// Lookup table mapping luminance [0..255] → color for one ramp.
///
/// # Example
/// ```
/// use cs_core::color::{ColorRamp, Rgb};
/// use cs_ascii::color_map::ColorLut;
/// let lut = ColorLut::new(&ColorRamp::Palette(vec![Rgb::new(9, 9, 9)]));
/// assert_eq!(lut.map(200), Some(Rgb::new(9, 9, 9)));
/// assert!(ColorLut::new(&ColorRamp::Monochrome).is_monochrome());
/// ```
pub struct ColorLut {
    lut: [Option<Rgb>; 256],
    monochrome: bool,
}

impl ColorLut {
    /// Build the table for `ramp`.
    #[must_use]
    pub fn new(ramp: &ColorRamp) -> Self {
        let mut lut = [None; 256];
        for (lum, slot) in lut.iter_mut().enumerate() {
            *slot = map_color(ramp, lum as f32 / 255.0);
        }
        Self {
            lut,
            monochrome: ramp.is_monochrome(),
        }
    }

    /// Color for a luminance byte.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> Option<Rgb> {
        self.lut[luminance as usize]
    }

    /// `true` when built from `ColorRamp::Monochrome`.
    #[must_use]
    pub fn is_monochrome(&self) -> bool {
        self.monochrome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::color::PaletteName;

    fn sunset() -> Vec<Rgb> {
        match PaletteName::WarmSunset.ramp() {
            ColorRamp::Palette(colors) => colors,
            ColorRamp::Monochrome => unreachable!(),
        }
    }

    #[test]
    fn endpoints_are_exact() {
        let colors = sunset();
        let ramp = ColorRamp::Palette(colors.clone());
        assert_eq!(map_color(&ramp, 0.0), Some(colors[0]));
        assert_eq!(map_color(&ramp, 1.0), colors.last().copied());
        let lut = ColorLut::new(&ramp);
        assert_eq!(lut.map(0), Some(colors[0]));
        assert_eq!(lut.map(255), colors.last().copied());
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let colors = sunset();
        let ramp = ColorRamp::Palette(colors.clone());
        assert_eq!(map_color(&ramp, -3.0), Some(colors[0]));
        assert_eq!(map_color(&ramp, 7.5), colors.last().copied());
        assert_eq!(map_color(&ramp, f32::NAN), Some(colors[0]));
    }

    #[test]
    fn single_stop_palette_is_constant() {
        let ramp = ColorRamp::Palette(vec![Rgb::new(1, 2, 3)]);
        for v in [0.0, 0.25, 1.0] {
            assert_eq!(map_color(&ramp, v), Some(Rgb::new(1, 2, 3)));
        }
    }

    #[test]
    fn interpolation_hits_intermediate_stops() {
        let ramp = ColorRamp::Palette(vec![
            Rgb::new(0, 0, 0),
            Rgb::new(100, 0, 0),
            Rgb::new(100, 200, 0),
        ]);
        assert_eq!(map_color(&ramp, 0.5), Some(Rgb::new(100, 0, 0)));
        assert_eq!(map_color(&ramp, 0.25), Some(Rgb::new(50, 0, 0)));
        assert_eq!(map_color(&ramp, 0.75), Some(Rgb::new(100, 100, 0)));
    }

    #[test]
    fn monochrome_lut_is_all_none() {
        let lut = ColorLut::new(&ColorRamp::Monochrome);
        assert!((0..=255u8).all(|lum| lut.map(lum).is_none()));
    }
}
