/// Build a histogram-equalisation table from sampled luminances.
///
/// Classic CDF remap: `round((cdf(v) - cdf_min) / (n - cdf_min) * 255)`.
/// A uniform input (one distinct value) maps to itself.
///
/// # Example
/// ```
/// use cs_ascii::equalize::equalization_lut;
/// let lut = equalization_lut([100u8, 100, 110, 110].into_iter());
/// assert_eq!(lut[100], 0);
/// assert_eq!(lut[110], 255);
/// ```
#[must_use]
pub fn equalization_lut(samples: impl Iterator<Item = u8>) -> [u8; 256] {
    let mut hist = [0u32; 256];
    let mut total = 0u32;
    for v in samples {
        hist[v as usize] += 1;
        total += 1;
    }

    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = i as u8;
    }

    let cdf_min = hist.iter().copied().find(|&c| c > 0).unwrap_or(0);
    if total == 0 || total == cdf_min {
        return lut;
    }

    let denom = f64::from(total - cdf_min);
    let mut cdf = 0u32;
    for (i, slot) in lut.iter_mut().enumerate() {
        cdf += hist[i];
        let num = f64::from(cdf.saturating_sub(cdf_min));
        *slot = (num / denom * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_uniform_inputs_are_identity() {
        let identity: Vec<u8> = (0..=255).collect();
        assert_eq!(equalization_lut(std::iter::empty()).to_vec(), identity);
        assert_eq!(equalization_lut([42u8; 9].into_iter()).to_vec(), identity);
    }

    #[test]
    fn narrow_band_is_stretched_to_full_range() {
        let samples = (60u8..=70).cycle().take(110);
        let lut = equalization_lut(samples);
        assert_eq!(lut[60], 0);
        assert_eq!(lut[70], 255);
        for pair in lut[60..=70].windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}
