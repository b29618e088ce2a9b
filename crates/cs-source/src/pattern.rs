use cs_core::frame::SourceFrame;
use cs_core::traits::FrameSource;
use rayon::prelude::*;

/// Motifs animés disponibles pour tester le pipeline sans caméra.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternKind {
    /// Horizontal luminance ramp scrolling left to right.
    Gradient,
    /// Vertical bars of alternating brightness drifting sideways.
    Bars,
    /// Concentric rings expanding from the center.
    Rings,
}

impl PatternKind {
    /// Every pattern name accepted by [`create_pattern_source`].
    pub const NAMES: [&'static str; 3] = ["gradient", "bars", "rings"];
}

/// Fabrique la source procédurale choisie par l'utilisateur.
///
/// # Errors
/// Retourne une erreur si le type n'est pas reconnu.
///
/// # Example
/// ```
/// use cs_source::pattern::create_pattern_source;
/// assert!(create_pattern_source("rings", 64, 48).is_ok());
/// assert!(create_pattern_source("mandelbrot", 64, 48).is_err());
/// ```
pub fn create_pattern_source(name: &str, width: u32, height: u32) -> anyhow::Result<PatternSource> {
    let kind = match name.to_lowercase().as_str() {
        "gradient" => PatternKind::Gradient,
        "bars" => PatternKind::Bars,
        "rings" => PatternKind::Rings,
        _ => anyhow::bail!(
            "Motif inconnu : {name}. Supportés : {}",
            PatternKind::NAMES.join(", ")
        ),
    };
    if width == 0 || height == 0 {
        anyhow::bail!("Dimensions invalides : {width}×{height}");
    }
    Ok(PatternSource::new(kind, width, height))
}

/// Animated luminance generator standing in for a live camera.
///
/// # Example
/// ```
/// use cs_core::traits::FrameSource;
/// use cs_source::pattern::{PatternKind, PatternSource};
/// let mut source = PatternSource::new(PatternKind::Gradient, 32, 16);
/// let frame = source.next_frame().unwrap();
/// assert_eq!(frame.bytes.len(), 32 * 16);
/// assert!(source.is_live());
/// ```
pub struct PatternSource {
    kind: PatternKind,
    width: u32,
    height: u32,
    frame_count: u64,
}

impl PatternSource {
    /// Creates a new generator with the specified dimensions.
    #[must_use]
    pub fn new(kind: PatternKind, width: u32, height: u32) -> Self {
        Self {
            kind,
            width,
            height,
            frame_count: 0,
        }
    }

    fn luminance(&self, x: u32, y: u32, phase: f32) -> u8 {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        let v = match self.kind {
            PatternKind::Gradient => (x as f32 / w + phase).fract(),
            PatternKind::Bars => {
                let band = ((x as f32 / w + phase * 0.25) * 8.0).floor() as u32;
                if band % 2 == 0 { 0.85 } else { 0.15 }
            }
            PatternKind::Rings => {
                let dx = x as f32 - w / 2.0;
                let dy = (y as f32 - h / 2.0) * 2.0;
                let r = (dx * dx + dy * dy).sqrt() / w.max(h);
                0.5 + 0.5 * ((r * 24.0 - phase * std::f32::consts::TAU).sin())
            }
        };
        (v.clamp(0.0, 1.0) * 255.0) as u8
    }
}

impl FrameSource for PatternSource {
    fn next_frame(&mut self) -> Option<SourceFrame> {
        // Animation temporelle : un cycle complet toutes les 4 s à 30 fps
        let phase = (self.frame_count % 120) as f32 / 120.0;
        self.frame_count += 1;

        let width = self.width as usize;
        let mut bytes = vec![0u8; width * self.height as usize];
        bytes
            .par_chunks_mut(width.max(1))
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.iter_mut().enumerate() {
                    *px = self.luminance(x as u32, y as u32, phase);
                }
            });

        Some(SourceFrame::packed(self.width, self.height, bytes))
    }

    fn native_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_live(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_increases_left_to_right_on_first_frame() {
        let mut source = PatternSource::new(PatternKind::Gradient, 64, 2);
        let frame = source.next_frame().unwrap();
        let row = &frame.bytes[..64];
        assert_eq!(row[0], 0);
        assert!(row.windows(2).all(|p| p[0] <= p[1]));
    }

    #[test]
    fn frames_animate() {
        let mut source = PatternSource::new(PatternKind::Rings, 40, 20);
        let first = source.next_frame().unwrap();
        let second = source.next_frame().unwrap();
        assert_ne!(first.bytes, second.bytes);
    }

    #[test]
    fn bars_alternate() {
        let mut source = PatternSource::new(PatternKind::Bars, 16, 1);
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.bytes[0], 216);
        assert_eq!(frame.bytes[2], 38);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(create_pattern_source("gradient", 0, 10).is_err());
    }
}
