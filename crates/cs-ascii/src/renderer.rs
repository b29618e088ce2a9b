use cs_core::charset::GlyphRamp;
use cs_core::color::ColorRamp;
use cs_core::config::RenderConfig;
use cs_core::error::FrameError;
use cs_core::frame::{RenderedFrame, Row, SourceFrame};
use rayon::prelude::*;
use thiserror::Error;

use crate::color_map::ColorLut;
use crate::equalize::equalization_lut;
use crate::quantize::GlyphLut;
use crate::runs::{RunBuilder, monochrome_row};
use crate::sampler::{TargetGrid, sample};

/// Why a conversion produced no frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Geometry inconsistent enough to abort the whole frame.
    #[error("Frame malformée : {0}")]
    Malformed(#[from] FrameError),
}

/// Convertit une `SourceFrame` en `RenderedFrame`.
///
/// Les tables glyphes/couleurs sont précalculées et reconstruites seulement
/// quand la config change.
///
/// # Example
/// ```
/// use cs_core::config::RenderConfig;
/// use cs_core::frame::SourceFrame;
/// use cs_ascii::renderer::FrameRenderer;
///
/// let config = RenderConfig { target_width: 4, glyph_ramp: " .+#".into(), ..RenderConfig::default() };
/// let renderer = FrameRenderer::new(&config);
/// let frame = SourceFrame::packed(4, 1, vec![0, 128, 212, 255]);
/// let rendered = renderer.render(&frame).unwrap();
/// assert_eq!(rendered.to_plain_text(), " .+#");
/// ```
pub struct FrameRenderer {
    glyphs: GlyphLut,
    colors: ColorLut,
    glyph_ramp: GlyphRamp,
    color_ramp: ColorRamp,
    target_width: u16,
    char_aspect: f32,
    equalize: bool,
}

impl FrameRenderer {
    /// Create a renderer for `config`.
    #[must_use]
    pub fn new(config: &RenderConfig) -> Self {
        let glyph_ramp = config.glyph_ramp();
        let color_ramp = config.color_ramp();
        Self {
            glyphs: GlyphLut::new(&glyph_ramp),
            colors: ColorLut::new(&color_ramp),
            glyph_ramp,
            color_ramp,
            target_width: config.target_width.max(1),
            char_aspect: config.char_aspect,
            equalize: config.equalize,
        }
    }

    /// Rebuild lookup tables if the ramps changed; copy scalar settings.
    pub fn update_if_needed(&mut self, config: &RenderConfig) {
        let glyph_ramp = config.glyph_ramp();
        if glyph_ramp != self.glyph_ramp {
            log::debug!("Rampe de glyphes changée ({} glyphes)", glyph_ramp.len());
            self.glyphs = GlyphLut::new(&glyph_ramp);
            self.glyph_ramp = glyph_ramp;
        }
        let color_ramp = config.color_ramp();
        if color_ramp != self.color_ramp {
            log::debug!("Palette changée : {}", config.palette_label());
            self.colors = ColorLut::new(&color_ramp);
            self.color_ramp = color_ramp;
        }
        self.target_width = config.target_width.max(1);
        self.char_aspect = config.char_aspect;
        self.equalize = config.equalize;
    }

    /// Grid that `frame` would be rendered onto.
    ///
    /// # Errors
    /// Returns [`FrameError::GridTooTall`] for sources whose aspect would
    /// need more rows than [`MAX_GRID_ROWS`](crate::sampler::MAX_GRID_ROWS).
    pub fn grid_for(&self, frame: &SourceFrame) -> Result<TargetGrid, FrameError> {
        TargetGrid::for_source(frame.width, frame.height, self.target_width, self.char_aspect)
    }

    /// Run one conversion.
    ///
    /// # Errors
    /// Returns [`RenderError::Malformed`] if the frame geometry makes the
    /// conversion meaningless. Out-of-bounds cells of a truncated buffer are
    /// rendered blank instead.
    pub fn render(&self, frame: &SourceFrame) -> Result<RenderedFrame, RenderError> {
        frame.validate()?;
        if frame.is_truncated() {
            log::debug!(
                "Buffer tronqué : {} octets pour {}×{} (stride {}/{})",
                frame.bytes.len(),
                frame.width,
                frame.height,
                frame.row_stride,
                frame.pixel_stride
            );
        }

        let grid = self.grid_for(frame)?;
        let width = usize::from(grid.width);

        let samples: Vec<Option<u8>> = (0..grid.height)
            .into_par_iter()
            .flat_map_iter(|ty| (0..grid.width).map(move |tx| sample(frame, &grid, tx, ty)))
            .collect();

        let levels = if self.equalize {
            Some(equalization_lut(samples.iter().flatten().copied()))
        } else {
            None
        };

        let rows: Vec<Row> = samples
            .par_chunks(width)
            .map(|cells| self.build_row(cells, levels.as_ref()))
            .collect();

        Ok(RenderedFrame {
            rows,
            width: grid.width,
            height: grid.height,
        })
    }

    fn build_row(&self, cells: &[Option<u8>], levels: Option<&[u8; 256]>) -> Row {
        let adjust = |lum: u8| levels.map_or(lum, |lut| lut[lum as usize]);

        if self.colors.is_monochrome() {
            let text: String = cells
                .iter()
                .map(|cell| cell.map_or(' ', |lum| self.glyphs.map(adjust(lum))))
                .collect();
            return monochrome_row(text);
        }

        let mut runs = RunBuilder::with_capacity(cells.len());
        for cell in cells {
            match *cell {
                Some(lum) => {
                    let lum = adjust(lum);
                    runs.push(self.glyphs.map(lum), self.colors.map(lum));
                }
                None => runs.push(' ', None),
            }
        }
        runs.finish()
    }
}
