use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cs_ascii::color_map::map_color;
use cs_ascii::mailbox::frame_mailbox;
use cs_ascii::pipeline::{FramePipeline, SubmitOutcome};
use cs_ascii::renderer::FrameRenderer;
use cs_core::color::{ColorRamp, PaletteName, Rgb};
use cs_core::config::RenderConfig;
use cs_core::frame::{RenderedFrame, SourceFrame};
use cs_core::traits::FramePublisher;

#[derive(Default)]
struct LastFrame {
    frame: Mutex<Option<Arc<RenderedFrame>>>,
}

impl FramePublisher for LastFrame {
    fn publish(&self, frame: Arc<RenderedFrame>) {
        *self.frame.lock().unwrap() = Some(frame);
    }

    fn notify(&self, _message: String) {}
}

fn noise(width: u32, height: u32, seed: u32) -> SourceFrame {
    let mut state = seed;
    let bytes = (0..width * height)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect();
    SourceFrame::packed(width, height, bytes)
}

#[test]
fn monochrome_example_row() {
    let config = RenderConfig {
        target_width: 4,
        glyph_ramp: " .+#".into(),
        ..RenderConfig::default()
    };
    let rendered = FrameRenderer::new(&config)
        .render(&SourceFrame::packed(4, 1, vec![0, 128, 212, 255]))
        .unwrap();
    assert_eq!(rendered.rows.len(), 1);
    assert_eq!(rendered.rows[0].text(), " .+#");
}

#[test]
fn black_white_palette_midpoint() {
    let ramp = ColorRamp::Palette(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]);
    assert_eq!(map_color(&ramp, 0.5), Some(Rgb::new(128, 128, 128)));
}

#[test]
fn rows_keep_width_and_are_maximally_coalesced_for_every_scheme() {
    for palette in PaletteName::ALL {
        for width in [1u16, 7, 80, 133] {
            let config = RenderConfig {
                target_width: width,
                palette,
                ..RenderConfig::default()
            };
            let rendered = FrameRenderer::new(&config).render(&noise(97, 61, 7)).unwrap();
            assert_eq!(rendered.width, width);
            assert_eq!(rendered.rows.len(), usize::from(rendered.height));
            for row in &rendered.rows {
                assert_eq!(row.char_len(), usize::from(width), "{palette} @ {width}");
                assert!(row.segments.iter().all(|s| !s.text.is_empty()));
                for pair in row.segments.windows(2) {
                    assert_ne!(pair[0].color, pair[1].color);
                }
                if palette == PaletteName::Monochrome {
                    assert_eq!(row.segments.len(), 1);
                }
            }
        }
    }
}

#[test]
fn mirrored_render_is_column_reversed_when_widths_match() {
    let config = RenderConfig {
        target_width: 32,
        palette: PaletteName::EmeraldGlow,
        ..RenderConfig::default()
    };
    let renderer = FrameRenderer::new(&config);
    let frame = noise(32, 20, 3);
    let straight = renderer.render(&frame).unwrap();
    let mirrored = renderer.render(&frame.clone().with_mirror(true)).unwrap();
    for (a, b) in straight.rows.iter().zip(&mirrored.rows) {
        let reversed: String = a.text().chars().rev().collect();
        assert_eq!(b.text(), reversed);
    }
}

#[test]
fn pipeline_keeps_previous_frame_on_failure() {
    let display = Arc::new(LastFrame::default());
    let config = RenderConfig {
        throttle_interval_ms: 0,
        target_width: 8,
        ..RenderConfig::default()
    };
    let pipeline = FramePipeline::new(&config, Arc::clone(&display));
    let now = Instant::now();
    assert_eq!(pipeline.submit(&noise(8, 8, 1), now), SubmitOutcome::Published);
    let before = display.frame.lock().unwrap().clone();

    let broken = SourceFrame::packed(8, 0, vec![1, 2, 3]);
    assert!(matches!(
        pipeline.submit(&broken, now),
        SubmitOutcome::Failed(_)
    ));
    let after = display.frame.lock().unwrap().clone();
    assert_eq!(before, after);
}

#[test]
fn mailbox_feeds_freshest_frame_to_pipeline() {
    let display = Arc::new(LastFrame::default());
    let config = RenderConfig {
        target_width: 4,
        glyph_ramp: " #".into(),
        ..RenderConfig::default()
    };
    let pipeline = FramePipeline::new(&config, Arc::clone(&display));
    let (mut tx, mut rx) = frame_mailbox();

    tx.send(SourceFrame::packed(4, 1, vec![0; 4]));
    tx.send(SourceFrame::packed(4, 1, vec![255; 4]));

    let t0 = Instant::now();
    let frame = rx.take_latest().unwrap();
    assert_eq!(pipeline.submit(&frame, t0), SubmitOutcome::Published);
    assert!(rx.take_latest().is_none());

    tx.send(SourceFrame::packed(4, 1, vec![0; 4]));
    let frame = rx.take_latest().unwrap();
    assert_eq!(
        pipeline.submit(&frame, t0 + Duration::from_millis(50)),
        SubmitOutcome::Throttled
    );

    let shown = display.frame.lock().unwrap().clone().unwrap();
    assert_eq!(shown.to_plain_text(), "####");
}
