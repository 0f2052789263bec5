use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::assets::glyph::{BlockRasterizer, GlyphRasterizer};
use crate::assets::quotes::Quote;
use crate::config::SceneConfig;
use crate::foundation::core::Viewport;
use crate::session::hero::SceneState;

fn settled_scene(fillers: usize) -> HeroScene {
    let mut cfg = SceneConfig::default();
    cfg.viewport = Viewport::new(320, 180).unwrap();
    cfg.spawn.filler_count = fillers;
    let mut scene = HeroScene::new(
        cfg,
        vec![Quote::new("MMMM", "")],
        Box::new(BlockRasterizer::new(40.0)),
        Box::new(StdRng::seed_from_u64(5)),
    )
    .unwrap();
    assert!(scene.settle());
    for _ in 0..1000 {
        if scene.tick() == SceneState::Settled {
            break;
        }
    }
    assert_eq!(scene.state(), SceneState::Settled);
    scene
}

#[test]
fn over_respects_opacity_and_transparency() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
    assert_eq!(over(dst, [255, 255, 255, 255], 0.0), dst);
    assert_eq!(over(dst, [255, 255, 255, 255], 1.0), [255, 255, 255, 255]);
    let half = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert!((126..=129).contains(&half[0]));
    assert_eq!(half[3], 255);
}

#[test]
fn settled_letters_cover_the_center() {
    let scene = settled_scene(0);
    let style = PreviewStyle {
        grid: None,
        ..PreviewStyle::default()
    };
    let frame = render_preview(&scene, &style).unwrap();
    assert_eq!((frame.width, frame.height), (320, 180));
    assert_eq!(frame.data.len(), 320 * 180 * 4);

    // corner stays background, some pixel near the center carries glyph ink
    assert_eq!(frame.pixel(0, 0), Some([5, 5, 5, 255]));
    let bright = (140..180u32)
        .flat_map(|x| (65..90u32).map(move |y| (x, y)))
        .filter_map(|(x, y)| frame.pixel(x, y))
        .any(|px| px[0] > 200);
    assert!(bright);
}

#[test]
fn grid_lines_lighten_the_background() {
    let scene = settled_scene(0);
    let frame = render_preview(&scene, &PreviewStyle::default()).unwrap();
    // (0, 0) is a rest point of the lattice
    let px = frame.pixel(0, 0).unwrap();
    assert!(px[0] > 5);
}

#[test]
fn faded_fillers_leave_no_trace() {
    let with = settled_scene(40);
    let without = settled_scene(0);
    let style = PreviewStyle {
        grid: None,
        ..PreviewStyle::default()
    };
    let a = render_preview(&with, &style).unwrap();
    let b = render_preview(&without, &style).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn png_roundtrips_dimensions() {
    let scene = settled_scene(0);
    let frame = render_preview(&scene, &PreviewStyle::default()).unwrap();
    let path = std::path::PathBuf::from("target/test-out/preview/settled.png");
    frame.save_png(&path).unwrap();
    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (320, 180));
}

struct ShortBufferRasterizer;

impl GlyphRasterizer for ShortBufferRasterizer {
    fn rasterize(&mut self, ch: char, _family: &str) -> GlyphImage {
        GlyphImage {
            ch,
            width: 64,
            height: 48,
            rgba8_premul: std::sync::Arc::new(vec![255; 16]),
        }
    }
}

#[test]
fn malformed_glyph_buffers_render_as_blank() {
    let mut cfg = SceneConfig::default();
    cfg.viewport = Viewport::new(320, 180).unwrap();
    cfg.spawn.filler_count = 5;
    let mut scene = HeroScene::new(
        cfg,
        vec![Quote::new("MMMM", "x")],
        Box::new(ShortBufferRasterizer),
        Box::new(StdRng::seed_from_u64(6)),
    )
    .unwrap();
    assert!(scene.settle());
    for _ in 0..1000 {
        if scene.tick() == SceneState::Settled {
            break;
        }
    }
    let style = PreviewStyle {
        grid: None,
        ..PreviewStyle::default()
    };
    let frame = render_preview(&scene, &style).unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == [5, 5, 5, 255].as_slice()));
}
