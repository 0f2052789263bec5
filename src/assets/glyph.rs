use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::config::FontConfig;
use crate::foundation::error::{SwarmError, SwarmResult};

/// Font size (px) the glyph canvases are measured against when no other size is configured.
pub const REFERENCE_SIZE_PX: f32 = 400.0;
/// Horizontal padding added around the measured advance, as a fraction of the font size.
pub const PADDING_RATIO: f32 = 0.1;
/// Canvas height as a multiple of the font size.
pub const HEIGHT_RATIO: f32 = 1.2;

/// One rasterized character: premultiplied RGBA8 pixels sized to the glyph's advance plus
/// padding.
#[derive(Clone, Debug)]
pub struct GlyphImage {
    /// Character as requested (before upper-casing).
    pub ch: char,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl GlyphImage {
    /// Fully transparent image of the given size.
    pub fn blank(ch: char, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            ch,
            width,
            height,
            rgba8_premul: Arc::new(vec![0; (width as usize) * (height as usize) * 4]),
        }
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Return `true` when the pixel buffer holds exactly `width * height` RGBA8 pixels.
    pub fn is_well_formed(&self) -> bool {
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(4));
        self.width > 0 && self.height > 0 && expected == Some(self.rgba8_premul.len())
    }

    /// Return `true` if any pixel has non-zero alpha.
    pub fn has_ink(&self) -> bool {
        self.rgba8_premul.chunks_exact(4).any(|px| px[3] != 0)
    }
}

/// Turns single characters into glyph images.
///
/// Implementations never fail: a character that cannot be drawn yields a blank image with a
/// best-effort width. Each call returns a fresh image; callers own its lifetime.
pub trait GlyphRasterizer {
    /// Rasterize `ch` (upper-cased) using `family`.
    fn rasterize(&mut self, ch: char, family: &str) -> GlyphImage;
}

fn canvas_size(advance_px: f32, size_px: f32) -> (u32, u32) {
    let w = (advance_px.max(0.0) + size_px * PADDING_RATIO - 1e-3)
        .ceil()
        .max(1.0);
    let h = (size_px * HEIGHT_RATIO).round().max(1.0);
    (w as u32, h as u32)
}

/// Font-free rasterizer drawing solid blocks with per-class advances.
///
/// Used when no font file is configured or the configured one cannot be loaded.
#[derive(Clone, Copy, Debug)]
pub struct BlockRasterizer {
    size_px: f32,
}

impl Default for BlockRasterizer {
    fn default() -> Self {
        Self::new(REFERENCE_SIZE_PX)
    }
}

impl BlockRasterizer {
    /// Rasterizer producing canvases for a `size_px` font size.
    pub fn new(size_px: f32) -> Self {
        Self {
            size_px: if size_px.is_finite() && size_px > 0.0 {
                size_px
            } else {
                REFERENCE_SIZE_PX
            },
        }
    }

    fn advance_ratio(ch: char) -> f32 {
        match ch {
            c if c.is_whitespace() => 0.3,
            'I' | 'J' | '1' | '!' | '.' | ',' | ':' | ';' | '\'' | '|' | '/' => 0.35,
            'M' | 'W' | 'Ж' | 'Ш' | 'Щ' | 'Ю' | 'Ы' | '@' | '%' | '&' => 0.9,
            _ => 0.65,
        }
    }
}

impl GlyphRasterizer for BlockRasterizer {
    fn rasterize(&mut self, ch: char, _family: &str) -> GlyphImage {
        let upper = ch.to_uppercase().next().unwrap_or(ch);
        let advance = self.size_px * Self::advance_ratio(upper);
        let (w, h) = canvas_size(advance, self.size_px);
        let mut img = GlyphImage::blank(ch, w, h);
        if upper.is_whitespace() || upper.is_control() {
            return img;
        }

        let pad = ((w as f32 - advance) / 2.0).floor() as u32;
        let ink_h = (self.size_px * 0.72) as u32;
        let top = (h.saturating_sub(ink_h)) / 2;
        let mut bytes = vec![0u8; (w as usize) * (h as usize) * 4];
        for y in top..(top + ink_h).min(h) {
            for x in pad..(pad + advance as u32).min(w) {
                let i = ((y as usize) * (w as usize) + x as usize) * 4;
                bytes[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
            }
        }
        img.rgba8_premul = Arc::new(bytes);
        img
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct GlyphBrush;

/// Rasterizer shaping with Parley and filling glyph outlines with vello_cpu.
pub struct FontRasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
    size_px: f32,
}

impl std::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRasterizer")
            .field("family_name", &self.family_name)
            .field("size_px", &self.size_px)
            .finish()
    }
}

impl FontRasterizer {
    /// Register `font_bytes` and prepare a rasterizer at `size_px`.
    pub fn from_bytes(font_bytes: Vec<u8>, size_px: f32) -> SwarmResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SwarmError::validation(
                "glyph raster size must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| SwarmError::font("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SwarmError::font("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
            size_px,
        })
    }

    /// Read a font file and prepare a rasterizer at `size_px`.
    pub fn from_path(path: &Path, size_px: f32) -> SwarmResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))
            .map_err(SwarmError::from)?;
        Self::from_bytes(bytes, size_px)
    }

    /// Family name detected in the registered font data.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn render(&mut self, ch: char) -> SwarmResult<GlyphImage> {
        let text: String = ch.to_uppercase().collect();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(GlyphBrush));

        let mut layout: parley::Layout<GlyphBrush> = builder.build(&text);
        layout.break_all_lines(None);

        let measured = layout.width();
        let (w, h) = canvas_size(measured, self.size_px);
        let w16: u16 = w
            .try_into()
            .map_err(|_| SwarmError::validation("glyph canvas width exceeds u16"))?;
        let h16: u16 = h
            .try_into()
            .map_err(|_| SwarmError::validation("glyph canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        let dx = (w as f32 - measured) / 2.0;
        let dy = (h as f32 - layout.height()) / 2.0;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(dx),
            f64::from(dy),
        )));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(GlyphImage {
            ch,
            width: w,
            height: h,
            rgba8_premul: Arc::new(pixmap.data_as_u8_slice().to_vec()),
        })
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&mut self, ch: char, family: &str) -> GlyphImage {
        if family != self.family_name {
            tracing::trace!(requested = family, loaded = %self.family_name, "family substituted");
        }
        match self.render(ch) {
            Ok(img) => img,
            Err(e) => {
                tracing::debug!(?ch, error = %e, "glyph render failed, using blank glyph");
                let (w, h) = canvas_size(self.size_px * 0.5, self.size_px);
                GlyphImage::blank(ch, w, h)
            }
        }
    }
}

/// Build the rasterizer described by `cfg`, falling back to [`BlockRasterizer`] when no font is
/// configured or the font cannot be loaded.
pub fn rasterizer_for(cfg: &FontConfig) -> Box<dyn GlyphRasterizer> {
    let Some(path) = cfg.path.as_deref() else {
        return Box::new(BlockRasterizer::new(cfg.raster_size_px));
    };
    match FontRasterizer::from_path(path, cfg.raster_size_px) {
        Ok(r) => {
            tracing::debug!(family = r.family_name(), "font rasterizer ready");
            Box::new(r)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "font unavailable, using block glyphs");
            Box::new(BlockRasterizer::new(cfg.raster_size_px))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/glyph.rs"]
mod tests;
