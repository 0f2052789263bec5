use std::path::Path;

use anyhow::Context;
use glam::{EulerRot, Mat2, Quat};

use crate::assets::glyph::GlyphImage;
use crate::foundation::core::{Rgba8, Vec2, Vec3};
use crate::foundation::error::{SwarmError, SwarmResult};
use crate::scene::camera::Camera;
use crate::scene::particle::{ParticleRole, ParticleTransform};
use crate::session::hero::HeroScene;

type PremulRgba8 = [u8; 4];

/// Colors of a preview frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreviewStyle {
    /// Clear color.
    pub background: Rgba8,
    /// Tint of quote letters and fillers.
    pub letter: Rgba8,
    /// Tint of author letters.
    pub author: Rgba8,
    /// Backdrop line color; `None` skips the grid.
    pub grid: Option<Rgba8>,
    /// Texels with lower coverage are discarded.
    pub alpha_cutoff: f32,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            background: Rgba8::opaque(5, 5, 5),
            letter: Rgba8::WHITE,
            author: Rgba8::opaque(170, 170, 170),
            grid: Some(Rgba8 {
                r: 255,
                g: 255,
                b: 255,
                a: 38,
            }),
            alpha_cutoff: 0.05,
        }
    }
}

/// A rendered preview as premultiplied RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct PreviewFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl PreviewFrame {
    fn filled(width: u32, height: u32, color: PremulRgba8) -> Self {
        let n = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(n * 4);
        for _ in 0..n {
            data.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    fn blend(&mut self, x: i64, y: i64, src: PremulRgba8, opacity: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let dst = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        self.data[i..i + 4].copy_from_slice(&over(dst, src, opacity));
    }

    /// Write the frame as a PNG, creating parent directories.
    pub fn save_png(&self, path: &Path) -> SwarmResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

fn premul(c: Rgba8) -> PremulRgba8 {
    [
        mul_div255(u16::from(c.r), u16::from(c.a)),
        mul_div255(u16::from(c.g), u16::from(c.a)),
        mul_div255(u16::from(c.b), u16::from(c.a)),
        c.a,
    ]
}

fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }
    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Render the current frame of `scene`: backdrop grid, then particles back to front.
///
/// Each glyph plane is projected through its center and two half-axes, so rotation
/// foreshortens it and depth scales it. The result is a flat affine approximation of the
/// perspective quad, adequate for previews.
pub fn render_preview(scene: &HeroScene, style: &PreviewStyle) -> SwarmResult<PreviewFrame> {
    let camera = scene.camera();
    let vp = camera.viewport();
    let mut frame = PreviewFrame::filled(vp.width, vp.height, premul(style.background));

    if let Some(grid) = style.grid {
        let color = premul(grid);
        for (a, b) in scene.backdrop().segments() {
            draw_line(&mut frame, a, b, color);
        }
    }

    let mut items: Vec<(f32, ParticleTransform)> = scene
        .transforms()
        .into_iter()
        .filter(|t| t.opacity > 0.0 && t.scale > 0.0)
        .filter_map(|t| camera.project(t.position).map(|p| (p.depth, t)))
        .collect();
    items.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (_, t) in &items {
        let image = scene.texture(t.texture).ok_or_else(|| {
            SwarmError::validation(format!("particle texture {} is not alive", t.texture.as_u64()))
        })?;
        let tint = match t.role {
            ParticleRole::Author => style.author,
            ParticleRole::Quote | ParticleRole::Filler => style.letter,
        };
        draw_plane(&mut frame, camera, t, image, tint, style.alpha_cutoff);
    }
    Ok(frame)
}

fn draw_line(frame: &mut PreviewFrame, a: Vec2, b: Vec2, color: PremulRgba8) {
    let steps = (b - a).abs().max_element().ceil().max(1.0) as usize;
    for s in 0..=steps {
        let p = a.lerp(b, s as f32 / steps as f32);
        frame.blend(p.x.floor() as i64, p.y.floor() as i64, color, 1.0);
    }
}

fn draw_plane(
    frame: &mut PreviewFrame,
    camera: &Camera,
    t: &ParticleTransform,
    image: &GlyphImage,
    tint: Rgba8,
    alpha_cutoff: f32,
) {
    let rot = Quat::from_euler(EulerRot::XYZ, t.rotation.x, t.rotation.y, t.rotation.z);
    let half = t.size * t.scale / 2.0;
    let ux = rot * Vec3::new(half.x, 0.0, 0.0);
    let uy = rot * Vec3::new(0.0, half.y, 0.0);

    let (Some(c), Some(px), Some(py)) = (
        camera.project(t.position),
        camera.project(t.position + ux),
        camera.project(t.position + uy),
    ) else {
        return;
    };
    let ax = px.px - c.px;
    let ay = py.px - c.px;
    let m = Mat2::from_cols(ax, ay);
    if m.determinant().abs() < 1e-3 {
        return;
    }
    let inv = m.inverse();

    let corners = [c.px + ax + ay, c.px + ax - ay, c.px - ax + ay, c.px - ax - ay];
    let lo = corners.iter().fold(Vec2::splat(f32::INFINITY), |m, p| m.min(*p));
    let hi = corners.iter().fold(Vec2::splat(f32::NEG_INFINITY), |m, p| m.max(*p));
    let x0 = lo.x.floor().max(0.0) as i64;
    let y0 = lo.y.floor().max(0.0) as i64;
    let x1 = (hi.x.ceil() as i64).min(i64::from(frame.width) - 1);
    let y1 = (hi.y.ceil() as i64).min(i64::from(frame.height) - 1);

    let cutoff = (alpha_cutoff.clamp(0.0, 1.0) * 255.0) as u8;
    let tw = image.width as f32;
    let th = image.height as f32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let uv = inv * (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - c.px);
            if uv.x.abs() > 1.0 || uv.y.abs() > 1.0 {
                continue;
            }
            let tx = (((uv.x + 1.0) / 2.0 * tw) as u32).min(image.width - 1);
            let ty = (((1.0 - uv.y) / 2.0 * th) as u32).min(image.height - 1);
            let i = ((ty as usize) * (image.width as usize) + tx as usize) * 4;
            let Some(texel) = image.rgba8_premul.get(i..i + 4) else {
                continue;
            };
            if texel[3] <= cutoff {
                continue;
            }
            let src = [
                mul_div255(u16::from(texel[0]), u16::from(tint.r)),
                mul_div255(u16::from(texel[1]), u16::from(tint.g)),
                mul_div255(u16::from(texel[2]), u16::from(tint.b)),
                texel[3],
            ];
            frame.blend(x, y, src, t.opacity);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
