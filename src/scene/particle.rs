use crate::assets::registry::TextureId;
use crate::foundation::core::{Vec2, Vec3};
use crate::layout::text::GlyphRole;

/// What a particle represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ParticleRole {
    /// Letter of the displayed quote.
    Quote,
    /// Letter of the author line.
    Author,
    /// Decorative glyph with no settle destination.
    Filler,
}

impl From<GlyphRole> for ParticleRole {
    fn from(role: GlyphRole) -> Self {
        match role {
            GlyphRole::Quote => Self::Quote,
            GlyphRole::Author => Self::Author,
        }
    }
}

/// Where a target particle rests once settled, before the fit scale is applied.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SettleTarget {
    /// Layout-space center.
    pub position: Vec2,
    /// Scale relative to the fit scale (1 for quote letters, the author scale for author letters).
    pub scale: f32,
}

/// One animated glyph plane.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Displayed character.
    pub ch: char,
    /// Quote, author or filler.
    pub role: ParticleRole,
    /// Glyph image in the owning pool's registry.
    pub texture: TextureId,
    /// Unscaled plane size (width, height) in scene units.
    pub size: Vec2,
    /// Center position.
    pub position: Vec3,
    /// Euler rotation in radians.
    pub rotation: Vec3,
    /// Position change per tick.
    pub velocity: Vec3,
    /// Rotation change per tick.
    pub angular_velocity: Vec3,
    /// Uniform scale.
    pub scale: f32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Settle destination; always `None` for fillers.
    pub target: Option<SettleTarget>,
}

impl Particle {
    /// Return `true` for quote and author letters.
    pub fn is_target(&self) -> bool {
        self.target.is_some()
    }

    /// Return `true` for author letters.
    pub fn is_author(&self) -> bool {
        self.role == ParticleRole::Author
    }
}

/// Render-facing snapshot of one particle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ParticleTransform {
    /// Displayed character.
    pub ch: char,
    /// Quote, author or filler.
    pub role: ParticleRole,
    /// Glyph image handle.
    pub texture: TextureId,
    /// Unscaled plane size.
    pub size: Vec2,
    /// Center position.
    pub position: Vec3,
    /// Euler rotation in radians.
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl From<&Particle> for ParticleTransform {
    fn from(p: &Particle) -> Self {
        Self {
            ch: p.ch,
            role: p.role,
            texture: p.texture,
            size: p.size,
            position: p.position,
            rotation: p.rotation,
            scale: p.scale,
            opacity: p.opacity,
        }
    }
}
