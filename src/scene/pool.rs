use rand::{Rng, RngCore};

use crate::assets::glyph::{GlyphImage, GlyphRasterizer};
use crate::assets::registry::{TextureId, TextureRegistry, TextureStats};
use crate::foundation::core::{Vec2, Vec3};
use crate::foundation::math::{centered_vec3, random_angles};
use crate::layout::text::{GlyphRole, LayoutParams, TextLayout};
use crate::scene::particle::{Particle, ParticleRole, ParticleTransform, SettleTarget};

/// Decorative alphabet the filler glyphs are drawn from.
pub const FILLER_ALPHABET: &str = "АБВГДЕЖЗИКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ1234567890?!@#$%&*<>";

/// Initial placement and motion of freshly built particles.
///
/// Volumes and speeds are full ranges: a component is drawn uniformly from `[-v/2, v/2)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpawnParams {
    /// Number of filler particles added to every pool.
    pub filler_count: usize,
    /// Characters fillers are drawn from.
    pub filler_alphabet: String,
    /// Spawn volume for quote and author letters.
    pub target_volume: Vec3,
    /// Spawn volume for fillers.
    pub filler_volume: Vec3,
    /// Velocity range for letters.
    pub target_speed: f32,
    /// Angular velocity range for letters.
    pub target_spin: f32,
    /// Velocity range for fillers.
    pub filler_speed: f32,
    /// Angular velocity range for fillers.
    pub filler_spin: f32,
    /// Lowest filler opacity; fillers draw from `[min, 1)`.
    pub filler_min_opacity: f32,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            filler_count: 150,
            filler_alphabet: FILLER_ALPHABET.to_string(),
            target_volume: Vec3::new(140.0, 90.0, 60.0),
            filler_volume: Vec3::new(200.0, 120.0, 100.0),
            target_speed: 0.3,
            target_spin: 0.04,
            filler_speed: 0.2,
            filler_spin: 0.03,
            filler_min_opacity: 0.5,
        }
    }
}

/// Bounding box of the current layout, consumed by the settle fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct LayoutBounds {
    /// Layout width (the wrap width).
    pub total_width: f32,
    /// Quote block height plus the author gap.
    pub total_height: f32,
}

/// Inputs shared by every pool build.
pub struct PoolInputs<'a> {
    /// Spawn volumes and filler settings.
    pub spawn: &'a SpawnParams,
    /// Layout constants (glyph height, author scale).
    pub layout: &'a LayoutParams,
    /// Glyph source for fillers.
    pub rasterizer: &'a mut dyn GlyphRasterizer,
    /// Font family passed to the rasterizer.
    pub family: &'a str,
    /// Randomness for spawn placement.
    pub rng: &'a mut dyn RngCore,
}

/// Owner of every particle and of every glyph image backing them.
///
/// The whole pool is replaced on quote change; [`ParticlePool::rebuild`] releases the previous
/// particles and textures before creating new ones.
#[derive(Debug, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    textures: TextureRegistry,
    bounds: LayoutBounds,
}

impl ParticlePool {
    /// Empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every particle and release every texture. Returns the number of textures dropped.
    pub fn dispose_all(&mut self) -> usize {
        self.particles.clear();
        self.bounds = LayoutBounds::default();
        let released = self.textures.release_all();
        if released > 0 {
            tracing::debug!(released, "particle pool disposed");
        }
        released
    }

    /// Replace the pool contents with particles for `layout` plus `spawn.filler_count` fillers.
    ///
    /// Anything still pooled is disposed first. Callers that rasterize `layout` themselves should
    /// call [`ParticlePool::dispose_all`] before doing so.
    #[tracing::instrument(level = "debug", skip_all, fields(glyphs = layout.glyph_count()))]
    pub fn rebuild(&mut self, layout: TextLayout, inputs: PoolInputs<'_>) {
        let released = self.dispose_all();

        let PoolInputs {
            spawn,
            layout: params,
            rasterizer,
            family,
            rng,
        } = inputs;

        self.bounds = LayoutBounds {
            total_width: layout.total_width,
            total_height: layout.total_height,
        };

        let glyphs = layout.into_glyphs();
        self.particles.reserve(glyphs.len() + spawn.filler_count);
        for glyph in glyphs {
            let scale = match glyph.role {
                GlyphRole::Quote => 1.0,
                GlyphRole::Author => params.author_scale,
            };
            let size = Vec2::new(glyph.width, params.base_size);
            let texture = self.textures.insert(glyph.image);
            self.particles.push(Particle {
                ch: glyph.ch,
                role: glyph.role.into(),
                texture,
                size,
                position: centered_vec3(rng, spawn.target_volume),
                rotation: random_angles(rng),
                velocity: centered_vec3(rng, Vec3::splat(spawn.target_speed)),
                angular_velocity: centered_vec3(rng, Vec3::splat(spawn.target_spin)),
                scale: 1.0,
                opacity: 1.0,
                target: Some(SettleTarget {
                    position: glyph.target,
                    scale,
                }),
            });
        }

        let alphabet: Vec<char> = spawn.filler_alphabet.chars().collect();
        if !alphabet.is_empty() {
            for _ in 0..spawn.filler_count {
                let ch = alphabet[rng.random_range(0..alphabet.len())];
                let image = rasterizer.rasterize(ch, family);
                let size = Vec2::new(params.base_size * image.aspect(), params.base_size);
                let texture = self.textures.insert(image);
                let min = spawn.filler_min_opacity.clamp(0.0, 1.0);
                self.particles.push(Particle {
                    ch,
                    role: ParticleRole::Filler,
                    texture,
                    size,
                    position: centered_vec3(rng, spawn.filler_volume),
                    rotation: random_angles(rng),
                    velocity: centered_vec3(rng, Vec3::splat(spawn.filler_speed)),
                    angular_velocity: centered_vec3(rng, Vec3::splat(spawn.filler_spin)),
                    scale: 1.0,
                    opacity: min + rng.random::<f32>() * (1.0 - min),
                    target: None,
                });
            }
        }

        tracing::debug!(
            released,
            particles = self.particles.len(),
            textures = self.textures.len(),
            "particle pool rebuilt"
        );
    }

    /// All particles: targets in layout order, then fillers.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for physics and tweening.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Return `true` when the pool holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Bounding box of the layout the pool was built from.
    pub fn bounds(&self) -> LayoutBounds {
        self.bounds
    }

    /// Glyph image behind `id`, if it belongs to the current pool.
    pub fn texture(&self, id: TextureId) -> Option<&GlyphImage> {
        self.textures.get(id)
    }

    /// Texture allocation counters.
    pub fn texture_stats(&self) -> TextureStats {
        self.textures.stats()
    }

    /// Number of live textures.
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Snapshot of every particle for rendering.
    pub fn transforms(&self) -> Vec<ParticleTransform> {
        self.particles.iter().map(ParticleTransform::from).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/pool.rs"]
mod tests;
