use rand::Rng;

use crate::assets::glyph::{GlyphImage, GlyphRasterizer};
use crate::assets::quotes::{Quote, fallback_quotes};
use crate::assets::registry::{TextureId, TextureStats};
use crate::config::SceneConfig;
use crate::foundation::core::{Vec2, Vec3, Viewport};
use crate::foundation::error::SwarmResult;
use crate::foundation::math::SceneRng;
use crate::layout::text::layout;
use crate::physics::roam;
use crate::scene::backdrop::Backdrop;
use crate::scene::camera::Camera;
use crate::scene::particle::{Particle, ParticleTransform};
use crate::scene::pool::{ParticlePool, PoolInputs};
use crate::session::transition::{
    TransitionPlan, pick_next_index, scale_factor, scatter_plan, settle_plan,
};

/// Phase of the hero scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SceneState {
    /// Particles move under free-roam physics.
    Roaming,
    /// Letters are tweening into the layout; fillers are leaving.
    Settling,
    /// The quote is legible and static.
    Settled,
    /// Letters are flying off; the next quote is built when the re-roll timer fires.
    Scattering,
}

/// Last known pointer position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    /// Position in viewport pixels.
    pub px: Vec2,
    /// Hit of the pointer ray on the z = 0 plane.
    pub world: Option<Vec3>,
}

/// Geometry and bookkeeping of the current frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SceneMetrics {
    /// Layout width of the current quote.
    pub total_width: f32,
    /// Layout height of the current quote including the author gap.
    pub total_height: f32,
    /// Scale a settle would use for the current viewport.
    pub scale_factor: f32,
    /// Visible extent of the z = 0 plane.
    pub visible_width: f32,
    /// Visible extent of the z = 0 plane.
    pub visible_height: f32,
    /// Particles in the pool.
    pub particles: usize,
    /// Textures alive in the pool.
    pub live_textures: usize,
    /// Index of the displayed quote.
    pub quote_index: usize,
    /// Current phase.
    pub state: SceneState,
    /// Ticks since the scene was created.
    pub ticks: u64,
}

/// Scene context: quotes, particle pool, camera, pointer and the settle/scatter state machine.
///
/// The host drives it with one [`HeroScene::tick`] per frame. Triggers and input callbacks are
/// plain method calls between ticks; nothing runs in the background.
pub struct HeroScene {
    cfg: SceneConfig,
    camera: Camera,
    backdrop: Backdrop,
    quotes: Vec<Quote>,
    quote_index: usize,
    pool: ParticlePool,
    state: SceneState,
    rng: SceneRng,
    rasterizer: Box<dyn GlyphRasterizer>,
    plan: Option<TransitionPlan>,
    plan_started: u64,
    reroll_at: Option<u64>,
    ticks: u64,
    pointer: Option<Pointer>,
}

impl std::fmt::Debug for HeroScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeroScene")
            .field("state", &self.state)
            .field("quote_index", &self.quote_index)
            .field("particles", &self.pool.len())
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl HeroScene {
    /// Validate `cfg`, pick a random starting quote and build its particles.
    ///
    /// An empty `quotes` list is replaced by the built-in fallback quotes.
    #[tracing::instrument(level = "debug", skip_all, fields(quotes = quotes.len()))]
    pub fn new(
        cfg: SceneConfig,
        quotes: Vec<Quote>,
        rasterizer: Box<dyn GlyphRasterizer>,
        mut rng: SceneRng,
    ) -> SwarmResult<Self> {
        cfg.validate()?;
        let quotes = if quotes.is_empty() {
            tracing::warn!("no quotes supplied, using fallback quotes");
            fallback_quotes()
        } else {
            quotes
        };
        let quote_index = rng.random_range(0..quotes.len());
        let camera = Camera::new(cfg.camera, cfg.viewport);
        let backdrop = Backdrop::new(cfg.backdrop, cfg.viewport);

        let mut scene = Self {
            cfg,
            camera,
            backdrop,
            quotes,
            quote_index,
            pool: ParticlePool::new(),
            state: SceneState::Roaming,
            rng,
            rasterizer,
            plan: None,
            plan_started: 0,
            reroll_at: None,
            ticks: 0,
            pointer: None,
        };
        scene.rebuild();
        Ok(scene)
    }

    fn rebuild(&mut self) {
        let Self {
            cfg,
            quotes,
            quote_index,
            pool,
            rasterizer,
            rng,
            ..
        } = self;
        pool.dispose_all();
        let quote = &quotes[*quote_index];
        let text = layout(
            &quote.text,
            &quote.author,
            &cfg.layout,
            rasterizer.as_mut(),
            &cfg.font.family,
        );
        pool.rebuild(
            text,
            PoolInputs {
                spawn: &cfg.spawn,
                layout: &cfg.layout,
                rasterizer: rasterizer.as_mut(),
                family: &cfg.font.family,
                rng: rng.as_mut(),
            },
        );
    }

    /// Advance the scene by one tick and return the phase after it.
    pub fn tick(&mut self) -> SceneState {
        self.ticks += 1;
        self.backdrop.step(self.pointer.map(|p| p.px));

        match self.state {
            SceneState::Roaming => {
                let pointer = self.pointer.and_then(|p| p.world);
                roam::step(
                    self.pool.particles_mut(),
                    pointer,
                    &self.cfg.physics,
                    self.rng.as_mut(),
                );
            }
            SceneState::Settling => {
                if self.advance_plan() {
                    self.state = SceneState::Settled;
                    tracing::debug!(ticks = self.ticks, "scene settled");
                }
            }
            SceneState::Settled => {}
            SceneState::Scattering => {
                self.advance_plan();
                if self.reroll_at.is_some_and(|at| self.ticks >= at) {
                    self.reroll();
                }
            }
        }
        self.state
    }

    fn plan_elapsed(&self) -> f32 {
        self.ticks.saturating_sub(self.plan_started) as f32 * self.cfg.tick_rate.tick_secs()
    }

    fn advance_plan(&mut self) -> bool {
        let elapsed = self.plan_elapsed();
        let Some(plan) = &self.plan else {
            return true;
        };
        let done = plan.is_done(elapsed);
        if done {
            plan.finish(self.pool.particles_mut());
            self.plan = None;
        } else {
            plan.apply(self.pool.particles_mut(), elapsed);
        }
        done
    }

    fn reroll(&mut self) {
        let previous = self.quote_index;
        self.quote_index = pick_next_index(self.quotes.len(), previous, self.rng.as_mut());
        self.plan = None;
        self.reroll_at = None;
        self.rebuild();
        self.state = SceneState::Roaming;
        tracing::debug!(previous, next = self.quote_index, "quote re-rolled");
    }

    /// Start settling the letters into the layout. Returns `false` (and does nothing) unless
    /// the scene is roaming.
    pub fn settle(&mut self) -> bool {
        if self.state != SceneState::Roaming {
            tracing::debug!(state = ?self.state, "settle ignored");
            return false;
        }
        let scale = self.scale_factor();
        self.plan = Some(settle_plan(
            self.pool.particles_mut(),
            scale,
            &self.cfg.transitions,
        ));
        self.plan_started = self.ticks;
        self.state = SceneState::Settling;
        tracing::debug!(scale, "settle started");
        true
    }

    /// Scatter the settled letters and schedule the next quote. Returns `false` (and does
    /// nothing) unless the scene is settled.
    pub fn scatter(&mut self) -> bool {
        if self.state != SceneState::Settled {
            tracing::debug!(state = ?self.state, "scatter ignored");
            return false;
        }
        self.plan = Some(scatter_plan(
            self.pool.particles_mut(),
            &self.cfg.transitions,
            self.rng.as_mut(),
        ));
        self.plan_started = self.ticks;
        let delay = self
            .cfg
            .tick_rate
            .secs_to_ticks_ceil(self.cfg.transitions.reroll_delay)
            .max(1);
        self.reroll_at = Some(self.ticks + delay);
        self.state = SceneState::Scattering;
        tracing::debug!(reroll_in_ticks = delay, "scatter started");
        true
    }

    /// Record the pointer position in viewport pixels (origin top-left).
    pub fn on_pointer_move(&mut self, x_px: f32, y_px: f32) {
        let ndc = self.camera.viewport().pixel_to_ndc(x_px, y_px);
        self.pointer = Some(Pointer {
            px: Vec2::new(x_px, y_px),
            world: self.camera.pick_plane(ndc),
        });
    }

    /// Forget the pointer; roaming and the backdrop stop reacting to it.
    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
    }

    /// Adopt a new viewport size. Camera aspect, backdrop lattice and the pointer hit follow.
    pub fn on_resize(&mut self, width_px: u32, height_px: u32) -> SwarmResult<()> {
        let viewport = Viewport::new(width_px, height_px)?;
        self.camera.set_viewport(viewport);
        self.backdrop.resize(viewport);
        if let Some(p) = self.pointer {
            self.on_pointer_move(p.px.x, p.px.y);
        }
        tracing::debug!(width_px, height_px, "viewport resized");
        Ok(())
    }

    /// Scale a settle would use right now.
    pub fn scale_factor(&self) -> f32 {
        scale_factor(
            self.camera.visible_extent(),
            self.pool.bounds(),
            &self.cfg.transitions,
        )
    }

    /// Render snapshot of every particle.
    pub fn transforms(&self) -> Vec<ParticleTransform> {
        self.pool.transforms()
    }

    /// Particles in pool order.
    pub fn particles(&self) -> &[Particle] {
        self.pool.particles()
    }

    /// Geometry and bookkeeping of the current frame.
    pub fn metrics(&self) -> SceneMetrics {
        let bounds = self.pool.bounds();
        let visible = self.camera.visible_extent();
        SceneMetrics {
            total_width: bounds.total_width,
            total_height: bounds.total_height,
            scale_factor: self.scale_factor(),
            visible_width: visible.x,
            visible_height: visible.y,
            particles: self.pool.len(),
            live_textures: self.pool.live_textures(),
            quote_index: self.quote_index,
            state: self.state,
            ticks: self.ticks,
        }
    }

    /// Glyph image behind a particle's texture handle.
    pub fn texture(&self, id: TextureId) -> Option<&GlyphImage> {
        self.pool.texture(id)
    }

    /// Texture allocation counters of the pool.
    pub fn texture_stats(&self) -> TextureStats {
        self.pool.texture_stats()
    }

    /// Current phase.
    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Index of the displayed quote.
    pub fn quote_index(&self) -> usize {
        self.quote_index
    }

    /// Displayed quote.
    pub fn quote(&self) -> &Quote {
        &self.quotes[self.quote_index]
    }

    /// Quote list in use.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Camera bound to the current viewport.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Background spring grid.
    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    /// Last pointer position, if any.
    pub fn pointer(&self) -> Option<Pointer> {
        self.pointer
    }

    /// Configuration the scene was built with.
    pub fn config(&self) -> &SceneConfig {
        &self.cfg
    }

    /// Ticks since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Release every particle and texture. Returns the number of textures released.
    pub fn teardown(mut self) -> usize {
        let released = self.pool.dispose_all();
        tracing::debug!(released, ticks = self.ticks, "scene torn down");
        released
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/hero.rs"]
mod tests;
