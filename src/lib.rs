//! Typeswarm is the engine behind an animated typographic hero scene.
//!
//! A quote and its author are rasterized glyph by glyph, laid out into centered, word-wrapped
//! lines and turned into 3D particles. The particles roam under a small physics step (pointer
//! repulsion, pairwise collision, wall bounce, damping) until the host asks them to settle into
//! the legible layout; a scatter throws them off again and re-rolls the quote.
//!
//! - Build a [`HeroScene`] from a [`SceneConfig`], a quote list and a [`GlyphRasterizer`]
//! - Call [`HeroScene::tick`] once per frame, [`HeroScene::settle`] / [`HeroScene::scatter`] on
//!   user input
//! - Read [`HeroScene::transforms`] for rendering, or use [`render_preview`] for a CPU frame
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod animation;
pub(crate) mod config;
pub(crate) mod layout;
/// Free-roam physics.
pub mod physics;
/// CPU preview rendering.
pub mod render;
/// Particles, camera, pool and backdrop.
pub mod scene;
/// Scene context and transitions.
pub mod session;

pub use crate::foundation::core::{Rgba8, TickRate, Vec2, Vec3, Viewport};
pub use crate::foundation::error::{SwarmError, SwarmResult};
pub use crate::foundation::math::SceneRng;

pub use crate::animation::ease::Ease;
pub use crate::animation::tween::{Lerp, Tween};
pub use crate::assets::glyph::{
    BlockRasterizer, FontRasterizer, GlyphImage, GlyphRasterizer, REFERENCE_SIZE_PX,
    rasterizer_for,
};
pub use crate::assets::quotes::{
    JsonFileQuotes, Quote, QuoteSource, StaticQuotes, fallback_quotes, load_quotes,
};
pub use crate::assets::registry::{TextureId, TextureRegistry, TextureStats};
pub use crate::config::{FontConfig, SceneConfig};
pub use crate::layout::text::{Glyph, GlyphRole, LayoutParams, Line, TextLayout, Word, layout};
pub use crate::physics::roam::RoamParams;
pub use crate::render::preview::{PreviewFrame, PreviewStyle, render_preview};
pub use crate::scene::camera::{Camera, CameraParams};
pub use crate::scene::particle::{Particle, ParticleRole, ParticleTransform, SettleTarget};
pub use crate::scene::pool::{ParticlePool, PoolInputs, SpawnParams};
pub use crate::session::hero::{HeroScene, SceneMetrics, SceneState};
pub use crate::session::transition::TransitionParams;
