use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::{TickRate, Vec3, Viewport};
use crate::foundation::error::{SwarmError, SwarmResult};
use crate::layout::text::LayoutParams;
use crate::physics::roam::RoamParams;
use crate::scene::backdrop::BackdropParams;
use crate::scene::camera::CameraParams;
use crate::scene::pool::SpawnParams;
use crate::session::transition::TransitionParams;

/// Font selection for the glyph rasterizer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Family identifier passed to the rasterizer.
    pub family: String,
    /// Font file to load. Without one the font-free block rasterizer is used.
    pub path: Option<PathBuf>,
    /// Font size the glyph canvases are rasterized at.
    pub raster_size_px: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Unbounded".to_string(),
            path: None,
            raster_size_px: crate::assets::glyph::REFERENCE_SIZE_PX,
        }
    }
}

/// Complete, JSON-loadable configuration of a hero scene.
///
/// Every section is optional in the JSON document; missing fields take the defaults of the
/// shipped scene.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Text layout constants.
    pub layout: LayoutParams,
    /// Particle spawn volumes, speeds and filler settings.
    pub spawn: SpawnParams,
    /// Free-roam physics constants.
    pub physics: RoamParams,
    /// Settle/scatter timings and fit ratios.
    pub transitions: TransitionParams,
    /// Perspective camera looking down -z at the layout plane.
    pub camera: CameraParams,
    /// Initial viewport size in pixels.
    pub viewport: Viewport,
    /// Background grid constants.
    pub backdrop: BackdropParams,
    /// Glyph font selection.
    pub font: FontConfig,
    /// Fixed simulation rate.
    pub tick_rate: TickRate,
}

impl SceneConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SwarmResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SwarmError::config(format!("parse scene config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SwarmResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SwarmError::config(format!("open scene config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check numeric ranges that the engine relies on.
    pub fn validate(&self) -> SwarmResult<()> {
        let l = &self.layout;
        positive("layout.base_size", l.base_size)?;
        positive("layout.max_row_width", l.max_row_width)?;
        positive("layout.line_height", l.line_height)?;
        positive("layout.author_scale", l.author_scale)?;
        non_negative("layout.kerning", l.kerning)?;
        non_negative("layout.author_kerning", l.author_kerning)?;
        non_negative("layout.space_ratio", l.space_ratio)?;

        let s = &self.spawn;
        if s.filler_count > 0 && s.filler_alphabet.chars().next().is_none() {
            return Err(SwarmError::config(
                "spawn.filler_alphabet must be non-empty when filler_count > 0",
            ));
        }
        finite_vec3("spawn.target_volume", s.target_volume)?;
        finite_vec3("spawn.filler_volume", s.filler_volume)?;
        non_negative("spawn.target_speed", s.target_speed)?;
        non_negative("spawn.target_spin", s.target_spin)?;
        non_negative("spawn.filler_speed", s.filler_speed)?;
        non_negative("spawn.filler_spin", s.filler_spin)?;
        if !(0.0..=1.0).contains(&s.filler_min_opacity) {
            return Err(SwarmError::config("spawn.filler_min_opacity must be in [0, 1]"));
        }

        let p = &self.physics;
        non_negative("physics.collision_radius", p.collision_radius)?;
        non_negative("physics.collision_impulse", p.collision_impulse)?;
        non_negative("physics.collision_spin", p.collision_spin)?;
        non_negative("physics.repel_radius", p.repel_radius)?;
        non_negative("physics.repel_strength", p.repel_strength)?;
        non_negative("physics.repel_spin", p.repel_spin)?;
        non_negative("physics.min_speed", p.min_speed)?;
        non_negative("physics.jitter", p.jitter)?;
        if !(p.damping > 0.0 && p.damping <= 1.0) {
            return Err(SwarmError::config("physics.damping must be in (0, 1]"));
        }
        if !p.bounds.is_finite() || p.bounds.min_element() <= 0.0 {
            return Err(SwarmError::config("physics.bounds must be > 0 on every axis"));
        }

        let t = &self.transitions;
        positive("transitions.max_scale", t.max_scale)?;
        positive("transitions.fit_width", t.fit_width)?;
        positive("transitions.fit_height", t.fit_height)?;
        for (name, v) in [
            ("transitions.settle_duration", t.settle_duration),
            ("transitions.settle_stagger", t.settle_stagger),
            ("transitions.settle_rotation_duration", t.settle_rotation_duration),
            ("transitions.settle_scale_duration", t.settle_scale_duration),
            ("transitions.filler_exit_duration", t.filler_exit_duration),
            ("transitions.filler_exit_spread", t.filler_exit_spread),
            ("transitions.filler_exit_depth", t.filler_exit_depth),
            ("transitions.filler_fade_duration", t.filler_fade_duration),
            ("transitions.filler_fade_delay", t.filler_fade_delay),
            ("transitions.scatter_speed", t.scatter_speed),
            ("transitions.scatter_spin", t.scatter_spin),
            ("transitions.scatter_duration", t.scatter_duration),
            ("transitions.scatter_spread", t.scatter_spread),
            ("transitions.scatter_depth", t.scatter_depth),
            ("transitions.scatter_depth_jitter", t.scatter_depth_jitter),
            ("transitions.reroll_delay", t.reroll_delay),
        ] {
            non_negative(name, v)?;
        }

        let c = &self.camera;
        if !(c.fov_deg > 0.0 && c.fov_deg < 180.0) {
            return Err(SwarmError::config("camera.fov_deg must be in (0, 180)"));
        }
        positive("camera.distance", c.distance)?;

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(SwarmError::config("viewport dimensions must be > 0"));
        }
        positive("font.raster_size_px", self.font.raster_size_px)?;
        positive("backdrop.spacing", self.backdrop.spacing)?;
        if self.tick_rate.0 == 0 {
            return Err(SwarmError::config("tick_rate must be > 0"));
        }
        Ok(())
    }
}

fn positive(name: &str, v: f32) -> SwarmResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(SwarmError::config(format!("{name} must be finite and > 0")))
    }
}

fn non_negative(name: &str, v: f32) -> SwarmResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(SwarmError::config(format!("{name} must be finite and >= 0")))
    }
}

fn finite_vec3(name: &str, v: Vec3) -> SwarmResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(SwarmError::config(format!("{name} must be finite on every axis")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/config.rs"]
mod tests;
