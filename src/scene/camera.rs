use crate::foundation::core::{Vec2, Vec3, Viewport};

/// Perspective camera placement. The camera sits on the +z axis looking at the origin.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraParams {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Distance from the z = 0 layout plane.
    pub distance: f32,
    /// Near clip distance.
    pub near: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov_deg: 50.0,
            distance: 70.0,
            near: 0.1,
        }
    }
}

/// A point projected onto the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Position in pixels, origin top-left.
    pub px: Vec2,
    /// Pixels per scene unit at the point's depth.
    pub px_per_unit: f32,
    /// Distance along the view axis.
    pub depth: f32,
}

/// Camera bound to the current viewport aspect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    params: CameraParams,
    viewport: Viewport,
}

impl Camera {
    /// Camera for `viewport` with placement `params`.
    pub fn new(params: CameraParams, viewport: Viewport) -> Self {
        Self { params, viewport }
    }

    /// Update the viewport after a resize.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Camera position in scene space.
    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.params.distance)
    }

    fn half_tan(&self) -> f32 {
        (self.params.fov_deg.to_radians() / 2.0).tan()
    }

    /// Width and height of the z = 0 plane visible through the camera.
    pub fn visible_extent(&self) -> Vec2 {
        let h = 2.0 * self.half_tan() * self.params.distance;
        Vec2::new(h * self.viewport.aspect(), h)
    }

    /// Unit direction of the ray through normalized device coordinates `ndc`.
    pub fn ray_dir(&self, ndc: Vec2) -> Vec3 {
        let t = self.half_tan();
        Vec3::new(ndc.x * t * self.viewport.aspect(), ndc.y * t, -1.0).normalize()
    }

    /// Intersect the ray through `ndc` with the z = 0 plane.
    pub fn pick_plane(&self, ndc: Vec2) -> Option<Vec3> {
        let origin = self.position();
        let dir = self.ray_dir(ndc);
        if dir.z.abs() < f32::EPSILON {
            return None;
        }
        let t = -origin.z / dir.z;
        if t < 0.0 {
            return None;
        }
        Some(origin + dir * t)
    }

    /// Project a scene-space point into viewport pixels. `None` behind the near plane.
    pub fn project(&self, p: Vec3) -> Option<Projected> {
        let depth = self.params.distance - p.z;
        if depth <= self.params.near {
            return None;
        }
        let t = self.half_tan();
        let ndc = Vec2::new(p.x / (depth * t * self.viewport.aspect()), p.y / (depth * t));
        let w = self.viewport.width as f32;
        let h = self.viewport.height as f32;
        Some(Projected {
            px: Vec2::new((ndc.x + 1.0) / 2.0 * w, (1.0 - ndc.y) / 2.0 * h),
            px_per_unit: h / (2.0 * depth * t),
            depth,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/camera.rs"]
mod tests;
