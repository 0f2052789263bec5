use crate::foundation::core::{Vec2, Viewport};

/// Spring grid drawn behind the particles. Lengths are in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BackdropParams {
    /// Distance between neighbouring rest points.
    pub spacing: f32,
    /// Pointer influence radius.
    pub repel_radius: f32,
    /// Push at zero distance from the pointer.
    pub repel_force: f32,
    /// Spring stiffness pulling points back to rest.
    pub spring: f32,
    /// Velocity multiplier applied every step.
    pub damping: f32,
}

impl Default for BackdropParams {
    fn default() -> Self {
        Self {
            spacing: 60.0,
            repel_radius: 200.0,
            repel_force: 2.0,
            spring: 0.05,
            damping: 0.9,
        }
    }
}

/// One lattice point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPoint {
    /// Current position.
    pub pos: Vec2,
    /// Rest position.
    pub rest: Vec2,
    /// Velocity in pixels per step.
    pub vel: Vec2,
}

/// Viewport-covering lattice of damped springs pushed around by the pointer.
///
/// Points are stored column-major so right and bottom neighbours are found by index.
#[derive(Clone, Debug)]
pub struct Backdrop {
    params: BackdropParams,
    cols: usize,
    rows: usize,
    points: Vec<GridPoint>,
}

impl Backdrop {
    /// Grid covering `viewport`.
    pub fn new(params: BackdropParams, viewport: Viewport) -> Self {
        let mut out = Self {
            params,
            cols: 0,
            rows: 0,
            points: Vec::new(),
        };
        out.resize(viewport);
        out
    }

    /// Rebuild the lattice at rest for a new viewport size.
    ///
    /// One extra row and column past the viewport edge keep the border covered while points
    /// are displaced.
    pub fn resize(&mut self, viewport: Viewport) {
        let spacing = self.params.spacing.max(1.0);
        let count = |extent: u32| ((extent as f32 + spacing) / spacing).ceil() as usize;
        self.cols = count(viewport.width);
        self.rows = count(viewport.height);
        self.points.clear();
        self.points.reserve(self.cols * self.rows);
        for c in 0..self.cols {
            for r in 0..self.rows {
                let rest = Vec2::new(c as f32 * spacing, r as f32 * spacing);
                self.points.push(GridPoint {
                    pos: rest,
                    rest,
                    vel: Vec2::ZERO,
                });
            }
        }
    }

    /// Advance every point by one step. `pointer` is in pixels; `None` applies springs only.
    pub fn step(&mut self, pointer: Option<Vec2>) {
        let p = self.params;
        for pt in &mut self.points {
            if let Some(m) = pointer {
                let away = pt.pos - m;
                let d = away.length();
                if d < p.repel_radius && d > f32::EPSILON {
                    let force = (p.repel_radius - d) / p.repel_radius;
                    pt.vel += away / d * force * p.repel_force;
                }
            }
            pt.vel += (pt.rest - pt.pos) * p.spring;
            pt.vel *= p.damping;
            pt.pos += pt.vel;
        }
    }

    /// Lattice points, column-major.
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Lattice dimensions as `(columns, rows)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Line segments joining each point to its right and bottom neighbours.
    pub fn segments(&self) -> Vec<(Vec2, Vec2)> {
        let mut out = Vec::with_capacity(self.points.len() * 2);
        for c in 0..self.cols {
            for r in 0..self.rows {
                let here = self.points[c * self.rows + r].pos;
                if c + 1 < self.cols {
                    out.push((here, self.points[(c + 1) * self.rows + r].pos));
                }
                if r + 1 < self.rows {
                    out.push((here, self.points[c * self.rows + r + 1].pos));
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/backdrop.rs"]
mod tests;
