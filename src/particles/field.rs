use crate::{
    foundation::core::{Point, Vec2, Viewport},
    foundation::error::{ScrollFxError, ScrollFxResult},
    foundation::rng::Rng64,
};

/// Particle field parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Viewports narrower than this use `narrow_count` particles.
    pub narrow_breakpoint: f64,
    /// Particle count on narrow viewports.
    pub narrow_count: usize,
    /// Particle count otherwise.
    pub wide_count: usize,
    /// Velocity components are drawn from `[-speed / 2, speed / 2)` pixels per step.
    pub speed: f64,
    /// Smallest disc radius.
    pub radius_min: f64,
    /// Largest disc radius (exclusive).
    pub radius_max: f64,
    /// Pairs closer than this are joined by a line.
    pub link_distance: f64,
    /// Stroke width of joining lines.
    pub link_width: f64,
    /// Advance the simulation on every `step_every`-th display frame.
    pub step_every: u32,
    /// Seed for positions, velocities and radii.
    pub seed: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            narrow_breakpoint: 768.0,
            narrow_count: 20,
            wide_count: 40,
            speed: 0.3,
            radius_min: 0.5,
            radius_max: 2.5,
            link_distance: 100.0,
            link_width: 0.5,
            step_every: 2,
            seed: 0x5EED,
        }
    }
}

/// Upper bound on particles; pair checks are quadratic.
pub const MAX_PARTICLES: usize = 256;

impl FieldConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> ScrollFxResult<()> {
        if self.narrow_count > MAX_PARTICLES || self.wide_count > MAX_PARTICLES {
            return Err(ScrollFxError::simulation(format!(
                "particle count must be <= {MAX_PARTICLES}"
            )));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ScrollFxError::simulation("particle speed must be >= 0"));
        }
        if !(self.radius_min.is_finite() && self.radius_max.is_finite())
            || self.radius_min < 0.0
            || self.radius_max < self.radius_min
        {
            return Err(ScrollFxError::simulation(
                "particle radii must satisfy 0 <= radius_min <= radius_max",
            ));
        }
        if !self.link_distance.is_finite() || self.link_distance <= 0.0 {
            return Err(ScrollFxError::simulation("link distance must be > 0"));
        }
        if !self.link_width.is_finite() || self.link_width <= 0.0 {
            return Err(ScrollFxError::simulation("link width must be > 0"));
        }
        if self.step_every == 0 {
            return Err(ScrollFxError::simulation("step_every must be >= 1"));
        }
        Ok(())
    }

    /// Particle count for a viewport.
    pub fn count_for(&self, viewport: Viewport) -> usize {
        if viewport.width < self.narrow_breakpoint {
            self.narrow_count
        } else {
            self.wide_count
        }
    }
}

/// One moving point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in viewport pixels.
    pub pos: Point,
    /// Displacement per simulation step.
    pub vel: Vec2,
    /// Disc radius.
    pub radius: f64,
}

/// Proximity join between particles `a` and `b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    /// Index of the first particle.
    pub a: usize,
    /// Index of the second particle (`> a`).
    pub b: usize,
    /// `1` at distance zero, `0` at the link distance.
    pub strength: f64,
}

/// Fixed set of bouncing particles inside a rectangular area.
#[derive(Clone, Debug)]
pub struct ParticleField {
    config: FieldConfig,
    bounds: Viewport,
    particles: Vec<Particle>,
    steps: u64,
}

impl ParticleField {
    /// Allocate particles for `viewport`.
    pub fn new(config: FieldConfig, viewport: Viewport) -> ScrollFxResult<Self> {
        config.validate()?;
        let n = config.count_for(viewport);
        let mut rng = Rng64::new(config.seed);
        let half = config.speed / 2.0;
        let particles = (0..n)
            .map(|_| Particle {
                pos: Point::new(
                    rng.range_f64(0.0, viewport.width),
                    rng.range_f64(0.0, viewport.height),
                ),
                vel: Vec2::new(rng.range_f64(-half, half), rng.range_f64(-half, half)),
                radius: rng.range_f64(config.radius_min, config.radius_max),
            })
            .collect();
        tracing::debug!(
            count = n,
            width = viewport.width,
            height = viewport.height,
            "particle field allocated"
        );
        Ok(Self {
            config,
            bounds: viewport,
            particles,
            steps: 0,
        })
    }

    /// Build from explicit particles; positions are clamped into `viewport`.
    pub fn from_particles(
        config: FieldConfig,
        viewport: Viewport,
        particles: Vec<Particle>,
    ) -> ScrollFxResult<Self> {
        config.validate()?;
        let mut field = Self {
            config,
            bounds: viewport,
            particles,
            steps: 0,
        };
        field.clamp_all();
        Ok(field)
    }

    /// Parameters in use.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Current area.
    pub fn bounds(&self) -> Viewport {
        self.bounds
    }

    /// Current particle states.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of steps taken.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance every particle by its velocity, reflecting off the edges.
    pub fn step(&mut self) {
        let (w, h) = (self.bounds.width, self.bounds.height);
        for p in &mut self.particles {
            let (x, vx) = reflect(p.pos.x + p.vel.x, p.vel.x, w);
            let (y, vy) = reflect(p.pos.y + p.vel.y, p.vel.y, h);
            p.pos = Point::new(x, y);
            p.vel = Vec2::new(vx, vy);
        }
        self.steps += 1;
    }

    /// Change the area; particles outside it are pulled back to the edge.
    pub fn resize(&mut self, viewport: Viewport) {
        self.bounds = viewport;
        self.clamp_all();
    }

    /// Every pair within the link distance.
    pub fn links(&self) -> Vec<Link> {
        let max = self.config.link_distance;
        let mut out = Vec::new();
        for (i, p) in self.particles.iter().enumerate() {
            for (j, q) in self.particles.iter().enumerate().skip(i + 1) {
                let d = p.pos.distance(q.pos);
                if d <= max {
                    out.push(Link {
                        a: i,
                        b: j,
                        strength: link_strength(d, max),
                    });
                }
            }
        }
        out
    }

    fn clamp_all(&mut self) {
        let (w, h) = (self.bounds.width, self.bounds.height);
        for p in &mut self.particles {
            p.pos = Point::new(clamp_axis(p.pos.x, w), clamp_axis(p.pos.y, h));
        }
    }
}

/// Linear fade: `1` at distance zero, `0` at `max` and beyond.
pub fn link_strength(distance: f64, max: f64) -> f64 {
    if !(max > 0.0) {
        return 0.0;
    }
    (1.0 - distance / max).clamp(0.0, 1.0)
}

fn clamp_axis(v: f64, len: f64) -> f64 {
    if !(len > 0.0) || !v.is_finite() {
        return 0.0;
    }
    v.clamp(0.0, len)
}

/// Fold an overshoot back inside `[0, len]` and point the velocity inward.
fn reflect(pos: f64, vel: f64, len: f64) -> (f64, f64) {
    if !(len > 0.0) {
        return (0.0, vel);
    }
    if pos < 0.0 {
        (clamp_axis(-pos, len), vel.abs())
    } else if pos > len {
        (clamp_axis(2.0 * len - pos, len), -vel.abs())
    } else {
        (pos, vel)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/field.rs"]
mod tests;
