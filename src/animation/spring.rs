use crate::foundation::error::{ScrollFxError, ScrollFxResult};

/// Damping ratio floor applied during integration.
///
/// Keeps `damping = 0` configurations decaying toward rest instead of ringing forever.
pub const MIN_DAMPING_RATIO: f64 = 0.05;

const CRITICAL_EPS: f64 = 1e-6;

/// Physical parameters of a damped spring.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Spring constant (`> 0`).
    pub stiffness: f64,
    /// Viscous damping coefficient (`>= 0`).
    pub damping: f64,
    /// Moving mass (`> 0`).
    pub mass: f64,
    /// Distance to target below which the spring may come to rest.
    pub rest_delta: f64,
    /// Speed below which the spring may come to rest.
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            rest_delta: 0.01,
            rest_speed: 0.01,
        }
    }
}

impl SpringConfig {
    /// Smoothing used for parallax section channels.
    pub const SECTION: Self = Self {
        stiffness: 100.0,
        damping: 30.0,
        mass: 1.0,
        rest_delta: 0.001,
        rest_speed: 0.01,
    };

    /// Smoothing used for the page scroll indicator.
    pub const PROGRESS_BAR: Self = Self {
        stiffness: 150.0,
        damping: 30.0,
        mass: 1.0,
        rest_delta: 0.001,
        rest_speed: 0.01,
    };

    /// Bouncy pop used by staggered headline letters.
    pub const LETTER: Self = Self {
        stiffness: 200.0,
        damping: 12.0,
        mass: 1.0,
        rest_delta: 0.01,
        rest_speed: 0.01,
    };

    /// Springy spin-in for card icons.
    pub const ICON: Self = Self {
        stiffness: 200.0,
        damping: 10.0,
        mass: 1.0,
        rest_delta: 0.01,
        rest_speed: 0.01,
    };

    /// Short, nearly critical settle for scale and offset entrances without a set duration.
    pub const POP: Self = Self {
        stiffness: 500.0,
        damping: 25.0,
        mass: 1.0,
        rest_delta: 0.01,
        rest_speed: 0.01,
    };

    /// Build a validated config with default mass and rest thresholds.
    pub fn new(stiffness: f64, damping: f64) -> ScrollFxResult<Self> {
        let c = Self {
            stiffness,
            damping,
            ..Self::default()
        };
        c.validate()?;
        Ok(c)
    }

    /// Override the mass.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Override both rest thresholds.
    pub fn with_rest(mut self, rest_delta: f64, rest_speed: f64) -> Self {
        self.rest_delta = rest_delta;
        self.rest_speed = rest_speed;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> ScrollFxResult<()> {
        fn finite(name: &str, v: f64) -> ScrollFxResult<()> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(ScrollFxError::animation(format!(
                    "spring {name} must be finite"
                )))
            }
        }

        finite("stiffness", self.stiffness)?;
        finite("damping", self.damping)?;
        finite("mass", self.mass)?;
        finite("rest_delta", self.rest_delta)?;
        finite("rest_speed", self.rest_speed)?;
        if self.stiffness <= 0.0 {
            return Err(ScrollFxError::animation("spring stiffness must be > 0"));
        }
        if self.damping < 0.0 {
            return Err(ScrollFxError::animation("spring damping must be >= 0"));
        }
        if self.mass <= 0.0 {
            return Err(ScrollFxError::animation("spring mass must be > 0"));
        }
        if self.rest_delta <= 0.0 || self.rest_speed <= 0.0 {
            return Err(ScrollFxError::animation(
                "spring rest thresholds must be > 0",
            ));
        }
        Ok(())
    }

    /// Undamped angular frequency.
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Damping ratio after applying [`MIN_DAMPING_RATIO`].
    pub fn effective_damping_ratio(&self) -> f64 {
        let zeta = self.damping / (2.0 * (self.stiffness * self.mass).sqrt());
        zeta.max(MIN_DAMPING_RATIO)
    }
}

/// One smoothed channel: a damped oscillator chasing `target`.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    value: f64,
    velocity: f64,
    target: f64,
    config: SpringConfig,
    at_rest: bool,
}

impl Spring {
    /// Spring resting at `initial`.
    pub fn new(config: SpringConfig, initial: f64) -> Self {
        Self {
            value: initial,
            velocity: 0.0,
            target: initial,
            config,
            at_rest: true,
        }
    }

    /// Current smoothed value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current velocity in units per second.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Value the spring is moving toward.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Parameters in use.
    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    /// True once the spring has settled on its target.
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Move the target; the spring keeps its current value and velocity.
    pub fn set_target(&mut self, target: f64) {
        if !target.is_finite() {
            return;
        }
        if target != self.target {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Snap to `value` with zero velocity.
    pub fn jump(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Integrate over `dt` seconds using the closed-form oscillator solution.
    pub fn advance(&mut self, dt: f64) {
        if self.at_rest || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        let (x, v) = oscillator_step(
            &self.config,
            self.value - self.target,
            self.velocity,
            dt,
        );
        self.value = self.target + x;
        self.velocity = v;

        if x.abs() < self.config.rest_delta && v.abs() < self.config.rest_speed {
            self.value = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

/// Exact solution of `m x'' + c x' + k x = 0` after `t` seconds from `(x0, v0)`.
fn oscillator_step(config: &SpringConfig, x0: f64, v0: f64, t: f64) -> (f64, f64) {
    let w0 = config.natural_frequency();
    let zeta = config.effective_damping_ratio();

    if (zeta - 1.0).abs() < CRITICAL_EPS {
        let e = (-w0 * t).exp();
        let b = v0 + w0 * x0;
        let x = e * (x0 + b * t);
        let v = e * (v0 - w0 * b * t);
        return (x, v);
    }

    if zeta < 1.0 {
        let a = zeta * w0;
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let e = (-a * t).exp();
        let (sin, cos) = (wd * t).sin_cos();
        let x = e * (x0 * cos + ((v0 + a * x0) / wd) * sin);
        let v = e * (v0 * cos - ((a * v0 + w0 * w0 * x0) / wd) * sin);
        return (x, v);
    }

    // Overdamped: r1 * r2 = w0^2, computed without cancellation for large zeta.
    let root = (zeta * zeta - 1.0).sqrt();
    let r2 = -w0 * (zeta + root);
    let r1 = -w0 / (zeta + root);
    let c1 = (v0 - r2 * x0) / (r1 - r2);
    let c2 = x0 - c1;
    let e1 = (r1 * t).exp();
    let e2 = (r2 * t).exp();
    (c1 * e1 + c2 * e2, r1 * c1 * e1 + r2 * c2 * e2)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
