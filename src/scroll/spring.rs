use crate::foundation::error::{PlayerError, PlayerResult};

/// Parameters of the damped spring used to smooth raw scroll progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Spring constant pulling the value towards its target.
    pub stiffness: f64,
    /// Velocity-proportional friction.
    pub damping: f64,
    /// Inertia of the simulated body.
    pub mass: f64,
    /// Distance to target under which the spring may come to rest.
    pub rest_delta: f64,
    /// Speed under which the spring may come to rest.
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 30.0,
            mass: 1.0,
            rest_delta: 0.001,
            rest_speed: 0.01,
        }
    }
}

impl SpringConfig {
    pub fn validate(&self) -> PlayerResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.stiffness) {
            return Err(PlayerError::validation("spring stiffness must be > 0"));
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(PlayerError::validation("spring damping must be >= 0"));
        }
        if !positive(self.mass) {
            return Err(PlayerError::validation("spring mass must be > 0"));
        }
        if !positive(self.rest_delta) || !positive(self.rest_speed) {
            return Err(PlayerError::validation(
                "spring rest thresholds must be > 0",
            ));
        }
        Ok(())
    }
}

/// Second-order damped spring filter.
///
/// The raw signal is fed through [`Spring::set_target`]; [`Spring::step`] advances the
/// simulation by wall-clock time. The output may transiently overshoot the target when the spring
/// is under-damped.
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f64,
    velocity: f64,
    target: f64,
    at_rest: bool,
}

impl Spring {
    /// Largest integration step; longer frames are subdivided.
    const MAX_SUBSTEP_S: f64 = 1.0 / 240.0;

    /// Longest stretch of time one `step` simulates; longer gaps (a stalled host) are cut short.
    const MAX_STEP_S: f64 = 0.25;

    pub fn new(config: SpringConfig, initial: f64) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            at_rest: true,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    pub fn set_target(&mut self, target: f64) {
        if !target.is_finite() || target == self.target {
            return;
        }
        self.target = target;
        self.at_rest = false;
    }

    /// Place the spring at `value` with no velocity, skipping any animation.
    pub fn jump(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Advance the simulation by `dt_s` seconds (at most a quarter second) and return the new
    /// value.
    pub fn step(&mut self, dt_s: f64) -> f64 {
        if self.at_rest || !dt_s.is_finite() || dt_s <= 0.0 {
            return self.value;
        }

        let dt_s = dt_s.min(Self::MAX_STEP_S);
        let substeps = (dt_s / Self::MAX_SUBSTEP_S).ceil().max(1.0) as u32;
        let h = dt_s / f64::from(substeps);
        let SpringConfig {
            stiffness,
            damping,
            mass,
            rest_delta,
            rest_speed,
        } = self.config;

        for _ in 0..substeps {
            // Semi-implicit Euler: velocity first, then position with the new velocity.
            let force = -stiffness * (self.value - self.target) - damping * self.velocity;
            self.velocity += (force / mass) * h;
            self.value += self.velocity * h;

            if (self.target - self.value).abs() <= rest_delta && self.velocity.abs() <= rest_speed
            {
                self.value = self.target;
                self.velocity = 0.0;
                self.at_rest = true;
                break;
            }
        }

        self.value
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/spring.rs"]
mod tests;
