// Beeswarm layout.
//
// Turns one target x per record into collision-free (x, y) positions by a
// short, fixed-budget force relaxation:
// - x-pull toward each particle's target x
// - y-pull toward the shared center line
// - pairwise collision on predicted positions
//
// The tick budget is proportional to the number of particles and there is
// no convergence check, so dense inputs may keep a little overlap.
//
// Submodules:
// - spatial_grid: collision candidate lookup
// - swarm: the particle simulation

use serde::{Deserialize, Serialize};

mod spatial_grid;
mod swarm;

pub use swarm::layout_swarm;

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Force constants and iteration budget of the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Pull toward the target x. Above 1 so the swarm settles within a few ticks.
    pub x_strength: f64,
    /// Pull toward the center line.
    pub y_strength: f64,
    /// Radius each particle claims; two centers stay `2 * collide_radius` apart.
    pub collide_radius: f64,
    /// Fraction of the overlap resolved per tick (1.0 resolves all of it).
    pub collide_strength: f64,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f64,
    pub alpha_min: f64,
    /// Ticks for alpha to decay from 1 to `alpha_min`.
    pub alpha_decay_ticks: f64,
    /// Ticks run per visible record.
    pub ticks_per_record: usize,
    /// Radius of the phyllotaxis spiral that seeds particles.
    pub initial_radius: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            x_strength: 2.0,
            y_strength: 0.1,
            collide_radius: 9.0,
            collide_strength: 1.0,
            velocity_decay: 0.4,
            alpha_min: 0.001,
            alpha_decay_ticks: 300.0,
            ticks_per_record: 10,
            initial_radius: 10.0,
        }
    }
}

impl ForceConfig {
    pub fn collision_diameter(&self) -> f64 {
        self.collide_radius * 2.0
    }

    /// Per-tick alpha decay such that alpha reaches `alpha_min` after
    /// `alpha_decay_ticks` ticks.
    pub fn alpha_decay(&self) -> f64 {
        1.0 - self.alpha_min.powf(1.0 / self.alpha_decay_ticks)
    }

    pub fn total_ticks(&self, particles: usize) -> usize {
        particles.saturating_mul(self.ticks_per_record)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.collide_radius > 0.0) {
            return Err(format!("collide_radius must be positive, got {}", self.collide_radius));
        }
        if !(0.0..=1.0).contains(&self.velocity_decay) {
            return Err(format!("velocity_decay must be within [0, 1], got {}", self.velocity_decay));
        }
        if !(self.alpha_min > 0.0 && self.alpha_min < 1.0) {
            return Err(format!("alpha_min must be within (0, 1), got {}", self.alpha_min));
        }
        if !(self.alpha_decay_ticks >= 1.0) {
            return Err(format!("alpha_decay_ticks must be at least 1, got {}", self.alpha_decay_ticks));
        }
        let strengths = [self.x_strength, self.y_strength, self.collide_strength, self.initial_radius];
        if strengths.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err("force strengths and initial_radius must be finite and non-negative".to_string());
        }
        Ok(())
    }
}
