use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::body::Massive;
use crate::config::SimArea;
use crate::history::MassHistory;
use crate::integrator::wrap_particle;
use crate::kind::Rgb;

/// Mass explosion particles get when no other mass is specified
pub const DEFAULT_PARTICLE_MASS: f64 = 2.0;

/// Particles lighter than this are considered decayed
pub const MIN_PARTICLE_MASS: f64 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticleId(pub u32);

/// Lightweight massed point
///
/// Particles feel and exert gravity but never change type.
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: ParticleId,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub mass: f64,
    pub color: Rgb,
    pub age: f64,
    pub last_force: Vector2<f64>,
    pub mass_history: MassHistory,
}

impl Particle {
    pub fn new(
        id: ParticleId,
        position: Point2<f64>,
        velocity: Vector2<f64>,
        color: Rgb,
        mass: f64,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            mass,
            color,
            age: 0.0,
            last_force: Vector2::zeros(),
            mass_history: MassHistory::new(),
        }
    }

    /// Whether the particle has decayed and must be dropped
    pub fn is_decayed(&self) -> bool {
        self.mass.is_nan() || self.mass < MIN_PARTICLE_MASS
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    /// Pure translation followed by wrapping, aging one tick per unit of scale
    pub fn advance(&mut self, time_scale: f64, area: &SimArea) {
        self.position += self.velocity * time_scale;
        self.age += time_scale;
        self.mass_history.push((self.age, self.mass));
        wrap_particle(&mut self.position, area);
    }
}

impl Massive for Particle {
    fn position(&self) -> Point2<f64> {
        self.position
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn absorption_efficiency(&self) -> f64 {
        1.0
    }
}
