//! Owned, serialisable views of world state for inspection panels

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::history::MassHistory;
use crate::kind::{BodyKind, Rgb};
use crate::particle::Particle;

fn history_samples(history: &MassHistory) -> Vec<[f64; 2]> {
    history.iter().map(|&(age, mass)| [age, mass]).collect()
}

/// Body state snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySnapshot {
    pub id: u32,
    pub kind: BodyKind,
    pub mass: f64,
    pub radius: f64,
    pub consumption_radius: f64,
    /// Position [x, y]
    pub position: [f64; 2],
    /// Velocity [x, y]
    pub velocity: [f64; 2],
    pub color: Rgb,
    pub age: f64,
    /// Net force [x, y] applied during the last step
    pub last_force: [f64; 2],
    /// (age, mass) samples, oldest first
    pub mass_history: Vec<[f64; 2]>,
}

impl From<&Body> for BodySnapshot {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id.0,
            kind: body.kind,
            mass: body.mass,
            radius: body.radius,
            consumption_radius: body.consumption_radius,
            position: [body.position.x, body.position.y],
            velocity: [body.velocity.x, body.velocity.y],
            color: body.color,
            age: body.age,
            last_force: [body.last_force.x, body.last_force.y],
            mass_history: history_samples(&body.mass_history),
        }
    }
}

/// Particle state snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleSnapshot {
    pub id: u32,
    pub mass: f64,
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub color: Rgb,
    pub age: f64,
    pub last_force: [f64; 2],
    pub mass_history: Vec<[f64; 2]>,
}

impl From<&Particle> for ParticleSnapshot {
    fn from(particle: &Particle) -> Self {
        Self {
            id: particle.id.0,
            mass: particle.mass,
            position: [particle.position.x, particle.position.y],
            velocity: [particle.velocity.x, particle.velocity.y],
            color: particle.color,
            age: particle.age,
            last_force: [particle.last_force.x, particle.last_force.y],
            mass_history: history_samples(&particle.mass_history),
        }
    }
}

/// Everything in the world at one instant
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub sim_year: f64,
    pub bodies: Vec<BodySnapshot>,
    pub particles: Vec<ParticleSnapshot>,
}

/// Population counts and total mass
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldStats {
    pub planets: usize,
    pub stars: usize,
    pub neutron_stars: usize,
    pub black_holes: usize,
    pub particles: usize,
    /// Mass of every body and particle
    pub total_mass: f64,
}

impl WorldStats {
    pub fn collect(bodies: &[Body], particles: &[Particle]) -> Self {
        let mut stats = WorldStats {
            particles: particles.len(),
            total_mass: particles.iter().map(|p| p.mass).sum(),
            ..Default::default()
        };
        for body in bodies {
            match body.kind {
                BodyKind::Planet => stats.planets += 1,
                BodyKind::Star => stats.stars += 1,
                BodyKind::NeutronStar => stats.neutron_stars += 1,
                BodyKind::BlackHole => stats.black_holes += 1,
            }
            stats.total_mass += body.mass;
        }
        stats
    }

    pub fn body_count(&self) -> usize {
        self.planets + self.stars + self.neutron_stars + self.black_holes
    }
}
