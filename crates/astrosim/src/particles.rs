//! The particle collection: gravity, decay filtering and clustering

use std::collections::HashSet;

use log::trace;
use nalgebra::{Point2, Vector2};

use crate::body::Body;
use crate::config::{SimulationConfig, TimeScale};
use crate::emitter::Emitter;
use crate::forces::point_attraction;
use crate::kind::MIN_PLANET_RADIUS;
use crate::particle::{Particle, ParticleId};

/// Particles merged into a new planet
#[derive(Debug, Clone)]
pub struct Cluster {
    pub body: Body,
    pub members: Vec<ParticleId>,
}

/// Owns every live particle
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn extend(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.particles.extend(particles);
    }

    /// Drops every particle whose id is in `removed`, keeping order
    pub fn remove_all(&mut self, removed: &HashSet<ParticleId>) {
        self.particles.retain(|p| !removed.contains(&p.id));
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn total_mass(&self) -> f64 {
        self.particles.iter().map(|p| p.mass).sum()
    }

    /// Moves every particle one step under gravity from `bodies` and from
    /// every other particle
    ///
    /// All forces are computed from the positions at the start of the call.
    /// Decayed particles are dropped instead of moved.
    ///
    /// # Returns
    ///
    /// Ids of the particles dropped for having decayed
    pub fn integrate(
        &mut self,
        bodies: &[Body],
        config: &SimulationConfig,
        time_scale: TimeScale,
    ) -> Vec<ParticleId> {
        let params = config.gravity();
        let scale = time_scale.factor();

        let forces: Vec<Vector2<f64>> = self
            .particles
            .iter()
            .enumerate()
            .map(|(idx, particle)| {
                let from_bodies = bodies
                    .iter()
                    .map(|b| {
                        point_attraction(
                            particle.position,
                            particle.mass,
                            b.position,
                            b.mass,
                            &params,
                        )
                    })
                    .fold(Vector2::zeros(), |acc, f| acc + f);

                let from_particles = self
                    .particles
                    .iter()
                    .enumerate()
                    .filter(|(other_idx, _)| *other_idx != idx)
                    .map(|(_, other)| {
                        point_attraction(
                            particle.position,
                            particle.mass,
                            other.position,
                            other.mass,
                            &params,
                        )
                    })
                    .fold(Vector2::zeros(), |acc, f| acc + f);

                from_bodies + from_particles
            })
            .collect();

        let mut decayed = Vec::new();
        for (particle, force) in self.particles.iter_mut().zip(forces) {
            if particle.is_decayed() {
                decayed.push(particle.id);
                continue;
            }
            particle.last_force = force;
            particle.velocity += force / particle.mass / config.fps * scale;
            particle.advance(scale, &config.area);
        }

        if !decayed.is_empty() {
            trace!("dropping {} decayed particles", decayed.len());
            let gone: HashSet<ParticleId> = decayed.iter().copied().collect();
            self.remove_all(&gone);
        }
        decayed
    }

    /// Looks for a tight group of settled particles to merge into a planet
    ///
    /// Nothing happens until at least `cluster_min_members` particles exist and
    /// that many are older than `cluster_min_age`. Each eligible particle in
    /// turn is tried as a centre; the first whose neighbourhood within
    /// `cluster_radius` holds enough eligible particles is merged. At most one
    /// cluster forms per call and the collection itself is left untouched.
    pub fn try_combine_particles(
        &self,
        config: &SimulationConfig,
        emitter: &mut Emitter,
    ) -> Option<Cluster> {
        let min_members = config.cluster_min_members;
        if self.particles.len() < min_members {
            return None;
        }

        let eligible: Vec<&Particle> = self
            .particles
            .iter()
            .filter(|p| p.age > config.cluster_min_age)
            .collect();
        if eligible.len() < min_members {
            return None;
        }

        let members = eligible.iter().find_map(|center| {
            let close: Vec<&Particle> = eligible
                .iter()
                .copied()
                .filter(|p| (p.position - center.position).magnitude() < config.cluster_radius)
                .collect();
            (close.len() >= min_members).then_some(close)
        })?;

        let count = members.len() as f64;
        let mass: f64 = members.iter().map(|p| p.mass).sum();
        let position = members
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.position.coords)
            / count;
        let velocity = members
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.velocity)
            / count;
        let radius = (mass * 0.8 / 2.0).max(MIN_PLANET_RADIUS);
        let color = emitter.bright_color();

        let body = emitter.planet(mass, radius, Point2::from(position), velocity, color);
        Some(Cluster {
            body,
            members: members.iter().map(|p| p.id).collect(),
        })
    }
}
