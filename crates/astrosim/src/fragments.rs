//! Debris generators for explosions, collapses and mass loss
//!
//! Each generator reads the body it breaks up and returns fresh particles (and
//! sometimes planets). None of them touch the world; the resolver decides what
//! to remove and commits everything at the end of the frame.

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::config::EvaporationWeights;
use crate::emitter::{Emitter, heading};
use crate::kind::{BodyKind, Rgb, planet_radius};
use crate::particle::{DEFAULT_PARTICLE_MASS, MIN_PARTICLE_MASS, Particle};

/// Upper bound on particles from one supernova
pub const MAX_SUPERNOVA_PARTICLES: usize = 100;

/// Particles a shattered planet breaks into
pub const SHATTER_PARTICLES: usize = 30;

/// Share of a disrupted star's mass that ends up in planets
pub const DISRUPTION_PLANET_SHARE: f64 = 0.6;

/// Fewest particles a disruption produces
pub const MIN_DISRUPTION_PARTICLES: usize = 10;

/// Share of a neutron star's mass that survives a collapse
pub const NEUTRON_COLLAPSE_RETENTION: f64 = 0.7;

/// Particles released by a black hole falling back to a neutron star
pub const EVAPORATION_WAVE_PARTICLES: usize = 80;

/// Half-width in radians of a directional explosion's cone
pub const DIRECTIONAL_SPREAD: f64 = 0.8;

/// Particles and planets produced by one event
#[derive(Debug, Clone, Default)]
pub struct Debris {
    pub particles: Vec<Particle>,
    pub bodies: Vec<Body>,
}

impl Debris {
    pub fn total_mass(&self) -> f64 {
        self.particles.iter().map(|p| p.mass).sum::<f64>()
            + self.bodies.iter().map(|b| b.mass).sum::<f64>()
    }
}

/// How an evaporated black hole releases what is left of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaporationOutcome {
    Supernova,
    NeutronCollapse,
    Radiate,
}

/// Picks an evaporation outcome with probability proportional to its weight
pub fn choose_evaporation(
    weights: &EvaporationWeights,
    emitter: &mut Emitter,
) -> EvaporationOutcome {
    let fate = emitter.roll() * weights.total();
    if fate < weights.supernova {
        EvaporationOutcome::Supernova
    } else if fate < weights.supernova + weights.neutron_collapse {
        EvaporationOutcome::NeutronCollapse
    } else {
        EvaporationOutcome::Radiate
    }
}

/// Radial burst of particles from `body`'s centre
fn burst(
    body: &Body,
    count: usize,
    speed: std::ops::Range<f64>,
    mass: f64,
    color: Option<Rgb>,
    emitter: &mut Emitter,
) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let direction = heading(emitter.angle());
            let velocity = body.velocity + direction * emitter.uniform(speed.clone());
            let color = color.unwrap_or_else(|| emitter.ember_color());
            emitter.particle(body.position, velocity, color, mass)
        })
        .collect()
}

/// Supernova debris: `min(100, ⌊mass/3⌋)` particles of default mass
pub fn supernova(body: &Body, emitter: &mut Emitter) -> Vec<Particle> {
    let count = ((body.mass / 3.0).floor() as usize).min(MAX_SUPERNOVA_PARTICLES);
    burst(body, count, 3.0..8.0, DEFAULT_PARTICLE_MASS, None, emitter)
}

/// Supernova release from a black hole that stays live
///
/// The released particle mass is taken from the black hole.
pub fn hypernova(body: &mut Body, emitter: &mut Emitter) -> Vec<Particle> {
    let particles = supernova(body, emitter);
    let released: f64 = particles.iter().map(|p| p.mass).sum();
    if released < body.mass {
        body.set_mass(body.mass - released);
    }
    particles
}

/// Planet destroyed by an impact: 30 particles sharing its mass
pub fn shatter(body: &Body, emitter: &mut Emitter) -> Vec<Particle> {
    let mass = body.mass / SHATTER_PARTICLES as f64;
    burst(body, SHATTER_PARTICLES, 1.0..4.0, mass, Some(body.color), emitter)
}

/// Breaks a body into 1-3 small planets and a particle cloud
///
/// Planets take exactly 60% of the mass and the particles share the rest
/// evenly, so the debris mass equals the body mass up to rounding.
pub fn disrupt(body: &Body, emitter: &mut Emitter) -> Debris {
    let total_mass = body.mass;

    let planet_count = emitter.count(1..=3);
    let raw: Vec<f64> = (0..planet_count)
        .map(|_| emitter.uniform(5.0..15.0))
        .collect();
    let raw_sum: f64 = raw.iter().sum();
    let scale = total_mass * DISRUPTION_PLANET_SHARE / raw_sum;
    let planet_masses: Vec<f64> = raw.iter().map(|m| m * scale).collect();

    let remaining = total_mass - planet_masses.iter().sum::<f64>();
    let particle_count = ((remaining / 2.0).floor() as usize).max(MIN_DISRUPTION_PARTICLES);
    let particle_mass = remaining / particle_count as f64;
    let particles = burst(
        body,
        particle_count,
        2.0..6.0,
        particle_mass,
        Some(Rgb(255, 200, 100)),
        emitter,
    );

    let bodies = planet_masses
        .into_iter()
        .map(|mass| {
            let direction = heading(emitter.angle());
            let position = body.position + direction * emitter.uniform(20.0..40.0);
            let velocity = body.velocity + direction * 2.0;
            let color = emitter.bright_color();
            emitter.planet(mass, planet_radius(mass), position, velocity, color)
        })
        .collect();

    Debris { particles, bodies }
}

/// Fragments thrown forward when a bigger planet rams a smaller one
///
/// `max(1, round((m1 + m2) / 4))` particles leave the smaller body's position
/// inside a cone around the impact direction, carrying the bigger body's
/// velocity plus a kick, and sharing the smaller body's mass.
pub fn directional(bigger: &Body, smaller: &Body, emitter: &mut Emitter) -> Vec<Particle> {
    let offset = smaller.position - bigger.position;
    let impact_angle = offset.y.atan2(offset.x);
    let count = (((bigger.mass + smaller.mass) / 4.0).round() as usize).max(1);
    let mass = smaller.mass / count as f64;

    (0..count)
        .map(|_| {
            let angle = impact_angle + emitter.uniform(-DIRECTIONAL_SPREAD..DIRECTIONAL_SPREAD);
            let velocity = bigger.velocity + heading(angle) * emitter.uniform(2.5..6.5);
            let color = emitter.bright_color();
            emitter.particle(smaller.position, velocity, color, mass)
        })
        .collect()
}

/// Particle carrying mass shed by a star or neutron star
///
/// Appears `offset` from the centre so the body does not immediately
/// reabsorb it.
pub fn ejecta(body: &Body, lost_mass: f64, offset: f64, emitter: &mut Emitter) -> Particle {
    let direction = heading(emitter.angle());
    let position = body.position + direction * offset;
    let velocity = body.velocity + direction * emitter.uniform(1.0..4.0);
    let color = match body.kind {
        BodyKind::Star => Rgb(255, 200, 100),
        BodyKind::NeutronStar => Rgb(180, 180, 255),
        BodyKind::Planet | BodyKind::BlackHole => Rgb::WHITE,
    };
    emitter.particle(position, velocity, color, lost_mass)
}

/// What an evaporated black hole leaves behind
pub fn evaporation(body: &Body, outcome: EvaporationOutcome, emitter: &mut Emitter) -> Debris {
    match outcome {
        EvaporationOutcome::Supernova => {
            let count = ((body.mass * 2.0).floor() as usize).clamp(1, MAX_SUPERNOVA_PARTICLES);
            let mass = body.mass / count as f64;
            Debris {
                particles: burst(body, count, 3.0..8.0, mass, Some(Rgb(255, 100, 100)), emitter),
                bodies: Vec::new(),
            }
        }
        EvaporationOutcome::NeutronCollapse => {
            let mass = (body.mass * NEUTRON_COLLAPSE_RETENTION).max(10.0);
            let remnant =
                emitter.body_of_kind(BodyKind::NeutronStar, mass, body.position, body.velocity);
            Debris {
                particles: burst(
                    body,
                    EVAPORATION_WAVE_PARTICLES,
                    6.0..12.0,
                    1.0,
                    Some(Rgb(100, 200, 255)),
                    emitter,
                ),
                bodies: vec![remnant],
            }
        }
        EvaporationOutcome::Radiate => {
            let whole = body.mass.floor();
            let mut particles =
                burst(body, whole as usize, 8.0..16.0, 1.0, Some(Rgb::WHITE), emitter);
            let remainder = body.mass - whole;
            if remainder >= MIN_PARTICLE_MASS {
                particles.extend(burst(body, 1, 8.0..16.0, remainder, Some(Rgb::WHITE), emitter));
            }
            Debris {
                particles,
                bodies: Vec::new(),
            }
        }
    }
}

/// Collapse debris of two colliding neutron stars
///
/// 70% of their combined mass is released from the mass-weighted centre with
/// the momentum-weighted velocity.
pub fn neutron_merger(a: &Body, b: &Body, emitter: &mut Emitter) -> Vec<Particle> {
    let combined = a.mass + b.mass;
    let centre = nalgebra::Point2::from(
        (a.position.coords * a.mass + b.position.coords * b.mass) / combined,
    );
    let velocity = (a.momentum() + b.momentum()) / combined;

    let released = combined * NEUTRON_COLLAPSE_RETENTION;
    let count = ((released / 3.0).floor() as usize)
        .clamp(MIN_DISRUPTION_PARTICLES, MAX_SUPERNOVA_PARTICLES);
    let mass = released / count as f64;

    (0..count)
        .map(|_| {
            let direction = heading(emitter.angle());
            let particle_velocity = velocity + direction * emitter.uniform(3.0..8.0);
            emitter.particle(centre, particle_velocity, Rgb(200, 200, 255), mass)
        })
        .collect()
}
