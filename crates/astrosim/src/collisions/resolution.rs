//! Ordered interaction passes over the post-integration state
//!
//! Every pass reads and updates the same [`FrameChanges`]. Bodies may gain
//! mass or change type in place, but nothing is removed from or appended to
//! the world's collections until the frame is committed. A body or particle
//! marked removed by an earlier pass is skipped by every later one.

use std::collections::HashSet;

use log::debug;

use crate::body::{Body, BodyId, Transition};
use crate::collisions::detection::{
    ImpactOutcome, bodies_touch, by_mass, classify_impact, neutron_stars_touch,
};
use crate::config::{SimulationConfig, TransitionPolicy};
use crate::emitter::Emitter;
use crate::events::SimEvent;
use crate::fragments::{
    self, Debris, choose_evaporation, directional, disrupt, hypernova, neutron_merger, shatter,
    supernova,
};
use crate::kind::BodyKind;
use crate::particle::{Particle, ParticleId};

/// Removals, spawns and events accumulated over one frame
#[derive(Debug, Clone, Default)]
pub struct FrameChanges {
    removed_bodies: Vec<BodyId>,
    removed_body_set: HashSet<BodyId>,
    removed_particles: Vec<ParticleId>,
    removed_particle_set: HashSet<ParticleId>,
    pub new_bodies: Vec<Body>,
    pub new_particles: Vec<Particle>,
    pub events: Vec<SimEvent>,
}

impl FrameChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a body for removal, returning false if it already was
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        let inserted = self.removed_body_set.insert(id);
        if inserted {
            self.removed_bodies.push(id);
        }
        inserted
    }

    pub fn is_body_removed(&self, id: BodyId) -> bool {
        self.removed_body_set.contains(&id)
    }

    /// Marks a particle for removal, returning false if it already was
    pub fn remove_particle(&mut self, id: ParticleId) -> bool {
        let inserted = self.removed_particle_set.insert(id);
        if inserted {
            self.removed_particles.push(id);
        }
        inserted
    }

    pub fn is_particle_removed(&self, id: ParticleId) -> bool {
        self.removed_particle_set.contains(&id)
    }

    /// Removed body ids in the order they were marked
    pub fn removed_bodies(&self) -> &[BodyId] {
        &self.removed_bodies
    }

    /// Removed particle ids in the order they were marked
    pub fn removed_particles(&self) -> &[ParticleId] {
        &self.removed_particles
    }

    pub fn removed_body_set(&self) -> &HashSet<BodyId> {
        &self.removed_body_set
    }

    pub fn removed_particle_set(&self) -> &HashSet<ParticleId> {
        &self.removed_particle_set
    }

    pub fn spawn_particles(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.new_particles.extend(particles);
    }

    pub fn spawn_body(&mut self, body: Body) {
        self.new_bodies.push(body);
    }

    pub fn spawn_debris(&mut self, debris: Debris) {
        self.new_bodies.extend(debris.bodies);
        self.new_particles.extend(debris.particles);
    }

    pub fn record(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}

/// Runs the five interaction passes in order
///
/// # Examples
///
/// ```
/// use astrosim::body::{Body, BodyId};
/// use astrosim::collisions::{CollisionResolver, FrameChanges};
/// use astrosim::config::SimulationConfig;
/// use astrosim::emitter::{Emitter, IdAllocator};
/// use astrosim::kind::Rgb;
/// use nalgebra::{Point2, Vector2};
/// use rand::SeedableRng;
/// use rand_chacha::ChaChaRng;
///
/// let config = SimulationConfig::default();
/// let mut bodies = vec![
///     Body::planet(BodyId(0), 50.0, Point2::new(100.0, 100.0), Vector2::zeros(), Rgb::WHITE),
///     Body::stellar(BodyId(1), 200.0, Point2::new(110.0, 100.0), Vector2::zeros()),
/// ];
///
/// let mut rng = ChaChaRng::seed_from_u64(1);
/// let mut ids = IdAllocator::new();
/// let mut emitter = Emitter::new(&mut rng, &mut ids);
/// let mut changes = FrameChanges::new();
///
/// let resolver = CollisionResolver::new(&config);
/// resolver.resolve(&mut bodies, &[], 1.0, &mut changes, &mut emitter);
///
/// // The star swallows the planet at 80% efficiency
/// assert_eq!(changes.removed_bodies(), &[BodyId(0)]);
/// assert_eq!(bodies[1].mass, 240.0);
/// ```
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    pub policy: TransitionPolicy,
    pub impact_speed_threshold: f64,
    /// Suppresses neutron star to black hole collapse while set
    pub reset_event_active: bool,
}

impl CollisionResolver {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            policy: config.policy,
            impact_speed_threshold: config.impact_speed_threshold,
            reset_event_active: false,
        }
    }

    pub fn with_reset_event_active(mut self, active: bool) -> Self {
        self.reset_event_active = active;
        self
    }

    /// Runs every pass in order against the same change set
    pub fn resolve(
        &self,
        bodies: &mut [Body],
        particles: &[Particle],
        time_scale: f64,
        changes: &mut FrameChanges,
        emitter: &mut Emitter,
    ) {
        self.absorb_particles(bodies, particles, changes);
        self.apply_transitions(bodies, time_scale, changes, emitter);
        self.consume_bodies(bodies, changes);
        self.resolve_planet_impacts(bodies, changes, emitter);
        self.merge_neutron_stars(bodies, changes, emitter);
    }

    /// Pass 1: each particle inside a body's consumption radius is swallowed
    /// by the first such body in list order
    pub fn absorb_particles(
        &self,
        bodies: &mut [Body],
        particles: &[Particle],
        changes: &mut FrameChanges,
    ) {
        let mut absorbed = vec![0usize; bodies.len()];

        for particle in particles {
            if changes.is_particle_removed(particle.id) {
                continue;
            }
            let consumer = bodies
                .iter()
                .position(|b| !changes.is_body_removed(b.id) && b.can_consume(particle));
            if let Some(idx) = consumer {
                bodies[idx].consume(particle);
                changes.remove_particle(particle.id);
                absorbed[idx] += 1;
            }
        }

        for (body, count) in bodies.iter().zip(absorbed) {
            if count > 0 {
                changes.record(SimEvent::ParticlesAbsorbed {
                    body: body.id,
                    count,
                });
            }
        }
    }

    /// Pass 2: black holes radiate, then every body's threshold transition fires
    pub fn apply_transitions(
        &self,
        bodies: &mut [Body],
        time_scale: f64,
        changes: &mut FrameChanges,
        emitter: &mut Emitter,
    ) {
        for body in bodies.iter_mut() {
            if changes.is_body_removed(body.id) {
                continue;
            }
            body.radiate(time_scale);

            let Some(transition) = body.pending_transition() else {
                continue;
            };
            if transition == Transition::NeutronCollapse && self.reset_event_active {
                continue;
            }
            self.apply_transition(body, transition, changes, emitter);
        }
    }

    fn apply_transition(
        &self,
        body: &mut Body,
        transition: Transition,
        changes: &mut FrameChanges,
        emitter: &mut Emitter,
    ) {
        let id = body.id;
        match transition {
            Transition::Ignition => {
                debug!("planet {:?} ignited at mass {:.1}", id, body.mass);
                body.become_kind(BodyKind::Star);
                changes.record(SimEvent::Ignited { body: id });
            }
            Transition::StellarCollapse => {
                if emitter.chance(self.policy.star_to_neutron_probability) {
                    debug!("star {:?} collapsed to a neutron star", id);
                    body.set_mass(body.mass * 0.7);
                    body.become_kind(BodyKind::NeutronStar);
                    changes.record(SimEvent::CollapsedToNeutronStar { body: id });
                } else {
                    explode(body, changes, emitter);
                }
            }
            Transition::NeutronCollapse => {
                if emitter.chance(self.policy.neutron_to_black_hole_probability) {
                    debug!("neutron star {:?} collapsed to a black hole", id);
                    body.become_kind(BodyKind::BlackHole);
                    changes.record(SimEvent::CollapsedToBlackHole { body: id });
                } else {
                    explode(body, changes, emitter);
                }
            }
            Transition::StellarDisruption | Transition::NeutronDisruption => {
                let debris = disrupt(body, emitter);
                debug!(
                    "{:?} {:?} disrupted into {} planets and {} particles",
                    body.kind,
                    id,
                    debris.bodies.len(),
                    debris.particles.len()
                );
                changes.record(SimEvent::Disrupted {
                    body: id,
                    planets: debris.bodies.len(),
                    particles: debris.particles.len(),
                });
                changes.spawn_debris(debris);
                changes.remove_body(id);
            }
            Transition::Evaporation => {
                let outcome = choose_evaporation(&self.policy.evaporation, emitter);
                debug!("black hole {:?} evaporated: {:?}", id, outcome);
                changes.spawn_debris(fragments::evaporation(body, outcome, emitter));
                changes.record(SimEvent::Evaporated { body: id, outcome });
                changes.remove_body(id);
            }
            Transition::Hypernova => {
                let particles = hypernova(body, emitter);
                debug!("black hole {:?} released {} particles", id, particles.len());
                changes.record(SimEvent::Hypernova {
                    body: id,
                    particles: particles.len(),
                });
                changes.spawn_particles(particles);
            }
        }
    }

    /// Pass 3: a body swallows any strictly lighter body inside its
    /// consumption radius, unless both are planets
    pub fn consume_bodies(&self, bodies: &mut [Body], changes: &mut FrameChanges) {
        for i in 0..bodies.len() {
            for j in 0..bodies.len() {
                if i == j {
                    continue;
                }
                let (consumer, prey) = pair_mut(bodies, i, j);
                if consumer.kind == BodyKind::Planet && prey.kind == BodyKind::Planet {
                    continue;
                }
                if changes.is_body_removed(consumer.id) || changes.is_body_removed(prey.id) {
                    continue;
                }
                if consumer.mass > prey.mass && consumer.can_consume(prey) {
                    consumer.consume(prey);
                    changes.remove_body(prey.id);
                    changes.record(SimEvent::BodyConsumed {
                        consumer: consumer.id,
                        consumed: prey.id,
                    });
                }
            }
        }
    }

    /// Pass 4: classifies each touching pair of planets and applies the outcome
    pub fn resolve_planet_impacts(
        &self,
        bodies: &mut [Body],
        changes: &mut FrameChanges,
        emitter: &mut Emitter,
    ) {
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (a, b) = (&bodies[i], &bodies[j]);
                if changes.is_body_removed(a.id) || changes.is_body_removed(b.id) {
                    continue;
                }
                if a.kind != BodyKind::Planet || b.kind != BodyKind::Planet || !bodies_touch(a, b) {
                    continue;
                }

                let (bigger_idx, smaller_idx) =
                    if by_mass(a, b).0.id == a.id { (i, j) } else { (j, i) };
                let outcome = classify_impact(
                    &bodies[bigger_idx],
                    &bodies[smaller_idx],
                    self.impact_speed_threshold,
                );
                let bigger_id = bodies[bigger_idx].id;
                let smaller_id = bodies[smaller_idx].id;
                debug!("planets {:?} and {:?} collided: {:?}", bigger_id, smaller_id, outcome);

                match outcome {
                    ImpactOutcome::BothShatter | ImpactOutcome::Fallback => {
                        changes.spawn_particles(shatter(&bodies[i], emitter));
                        changes.spawn_particles(shatter(&bodies[j], emitter));
                        changes.remove_body(bodies[i].id);
                        changes.remove_body(bodies[j].id);
                    }
                    ImpactOutcome::Accretion => {
                        let (bigger, smaller) = pair_mut(bodies, bigger_idx, smaller_idx);
                        bigger.consume(smaller);
                        changes.remove_body(smaller_id);
                    }
                    ImpactOutcome::Directional => {
                        let fragments =
                            directional(&bodies[bigger_idx], &bodies[smaller_idx], emitter);
                        changes.spawn_particles(fragments);
                        changes.remove_body(smaller_id);
                    }
                }
                changes.record(SimEvent::PlanetImpact {
                    bigger: bigger_id,
                    smaller: smaller_id,
                    outcome,
                });
            }
        }
    }

    /// Pass 5: touching neutron stars both collapse and are removed
    pub fn merge_neutron_stars(
        &self,
        bodies: &[Body],
        changes: &mut FrameChanges,
        emitter: &mut Emitter,
    ) {
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (a, b) = (&bodies[i], &bodies[j]);
                if changes.is_body_removed(a.id) || changes.is_body_removed(b.id) {
                    continue;
                }
                if !neutron_stars_touch(a, b) {
                    continue;
                }
                let particles = neutron_merger(a, b, emitter);
                debug!(
                    "neutron stars {:?} and {:?} merged, releasing {} particles",
                    a.id,
                    b.id,
                    particles.len()
                );
                changes.record(SimEvent::NeutronStarMerger {
                    first: a.id,
                    second: b.id,
                    particles: particles.len(),
                });
                changes.spawn_particles(particles);
                changes.remove_body(a.id);
                changes.remove_body(b.id);
            }
        }
    }
}

/// Supernova: the body is replaced by its debris
fn explode(body: &Body, changes: &mut FrameChanges, emitter: &mut Emitter) {
    let particles = supernova(body, emitter);
    debug!("{:?} {:?} went supernova", body.kind, body.id);
    changes.record(SimEvent::Supernova {
        body: body.id,
        particles: particles.len(),
    });
    changes.spawn_particles(particles);
    changes.remove_body(body.id);
}

/// Mutable access to `bodies[i]` alongside shared access to `bodies[j]`
///
/// Panics if `i == j`; callers guard against self-pairs.
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &Body) {
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        (&mut head[i], &tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        (&mut tail[0], &head[j])
    }
}
