//! The world stepper
//!
//! [`World`] owns the body and particle collections, the seeded random source
//! and the id allocator, and runs one frame per call to [`World::step`]:
//! particles move, bodies move and shed mass, particles cluster, the collision
//! passes run, and finally every removal and spawn is committed at once.

use log::{info, trace, warn};
use nalgebra::{Point2, Vector2};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::body::{Body, BodyId};
use crate::collisions::{CollisionResolver, FrameChanges};
use crate::config::{ConfigError, SimulationConfig, Theory, TimeScale};
use crate::emitter::{Emitter, IdAllocator};
use crate::events::SimEvent;
use crate::integrator::{Integrator, SymplecticEuler};
use crate::kind::{BodyKind, Rgb};
use crate::particle::{Particle, ParticleId};
use crate::particles::ParticleSystem;
use crate::snapshot::{BodySnapshot, ParticleSnapshot, WorldSnapshot, WorldStats};
use crate::trajectory::{TrajectoryPoint, predict_trajectory};

/// Why an insertion was refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpawnError {
    #[error("mass must be a positive finite number, got {mass}")]
    NonPositiveMass { mass: f64 },
}

fn check_mass(mass: f64) -> Result<(), SpawnError> {
    if mass.is_finite() && mass > 0.0 {
        Ok(())
    } else {
        warn!("rejected spawn with mass {}", mass);
        Err(SpawnError::NonPositiveMass { mass })
    }
}

/// What changed during one step
///
/// Removals and spawns are listed in the order they happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub removed_bodies: Vec<BodyId>,
    pub removed_particles: Vec<ParticleId>,
    pub spawned_bodies: Vec<BodyId>,
    pub spawned_particles: Vec<ParticleId>,
    pub events: Vec<SimEvent>,
}

impl StepReport {
    /// True when the step changed no membership and raised no events
    pub fn is_empty(&self) -> bool {
        self.removed_bodies.is_empty()
            && self.removed_particles.is_empty()
            && self.spawned_bodies.is_empty()
            && self.spawned_particles.is_empty()
            && self.events.is_empty()
    }
}

/// Bodies, particles and the machinery that advances them
pub struct World {
    config: SimulationConfig,
    bodies: Vec<Body>,
    particles: ParticleSystem,
    integrator: Box<dyn Integrator>,
    rng: ChaChaRng,
    ids: IdAllocator,
    sim_year: f64,
    paused: bool,
    reset_event_active: bool,
}

impl World {
    /// Creates an empty world seeded from the thread-local generator
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let rng = ChaChaRng::from_rng(&mut rand::rng());
        Self::build(config, rng)
    }

    /// Creates an empty world whose every random draw is fixed by `seed`
    ///
    /// # Examples
    ///
    /// ```
    /// use astrosim::config::SimulationConfig;
    /// use astrosim::world::World;
    ///
    /// let world = World::with_seed(SimulationConfig::default(), 42).unwrap();
    /// assert!(world.bodies().is_empty());
    /// assert_eq!(world.sim_year(), 0.0);
    /// ```
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::build(config, ChaChaRng::seed_from_u64(seed))
    }

    fn build(config: SimulationConfig, rng: ChaChaRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            bodies: Vec::new(),
            particles: ParticleSystem::new(),
            integrator: Box::new(SymplecticEuler),
            rng,
            ids: IdAllocator::new(),
            sim_year: 0.0,
            paused: false,
            reset_event_active: false,
        })
    }

    /// Replaces the integrator used for bodies
    pub fn with_integrator(mut self, integrator: impl Integrator + 'static) -> Self {
        self.integrator = Box::new(integrator);
        self
    }

    /// Swaps in a new configuration between steps
    ///
    /// The old configuration is kept if the new one is invalid.
    pub fn reconfigure(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        info!("reconfigured world");
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Inserts a body
    ///
    /// `radius` is used for planets only; every other type derives its radius
    /// from its mass. A planet radius that is not positive falls back to
    /// `max(3, mass)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use astrosim::config::SimulationConfig;
    /// use astrosim::kind::{BodyKind, Rgb};
    /// use astrosim::world::World;
    ///
    /// let mut world = World::with_seed(SimulationConfig::default(), 1).unwrap();
    /// let id = world
    ///     .spawn_body(200.0, 200.0, 100.0, 4.0, Rgb::WHITE, BodyKind::Star, 0.0, 0.0)
    ///     .unwrap();
    ///
    /// let star = world.body(id).unwrap();
    /// assert_eq!(star.radius, 100.0_f64.powf(0.4).max(8.0));
    /// assert!(world.spawn_body(0.0, 0.0, 0.0, 4.0, Rgb::WHITE, BodyKind::Planet, 0.0, 0.0).is_err());
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_body(
        &mut self,
        x: f64,
        y: f64,
        mass: f64,
        radius: f64,
        color: Rgb,
        kind: BodyKind,
        vx: f64,
        vy: f64,
    ) -> Result<BodyId, SpawnError> {
        check_mass(mass)?;
        let body = Body::new(
            self.ids.body(),
            kind,
            mass,
            radius,
            Point2::new(x, y),
            Vector2::new(vx, vy),
            color,
        );
        Ok(self.insert_body(body))
    }

    /// Planet preset: radius `max(3, mass)` and a random bright colour
    pub fn spawn_planet(
        &mut self,
        position: Point2<f64>,
        velocity: Vector2<f64>,
        mass: f64,
    ) -> Result<BodyId, SpawnError> {
        check_mass(mass)?;
        let color = Emitter::new(&mut self.rng, &mut self.ids).bright_color();
        let body = Body::planet(self.ids.body(), mass, position, velocity, color);
        Ok(self.insert_body(body))
    }

    /// Star preset, giving a neutron star from mass 350 upwards
    pub fn spawn_stellar(
        &mut self,
        position: Point2<f64>,
        velocity: Vector2<f64>,
        mass: f64,
    ) -> Result<BodyId, SpawnError> {
        check_mass(mass)?;
        let body = Body::stellar(self.ids.body(), mass, position, velocity);
        Ok(self.insert_body(body))
    }

    pub fn spawn_black_hole(
        &mut self,
        position: Point2<f64>,
        velocity: Vector2<f64>,
        mass: f64,
    ) -> Result<BodyId, SpawnError> {
        check_mass(mass)?;
        let body = Body::black_hole(self.ids.body(), mass, position, velocity);
        Ok(self.insert_body(body))
    }

    fn insert_body(&mut self, body: Body) -> BodyId {
        let id = body.id;
        self.bodies.push(body);
        id
    }

    pub fn spawn_particle(
        &mut self,
        x: f64,
        y: f64,
        vx: f64,
        vy: f64,
        color: Rgb,
        mass: f64,
    ) -> Result<ParticleId, SpawnError> {
        check_mass(mass)?;
        let id = self.ids.particle();
        self.particles.push(Particle::new(
            id,
            Point2::new(x, y),
            Vector2::new(vx, vy),
            color,
            mass,
        ));
        Ok(id)
    }

    /// Advances one frame
    ///
    /// `time_scale` is capped at the configured `max_time_scale`. The clock
    /// moves forward by `years_per_frame * time_scale` on every call.
    /// While paused nothing else happens and the report is empty.
    pub fn step(&mut self, time_scale: TimeScale, theory: Theory) -> StepReport {
        let time_scale = time_scale.clamped(self.config.max_time_scale);
        self.sim_year += self.config.years_per_frame * time_scale.factor();
        if self.paused {
            return StepReport::default();
        }

        let mut removed_particles = self
            .particles
            .integrate(&self.bodies, &self.config, time_scale);

        let mut emitter = Emitter::new(&mut self.rng, &mut self.ids);
        let mut changes = FrameChanges::new();

        let ejected = self.integrator.step(
            &mut self.bodies,
            theory.model(),
            &self.config,
            time_scale,
            &mut emitter,
        );
        changes.spawn_particles(ejected);

        if let Some(cluster) = self
            .particles
            .try_combine_particles(&self.config, &mut emitter)
        {
            for id in &cluster.members {
                changes.remove_particle(*id);
            }
            changes.record(SimEvent::ParticlesClustered {
                body: cluster.body.id,
                members: cluster.members.len(),
            });
            changes.spawn_body(cluster.body);
        }

        CollisionResolver::new(&self.config)
            .with_reset_event_active(self.reset_event_active)
            .resolve(
                &mut self.bodies,
                self.particles.particles(),
                time_scale.factor(),
                &mut changes,
                &mut emitter,
            );

        self.bodies.retain(|b| !changes.is_body_removed(b.id));
        self.particles.remove_all(changes.removed_particle_set());
        removed_particles.extend_from_slice(changes.removed_particles());

        let spawned_bodies: Vec<BodyId> = changes.new_bodies.iter().map(|b| b.id).collect();
        let spawned_particles: Vec<ParticleId> =
            changes.new_particles.iter().map(|p| p.id).collect();
        let removed_bodies = changes.removed_bodies().to_vec();

        self.bodies.append(&mut changes.new_bodies);
        self.particles.extend(changes.new_particles.drain(..));

        trace!(
            "step: {} bodies ({} removed, {} spawned), {} particles ({} removed, {} spawned)",
            self.bodies.len(),
            removed_bodies.len(),
            spawned_bodies.len(),
            self.particles.len(),
            removed_particles.len(),
            spawned_particles.len()
        );

        StepReport {
            removed_bodies,
            removed_particles,
            spawned_bodies,
            spawned_particles,
            events: changes.events,
        }
    }

    /// Empties both collections
    ///
    /// The clock keeps running and ids are never handed out twice.
    pub fn reset(&mut self) {
        info!(
            "reset: cleared {} bodies and {} particles",
            self.bodies.len(),
            self.particles.len()
        );
        self.bodies.clear();
        self.particles.clear();
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// While active, neutron stars never collapse into black holes
    pub fn set_reset_event_active(&mut self, active: bool) {
        self.reset_event_active = active;
    }

    pub fn reset_event_active(&self) -> bool {
        self.reset_event_active
    }

    pub fn sim_year(&self) -> f64 {
        self.sim_year
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats::collect(&self.bodies, self.particles.particles())
    }

    pub fn body_snapshot(&self, id: BodyId) -> Option<BodySnapshot> {
        self.body(id).map(BodySnapshot::from)
    }

    pub fn particle_snapshot(&self, id: ParticleId) -> Option<ParticleSnapshot> {
        self.particle(id).map(ParticleSnapshot::from)
    }

    pub fn snapshots(&self) -> WorldSnapshot {
        WorldSnapshot {
            sim_year: self.sim_year,
            bodies: self.bodies.iter().map(BodySnapshot::from).collect(),
            particles: self.particles().iter().map(ParticleSnapshot::from).collect(),
        }
    }

    /// Path preview for `id`, see [`predict_trajectory`]
    pub fn predict_trajectory(
        &self,
        id: BodyId,
        steps: usize,
        sample_every: usize,
    ) -> Option<Vec<TrajectoryPoint>> {
        predict_trajectory(&self.bodies, id, &self.config, steps, sample_every)
    }
}
