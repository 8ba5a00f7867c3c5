//! Time integration for bodies
//!
//! Each step computes every body's net force from the same pre-step state,
//! then applies `v += f / m / fps * scale` followed by `p += v * scale`.
//! Positions wrap toroidally inside the simulation area.

use nalgebra::{Point2, Vector2};

use crate::body::Body;
use crate::config::{GravityParams, SimArea, SimulationConfig, TimeScale};
use crate::emitter::Emitter;
use crate::forces::{ForceModel, net_force};
use crate::fragments::ejecta;
use crate::particle::Particle;

/// Advances the body collection by one frame
pub trait Integrator: Send + Sync {
    /// Moves every body one step under `force`, runs mass-loss timers and
    /// ages each body
    ///
    /// # Returns
    ///
    /// Particles ejected by stars and neutron stars shedding mass
    fn step(
        &self,
        bodies: &mut [Body],
        force: &dyn ForceModel,
        config: &SimulationConfig,
        time_scale: TimeScale,
        emitter: &mut Emitter,
    ) -> Vec<Particle>;
}

/// Semi-implicit Euler: kick with the new force, then drift with the new velocity
///
/// # Examples
///
/// ```
/// use astrosim::body::{Body, BodyId};
/// use astrosim::config::{SimulationConfig, TimeScale};
/// use astrosim::emitter::{Emitter, IdAllocator};
/// use astrosim::forces::Newtonian;
/// use astrosim::integrator::{Integrator, SymplecticEuler};
/// use astrosim::kind::Rgb;
/// use nalgebra::{Point2, Vector2};
/// use rand::SeedableRng;
/// use rand_chacha::ChaChaRng;
///
/// let config = SimulationConfig::default();
/// let mut bodies = vec![Body::planet(
///     BodyId(0),
///     10.0,
///     Point2::new(100.0, 100.0),
///     Vector2::new(1.0, 0.0),
///     Rgb::WHITE,
/// )];
///
/// let mut rng = ChaChaRng::seed_from_u64(7);
/// let mut ids = IdAllocator::new();
/// let mut emitter = Emitter::new(&mut rng, &mut ids);
///
/// SymplecticEuler.step(&mut bodies, &Newtonian, &config, TimeScale::default(), &mut emitter);
/// assert_eq!(bodies[0].position, Point2::new(101.0, 100.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SymplecticEuler;

impl Integrator for SymplecticEuler {
    fn step(
        &self,
        bodies: &mut [Body],
        force: &dyn ForceModel,
        config: &SimulationConfig,
        time_scale: TimeScale,
        emitter: &mut Emitter,
    ) -> Vec<Particle> {
        let params: GravityParams = config.gravity();
        let scale = time_scale.factor();

        let forces: Vec<Vector2<f64>> = (0..bodies.len())
            .map(|i| net_force(i, &*bodies, force, &params))
            .collect();

        bodies
            .iter_mut()
            .zip(forces)
            .filter_map(|(body, f)| {
                body.advance(f, scale, config);
                let shed = body
                    .tick_ejection(scale, config.ejection_interval)
                    .map(|lost| ejecta(body, lost, config.ejection_offset, emitter));
                body.record_age(scale);
                shed
            })
            .collect()
    }
}

/// Wraps a body once its whole disc has left the area
///
/// Returns true if the position changed.
pub fn wrap_body(position: &mut Point2<f64>, radius: f64, area: &SimArea) -> bool {
    let mut wrapped = false;
    let height = area.sim_height();

    if position.x < -radius {
        position.x = area.width + radius;
        wrapped = true;
    } else if position.x > area.width + radius {
        position.x = -radius;
        wrapped = true;
    }

    if position.y < -radius {
        position.y = height + radius;
        wrapped = true;
    } else if position.y > height + radius {
        position.y = -radius;
        wrapped = true;
    }

    wrapped
}

/// Wraps a particle as soon as its centre leaves the area
pub fn wrap_particle(position: &mut Point2<f64>, area: &SimArea) {
    let height = area.sim_height();

    if position.x < 0.0 {
        position.x = area.width;
    } else if position.x > area.width {
        position.x = 0.0;
    }

    if position.y < 0.0 {
        position.y = height;
    } else if position.y > height {
        position.y = 0.0;
    }
}
