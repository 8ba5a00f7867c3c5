//! Toy N-body engine with planets, stars, neutron stars and black holes
//!
//! Bodies attract each other under a Newtonian or GR-corrected law, shed mass,
//! and change type as their mass crosses fixed thresholds. Lightweight
//! particles released by explosions feel the same gravity and settle back into
//! planets. A [`World`](world::World) runs one frame per call to `step` and
//! reports what changed so a host can draw or sonify it.

pub mod body;
pub mod collisions;
pub mod config;
pub mod emitter;
pub mod events;
pub mod forces;
pub mod fragments;
pub mod history;
pub mod integrator;
pub mod kind;
pub mod particle;
pub mod particles;
pub mod snapshot;
pub mod trajectory;
pub mod world;

#[cfg(test)]
mod history_test;
#[cfg(test)]
mod particles_test;

pub use body::{Body, BodyId};
pub use config::{SimulationConfig, Theory, TimeScale};
pub use events::SimEvent;
pub use kind::{BodyKind, Rgb};
pub use particle::{Particle, ParticleId};
pub use world::{SpawnError, StepReport, World};
