//! Notable things that happened during a step
//!
//! Hosts use these to trigger sounds or visual effects without polling body
//! state between frames.

use serde::{Deserialize, Serialize};

use crate::body::BodyId;
use crate::collisions::ImpactOutcome;
use crate::fragments::EvaporationOutcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    /// A planet became a star
    Ignited { body: BodyId },
    /// A star collapsed, keeping 70% of its mass
    CollapsedToNeutronStar { body: BodyId },
    /// A neutron star collapsed into a black hole
    CollapsedToBlackHole { body: BodyId },
    /// A star or neutron star blew apart
    Supernova { body: BodyId, particles: usize },
    /// A star or neutron star fell apart into planets and particles
    Disrupted {
        body: BodyId,
        planets: usize,
        particles: usize,
    },
    /// A black hole radiated below its survival mass
    Evaporated {
        body: BodyId,
        outcome: EvaporationOutcome,
    },
    /// An overweight black hole shed a burst and survived
    Hypernova { body: BodyId, particles: usize },
    /// A body swallowed `count` particles this step
    ParticlesAbsorbed { body: BodyId, count: usize },
    BodyConsumed { consumer: BodyId, consumed: BodyId },
    PlanetImpact {
        bigger: BodyId,
        smaller: BodyId,
        outcome: ImpactOutcome,
    },
    NeutronStarMerger {
        first: BodyId,
        second: BodyId,
        particles: usize,
    },
    /// Settled particles merged into a new planet
    ParticlesClustered { body: BodyId, members: usize },
}
