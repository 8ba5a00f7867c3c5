//! Per-frame interaction passes
//!
//! Detection holds the pure contact and classification tests. Resolution runs
//! the ordered passes over the post-integration state and collects every
//! removal and spawn into a `FrameChanges` that the world commits at the end
//! of the step.

pub mod detection;
pub mod resolution;

#[cfg(test)]
mod detection_test;
#[cfg(test)]
mod resolution_test;

pub use detection::{ImpactOutcome, bodies_touch, by_mass, classify_impact, neutron_stars_touch};
pub use resolution::{CollisionResolver, FrameChanges};
