use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::body::{Body, BodyId};
use crate::collisions::detection::ImpactOutcome;
use crate::collisions::resolution::*;
use crate::config::{EvaporationWeights, SimulationConfig};
use crate::emitter::{Emitter, IdAllocator};
use crate::events::SimEvent;
use crate::fragments::EvaporationOutcome;
use crate::kind::{BodyKind, Rgb};
use crate::particle::{Particle, ParticleId};

fn planet(id: u32, mass: f64, x: f64, vx: f64) -> Body {
    Body::planet(
        BodyId(id),
        mass,
        Point2::new(x, 200.0),
        Vector2::new(vx, 0.0),
        Rgb::WHITE,
    )
}

fn stellar(id: u32, kind: BodyKind, mass: f64, x: f64) -> Body {
    Body::of_kind(BodyId(id), kind, mass, Point2::new(x, 200.0), Vector2::zeros())
}

fn particle(id: u32, mass: f64, x: f64) -> Particle {
    Particle::new(
        ParticleId(id),
        Point2::new(x, 200.0),
        Vector2::zeros(),
        Rgb::WHITE,
        mass,
    )
}

fn resolver_with(configure: impl FnOnce(&mut SimulationConfig)) -> CollisionResolver {
    let mut config = SimulationConfig::default();
    configure(&mut config);
    CollisionResolver::new(&config)
}

struct Harness {
    rng: ChaChaRng,
    ids: IdAllocator,
}

impl Harness {
    fn new() -> Self {
        Self {
            rng: ChaChaRng::seed_from_u64(11),
            ids: IdAllocator::new(),
        }
    }

    fn emitter(&mut self) -> Emitter<'_> {
        Emitter::new(&mut self.rng, &mut self.ids)
    }
}

fn spawned_particle_mass(changes: &FrameChanges) -> f64 {
    changes.new_particles.iter().map(|p| p.mass).sum()
}

#[test]
fn test_first_body_in_list_absorbs_particle() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut bodies = vec![planet(0, 10.0, 100.0, 0.0), planet(1, 10.0, 104.0, 0.0)];
    let particles = vec![particle(0, 2.0, 102.0)];
    let mut changes = FrameChanges::new();

    resolver.absorb_particles(&mut bodies, &particles, &mut changes);

    assert_eq!(bodies[0].mass, 12.0);
    assert_eq!(bodies[1].mass, 10.0);
    assert_eq!(changes.removed_particles(), &[ParticleId(0)]);
    assert_eq!(
        changes.events,
        vec![SimEvent::ParticlesAbsorbed {
            body: BodyId(0),
            count: 1
        }]
    );
}

#[test]
fn test_removed_particles_are_not_absorbed() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut bodies = vec![planet(0, 10.0, 100.0, 0.0)];
    let particles = vec![particle(0, 2.0, 101.0)];
    let mut changes = FrameChanges::new();
    changes.remove_particle(ParticleId(0));

    resolver.absorb_particles(&mut bodies, &particles, &mut changes);

    assert_eq!(bodies[0].mass, 10.0);
    assert!(changes.events.is_empty());
}

#[test]
fn test_overweight_star_collapses_to_neutron_star() {
    let resolver = resolver_with(|c| c.policy.star_to_neutron_probability = 1.0);
    let mut harness = Harness::new();
    let mut bodies = vec![stellar(0, BodyKind::Star, 360.0, 300.0)];
    let mut changes = FrameChanges::new();

    resolver.apply_transitions(&mut bodies, 1.0, &mut changes, &mut harness.emitter());

    assert_eq!(bodies[0].kind, BodyKind::NeutronStar);
    assert_relative_eq!(bodies[0].mass, 252.0);
    assert_eq!(bodies[0].consumption_radius, bodies[0].radius * 2.5);
    assert!(changes.removed_bodies().is_empty());
    assert!(changes.new_particles.is_empty());
}

#[test]
fn test_overweight_star_goes_supernova() {
    let resolver = resolver_with(|c| c.policy.star_to_neutron_probability = 0.0);
    let mut harness = Harness::new();
    let mut bodies = vec![stellar(0, BodyKind::Star, 360.0, 300.0)];
    let mut changes = FrameChanges::new();

    resolver.apply_transitions(&mut bodies, 1.0, &mut changes, &mut harness.emitter());

    assert_eq!(changes.removed_bodies(), &[BodyId(0)]);
    assert_eq!(changes.new_particles.len(), 100);
    assert!(changes.new_particles.iter().all(|p| p.mass == 2.0));
    assert!(matches!(
        changes.events[0],
        SimEvent::Supernova {
            particles: 100,
            ..
        }
    ));
}

#[test]
fn test_planet_ignites_without_debris() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut harness = Harness::new();
    let mut bodies = vec![planet(0, 151.0, 300.0, 0.0)];
    let mut changes = FrameChanges::new();

    resolver.apply_transitions(&mut bodies, 1.0, &mut changes, &mut harness.emitter());

    assert_eq!(bodies[0].kind, BodyKind::Star);
    assert_eq!(bodies[0].radius, 151.0_f64.powf(0.4).max(8.0));
    assert!(changes.new_particles.is_empty());
    assert_eq!(changes.events, vec![SimEvent::Ignited { body: BodyId(0) }]);
}

#[test]
fn test_disruption_conserves_mass() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut harness = Harness::new();
    let mut bodies = vec![
        stellar(0, BodyKind::Star, 40.0, 300.0),
        stellar(1, BodyKind::NeutronStar, 300.0, 800.0),
    ];
    let mut changes = FrameChanges::new();

    resolver.apply_transitions(&mut bodies, 1.0, &mut changes, &mut harness.emitter());

    assert_eq!(changes.removed_bodies(), &[BodyId(0), BodyId(1)]);
    let planet_mass: f64 = changes.new_bodies.iter().map(|b| b.mass).sum();
    assert_relative_eq!(planet_mass + spawned_particle_mass(&changes), 340.0, epsilon = 1e-9);
    assert!(planet_mass <= 0.6 * 340.0 + 1e-9);
    assert!(changes.new_bodies.iter().all(|b| b.kind == BodyKind::Planet));
    assert!((2..=6).contains(&changes.new_bodies.len()));
}

#[test]
fn test_reset_event_blocks_black_hole_formation() {
    let resolver = resolver_with(|c| c.policy.neutron_to_black_hole_probability = 1.0)
        .with_reset_event_active(true);
    let mut harness = Harness::new();
    let mut bodies = vec![stellar(0, BodyKind::NeutronStar, 900.0, 300.0)];
    let mut changes = FrameChanges::new();

    resolver.apply_transitions(&mut bodies, 1.0, &mut changes, &mut harness.emitter());

    assert_eq!(bodies[0].kind, BodyKind::NeutronStar);
    assert!(changes.events.is_empty());

    let resolver = resolver.with_reset_event_active(false);
    resolver.apply_transitions(&mut bodies, 1.0, &mut changes, &mut harness.emitter());

    assert_eq!(bodies[0].kind, BodyKind::BlackHole);
    assert_eq!(bodies[0].radius, 900.0_f64.powf(0.3).max(10.0));
    assert_eq!(
        changes.events,
        vec![SimEvent::CollapsedToBlackHole { body: BodyId(0) }]
    );
}

#[test]
fn test_evaporation_honours_weights() {
    let resolver = resolver_with(|c| {
        c.policy.evaporation = EvaporationWeights {
            supernova: 0.0,
            neutron_collapse: 1.0,
            radiate: 0.0,
        }
    });
    let mut harness = Harness::new();
    let mut bodies = vec![stellar(0, BodyKind::BlackHole, 600.0, 300.0)];
    let mut changes = FrameChanges::new();

    resolver.apply_transitions(&mut bodies, 1.0, &mut changes, &mut harness.emitter());

    let remaining = 600.0 - 0.0002 * 600.0;
    assert_eq!(changes.removed_bodies(), &[BodyId(0)]);
    assert_eq!(changes.new_bodies.len(), 1);
    assert_eq!(changes.new_bodies[0].kind, BodyKind::NeutronStar);
    assert_relative_eq!(changes.new_bodies[0].mass, 0.7 * remaining);
    assert_eq!(changes.new_particles.len(), 80);
    assert_eq!(
        changes.events,
        vec![SimEvent::Evaporated {
            body: BodyId(0),
            outcome: EvaporationOutcome::NeutronCollapse
        }]
    );
}

#[test]
fn test_hypernova_keeps_black_hole() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut harness = Harness::new();
    let mut bodies = vec![stellar(0, BodyKind::BlackHole, 200_000.0, 300.0)];
    let mut changes = FrameChanges::new();

    resolver.apply_transitions(&mut bodies, 1.0, &mut changes, &mut harness.emitter());

    assert!(changes.removed_bodies().is_empty());
    assert_eq!(changes.new_particles.len(), 100);
    assert_relative_eq!(bodies[0].mass, 200_000.0 - 40.0 - 200.0);
}

#[test]
fn test_planets_never_consume_each_other() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut bodies = vec![planet(0, 100.0, 100.0, 0.0), planet(1, 5.0, 150.0, 0.0)];
    let mut changes = FrameChanges::new();

    resolver.consume_bodies(&mut bodies, &mut changes);

    assert!(changes.removed_bodies().is_empty());
    assert_eq!(bodies[0].mass, 100.0);
}

#[test]
fn test_equal_masses_do_not_consume() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut bodies = vec![
        stellar(0, BodyKind::Star, 100.0, 100.0),
        stellar(1, BodyKind::Star, 100.0, 105.0),
    ];
    let mut changes = FrameChanges::new();

    resolver.consume_bodies(&mut bodies, &mut changes);

    assert!(changes.removed_bodies().is_empty());
}

#[test]
fn test_black_hole_consumes_star() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut bodies = vec![
        stellar(0, BodyKind::Star, 100.0, 100.0),
        stellar(1, BodyKind::BlackHole, 1000.0, 120.0),
    ];
    let mut changes = FrameChanges::new();

    resolver.consume_bodies(&mut bodies, &mut changes);

    assert_eq!(changes.removed_bodies(), &[BodyId(0)]);
    assert_eq!(bodies[1].mass, 1080.0);
    assert_eq!(
        changes.events,
        vec![SimEvent::BodyConsumed {
            consumer: BodyId(1),
            consumed: BodyId(0)
        }]
    );
}

#[test]
fn test_directional_impact_removes_smaller_only() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut harness = Harness::new();
    let mut bodies = vec![planet(0, 50.0, 100.0, 6.0), planet(1, 5.0, 108.0, 0.0)];
    let mut changes = FrameChanges::new();

    resolver.resolve_planet_impacts(&mut bodies, &mut changes, &mut harness.emitter());

    assert_eq!(changes.removed_bodies(), &[BodyId(1)]);
    assert_eq!(bodies[0].mass, 50.0);
    assert_eq!(changes.new_particles.len(), 14);
    assert_relative_eq!(spawned_particle_mass(&changes), 5.0, epsilon = 1e-9);
    assert_eq!(
        changes.events,
        vec![SimEvent::PlanetImpact {
            bigger: BodyId(0),
            smaller: BodyId(1),
            outcome: ImpactOutcome::Directional
        }]
    );
}

#[test]
fn test_violent_impact_shatters_both() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut harness = Harness::new();
    let mut bodies = vec![planet(0, 50.0, 100.0, 0.0), planet(1, 5.0, 108.0, -6.0)];
    let mut changes = FrameChanges::new();

    resolver.resolve_planet_impacts(&mut bodies, &mut changes, &mut harness.emitter());

    assert_eq!(changes.removed_bodies(), &[BodyId(0), BodyId(1)]);
    assert_eq!(changes.new_particles.len(), 60);
    assert_relative_eq!(spawned_particle_mass(&changes), 55.0, epsilon = 1e-9);
}

#[test]
fn test_gentle_impact_accretes() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut harness = Harness::new();
    let mut bodies = vec![planet(0, 5.0, 108.0, 0.0), planet(1, 50.0, 100.0, 1.0)];
    let mut changes = FrameChanges::new();

    resolver.resolve_planet_impacts(&mut bodies, &mut changes, &mut harness.emitter());

    assert_eq!(changes.removed_bodies(), &[BodyId(0)]);
    assert_eq!(bodies[1].mass, 54.0);
    assert!(changes.new_particles.is_empty());
}

#[test]
fn test_equal_mass_planets_never_accrete() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut harness = Harness::new();
    let mut bodies = vec![planet(0, 20.0, 100.0, 1.0), planet(1, 20.0, 110.0, 0.0)];
    let mut changes = FrameChanges::new();

    resolver.resolve_planet_impacts(&mut bodies, &mut changes, &mut harness.emitter());

    assert_eq!(changes.removed_bodies(), &[BodyId(0), BodyId(1)]);
    assert_eq!(bodies[0].mass, 20.0);
    assert_relative_eq!(spawned_particle_mass(&changes), 40.0, epsilon = 1e-9);
    assert_eq!(
        changes.events,
        vec![SimEvent::PlanetImpact {
            bigger: BodyId(0),
            smaller: BodyId(1),
            outcome: ImpactOutcome::Fallback
        }]
    );
}

#[test]
fn test_neutron_stars_merge() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut harness = Harness::new();
    let bodies = vec![
        stellar(0, BodyKind::NeutronStar, 400.0, 100.0),
        stellar(1, BodyKind::NeutronStar, 500.0, 110.0),
    ];
    let mut changes = FrameChanges::new();

    resolver.merge_neutron_stars(&bodies, &mut changes, &mut harness.emitter());

    assert_eq!(changes.removed_bodies(), &[BodyId(0), BodyId(1)]);
    assert_relative_eq!(spawned_particle_mass(&changes), 0.7 * 900.0, epsilon = 1e-9);
    assert_eq!(changes.new_particles.len(), 100);
}

#[test]
fn test_removed_bodies_skip_later_passes() {
    let resolver = CollisionResolver::new(&SimulationConfig::default());
    let mut harness = Harness::new();
    let mut bodies = vec![
        planet(0, 50.0, 100.0, 6.0),
        planet(1, 5.0, 108.0, 0.0),
        stellar(2, BodyKind::Star, 200.0, 112.0),
    ];
    let mut changes = FrameChanges::new();

    resolver.resolve(&mut bodies, &[], 1.0, &mut changes, &mut harness.emitter());

    // The star swallows both planets before they can collide with each other
    assert_eq!(changes.removed_bodies(), &[BodyId(0), BodyId(1)]);
    assert!(
        !changes
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::PlanetImpact { .. }))
    );
    assert_relative_eq!(bodies[2].mass, 200.0 + 0.8 * 55.0);
}

#[test]
fn test_removal_is_recorded_once() {
    let mut changes = FrameChanges::new();
    assert!(changes.remove_body(BodyId(3)));
    assert!(!changes.remove_body(BodyId(3)));
    assert_eq!(changes.removed_bodies(), &[BodyId(3)]);
    assert!(changes.is_body_removed(BodyId(3)));
}
