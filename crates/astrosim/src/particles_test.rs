use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::body::{Body, BodyId};
use crate::config::{SimulationConfig, TimeScale};
use crate::emitter::{Emitter, IdAllocator};
use crate::kind::{BodyKind, Rgb};
use crate::particle::{Particle, ParticleId};
use crate::particles::ParticleSystem;

fn particle(id: u32, x: f64, y: f64, age: f64) -> Particle {
    let mut p = Particle::new(
        ParticleId(id),
        Point2::new(x, y),
        Vector2::new(1.0, 0.0),
        Rgb::WHITE,
        2.0,
    );
    p.age = age;
    p
}

fn system(particles: Vec<Particle>) -> ParticleSystem {
    let mut system = ParticleSystem::new();
    system.extend(particles);
    system
}

fn combine(system: &ParticleSystem) -> Option<crate::particles::Cluster> {
    let config = SimulationConfig::default();
    let mut rng = ChaChaRng::seed_from_u64(5);
    let mut ids = IdAllocator::new();
    let mut emitter = Emitter::new(&mut rng, &mut ids);
    system.try_combine_particles(&config, &mut emitter)
}

#[test]
fn test_decayed_particles_are_dropped() {
    let mut decayed = particle(1, 200.0, 200.0, 0.0);
    decayed.mass = 1e-10;
    let mut particles = system(vec![particle(0, 100.0, 100.0, 0.0), decayed]);

    let dropped = particles.integrate(&[], &SimulationConfig::default(), TimeScale::default());

    assert_eq!(dropped, vec![ParticleId(1)]);
    assert_eq!(particles.len(), 1);
    assert!(particles.get(ParticleId(1)).is_none());
}

#[test]
fn test_particles_fall_toward_bodies() {
    let star = Body::of_kind(
        BodyId(0),
        BodyKind::Star,
        1000.0,
        Point2::new(500.0, 200.0),
        Vector2::zeros(),
    );
    let mut still = particle(0, 400.0, 200.0, 0.0);
    still.velocity = Vector2::zeros();
    let mut particles = system(vec![still]);

    particles.integrate(&[star], &SimulationConfig::default(), TimeScale::default());

    let moved = &particles.particles()[0];
    assert!(moved.velocity.x > 0.0);
    assert!(moved.last_force.x > 0.0);
    assert_relative_eq!(moved.velocity.y, 0.0, epsilon = 1e-12);
}

#[test]
fn test_integrate_ages_by_time_scale() {
    let mut particles = system(vec![particle(0, 100.0, 100.0, 0.0)]);

    particles.integrate(&[], &SimulationConfig::default(), TimeScale::new(3));

    let p = &particles.particles()[0];
    assert_eq!(p.age, 3.0);
    assert_eq!(p.position, Point2::new(103.0, 100.0));
    assert_eq!(p.mass_history.len(), 1);
}

#[test]
fn test_settled_group_becomes_planet() {
    let mut members: Vec<Particle> = (0..5)
        .map(|i| particle(i + 1, 100.0 + f64::from(i), 100.0, 31.0))
        .collect();
    members.insert(0, particle(0, 800.0, 100.0, 31.0));
    let particles = system(members);

    let cluster = combine(&particles).expect("group should cluster");

    assert_eq!(cluster.members.len(), 5);
    assert!(!cluster.members.contains(&ParticleId(0)));
    assert_eq!(cluster.body.kind, BodyKind::Planet);
    assert_relative_eq!(cluster.body.mass, 10.0);
    assert_relative_eq!(cluster.body.radius, 4.0);
    assert_relative_eq!(cluster.body.position.x, 102.0);
    assert_relative_eq!(cluster.body.position.y, 100.0);
    assert_relative_eq!(cluster.body.velocity.x, 1.0);
    assert_eq!(particles.len(), 6);
}

#[test]
fn test_light_cluster_gets_minimum_radius() {
    let members: Vec<Particle> = (0..5)
        .map(|i| {
            let mut p = particle(i, 100.0, 100.0 + f64::from(i), 40.0);
            p.mass = 0.5;
            p
        })
        .collect();

    let cluster = combine(&system(members)).expect("group should cluster");

    assert_relative_eq!(cluster.body.mass, 2.5);
    assert_eq!(cluster.body.radius, 3.0);
}

#[test]
fn test_young_particles_do_not_cluster() {
    let members = (0..8)
        .map(|i| particle(i, 100.0 + f64::from(i), 100.0, 10.0))
        .collect();

    assert!(combine(&system(members)).is_none());
}

#[test]
fn test_too_few_particles_do_not_cluster() {
    let members = (0..4)
        .map(|i| particle(i, 100.0 + f64::from(i), 100.0, 50.0))
        .collect();

    assert!(combine(&system(members)).is_none());
}

#[test]
fn test_scattered_particles_do_not_cluster() {
    let members = (0..6)
        .map(|i| particle(i, 100.0 + 100.0 * f64::from(i), 100.0, 50.0))
        .collect();

    assert!(combine(&system(members)).is_none());
}
