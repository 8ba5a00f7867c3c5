use nalgebra::{Point2, Vector2};

use crate::body::{Body, BodyId};
use crate::collisions::detection::*;
use crate::kind::{BodyKind, Rgb};

fn moving_planet(id: u32, mass: f64, x: f64, vx: f64) -> Body {
    Body::planet(
        BodyId(id),
        mass,
        Point2::new(x, 100.0),
        Vector2::new(vx, 0.0),
        Rgb::WHITE,
    )
}

#[test]
fn test_bigger_faster_above_threshold_is_directional() {
    let bigger = moving_planet(0, 50.0, 100.0, 6.0);
    let smaller = moving_planet(1, 5.0, 108.0, 0.0);

    assert_eq!(classify_impact(&bigger, &smaller, 4.5), ImpactOutcome::Directional);
}

#[test]
fn test_smaller_faster_above_threshold_shatters_both() {
    let bigger = moving_planet(0, 50.0, 100.0, 0.0);
    let smaller = moving_planet(1, 5.0, 108.0, -6.0);

    let outcome = classify_impact(&bigger, &smaller, 4.5);
    assert_eq!(outcome, ImpactOutcome::BothShatter);
    assert!(outcome.destroys_both());
}

#[test]
fn test_gentle_impact_is_accretion() {
    let bigger = moving_planet(0, 50.0, 100.0, 2.0);
    let smaller = moving_planet(1, 5.0, 108.0, 0.5);

    assert_eq!(classify_impact(&bigger, &smaller, 4.5), ImpactOutcome::Accretion);
}

#[test]
fn test_threshold_is_inclusive_for_accretion() {
    let bigger = moving_planet(0, 50.0, 100.0, 4.5);
    let smaller = moving_planet(1, 5.0, 108.0, 0.0);

    assert_eq!(classify_impact(&bigger, &smaller, 4.5), ImpactOutcome::Accretion);
}

#[test]
fn test_equal_masses_fall_back_instead_of_accreting() {
    let first = moving_planet(0, 20.0, 100.0, 1.0);
    let second = moving_planet(1, 20.0, 110.0, 0.0);

    let (bigger, smaller) = by_mass(&first, &second);
    assert_eq!(classify_impact(bigger, smaller, 4.5), ImpactOutcome::Fallback);
}

#[test]
fn test_equal_speeds_fall_back() {
    let bigger = moving_planet(0, 50.0, 100.0, 1.0);
    let smaller = moving_planet(1, 5.0, 108.0, -1.0);

    let outcome = classify_impact(&bigger, &smaller, 4.5);
    assert_eq!(outcome, ImpactOutcome::Fallback);
    assert!(outcome.destroys_both());
}

#[test]
fn test_by_mass_prefers_first_on_tie() {
    let a = moving_planet(0, 10.0, 0.0, 0.0);
    let b = moving_planet(1, 10.0, 5.0, 0.0);

    let (bigger, smaller) = by_mass(&a, &b);
    assert_eq!(bigger.id, BodyId(0));
    assert_eq!(smaller.id, BodyId(1));

    let c = moving_planet(2, 20.0, 5.0, 0.0);
    assert_eq!(by_mass(&a, &c).0.id, BodyId(2));
}

#[test]
fn test_neutron_star_contact_requires_both_types() {
    let a = Body::of_kind(
        BodyId(0),
        BodyKind::NeutronStar,
        400.0,
        Point2::new(100.0, 100.0),
        Vector2::zeros(),
    );
    let b = Body::of_kind(
        BodyId(1),
        BodyKind::NeutronStar,
        400.0,
        Point2::new(110.0, 100.0),
        Vector2::zeros(),
    );
    let planet = moving_planet(2, 10.0, 105.0, 0.0);

    assert!(neutron_stars_touch(&a, &b));
    assert!(bodies_touch(&a, &planet));
    assert!(!neutron_stars_touch(&a, &planet));
}
