//! Force models for the body collection
//!
//! This module provides the `ForceModel` trait, its Newtonian and
//! relativistic implementations, and the summation helpers the integrator and
//! particle system use.

use nalgebra::{Point2, Vector2};

use crate::body::Body;
use crate::config::Theory;

pub mod gravity;


pub use crate::config::GravityParams;
pub use gravity::{GeneralRelativity, Newtonian};

/// A pairwise gravity law
///
/// Implementations are pure: identical inputs produce bit-identical output.
///
/// # Examples
///
/// ```
/// use astrosim::body::{Body, BodyId};
/// use astrosim::config::GravityParams;
/// use astrosim::forces::{ForceModel, Newtonian};
/// use astrosim::kind::Rgb;
/// use nalgebra::{Point2, Vector2};
///
/// let a = Body::planet(BodyId(0), 10.0, Point2::new(0.0, 0.0), Vector2::zeros(), Rgb::WHITE);
/// let b = Body::planet(BodyId(1), 10.0, Point2::new(100.0, 0.0), Vector2::zeros(), Rgb::WHITE);
///
/// let f = Newtonian.force(&a, &b, &GravityParams::default());
/// assert!(f.x > 0.0);
/// ```
pub trait ForceModel: Send + Sync {
    /// Force exerted on `on` by `by`
    fn force(&self, on: &Body, by: &Body, params: &GravityParams) -> Vector2<f64>;
}

impl Theory {
    /// Force model implementing this theory
    pub fn model(self) -> &'static dyn ForceModel {
        match self {
            Theory::Newtonian => &Newtonian,
            Theory::GeneralRelativity => &GeneralRelativity,
        }
    }
}

/// Force on `a` from `b` under `theory`
pub fn pairwise_force(a: &Body, b: &Body, theory: Theory, params: &GravityParams) -> Vector2<f64> {
    theory.model().force(a, b, params)
}

/// Sum of forces on `bodies[idx]` from every other body
pub fn net_force(
    idx: usize,
    bodies: &[Body],
    model: &dyn ForceModel,
    params: &GravityParams,
) -> Vector2<f64> {
    let body = &bodies[idx];
    bodies
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != idx)
        .map(|(_, other)| model.force(body, other, params))
        .fold(Vector2::zeros(), |acc, f| acc + f)
}

/// Plain softened attraction between two point masses
///
/// Used for particles, which have no surface. Pairs closer than the
/// softening length exert nothing on each other.
pub fn point_attraction(
    at: Point2<f64>,
    mass: f64,
    source: Point2<f64>,
    source_mass: f64,
    params: &GravityParams,
) -> Vector2<f64> {
    let delta = source - at;
    let dist_sq = delta.magnitude_squared();
    if dist_sq < params.softening {
        return Vector2::zeros();
    }
    let magnitude =
        params.multiplier * params.g * mass * source_mass / (dist_sq + params.softening);
    let theta = delta.y.atan2(delta.x);
    Vector2::new(theta.cos() * magnitude, theta.sin() * magnitude)
}
