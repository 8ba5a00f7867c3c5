//! Direct pairwise gravity, Newtonian and GR-corrected

use nalgebra::Vector2;

use crate::body::Body;
use crate::config::GravityParams;
use crate::forces::ForceModel;
use crate::kind::BodyKind;

/// Softened inverse-square attraction
///
/// `F = multiplier * G * m_a * m_b / (d² + ε)`. Bodies whose surfaces overlap
/// exert no force; the collision resolver handles them instead. A black hole
/// on either side doubles the magnitude.
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
/// let b = Body::planet(BodyId(1), 10.0, Point2::new(5.0, 0.0), Vector2::zeros(), Rgb::WHITE);
///
/// // Radii of 10 overlap at a distance of 5
/// assert_eq!(Newtonian.force(&a, &b, &GravityParams::default()), Vector2::zeros());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Newtonian;

/// Newtonian attraction scaled by a Schwarzschild correction
///
/// The base force is multiplied by `1 + 3 r_s / (d + ε)` with
/// `r_s = 2 G m_b / c²`, and by a further 1.5 if either body is a black hole.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralRelativity;

/// Separation vector, distance and base magnitude, or `None` on contact
fn base_force(on: &Body, by: &Body, params: &GravityParams) -> Option<(Vector2<f64>, f64, f64)> {
    let delta = by.position - on.position;
    let dist_sq = delta.magnitude_squared();
    let dist = dist_sq.sqrt();

    if dist < on.radius + by.radius {
        return None;
    }

    let magnitude = params.multiplier * params.g * on.mass * by.mass / (dist_sq + params.softening);
    Some((delta, dist, magnitude))
}

fn decompose(delta: Vector2<f64>, magnitude: f64) -> Vector2<f64> {
    let theta = delta.y.atan2(delta.x);
    Vector2::new(theta.cos() * magnitude, theta.sin() * magnitude)
}

fn involves_black_hole(a: &Body, b: &Body) -> bool {
    a.kind == BodyKind::BlackHole || b.kind == BodyKind::BlackHole
}

impl ForceModel for Newtonian {
    fn force(&self, on: &Body, by: &Body, params: &GravityParams) -> Vector2<f64> {
        let Some((delta, _, mut magnitude)) = base_force(on, by, params) else {
            return Vector2::zeros();
        };
        if involves_black_hole(on, by) {
            magnitude *= 2.0;
        }
        decompose(delta, magnitude)
    }
}

impl ForceModel for GeneralRelativity {
    fn force(&self, on: &Body, by: &Body, params: &GravityParams) -> Vector2<f64> {
        let Some((delta, dist, mut magnitude)) = base_force(on, by, params) else {
            return Vector2::zeros();
        };

        let r_s = schwarzschild_radius(by.mass, params);
        magnitude *= 1.0 + 3.0 * r_s / (dist + params.softening);

        if involves_black_hole(on, by) {
            magnitude *= 1.5;
        }
        decompose(delta, magnitude)
    }
}

/// `r_s = 2 G m / c²`
pub fn schwarzschild_radius(mass: f64, params: &GravityParams) -> f64 {
    2.0 * params.g * mass / (params.speed_of_light * params.speed_of_light)
}
