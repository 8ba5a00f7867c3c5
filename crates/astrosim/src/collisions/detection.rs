//! Contact tests and impact classification

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::kind::BodyKind;

/// Result of two planets hitting each other
///
/// Speeds are compared squared; the relative speed is compared against the
/// impact threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactOutcome {
    /// Smaller body faster and closing above the threshold: both shatter
    BothShatter,
    /// Smaller body slower and closing at or below the threshold: bigger absorbs it
    Accretion,
    /// Bigger body faster and closing above the threshold: fragments thrown forward
    Directional,
    /// Anything else: both shatter
    Fallback,
}

impl ImpactOutcome {
    /// Whether both planets are destroyed
    pub fn destroys_both(self) -> bool {
        matches!(self, ImpactOutcome::BothShatter | ImpactOutcome::Fallback)
    }
}

/// Whether the surfaces of `a` and `b` overlap
///
/// # Examples
///
/// ```
/// use astrosim::body::{Body, BodyId};
/// use astrosim::collisions::bodies_touch;
/// use astrosim::kind::Rgb;
/// use nalgebra::{Point2, Vector2};
///
/// let a = Body::planet(BodyId(0), 5.0, Point2::new(0.0, 0.0), Vector2::zeros(), Rgb::WHITE);
/// let b = Body::planet(BodyId(1), 5.0, Point2::new(9.0, 0.0), Vector2::zeros(), Rgb::WHITE);
/// let c = Body::planet(BodyId(2), 5.0, Point2::new(10.0, 0.0), Vector2::zeros(), Rgb::WHITE);
///
/// assert!(bodies_touch(&a, &b));
/// assert!(!bodies_touch(&a, &c));
/// ```
pub fn bodies_touch(a: &Body, b: &Body) -> bool {
    a.distance_to(b) < a.radius + b.radius
}

/// Whether `a` and `b` are both neutron stars in contact
pub fn neutron_stars_touch(a: &Body, b: &Body) -> bool {
    a.kind == BodyKind::NeutronStar && b.kind == BodyKind::NeutronStar && bodies_touch(a, b)
}

/// Orders two bodies as `(bigger, smaller)`
///
/// Ties go to `a`.
pub fn by_mass<'a>(a: &'a Body, b: &'a Body) -> (&'a Body, &'a Body) {
    if a.mass >= b.mass { (a, b) } else { (b, a) }
}

/// Classifies an impact between `bigger` and `smaller`
///
/// # Arguments
///
/// * `bigger` - The heavier planet (ties broken by the caller)
/// * `smaller` - The lighter planet
/// * `threshold` - Relative speed separating gentle from violent impacts
///
/// Equal masses never accrete, since neither body is strictly heavier.
pub fn classify_impact(bigger: &Body, smaller: &Body, threshold: f64) -> ImpactOutcome {
    let relative_speed = (smaller.velocity - bigger.velocity).magnitude();
    let bigger_sq = bigger.speed_squared();
    let smaller_sq = smaller.speed_squared();

    if smaller_sq > bigger_sq && relative_speed > threshold {
        ImpactOutcome::BothShatter
    } else if smaller_sq < bigger_sq && relative_speed <= threshold && bigger.mass > smaller.mass {
        ImpactOutcome::Accretion
    } else if bigger_sq > smaller_sq && relative_speed > threshold {
        ImpactOutcome::Directional
    } else {
        ImpactOutcome::Fallback
    }
}
