//! Path preview for a single body
//!
//! The prediction moves a copy of the body through the current field of the
//! other bodies, which are held where they are. It ignores the gravity
//! multiplier, collisions and type transitions, so it is only a guide.

use nalgebra::{Point2, Vector2};

use crate::body::{Body, BodyId};
use crate::config::{GravityParams, SimulationConfig};
use crate::forces::point_attraction;
use crate::integrator::wrap_body;

/// Sampled future position of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub position: Point2<f64>,
    /// Body age at this point
    pub year: f64,
}

/// Steps between samples that space points one simulated year apart
pub fn yearly_sample_interval(config: &SimulationConfig) -> usize {
    ((1.0 / config.years_per_frame).round() as usize).max(1)
}

/// Predicts where `id` will be over the next `steps` unscaled frames
///
/// A point is kept every `sample_every` steps, starting with the first.
///
/// # Arguments
///
/// * `bodies` - Current body collection, including the predicted body
/// * `id` - Body to predict
/// * `config` - Supplies G, softening, fps and the wrap area
/// * `steps` - Frames to integrate
/// * `sample_every` - Frames between kept points (zero is treated as one)
///
/// # Returns
///
/// The sampled points, or `None` if `id` is not in `bodies`
///
/// # Examples
///
/// ```
/// use astrosim::body::{Body, BodyId};
/// use astrosim::config::SimulationConfig;
/// use astrosim::kind::Rgb;
/// use astrosim::trajectory::predict_trajectory;
/// use nalgebra::{Point2, Vector2};
///
/// let config = SimulationConfig::default();
/// let bodies = vec![Body::planet(
///     BodyId(0),
///     10.0,
///     Point2::new(100.0, 100.0),
///     Vector2::new(1.0, 0.0),
///     Rgb::WHITE,
/// )];
///
/// let points = predict_trajectory(&bodies, BodyId(0), &config, 100, 20).unwrap();
/// assert_eq!(points.len(), 5);
/// assert_eq!(points[0].position, Point2::new(101.0, 100.0));
/// ```
pub fn predict_trajectory(
    bodies: &[Body],
    id: BodyId,
    config: &SimulationConfig,
    steps: usize,
    sample_every: usize,
) -> Option<Vec<TrajectoryPoint>> {
    let body = bodies.iter().find(|b| b.id == id)?;
    let sample_every = sample_every.max(1);
    let params = GravityParams {
        multiplier: 1.0,
        ..config.gravity()
    };

    let mut position = body.position;
    let mut velocity = body.velocity;
    let mut points = Vec::with_capacity(steps / sample_every + 1);

    for step in 0..steps {
        let force = bodies
            .iter()
            .filter(|other| other.id != id)
            .filter(|other| (other.position - position).magnitude() >= body.radius + other.radius)
            .map(|other| point_attraction(position, body.mass, other.position, other.mass, &params))
            .fold(Vector2::zeros(), |acc, f| acc + f);

        velocity += force / body.mass / config.fps;
        position += velocity;
        wrap_body(&mut position, body.radius, &config.area);

        if step % sample_every == 0 {
            points.push(TrajectoryPoint {
                position,
                year: body.age + step as f64 * config.years_per_frame,
            });
        }
    }

    Some(points)
}
