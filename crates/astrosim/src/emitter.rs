//! Identity allocation and the random source every generator draws from

use nalgebra::{Point2, Vector2};
use rand::Rng;
use rand_chacha::ChaChaRng;
use std::ops::Range;

use crate::body::{Body, BodyId};
use crate::kind::{BodyKind, Rgb};
use crate::particle::{Particle, ParticleId};

/// Hands out body and particle ids that are never reused
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_body: u32,
    next_particle: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&mut self) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        id
    }

    pub fn particle(&mut self) -> ParticleId {
        let id = ParticleId(self.next_particle);
        self.next_particle += 1;
        id
    }
}

/// Creates new bodies and particles for one frame
///
/// Bundles the world's seeded generator with its id allocator so generators
/// can be exercised in isolation with a fixed seed.
pub struct Emitter<'a> {
    rng: &'a mut ChaChaRng,
    ids: &'a mut IdAllocator,
}

impl<'a> Emitter<'a> {
    pub fn new(rng: &'a mut ChaChaRng, ids: &'a mut IdAllocator) -> Self {
        Self { rng, ids }
    }

    /// Uniform sample from `range`
    pub fn uniform(&mut self, range: Range<f64>) -> f64 {
        self.rng.random_range(range)
    }

    /// Uniform angle in `[0, 2π)`
    pub fn angle(&mut self) -> f64 {
        self.rng.random_range(0.0..std::f64::consts::TAU)
    }

    /// Bernoulli trial with success probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.random::<f64>() < p
    }

    /// Number in `[0, 1)`
    pub fn roll(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    pub fn count(&mut self, range: std::ops::RangeInclusive<usize>) -> usize {
        self.rng.random_range(range)
    }

    /// Random bright colour with every channel in `100..=255`
    pub fn bright_color(&mut self) -> Rgb {
        Rgb(
            self.rng.random_range(100..=255),
            self.rng.random_range(100..=255),
            self.rng.random_range(100..=255),
        )
    }

    /// Red-orange shade used by supernova debris
    pub fn ember_color(&mut self) -> Rgb {
        Rgb(
            255,
            self.rng.random_range(100..=200),
            self.rng.random_range(0..=100),
        )
    }

    pub fn particle(
        &mut self,
        position: Point2<f64>,
        velocity: Vector2<f64>,
        color: Rgb,
        mass: f64,
    ) -> Particle {
        Particle::new(self.ids.particle(), position, velocity, color, mass)
    }

    pub fn planet(
        &mut self,
        mass: f64,
        radius: f64,
        position: Point2<f64>,
        velocity: Vector2<f64>,
        color: Rgb,
    ) -> Body {
        Body::new(
            self.ids.body(),
            BodyKind::Planet,
            mass,
            radius,
            position,
            velocity,
            color,
        )
    }

    pub fn body_of_kind(
        &mut self,
        kind: BodyKind,
        mass: f64,
        position: Point2<f64>,
        velocity: Vector2<f64>,
    ) -> Body {
        Body::of_kind(self.ids.body(), kind, mass, position, velocity)
    }
}

/// Unit vector pointing along `angle`
pub fn heading(angle: f64) -> Vector2<f64> {
    Vector2::new(angle.cos(), angle.sin())
}
