use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::history::{MassHistory, Trail};
use crate::integrator::wrap_body;
use crate::kind::{
    BLACK_HOLE_EVAPORATION_MASS, BLACK_HOLE_HYPERNOVA_MASS, BodyKind, NEUTRON_COLLAPSE_MASS,
    NEUTRON_DISRUPTION_MASS, PLANET_IGNITION_MASS, Rgb, STAR_COLLAPSE_MASS, STAR_DISRUPTION_MASS,
    planet_radius,
};

/// Age a body gains per unscaled step
pub const BODY_AGE_PER_FRAME: f64 = 0.05;

/// Fraction of a consumed body's mass the consumer keeps
pub const BODY_ABSORPTION_EFFICIENCY: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u32);

/// Anything with a location and mass that a body can swallow
pub trait Massive {
    fn position(&self) -> Point2<f64>;

    fn mass(&self) -> f64;

    /// Fraction of `mass` transferred to whatever consumes this
    fn absorption_efficiency(&self) -> f64;
}

/// Mass-threshold driven change a body is due for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Planet heavy enough to become a star
    Ignition,
    /// Overweight star: neutron star or supernova
    StellarCollapse,
    /// Underweight star: particles and small planets
    StellarDisruption,
    /// Overweight neutron star: black hole or supernova
    NeutronCollapse,
    /// Underweight neutron star: particles and small planets
    NeutronDisruption,
    /// Black hole radiated below its survival mass
    Evaporation,
    /// Black hole so heavy it sheds a supernova burst without dying
    Hypernova,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    pub mass: f64,
    pub radius: f64,
    pub consumption_radius: f64,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub color: Rgb,
    pub age: f64,
    /// Net force applied during the most recent step
    pub last_force: Vector2<f64>,
    pub ejection_timer: f64,
    pub mass_history: MassHistory,
    pub trail: Trail,
}

impl Body {
    /// Creates a body, deriving its geometry from `kind` and `mass`
    ///
    /// `radius` is only used for planets. Every other type takes its radius
    /// from the geometry table. A planet radius that is not positive falls back
    /// to the planet preset.
    pub fn new(
        id: BodyId,
        kind: BodyKind,
        mass: f64,
        radius: f64,
        position: Point2<f64>,
        velocity: Vector2<f64>,
        color: Rgb,
    ) -> Self {
        let radius = if radius > 0.0 {
            radius
        } else {
            planet_radius(mass)
        };
        let mut body = Body {
            id,
            kind,
            mass,
            radius,
            consumption_radius: 0.0,
            position,
            velocity,
            color,
            age: 0.0,
            last_force: Vector2::zeros(),
            ejection_timer: 0.0,
            mass_history: MassHistory::new(),
            trail: Trail::new(),
        };
        body.refresh_geometry();
        body
    }

    /// Planet with the preset radius `max(3, mass)`
    ///
    /// # Examples
    ///
    /// ```
    /// use astrosim::body::{Body, BodyId};
    /// use astrosim::kind::Rgb;
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let planet = Body::planet(BodyId(0), 10.0, Point2::new(0.0, 0.0), Vector2::zeros(), Rgb::WHITE);
    /// assert_eq!(planet.radius, 10.0);
    /// assert_eq!(planet.consumption_radius, 20.0);
    /// ```
    pub fn planet(
        id: BodyId,
        mass: f64,
        position: Point2<f64>,
        velocity: Vector2<f64>,
        color: Rgb,
    ) -> Self {
        Self::new(
            id,
            BodyKind::Planet,
            mass,
            planet_radius(mass),
            position,
            velocity,
            color,
        )
    }

    /// Star below the collapse mass, neutron star at or above it
    pub fn stellar(id: BodyId, mass: f64, position: Point2<f64>, velocity: Vector2<f64>) -> Self {
        let kind = if mass < STAR_COLLAPSE_MASS {
            BodyKind::Star
        } else {
            BodyKind::NeutronStar
        };
        Self::of_kind(id, kind, mass, position, velocity)
    }

    pub fn black_hole(
        id: BodyId,
        mass: f64,
        position: Point2<f64>,
        velocity: Vector2<f64>,
    ) -> Self {
        Self::of_kind(id, BodyKind::BlackHole, mass, position, velocity)
    }

    /// Body of a stellar type wearing that type's colour
    pub fn of_kind(
        id: BodyId,
        kind: BodyKind,
        mass: f64,
        position: Point2<f64>,
        velocity: Vector2<f64>,
    ) -> Self {
        let color = kind.signature_color().unwrap_or(Rgb::WHITE);
        Self::new(id, kind, mass, 0.0, position, velocity, color)
    }

    /// Recomputes radius and consumption radius from `(mass, kind)`
    pub fn refresh_geometry(&mut self) {
        if let Some(radius) = self.kind.radius_for(self.mass) {
            self.radius = radius;
        }
        self.consumption_radius = self.radius * self.kind.consumption_factor();
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.refresh_geometry();
    }

    /// Switches type, taking on the new type's colour and geometry
    pub fn become_kind(&mut self, kind: BodyKind) {
        self.kind = kind;
        if let Some(color) = kind.signature_color() {
            self.color = color;
        }
        self.refresh_geometry();
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn speed_squared(&self) -> f64 {
        self.velocity.magnitude_squared()
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.position - other.position).magnitude()
    }

    /// Whether `other` lies inside this body's consumption radius
    pub fn can_consume<M: Massive>(&self, other: &M) -> bool {
        (other.position() - self.position).magnitude() < self.consumption_radius
    }

    /// Absorbs `other`'s mass at its transfer efficiency
    ///
    /// # Examples
    ///
    /// ```
    /// use astrosim::body::{Body, BodyId};
    /// use astrosim::kind::Rgb;
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let mut big = Body::planet(BodyId(0), 100.0, Point2::new(0.0, 0.0), Vector2::zeros(), Rgb::WHITE);
    /// let small = Body::planet(BodyId(1), 10.0, Point2::new(5.0, 0.0), Vector2::zeros(), Rgb::WHITE);
    ///
    /// big.consume(&small);
    /// assert_eq!(big.mass, 108.0);
    /// ```
    pub fn consume<M: Massive>(&mut self, other: &M) {
        let gained = other.mass() * other.absorption_efficiency();
        self.set_mass(self.mass + gained);
    }

    /// Threshold transition this body is due for, if any
    ///
    /// A pure function of `(kind, mass)`; at most one transition applies.
    pub fn pending_transition(&self) -> Option<Transition> {
        match self.kind {
            BodyKind::Planet if self.mass > PLANET_IGNITION_MASS => Some(Transition::Ignition),
            BodyKind::Star if self.mass > STAR_COLLAPSE_MASS => Some(Transition::StellarCollapse),
            BodyKind::Star if self.mass < STAR_DISRUPTION_MASS => {
                Some(Transition::StellarDisruption)
            }
            BodyKind::NeutronStar if self.mass > NEUTRON_COLLAPSE_MASS => {
                Some(Transition::NeutronCollapse)
            }
            BodyKind::NeutronStar if self.mass < NEUTRON_DISRUPTION_MASS => {
                Some(Transition::NeutronDisruption)
            }
            BodyKind::BlackHole if self.mass < BLACK_HOLE_EVAPORATION_MASS => {
                Some(Transition::Evaporation)
            }
            BodyKind::BlackHole if self.mass > BLACK_HOLE_HYPERNOVA_MASS => {
                Some(Transition::Hypernova)
            }
            _ => None,
        }
    }

    /// Hawking-radiation decay for black holes; other types are untouched
    ///
    /// Falling below the survival mass surfaces as
    /// [`Transition::Evaporation`] from [`Body::pending_transition`].
    pub fn radiate(&mut self, time_scale: f64) {
        if self.kind != BodyKind::BlackHole {
            return;
        }
        let loss = (0.0002 * self.mass).max(0.01) * time_scale;
        self.set_mass((self.mass - loss).max(f64::MIN_POSITIVE));
    }

    /// Applies one step of motion under `force`, then wraps
    pub fn advance(&mut self, force: Vector2<f64>, time_scale: f64, config: &SimulationConfig) {
        self.last_force = force;
        self.velocity += force / self.mass / config.fps * time_scale;
        self.position += self.velocity * time_scale;

        if wrap_body(&mut self.position, self.radius, &config.area) {
            self.trail.clear();
        }
        self.trail.push(self.position);
    }

    /// Runs the ejection timer, shedding mass when it fires
    ///
    /// Returns the mass shed this step, which the caller turns into a particle.
    pub fn tick_ejection(&mut self, time_scale: f64, interval: f64) -> Option<f64> {
        self.ejection_timer += time_scale;
        if self.ejection_timer < interval {
            return None;
        }
        self.ejection_timer = 0.0;

        let loss = self.kind.ejection_loss(self.mass)?;
        if self.mass <= loss {
            return None;
        }
        self.set_mass(self.mass - loss);
        Some(loss)
    }

    /// Ages the body and records a mass sample
    pub fn record_age(&mut self, time_scale: f64) {
        self.age += BODY_AGE_PER_FRAME * time_scale;
        self.mass_history.push((self.age, self.mass));
    }
}

impl Massive for Body {
    fn position(&self) -> Point2<f64> {
        self.position
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn absorption_efficiency(&self) -> f64 {
        BODY_ABSORPTION_EFFICIENCY
    }
}
