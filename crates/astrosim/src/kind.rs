//! Body types and the geometry each type derives from its mass

use serde::{Deserialize, Serialize};

/// Planets heavier than this ignite into stars
pub const PLANET_IGNITION_MASS: f64 = 150.0;

/// Stars heavier than this collapse or go supernova
pub const STAR_COLLAPSE_MASS: f64 = 350.0;

/// Stars lighter than this break apart
pub const STAR_DISRUPTION_MASS: f64 = 50.0;

/// Neutron stars heavier than this collapse or go supernova
pub const NEUTRON_COLLAPSE_MASS: f64 = 800.0;

/// Neutron stars lighter than this break apart
pub const NEUTRON_DISRUPTION_MASS: f64 = 350.0;

/// Black holes lighter than this have evaporated
pub const BLACK_HOLE_EVAPORATION_MASS: f64 = 650.0;

/// Black holes heavier than this shed a supernova burst
pub const BLACK_HOLE_HYPERNOVA_MASS: f64 = 100_000.0;

/// Smallest radius a planet is given by the spawn presets
pub const MIN_PLANET_RADIUS: f64 = 3.0;

/// Closed set of body types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Planet,
    Star,
    NeutronStar,
    BlackHole,
}

impl BodyKind {
    /// Radius implied by `mass`, or `None` for planets whose radius is
    /// assigned when they are created
    ///
    /// # Examples
    ///
    /// ```
    /// use astrosim::kind::BodyKind;
    ///
    /// assert_eq!(BodyKind::Star.radius_for(10.0), Some(8.0));
    /// assert_eq!(BodyKind::NeutronStar.radius_for(1.0e9), Some(12.0));
    /// assert_eq!(BodyKind::Planet.radius_for(10.0), None);
    /// ```
    pub fn radius_for(self, mass: f64) -> Option<f64> {
        match self {
            BodyKind::Planet => None,
            BodyKind::Star => Some(mass.powf(0.4).max(8.0)),
            BodyKind::NeutronStar => Some(mass.powf(0.2).clamp(6.0, 12.0)),
            BodyKind::BlackHole => Some(mass.powf(0.3).max(10.0)),
        }
    }

    /// Consumption radius as a multiple of the body radius
    pub fn consumption_factor(self) -> f64 {
        match self {
            BodyKind::Planet | BodyKind::Star => 2.0,
            BodyKind::NeutronStar => 2.5,
            BodyKind::BlackHole => 3.0,
        }
    }

    /// Mass shed per ejection cycle, for the types that shed mass
    pub fn ejection_loss(self, mass: f64) -> Option<f64> {
        match self {
            BodyKind::Star => Some((0.0001 * mass).max(0.01)),
            BodyKind::NeutronStar => Some((0.000_05 * mass).max(0.005)),
            BodyKind::Planet | BodyKind::BlackHole => None,
        }
    }

    /// Colour a body takes on when it becomes this type
    ///
    /// Planets keep whatever colour they were created with.
    pub fn signature_color(self) -> Option<Rgb> {
        match self {
            BodyKind::Planet => None,
            BodyKind::Star => Some(Rgb(255, 255, 100)),
            BodyKind::NeutronStar => Some(Rgb(200, 200, 255)),
            BodyKind::BlackHole => Some(Rgb(50, 0, 50)),
        }
    }
}

/// Radius the spawn presets give a planet of `mass`
pub fn planet_radius(mass: f64) -> f64 {
    mass.max(MIN_PLANET_RADIUS)
}

/// Display colour carried through the engine for the host to draw with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}
