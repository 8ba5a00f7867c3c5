//! Simulation configuration
//!
//! Every tunable the engine reads lives in [`SimulationConfig`]. A config is
//! validated once when a [`World`](crate::world::World) is built and stays
//! fixed until the caller explicitly reconfigures between steps.
//!
//! Configs can be written by hand or loaded from YAML:
//!
//! ```yaml
//! gravity_multiplier: 2.0
//! fps: 300.0
//! area:
//!   width: 1280.0
//!   height: 649.0
//!   reserved_margin: 200.0
//! policy:
//!   star_to_neutron_probability: 0.7
//!   neutron_to_black_hole_probability: 0.5
//!   evaporation:
//!     supernova: 0.8
//!     neutron_collapse: 0.1
//!     radiate: 0.1
//! ```
//!
//! Omitted fields take their documented defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gravitational constant in simulation units
pub const G: f64 = 6.67430;

/// Speed of light used by the Schwarzschild correction
pub const SPEED_OF_LIGHT: f64 = 3.0e8;

/// Errors raised while building or loading a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("fps must be positive and finite, got {0}")]
    InvalidFps(f64),

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidScalar { name: &'static str, value: f64 },

    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("evaporation weights must be non-negative with a positive sum")]
    InvalidEvaporationWeights,

    #[error("simulation area {width}x{height} with margin {reserved_margin} leaves no room")]
    DegenerateArea {
        width: f64,
        height: f64,
        reserved_margin: f64,
    },

    #[error("max_time_scale must be at least 1")]
    InvalidMaxTimeScale,

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Which gravity law the force model uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theory {
    #[default]
    Newtonian,
    GeneralRelativity,
}

/// Integer multiplier applied to every per-frame delta
///
/// A time scale of 2 advances one step as far as two unscaled steps would for
/// every quantity that moves by `delta * time_scale`.
///
/// # Examples
///
/// ```
/// use astrosim::config::TimeScale;
///
/// let scale = TimeScale::new(5);
/// assert_eq!(scale.next(5), TimeScale::new(1));
/// assert_eq!(TimeScale::default().next(5).get(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeScale(u32);

impl TimeScale {
    /// Creates a time scale, raising zero to one
    pub fn new(factor: u32) -> Self {
        Self(factor.max(1))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Multiplier as a float, for scaling deltas
    pub fn factor(self) -> f64 {
        f64::from(self.0)
    }

    /// Caps the factor at `max`
    pub fn clamped(self, max: u32) -> Self {
        Self(self.0.min(max.max(1)))
    }

    /// Cycles `1 -> 2 -> ... -> max -> 1`
    pub fn next(self, max: u32) -> Self {
        if self.0 >= max.max(1) {
            Self(1)
        } else {
            Self(self.0 + 1)
        }
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self(1)
    }
}

/// Region bodies and particles live in
///
/// The area spans `[0, width]` horizontally and `[0, height - reserved_margin]`
/// vertically. The reserved margin is the strip kept free below the
/// simulation; objects never wrap into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimArea {
    pub width: f64,
    pub height: f64,
    pub reserved_margin: f64,
}

impl SimArea {
    pub fn sim_height(&self) -> f64 {
        self.height - self.reserved_margin
    }
}

impl Default for SimArea {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 649.0,
            reserved_margin: 200.0,
        }
    }
}

/// Relative weights of the three black-hole evaporation outcomes
///
/// Weights need not sum to one; each outcome is chosen with probability
/// `weight / total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaporationWeights {
    /// Burst the remaining mass into supernova particles
    pub supernova: f64,
    /// Fall back to a neutron star, releasing a particle wave
    pub neutron_collapse: f64,
    /// Shoot unit-mass particles until the mass is spent
    pub radiate: f64,
}

impl EvaporationWeights {
    pub fn total(&self) -> f64 {
        self.supernova + self.neutron_collapse + self.radiate
    }
}

impl Default for EvaporationWeights {
    fn default() -> Self {
        Self {
            supernova: 0.8,
            neutron_collapse: 0.1,
            radiate: 0.1,
        }
    }
}

/// Branch probabilities for the randomized type transitions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionPolicy {
    /// Chance an overweight star collapses instead of going supernova
    pub star_to_neutron_probability: f64,
    /// Chance an overweight neutron star becomes a black hole instead of going supernova
    pub neutron_to_black_hole_probability: f64,
    pub evaporation: EvaporationWeights,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self {
            star_to_neutron_probability: 0.7,
            neutron_to_black_hole_probability: 0.5,
            evaporation: EvaporationWeights::default(),
        }
    }
}

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gravitational_constant: f64,
    /// Scales every gravitational force magnitude
    pub gravity_multiplier: f64,
    /// Fixed integration rate converting force to velocity deltas
    pub fps: f64,
    /// Additive epsilon in every inverse-square denominator
    pub softening: f64,
    pub speed_of_light: f64,
    pub area: SimArea,
    /// Clock advance per unscaled step
    pub years_per_frame: f64,
    /// Relative speed separating gentle from violent planet impacts
    pub impact_speed_threshold: f64,
    /// Distance within which aged particles cluster into a planet
    pub cluster_radius: f64,
    pub cluster_min_members: usize,
    /// Minimum particle age before it may join a cluster
    pub cluster_min_age: f64,
    /// Scaled ticks between mass-loss ejections
    pub ejection_interval: f64,
    /// Distance from a body's centre at which ejected particles appear
    pub ejection_offset: f64,
    pub max_time_scale: u32,
    pub policy: TransitionPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: G,
            gravity_multiplier: 1.0,
            fps: 300.0,
            softening: 1e-2,
            speed_of_light: SPEED_OF_LIGHT,
            area: SimArea::default(),
            years_per_frame: 0.05,
            impact_speed_threshold: 4.5,
            cluster_radius: 30.0,
            cluster_min_members: 5,
            cluster_min_age: 30.0,
            ejection_interval: 30.0,
            ejection_offset: 25.0,
            max_time_scale: 5,
            policy: TransitionPolicy::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses a YAML document and validates the result
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field for values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ConfigError::InvalidFps(self.fps));
        }

        let scalars = [
            ("gravitational_constant", self.gravitational_constant),
            ("gravity_multiplier", self.gravity_multiplier),
            ("softening", self.softening),
            ("years_per_frame", self.years_per_frame),
            ("impact_speed_threshold", self.impact_speed_threshold),
            ("cluster_radius", self.cluster_radius),
            ("cluster_min_age", self.cluster_min_age),
            ("ejection_interval", self.ejection_interval),
            ("ejection_offset", self.ejection_offset),
        ];
        for (name, value) in scalars {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidScalar { name, value });
            }
        }
        if !(self.speed_of_light.is_finite() && self.speed_of_light > 0.0) {
            return Err(ConfigError::InvalidScalar {
                name: "speed_of_light",
                value: self.speed_of_light,
            });
        }

        let probabilities = [
            (
                "star_to_neutron_probability",
                self.policy.star_to_neutron_probability,
            ),
            (
                "neutron_to_black_hole_probability",
                self.policy.neutron_to_black_hole_probability,
            ),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }

        let weights = self.policy.evaporation;
        let all_valid = [weights.supernova, weights.neutron_collapse, weights.radiate]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0);
        if !all_valid || weights.total() <= 0.0 {
            return Err(ConfigError::InvalidEvaporationWeights);
        }

        let area = self.area;
        if !(area.width > 0.0 && area.reserved_margin >= 0.0 && area.sim_height() > 0.0) {
            return Err(ConfigError::DegenerateArea {
                width: area.width,
                height: area.height,
                reserved_margin: area.reserved_margin,
            });
        }

        if self.max_time_scale == 0 {
            return Err(ConfigError::InvalidMaxTimeScale);
        }

        Ok(())
    }

    /// The subset of the config the force laws read
    pub fn gravity(&self) -> GravityParams {
        GravityParams {
            g: self.gravitational_constant,
            multiplier: self.gravity_multiplier,
            softening: self.softening,
            speed_of_light: self.speed_of_light,
        }
    }
}

/// Constants shared by every force computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityParams {
    pub g: f64,
    pub multiplier: f64,
    pub softening: f64,
    pub speed_of_light: f64,
}

impl Default for GravityParams {
    fn default() -> Self {
        SimulationConfig::default().gravity()
    }
}
