//! Built-in airframes and the name-keyed variant registry.
//!
//! Variants are parameter tables, not types: every vehicle runs the same
//! [`MultirotorDynamics`] with different constants.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use rotor_core::{ConfigError, FrameSpec, VehicleParameters};

use crate::environment::Environment;
use crate::model::MultirotorDynamics;

/// The airframes shipped with the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VehicleKind {
    /// Heavy-lift X quadcopter, 16.5 kg.
    BigQuad,
    /// Small consumer X quadcopter, 1.4 kg.
    Phantom,
    /// Mid-size X hexacopter, 3 kg.
    HexX,
}

impl VehicleKind {
    /// Every built-in kind, in registry order.
    pub const ALL: [VehicleKind; 3] = [Self::BigQuad, Self::Phantom, Self::HexX];

    /// Selector name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::BigQuad => "BigQuad",
            Self::Phantom => "Phantom",
            Self::HexX => "HexX",
        }
    }

    /// Physical parameters of this kind.
    pub fn parameters(self) -> VehicleParameters {
        match self {
            Self::BigQuad => VehicleParameters {
                frame: FrameSpec::quad_x(),
                b: 5.30216718361085e-5,
                d: 2.23656692806239e-6,
                l: 0.6,
                jr: 3.08013e-4,
                m: 16.47,
                ix: 2.0,
                iy: 2.0,
                iz: 3.0,
                maxrpm: 10_000.0,
                motor_tau: 0.05,
            },
            Self::Phantom => VehicleParameters {
                frame: FrameSpec::quad_x(),
                b: 1.5e-6,
                d: 2.0e-8,
                l: 0.175,
                jr: 3.0e-5,
                m: 1.38,
                ix: 0.0135,
                iy: 0.0135,
                iz: 0.024,
                maxrpm: 20_000.0,
                motor_tau: 0.02,
            },
            Self::HexX => VehicleParameters {
                frame: FrameSpec::hex_x(),
                b: 1.2e-5,
                d: 2.4e-7,
                l: 0.35,
                jr: 8.0e-5,
                m: 3.0,
                ix: 0.06,
                iy: 0.06,
                iz: 0.11,
                maxrpm: 12_000.0,
                motor_tau: 0.04,
            },
        }
    }

    /// Build the flight model for this kind.
    pub fn create(self, env: Environment) -> Result<MultirotorDynamics, ConfigError> {
        MultirotorDynamics::new(self.parameters(), env)
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VehicleKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownVehicle { name: s.to_string() })
    }
}

/// Name to parameter-set mapping used to resolve vehicle selectors.
///
/// Iteration follows registration order. Lookups are exact and
/// case-sensitive.
#[derive(Clone, Debug, Default)]
pub struct VariantRegistry {
    variants: IndexMap<String, VehicleParameters>,
}

impl VariantRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every [`VehicleKind`].
    pub fn builtin() -> Self {
        let variants = VehicleKind::ALL
            .into_iter()
            .map(|kind| (kind.name().to_string(), kind.parameters()))
            .collect();
        Self { variants }
    }

    /// Register `params` under `name`.
    ///
    /// The parameters are validated here so later [`create()`](Self::create)
    /// calls fail only on unknown names.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        params: VehicleParameters,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if self.variants.contains_key(&name) {
            return Err(ConfigError::DuplicateVehicle { name });
        }
        params.validate()?;
        self.variants.insert(name, params);
        Ok(())
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    /// Number of registered variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Parameters registered under `name`.
    pub fn parameters(&self, name: &str) -> Result<&VehicleParameters, ConfigError> {
        self.variants
            .get(name)
            .ok_or_else(|| ConfigError::UnknownVehicle {
                name: name.to_string(),
            })
    }

    /// Build the flight model registered under `name`.
    pub fn create(&self, name: &str, env: Environment) -> Result<MultirotorDynamics, ConfigError> {
        let params = self.parameters(name)?.clone();
        MultirotorDynamics::new(params, env)
    }
}
