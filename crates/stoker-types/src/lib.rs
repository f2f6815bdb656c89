use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Measurement units as StokerCloud spells them on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "kwh")]
    Kwh,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "deg")]
    Degree,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "m/s")]
    MetersPerSecond,
}

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::Kwh,
        Unit::Percent,
        Unit::Degree,
        Unit::Kilogram,
        Unit::Gram,
        Unit::Centimeter,
        Unit::MetersPerSecond,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Unit::Kwh => "kwh",
            Unit::Percent => "%",
            Unit::Degree => "deg",
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Centimeter => "cm",
            Unit::MetersPerSecond => "m/s",
        }
    }

    /// Returns `None` for codes this client does not know.
    pub fn from_code(code: &str) -> Option<Unit> {
        match code {
            "kwh" => Some(Unit::Kwh),
            "%" => Some(Unit::Percent),
            "deg" => Some(Unit::Degree),
            "kg" => Some(Unit::Kilogram),
            "g" => Some(Unit::Gram),
            "cm" => Some(Unit::Centimeter),
            "m/s" => Some(Unit::MetersPerSecond),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    /// 1 is on, 0 is off; any other flag is unknown.
    pub fn from_flag(flag: i64) -> Option<PowerState> {
        match flag {
            1 => Some(PowerState::On),
            0 => Some(PowerState::Off),
            _ => None,
        }
    }
}

/// Operating phase reported by the boiler controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    Power,
    HotWater,
    #[serde(rename = "IGNITION_1")]
    Ignition1,
    #[serde(rename = "IGNITION_2")]
    Ignition2,
    FaultIgnition,
    StoppedExternalContact,
    CompressorCleaning,
    Off,
}

impl State {
    pub const ALL: [State; 8] = [
        State::Power,
        State::HotWater,
        State::Ignition1,
        State::Ignition2,
        State::FaultIgnition,
        State::StoppedExternalContact,
        State::CompressorCleaning,
        State::Off,
    ];

    /// Opaque code used by the payload's `miscdata.state.value`.
    pub fn code(&self) -> &'static str {
        match self {
            State::Power => "state_5",
            State::HotWater => "state_7",
            State::Ignition1 => "state_2",
            State::Ignition2 => "state_4",
            State::FaultIgnition => "state_13",
            State::StoppedExternalContact => "state_24",
            State::CompressorCleaning => "state_43",
            State::Off => "state_14",
        }
    }

    pub fn from_code(code: &str) -> Option<State> {
        State::ALL.into_iter().find(|state| state.code() == code)
    }

    pub fn name(&self) -> &'static str {
        match self {
            State::Power => "POWER",
            State::HotWater => "HOT_WATER",
            State::Ignition1 => "IGNITION_1",
            State::Ignition2 => "IGNITION_2",
            State::FaultIgnition => "FAULT_IGNITION",
            State::StoppedExternalContact => "STOPPED_EXTERNAL_CONTACT",
            State::CompressorCleaning => "COMPRESSOR_CLEANING",
            State::Off => "OFF",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid decimal magnitude {0:?}")]
    InvalidMagnitude(String),
}

/// A reading: arbitrary-precision decimal magnitude tagged with an optional
/// unit.
///
/// Equality never converts between units. Ordering is only defined between
/// values of the same unit; `partial_cmp` returns `None` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub value: BigDecimal,
    pub unit: Option<Unit>,
}

impl Value {
    pub fn new(value: BigDecimal, unit: Option<Unit>) -> Self {
        Self { value, unit }
    }

    /// Parses plain (`21.7`) or scientific (`2.17e1`) notation without going
    /// through a binary float. Every digit is kept.
    pub fn parse(raw: &str, unit: Option<Unit>) -> Result<Self, ValueError> {
        let value = BigDecimal::from_str(raw.trim())
            .map_err(|_| ValueError::InvalidMagnitude(raw.to_string()))?;
        Ok(Self { value, unit })
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.unit != other.unit {
            return None;
        }
        self.value.partial_cmp(&other.value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(unit) => write!(f, "{} {}", self.value, unit),
            None => write!(f, "{}", self.value),
        }
    }
}
