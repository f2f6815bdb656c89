use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use stoker_types::{PowerState, State, Unit, Value};

mod measurement;

pub use measurement::Measurement;
use measurement::Source;

/// Decoded StokerCloud response, kept as the raw JSON tree.
pub type Payload = serde_json::Value;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("furnace/boiler not connected to StokerCloud")]
    NotConnected,
    #[error("field {path} not found in payload")]
    FieldNotFound { path: String },
    #[error("malformed value at {path}: {reason}")]
    MalformedValue { path: String, reason: String },
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DataError {
    /// True when the payload simply does not carry the requested reading.
    pub fn is_missing(&self) -> bool {
        matches!(self, DataError::FieldNotFound { .. })
    }

    fn not_found(path: impl Into<String>) -> Self {
        DataError::FieldNotFound { path: path.into() }
    }

    fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DataError::MalformedValue {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Typed, read-only view over one connected controller snapshot.
#[derive(Debug, Clone)]
pub struct ControllerData {
    data: Payload,
}

impl ControllerData {
    /// Fails with [`DataError::NotConnected`] when `notconnected` is set.
    pub fn new(data: Payload) -> Result<Self, DataError> {
        if !data.is_object() {
            return Err(DataError::malformed("$", "payload root must be an object"));
        }

        match data.get("notconnected") {
            None | Some(Payload::Null) => {}
            Some(flag) if flag_value(flag) == Some(0) => {}
            Some(flag) => {
                debug!(notconnected = %flag, "rejecting disconnected snapshot");
                return Err(DataError::NotConnected);
            }
        }

        Ok(Self { data })
    }

    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let data: Payload = serde_json::from_str(json)?;
        Self::new(data)
    }

    pub fn payload(&self) -> &Payload {
        &self.data
    }

    /// First record in list section `section` whose `id` matches. A miss is
    /// `Ok(None)`; only a missing or non-list section is an error.
    pub fn sub_item(&self, section: &str, id: &str) -> Result<Option<&Payload>, DataError> {
        let records = self
            .section(section)?
            .as_array()
            .ok_or_else(|| DataError::malformed(section, "expected a list of records"))?;

        let found = records
            .iter()
            .find(|record| record.get("id").is_some_and(|value| id_matches(value, id)));
        if found.is_none() {
            debug!(section, id, "sub-item not found");
        }
        Ok(found)
    }

    pub fn alarm(&self) -> Result<Option<PowerState>, DataError> {
        self.power_flag("alarm")
    }

    pub fn running(&self) -> Result<Option<PowerState>, DataError> {
        self.power_flag("running")
    }

    pub fn serial_number(&self) -> Result<String, DataError> {
        match self.section("serial")? {
            Payload::String(serial) => Ok(serial.clone()),
            Payload::Number(serial) => Ok(serial.to_string()),
            other => Err(DataError::malformed(
                "serial",
                format!("expected a string or number, found {other}"),
            )),
        }
    }

    /// `None` when the controller reports a state code this client does not know.
    pub fn state(&self) -> Result<Option<State>, DataError> {
        let state = present(self.section("miscdata")?.get("state"))
            .ok_or_else(|| DataError::not_found("miscdata.state"))?;
        let code = present(state.get("value"))
            .ok_or_else(|| DataError::not_found("miscdata.state.value"))?;
        let state = match code {
            Payload::String(code) => State::from_code(code),
            Payload::Array(_) | Payload::Object(_) => {
                return Err(DataError::malformed(
                    "miscdata.state.value",
                    "expected a scalar state code",
                ))
            }
            _ => None,
        };
        if state.is_none() {
            debug!(code = %code, "unknown controller state code");
        }
        Ok(state)
    }

    pub fn boiler_temperature_current(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::BoilerTemperatureCurrent)
    }

    pub fn boiler_temperature_requested(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::BoilerTemperatureRequested)
    }

    pub fn boiler_return_temperature(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::BoilerReturnTemperature)
    }

    pub fn exhaust_temperature(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::ExhaustTemperature)
    }

    pub fn o2_percent(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::O2Percent)
    }

    pub fn time_online_percent(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::TimeOnlinePercent)
    }

    pub fn boiler_kwh(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::BoilerKwh)
    }

    pub fn outside_temp(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::OutsideTemp)
    }

    pub fn wind_speed(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::WindSpeed)
    }

    /// Unitless bearing.
    pub fn wind_direction(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::WindDirection)
    }

    pub fn humidity(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::Humidity)
    }

    pub fn hotwater_temperature_current(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::HotwaterTemperatureCurrent)
    }

    pub fn hotwater_temperature_requested(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::HotwaterTemperatureRequested)
    }

    pub fn consumption_total(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::ConsumptionTotal)
    }

    pub fn consumption_day(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::ConsumptionDay)
    }

    pub fn output_percentage(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::OutputPercentage)
    }

    pub fn boiler_photosensor(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::BoilerPhotosensor)
    }

    pub fn hopper_capacity(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::HopperCapacity)
    }

    pub fn hopper_content(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::HopperContent)
    }

    pub fn hopper_max_distance(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::HopperMaxDistance)
    }

    pub fn auger_moved_mass(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::AugerMovedMass)
    }

    pub fn power_10_percent(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::Power10Percent)
    }

    pub fn power_100_percent(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::Power100Percent)
    }

    pub fn dhw_on(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::DhwOn)
    }

    pub fn dhw_pump(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::DhwPump)
    }

    pub fn weathervalve(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::Weathervalve)
    }

    pub fn weatherpump(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::Weatherpump)
    }

    pub fn exhaustfan(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::Exhaustfan)
    }

    pub fn ashauger(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::Ashauger)
    }

    pub fn compressor_percent(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::CompressorPercent)
    }

    pub fn weathervalve2(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::Weathervalve2)
    }

    pub fn weatherpump2(&self) -> Result<Value, DataError> {
        self.measurement(Measurement::Weatherpump2)
    }

    pub fn measurement(&self, measurement: Measurement) -> Result<Value, DataError> {
        match measurement.source() {
            Source::SubItem { section, id, unit } => {
                let path = format!("{section}[id={id}].value");
                let record = self
                    .sub_item(section, id)?
                    .ok_or_else(|| DataError::not_found(format!("{section}[id={id}]")))?;
                let raw = present(record.get("value"))
                    .ok_or_else(|| DataError::not_found(path.as_str()))?;
                decimal_value(raw, &path, unit)
            }
            Source::Direct { section, key, unit } => {
                let path = format!("{section}.{key}");
                let raw = self.direct(section, key)?;
                decimal_value(raw, &path, unit)
            }
            Source::Output(index) => self.output(index),
        }
    }

    /// Every reading paired with its outcome, in [`Measurement::ALL`] order.
    pub fn readings(&self) -> impl Iterator<Item = (Measurement, Result<Value, DataError>)> + '_ {
        Measurement::ALL
            .into_iter()
            .map(move |measurement| (measurement, self.measurement(measurement)))
    }

    fn section(&self, name: &str) -> Result<&Payload, DataError> {
        present(self.data.get(name)).ok_or_else(|| DataError::not_found(name))
    }

    /// Key lookup on a mapping section. When the section is a list of records
    /// the key is treated as a record id and its `value` is returned.
    fn direct(&self, section: &str, key: &str) -> Result<&Payload, DataError> {
        let path = format!("{section}.{key}");
        let raw = match self.section(section)? {
            Payload::Object(map) => map.get(key),
            Payload::Array(_) => self
                .sub_item(section, key)?
                .and_then(|record| record.get("value")),
            _ => return Err(DataError::malformed(section, "expected a mapping")),
        };
        present(raw).ok_or_else(|| DataError::not_found(path))
    }

    fn output(&self, index: u8) -> Result<Value, DataError> {
        let key = format!("output-{index}");
        let output = present(self.section("leftoutput")?.get(&key))
            .ok_or_else(|| DataError::not_found(format!("leftoutput.{key}")))?;

        let unit_path = format!("leftoutput.{key}.unit");
        let code = present(output.get("unit"))
            .ok_or_else(|| DataError::not_found(unit_path.as_str()))?
            .as_str()
            .ok_or_else(|| DataError::malformed(unit_path.as_str(), "expected a unit string"))?;
        let unit = Unit::from_code(code)
            .ok_or_else(|| DataError::malformed(unit_path.as_str(), format!("unknown unit {code:?}")))?;

        let value_path = format!("leftoutput.{key}.val");
        let raw = present(output.get("val"))
            .ok_or_else(|| DataError::not_found(value_path.as_str()))?;
        decimal_value(raw, &value_path, Some(unit))
    }

    fn power_flag(&self, key: &str) -> Result<Option<PowerState>, DataError> {
        let flag = self.section("miscdata")?.get(key);
        Ok(flag.and_then(flag_value).and_then(PowerState::from_flag))
    }
}

impl FromStr for ControllerData {
    type Err = DataError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(json)
    }
}

/// Explicit JSON `null` counts as absent.
fn present(value: Option<&Payload>) -> Option<&Payload> {
    value.filter(|value| !value.is_null())
}

fn id_matches(value: &Payload, id: &str) -> bool {
    match value {
        Payload::String(candidate) => candidate == id,
        Payload::Number(candidate) => candidate.to_string() == id,
        _ => false,
    }
}

/// Integral flag value; booleans count as 0/1 and whole floats as integers.
fn flag_value(value: &Payload) -> Option<i64> {
    match value {
        Payload::Bool(flag) => Some(i64::from(*flag)),
        Payload::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && float.abs() < i64::MAX as f64)
                .map(|float| float as i64)
        }),
        _ => None,
    }
}

fn decimal_value(raw: &Payload, path: &str, unit: Option<Unit>) -> Result<Value, DataError> {
    let text = match raw {
        Payload::String(text) => text.clone(),
        Payload::Number(number) => number.to_string(),
        other => {
            return Err(DataError::malformed(
                path,
                format!("expected a number or numeric string, found {other}"),
            ))
        }
    };
    Value::parse(&text, unit).map_err(|err| DataError::malformed(path, err.to_string()))
}
