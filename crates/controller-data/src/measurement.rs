use std::fmt;

use stoker_types::Unit;

/// Where a reading lives in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Source {
    /// Record with a matching `id` in a list section; its `value` field.
    SubItem {
        section: &'static str,
        id: &'static str,
        unit: Option<Unit>,
    },
    /// Key of a mapping section.
    Direct {
        section: &'static str,
        key: &'static str,
        unit: Option<Unit>,
    },
    /// `leftoutput."output-N"`, unit read from the payload.
    Output(u8),
}

/// Every unit-tagged reading `ControllerData` exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    BoilerTemperatureCurrent,
    BoilerTemperatureRequested,
    BoilerReturnTemperature,
    ExhaustTemperature,
    O2Percent,
    TimeOnlinePercent,
    BoilerKwh,
    OutsideTemp,
    WindSpeed,
    WindDirection,
    Humidity,
    HotwaterTemperatureCurrent,
    HotwaterTemperatureRequested,
    ConsumptionTotal,
    ConsumptionDay,
    OutputPercentage,
    BoilerPhotosensor,
    HopperCapacity,
    HopperContent,
    HopperMaxDistance,
    AugerMovedMass,
    Power10Percent,
    Power100Percent,
    DhwOn,
    DhwPump,
    Weathervalve,
    Weatherpump,
    Exhaustfan,
    Ashauger,
    CompressorPercent,
    Weathervalve2,
    Weatherpump2,
}

impl Measurement {
    pub const ALL: [Measurement; 32] = [
        Measurement::BoilerTemperatureCurrent,
        Measurement::BoilerTemperatureRequested,
        Measurement::BoilerReturnTemperature,
        Measurement::ExhaustTemperature,
        Measurement::O2Percent,
        Measurement::TimeOnlinePercent,
        Measurement::BoilerKwh,
        Measurement::OutsideTemp,
        Measurement::WindSpeed,
        Measurement::WindDirection,
        Measurement::Humidity,
        Measurement::HotwaterTemperatureCurrent,
        Measurement::HotwaterTemperatureRequested,
        Measurement::ConsumptionTotal,
        Measurement::ConsumptionDay,
        Measurement::OutputPercentage,
        Measurement::BoilerPhotosensor,
        Measurement::HopperCapacity,
        Measurement::HopperContent,
        Measurement::HopperMaxDistance,
        Measurement::AugerMovedMass,
        Measurement::Power10Percent,
        Measurement::Power100Percent,
        Measurement::DhwOn,
        Measurement::DhwPump,
        Measurement::Weathervalve,
        Measurement::Weatherpump,
        Measurement::Exhaustfan,
        Measurement::Ashauger,
        Measurement::CompressorPercent,
        Measurement::Weathervalve2,
        Measurement::Weatherpump2,
    ];

    /// Name of the matching `ControllerData` accessor.
    pub fn name(&self) -> &'static str {
        match self {
            Measurement::BoilerTemperatureCurrent => "boiler_temperature_current",
            Measurement::BoilerTemperatureRequested => "boiler_temperature_requested",
            Measurement::BoilerReturnTemperature => "boiler_return_temperature",
            Measurement::ExhaustTemperature => "exhaust_temperature",
            Measurement::O2Percent => "o2_percent",
            Measurement::TimeOnlinePercent => "time_online_percent",
            Measurement::BoilerKwh => "boiler_kwh",
            Measurement::OutsideTemp => "outside_temp",
            Measurement::WindSpeed => "wind_speed",
            Measurement::WindDirection => "wind_direction",
            Measurement::Humidity => "humidity",
            Measurement::HotwaterTemperatureCurrent => "hotwater_temperature_current",
            Measurement::HotwaterTemperatureRequested => "hotwater_temperature_requested",
            Measurement::ConsumptionTotal => "consumption_total",
            Measurement::ConsumptionDay => "consumption_day",
            Measurement::OutputPercentage => "output_percentage",
            Measurement::BoilerPhotosensor => "boiler_photosensor",
            Measurement::HopperCapacity => "hopper_capacity",
            Measurement::HopperContent => "hopper_content",
            Measurement::HopperMaxDistance => "hopper_max_distance",
            Measurement::AugerMovedMass => "auger_moved_mass",
            Measurement::Power10Percent => "power_10_percent",
            Measurement::Power100Percent => "power_100_percent",
            Measurement::DhwOn => "dhw_on",
            Measurement::DhwPump => "dhw_pump",
            Measurement::Weathervalve => "weathervalve",
            Measurement::Weatherpump => "weatherpump",
            Measurement::Exhaustfan => "exhaustfan",
            Measurement::Ashauger => "ashauger",
            Measurement::CompressorPercent => "compressor_percent",
            Measurement::Weathervalve2 => "weathervalve2",
            Measurement::Weatherpump2 => "weatherpump2",
        }
    }

    /// Unit fixed by the reading itself, or `None` for readings whose unit
    /// comes from the payload (the outputs) or that carry no unit.
    pub fn literal_unit(&self) -> Option<Unit> {
        match self.source() {
            Source::SubItem { unit, .. } | Source::Direct { unit, .. } => unit,
            Source::Output(_) => None,
        }
    }

    pub fn is_output(&self) -> bool {
        matches!(self.source(), Source::Output(_))
    }

    pub(crate) fn source(&self) -> Source {
        use Measurement::*;

        match self {
            BoilerTemperatureCurrent => sub("frontdata", "boilertemp", Unit::Degree),
            BoilerTemperatureRequested => sub("frontdata", "-wantedboilertemp", Unit::Degree),
            BoilerReturnTemperature => sub("boilerdata", "17", Unit::Degree),
            ExhaustTemperature => sub("boilerdata", "3", Unit::Degree),
            O2Percent => sub("boilerdata", "12", Unit::Percent),
            TimeOnlinePercent => sub("boilerdata", "9", Unit::Percent),
            BoilerKwh => sub("boilerdata", "5", Unit::Kwh),
            OutsideTemp => sub("weatherdata", "1", Unit::Degree),
            WindSpeed => sub("weatherdata", "2", Unit::MetersPerSecond),
            WindDirection => Source::SubItem {
                section: "weatherdata",
                id: "3",
                unit: None,
            },
            Humidity => sub("weatherdata", "9", Unit::Percent),
            HotwaterTemperatureCurrent => sub("frontdata", "dhw", Unit::Degree),
            HotwaterTemperatureRequested => sub("frontdata", "dhwwanted", Unit::Degree),
            ConsumptionTotal => sub("hopperdata", "4", Unit::Kilogram),
            ConsumptionDay => sub("hopperdata", "3", Unit::Kilogram),
            OutputPercentage => direct("miscdata", "outputpct", Unit::Percent),
            BoilerPhotosensor => sub("boilerdata", "6", Unit::Percent),
            HopperCapacity => direct("miscdata", "hopperdistance", Unit::Centimeter),
            HopperContent => direct("frontdata", "hoppercontent", Unit::Kilogram),
            HopperMaxDistance => direct("miscdata", "hopper.distance_max", Unit::Centimeter),
            AugerMovedMass => sub("hopperdata", "2", Unit::Gram),
            Power10Percent => sub("hopperdata", "7", Unit::Kwh),
            Power100Percent => sub("hopperdata", "8", Unit::Kwh),
            DhwOn => Source::Output(1),
            DhwPump => Source::Output(2),
            Weathervalve => Source::Output(3),
            Weatherpump => Source::Output(4),
            Exhaustfan => Source::Output(5),
            Ashauger => Source::Output(6),
            CompressorPercent => Source::Output(7),
            Weathervalve2 => Source::Output(8),
            Weatherpump2 => Source::Output(9),
        }
    }
}

fn sub(section: &'static str, id: &'static str, unit: Unit) -> Source {
    Source::SubItem {
        section,
        id,
        unit: Some(unit),
    }
}

fn direct(section: &'static str, key: &'static str, unit: Unit) -> Source {
    Source::Direct {
        section,
        key,
        unit: Some(unit),
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
