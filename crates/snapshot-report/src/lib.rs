use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use controller_data::{ControllerData, DataError};
use stoker_types::{PowerState, State, Value};

mod config;

pub use config::{CliArgs, ReportConfig};

#[derive(Debug, Serialize)]
pub struct SnapshotReport {
    pub source: String,
    pub serial_number: Option<String>,
    pub state: Option<State>,
    pub alarm: Option<PowerState>,
    pub running: Option<PowerState>,
    /// Serialized as an object keyed by reading name, in table order.
    #[serde(serialize_with = "readings_by_name")]
    pub readings: Vec<NamedReading>,
    /// Readings this payload does not carry.
    pub unsupported: Vec<&'static str>,
    /// Readings present but unreadable, with the reason.
    pub malformed: Vec<MalformedReading>,
}

#[derive(Debug)]
pub struct NamedReading {
    pub name: &'static str,
    pub value: Value,
}

fn readings_by_name<S: Serializer>(readings: &[NamedReading], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(readings.iter().map(|reading| (reading.name, &reading.value)))
}

#[derive(Debug, Serialize)]
pub struct MalformedReading {
    pub name: &'static str,
    pub error: String,
}

impl SnapshotReport {
    pub fn reading(&self, name: &str) -> Option<&Value> {
        self.readings
            .iter()
            .find(|reading| reading.name == name)
            .map(|reading| &reading.value)
    }
}

pub fn build_report(source: &str, data: &ControllerData) -> SnapshotReport {
    let mut report = SnapshotReport {
        source: source.to_string(),
        serial_number: None,
        state: None,
        alarm: None,
        running: None,
        readings: Vec::new(),
        unsupported: Vec::new(),
        malformed: Vec::new(),
    };

    report.serial_number = report.record("serial_number", data.serial_number());
    report.state = report.record("state", data.state()).flatten();
    report.alarm = report.record("alarm", data.alarm()).flatten();
    report.running = report.record("running", data.running()).flatten();

    for (measurement, reading) in data.readings() {
        if let Some(value) = report.record(measurement.name(), reading) {
            report.readings.push(NamedReading {
                name: measurement.name(),
                value,
            });
        }
    }

    report
}

impl SnapshotReport {
    fn record<T>(&mut self, name: &'static str, outcome: Result<T, DataError>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(err) if err.is_missing() => {
                debug!(source = %self.source, reading = name, error = %err, "reading not reported");
                self.unsupported.push(name);
                None
            }
            Err(err) => {
                warn!(source = %self.source, reading = name, error = %err, "reading unreadable");
                self.malformed.push(MalformedReading {
                    name,
                    error: err.to_string(),
                });
                None
            }
        }
    }
}

/// Reads one snapshot file. `Ok(None)` means the snapshot was disconnected
/// and `skip_disconnected` is set.
pub fn load_snapshot(path: &Path, skip_disconnected: bool) -> Result<Option<SnapshotReport>> {
    let source = path.display().to_string();
    let content = fs::read_to_string(path).with_context(|| format!("read snapshot {source}"))?;

    let data = match ControllerData::from_json_str(&content) {
        Ok(data) => data,
        Err(DataError::NotConnected) if skip_disconnected => {
            warn!(source = %source, "controller not connected, skipping snapshot");
            return Ok(None);
        }
        Err(err) => return Err(err).with_context(|| format!("decode snapshot {source}")),
    };

    Ok(Some(build_report(&source, &data)))
}

/// Writes one JSON report per line (or pretty-printed) and returns the count written.
pub fn run<W: Write>(config: &ReportConfig, out: &mut W) -> Result<usize> {
    let mut written = 0usize;

    for path in &config.snapshots {
        let Some(report) = load_snapshot(path, config.skip_disconnected)? else {
            continue;
        };

        if config.pretty {
            serde_json::to_writer_pretty(&mut *out, &report).context("write report")?;
        } else {
            serde_json::to_writer(&mut *out, &report).context("write report")?;
        }
        writeln!(out).context("write report")?;

        info!(
            source = %report.source,
            readings = report.readings.len(),
            unsupported = report.unsupported.len(),
            malformed = report.malformed.len(),
            "snapshot report written"
        );
        written = written.saturating_add(1);
    }

    Ok(written)
}
