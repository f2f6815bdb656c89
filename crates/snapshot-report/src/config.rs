use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Clone, Debug)]
pub struct ReportConfig {
    /// Saved StokerCloud responses to read, in order.
    pub snapshots: Vec<PathBuf>,
    /// `EnvFilter` directive for the stderr logger.
    pub log_level: String,
    pub pretty: bool,
    /// Log and skip disconnected snapshots instead of failing the run.
    pub skip_disconnected: bool,
}

impl ReportConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    pub fn load_with_path(config_path: Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(file_config) = load_file_config(config_path.as_deref())? {
            apply_file_config(&mut config, file_config);
        }

        apply_env_overrides(&mut config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.snapshots.is_empty() {
            anyhow::bail!("at least one snapshot path is required");
        }
        if self
            .snapshots
            .iter()
            .any(|path| path.as_os_str().to_string_lossy().trim().is_empty())
        {
            anyhow::bail!("snapshot paths must be non-empty");
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("log_level must be non-empty");
        }
        EnvFilter::try_new(&self.log_level)
            .map_err(|err| anyhow::anyhow!("log_level is not a valid filter: {err}"))?;
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            pretty: false,
            skip_disconnected: true,
        }
    }
}

/// Command line: `[--config <path> | --config=<path>] [snapshot.json ...]`.
#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<String>,
    /// Overrides the configured snapshot list when non-empty.
    pub snapshots: Vec<PathBuf>,
}

impl CliArgs {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut parsed = Self::default();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--config" {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                parsed.config = Some(path);
            } else if let Some(path) = arg.strip_prefix("--config=") {
                if path.is_empty() {
                    anyhow::bail!("--config requires a path");
                }
                parsed.config = Some(path.to_string());
            } else {
                parsed.snapshots.push(PathBuf::from(arg));
            }
        }
        Ok(parsed)
    }
}

fn apply_env_overrides(config: &mut ReportConfig) {
    if let Ok(value) = env::var("STOKER_SNAPSHOTS") {
        config.snapshots = parse_snapshot_list(&value);
    }

    if let Ok(value) = env::var("STOKER_LOG_LEVEL") {
        config.log_level = value;
    }

    config.pretty = parse_env_bool("STOKER_PRETTY").unwrap_or(config.pretty);
    config.skip_disconnected =
        parse_env_bool("STOKER_SKIP_DISCONNECTED").unwrap_or(config.skip_disconnected);
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    snapshots: Option<Vec<String>>,
    log: Option<FileLogConfig>,
    output: Option<FileOutputConfig>,
}

#[derive(Debug, Deserialize)]
struct FileLogConfig {
    level: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileOutputConfig {
    pretty: Option<bool>,
    skip_disconnected: Option<bool>,
}

fn load_file_config(config_path: Option<&str>) -> Result<Option<FileConfig>> {
    let path = match config_path {
        Some(path) => path.to_string(),
        None => match env::var("STOKER_CONFIG") {
            Ok(value) => value,
            Err(_) => return Ok(None),
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("read config file {path}"))?;
    let ext = Path::new(&path).extension().and_then(|value| value.to_str());

    let config = match ext {
        Some("json") => serde_json::from_str(&content).context("parse json config")?,
        _ => toml::from_str(&content).context("parse toml config")?,
    };

    Ok(Some(config))
}

fn apply_file_config(config: &mut ReportConfig, file: FileConfig) {
    if let Some(snapshots) = file.snapshots {
        config.snapshots = snapshots.into_iter().map(PathBuf::from).collect();
    }

    if let Some(level) = file.log.and_then(|log| log.level) {
        config.log_level = level;
    }

    if let Some(output) = file.output {
        if let Some(pretty) = output.pretty {
            config.pretty = pretty;
        }
        if let Some(skip) = output.skip_disconnected {
            config.skip_disconnected = skip;
        }
    }
}

fn parse_env_bool(key: &str) -> Option<bool> {
    env::var(key).ok().and_then(|value| value.parse().ok())
}

fn parse_snapshot_list(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}
