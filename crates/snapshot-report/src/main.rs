use std::env;
use std::io;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use snapshot_report::{run, CliArgs, ReportConfig};

fn main() -> Result<()> {
    let args = CliArgs::parse(env::args().skip(1)).context("invalid arguments")?;
    let mut config = ReportConfig::load_with_path(args.config).context("load config failed")?;
    if !args.snapshots.is_empty() {
        config.snapshots = args.snapshots;
    }
    config.validate().context("config validation failed")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level)?)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = run(&config, &mut out).context("snapshot report failed")?;
    if written == 0 {
        warn!("no connected snapshots to report");
    } else {
        info!(written, "done");
    }
    Ok(())
}
