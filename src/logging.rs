use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

/// Environment variable holding the log filter, e.g. `SPEEDMATH_LOG=debug`.
pub const LOG_ENV: &str = "SPEEDMATH_LOG";

/// Send log records to `<dir>/speedmath.log`. The terminal is owned by the
/// UI, so nothing is ever written to stderr while it runs.
pub fn init(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let path = dir.join("speedmath.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    Builder::from_env(Env::default().filter_or(LOG_ENV, "info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("logger already initialised")?;

    Ok(path)
}
