//! File logging. The terminal belongs to the form, so log output never goes
//! to stdout or stderr once the event loop starts.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Environment variable naming an explicit log file.
pub const LOG_FILE_VAR: &str = "RADFORM_LOG_FILE";

/// Initializes the global logger.
///
/// Logs go to `$RADFORM_LOG_FILE`, or `<XDG data dir>/radform/radform.log`.
/// If no file can be opened, logging stays disabled.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn init() {
    let path = std::env::var(LOG_FILE_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(default_log_path);

    let Some(path) = path else {
        eprintln!("radform: no log directory available, logging disabled");
        return;
    };

    if let Err(err) = init_file_logger(&path) {
        eprintln!(
            "radform: failed to open log file '{}': {err}",
            path.display()
        );
    }
}

fn init_file_logger(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .try_init()
        .map_err(io::Error::other)?;

    log::info!("logging to {}", path.display());
    Ok(())
}

fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("radform").join("radform.log"))
}
