mod config;

pub use config::{Config, HolidayConfig, LayoutConfig, WeekStart};

use std::path::{Path, PathBuf};

/// Environment variable selecting the data directory flavor.
pub const ENV_VAR: &str = "CALGRID_ENV";

/// Directory name under `~/.config` for the given `CALGRID_ENV` value.
fn dir_name(env: Option<&str>) -> &'static str {
    match env {
        Some("dev") => "calgrid-dev",
        _ => "calgrid",
    }
}

/// Resolve the data directory under `home` without touching the disk.
fn data_dir_in(home: &Path, env: Option<&str>) -> PathBuf {
    home.join(".config").join(dir_name(env))
}

/// `~/.config/calgrid/`, or `~/.config/calgrid-dev/` with `CALGRID_ENV=dev`.
/// The directory is created if missing.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let env = std::env::var(ENV_VAR).ok();
    let dir = data_dir_in(&home, env.as_deref());
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
