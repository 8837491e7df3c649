pub mod config;
pub mod day;
pub mod holidays;
pub mod month;
pub mod week;

use std::io::Read;
use std::path::Path;

use calgrid_core::{Config, CoreError};
use chrono::NaiveDate;
use serde_json::Value;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Config from `--config` when given, otherwise the user's config with a
/// default fallback.
pub fn load_config(path: Option<&Path>) -> Result<Config, CoreError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load_or_default()),
    }
}

/// Read a JSON payload from a file, or from stdin when `input` is `-`.
pub fn read_records(input: &Path) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let text = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| format!("cannot read {}: {e}", input.display()))?
    };
    Ok(calgrid_core::adapter::parse_records(&text)?)
}

pub fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| format!("expected YYYY-MM-DD, got '{raw}'"))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
