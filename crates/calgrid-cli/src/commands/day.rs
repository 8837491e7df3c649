use std::path::{Path, PathBuf};

use calgrid_core::adapter::normalize_timed;
use calgrid_core::resolve_day;
use clap::Args;

use super::{load_config, print_json, read_records, CliResult};

#[derive(Args)]
pub struct DayArgs {
    /// JSON payload of timed items ("-" for stdin)
    #[arg(long, short)]
    input: PathBuf,
}

pub fn run(args: DayArgs, config: Option<&Path>) -> CliResult {
    let config = load_config(config)?;
    let items = normalize_timed(&read_records(&args.input)?);
    let placements = resolve_day(&items, &config.day_options());
    print_json(&placements)
}
