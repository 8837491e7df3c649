use std::path::Path;

use clap::Args;

use super::{load_config, print_json, CliResult};

#[derive(Args)]
pub struct HolidaysArgs {
    /// Year to list
    #[arg(long)]
    year: i32,
}

pub fn run(args: HolidaysArgs, config: Option<&Path>) -> CliResult {
    let config = load_config(config)?;
    print_json(&config.holiday_calendar().holidays_in(args.year))
}
