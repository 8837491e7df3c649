use std::path::{Path, PathBuf};

use calgrid_core::adapter::normalize_calendar;
use calgrid_core::{build_month, MonthRequest};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;

use super::{load_config, parse_date_arg, print_json, read_records, CliResult};

#[derive(Args)]
pub struct MonthArgs {
    /// JSON payload of calendar items ("-" for stdin)
    #[arg(long, short)]
    input: PathBuf,
    /// Month to show (YYYY-MM)
    #[arg(long, value_parser = parse_month_arg)]
    month: (i32, u32),
    /// Date marked as today (defaults to the local date)
    #[arg(long, value_parser = parse_date_arg)]
    today: Option<NaiveDate>,
    /// Date marked as focused
    #[arg(long, value_parser = parse_date_arg)]
    focus: Option<NaiveDate>,
}

fn parse_month_arg(raw: &str) -> Result<(i32, u32), String> {
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map(|d| (d.year(), d.month()))
        .map_err(|_| format!("expected YYYY-MM, got '{raw}'"))
}

pub fn run(args: MonthArgs, config: Option<&Path>) -> CliResult {
    let config = load_config(config)?;
    let items = normalize_calendar(&read_records(&args.input)?);
    let (year, month) = args.month;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let mut request =
        MonthRequest::new(year, month, today)?.with_week_start(config.layout.week_start.weekday());
    if let Some(focus) = args.focus {
        request = request.with_focus(focus);
    }

    let cells = build_month(&request, &items, &config.holiday_calendar(), &config.colors);
    print_json(&cells)
}
