use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use calgrid_core::adapter::normalize_calendar;
use calgrid_core::layout::expand_fragments;
use calgrid_core::{
    build_week_spans, layout_week, TimedItem, TimedPlacement, WeekLayoutCache, WeekSpan,
    WeekWindow,
};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use super::{load_config, parse_date_arg, print_json, read_records, CliResult};

#[derive(Args)]
pub struct WeekArgs {
    /// JSON payload of calendar items ("-" for stdin)
    #[arg(long, short)]
    input: PathBuf,
    /// First day of the week (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    start: NaiveDate,
}

#[derive(Serialize)]
struct WeekOutput {
    timeline: BTreeMap<NaiveDate, Vec<TimedPlacement>>,
    spans: Vec<WeekSpan>,
}

pub fn run(args: WeekArgs, config: Option<&Path>) -> CliResult {
    let config = load_config(config)?;
    let items = normalize_calendar(&read_records(&args.input)?);
    let window = WeekWindow::new(args.start);

    let mut days: BTreeMap<NaiveDate, Vec<TimedItem>> = BTreeMap::new();
    let mut fragments = Vec::new();
    for item in &items {
        match item.to_timed() {
            Some(timed) if window.contains(item.start_date) => {
                days.entry(item.start_date).or_default().push(timed);
            }
            Some(_) => {}
            None => fragments.extend(expand_fragments(&item.to_span_record(), &window)),
        }
    }

    let mut cache = WeekLayoutCache::new();
    let output = WeekOutput {
        timeline: layout_week(&days, &config.week_timeline_options(), &mut cache),
        spans: build_week_spans(&window, &fragments, &config.colors),
    };
    print_json(&output)
}
