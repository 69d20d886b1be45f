use log::{debug, info, warn};

use raffle_engine::builder::Builder;
use raffle_engine::stats::{DashboardStats, DEFAULT_TOP_PERFORMERS};
use raffle_engine::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use calamine::{open_workbook, Reader, Xlsx};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dashboard::config_reader::*;

mod config_reader;
mod io_common;
mod io_excel;
mod io_json;

#[derive(Debug, Snafu)]
pub enum RaffleCliError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file is empty"))]
    EmptyExcel {},
    #[snafu(display("Cannot find the worksheet {name}"))]
    MissingWorksheet { name: String },
    #[snafu(display("Several worksheets found in {path}, the worksheet name must be provided"))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Column {index} is beyond the header of the roster"))]
    ColumnOutOfRange { index: usize },
    #[snafu(display("Line {lineno}: cannot read a number of entries from {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a column index (number from 1 or letter)"))]
    ParsingJsonNumber {},
    #[snafu(display("{path} is not a list of employees"))]
    JsonRosterShape { path: String },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unknown input type {input_type}"))]
    UnknownInputType { input_type: String },
    #[snafu(display("No roster provided: use --input or a configuration file"))]
    MissingRoster {},
    #[snafu(display("Cannot find the directory of the configuration file"))]
    MissingParentDir {},
    #[snafu(display("{source}"))]
    Raffle { source: RaffleErrors },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},
}

pub type CliResult<T> = Result<T, RaffleCliError>;
pub type BCliResult<T> = Result<T, Box<RaffleCliError>>;

const DEFAULT_RAFFLE_NAME: &str = "Raffle";
const DEFAULT_PRIZE: &str = "Quarterly Prize";

fn read_roster(root_path: &Path, src: &RosterSource) -> BCliResult<Vec<EmployeeRecord>> {
    let p: PathBuf = root_path.join(&src.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read roster file {:?}", p2);
    match src.provider.as_str() {
        "json" => io_json::read_json_roster(p2),
        "excel" => io_excel::read_excel_roster(p2, src),
        x => Err(Box::new(RaffleCliError::UnknownInputType {
            input_type: x.to_string(),
        })),
    }
}

fn infer_input_type(path: &str) -> String {
    let lower = path.to_lowercase();
    if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        "excel".to_string()
    } else {
        "json".to_string()
    }
}

/// The configuration file, with the command line flags applied on top of it.
fn merge_config(args: &Args) -> CliResult<(RaffleConfig, PathBuf)> {
    let (mut config, root) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        None => (RaffleConfig::default(), PathBuf::new()),
    };

    if let Some(input) = &args.input {
        let input_type = args
            .input_type
            .clone()
            .unwrap_or_else(|| infer_input_type(input));
        let mut src = RosterSource::new(&input_type, input);
        src.excel_worksheet_name = args.excel_worksheet_name.clone();
        // The input is relative to the working directory, not to the configuration.
        let abs_input: PathBuf = std::env::current_dir()
            .map(|d| d.join(input))
            .unwrap_or_else(|_| PathBuf::from(input));
        src.file_path = abs_input.display().to_string();
        config.roster_sources = vec![src];
    } else if let Some(input_type) = &args.input_type {
        for src in config.roster_sources.iter_mut() {
            src.provider = input_type.clone();
        }
    }

    if args.prize.is_some() {
        config.output_settings.prize = args.prize.clone();
    }
    if args.name.is_some() {
        config.output_settings.raffle_name = args.name.clone();
    }
    if args.seed.is_some() {
        config.rules.random_seed = args.seed.clone();
    }
    if args.reveal_delay_ms.is_some() {
        config.rules.reveal_delay_ms = args.reveal_delay_ms;
    }
    if args.top.is_some() {
        config.rules.top_performers = args.top;
    }
    Ok((config, root))
}

fn validate_rules(rules: &RaffleRules) -> EngineRules {
    EngineRules {
        reveal_delay: rules
            .reveal_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(EngineRules::DEFAULT_RULES.reveal_delay),
        seed: rules.random_seed.clone(),
    }
}

fn build_summary_js(config: &RaffleConfig, snapshot: &SessionSnapshot, res: &DrawResult) -> JSValue {
    let winning_chance = snapshot
        .participants
        .iter()
        .find(|p| p.id == res.winner.id)
        .map(|p| p.chance)
        .unwrap_or(res.win_probability_percent);
    json!({
        "config": {
            "raffle": config.output_settings.raffle_name.clone().unwrap_or_else(|| DEFAULT_RAFFLE_NAME.to_string()),
            "prize": config.output_settings.prize.clone().unwrap_or_else(|| DEFAULT_PRIZE.to_string()),
            "seed": config.rules.random_seed,
        },
        "results": {
            "winner": {
                "id": res.winner.id,
                "name": res.winner.name,
                "entries": res.winner.weight,
            },
            "winningChance": winning_chance,
            "totalParticipants": snapshot.total_participants,
            "totalEntries": snapshot.total_entries,
            "participants": snapshot.participants,
        }
    })
}

fn build_stats_js(stats: &DashboardStats) -> JSValue {
    json!({ "analytics": stats })
}

fn write_output(path: &str, content: &str) -> CliResult<()> {
    info!("Writing summary to {:?}", path);
    fs::write(path, content).context(WritingOutputSnafu { path })
}

fn check_reference(reference_path: &str, pretty_js: &str) -> CliResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("reference summary: {:?}", summary_ref);
    let pretty_js_ref = serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_ref != pretty_js {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_ref.as_str(), pretty_js, "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    info!("The summary matches the reference {:?}", reference_path);
    Ok(())
}

pub fn run_raffle(args: &Args) -> CliResult<()> {
    let (config, root) = merge_config(args)?;
    info!("config: {:?}", config);

    if config.roster_sources.is_empty() {
        return MissingRosterSnafu {}.fail();
    }

    let mut builder = Builder::new();
    for src in config.roster_sources.iter() {
        let records = read_roster(&root, src).map_err(|e| *e)?;
        builder = builder.employees(&records);
    }
    debug!("roster: {:?}", builder.roster());

    let pretty_js = if args.stats {
        let top_n = config.rules.top_performers.unwrap_or(DEFAULT_TOP_PERFORMERS);
        let stats = DashboardStats::from_employees(builder.roster(), top_n);
        info!(
            "{} employees, {} entries, {} eligible",
            stats.total_employees, stats.total_entries, stats.eligible_participants
        );
        serde_json::to_string_pretty(&build_stats_js(&stats)).context(ParsingJsonSnafu {})?
    } else {
        let rules = validate_rules(&config.rules);
        let mut engine = RaffleEngine::new(&rules);
        let snapshot = engine
            .load(builder.participants())
            .context(RaffleSnafu {})?
            .snapshot();
        for p in snapshot.participants.iter() {
            info!("Participant: {} ({} entries, {}%)", p.name, p.entries, p.chance);
        }
        let res = engine.draw_blocking().context(RaffleSnafu {})?;
        let summary = build_summary_js(&config, &snapshot, &res);
        serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?
    };
    println!("{}", pretty_js);

    let out_path: Option<String> = match (&args.out, &config.output_settings.output_directory) {
        (Some(out), _) => Some(out.clone()),
        (None, Some(dir)) => {
            let file_name = if args.stats {
                "raffle_stats.json"
            } else {
                "raffle_summary.json"
            };
            Some(root.join(dir).join(file_name).display().to_string())
        }
        (None, None) => None,
    };
    if let Some(out) = out_path {
        if out != "stdout" {
            write_output(&out, &pretty_js)?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(reference) = &args.reference {
        check_reference(reference, &pretty_js)?;
    }

    Ok(())
}
