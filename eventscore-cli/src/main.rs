mod inputs;
mod reports;
mod store;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, NaiveDateTime, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use eventscore_game::{
    Catalog, DayEntry, DragonInput, EventDay, HuntingInput, Period, ScoreKeeper, ScoreSheet,
    TierInput, active_event, format_countdown, time_until_rollover,
};
use inputs::{
    amounts, parse_action_points, parse_count, parse_day, parse_level, parse_resource, parse_track,
};
use reports::{ComparisonReport, HuntingSummary, SavedWeek, ScheduleStatus, SheetReport, WeekReport};
use store::FileStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored human-readable output
    Console,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "eventscore", version)]
#[command(about = "Event-day score calculator and weekly tracker")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory holding one JSON file per saved week
    #[arg(
        long,
        global = true,
        env = "EVENTSCORE_DATA_DIR",
        default_value = ".eventscore"
    )]
    data_dir: PathBuf,

    /// JSON catalog overriding the built-in point tables
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Output report format
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score Dragon Day rune tracks and gallery shards
    Dragon(DragonArgs),
    /// Score a batch-resource event day
    Day(DayArgs),
    /// Score the Ultimate Power calculator (never saved)
    Power(PowerArgs),
    /// Score an Ultimate Hunting session (never saved)
    Hunting(HuntingArgs),
    /// Show or clear a week's tracker
    Week(WeekArgs),
    /// Compare a saved score with a target
    Compare(CompareArgs),
    /// Show the active event and time to the next rollover
    Schedule,
}

#[derive(Debug, ClapArgs)]
struct SaveArgs {
    /// Save the total into the weekly tracker
    #[arg(long)]
    save: bool,

    /// Week number to save under (defaults to the current week)
    #[arg(long)]
    week: Option<u32>,
}

#[derive(Debug, ClapArgs)]
struct DragonArgs {
    /// Bronze track as LEVEL:RUNES
    #[arg(long, value_parser = parse_track)]
    bronze: Option<TierInput>,

    /// Silver track as LEVEL:RUNES
    #[arg(long, value_parser = parse_track)]
    silver: Option<TierInput>,

    /// Gold track as LEVEL:RUNES
    #[arg(long, value_parser = parse_track)]
    gold: Option<TierInput>,

    /// Legendary runes (flat rate, no levels)
    #[arg(long, value_parser = parse_count, default_value = "0")]
    legendary: u64,

    /// Gallery shards
    #[arg(long, value_parser = parse_count, default_value = "0")]
    shards: u64,

    /// Score shown in game before spending anything
    #[arg(long, value_parser = parse_count, default_value = "0")]
    starting_score: u64,

    #[command(flatten)]
    save: SaveArgs,
}

#[derive(Debug, ClapArgs)]
struct DayArgs {
    /// Event day: unit, summon, witch, gear, dragon or hero
    #[arg(value_parser = parse_day)]
    day: EventDay,

    /// Resource amount as ID=AMOUNT (repeatable)
    #[arg(long = "resource", short = 'r', value_parser = parse_resource)]
    resources: Vec<(String, u64)>,

    /// Score shown in game before spending anything
    #[arg(long, value_parser = parse_count, default_value = "0")]
    starting_score: u64,

    #[command(flatten)]
    save: SaveArgs,
}

#[derive(Debug, ClapArgs)]
struct PowerArgs {
    /// Resource amount as ID=AMOUNT (repeatable)
    #[arg(long = "resource", short = 'r', value_parser = parse_resource)]
    resources: Vec<(String, u64)>,

    /// Score shown in game before spending anything
    #[arg(long, value_parser = parse_count, default_value = "0")]
    starting_score: u64,
}

#[derive(Debug, ClapArgs)]
struct HuntingArgs {
    /// Action point items as SIZE=COUNT, e.g. 50=3 (repeatable)
    #[arg(long = "ap", value_parser = parse_action_points)]
    action_points: Vec<(String, u64)>,

    /// Hero granting a generation bonus (repeatable)
    #[arg(long = "hero")]
    heroes: Vec<String>,

    /// VIP level
    #[arg(long, value_parser = parse_level, default_value = "0")]
    vip: u32,

    /// Score shown in game before spending anything
    #[arg(long, value_parser = parse_count, default_value = "0")]
    starting_score: u64,
}

#[derive(Debug, ClapArgs)]
struct WeekArgs {
    /// Week number (defaults to the current week)
    #[arg(long)]
    week: Option<u32>,

    /// Delete the saved record for this week
    #[arg(long)]
    clear: bool,
}

#[derive(Debug, ClapArgs)]
struct CompareArgs {
    /// Target score
    #[arg(long, value_parser = parse_count)]
    target: u64,

    /// Compare one day instead of the weekly total
    #[arg(long, value_parser = parse_day)]
    day: Option<EventDay>,

    /// Week number (defaults to the current week)
    #[arg(long)]
    week: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let catalog = load_catalog(args.catalog.as_deref())?;
    let storage = FileStorage::new(&args.data_dir);
    log::debug!("weekly records live in {}", storage.root().display());
    let keeper = ScoreKeeper::new(catalog, storage);
    let now = Local::now().naive_local();

    let mut output_target = OutputTarget::new(args.output.clone())?;
    run(&args, &keeper, now, output_target.writer())?;
    output_target.flush_inner()?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "🐉 Event Score Calculator".bright_cyan().bold());
    println!("{}", "==========================".cyan());
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let catalog = Catalog::from_json(&json)
        .with_context(|| format!("invalid catalog {}", path.display()))?;
    log::info!("loaded catalog from {}", path.display());
    Ok(catalog)
}

fn period_for(week: Option<u32>, now: NaiveDateTime) -> Period {
    week.map_or_else(
        || Period::containing(now),
        |week| Period::for_week(now.year(), week),
    )
}

fn run(
    args: &Args,
    keeper: &ScoreKeeper<FileStorage>,
    now: NaiveDateTime,
    out: &mut dyn Write,
) -> Result<()> {
    match &args.command {
        Command::Dragon(dragon) => {
            let entry = DayEntry {
                starting_score: dragon.starting_score,
                resources: [("gallery_shards".to_string(), dragon.shards)]
                    .into_iter()
                    .filter(|&(_, amount)| amount > 0)
                    .collect(),
                dragons: Some(DragonInput {
                    bronze: dragon.bronze.unwrap_or_default(),
                    silver: dragon.silver.unwrap_or_default(),
                    gold: dragon.gold.unwrap_or_default(),
                    legendary: TierInput::new(0, dragon.legendary),
                }),
            };
            score_event_day(args, keeper, now, out, EventDay::Dragon, &entry, &dragon.save)
        }
        Command::Day(day) => {
            let entry = DayEntry {
                starting_score: day.starting_score,
                resources: amounts(&day.resources),
                dragons: None,
            };
            score_event_day(args, keeper, now, out, day.day, &entry, &day.save)
        }
        Command::Power(power) => {
            let sheet = keeper
                .catalog()
                .score_ultimate_power(power.starting_score, &amounts(&power.resources))?;
            let report = SheetReport {
                board: "Ultimate Power".to_string(),
                sheet: &sheet,
                saved: None,
            };
            match args.report {
                ReportFormat::Json => reports::write_json(out, &report),
                ReportFormat::Console => reports::console_sheet(out, &report, args.verbose),
            }
        }
        Command::Hunting(hunting) => {
            let input = HuntingInput {
                starting_score: hunting.starting_score,
                action_points: amounts(&hunting.action_points),
                heroes: hunting.heroes.clone(),
                vip_level: hunting.vip,
            };
            let report = keeper.catalog().hunting.evaluate(&input)?;
            let summary = HuntingSummary {
                board: "Ultimate Hunting",
                report: &report,
            };
            match args.report {
                ReportFormat::Json => reports::write_json(out, &summary),
                ReportFormat::Console => reports::console_hunting(out, &summary),
            }
        }
        Command::Week(week) => {
            let period = period_for(week.week, now);
            if week.clear {
                keeper
                    .clear_week(&period.key)
                    .with_context(|| format!("failed to clear {}", period.key))?;
            }
            let summary = keeper.week_summary(&period.key)?;
            let report = WeekReport {
                period: &period,
                label: period.label(),
                summary: &summary,
            };
            match args.report {
                ReportFormat::Json => reports::write_json(out, &report),
                ReportFormat::Console => reports::console_week(out, &report),
            }
        }
        Command::Compare(cmp) => {
            let period = period_for(cmp.week, now);
            let comparison = match cmp.day {
                Some(day) => keeper.compare_day(&period.key, day, cmp.target),
                None => keeper.compare_week(&period.key, cmp.target),
            }
            .with_context(|| format!("failed to read {}", period.key))?;
            let report = ComparisonReport {
                key: period.key,
                day: cmp.day,
                comparison,
            };
            match args.report {
                ReportFormat::Json => reports::write_json(out, &report),
                ReportFormat::Console => reports::console_comparison(out, &report),
            }
        }
        Command::Schedule => {
            let local = Local::now();
            let naive = local.naive_local();
            let period = Period::containing(naive);
            let status = ScheduleStatus {
                local_time: local.format("%a %Y-%m-%d %H:%M").to_string(),
                active_event: active_event(&local),
                rollover_in: format_countdown(time_until_rollover(naive)),
                label: period.label(),
                period,
            };
            match args.report {
                ReportFormat::Json => reports::write_json(out, &status),
                ReportFormat::Console => reports::console_schedule(out, &status),
            }
        }
    }
}

fn score_event_day(
    args: &Args,
    keeper: &ScoreKeeper<FileStorage>,
    now: NaiveDateTime,
    out: &mut dyn Write,
    day: EventDay,
    entry: &DayEntry,
    save: &SaveArgs,
) -> Result<()> {
    if save.week.is_some() && !save.save {
        bail!("--week only applies together with --save");
    }
    let sheet: ScoreSheet = keeper.score_day(day, entry)?;
    let saved = if save.save {
        let period = period_for(save.week, now);
        let record = keeper
            .submit_day(&period.key, day, &sheet, Utc::now())
            .with_context(|| format!("failed to save {day} under {}", period.key))?;
        Some(SavedWeek {
            key: period.key,
            weekly_total: record.weekly_total(),
        })
    } else {
        None
    };
    let report = SheetReport {
        board: day.to_string(),
        sheet: &sheet,
        saved,
    };
    match args.report {
        ReportFormat::Json => reports::write_json(out, &report),
        ReportFormat::Console => reports::console_sheet(out, &report, args.verbose),
    }
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}
