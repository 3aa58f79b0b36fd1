mod replay;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracker_core::*;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Workout session tracking engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a session event script (JSON Lines) against one in-memory session
    Run {
        /// Event script
        #[arg(long)]
        events: PathBuf,

        /// Catalog context (defaults to <data-dir>/catalog.json)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Profile (defaults to <data-dir>/profile.json)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Submission date for saves without their own (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Submit sets picked from equipment history
    OneTap {
        /// Equipment history CSV (defaults to <data-dir>/history.csv)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Selection as "Exercise:0,2" (set indices, repeatable)
        #[arg(long, required = true)]
        select: Vec<String>,

        /// Catalog context (defaults to <data-dir>/catalog.json)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Profile (defaults to <data-dir>/profile.json)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Submission date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Compute calories for a MET, duration and body weight
    Calories {
        #[arg(long)]
        met: f64,

        /// Seconds
        #[arg(long)]
        duration: u32,

        /// Kilograms (defaults to the configured body weight)
        #[arg(long)]
        weight: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracker_core::logging::init_with_level("debug");
    } else {
        tracker_core::logging::init();
    }

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Commands::Run {
            events,
            catalog,
            profile,
            date,
        } => cmd_run(&config, &events, catalog, profile, date),
        Commands::OneTap {
            history,
            select,
            catalog,
            profile,
            date,
        } => cmd_one_tap(&config, history, &select, catalog, profile, date),
        Commands::Calories {
            met,
            duration,
            weight,
        } => cmd_calories(&config, met, duration, weight),
    }
}

fn open_session(
    config: &Config,
    catalog: Option<PathBuf>,
    profile: Option<PathBuf>,
) -> Result<WorkoutSession> {
    let catalog_path = catalog.unwrap_or_else(|| config.data.catalog_path());
    let catalog = if catalog_path.exists() {
        CatalogContext::load(&catalog_path)?
    } else {
        tracing::warn!(
            "No catalog at {:?}; every exercise will be filed under {}",
            catalog_path,
            GENERAL_CATEGORY
        );
        CatalogContext::default()
    };

    let problems = catalog.validate();
    if !problems.is_empty() {
        eprintln!("Catalog problems:");
        for problem in &problems {
            eprintln!("  - {}", problem);
        }
    }

    let profile_path = profile.unwrap_or_else(|| config.data.profile_path());
    let profile = Profile::load(&profile_path)?;

    Ok(WorkoutSession::new(catalog, profile, config))
}

fn cmd_run(
    config: &Config,
    events: &Path,
    catalog: Option<PathBuf>,
    profile: Option<PathBuf>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let events = replay::read_events(events)?;
    let mut session = open_session(config, catalog, profile)?;
    let mut sink = OutboxSink::new(config.data.outbox_path());
    let default_date = date.unwrap_or_else(today_local);

    let mut replayer = replay::Replayer::new(&mut session, &mut sink, default_date);
    for event in &events {
        replayer.apply(event);
    }
    let summary = replayer.finish();

    println!();
    println!("  Events:   {}", events.len());
    println!("  Rejected: {}", summary.rejected);
    println!("  Saved:    {}", summary.saved);
    println!(
        "  Unsaved:  {} exercises, {} kcal",
        session.store().len(),
        session.store().total_calories()
    );
    Ok(())
}

fn cmd_one_tap(
    config: &Config,
    history: Option<PathBuf>,
    select: &[String],
    catalog: Option<PathBuf>,
    profile: Option<PathBuf>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let mut selection = OneTapSelection::new();
    for spec in select {
        let (exercise, indices) = parse_selection(spec)?;
        for index in indices {
            selection.select(&exercise, index);
        }
    }

    let history_path = history.unwrap_or_else(|| config.data.history_path());
    let history = load_equipment_history(&history_path)?;
    let mut session = open_session(config, catalog, profile)?;
    let mut sink = OutboxSink::new(config.data.outbox_path());

    let date = date.unwrap_or_else(today_local);
    let document = session.begin_one_tap_save(&history, &selection, date)?;
    let set_count = document.set_count();
    let outcome = sink.submit(&document);
    session.finish_save(outcome, chrono::Utc::now())?;

    println!("✓ Submitted {} sets from history", set_count);
    println!("  Outbox: {}", sink.path().display());
    Ok(())
}

fn cmd_calories(config: &Config, met: f64, duration: u32, weight: Option<f64>) -> Result<()> {
    if !calories::is_valid_met(met) {
        return Err(Error::Validation(vec![FieldError::new(
            Field::Met,
            "must be a positive number",
        )]));
    }
    let weight = weight.unwrap_or(config.profile.default_body_weight_kg);
    println!("{:.2}", calories(met, duration, weight));
    Ok(())
}

/// Parse "Exercise Name:0,2" into the name and its set indices
fn parse_selection(spec: &str) -> Result<(String, Vec<usize>)> {
    let (name, indices) = spec
        .rsplit_once(':')
        .ok_or_else(|| Error::Other(format!("Selection '{}' must look like 'Name:0,1'", spec)))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Other(format!("Selection '{}' has no exercise name", spec)));
    }

    let indices = indices
        .split(',')
        .map(|i| {
            i.trim()
                .parse::<usize>()
                .map_err(|_| Error::Other(format!("Invalid set index '{}' in '{}'", i, spec)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((name.to_string(), indices))
}
