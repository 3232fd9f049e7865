//! sheetsync: reconcile a sales worksheet into the customer / sale / revenue tables.
//!
//! Usage:
//!   sheetsync --config sync.json
//!   sheetsync --source dashboard.xlsx --worksheet ZU --db sales.db [--year 2024]
//!   sheetsync --source export.csv --db sales.db --create --dry-run --json

use anyhow::{bail, Result};
use sheetsync_core::{
    config::{SourceConfig, SyncConfig},
    layout::SheetLayout,
    report::SyncReport,
    sheet::Sheet,
    store::SalesStore,
    sync_sheet, SyncError, SyncOptions,
};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<SyncError>() {
                Some(SyncError::AccessDenied { .. }) => {
                    eprintln!("Something is wrong with the database permissions: {e}")
                }
                Some(SyncError::DatabaseMissing { .. }) => {
                    eprintln!("Database does not exist: {e} (pass --create to initialize it)")
                }
                _ => eprintln!("sheetsync: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = build_config(&args)?;
    let dry_run = has_flag(&args, "--dry-run");
    let json = has_flag(&args, "--json");

    log::info!(
        "source={} worksheet={:?} db={}",
        config.source.path,
        config.source.worksheet,
        config.database
    );

    let sheet = Sheet::open(&config.source.path, config.source.worksheet.as_deref())?;
    let mut store = if config.create_database {
        SalesStore::open_or_create(&config.database)?
    } else {
        SalesStore::open(&config.database)?
    };
    store.migrate()?;

    let options = SyncOptions {
        source: config.source.path.clone(),
        worksheet: config.source.worksheet.clone(),
        dry_run,
    };
    let report = sync_sheet(&mut store, &sheet, &config.layout, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

/// Config file first (if given), then flag overrides.
fn build_config(args: &[String]) -> Result<SyncConfig> {
    let mut config = match arg_value(args, "--config") {
        Some(path) => SyncConfig::load(path)?,
        None => {
            let Some(source) = arg_value(args, "--source") else {
                bail!("either --config or --source is required");
            };
            let Some(db) = arg_value(args, "--db") else {
                bail!("--db is required without --config");
            };
            SyncConfig {
                source: SourceConfig {
                    path: source.to_string(),
                    worksheet: None,
                },
                database: db.to_string(),
                create_database: false,
                layout: SheetLayout::default(),
            }
        }
    };

    if let Some(source) = arg_value(args, "--source") {
        config.source.path = source.to_string();
    }
    if let Some(worksheet) = arg_value(args, "--worksheet") {
        config.source.worksheet = Some(worksheet.to_string());
    }
    if let Some(db) = arg_value(args, "--db") {
        config.database = db.to_string();
    }
    if let Some(year) = arg_value(args, "--year") {
        config.layout.year = year.to_string();
    }
    if has_flag(args, "--create") {
        config.create_database = true;
    }
    config.layout.validate()?;
    Ok(config)
}

fn print_summary(report: &SyncReport) {
    let title = if report.dry_run {
        "=== DRY RUN (nothing committed) ==="
    } else {
        "=== SYNC SUMMARY ==="
    };
    println!("{title}");
    println!("  source:     {}", report.source);
    if let Some(ws) = &report.worksheet {
        println!("  worksheet:  {ws}");
    }
    println!("  started:    {}", report.started_at);
    println!("  rows read:  {}", report.rows_read);
    println!("  skipped:    {}", report.rows_skipped);
    println!();
    println!("  {:<10} {:>8} {:>8}", "", "inserted", "updated");
    for (label, counts) in [
        ("customers", &report.customers),
        ("sales", &report.sales),
        ("revenues", &report.revenues),
    ] {
        println!("  {label:<10} {:>8} {:>8}", counts.inserted, counts.updated);
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
