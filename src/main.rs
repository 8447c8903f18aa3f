//! RegionAgg - province-to-region GeoJSON aggregator
//!
//! A one-shot build tool that merges province-level GeoJSON polygons into
//! region-level MultiPolygons for the dashboard coverage map, attaching
//! per-region display metadata from the province-to-region lookup table.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Fatal error (missing input, bad JSON, unwritable output, bad table)
//!   2 - Unmatched provinces found with --fail-on-unmatched

mod aggregate;
mod cli;
mod config;
mod geojson;
mod summary;
mod table;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::Config;
use std::time::Instant;
use summary::RunSummary;
use table::ProvinceTable;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle the init helpers early (no logging needed)
    if args.init_config {
        exit_on_error(handle_init_config());
    }
    if args.init_table {
        exit_on_error(handle_init_table());
    }

    // Initialize logging
    init_logging(&args);

    info!("RegionAgg v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the aggregation
    match run(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Aggregation failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Exit with code 0 on success, 1 on error, for the init helpers.
fn exit_on_error(result: Result<()>) -> ! {
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .regionagg.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".regionagg.toml");

    if path.exists() {
        eprintln!("⚠️  .regionagg.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .regionagg.toml")?;

    println!("✅ Created .regionagg.toml with default settings.");
    println!("   Edit it to customize the input, output, and table paths.");
    Ok(())
}

/// Handle --init-table: dump the embedded province table for editing.
fn handle_init_table() -> Result<()> {
    let path = std::path::Path::new("province_regions.json");

    if path.exists() {
        eprintln!("⚠️  province_regions.json already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let table = ProvinceTable::embedded()?;
    std::fs::write(path, table.to_json_pretty()?)
        .context("Failed to write province_regions.json")?;

    println!(
        "✅ Wrote the embedded table ({} provinces) to province_regions.json.",
        table.len()
    );
    println!("   Edit it and pass it back with --table province_regions.json.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete aggregation workflow. Returns exit code (0 or 2).
fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Load and validate the province table
    println!("📖 Loading province table...");
    let province_table = load_table(&config)?;
    info!(
        "Province table: {} provinces, {} regions",
        province_table.len(),
        province_table.region_count()
    );

    // Step 2: Read the province geometry
    println!("🗺️  Reading provinces: {}", config.paths.input.display());
    let provinces = geojson::read_provinces(&config.paths.input)?;
    info!("Input features: {}", provinces.features.len());

    // Step 3: Merge provinces into regions
    println!("🧩 Aggregating provinces into regions...");
    let aggregation = aggregate::aggregate(&province_table, &provinces);

    // Step 4: Write the output (skipped on --dry-run)
    let output = if args.dry_run {
        None
    } else {
        geojson::write_regions(&config.paths.output, &aggregation.regions, config.output.pretty)?;
        Some(config.paths.output.clone())
    };

    // Step 5: Print the run summary
    let summary = RunSummary {
        input: config.paths.input.clone(),
        output,
        provinces_read: aggregation.provinces_read,
        regions_created: aggregation.regions.features.len(),
        unmatched: aggregation.unmatched.clone(),
        unsupported: aggregation.unsupported.clone(),
        conflicts: aggregation.conflicts.clone(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
        completed_at: Utc::now(),
    };
    println!("\n{}", summary.render());

    // Check --fail-on-unmatched
    if args.fail_on_unmatched && !aggregation.unmatched.is_empty() {
        eprintln!(
            "\n⛔ {} unmatched province(s) found. Failing (exit code 2).",
            aggregation.unmatched.len()
        );
        return Ok(2);
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .regionagg.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Load the province table (external file if configured, embedded otherwise).
fn load_table(config: &Config) -> Result<ProvinceTable> {
    match config.paths.table {
        Some(ref table_path) => {
            info!("Using external table: {}", table_path.display());
            ProvinceTable::load(table_path)
        }
        None => {
            debug!("Using the embedded province table");
            ProvinceTable::embedded()
        }
    }
}
