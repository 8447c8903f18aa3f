//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// RegionAgg - province-to-region GeoJSON aggregator
///
/// Merges province polygons into region MultiPolygons using the
/// province-to-region lookup table, attaching per-region display metadata
/// for the dashboard coverage map.
///
/// Examples:
///   regionagg
///   regionagg --input gadm/provinces.geojson --output public/regions.geojson
///   regionagg --table my_regions.json --fail-on-unmatched
///   regionagg --dry-run
///   regionagg --init-table
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Province-level GeoJSON FeatureCollection to read
    ///
    /// Defaults to data/provinces.geojson (overridable in .regionagg.toml).
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output path for the merged region FeatureCollection
    ///
    /// Defaults to data/regions.geojson (overridable in .regionagg.toml).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// External province-to-region table (JSON)
    ///
    /// When not given, the table embedded at build time is used.
    /// Use --init-table to dump the embedded table for editing.
    #[arg(short, long, value_name = "FILE", env = "REGIONAGG_TABLE")]
    pub table: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .regionagg.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write minified JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Parse and aggregate without writing the output file
    ///
    /// Prints the run summary (region count, unmatched provinces) and exits.
    #[arg(long)]
    pub dry_run: bool,

    /// Fail when any province has no region entry
    ///
    /// Useful for CI: exit code 2 when the unmatched list is non-empty.
    /// The output file is still written first.
    #[arg(long)]
    pub fail_on_unmatched: bool,

    /// Generate a default .regionagg.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Dump the embedded province table to province_regions.json
    #[arg(long)]
    pub init_table: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Skip path checks for the init helpers
        if self.init_config || self.init_table {
            return Ok(());
        }

        // Validate external table path if provided
        if let Some(ref table_path) = self.table {
            if !table_path.exists() {
                return Err(format!(
                    "Province table does not exist: {}",
                    table_path.display()
                ));
            }
            if !table_path.is_file() {
                return Err(format!(
                    "Province table is not a file: {}",
                    table_path.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: None,
            output: None,
            table: None,
            config: None,
            compact: false,
            verbose: false,
            quiet: false,
            dry_run: false,
            fail_on_unmatched: false,
            init_config: false,
            init_table: false,
        }
    }

    #[test]
    fn test_defaults_validate() {
        let args = make_args();
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_table() {
        let mut args = make_args();
        args.table = Some(PathBuf::from("/nonexistent/table.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_table_skips_path_checks() {
        let mut args = make_args();
        args.table = Some(PathBuf::from("/nonexistent/table.json"));
        args.init_table = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
