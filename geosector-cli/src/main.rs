//! GeoSector CLI - Command-line interface
//!
//! This binary provides a command-line interface to the GeoSector library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geosector::config::config_file_path;

use commands::analyze::AnalyzeArgs;
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "geosector")]
#[command(version = geosector::VERSION)]
#[command(about = "Grid decomposition and sector coverage analysis for geographic regions", long_about = None)]
struct Cli {
    /// Enable debug logging (also echoes log records to stdout)
    #[arg(long, global = true)]
    debug: bool,

    /// Configuration file (default: ~/.geosector/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tile a boundary into a grid, generate sectors and record coverage
    Analyze {
        /// GeoJSON boundary file
        file: PathBuf,

        /// Grid square size in kilometres
        #[arg(long)]
        grid_size: Option<f64>,

        /// Sector radius in kilometres
        #[arg(long)]
        radius: Option<f64>,

        /// Sector angular width in whole degrees
        #[arg(long)]
        angle: Option<u32>,

        /// Sector azimuth in degrees (repeat for several sectors)
        #[arg(long = "azimuth", value_name = "DEG", allow_negative_numbers = true)]
        azimuths: Vec<f64>,

        /// Reference latitude for the grid's latitude correction
        #[arg(long, allow_negative_numbers = true)]
        center_lat: Option<f64>,

        /// Use the region centroid as the reference point
        #[arg(long, conflicts_with = "center_lat")]
        center_from_region: bool,

        /// Stop at the first store failure instead of logging and continuing
        #[arg(long)]
        strict: bool,

        /// Also anchor sectors at squares that are not inside the region
        #[arg(long)]
        include_non_matching: bool,

        /// Write all stored records to this JSON file
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Seed the store from the existing --output file before running
        #[arg(long, requires = "output")]
        resume: bool,

        /// Write squares and sectors as a GeoJSON FeatureCollection
        #[arg(long, value_name = "PATH")]
        geojson_output: Option<PathBuf>,
    },

    /// Show features, bounds and extreme points of a boundary file
    Inspect {
        /// GeoJSON boundary file
        file: PathBuf,
    },

    /// Summarize a results file written by `analyze --output`
    Report {
        /// Results JSON file
        file: PathBuf,

        /// Write squares and sectors as a GeoJSON FeatureCollection
        #[arg(long, value_name = "PATH")]
        geojson_output: Option<PathBuf>,
    },

    /// View and modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config_file_path);

    let result: Result<(), CliError> = match cli.command {
        Commands::Analyze {
            file,
            grid_size,
            radius,
            angle,
            azimuths,
            center_lat,
            center_from_region,
            strict,
            include_non_matching,
            output,
            resume,
            geojson_output,
        } => commands::analyze::run(
            AnalyzeArgs {
                file,
                grid_size,
                radius,
                angle,
                azimuths,
                center_lat,
                center_from_region,
                strict,
                include_non_matching,
                output,
                resume,
                geojson_output,
            },
            &config_path,
            cli.debug,
        ),
        Commands::Inspect { file } => commands::inspect::run(&file, &config_path),
        Commands::Report {
            file,
            geojson_output,
        } => commands::report::run(&file, geojson_output),
        Commands::Config { command } => commands::config::run(command, &config_path),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "geosector",
            "analyze",
            "ukraine.geojson",
            "--grid-size",
            "50",
            "--azimuth",
            "0",
            "--azimuth",
            "180",
            "--center-lat",
            "-12.5",
            "--strict",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                file,
                grid_size,
                azimuths,
                center_lat,
                strict,
                resume,
                ..
            } => {
                assert_eq!(file, PathBuf::from("ukraine.geojson"));
                assert_eq!(grid_size, Some(50.0));
                assert_eq!(azimuths, vec![0.0, 180.0]);
                assert_eq!(center_lat, Some(-12.5));
                assert!(strict);
                assert!(!resume);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_resume_requires_output() {
        assert!(Cli::try_parse_from(["geosector", "analyze", "a.geojson", "--resume"]).is_err());
    }

    #[test]
    fn test_center_options_conflict() {
        let result = Cli::try_parse_from([
            "geosector",
            "analyze",
            "a.geojson",
            "--center-lat",
            "10",
            "--center-from-region",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "geosector",
            "config",
            "list",
            "--config",
            "/tmp/geosector.ini",
            "--debug",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/geosector.ini")));
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::List
            }
        ));
    }

    #[test]
    fn test_file_is_required() {
        assert!(Cli::try_parse_from(["geosector", "inspect"]).is_err());
        assert!(Cli::try_parse_from(["geosector", "report"]).is_err());
    }

    #[test]
    fn test_report_geojson_output() {
        let cli = Cli::try_parse_from([
            "geosector",
            "report",
            "results.json",
            "--geojson-output",
            "map.geojson",
        ])
        .unwrap();
        match cli.command {
            Commands::Report {
                file,
                geojson_output,
            } => {
                assert_eq!(file, PathBuf::from("results.json"));
                assert_eq!(geojson_output, Some(PathBuf::from("map.geojson")));
            }
            _ => panic!("expected report"),
        }
    }
}
