#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the citizen map toolchain.
//!
//! Reads reports and air quality samples from JSON files, runs them
//! through the aggregation crates and prints the result as JSON.

mod config;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use citizen_map_aggregate::{
    NeighborhoodAverage, accuracy_rate, approval_ratio, location_summary, neighborhood_average,
    recent_reports, report_heat_points, sample_heat_points, samples_in_viewport,
};
use citizen_map_aqi::{AqiCategory, Pollutant, decibels_to_intensity, index_to_intensity};
use citizen_map_report_models::{
    AqiSample, BoundingBox, GeoPoint, Report, ReportType, VoteDirection,
};
use citizen_map_spatial::sampling_grid;
use citizen_map_store::{AqiSampleCache, InMemoryReportRepository};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "citizen_map", about = "Citizen air and noise report toolchain")]
struct Cli {
    /// Path to a `citizen_map.toml` config file
    #[arg(long, global = true, env = "CITIZEN_MAP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a pollutant concentration (µg/m³) to an AQI value
    Aqi {
        concentration: f64,
        /// Pollutant the concentration was measured for
        #[arg(long, default_value = "pm25")]
        pollutant: Pollutant,
    },
    /// Normalize an AQI value (air) or decibel level (noise) to a heatmap intensity
    Intensity {
        value: f64,
        #[arg(long = "type", default_value = "air")]
        report_type: ReportType,
    },
    /// Heat points for the reports of one type inside a viewport
    Heatmap {
        /// JSON file holding an array of reports
        #[arg(long)]
        reports: PathBuf,
        #[arg(long = "type", default_value = "air")]
        report_type: ReportType,
        /// Viewport as `west,south,east,north`. All reports when omitted.
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<BoundingBox>,
    },
    /// Heat points for air quality samples inside a viewport
    Samples {
        /// JSON file holding an array of `[lat, lon, index, pm25]` samples
        #[arg(long)]
        samples: PathBuf,
        /// Viewport as `west,south,east,north`. All samples when omitted.
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<BoundingBox>,
    },
    /// Reports around a point and their neighborhood averages
    Nearby {
        #[arg(long)]
        reports: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Only include reports of this type
        #[arg(long = "type")]
        report_type: Option<ReportType>,
    },
    /// Detail panel for a selected point: recent reports and their averages
    Summary {
        #[arg(long)]
        reports: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// Newest reports first
    Recent {
        #[arg(long)]
        reports: PathBuf,
        /// Number of reports to show (defaults to the configured recent limit)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Apply a vote to a report and show the resulting counters
    Vote {
        #[arg(long)]
        reports: PathBuf,
        /// Report ID
        id: String,
        direction: VoteDirection,
    },
    /// Sampling grid for a viewport, optionally split against cached samples
    Grid {
        /// Viewport as `west,south,east,north`
        #[arg(long, allow_hyphen_values = true)]
        bbox: BoundingBox,
        /// Grid spacing in kilometers (defaults to the configured spacing)
        #[arg(long)]
        spacing_km: Option<f64>,
        /// JSON file of previously fetched samples
        #[arg(long)]
        cached: Option<PathBuf>,
        /// When the cached samples were fetched (RFC 3339, defaults to now)
        #[arg(long, requires = "cached")]
        cached_at: Option<DateTime<Utc>>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AqiOutput {
    pollutant: Pollutant,
    concentration: f64,
    index: f64,
    category: AqiCategory,
    color: &'static str,
    intensity: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NearbyOutput<'a> {
    reports: Vec<&'a Report>,
    averages: Vec<NeighborhoodAverage>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoteOutput<'a> {
    change: citizen_map_aggregate::VoteChange,
    report: Option<&'a Report>,
    approval_ratio: Option<f64>,
    reporter_accuracy: Option<f64>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let file = File::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
    Ok(value)
}

fn load_repository(path: &Path) -> Result<InMemoryReportRepository, Box<dyn std::error::Error>> {
    let reports: Vec<Report> = read_json(path)?;
    log::info!("Read {} reports from {}", reports.len(), path.display());
    Ok(InMemoryReportRepository::with_reports(reports)?)
}

fn print_json(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[allow(clippy::too_many_lines)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    let settings = config.aggregate;

    match cli.command {
        Commands::Aqi {
            concentration,
            pollutant,
        } => {
            let index = pollutant.to_index(concentration);
            let category = AqiCategory::from_index(index);
            print_json(&AqiOutput {
                pollutant,
                concentration,
                index,
                category,
                color: category.color(),
                intensity: index_to_intensity(index),
            })?;
        }
        Commands::Intensity { value, report_type } => {
            let intensity = match report_type {
                ReportType::Air => index_to_intensity(value),
                ReportType::Noise => decibels_to_intensity(value),
            };
            print_json(&intensity)?;
        }
        Commands::Heatmap {
            reports,
            report_type,
            bbox,
        } => {
            let repo = load_repository(&reports)?;
            let visible = match bbox {
                Some(bbox) => repo.in_viewport(&bbox, settings.viewport_padding),
                None => repo.all().iter().collect(),
            };
            print_json(&report_heat_points(visible, report_type))?;
        }
        Commands::Samples { samples, bbox } => {
            let samples: Vec<AqiSample> = read_json(&samples)?;
            let visible = match bbox {
                Some(bbox) => samples_in_viewport(&samples, &bbox, settings.viewport_padding),
                None => samples.iter().collect(),
            };
            print_json(&sample_heat_points(visible))?;
        }
        Commands::Nearby {
            reports,
            lat,
            lng,
            report_type,
        } => {
            let repo = load_repository(&reports)?;
            let center = GeoPoint::new(lat, lng);
            let types = report_type.map_or_else(|| ReportType::all().to_vec(), |t| vec![t]);
            let averages = types
                .into_iter()
                .filter_map(|t| neighborhood_average(repo.all(), center, t, &settings))
                .collect();
            print_json(&NearbyOutput {
                reports: repo.near(center, settings.neighborhood_tolerance, report_type),
                averages,
            })?;
        }
        Commands::Summary { reports, lat, lng } => {
            let repo = load_repository(&reports)?;
            print_json(&location_summary(
                repo.all(),
                GeoPoint::new(lat, lng),
                &settings,
            ))?;
        }
        Commands::Recent { reports, limit } => {
            let repo = load_repository(&reports)?;
            let limit = limit.unwrap_or(settings.recent_limit);
            print_json(&recent_reports(repo.all(), limit))?;
        }
        Commands::Vote {
            reports,
            id,
            direction,
        } => {
            let mut repo = load_repository(&reports)?;
            let change = repo.vote(&id, direction)?;
            let report = repo.get(&id);
            let reporter_accuracy = report.and_then(|r| accuracy_rate(repo.by_user(&r.user_id)));
            print_json(&VoteOutput {
                change,
                report,
                approval_ratio: report.and_then(approval_ratio),
                reporter_accuracy,
            })?;
        }
        Commands::Grid {
            bbox,
            spacing_km,
            cached,
            cached_at,
        } => {
            let spacing = spacing_km.unwrap_or(config.grid.spacing_km);
            let grid = sampling_grid(&bbox, spacing);
            log::info!("Grid of {} points at {spacing} km spacing", grid.len());

            let Some(cached) = cached else {
                print_json(&grid)?;
                return Ok(());
            };

            let now = Utc::now();
            let mut cache =
                AqiSampleCache::new(Duration::minutes(config.grid.sample_max_age_minutes));
            let samples: Vec<AqiSample> = read_json(&cached)?;
            for sample in samples {
                cache.record(sample, cached_at.unwrap_or(now));
            }
            print_json(&cache.plan_refresh(&grid, now))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_viewport() {
        let cli = Cli::try_parse_from([
            "citizen_map",
            "grid",
            "--bbox",
            "-122.52,37.70,-122.35,37.83",
            "--spacing-km",
            "2",
        ])
        .unwrap();
        let Commands::Grid {
            bbox, spacing_km, ..
        } = cli.command
        else {
            panic!("expected grid command");
        };
        assert!((bbox.west - -122.52).abs() < f64::EPSILON);
        assert_eq!(spacing_km, Some(2.0));
    }

    #[test]
    fn parses_vote_direction_and_type() {
        let cli = Cli::try_parse_from([
            "citizen_map",
            "vote",
            "--reports",
            "reports.json",
            "r1",
            "down",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Vote {
                direction: VoteDirection::Down,
                ..
            }
        ));

        let cli = Cli::try_parse_from(["citizen_map", "intensity", "65", "--type", "noise"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Intensity {
                report_type: ReportType::Noise,
                ..
            }
        ));
    }

    #[test]
    fn cached_at_requires_cached() {
        let result = Cli::try_parse_from([
            "citizen_map",
            "grid",
            "--bbox",
            "106.6,10.7,106.8,10.8",
            "--cached-at",
            "2025-03-01T08:00:00Z",
        ]);
        assert!(result.is_err());
    }
}
