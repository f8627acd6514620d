//! AOD command-line tool.
//!
//! Runs the AOD pipeline against local MODIS MCD19A2 GeoTIFFs and prints
//! JSON results to stdout. Logs go to stderr.

mod hotspots;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use aod_common::ZoneBounds;
use aod_pipeline::{
    discover_rasters, AodPipeline, BatchConfig, PipelineConfig, RegionRegistry,
};
use clap::{Parser, Subcommand};
use gdal_tools::{GdalTools, ToolConfig};
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use hotspots::{data_range, merge_hotspots, statistics, HotspotReport};

#[derive(Parser, Debug)]
#[command(name = "aod-cli")]
#[command(about = "Aerosol optical depth from MODIS GeoTIFFs via the GDAL tools")]
struct Cli {
    /// Region registry YAML (built-in NYC and Mumbai when omitted)
    #[arg(long, env = "AOD_REGIONS", global = true)]
    regions: Option<PathBuf>,

    /// Files processed concurrently per batch
    #[arg(long, env = "AOD_BATCH_SIZE", global = true)]
    batch_size: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that gdalinfo and gdal_translate can be run
    Probe,

    /// File-level AOD for every GeoTIFF in a directory
    Aod {
        /// Directory of .tif files
        dir: PathBuf,
    },

    /// Pixel extraction for every GeoTIFF in a directory
    Pixels {
        /// Directory of .tif files
        dir: PathBuf,

        /// Include the sampled pixel arrays in the output
        #[arg(long)]
        include_pixels: bool,
    },

    /// Highest-AOD points over the most recent files, merged and re-ranked
    Hotspots {
        /// Directory of .tif files
        dir: PathBuf,

        /// Region id (default: the registry's default region)
        #[arg(long)]
        region: Option<String>,

        /// Zone id within the region
        #[arg(long, default_value = "citywide")]
        area: String,

        /// Hotspots per file and in the merged list
        #[arg(long, default_value = "10")]
        max: usize,

        /// Number of most recent files to scan
        #[arg(long, default_value = "30")]
        recent: usize,
    },

    /// Average AOD inside a zone for one file
    Zone {
        /// GeoTIFF file
        file: PathBuf,

        /// Region id (default: the registry's default region)
        #[arg(long)]
        region: Option<String>,

        /// Zone id within the region
        #[arg(long, default_value = "citywide")]
        area: String,

        /// Explicit bounds "north,south,west,east" (overrides --area)
        #[arg(long)]
        bounds: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let regions = match &cli.regions {
        Some(path) => RegionRegistry::from_yaml_file(path)?,
        None => RegionRegistry::builtin(),
    };

    let mut batch = BatchConfig::default();
    if let Some(size) = cli.batch_size {
        anyhow::ensure!(size > 0, "--batch-size must be at least 1");
        batch.batch_size = size;
    }

    let tool_config = ToolConfig::from_env();
    info!(
        gdalinfo = %tool_config.gdalinfo.display(),
        gdal_translate = %tool_config.gdal_translate.display(),
        timeout_secs = tool_config.timeout.as_secs(),
        "Resolved GDAL tools"
    );

    let pipeline = AodPipeline::new(
        GdalTools::new(tool_config),
        PipelineConfig::default()
            .with_regions(regions)
            .with_batch(batch),
    );

    match cli.command {
        Commands::Probe => {
            let versions = pipeline.probe().await?;
            print_json(&serde_json::json!({
                "gdalinfo": versions.gdalinfo,
                "gdalTranslate": versions.gdal_translate,
            }))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Aod { dir } => {
            let result = pipeline.process_directory_aod(&dir).await?;
            print_json(&result)?;
            Ok(exit_for(result.success))
        }
        Commands::Pixels {
            dir,
            include_pixels,
        } => {
            let mut result = pipeline.process_directory_pixels(&dir).await?;
            if !include_pixels {
                for file in result.data.iter_mut().chain(result.errors.iter_mut()) {
                    file.pixels.clear();
                }
            }
            print_json(&result)?;
            Ok(exit_for(result.success))
        }
        Commands::Hotspots {
            dir,
            region,
            area,
            max,
            recent,
        } => {
            let report =
                run_hotspots(&pipeline, &dir, region.as_deref(), &area, max, recent).await?;
            print_json(&report)?;
            Ok(exit_for(report.success))
        }
        Commands::Zone {
            file,
            region,
            area,
            bounds,
        } => {
            let bounds = match bounds {
                Some(text) => ZoneBounds::from_csv(&text)?,
                None => area_bounds(&pipeline.config().regions, region.as_deref(), &area)?,
            };
            let result = pipeline.zone_average(&file, &bounds).await;
            print_json(&result)?;
            Ok(exit_for(result.success))
        }
    }
}

/// Scan the most recent files, keep hotspots inside the area, merge and re-rank.
async fn run_hotspots(
    pipeline: &AodPipeline<GdalTools>,
    dir: &Path,
    region: Option<&str>,
    area: &str,
    max: usize,
    recent: usize,
) -> Result<HotspotReport> {
    let registry = &pipeline.config().regions;
    let region = resolve_region(registry, region)?;
    let zone = region
        .zone(area)
        .or_else(|| region.zone("citywide"))
        .ok_or_else(|| anyhow!("Unknown area '{}' for region '{}'", area, region.id))?;

    pipeline.probe().await?;

    let files = discover_rasters(dir).await?;
    let start = files.len().saturating_sub(recent);
    let recent_files = &files[start..];

    let mut all = Vec::new();
    let mut processed = 0;
    for file in recent_files {
        let result = pipeline.extract_hotspots(file.path(), max).await;
        if !result.success {
            warn!(
                file = %file.filename,
                error = result.error.as_deref().unwrap_or_default(),
                "Skipping file"
            );
            continue;
        }

        let mut kept: Vec<_> = result
            .hotspots
            .into_iter()
            .filter(|h| zone.contains(h.lat, h.lng))
            .collect();
        if kept.is_empty() {
            continue;
        }

        for hotspot in &mut kept {
            hotspot.stamp(file.acquisition.as_ref(), &file.filename);
        }
        all.extend(kept);
        processed += 1;
    }

    let merged = merge_hotspots(all, max);
    let success = !merged.is_empty();

    Ok(HotspotReport {
        success,
        region: region.name.clone(),
        area: zone.name.clone(),
        area_id: zone.id.clone(),
        statistics: statistics(&merged, processed, recent_files.len()),
        data_range: data_range(&merged),
        error: (!success).then(|| "No hotspots found in the specified area".to_string()),
        hotspots: merged,
    })
}

fn resolve_region<'a>(
    registry: &'a RegionRegistry,
    id: Option<&str>,
) -> Result<&'a aod_pipeline::Region> {
    let id = id.unwrap_or(&registry.default_region);
    registry
        .get(id)
        .ok_or_else(|| anyhow!("Unknown region '{}'", id))
}

/// Bounds for `--area`; the whole-region zone uses the union of its quadrants.
fn area_bounds(registry: &RegionRegistry, region: Option<&str>, area: &str) -> Result<ZoneBounds> {
    let region = resolve_region(registry, region)?;
    let zone = region
        .zone(area)
        .ok_or_else(|| anyhow!("Unknown area '{}' for region '{}'", area, region.id))?;

    zone.bounds
        .or_else(|| region.extent())
        .with_context(|| format!("Region '{}' defines no zone bounds", region.id))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_for(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
