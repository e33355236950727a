//! acmprod CLI
//!
//! Runs the ACM production pipeline over a production CSV export and
//! prints per-table summaries, optionally dumping the full atlas as JSON
//! for the dashboard.
//!
//! Usage:
//!   acmprod data/acm_prod.csv
//!   acmprod data/acm_prod.csv --zones JURASICO --zones CRETACICO
//!   acmprod data/acm_prod.csv --json atlas.json
//!
//! Environment:
//!   RUST_LOG        Logging filter (default: info)
//!   ACMPROD_CONFIG  Path to a pipeline TOML config

use acmprod::filter::{select, ZoneSelection};
use acmprod::{DataError, Pipeline, PipelineConfig, ProductionAtlas, ProductionLog};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// ACM production distribution pipeline.
#[derive(Parser)]
#[command(name = "acmprod", version, about)]
struct Args {
    /// Production CSV export (POZO / ZONA / FECHA / ... columns)
    input: Option<PathBuf>,

    /// Zones to keep in the printed tables (repeatable). No flag prints
    /// everything; an empty selection via flags prints nothing.
    #[arg(long = "zones", short = 'z')]
    zones: Vec<String>,

    /// Pipeline config TOML (overrides ACMPROD_CONFIG and ./acmprod.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the full georeferenced atlas as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // A missing input file ends the session with a readable message, not
    // a stack trace.
    let Some(input) = args.input else {
        return Err(DataError::InputMissing)
            .context("pass the production CSV export as the first argument");
    };

    let config = match &args.config {
        Some(path) => PipelineConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::load(),
    };

    let pipeline = Pipeline::new(&config).context("building pipeline")?;
    let log = ProductionLog::load(&input)
        .with_context(|| format!("loading production log {}", input.display()))?;
    let atlas = pipeline.run(&log).context("deriving atlas")?;

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&atlas).context("serializing atlas")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing atlas to {}", path.display()))?;
        println!("atlas written to {}", path.display());
    }

    print_atlas(&atlas, &log, args.zones);

    Ok(())
}

fn print_atlas(atlas: &ProductionAtlas, log: &ProductionLog, zones: Vec<String>) {
    let s = &log.summary;
    println!("=== ACM production atlas: {} ===", s.source);
    println!("  Records:    {} rows, {} wells, {} zones", s.record_count, s.well_count, s.zone_count);
    println!("  Dates:      {} - {}", s.date_range.0, s.date_range.1);
    println!("  Boundary:   {} vertices", atlas.boundary.len());

    // No --zones flag means "show everything"; the empty ZoneSelection is
    // reserved for the dashboard's nothing-selected state.
    let all_zones: Vec<String> = if zones.is_empty() {
        let mut zs: Vec<String> = atlas.summary.iter().map(|r| r.zone.clone()).collect();
        zs.sort();
        zs.dedup();
        zs
    } else {
        zones
    };
    let selection = ZoneSelection::new(all_zones);

    println!("\n--- Cumulative totals ---");
    for t in select(&atlas.cumulative, &selection) {
        println!(
            "  {:<12} {:<10} {:>4} mo  Np {:>9.1} Mbbl  Wp {:>9.1} Mbbl  Gp {:>9.1} MMcf  ({:.5}, {:.5})",
            t.well, t.zone, t.months_active, t.oil_mbbl, t.water_mbbl, t.gas_mmcf,
            t.geo.latitude, t.geo.longitude
        );
    }

    println!("\n--- Normalized (fixed horizon) ---");
    for t in select(&atlas.normalized, &selection) {
        println!(
            "  {:<12} {:<10} {:>4} mo  Np {:>9.1} Mbbl  Wp {:>9.1} Mbbl  Gp {:>9.1} MMcf",
            t.well, t.zone, t.months_active, t.oil_mbbl, t.water_mbbl, t.gas_mmcf
        );
    }

    println!("\n--- Daily production ---");
    if let Some(first) = atlas.daily.first() {
        println!("  as of {}", first.stamp);
    }
    for d in select(&atlas.daily, &selection) {
        println!(
            "  {:<12} {:<10} oil {:>8.1} bpd  water {:>8.1} bpd  gas {:>7.3} MMcfd  GOR {:>8.2} Mcf/bbl",
            d.well, d.zone, d.oil_bpd, d.water_bpd, d.gas_mmcfd, d.gor_mcf_bbl
        );
    }

    println!("\n--- Summary ---");
    for r in select(&atlas.summary, &selection) {
        println!(
            "  {:<12} {:<10} {:>4} mo  Np {:>9.1}  Wp {:>9.1}  Gp {:>9.1}",
            r.well, r.zone, r.months_active, r.oil_mbbl, r.water_mbbl, r.gas_mmcf
        );
    }
}
