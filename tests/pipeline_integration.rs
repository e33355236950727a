//! End-to-end pipeline integration tests
//!
//! Write a production CSV to disk, load it, run the full
//! ingest -> aggregate -> project pipeline, and check the atlas the
//! presentation layer would receive. Error paths are exercised through
//! the same file-based entry point.

use acmprod::filter::{select, ZoneSelection};
use acmprod::ingest::DataError;
use acmprod::{Pipeline, PipelineConfig, ProductionLog};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "POZO,POZO ID,ZONA,FECHA,MESES ACTIVO,NP Mbbl,WP Mbbl,GP MMcf,ACEITE DIARIO BPD,AGUA DIARIA BPD,GAS DIARIO MMcfd,WGS84_UTMX_OBJETIVO,WGS84_UTMY_OBJETIVO";

fn write_csv(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tempfile");
    file.write_all(body.as_bytes()).expect("write csv");
    file.flush().expect("flush");
    file
}

/// Two wells in the lease area; ACM-1 has two completion points in the
/// same zone and a 12-month observation, ACM-2 has neither.
fn sample_csv() -> String {
    format!(
        "{HEADER}\n\
         ACM-1,ACM-1-H1,JURASICO,01/01/2024 00:00,6,60.0,20.0,150.0,90.0,30.0,0.90,629500,2295500\n\
         ACM-1,ACM-1-H1,JURASICO,01/07/2024 00:00,12,100.0,35.0,250.0,85.0,32.0,0.85,629500,2295500\n\
         ACM-1,ACM-1-H2,JURASICO,01/07/2024 00:00,4,50.0,10.0,80.0,25.0,8.0,0.20,630100,2296200\n\
         ACM-2,ACM-2-H1,CRETACICO,01/01/2024 00:00,5,30.0,5.0,40.0,45.0,10.0,0.30,641000,2301000\n\
         ACM-2,ACM-2-H1,CRETACICO,01/07/2024 00:00,11,66.0,11.0,88.0,40.0,11.0,0.25,641000,2301000\n"
    )
}

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn test_full_run_from_csv_file() {
    let file = write_csv(&sample_csv());
    let log = ProductionLog::load(file.path()).expect("load");
    assert_eq!(log.records().len(), 5);
    assert_eq!(log.summary.well_count, 2);
    assert_eq!(log.summary.zone_count, 2);

    let pipeline = Pipeline::new(&PipelineConfig::default()).expect("pipeline");
    let atlas = pipeline.run(&log).expect("run");

    // Cumulative: ACM-1's two completions merge into one (well, zone) row.
    assert_eq!(atlas.cumulative.len(), 2);
    let acm1 = atlas
        .cumulative
        .iter()
        .find(|t| t.well == "ACM-1")
        .expect("ACM-1 row");
    assert!((acm1.oil_mbbl - 150.0).abs() < 1e-9, "oil = {}", acm1.oil_mbbl);
    assert_eq!(acm1.months_active, 16);

    // Normalized: only ACM-1 hit months_active == 12 exactly.
    assert_eq!(atlas.normalized.len(), 1);
    assert_eq!(atlas.normalized[0].well, "ACM-1");
    assert!((atlas.normalized[0].oil_mbbl - 100.0).abs() < 1e-9);

    // Daily: both wells have rows at the global as-of date.
    assert_eq!(atlas.daily.len(), 2);
    let daily_acm1 = atlas
        .daily
        .iter()
        .find(|d| d.well == "ACM-1")
        .expect("ACM-1 daily");
    assert!((daily_acm1.oil_bpd - 110.0).abs() < 1e-9);

    // Summary covers exactly the cumulative groups.
    assert_eq!(atlas.summary.len(), atlas.cumulative.len());

    // Well listing: three distinct (well, zone, position) markers.
    assert_eq!(atlas.wells.len(), 3);

    // Everything georeferenced into the lease neighbourhood.
    for t in &atlas.cumulative {
        assert!(t.geo.latitude > 20.0 && t.geo.latitude < 21.5);
        assert!(t.geo.longitude > -98.5 && t.geo.longitude < -97.0);
    }
    assert_eq!(atlas.boundary.len(), 5);
}

#[test]
fn test_zone_filter_over_atlas_tables() {
    let file = write_csv(&sample_csv());
    let log = ProductionLog::load(file.path()).expect("load");
    let pipeline = Pipeline::new(&PipelineConfig::default()).expect("pipeline");
    let atlas = pipeline.run(&log).expect("run");

    let jurasico = ZoneSelection::new(["JURASICO"]);
    assert_eq!(select(&atlas.cumulative, &jurasico).len(), 1);
    assert_eq!(select(&atlas.daily, &jurasico).len(), 1);
    assert_eq!(select(&atlas.summary, &jurasico).len(), 1);

    // Empty selection: empty result for every table, never an error.
    let nothing = ZoneSelection::default();
    assert!(select(&atlas.cumulative, &nothing).is_empty());
    assert!(select(&atlas.normalized, &nothing).is_empty());
    assert!(select(&atlas.daily, &nothing).is_empty());
    assert!(select(&atlas.summary, &nothing).is_empty());
    assert!(select(&atlas.wells, &nothing).is_empty());
}

#[test]
fn test_reruns_are_deterministic() {
    let file = write_csv(&sample_csv());
    let log = ProductionLog::load(file.path()).expect("load");
    let pipeline = Pipeline::new(&PipelineConfig::default()).expect("pipeline");

    let a = pipeline.run(&log).expect("first run");
    let b = pipeline.run(&log).expect("second run");
    assert_eq!(a.cumulative.len(), b.cumulative.len());
    for (x, y) in a.cumulative.iter().zip(&b.cumulative) {
        assert_eq!(x.well, y.well);
        assert!((x.oil_mbbl - y.oil_mbbl).abs() < 1e-15);
        assert!((x.geo.latitude - y.geo.latitude).abs() < 1e-15);
    }
}

#[test]
fn test_gor_division_anomaly_reaches_the_atlas() {
    let body = format!(
        "{HEADER}\n\
         ACM-3,H1,JURASICO,01/07/2024 00:00,12,10.0,1.0,50.0,0.0,0.0,0.40,629600,2295600\n"
    );
    let file = write_csv(&body);
    let log = ProductionLog::load(file.path()).expect("load");
    let pipeline = Pipeline::new(&PipelineConfig::default()).expect("pipeline");
    let atlas = pipeline.run(&log).expect("run");

    assert_eq!(atlas.daily.len(), 1);
    let gor = atlas.daily[0].gor_mcf_bbl;
    assert!(gor.is_infinite() && gor > 0.0, "gor = {gor}");
}

// ============================================================================
// Error paths
// ============================================================================

#[test]
fn test_missing_file_is_an_io_error() {
    match ProductionLog::load("does/not/exist.csv") {
        Err(DataError::Io { .. }) => {}
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_missing_column_fails_the_load() {
    let body = sample_csv().replace("ZONA", "ZONE");
    let file = write_csv(&body);
    match ProductionLog::load(file.path()) {
        Err(DataError::MissingColumn(name)) => assert_eq!(name, "ZONA"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn test_empty_table_fails_the_load() {
    let file = write_csv(&format!("{HEADER}\n"));
    assert!(matches!(
        ProductionLog::load(file.path()),
        Err(DataError::EmptyInput)
    ));
}

#[test]
fn test_unparsable_timestamp_fails_the_load() {
    let body = sample_csv().replace("01/07/2024 00:00", "July 1 2024");
    let file = write_csv(&body);
    assert!(matches!(
        ProductionLog::load(file.path()),
        Err(DataError::BadTimestamp { .. })
    ));
}
