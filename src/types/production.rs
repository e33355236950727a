//! Raw production-log record

use crate::geo::GridPosition;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the per-well production log.
///
/// A well completed in several zones appears once per completion interval
/// ("shot") per measurement date, so a single date can carry multiple rows
/// for the same well. Cumulative volumes and the months-active counter are
/// non-decreasing in date for a fixed (well, completion, zone).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// Well name (`POZO`)
    pub well: String,
    /// Completion-point identifier (`POZO ID`)
    pub completion: String,
    /// Geological zone (`ZONA`)
    pub zone: String,
    /// Measurement timestamp (`FECHA`)
    pub stamp: NaiveDateTime,
    /// Months the completion has been active at this date (`MESES ACTIVO`)
    pub months_active: u32,

    // === Cumulative volumes to date ===
    /// Cumulative oil (Mbbl) - `NP Mbbl`
    pub cum_oil_mbbl: f64,
    /// Cumulative water (Mbbl) - `WP Mbbl`
    pub cum_water_mbbl: f64,
    /// Cumulative gas (MMcf) - `GP MMcf`
    pub cum_gas_mmcf: f64,

    // === Instantaneous daily rates ===
    /// Oil rate (bbl/day) - `ACEITE DIARIO BPD`
    pub oil_bpd: f64,
    /// Water rate (bbl/day) - `AGUA DIARIA BPD`
    pub water_bpd: f64,
    /// Gas rate (MMcf/day) - `GAS DIARIO MMcfd`
    pub gas_mmcfd: f64,

    /// Completion-point position on the projected UTM grid
    /// (`WGS84_UTMX_OBJETIVO` / `WGS84_UTMY_OBJETIVO`)
    pub position: GridPosition,
}

impl Default for ProductionRecord {
    fn default() -> Self {
        Self {
            well: String::new(),
            completion: String::new(),
            zone: String::new(),
            stamp: NaiveDateTime::default(),
            months_active: 0,
            cum_oil_mbbl: 0.0,
            cum_water_mbbl: 0.0,
            cum_gas_mmcf: 0.0,
            oil_bpd: 0.0,
            water_bpd: 0.0,
            gas_mmcfd: 0.0,
            position: GridPosition {
                easting: 0.0,
                northing: 0.0,
            },
        }
    }
}
