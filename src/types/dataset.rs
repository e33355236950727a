//! Derived dataset rows
//!
//! One row per (well, zone), produced by the aggregator and georeferenced
//! by the coordinate projector before the presentation layer sees them.

use crate::geo::{GeoPosition, GridPosition};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A row that carries a UTM position and receives a geographic position
/// from the projector. The seam the pipeline uses to georeference every
/// derived table with one batch call per table.
pub trait Georeferenced {
    fn position(&self) -> GridPosition;
    fn set_geo(&mut self, geo: GeoPosition);
}

/// Cumulative production totals for one (well, zone).
///
/// Volumes and months-active are summed across the well's completion
/// points in the zone; the position is that of the longest-lived
/// completion interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellTotal {
    pub well: String,
    pub zone: String,
    /// Months active, summed across completion points
    pub months_active: u32,
    /// Cumulative oil (Mbbl)
    pub oil_mbbl: f64,
    /// Cumulative water (Mbbl)
    pub water_mbbl: f64,
    /// Cumulative gas (MMcf)
    pub gas_mmcf: f64,
    /// Representative completion-point position (UTM)
    pub position: GridPosition,
    /// WGS84 position, filled by the projector
    pub geo: GeoPosition,
}

impl Georeferenced for WellTotal {
    fn position(&self) -> GridPosition {
        self.position
    }
    fn set_geo(&mut self, geo: GeoPosition) {
        self.geo = geo;
    }
}

/// Daily production for one (well, zone) at the log's as-of date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRate {
    pub well: String,
    pub zone: String,
    /// The global as-of timestamp every row in this table was sampled at
    pub stamp: NaiveDateTime,
    /// Oil rate (bbl/day), summed across completion points
    pub oil_bpd: f64,
    /// Water rate (bbl/day), summed across completion points
    pub water_bpd: f64,
    /// Gas rate (MMcf/day), summed across completion points
    pub gas_mmcfd: f64,
    /// Gas-to-oil ratio (Mcf/bbl). Plain IEEE quotient: +inf for gas with
    /// no oil, NaN for 0/0. Surfaced as-is, never dropped.
    pub gor_mcf_bbl: f64,
    /// Representative completion-point position (UTM)
    pub position: GridPosition,
    /// WGS84 position, filled by the projector
    pub geo: GeoPosition,
}

impl Georeferenced for DailyRate {
    fn position(&self) -> GridPosition {
        self.position
    }
    fn set_geo(&mut self, geo: GeoPosition) {
        self.geo = geo;
    }
}

/// Per-(well, zone) summary line: cumulative totals next to total
/// months-active, without coordinates. Derived in the same grouping pass
/// as [`WellTotal`], so no (well, zone) can fall out of an unmatched join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub well: String,
    pub zone: String,
    /// Months active, summed across completion points
    pub months_active: u32,
    /// Cumulative oil (Mbbl)
    pub oil_mbbl: f64,
    /// Cumulative water (Mbbl)
    pub water_mbbl: f64,
    /// Cumulative gas (MMcf)
    pub gas_mmcf: f64,
}

/// One distinct well marker for the map overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellLocation {
    pub well: String,
    pub zone: String,
    /// Completion-point position (UTM)
    pub position: GridPosition,
    /// WGS84 position, filled by the projector
    pub geo: GeoPosition,
}

impl Georeferenced for WellLocation {
    fn position(&self) -> GridPosition {
        self.position
    }
    fn set_geo(&mut self, geo: GeoPosition) {
        self.geo = geo;
    }
}
