//! Production aggregation
//!
//! Derives the dashboard datasets from the raw production log: total
//! cumulative production, fixed-horizon normalized production, daily
//! production at the log's as-of date, the per-(well, zone) summary table,
//! and the deduplicated well-location listing.
//!
//! The grouping discipline everywhere is max-then-sum: per
//! (well, completion, zone) take the element-wise maximum over dates
//! (cumulative volumes are monotonic, so max is the final observation and
//! stays correct under duplicated or out-of-order rows), then sum the
//! finals across a well's completion points in the same zone.

use crate::geo::{GeoPosition, GridPosition};
use crate::ingest::DataError;
use crate::types::{DailyRate, ProductionRecord, SummaryRow, WellLocation, WellTotal};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashSet};

/// Geographic placeholder until the projector pass fills it in.
const GEO_PENDING: GeoPosition = GeoPosition {
    latitude: f64::NAN,
    longitude: f64::NAN,
};

/// Key of one completion interval: (well, completion id, zone).
type CompletionKey = (String, String, String);
/// Key of one derived row: (well, zone).
type WellZoneKey = (String, String);

/// Final observation of one completion interval.
#[derive(Debug, Clone)]
struct CompletionFinal {
    months_active: u32,
    oil_mbbl: f64,
    water_mbbl: f64,
    gas_mmcf: f64,
    /// Position of the latest-dated row in the group
    position: GridPosition,
    latest_stamp: NaiveDateTime,
}

/// The five derived datasets, prior to georeferencing.
#[derive(Debug, Clone)]
pub struct Aggregates {
    /// Total cumulative production, one row per (well, zone)
    pub cumulative: Vec<WellTotal>,
    /// Cumulative production at exactly the cutoff horizon
    pub normalized: Vec<WellTotal>,
    /// Daily production at the global as-of date
    pub daily: Vec<DailyRate>,
    /// Volumes next to total months-active, no coordinates
    pub summary: Vec<SummaryRow>,
    /// Distinct (well, zone, position) markers
    pub wells: Vec<WellLocation>,
}

/// Converts the raw record table into the derived datasets.
#[derive(Debug, Clone)]
pub struct Aggregator {
    /// Normalization horizon in months (the `months_active` value a row
    /// must hit exactly to enter the normalized dataset)
    cutoff_months: u32,
}

impl Aggregator {
    pub fn new(cutoff_months: u32) -> Self {
        Self { cutoff_months }
    }

    /// Run every aggregation over a non-empty record table.
    ///
    /// The input is never mutated; each dataset is freshly owned.
    pub fn aggregate(&self, records: &[ProductionRecord]) -> Result<Aggregates, DataError> {
        if records.is_empty() {
            return Err(DataError::EmptyInput);
        }

        let cumulative = totals_of(records);
        let normalized = self.normalized_totals(records, cumulative.len());
        let daily = daily_latest(records);
        let summary = cumulative
            .iter()
            .map(|t| SummaryRow {
                well: t.well.clone(),
                zone: t.zone.clone(),
                months_active: t.months_active,
                oil_mbbl: t.oil_mbbl,
                water_mbbl: t.water_mbbl,
                gas_mmcf: t.gas_mmcf,
            })
            .collect();
        let wells = well_locations(records);

        Ok(Aggregates {
            cumulative,
            normalized,
            daily,
            summary,
            wells,
        })
    }

    fn normalized_totals(
        &self,
        records: &[ProductionRecord],
        total_group_count: usize,
    ) -> Vec<WellTotal> {
        let at_cutoff: Vec<ProductionRecord> = records
            .iter()
            .filter(|r| r.months_active == self.cutoff_months)
            .cloned()
            .collect();
        let normalized = totals_of(&at_cutoff);

        // Wells with no observation at exactly the cutoff drop out. That
        // is the documented policy, not an accident, so say how many.
        let dropped = total_group_count.saturating_sub(normalized.len());
        if dropped > 0 {
            tracing::info!(
                cutoff_months = self.cutoff_months,
                kept = normalized.len(),
                dropped,
                "well/zone groups without an exact-cutoff observation were excluded from the normalized dataset"
            );
        }

        normalized
    }
}

/// Element-wise-maximum final observation per (well, completion, zone).
fn final_observations(records: &[ProductionRecord]) -> BTreeMap<CompletionKey, CompletionFinal> {
    let mut finals: BTreeMap<CompletionKey, CompletionFinal> = BTreeMap::new();

    for r in records {
        let key = (r.well.clone(), r.completion.clone(), r.zone.clone());
        let f = finals.entry(key).or_insert_with(|| CompletionFinal {
            months_active: r.months_active,
            oil_mbbl: r.cum_oil_mbbl,
            water_mbbl: r.cum_water_mbbl,
            gas_mmcf: r.cum_gas_mmcf,
            position: r.position,
            latest_stamp: r.stamp,
        });
        f.months_active = f.months_active.max(r.months_active);
        f.oil_mbbl = f.oil_mbbl.max(r.cum_oil_mbbl);
        f.water_mbbl = f.water_mbbl.max(r.cum_water_mbbl);
        f.gas_mmcf = f.gas_mmcf.max(r.cum_gas_mmcf);
        if r.stamp > f.latest_stamp {
            f.latest_stamp = r.stamp;
            f.position = r.position;
        }
    }

    finals
}

/// Max-then-sum cumulative totals, one row per (well, zone).
fn totals_of(records: &[ProductionRecord]) -> Vec<WellTotal> {
    struct Acc {
        months_active: u32,
        oil_mbbl: f64,
        water_mbbl: f64,
        gas_mmcf: f64,
        position: GridPosition,
        /// months_active of the completion the position came from
        position_months: u32,
    }

    let mut groups: BTreeMap<WellZoneKey, Acc> = BTreeMap::new();

    // finals iterate in completion-id order, so on months ties the first
    // completion id keeps the position.
    for ((well, _completion, zone), f) in final_observations(records) {
        let acc = groups.entry((well, zone)).or_insert_with(|| Acc {
            months_active: 0,
            oil_mbbl: 0.0,
            water_mbbl: 0.0,
            gas_mmcf: 0.0,
            position: f.position,
            position_months: f.months_active,
        });
        acc.months_active += f.months_active;
        acc.oil_mbbl += f.oil_mbbl;
        acc.water_mbbl += f.water_mbbl;
        acc.gas_mmcf += f.gas_mmcf;
        if f.months_active > acc.position_months {
            acc.position = f.position;
            acc.position_months = f.months_active;
        }
    }

    groups
        .into_iter()
        .map(|((well, zone), acc)| WellTotal {
            well,
            zone,
            months_active: acc.months_active,
            oil_mbbl: acc.oil_mbbl,
            water_mbbl: acc.water_mbbl,
            gas_mmcf: acc.gas_mmcf,
            position: acc.position,
            geo: GEO_PENDING,
        })
        .collect()
}

/// Daily production at the log's global as-of date, one row per
/// (well, zone). Wells with no row at that exact instant are excluded:
/// every row of this table is sampled at the same timestamp.
fn daily_latest(records: &[ProductionRecord]) -> Vec<DailyRate> {
    let Some(as_of) = records.iter().map(|r| r.stamp).max() else {
        return Vec::new();
    };

    struct RateFinal {
        oil_bpd: f64,
        water_bpd: f64,
        gas_mmcfd: f64,
        position: GridPosition,
    }

    // Element-wise max per completion defends against duplicated rows at
    // the as-of instant; with a single row per key it is the identity.
    let mut per_completion: BTreeMap<CompletionKey, RateFinal> = BTreeMap::new();
    for r in records.iter().filter(|r| r.stamp == as_of) {
        let key = (r.well.clone(), r.completion.clone(), r.zone.clone());
        let f = per_completion.entry(key).or_insert_with(|| RateFinal {
            oil_bpd: r.oil_bpd,
            water_bpd: r.water_bpd,
            gas_mmcfd: r.gas_mmcfd,
            position: r.position,
        });
        f.oil_bpd = f.oil_bpd.max(r.oil_bpd);
        f.water_bpd = f.water_bpd.max(r.water_bpd);
        f.gas_mmcfd = f.gas_mmcfd.max(r.gas_mmcfd);
    }

    // Position: first completion in id order represents the group.
    let mut groups: BTreeMap<WellZoneKey, RateFinal> = BTreeMap::new();
    for ((well, _completion, zone), f) in per_completion {
        let acc = groups.entry((well, zone)).or_insert(RateFinal {
            oil_bpd: 0.0,
            water_bpd: 0.0,
            gas_mmcfd: 0.0,
            position: f.position,
        });
        acc.oil_bpd += f.oil_bpd;
        acc.water_bpd += f.water_bpd;
        acc.gas_mmcfd += f.gas_mmcfd;
    }

    groups
        .into_iter()
        .map(|((well, zone), acc)| DailyRate {
            well,
            zone,
            stamp: as_of,
            oil_bpd: acc.oil_bpd,
            water_bpd: acc.water_bpd,
            gas_mmcfd: acc.gas_mmcfd,
            // Plain IEEE quotient: +inf for gas with no oil, NaN for 0/0.
            gor_mcf_bbl: acc.gas_mmcfd * 1000.0 / acc.oil_bpd,
            position: acc.position,
            geo: GEO_PENDING,
        })
        .collect()
}

/// Distinct (well, zone, position) markers in first-appearance order.
fn well_locations(records: &[ProductionRecord]) -> Vec<WellLocation> {
    let mut seen: HashSet<(String, String, u64, u64)> = HashSet::new();
    let mut locations = Vec::new();

    for r in records {
        let key = (
            r.well.clone(),
            r.zone.clone(),
            r.position.easting.to_bits(),
            r.position.northing.to_bits(),
        );
        if seen.insert(key) {
            locations.push(WellLocation {
                well: r.well.clone(),
                zone: r.zone.clone(),
                position: r.position,
                geo: GEO_PENDING,
            });
        }
    }

    locations
}
