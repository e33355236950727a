//! Coordinate Projector
//!
//! Converts projected UTM well positions into WGS84 geographic coordinates
//! for every derived dataset, the well-location listing, and the lease
//! boundary ring. The transform is stateless and pure: batch conversion is
//! a plain positions-in, positions-out function with no per-row side
//! effects.

pub mod math;
pub mod transverse_mercator;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use transverse_mercator::{TmParameters, TransverseMercator};

/// WGS84 semi-major axis (metres)
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// UTM central-meridian scale factor
const UTM_K0: f64 = 0.9996;
/// UTM false easting (metres)
const UTM_FALSE_EASTING: f64 = 500_000.0;
/// UTM false northing for the southern hemisphere (metres)
const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Plausible in-zone easting range (metres). Positions outside are almost
/// certainly in the wrong zone or the wrong units.
const EASTING_DOMAIN: (f64, f64) = (100_000.0, 900_000.0);
/// Plausible northing range (metres)
const NORTHING_DOMAIN: (f64, f64) = (0.0, 10_000_000.0);

/// Projection errors
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("UTM zone {0} out of range (1-60)")]
    InvalidZone(u8),

    #[error("latitude {0} out of range [-90, 90]")]
    InvalidLatitude(f64),
}

/// A position on the projected UTM grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPosition {
    /// Easting (metres)
    pub easting: f64,
    /// Northing (metres)
    pub northing: f64,
}

/// A geographic position on the WGS84 ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    /// Latitude (degrees north)
    pub latitude: f64,
    /// Longitude (degrees east)
    pub longitude: f64,
}

/// Central meridian of a UTM zone (degrees east).
#[inline]
fn utm_central_meridian(zone: u8) -> f64 {
    f64::from(zone) * 6.0 - 183.0
}

/// Transverse Mercator parameters for a WGS84 UTM zone.
pub fn wgs84_utm_params(zone: u8, north: bool) -> TmParameters {
    TmParameters {
        semi_major_m: WGS84_A,
        flattening: WGS84_F,
        central_meridian_deg: utm_central_meridian(zone),
        scale_factor: UTM_K0,
        false_easting_m: UTM_FALSE_EASTING,
        false_northing_m: if north { 0.0 } else { UTM_FALSE_NORTHING_SOUTH },
    }
}

/// UTM -> WGS84 projector for one fixed zone, chosen at configuration time.
///
/// Construction precomputes the Krüger series; both directions are then
/// pure and deterministic, so repeated calls at the same position always
/// agree.
#[derive(Debug, Clone)]
pub struct UtmProjector {
    zone: u8,
    north: bool,
    tm: TransverseMercator,
}

impl UtmProjector {
    pub fn new(zone: u8, north: bool) -> Result<Self, GeoError> {
        if !(1..=60).contains(&zone) {
            return Err(GeoError::InvalidZone(zone));
        }
        let tm = TransverseMercator::new(&wgs84_utm_params(zone, north));
        Ok(Self { zone, north, tm })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn is_northern(&self) -> bool {
        self.north
    }

    /// Grid -> geographic for a single position.
    ///
    /// Out-of-domain positions wrap rather than fail; use
    /// [`inverse_batch`](Self::inverse_batch) to get the domain warning.
    pub fn inverse(&self, pos: GridPosition) -> GeoPosition {
        let (lon, lat) = self.tm.inverse(pos.easting, pos.northing);
        GeoPosition {
            latitude: lat,
            longitude: lon,
        }
    }

    /// Geographic -> grid for a single position.
    pub fn forward(&self, geo: GeoPosition) -> Result<GridPosition, GeoError> {
        let (easting, northing) = self.tm.forward(geo.longitude, geo.latitude)?;
        Ok(GridPosition { easting, northing })
    }

    /// Grid -> geographic for a batch of positions.
    ///
    /// Positions outside the plausible UTM domain still convert (the maths
    /// wraps), but the batch logs one aggregated warning so nonsensical
    /// coordinates never pass silently.
    pub fn inverse_batch(&self, positions: &[GridPosition]) -> Vec<GeoPosition> {
        let out_of_domain = positions
            .iter()
            .filter(|p| {
                !(EASTING_DOMAIN.0..=EASTING_DOMAIN.1).contains(&p.easting)
                    || !(NORTHING_DOMAIN.0..=NORTHING_DOMAIN.1).contains(&p.northing)
            })
            .count();
        if out_of_domain > 0 {
            tracing::warn!(
                count = out_of_domain,
                zone = self.zone,
                "positions outside the plausible UTM domain; geographic output may be nonsensical"
            );
        }

        positions.iter().map(|&p| self.inverse(p)).collect()
    }
}
