//! Coarse regional magnetic declination estimate
//!
//! This is not a geomagnetic model. The world is split into a handful of
//! named bounding boxes, each carrying a base offset and a linear drift per
//! year relative to an epoch. Points outside every box get no correction.

use crate::core::{GeoPoint, DECLINATION_EPOCH_YEAR};
use serde::{Deserialize, Serialize};

/// Inclusive latitude/longitude rectangle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub const fn new(min_latitude: f64, max_latitude: f64, min_longitude: f64, max_longitude: f64) -> Self {
        Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude())
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude())
    }

    /// Bounds are ordered and inside the valid coordinate ranges
    pub fn is_well_formed(&self) -> bool {
        self.min_latitude <= self.max_latitude
            && self.min_longitude <= self.max_longitude
            && self.min_latitude >= -90.0
            && self.max_latitude <= 90.0
            && self.min_longitude >= -180.0
            && self.max_longitude <= 180.0
    }
}

/// One row of the declination table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclinationRegion {
    pub name: String,
    pub bounds: BoundingBox,
    /// Declination at the epoch year (degrees, east positive)
    pub base_offset_deg: f64,
    /// Change per year after the epoch (degrees)
    pub drift_deg_per_year: f64,
}

impl DeclinationRegion {
    pub fn new(name: &str, bounds: BoundingBox, base_offset_deg: f64, drift_deg_per_year: f64) -> Self {
        Self {
            name: name.to_string(),
            bounds,
            base_offset_deg,
            drift_deg_per_year,
        }
    }

    fn declination_at(&self, year: i32, epoch_year: i32) -> f64 {
        self.base_offset_deg + self.drift_deg_per_year * f64::from(year - epoch_year)
    }
}

/// Ordered region list; the first region containing a point wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclinationTable {
    pub epoch_year: i32,
    pub regions: Vec<DeclinationRegion>,
}

impl Default for DeclinationTable {
    fn default() -> Self {
        Self {
            epoch_year: DECLINATION_EPOCH_YEAR,
            regions: vec![
                DeclinationRegion::new(
                    "Southeast Asia",
                    BoundingBox::new(-10.0, 10.0, 90.0, 150.0),
                    0.5,
                    0.08,
                ),
                DeclinationRegion::new(
                    "Middle East",
                    BoundingBox::new(15.0, 30.0, 30.0, 50.0),
                    2.5,
                    0.12,
                ),
            ],
        }
    }
}

impl DeclinationTable {
    /// Table with no regions: every lookup returns zero
    pub fn empty() -> Self {
        Self {
            epoch_year: DECLINATION_EPOCH_YEAR,
            regions: Vec::new(),
        }
    }

    pub fn region_for(&self, point: &GeoPoint) -> Option<&DeclinationRegion> {
        self.regions.iter().find(|region| region.bounds.contains(point))
    }

    /// Declination in degrees to add to a magnetic heading at `point` in `year`
    pub fn declination(&self, point: &GeoPoint, year: i32) -> f64 {
        self.region_for(point)
            .map(|region| region.declination_at(year, self.epoch_year))
            .unwrap_or(0.0)
    }
}

/// Declination from the built-in regional table
pub fn declination(point: GeoPoint, year: i32) -> f64 {
    DeclinationTable::default().declination(&point, year)
}
