#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Coordinate types and spatial helpers for the report map.
//!
//! Provides the WGS84 [`Position`] type with range checks, haversine
//! distance, degree padding for radius prefilters, an R-tree point index
//! for nearby lookups, and the one-shot [`locate::LocationSource`]
//! abstraction for "Locate Me".

pub mod index;
pub mod locate;

use geo::{Distance as _, Haversine, Point};
use serde::{Deserialize, Serialize};

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_000.0;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees, valid range -90..=90.
    pub latitude: f64,
    /// Longitude in degrees, valid range -180..=180.
    pub longitude: f64,
}

impl Position {
    /// Creates a position without range checking.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether the latitude falls inside the valid -90..=90 range.
    #[must_use]
    pub fn latitude_in_range(self) -> bool {
        (-90.0..=90.0).contains(&self.latitude)
    }

    /// Whether the longitude falls inside the valid -180..=180 range.
    #[must_use]
    pub fn longitude_in_range(self) -> bool {
        (-180.0..=180.0).contains(&self.longitude)
    }

    /// Whether both components are valid map coordinates.
    #[must_use]
    pub fn in_range(self) -> bool {
        self.latitude_in_range() && self.longitude_in_range()
    }
}

/// Haversine distance between two positions, in meters.
#[must_use]
pub fn distance_m(a: Position, b: Position) -> f64 {
    Haversine.distance(
        Point::new(a.longitude, a.latitude),
        Point::new(b.longitude, b.latitude),
    )
}

/// Degree padding for a `radius_m` search around `latitude`, as
/// `(lat_pad, lng_pad)`.
///
/// One degree of longitude shrinks with the cosine of the latitude; the
/// cosine is floored at 0.1 so the padding stays finite near the poles.
#[must_use]
pub fn radius_padding(latitude: f64, radius_m: f64) -> (f64, f64) {
    let lat_pad = radius_m / METERS_PER_DEGREE;
    let lng_pad = radius_m / (METERS_PER_DEGREE * latitude.to_radians().cos().max(0.1));
    (lat_pad, lng_pad)
}
