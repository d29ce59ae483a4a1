//! One-shot device location requests.
//!
//! "Locate Me" asks a [`LocationSource`] for the current position once,
//! with a bounded timeout and a high-accuracy hint. Denial, failure, and
//! timeout all resolve to `None` with a debug-level log line only; there
//! is no retry and no user-facing error.

use std::time::Duration;

use async_trait::async_trait;

use crate::Position;

/// How long a location request may take before it is abandoned.
pub const LOCATE_TIMEOUT: Duration = Duration::from_secs(8);

/// Options for a one-shot location request.
#[derive(Debug, Clone, Copy)]
pub struct LocateOptions {
    /// Ask the source for its most accurate fix.
    pub high_accuracy: bool,
    /// Abandon the request after this long.
    pub timeout: Duration,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: LOCATE_TIMEOUT,
        }
    }
}

/// Something that can report the device's current position.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Returns the current position, or `None` if the source cannot or
    /// will not provide one.
    async fn current_position(&self, high_accuracy: bool) -> Option<Position>;
}

/// Requests the current position once, applying the options' timeout.
///
/// Returns `None` on denial, failure, out-of-range coordinates, or
/// timeout.
pub async fn locate(source: &dyn LocationSource, options: LocateOptions) -> Option<Position> {
    let request = source.current_position(options.high_accuracy);

    match tokio::time::timeout(options.timeout, request).await {
        Ok(Some(position)) if position.in_range() => Some(position),
        Ok(Some(position)) => {
            log::debug!(
                "location source returned out-of-range position ({}, {})",
                position.latitude,
                position.longitude
            );
            None
        }
        Ok(None) => {
            log::debug!("location request denied or unavailable");
            None
        }
        Err(_) => {
            log::debug!("location request timed out");
            None
        }
    }
}

/// A source that always reports the same position. Used by tests and the
/// scripted demo.
pub struct FixedLocationSource(pub Position);

#[async_trait]
impl LocationSource for FixedLocationSource {
    async fn current_position(&self, _high_accuracy: bool) -> Option<Position> {
        Some(self.0)
    }
}

/// Reads the position from `SAFEPATH_LAT` / `SAFEPATH_LNG` environment
/// variables, for headless deployments without a positioning device.
pub struct EnvLocationSource;

#[async_trait]
impl LocationSource for EnvLocationSource {
    async fn current_position(&self, _high_accuracy: bool) -> Option<Position> {
        let latitude: f64 = std::env::var("SAFEPATH_LAT").ok()?.trim().parse().ok()?;
        let longitude: f64 = std::env::var("SAFEPATH_LNG").ok()?.trim().parse().ok()?;
        Some(Position::new(latitude, longitude))
    }
}
