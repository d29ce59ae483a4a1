#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the safepath server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types in `safepath_report_models` so the API contract
//! can evolve independently of the store's shapes.

use chrono::{DateTime, Utc};
use safepath_report::NearbyHit;
use safepath_report_models::{IncidentType, StoredReport};
use serde::{Deserialize, Serialize};

/// A report submission as posted by the report form.
///
/// Mirrors the draft field-for-field; the handler converts it into a
/// draft and runs it through the formatter like any other submit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReportSubmission {
    /// Pin latitude.
    pub latitude: f64,
    /// Pin longitude.
    pub longitude: f64,
    /// Selected incident type, if one was picked.
    pub incident_type: Option<IncidentType>,
    /// Severity form value.
    pub severity: u8,
    /// Local date-time from the picker.
    pub incident_timestamp_local: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: String,
}

/// A stored report as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReport {
    /// Store-assigned id.
    pub id: i64,
    /// Incident type name.
    pub incident_type: IncidentType,
    /// Severity level name.
    pub severity: String,
    /// Severity numeric value (1-5).
    pub severity_value: u8,
    /// Badge label the severity renders as ("Low", "Medium", "High").
    pub severity_badge: String,
    /// Pin latitude.
    pub latitude: f64,
    /// Pin longitude.
    pub longitude: f64,
    /// Canonical incident date-time, `YYYY-MM-DD HH:MM:SS`.
    pub incident_datetime: String,
    /// Free-text description.
    pub description: String,
    /// When the report was stored (ISO 8601).
    pub created_at: DateTime<Utc>,
    /// Coarse spatial grouping key.
    pub grid_key: String,
}

impl From<StoredReport> for ApiReport {
    fn from(stored: StoredReport) -> Self {
        Self {
            id: stored.id,
            incident_type: stored.report.incident_type,
            severity: stored.report.severity.to_string(),
            severity_value: stored.report.severity.value(),
            severity_badge: stored.report.severity.badge().label.to_string(),
            latitude: stored.report.latitude,
            longitude: stored.report.longitude,
            incident_datetime: stored.report.incident_timestamp_canonical.clone(),
            description: stored.report.description.clone(),
            created_at: stored.created_at,
            grid_key: stored.grid_key,
        }
    }
}

/// A nearby result: the report plus its distance from the query center.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNearbyReport {
    /// The matching report.
    #[serde(flatten)]
    pub report: ApiReport,
    /// Haversine distance from the query center, in meters.
    pub distance_m: f64,
}

impl From<NearbyHit> for ApiNearbyReport {
    fn from(hit: NearbyHit) -> Self {
        Self {
            report: ApiReport::from(hit.report),
            distance_m: hit.distance_m,
        }
    }
}

/// Query parameters for the nearby endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQueryParams {
    /// Center latitude.
    pub lat: f64,
    /// Center longitude.
    pub lng: f64,
    /// Search radius in meters (default 300, clamped to 50..=5000).
    pub radius_m: Option<f64>,
    /// Only include reports from the last N days (clamped to 1..=365).
    pub days: Option<u32>,
    /// Maximum number of results (default 100, clamped to 1..=500).
    pub limit: Option<usize>,
}

/// Response from `/api/stats/total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatsTotal {
    /// Count of all stored reports.
    pub total_reports: u64,
}

/// Response from `/api/stats/last7`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatsLast7 {
    /// Count of reports stored in the trailing 7 days.
    pub reports_last_7_days: u64,
}

/// Response from `/api/stats/most-common`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatsMostCommon {
    /// The modal incident type, `None` when the store is empty.
    pub most_common_type: Option<IncidentType>,
    /// How many reports carry that type.
    pub count: u64,
}

/// One selectable incident type, for form population.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTypeNode {
    /// Enum name used on the wire.
    pub name: String,
    /// Human-readable label for the selector.
    pub label: String,
    /// Typical severity for this type (1-5).
    pub typical_severity: u8,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
