//! Append-only in-memory report collection.
//!
//! Stands in for a persistence backend: reports live in a `Vec` behind a
//! `RwLock`, positions are mirrored into an R-tree so nearby queries can
//! prefilter by bounding box before the precise distance check. Ids are
//! sequential and rows are never mutated or removed.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use safepath_geo::{Position, distance_m, index::PositionIndex};
use safepath_report_models::{IncidentReport, IncidentType, StoredReport};

/// Smallest accepted nearby-search radius, in meters.
pub const MIN_RADIUS_M: f64 = 50.0;
/// Largest accepted nearby-search radius, in meters.
pub const MAX_RADIUS_M: f64 = 5_000.0;
/// Default nearby-search radius, in meters.
pub const DEFAULT_RADIUS_M: f64 = 300.0;
/// Largest accepted nearby result count.
pub const MAX_NEARBY_LIMIT: usize = 500;
/// Default nearby result count.
pub const DEFAULT_NEARBY_LIMIT: usize = 100;

/// Cap on bounding-box candidates fed into the precise distance filter.
const PREFILTER_CAP: usize = 1_000;

/// Parameters for a nearby-reports query.
///
/// Out-of-range values are clamped rather than rejected: the radius to
/// [`MIN_RADIUS_M`], [`MAX_RADIUS_M`], the limit to 1..=[`MAX_NEARBY_LIMIT`],
/// and the recency window to 1..=365 days.
#[derive(Debug, Clone, Copy)]
pub struct NearbyQuery {
    /// Search center latitude.
    pub latitude: f64,
    /// Search center longitude.
    pub longitude: f64,
    /// Search radius in meters.
    pub radius_m: f64,
    /// Only include reports created within the last N days.
    pub days: Option<u32>,
    /// Maximum number of results.
    pub limit: usize,
}

impl NearbyQuery {
    /// Creates a query around a center with the default radius and limit.
    #[must_use]
    pub const fn around(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_m: DEFAULT_RADIUS_M,
            days: None,
            limit: DEFAULT_NEARBY_LIMIT,
        }
    }
}

/// A nearby-query result: the stored report plus its distance from the
/// search center, rounded to 0.1 m.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyHit {
    /// The matching report.
    pub report: StoredReport,
    /// Haversine distance from the query center, in meters.
    pub distance_m: f64,
}

struct StoreInner {
    reports: Vec<StoredReport>,
    index: PositionIndex,
}

/// Shared in-memory report collection.
///
/// All methods take `&self`; interior mutability via `RwLock` lets the
/// server share one store across workers behind an `Arc`.
pub struct ReportStore {
    inner: RwLock<StoreInner>,
}

impl ReportStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                reports: Vec::new(),
                index: PositionIndex::new(),
            }),
        }
    }

    /// Appends a persisted report with the current wall-clock time.
    pub fn append(&self, report: IncidentReport) -> StoredReport {
        self.append_at(report, Utc::now())
    }

    /// Appends a persisted report with an explicit insertion time.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn append_at(&self, report: IncidentReport, created_at: DateTime<Utc>) -> StoredReport {
        let mut inner = self.inner.write().expect("report store lock poisoned");

        let id = i64::try_from(inner.reports.len()).unwrap_or(i64::MAX - 1) + 1;
        let position = Position::new(report.latitude, report.longitude);
        let stored = StoredReport {
            id,
            grid_key: grid_key(report.latitude, report.longitude),
            report,
            created_at,
        };

        inner.index.insert(id, position);
        inner.reports.push(stored.clone());

        stored
    }

    /// All stored reports in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<StoredReport> {
        self.inner
            .read()
            .expect("report store lock poisoned")
            .reports
            .clone()
    }

    /// Total number of stored reports.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.inner.read().expect("report store lock poisoned").reports.len() as u64
    }

    /// Number of reports created at or after `cutoff`.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn count_since(&self, cutoff: DateTime<Utc>) -> u64 {
        self.inner
            .read()
            .expect("report store lock poisoned")
            .reports
            .iter()
            .filter(|stored| stored.created_at >= cutoff)
            .count() as u64
    }

    /// The most frequently reported incident type and its count, or
    /// `None` when the store is empty. Ties resolve to the type that
    /// sorts first.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn most_common_type(&self) -> Option<(IncidentType, u64)> {
        let inner = self.inner.read().expect("report store lock poisoned");

        let mut counts: BTreeMap<IncidentType, u64> = BTreeMap::new();
        for stored in &inner.reports {
            *counts.entry(stored.report.incident_type).or_insert(0) += 1;
        }

        let mut best: Option<(IncidentType, u64)> = None;
        for (incident_type, count) in counts {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((incident_type, count)),
            }
        }
        best
    }

    /// Reports within `query.radius_m` of the query center, sorted by
    /// distance ascending and capped at `query.limit`.
    ///
    /// A bounding-box prefilter against the R-tree keeps the precise
    /// haversine pass cheap; prefilter candidates are capped at an
    /// internal bound to keep worst-case latency flat.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn nearby(&self, query: &NearbyQuery, now: DateTime<Utc>) -> Vec<NearbyHit> {
        let radius_m = query.radius_m.clamp(MIN_RADIUS_M, MAX_RADIUS_M);
        let limit = query.limit.clamp(1, MAX_NEARBY_LIMIT);
        let cutoff = query
            .days
            .map(|days| now - Duration::days(i64::from(days.clamp(1, 365))));
        let center = Position::new(query.latitude, query.longitude);

        let inner = self.inner.read().expect("report store lock poisoned");

        let mut candidates = inner.index.candidates_within(center, radius_m);
        candidates.truncate(PREFILTER_CAP);

        let mut hits: Vec<NearbyHit> = Vec::new();
        for id in candidates {
            let Ok(idx) = usize::try_from(id - 1) else {
                continue;
            };
            let Some(stored) = inner.reports.get(idx) else {
                continue;
            };

            if let Some(cutoff) = cutoff {
                if stored.created_at < cutoff {
                    continue;
                }
            }

            let position = Position::new(stored.report.latitude, stored.report.longitude);
            let distance = distance_m(center, position);
            if distance <= radius_m {
                hits.push(NearbyHit {
                    report: stored.clone(),
                    distance_m: (distance * 10.0).round() / 10.0,
                });
            }
        }

        hits.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        hits.truncate(limit);
        hits
    }
}

impl Default for ReportStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarse spatial grouping key: latitude and longitude rounded to three
/// decimal places (roughly a 110 m cell).
#[must_use]
pub fn grid_key(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.3}:{longitude:.3}")
}

#[cfg(test)]
mod tests {
    use safepath_report_models::{IncidentReportDraft, Severity};

    use super::*;
    use crate::formatter;

    fn report_at(latitude: f64, longitude: f64, incident_type: IncidentType) -> IncidentReport {
        let draft = IncidentReportDraft {
            latitude,
            longitude,
            incident_type: Some(incident_type),
            severity: 3,
            incident_timestamp_local: "2025-10-25T14:05".to_string(),
            description: String::new(),
        };
        let valid = formatter::validate(&draft).unwrap();
        formatter::to_persisted(&valid, Utc::now().naive_utc())
    }

    #[test]
    fn append_assigns_sequential_ids_and_grid_keys() {
        let store = ReportStore::new();
        let first = store.append(report_at(30.616833, -96.339222, IncidentType::Theft));
        let second = store.append(report_at(30.611904, -96.341012, IncidentType::Assault));

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.grid_key, "30.617:-96.339");
        assert_eq!(store.total(), 2);
    }

    #[test]
    fn nearby_sorts_by_distance_and_respects_radius() {
        let store = ReportStore::new();
        let center = Position::new(30.6168, -96.3392);
        store.append(report_at(30.6168, -96.3392, IncidentType::Theft)); // at center
        store.append(report_at(30.6175, -96.3407, IncidentType::Vandalism)); // ~170m
        store.append(report_at(30.7000, -96.5000, IncidentType::Other)); // ~18km

        let query = NearbyQuery {
            radius_m: 1_000.0,
            ..NearbyQuery::around(center.latitude, center.longitude)
        };
        let hits = store.nearby(&query, Utc::now());

        assert_eq!(hits.len(), 2);
        assert!(hits[0].distance_m <= hits[1].distance_m);
        assert_eq!(hits[0].report.report.incident_type, IncidentType::Theft);
        assert!(hits.iter().all(|hit| hit.distance_m <= 1_000.0));
    }

    #[test]
    fn nearby_days_filter_excludes_old_reports() {
        let store = ReportStore::new();
        let now = Utc::now();
        store.append_at(
            report_at(30.6168, -96.3392, IncidentType::Theft),
            now - Duration::days(30),
        );
        store.append_at(
            report_at(30.6168, -96.3392, IncidentType::Assault),
            now - Duration::days(2),
        );

        let query = NearbyQuery {
            days: Some(7),
            ..NearbyQuery::around(30.6168, -96.3392)
        };
        let hits = store.nearby(&query, now);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].report.report.incident_type, IncidentType::Assault);
    }

    #[test]
    fn nearby_clamps_limit() {
        let store = ReportStore::new();
        for _ in 0..5 {
            store.append(report_at(30.6168, -96.3392, IncidentType::Theft));
        }

        let query = NearbyQuery {
            limit: 0,
            ..NearbyQuery::around(30.6168, -96.3392)
        };
        assert_eq!(store.nearby(&query, Utc::now()).len(), 1);
    }

    #[test]
    fn count_since_filters_by_creation_time() {
        let store = ReportStore::new();
        let now = Utc::now();
        store.append_at(
            report_at(0.0, 0.0, IncidentType::Theft),
            now - Duration::days(10),
        );
        store.append_at(
            report_at(0.0, 0.0, IncidentType::Theft),
            now - Duration::days(1),
        );

        assert_eq!(store.count_since(now - Duration::days(7)), 1);
        assert_eq!(store.total(), 2);
    }

    #[test]
    fn most_common_type_is_modal() {
        let store = ReportStore::new();
        assert_eq!(store.most_common_type(), None);

        store.append(report_at(0.0, 0.0, IncidentType::Theft));
        store.append(report_at(0.0, 0.0, IncidentType::Theft));
        store.append(report_at(0.0, 0.0, IncidentType::Vandalism));

        assert_eq!(store.most_common_type(), Some((IncidentType::Theft, 2)));
    }

    #[test]
    fn severity_survives_the_store() {
        let store = ReportStore::new();
        let mut report = report_at(0.0, 0.0, IncidentType::Assault);
        report.severity = Severity::High;
        let stored = store.append(report);
        assert_eq!(stored.report.severity.value(), 4);
    }
}
