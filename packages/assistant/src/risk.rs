//! Risk labelling for a viewed location.
//!
//! The label buckets the count of reports within a radius over the
//! trailing week: none is Safe, a handful is Caution, more is High Risk.

use chrono::{DateTime, Utc};
use safepath_report::{NearbyQuery, ReportStore, store::MAX_NEARBY_LIMIT};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

/// Recency window the label considers, in days.
pub const RISK_WINDOW_DAYS: u32 = 7;

/// Largest recent-report count still labeled Caution.
const CAUTION_MAX: usize = 5;

/// Meters per statute mile, for the summary line.
const METERS_PER_MILE: f64 = 1_609.34;

/// Safety label for an area.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString,
)]
pub enum RiskLabel {
    /// No recent reports nearby.
    Safe,
    /// A handful of recent reports nearby.
    Caution,
    /// More recent reports than Caution allows.
    HighRisk,
}

impl RiskLabel {
    /// The label as the UI badge shows it.
    #[must_use]
    pub const fn display(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Caution => "Caution",
            Self::HighRisk => "High Risk",
        }
    }
}

/// A computed risk label with the numbers behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// The bucketed label.
    pub label: RiskLabel,
    /// Reports within the radius in the trailing week.
    pub recent_reports: usize,
    /// The radius that was searched, in meters.
    pub radius_m: f64,
}

impl RiskAssessment {
    /// One-line summary in the voice of the assistant, e.g.
    /// "Area labeled Caution - 3 incidents reported in the last 7 days
    /// within 0.5 miles."
    #[must_use]
    pub fn summary(&self) -> String {
        let miles = self.radius_m / METERS_PER_MILE;
        let incidents = match self.recent_reports {
            0 => "no incidents reported".to_string(),
            1 => "1 incident reported".to_string(),
            n => format!("{n} incidents reported"),
        };

        format!(
            "Area labeled {} - {incidents} in the last {RISK_WINDOW_DAYS} days within {miles:.1} miles.",
            self.label.display()
        )
    }
}

/// Assesses the risk label for a location from the shared store.
#[must_use]
pub fn assess(
    store: &ReportStore,
    latitude: f64,
    longitude: f64,
    radius_m: f64,
    now: DateTime<Utc>,
) -> RiskAssessment {
    let query = NearbyQuery {
        radius_m,
        days: Some(RISK_WINDOW_DAYS),
        limit: MAX_NEARBY_LIMIT,
        ..NearbyQuery::around(latitude, longitude)
    };
    let recent_reports = store.nearby(&query, now).len();

    let label = match recent_reports {
        0 => RiskLabel::Safe,
        1..=CAUTION_MAX => RiskLabel::Caution,
        _ => RiskLabel::HighRisk,
    };

    RiskAssessment {
        label,
        recent_reports,
        radius_m,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use safepath_report::formatter;
    use safepath_report_models::{IncidentReportDraft, IncidentType};

    use super::*;

    fn stock(store: &ReportStore, count: usize, now: DateTime<Utc>) {
        for i in 0..count {
            let draft = IncidentReportDraft {
                latitude: 30.6168,
                longitude: -96.3392,
                incident_type: Some(IncidentType::Theft),
                severity: 3,
                incident_timestamp_local: "2025-10-25T14:05".to_string(),
                description: format!("report {i}"),
            };
            let valid = formatter::validate(&draft).unwrap();
            let report = formatter::to_persisted(&valid, now.naive_utc());
            store.append_at(report, now - Duration::hours(1));
        }
    }

    #[test]
    fn empty_area_is_safe() {
        let store = ReportStore::new();
        let assessment = assess(&store, 30.6168, -96.3392, 800.0, Utc::now());

        assert_eq!(assessment.label, RiskLabel::Safe);
        assert_eq!(assessment.recent_reports, 0);
        assert!(assessment.summary().contains("Safe"));
        assert!(assessment.summary().contains("no incidents"));
    }

    #[test]
    fn a_few_reports_mean_caution() {
        let store = ReportStore::new();
        let now = Utc::now();
        stock(&store, 3, now);

        let assessment = assess(&store, 30.6168, -96.3392, 800.0, now);
        assert_eq!(assessment.label, RiskLabel::Caution);
        assert!(assessment.summary().contains("3 incidents reported"));
    }

    #[test]
    fn many_reports_mean_high_risk() {
        let store = ReportStore::new();
        let now = Utc::now();
        stock(&store, 6, now);

        let assessment = assess(&store, 30.6168, -96.3392, 800.0, now);
        assert_eq!(assessment.label, RiskLabel::HighRisk);
        assert_eq!(assessment.label.display(), "High Risk");
    }

    #[test]
    fn old_reports_do_not_count() {
        let store = ReportStore::new();
        let now = Utc::now();

        let draft = IncidentReportDraft {
            latitude: 30.6168,
            longitude: -96.3392,
            incident_type: Some(IncidentType::Theft),
            severity: 3,
            incident_timestamp_local: "2025-09-01T09:00".to_string(),
            description: String::new(),
        };
        let valid = formatter::validate(&draft).unwrap();
        let report = formatter::to_persisted(&valid, now.naive_utc());
        store.append_at(report, now - Duration::days(30));

        let assessment = assess(&store, 30.6168, -96.3392, 800.0, now);
        assert_eq!(assessment.label, RiskLabel::Safe);
    }

    #[test]
    fn summary_mentions_the_radius_in_miles() {
        let assessment = RiskAssessment {
            label: RiskLabel::Caution,
            recent_reports: 3,
            radius_m: 804.67,
        };
        assert!(assessment.summary().contains("0.5 miles"));
    }
}
