#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident report domain types.
//!
//! This crate defines the incident type taxonomy, the 1-5 severity scale,
//! the draft/persisted report pair, and the validation error taxonomy shared
//! by the formatter, the session controller, and the API server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Default severity pre-filled into a new draft (middle of the 1-5 scale).
pub const DEFAULT_SEVERITY: u8 = 3;

/// The reportable incident types offered by the report form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum IncidentType {
    /// Theft of property (bikes, backpacks, vehicle break-ins)
    Theft,
    /// Physical altercations, harassment, threats
    Assault,
    /// Property damage (graffiti, broken glass)
    Vandalism,
    /// Loitering, prowling, unattended items
    SuspiciousActivity,
    /// Anything that doesn't fit the other types
    Other,
}

impl IncidentType {
    /// Human-readable label shown in the report form's type selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Theft => "Theft",
            Self::Assault => "Assault",
            Self::Vandalism => "Vandalism",
            Self::SuspiciousActivity => "Suspicious Activity",
            Self::Other => "Other",
        }
    }

    /// Typical severity for this incident type, used to pre-populate the
    /// type selector with a hint. The form default remains
    /// [`DEFAULT_SEVERITY`] until the user moves the slider.
    #[must_use]
    pub const fn typical_severity(self) -> Severity {
        match self {
            Self::Assault => Severity::High,
            Self::Theft => Severity::Medium,
            Self::Vandalism | Self::SuspiciousActivity | Self::Other => Severity::Low,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Theft,
            Self::Assault,
            Self::Vandalism,
            Self::SuspiciousActivity,
            Self::Other,
        ]
    }
}

/// Severity of a reported incident, from 1 (low) to 5 (high).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Severity {
    /// Level 1: no realistic danger to others
    Negligible = 1,
    /// Level 2: minor incidents
    Low = 2,
    /// Level 3: the form's default
    Medium = 3,
    /// Level 4: serious incidents
    High = 4,
    /// Level 5: immediate danger
    Critical = 5,
}

impl Severity {
    /// Returns the numeric value of this severity level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a severity level from a numeric form value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-5.
    pub const fn from_value(value: u8) -> Result<Self, InvalidSeverity> {
        match value {
            1 => Ok(Self::Negligible),
            2 => Ok(Self::Low),
            3 => Ok(Self::Medium),
            4 => Ok(Self::High),
            5 => Ok(Self::Critical),
            _ => Err(InvalidSeverity { value }),
        }
    }

    /// The badge this severity renders as in report lists.
    ///
    /// Levels 1-2 collapse to a green "Low" badge, 3 to a yellow "Medium"
    /// badge, and 4-5 to a red "High" badge.
    #[must_use]
    pub const fn badge(self) -> SeverityBadge {
        match self {
            Self::Negligible | Self::Low => SeverityBadge {
                label: "Low",
                tone: BadgeTone::Green,
            },
            Self::Medium => SeverityBadge {
                label: "Medium",
                tone: BadgeTone::Yellow,
            },
            Self::High | Self::Critical => SeverityBadge {
                label: "High",
                tone: BadgeTone::Red,
            },
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Medium
    }
}

/// Error returned when a form value cannot be mapped onto the 1-5
/// severity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid severity value {value}: expected 1-5")]
pub struct InvalidSeverity {
    /// The invalid severity value that was provided.
    pub value: u8,
}

/// How a severity level is presented in report lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityBadge {
    /// Badge text ("Low", "Medium", "High").
    pub label: &'static str,
    /// Badge color.
    pub tone: BadgeTone,
}

/// Badge color for severity presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum BadgeTone {
    Green,
    Yellow,
    Red,
}

/// Validation failures for a draft report at submit time.
///
/// Nothing here is fatal or retried: a failed submission leaves the draft
/// open for correction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was left blank.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the blank field.
        field: &'static str,
    },

    /// A field value falls outside its allowed bounds.
    #[error("{field} out of range: {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value, rendered for the error message.
        value: String,
    },
}

/// An in-progress, unvalidated incident report tied to a single map
/// interaction.
///
/// Created when the user drops a pin (map click or locate-me), mutated
/// field-by-field as the form is edited, and either discarded on cancel or
/// converted exactly once into an [`IncidentReport`] on submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentReportDraft {
    /// Pin latitude (WGS84).
    pub latitude: f64,
    /// Pin longitude (WGS84).
    pub longitude: f64,
    /// Selected incident type; `None` until the user picks one.
    pub incident_type: Option<IncidentType>,
    /// Raw severity value from the form control.
    pub severity: u8,
    /// Local date-time from the `datetime-local` picker
    /// (`YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS`).
    pub incident_timestamp_local: String,
    /// Optional free-text description; may be empty.
    pub description: String,
}

impl IncidentReportDraft {
    /// Creates the pre-filled draft for a freshly dropped pin: the pin's
    /// coordinates, the default severity, and the current local time in
    /// picker format. Type and description start empty.
    #[must_use]
    pub fn pinned(latitude: f64, longitude: f64, now_local: chrono::NaiveDateTime) -> Self {
        Self {
            latitude,
            longitude,
            incident_type: None,
            severity: DEFAULT_SEVERITY,
            incident_timestamp_local: now_local.format("%Y-%m-%dT%H:%M").to_string(),
            description: String::new(),
        }
    }
}

/// A validated, canonically-formatted incident report.
///
/// Only constructed by the formatter from a draft that passed validation;
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentReport {
    /// Pin latitude (WGS84).
    pub latitude: f64,
    /// Pin longitude (WGS84).
    pub longitude: f64,
    /// Selected incident type.
    pub incident_type: IncidentType,
    /// Severity on the 1-5 scale.
    pub severity: Severity,
    /// The local date-time exactly as the picker produced it.
    pub incident_timestamp_local: String,
    /// Storage-ready `YYYY-MM-DD HH:MM:SS` form of the local date-time.
    pub incident_timestamp_canonical: String,
    /// Free-text description; may be empty.
    pub description: String,
}

impl IncidentReport {
    /// The flat record an eventual persistence backend would accept.
    #[must_use]
    pub fn record(&self) -> ReportRecord {
        ReportRecord {
            latitude: self.latitude,
            longitude: self.longitude,
            crime_type: self.incident_type.to_string(),
            severity: self.severity.value(),
            incident_datetime: self.incident_timestamp_canonical.clone(),
            description: self.description.clone(),
        }
    }
}

/// Flat report record with snake_case keys.
///
/// This is the boundary shape written to the log sink on submit; no request
/// carrying it is actually issued anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// One of the enumerated incident types, by name.
    pub crime_type: String,
    /// Severity 1-5.
    pub severity: u8,
    /// `YYYY-MM-DD HH:MM:SS`.
    pub incident_datetime: String,
    pub description: String,
}

/// A report as held in the in-memory store: the persisted report plus the
/// store-assigned id, insertion timestamp, and coarse grid key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    /// Store-assigned sequential id.
    pub id: i64,
    /// The persisted report.
    pub report: IncidentReport,
    /// When the report was appended to the store.
    pub created_at: DateTime<Utc>,
    /// Coarse spatial grouping key, `"{lat:.3}:{lng:.3}"`.
    pub grid_key: String,
}

impl StoredReport {
    /// `created_at` rendered the way the history tab shows dates,
    /// e.g. "Oct 24, 2025".
    #[must_use]
    pub fn history_date(&self) -> String {
        self.created_at.format("%b %d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone as _};

    use super::*;

    #[test]
    fn severity_from_value_roundtrip() {
        for v in 1..=5u8 {
            let severity = Severity::from_value(v).unwrap();
            assert_eq!(severity.value(), v);
        }
        assert!(Severity::from_value(0).is_err());
        assert!(Severity::from_value(6).is_err());
    }

    #[test]
    fn badge_collapses_five_levels_to_three() {
        assert_eq!(Severity::Negligible.badge().label, "Low");
        assert_eq!(Severity::Low.badge().tone, BadgeTone::Green);
        assert_eq!(Severity::Medium.badge().label, "Medium");
        assert_eq!(Severity::Medium.badge().tone, BadgeTone::Yellow);
        assert_eq!(Severity::High.badge().label, "High");
        assert_eq!(Severity::Critical.badge().tone, BadgeTone::Red);
    }

    #[test]
    fn incident_type_display_parses_back() {
        for ty in IncidentType::all() {
            let parsed: IncidentType = ty.to_string().parse().unwrap();
            assert_eq!(parsed, *ty);
        }
        assert!("Burglary".parse::<IncidentType>().is_err());
    }

    #[test]
    fn pinned_draft_prefill() {
        let now = NaiveDate::from_ymd_opt(2025, 10, 25)
            .unwrap()
            .and_hms_opt(14, 5, 33)
            .unwrap();
        let draft = IncidentReportDraft::pinned(37.7749, -122.4194, now);

        assert_eq!(draft.severity, DEFAULT_SEVERITY);
        assert_eq!(draft.incident_type, None);
        assert_eq!(draft.incident_timestamp_local, "2025-10-25T14:05");
        assert!(draft.description.is_empty());
    }

    #[test]
    fn history_date_format() {
        let stored = StoredReport {
            id: 1,
            report: IncidentReport {
                latitude: 0.0,
                longitude: 0.0,
                incident_type: IncidentType::Theft,
                severity: Severity::Medium,
                incident_timestamp_local: "2025-10-24T09:00".to_string(),
                incident_timestamp_canonical: "2025-10-24 09:00:00".to_string(),
                description: String::new(),
            },
            created_at: Utc.with_ymd_and_hms(2025, 10, 24, 9, 0, 0).unwrap(),
            grid_key: "0.000:0.000".to_string(),
        };
        assert_eq!(stored.history_date(), "Oct 24, 2025");
    }
}
