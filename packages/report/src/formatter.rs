//! Draft validation and canonical timestamp formatting.
//!
//! Validation is pure: it either rejects the draft with a
//! [`ValidationError`] or wraps it in a [`ValidDraft`] without changing
//! it. A persisted [`IncidentReport`] can only be built from a
//! [`ValidDraft`], so an unvalidated draft can never reach the store.

use chrono::NaiveDateTime;
use safepath_geo::Position;
use safepath_report_models::{
    IncidentReport, IncidentReportDraft, IncidentType, Severity, ValidationError,
};

/// `strftime` layout of the canonical storage timestamp.
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Length of a picker value without seconds (`YYYY-MM-DDTHH:MM`).
const PICKER_MINUTES_LEN: usize = 16;

/// A draft that has passed [`validate`], with the parsed type and
/// severity it validated to.
///
/// The wrapped draft is unchanged; this type exists so the persisted
/// constructor can demand proof of validation at compile time.
#[derive(Debug, Clone)]
pub struct ValidDraft {
    draft: IncidentReportDraft,
    incident_type: IncidentType,
    severity: Severity,
}

impl ValidDraft {
    /// The validated draft, exactly as it was submitted.
    #[must_use]
    pub const fn draft(&self) -> &IncidentReportDraft {
        &self.draft
    }
}

/// Validates a draft for submission.
///
/// # Errors
///
/// * [`ValidationError::MissingField`] if the incident type is unset or
///   the local timestamp is empty.
/// * [`ValidationError::OutOfRange`] if the severity is outside 1-5 or
///   the coordinates are outside valid map ranges.
pub fn validate(draft: &IncidentReportDraft) -> Result<ValidDraft, ValidationError> {
    let incident_type = draft
        .incident_type
        .ok_or(ValidationError::MissingField {
            field: "incident_type",
        })?;

    if draft.incident_timestamp_local.is_empty() {
        return Err(ValidationError::MissingField {
            field: "incident_timestamp_local",
        });
    }

    let severity =
        Severity::from_value(draft.severity).map_err(|e| ValidationError::OutOfRange {
            field: "severity",
            value: e.value.to_string(),
        })?;

    let position = Position::new(draft.latitude, draft.longitude);
    if !position.latitude_in_range() {
        return Err(ValidationError::OutOfRange {
            field: "latitude",
            value: draft.latitude.to_string(),
        });
    }
    if !position.longitude_in_range() {
        return Err(ValidationError::OutOfRange {
            field: "longitude",
            value: draft.longitude.to_string(),
        });
    }

    Ok(ValidDraft {
        draft: draft.clone(),
        incident_type,
        severity,
    })
}

/// Normalizes a `datetime-local` picker value into the canonical
/// `YYYY-MM-DD HH:MM:SS` storage form.
///
/// Empty input stays empty. A value without seconds gets `:00` appended,
/// and the `T` separator becomes a single space. This is a pure string
/// transform: input that did not come from a date-time picker passes
/// through unchanged rather than raising an error.
#[must_use]
pub fn to_canonical_timestamp(local: &str) -> String {
    if local.is_empty() {
        return String::new();
    }

    let with_seconds = if local.len() == PICKER_MINUTES_LEN {
        format!("{local}:00")
    } else {
        local.to_string()
    };

    with_seconds.replacen('T', " ", 1)
}

/// Builds the persisted report from a validated draft.
///
/// `now_local` is only consulted when the draft's timestamp canonicalizes
/// to the empty string, in which case the report falls back to the
/// canonical form of "now". Injecting the clock keeps the construction
/// pure: the same draft and `now_local` always produce the same report.
#[must_use]
pub fn to_persisted(valid: &ValidDraft, now_local: NaiveDateTime) -> IncidentReport {
    let draft = &valid.draft;

    let mut canonical = to_canonical_timestamp(&draft.incident_timestamp_local);
    if canonical.is_empty() {
        canonical = now_local.format(CANONICAL_TIMESTAMP_FORMAT).to_string();
    }

    IncidentReport {
        latitude: draft.latitude,
        longitude: draft.longitude,
        incident_type: valid.incident_type,
        severity: valid.severity,
        incident_timestamp_local: draft.incident_timestamp_local.clone(),
        incident_timestamp_canonical: canonical,
        description: draft.description.clone(),
    }
}
