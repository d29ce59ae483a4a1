#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Per-session report controller.
//!
//! One [`ReportSession`] owns the report-in-progress for one UI session
//! and walks it through the Empty/Drafting state machine: a dropped pin
//! opens a pre-filled draft, form edits mutate it field by field, cancel
//! discards it, and submit validates it, appends the persisted report to
//! the shared store, writes the flat record to the log sink, and clears
//! the draft. A failed submit surfaces the error and leaves the draft
//! untouched. Sessions never share drafts; only the store is shared.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use safepath_geo::Position;
use safepath_report::{ReportStore, formatter};
use safepath_report_models::{
    IncidentReportDraft, IncidentType, StoredReport, ValidationError,
};

/// The report-in-progress for one session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No pin dropped; nothing being drafted.
    Empty,
    /// A draft is open for the pinned location.
    Drafting(IncidentReportDraft),
}

/// A single form edit applied to the open draft.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    /// The type selector changed.
    IncidentType(IncidentType),
    /// The severity slider moved.
    Severity(u8),
    /// The date-time picker changed.
    Timestamp(String),
    /// The description textarea changed.
    Description(String),
}

/// Owns one session's draft state and applies the state machine.
pub struct ReportSession {
    state: SessionState,
    store: Arc<ReportStore>,
}

impl ReportSession {
    /// Creates a session in the Empty state over a shared store.
    #[must_use]
    pub const fn new(store: Arc<ReportStore>) -> Self {
        Self {
            state: SessionState::Empty,
            store,
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The open draft, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&IncidentReportDraft> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::Drafting(draft) => Some(draft),
        }
    }

    /// Drops a pin at `position`, opening a pre-filled draft.
    ///
    /// Dropping a pin while a draft is already open replaces the draft,
    /// matching the map behavior of clicking elsewhere.
    pub fn drop_pin(&mut self, position: Position) {
        self.drop_pin_at(position, Local::now().naive_local());
    }

    /// Drops a pin with an explicit "now" for the pre-filled local time.
    pub fn drop_pin_at(&mut self, position: Position, now_local: NaiveDateTime) {
        self.state = SessionState::Drafting(IncidentReportDraft::pinned(
            position.latitude,
            position.longitude,
            now_local,
        ));
    }

    /// Applies a single form edit to the open draft.
    ///
    /// Edits arriving while no draft is open are dropped; there is no
    /// form on screen to be edited.
    pub fn edit(&mut self, edit: FieldEdit) {
        let SessionState::Drafting(draft) = &mut self.state else {
            log::debug!("ignoring form edit with no open draft: {edit:?}");
            return;
        };

        match edit {
            FieldEdit::IncidentType(incident_type) => {
                draft.incident_type = Some(incident_type);
            }
            FieldEdit::Severity(severity) => draft.severity = severity,
            FieldEdit::Timestamp(timestamp) => draft.incident_timestamp_local = timestamp,
            FieldEdit::Description(description) => draft.description = description,
        }
    }

    /// Cancels the open draft, returning to Empty without appending
    /// anything. A no-op when nothing is open.
    pub fn cancel(&mut self) {
        self.state = SessionState::Empty;
    }

    /// Submits the open draft.
    ///
    /// On success the persisted report is appended to the store, its flat
    /// record goes to the log sink, the draft is cleared, and the stored
    /// report is returned. `Ok(None)` means there was no draft to submit.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] when the draft fails validation;
    /// the draft stays open and unchanged for correction.
    pub fn submit(&mut self) -> Result<Option<StoredReport>, ValidationError> {
        self.submit_at(Local::now().naive_local())
    }

    /// Submits with an explicit "now" for the empty-timestamp fallback.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] when the draft fails validation.
    pub fn submit_at(
        &mut self,
        now_local: NaiveDateTime,
    ) -> Result<Option<StoredReport>, ValidationError> {
        let SessionState::Drafting(draft) = &self.state else {
            return Ok(None);
        };

        let valid = formatter::validate(draft)?;
        let report = formatter::to_persisted(&valid, now_local);
        let stored = self.store.append(report);

        match serde_json::to_string(&stored.report.record()) {
            Ok(json) => log::info!("Saved report: {json}"),
            Err(e) => log::warn!("Saved report {} but could not render record: {e}", stored.id),
        }

        self.state = SessionState::Empty;
        Ok(Some(stored))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use safepath_report_models::DEFAULT_SEVERITY;

    use super::*;

    fn pin_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 25)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    fn session() -> ReportSession {
        ReportSession::new(Arc::new(ReportStore::new()))
    }

    #[test]
    fn starts_empty() {
        let session = session();
        assert_eq!(session.state(), &SessionState::Empty);
        assert!(session.draft().is_none());
    }

    #[test]
    fn dropped_pin_opens_prefilled_draft() {
        let mut session = session();
        session.drop_pin_at(Position::new(37.7749, -122.4194), pin_time());

        let draft = session.draft().unwrap();
        assert!((draft.latitude - 37.7749).abs() < 1e-9);
        assert_eq!(draft.severity, DEFAULT_SEVERITY);
        assert_eq!(draft.incident_timestamp_local, "2025-10-25T14:05");
        assert_eq!(draft.incident_type, None);
    }

    #[test]
    fn edits_mutate_the_open_draft() {
        let mut session = session();
        session.drop_pin_at(Position::new(0.0, 0.0), pin_time());

        session.edit(FieldEdit::IncidentType(IncidentType::Theft));
        session.edit(FieldEdit::Severity(4));
        session.edit(FieldEdit::Description("Saw it happen".to_string()));

        let draft = session.draft().unwrap();
        assert_eq!(draft.incident_type, Some(IncidentType::Theft));
        assert_eq!(draft.severity, 4);
        assert_eq!(draft.description, "Saw it happen");
    }

    #[test]
    fn edits_without_a_draft_are_dropped() {
        let mut session = session();
        session.edit(FieldEdit::Severity(5));
        assert_eq!(session.state(), &SessionState::Empty);
    }

    #[test]
    fn cancel_discards_the_draft_and_appends_nothing() {
        let store = Arc::new(ReportStore::new());
        let mut session = ReportSession::new(Arc::clone(&store));

        session.drop_pin_at(Position::new(10.0, 20.0), pin_time());
        session.edit(FieldEdit::IncidentType(IncidentType::Vandalism));
        session.cancel();

        assert_eq!(session.state(), &SessionState::Empty);
        assert_eq!(store.total(), 0);
    }

    #[test]
    fn failed_submit_retains_the_draft_unchanged() {
        let store = Arc::new(ReportStore::new());
        let mut session = ReportSession::new(Arc::clone(&store));

        session.drop_pin_at(Position::new(10.0, 20.0), pin_time());
        let before = session.draft().unwrap().clone();

        let result = session.submit_at(pin_time());
        assert!(matches!(
            result,
            Err(ValidationError::MissingField {
                field: "incident_type"
            })
        ));
        assert_eq!(session.draft().unwrap(), &before);
        assert_eq!(store.total(), 0);
    }

    #[test]
    fn submit_without_a_draft_is_a_no_op() {
        let mut session = session();
        assert_eq!(session.submit_at(pin_time()), Ok(None));
    }

    #[test]
    fn successful_submit_appends_clears_and_formats() {
        let store = Arc::new(ReportStore::new());
        let mut session = ReportSession::new(Arc::clone(&store));

        // Pin at the map-click coordinates; leave the pre-filled time.
        session.drop_pin_at(Position::new(37.7749, -122.4194), pin_time());
        session.edit(FieldEdit::IncidentType(IncidentType::Theft));
        session.edit(FieldEdit::Severity(4));

        let stored = session.submit_at(pin_time()).unwrap().unwrap();

        assert_eq!(session.state(), &SessionState::Empty);
        assert_eq!(store.total(), 1);

        let record = stored.report.record();
        assert_eq!(record.crime_type, "Theft");
        assert_eq!(record.severity, 4);
        assert!((record.latitude - 37.7749).abs() < 1e-9);
        assert!((record.longitude + 122.4194).abs() < 1e-9);
        assert_eq!(record.incident_datetime, "2025-10-25 14:05:00");
    }

    #[test]
    fn repinning_replaces_the_draft() {
        let mut session = session();
        session.drop_pin_at(Position::new(1.0, 1.0), pin_time());
        session.edit(FieldEdit::Description("first".to_string()));
        session.drop_pin_at(Position::new(2.0, 2.0), pin_time());

        let draft = session.draft().unwrap();
        assert!((draft.latitude - 2.0).abs() < 1e-9);
        assert!(draft.description.is_empty());
    }
}
