//! Deterministic demo dataset.
//!
//! Seeds the store with a week of campus-area incidents so the demo
//! session, stats, and nearby queries have something to chew on. Every
//! derived value (type, severity, time offset) is a pure function of the
//! entry, so repeated seeding from the same `now` produces identical
//! stores.

use chrono::{DateTime, Duration, Utc};
use safepath_report_models::{IncidentReportDraft, IncidentType, ValidationError};

use crate::formatter;
use crate::store::ReportStore;

struct SeedIncident {
    latitude: f64,
    longitude: f64,
    place: &'static str,
    note: &'static str,
}

const SEED_INCIDENTS: &[SeedIncident] = &[
    SeedIncident {
        latitude: 30.616833,
        longitude: -96.339222,
        place: "Evans Library",
        note: "Bike stolen from the racks by the library entrance.",
    },
    SeedIncident {
        latitude: 30.611904,
        longitude: -96.341012,
        place: "Memorial Student Center",
        note: "Loud argument outside the fountain.",
    },
    SeedIncident {
        latitude: 30.621263,
        longitude: -96.340875,
        place: "Zachry Engineering Complex",
        note: "Backpack taken from a study lounge.",
    },
    SeedIncident {
        latitude: 30.620669,
        longitude: -96.343843,
        place: "Northgate District",
        note: "Group loitering near the entrance around midnight.",
    },
    SeedIncident {
        latitude: 30.624112,
        longitude: -96.336946,
        place: "Lot 50 Parking",
        note: "Suspicious vehicle slowly circling the lot.",
    },
    SeedIncident {
        latitude: 30.6119,
        longitude: -96.3441,
        place: "Wellborn Road Walkway",
        note: "Harassment reported by someone walking the path.",
    },
    SeedIncident {
        latitude: 30.6175,
        longitude: -96.3407,
        place: "Hullabaloo Hall",
        note: "Broken glass found at the dorm entrance.",
    },
    SeedIncident {
        latitude: 30.6101,
        longitude: -96.3401,
        place: "Kyle Field",
        note: "Attempted wallet snatch after the game let out.",
    },
    SeedIncident {
        latitude: 30.6162,
        longitude: -96.3384,
        place: "University Drive Tunnel",
        note: "Fresh graffiti inside the pedestrian tunnel.",
    },
    SeedIncident {
        latitude: 30.6130,
        longitude: -96.3419,
        place: "MSC Bus Stop",
        note: "Aggressive shouting at the bus stop.",
    },
    SeedIncident {
        latitude: 30.6188,
        longitude: -96.3412,
        place: "Walton Hall",
        note: "Trespasser seen entering the dorm stairwell.",
    },
    SeedIncident {
        latitude: 30.6113,
        longitude: -96.3452,
        place: "Lot 100e",
        note: "Car break-in, driver side window shattered.",
    },
    SeedIncident {
        latitude: 30.6143,
        longitude: -96.3439,
        place: "Academic Plaza",
        note: "Student felt followed while crossing the plaza.",
    },
    SeedIncident {
        latitude: 30.6150,
        longitude: -96.3448,
        place: "Sbisa Dining Hall",
        note: "Physical altercation outside the dining hall.",
    },
    SeedIncident {
        latitude: 30.6108,
        longitude: -96.3396,
        place: "Reed Arena",
        note: "Unattended bag prompted a safety inspection.",
    },
];

/// Infers an incident type from the note text, the way the original demo
/// data was labeled.
fn infer_type(note: &str) -> IncidentType {
    let lower = note.to_lowercase();

    let theft = ["stolen", "taken", "break-in", "snatch"];
    let assault = ["altercation", "harassment", "shouting", "argument"];
    let vandalism = ["graffiti", "glass"];
    let suspicious = [
        "suspicious",
        "loitering",
        "trespasser",
        "followed",
        "circling",
        "unattended",
    ];

    if theft.iter().any(|kw| lower.contains(kw)) {
        IncidentType::Theft
    } else if assault.iter().any(|kw| lower.contains(kw)) {
        IncidentType::Assault
    } else if vandalism.iter().any(|kw| lower.contains(kw)) {
        IncidentType::Vandalism
    } else if suspicious.iter().any(|kw| lower.contains(kw)) {
        IncidentType::SuspiciousActivity
    } else {
        IncidentType::Other
    }
}

/// Seeds the demo incidents into `store`, spreading their times across
/// the week before `now`. Returns the number of reports appended.
///
/// # Errors
///
/// Returns a [`ValidationError`] if a seed entry fails draft validation.
pub fn seed_demo_reports(store: &ReportStore, now: DateTime<Utc>) -> Result<usize, ValidationError> {
    for (offset, entry) in (0i64..).zip(SEED_INCIDENTS.iter()) {
        // 2h..156h ago keeps everything inside the trailing week.
        let occurred = now - Duration::hours(2 + offset * 11);
        let severity = u8::try_from(offset % 5 + 1).unwrap_or(1);

        let draft = IncidentReportDraft {
            latitude: entry.latitude,
            longitude: entry.longitude,
            incident_type: Some(infer_type(entry.note)),
            severity,
            incident_timestamp_local: occurred.naive_utc().format("%Y-%m-%dT%H:%M").to_string(),
            description: format!("{} (Location: {})", entry.note, entry.place),
        };

        let valid = formatter::validate(&draft)?;
        let report = formatter::to_persisted(&valid, occurred.naive_utc());
        store.append_at(report, occurred);
    }

    Ok(SEED_INCIDENTS.len())
}

#[cfg(test)]
mod tests {
    use crate::store::NearbyQuery;

    use super::*;

    #[test]
    fn seeds_every_entry() {
        let store = ReportStore::new();
        let now = Utc::now();
        let seeded = seed_demo_reports(&store, now).unwrap();

        assert_eq!(seeded, SEED_INCIDENTS.len());
        assert_eq!(store.total(), SEED_INCIDENTS.len() as u64);
    }

    #[test]
    fn seeding_is_deterministic() {
        let now = Utc::now();
        let first = ReportStore::new();
        let second = ReportStore::new();
        seed_demo_reports(&first, now).unwrap();
        seed_demo_reports(&second, now).unwrap();

        assert_eq!(first.all(), second.all());
    }

    #[test]
    fn all_seeds_land_in_the_trailing_week() {
        let store = ReportStore::new();
        let now = Utc::now();
        seed_demo_reports(&store, now).unwrap();

        assert_eq!(store.count_since(now - Duration::days(7)), store.total());
    }

    #[test]
    fn inferred_types_match_note_content() {
        assert_eq!(infer_type("Bike stolen near the racks"), IncidentType::Theft);
        assert_eq!(infer_type("Fresh graffiti on the wall"), IncidentType::Vandalism);
        assert_eq!(
            infer_type("Group loitering by the door"),
            IncidentType::SuspiciousActivity
        );
        assert_eq!(infer_type("Physical altercation"), IncidentType::Assault);
        assert_eq!(infer_type("Nothing matched here"), IncidentType::Other);
    }

    #[test]
    fn seeded_campus_core_is_dense() {
        let store = ReportStore::new();
        let now = Utc::now();
        seed_demo_reports(&store, now).unwrap();

        // A 1km radius around the library catches most of campus.
        let query = NearbyQuery {
            radius_m: 1_000.0,
            ..NearbyQuery::around(30.6168, -96.3392)
        };
        assert!(store.nearby(&query, now).len() >= 5);
    }
}
