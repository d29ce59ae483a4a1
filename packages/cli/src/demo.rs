//! Scripted walkthrough of one report session.
//!
//! Seeds the demo dataset, locates (or pins) a position, fills and
//! submits a report the way the form would, then prints the flat record,
//! the area risk summary, and a short assistant exchange.

use std::sync::Arc;

use chrono::Utc;
use safepath_assistant::{SUGGESTED_PROMPTS, Transcript, risk};
use safepath_geo::locate::{EnvLocationSource, LocateOptions, locate};
use safepath_map::{LOCATE_ZOOM, MapProvider as _, Viewport, provider_from_env};
use safepath_report::{ReportStore, seed};
use safepath_report_models::IncidentType;
use safepath_session::{FieldEdit, ReportSession};

/// Radius the demo uses for its risk summary, in meters (about half a
/// mile, matching the UI's default ring).
const DEMO_RADIUS_M: f64 = 800.0;

/// Runs the scripted demo session.
///
/// # Errors
///
/// Returns an error if seeding or the scripted submit fails; neither
/// should happen with the built-in dataset.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(ReportStore::new());
    let seeded = seed::seed_demo_reports(&store, Utc::now())?;
    println!("Seeded {seeded} demo reports");

    // Locate-me first; fall back to a map click on the campus core when
    // no location source is configured.
    let mut viewport = Viewport::default();
    let pin = match locate(&EnvLocationSource, LocateOptions::default()).await {
        Some(position) => {
            println!(
                "Located at ({:.4}, {:.4})",
                position.latitude, position.longitude
            );
            position
        }
        None => {
            let position = safepath_geo::Position::new(30.6168, -96.3392);
            println!(
                "No location source; clicking map at ({:.4}, {:.4})",
                position.latitude, position.longitude
            );
            position
        }
    };
    viewport.set_view(pin, LOCATE_ZOOM);

    let provider = provider_from_env();
    println!("Map provider: {:?}", provider.kind());
    if let Some(url) = provider.tile_url(viewport.zoom, 0, 0) {
        println!("Sample tile: {url}");
    }

    // Fill and submit the report the way the popup form would.
    let mut session = ReportSession::new(Arc::clone(&store));
    session.drop_pin(pin);
    session.edit(FieldEdit::IncidentType(IncidentType::Theft));
    session.edit(FieldEdit::Severity(4));
    session.edit(FieldEdit::Description(
        "Bike stolen from the rack while I was inside.".to_string(),
    ));

    let stored = session
        .submit()?
        .ok_or("demo session had no draft to submit")?;

    println!();
    println!("Saved report #{} ({})", stored.id, stored.history_date());
    println!(
        "Record: {}",
        serde_json::to_string_pretty(&stored.report.record())?
    );

    // The location summary card.
    let assessment = risk::assess(&store, pin.latitude, pin.longitude, DEMO_RADIUS_M, Utc::now());
    println!();
    println!("{}", assessment.summary());

    // One assistant exchange, including the delayed canned reply.
    let transcript = Transcript::new();
    if let Some(reply) = transcript.send(SUGGESTED_PROMPTS[0]) {
        reply.await?;
    }
    println!();
    for message in transcript.messages() {
        println!("[{}] {}", message.role, message.text);
    }

    Ok(())
}

/// Prints the stats-tab counters for a freshly seeded store.
///
/// # Errors
///
/// Returns an error if seeding fails.
pub fn stats() -> Result<(), Box<dyn std::error::Error>> {
    let store = ReportStore::new();
    let now = Utc::now();
    seed::seed_demo_reports(&store, now)?;

    println!("Total Reports:  {}", store.total());
    println!(
        "Last 7 Days:    {}",
        store.count_since(now - chrono::Duration::days(7))
    );
    match store.most_common_type() {
        Some((incident_type, count)) => {
            println!("Most Common:    {} ({count} reports)", incident_type.label());
        }
        None => println!("Most Common:    n/a"),
    }

    Ok(())
}
