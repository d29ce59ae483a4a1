//! HTTP handler functions for the safepath API.

use actix_web::{HttpResponse, web};
use chrono::{Duration, Local, Utc};
use safepath_report::store::{DEFAULT_NEARBY_LIMIT, DEFAULT_RADIUS_M, NearbyQuery};
use safepath_report::{formatter, to_persisted};
use safepath_report_models::{IncidentReportDraft, IncidentType};
use safepath_server_models::{
    ApiHealth, ApiNearbyReport, ApiReport, ApiReportSubmission, ApiStatsLast7, ApiStatsMostCommon,
    ApiStatsTotal, ApiTypeNode, NearbyQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/types`
///
/// Returns the selectable incident types for form population.
pub async fn types() -> HttpResponse {
    let nodes: Vec<ApiTypeNode> = IncidentType::all()
        .iter()
        .map(|ty| ApiTypeNode {
            name: ty.to_string(),
            label: ty.label().to_string(),
            typical_severity: ty.typical_severity().value(),
        })
        .collect();

    HttpResponse::Ok().json(nodes)
}

/// `POST /api/report`
///
/// Validates the submission like any other draft; a validation failure
/// is a 400 with the error message, success is a 201 with the stored
/// report.
pub async fn submit_report(
    state: web::Data<AppState>,
    submission: web::Json<ApiReportSubmission>,
) -> HttpResponse {
    let submission = submission.into_inner();
    let draft = IncidentReportDraft {
        latitude: submission.latitude,
        longitude: submission.longitude,
        incident_type: submission.incident_type,
        severity: submission.severity,
        incident_timestamp_local: submission.incident_timestamp_local,
        description: submission.description,
    };

    match formatter::validate(&draft) {
        Ok(valid) => {
            let report = to_persisted(&valid, Local::now().naive_local());
            let stored = state.store.append(report);
            log::info!("Stored report {} at {}", stored.id, stored.grid_key);
            HttpResponse::Created().json(ApiReport::from(stored))
        }
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        })),
    }
}

/// `GET /api/reports`
///
/// All stored reports in insertion order.
pub async fn reports(state: web::Data<AppState>) -> HttpResponse {
    let reports: Vec<ApiReport> = state
        .store
        .all()
        .into_iter()
        .map(ApiReport::from)
        .collect();

    HttpResponse::Ok().json(reports)
}

/// `GET /api/nearby`
///
/// Reports within a radius of a center, sorted by distance. Radius,
/// limit, and recency window are clamped by the store.
pub async fn nearby(
    state: web::Data<AppState>,
    params: web::Query<NearbyQueryParams>,
) -> HttpResponse {
    let query = NearbyQuery {
        latitude: params.lat,
        longitude: params.lng,
        radius_m: params.radius_m.unwrap_or(DEFAULT_RADIUS_M),
        days: params.days,
        limit: params.limit.unwrap_or(DEFAULT_NEARBY_LIMIT),
    };

    let hits: Vec<ApiNearbyReport> = state
        .store
        .nearby(&query, Utc::now())
        .into_iter()
        .map(ApiNearbyReport::from)
        .collect();

    HttpResponse::Ok().json(hits)
}

/// `GET /api/stats/total`
pub async fn stats_total(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiStatsTotal {
        total_reports: state.store.total(),
    })
}

/// `GET /api/stats/last7`
pub async fn stats_last7(state: web::Data<AppState>) -> HttpResponse {
    let cutoff = Utc::now() - Duration::days(7);
    HttpResponse::Ok().json(ApiStatsLast7 {
        reports_last_7_days: state.store.count_since(cutoff),
    })
}

/// `GET /api/stats/most-common`
pub async fn stats_most_common(state: web::Data<AppState>) -> HttpResponse {
    let (most_common_type, count) = state
        .store
        .most_common_type()
        .map_or((None, 0), |(ty, count)| (Some(ty), count));

    HttpResponse::Ok().json(ApiStatsMostCommon {
        most_common_type,
        count,
    })
}
