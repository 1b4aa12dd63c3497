use axum::{Json, extract::State, http::StatusCode};
use log::error;
use serde::Serialize;

use super::AppState;
use crate::{VisitsReport, VisitsSource};

/// The response of the visit recording endpoint.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct VisitRecorded {
    pub recorded: bool,
    pub visits: u64,
}

/// Reports the total visits of the site.
pub async fn get_visits(State(state): State<AppState>) -> (StatusCode, Json<VisitsReport>) {
    let report = state.visits.report().await;
    let status = match report.source {
        VisitsSource::Error => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    };

    (status, Json(report))
}

/// Records one visit of the site.
pub async fn record_visit(State(state): State<AppState>) -> (StatusCode, Json<VisitRecorded>) {
    match state.visits.record_visit().await {
        Ok(Some(visits)) => (
            StatusCode::OK,
            Json(VisitRecorded {
                recorded: true,
                visits,
            }),
        ),
        Ok(None) => (
            StatusCode::OK,
            Json(VisitRecorded {
                recorded: false,
                visits: 0,
            }),
        ),
        Err(e) => {
            error!("Error recording visit: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(VisitRecorded {
                    recorded: false,
                    visits: 0,
                }),
            )
        }
    }
}
