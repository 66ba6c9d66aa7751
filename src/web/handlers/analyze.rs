// POST /api/analyze — single-text analysis.
//
// Body: { "text": "..." }
// Returns { "analysis": null } for empty text, otherwise the polarity,
// subjectivity, label and banner. A body that is not valid JSON gets the
// usual { "error": ... } reply.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::warn;

use crate::analysis;
use crate::web::{api_error, AppState};

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

pub async fn analyze_text(
    State(state): State<AppState>,
    request: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected analyze request");
            return api_error(rejection.status(), &rejection.body_text());
        }
    };
    let analysis = analysis::analyze_text(state.scorer.as_ref(), &request.text);
    Json(serde_json::json!({ "analysis": analysis })).into_response()
}
