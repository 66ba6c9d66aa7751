// Batch handlers — CSV upload, preview, analysis and download.
//
// POST /api/batch/preview   multipart: file          → columns + first rows
// POST /api/batch/analyze   multipart: file, column  → aggregates + SVG charts
// POST /api/batch/download  multipart: file, column  → annotated CSV attachment
//
// The server keeps nothing between calls, so analyze and download both
// receive the file again. Scoring runs on the blocking pool.

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::batch::aggregate::{LabelDistribution, PolarityHistogram};
use crate::batch::annotate::{annotate, AnnotatedBatch};
use crate::batch::table::BatchTable;
use crate::batch::{BatchError, CSV_MIME, RESULTS_FILE_NAME};
use crate::output::chart;
use crate::web::{api_error, AppState};

/// Fields collected from a batch upload form.
#[derive(Default)]
struct UploadForm {
    file: Option<Vec<u8>>,
    column: Option<String>,
}

#[derive(Serialize)]
struct Charts {
    pie: String,
    histogram: String,
}

#[derive(Serialize)]
struct BatchReport {
    row_count: usize,
    text_column: String,
    degraded_rows: usize,
    distribution: LabelDistribution,
    histogram: PolarityHistogram,
    charts: Charts,
    download_name: &'static str,
}

impl BatchReport {
    fn new(batch: &AnnotatedBatch, histogram_bins: usize) -> Self {
        let distribution = batch.distribution();
        let histogram = batch.histogram(histogram_bins);
        Self {
            row_count: batch.row_count(),
            text_column: batch.text_column().to_string(),
            degraded_rows: batch.degraded_count(),
            charts: Charts {
                pie: chart::pie_chart_svg(&distribution),
                histogram: chart::histogram_svg(&histogram),
            },
            distribution,
            histogram,
            download_name: RESULTS_FILE_NAME,
        }
    }
}

/// POST /api/batch/preview — parse the upload and return its first rows.
pub async fn preview(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let Some(bytes) = form.file else {
        return api_error(StatusCode::BAD_REQUEST, "No file uploaded");
    };

    match BatchTable::from_csv_bytes(&bytes) {
        Ok(table) => Json(table.preview(state.config.preview_rows)).into_response(),
        Err(e) => batch_error(e),
    }
}

/// POST /api/batch/analyze — score every row and return aggregates.
pub async fn analyze(State(state): State<AppState>, multipart: Multipart) -> Response {
    let bins = state.config.histogram_bins;
    match run_batch(&state, multipart).await {
        Ok(batch) => Json(BatchReport::new(&batch, bins)).into_response(),
        Err(response) => response,
    }
}

/// POST /api/batch/download — score every row and return the annotated CSV.
pub async fn download(State(state): State<AppState>, multipart: Multipart) -> Response {
    let batch = match run_batch(&state, multipart).await {
        Ok(batch) => batch,
        Err(response) => return response,
    };

    match batch.to_csv_bytes() {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, CSV_MIME.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{RESULTS_FILE_NAME}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => batch_error(e),
    }
}

/// Read the form, parse the file and annotate the chosen column.
async fn run_batch(state: &AppState, multipart: Multipart) -> Result<AnnotatedBatch, Response> {
    let form = read_form(multipart).await?;
    let Some(bytes) = form.file else {
        return Err(api_error(StatusCode::BAD_REQUEST, "No file uploaded"));
    };
    let Some(column) = form.column.filter(|c| !c.is_empty()) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "No text column selected"));
    };

    let scorer = state.scorer.clone();
    let result = tokio::task::spawn_blocking(move || {
        let table = BatchTable::from_csv_bytes(&bytes)?;
        annotate(table, &column, scorer.as_ref())
    })
    .await;

    match result {
        Ok(Ok(batch)) => Ok(batch),
        Ok(Err(e)) => Err(batch_error(e)),
        Err(e) => {
            error!(error = %e, "Batch scoring task failed");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Batch analysis failed",
            ))
        }
    }
}

/// Collect the `file` and `column` fields; unknown fields are ignored.
async fn read_form(mut multipart: Multipart) -> Result<UploadForm, Response> {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Malformed multipart upload");
                return Err(api_error(e.status(), &e.body_text()));
            }
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => match field.bytes().await {
                Ok(bytes) => form.file = Some(bytes.to_vec()),
                Err(e) => {
                    warn!(error = %e, "Failed to read upload bytes");
                    return Err(api_error(e.status(), &e.body_text()));
                }
            },
            "column" => match field.text().await {
                Ok(text) => form.column = Some(text),
                Err(e) => return Err(api_error(e.status(), &e.body_text())),
            },
            _ => {}
        }
    }

    Ok(form)
}

fn batch_error(e: BatchError) -> Response {
    let status = match &e {
        e if e.is_parse_error() => StatusCode::BAD_REQUEST,
        BatchError::UnknownColumn(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %e, "Batch request failed");
    } else {
        warn!(error = %e, "Batch request rejected");
    }
    api_error(status, &e.to_string())
}
