use axum::{body::Bytes, extract::State, Extension, Json};
use oppfinder_core::RedditCredentials;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct ScanRequest {
    pub reddit_credentials: Option<RedditCredentials>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScannedOpportunity {
    pub id: Option<i64>,
    pub title: String,
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub(super) struct ScanResponse {
    pub message: String,
    pub opportunities: Vec<ScannedOpportunity>,
}

/// An empty body means "use the configured collector".
fn parse_scan_request(body: &[u8]) -> Result<ScanRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ScanRequest::default());
    }
    serde_json::from_slice(body)
}

pub(super) async fn run_scan(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ApiResponse<ScanResponse>>, ApiError> {
    let request = parse_scan_request(&body).map_err(|e| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            format!("invalid scan request: {e}"),
        )
    })?;

    tracing::info!(
        credentials_override = request.reddit_credentials.is_some(),
        "scan requested"
    );
    let outcome = state
        .scan
        .run_scan(request.reddit_credentials.as_ref())
        .await;

    let opportunities: Vec<ScannedOpportunity> = outcome
        .opportunities
        .iter()
        .map(|o| ScannedOpportunity {
            id: o.id(),
            title: o.title().to_string(),
            score: o.score(),
        })
        .collect();

    Ok(Json(ApiResponse::new(
        ScanResponse {
            message: format!(
                "Scan complete. Found {} opportunities.",
                opportunities.len()
            ),
            opportunities,
        },
        req_id.0,
    )))
}
