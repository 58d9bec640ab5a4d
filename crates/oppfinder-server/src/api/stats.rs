use axum::{extract::State, Extension, Json};
use oppfinder_core::OpportunityStats;

use crate::middleware::RequestId;

use super::{map_repository_error, ApiError, ApiResponse, AppState};

pub(super) async fn get_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<OpportunityStats>>, ApiError> {
    let all = state
        .repository
        .get_all()
        .await
        .map_err(|e| map_repository_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(
        OpportunityStats::from_opportunities(&all),
        req_id.0,
    )))
}
