use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use oppfinder_core::{scoring::MAX_SCORE, Opportunity, OpportunityQuery, SortKey};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_repository_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct OpportunitiesQuery {
    pub min_score: Option<i64>,
    pub sort: Option<String>,
    pub search: Option<String>,
}

impl OpportunitiesQuery {
    /// Negative minimums clamp to 0 and unknown sort keys fall back to score.
    ///
    /// Returns `None` when `min_score` is above the maximum score, since no
    /// opportunity can match.
    fn into_query(self) -> Option<OpportunityQuery> {
        let min_score = match self.min_score {
            Some(s) if s > i64::from(MAX_SCORE) => return None,
            Some(s) => Some(u8::try_from(s.max(0)).unwrap_or(MAX_SCORE)),
            None => None,
        };
        Some(OpportunityQuery {
            min_score,
            search: self.search,
            sort: self
                .sort
                .as_deref()
                .map(SortKey::parse_or_default)
                .unwrap_or_default(),
            limit: None,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct OpportunityList {
    pub items: Vec<Opportunity>,
    pub count: usize,
}

pub(super) async fn list_opportunities(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<OpportunitiesQuery>,
) -> Result<Json<ApiResponse<OpportunityList>>, ApiError> {
    let all = state
        .repository
        .get_all()
        .await
        .map_err(|e| map_repository_error(req_id.0.clone(), &e))?;

    let items = query
        .into_query()
        .map_or_else(Vec::new, |q| q.apply(all));
    let count = items.len();

    Ok(Json(ApiResponse::new(
        OpportunityList { items, count },
        req_id.0,
    )))
}

pub(super) async fn get_opportunity(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Opportunity>>, ApiError> {
    let opportunity = state
        .repository
        .get(id)
        .await
        .map_err(|e| map_repository_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("opportunity {id} not found"),
            )
        })?;

    Ok(Json(ApiResponse::new(opportunity, req_id.0)))
}
