use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use tracing::debug;

use thoughts_db::models::{HeartsFilter, ThoughtOrder, ThoughtQuery};
use thoughts_types::api::HeartsQuery;
use thoughts_types::models::Thought;

use crate::error::ApiError;
use crate::state::{AppState, blocking};
use crate::thoughts::{MAX_LIMIT, list, to_thought};
use crate::validation;

/// POST /thoughts/{id}/like — open to anonymous visitors.
pub async fn like_thought(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Thought>, ApiError> {
    let id = validation::thought_id(&id)?.to_string();

    let repo = state.thoughts.clone();
    let lookup = id.clone();
    let row = blocking(move || repo.like_thought(&lookup))
        .await?
        .ok_or(ApiError::ThoughtNotFound(id))?;

    debug!("Thought {} now has {} hearts", row.id, row.hearts);
    Ok(Json(to_thought(row)))
}

/// GET /hearts — thoughts with at least `hearts` hearts, most liked first.
pub async fn most_hearts(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<HeartsQuery>, ApiError>,
) -> Result<Json<Vec<Thought>>, ApiError> {
    let db_query = ThoughtQuery {
        hearts: HeartsFilter::AtLeast(query.hearts.unwrap_or(0)),
        order: ThoughtOrder::MostHearts,
        limit: Some(MAX_LIMIT),
    };

    list(&state, db_query).await.map(Json)
}
