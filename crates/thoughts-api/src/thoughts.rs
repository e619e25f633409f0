use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use thoughts_db::models::{
    HeartsFilter, NewThought, ThoughtOrder, ThoughtQuery, ThoughtRow, timestamp,
};
use thoughts_types::api::{CreateThoughtRequest, SortOrder, ThoughtListQuery, UpdateThoughtRequest};
use thoughts_types::models::Thought;

use crate::credentials::AuthUser;
use crate::error::ApiError;
use crate::state::{AppState, blocking};
use crate::validation;

/// Upper bound (and default) for `limit` on list endpoints.
pub const MAX_LIMIT: u32 = 100;

/// GET /thoughts — newest first unless `sort=oldest`, optionally filtered by
/// an exact (`hearts`) or minimum (`minHearts`) heart count.
pub async fn list_thoughts(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ThoughtListQuery>, ApiError>,
) -> Result<Json<Vec<Thought>>, ApiError> {
    let hearts = match (query.hearts, query.min_hearts) {
        (Some(_), Some(_)) => {
            return Err(ApiError::validation(
                "hearts",
                "Use either hearts or minHearts, not both",
            ));
        }
        (Some(n), None) => HeartsFilter::Exact(n),
        (None, Some(n)) => HeartsFilter::AtLeast(n),
        (None, None) => HeartsFilter::Any,
    };

    let order = match query.sort {
        SortOrder::Newest => ThoughtOrder::Newest,
        SortOrder::Oldest => ThoughtOrder::Oldest,
    };

    let db_query = ThoughtQuery {
        hearts,
        order,
        limit: Some(validation::list_limit(query.limit, MAX_LIMIT)?),
    };

    list(&state, db_query).await.map(Json)
}

/// Shared by `/thoughts` and `/hearts`. An empty result is a 404.
pub(crate) async fn list(state: &AppState, query: ThoughtQuery) -> Result<Vec<Thought>, ApiError> {
    let repo = state.thoughts.clone();
    let rows = blocking(move || repo.list_thoughts(&query)).await?;

    if rows.is_empty() {
        return Err(ApiError::NoMatches(match query.hearts {
            HeartsFilter::Any => "No thoughts have been posted yet".to_string(),
            HeartsFilter::Exact(n) => format!("No thoughts with exactly {} hearts", n),
            HeartsFilter::AtLeast(n) => format!("No thoughts with {} or more hearts", n),
        }));
    }

    Ok(rows.into_iter().map(to_thought).collect())
}

pub async fn get_thought(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Thought>, ApiError> {
    let id = validation::thought_id(&id)?.to_string();

    let repo = state.thoughts.clone();
    let lookup = id.clone();
    let row = blocking(move || repo.get_thought(&lookup))
        .await?
        .ok_or(ApiError::ThoughtNotFound(id))?;

    Ok(Json(to_thought(row)))
}

pub async fn create_thought(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(req), _): WithRejection<Json<CreateThoughtRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let message = validation::thought_message(req.message.as_deref())?;

    let id = Uuid::new_v4().to_string();
    let created_at = timestamp(Utc::now());

    let repo = state.thoughts.clone();
    let row = blocking(move || {
        repo.insert_thought(&NewThought {
            id: &id,
            message: &message,
            hearts: 0,
            created_at: &created_at,
        })
    })
    .await?;

    info!("{} posted thought {}", user.name, row.id);
    Ok((StatusCode::CREATED, Json(to_thought(row))))
}

/// PUT /thoughts/{id} — replaces the message, keeps hearts and creation time.
pub async fn update_thought(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateThoughtRequest>, ApiError>,
) -> Result<Json<Thought>, ApiError> {
    let id = validation::thought_id(&id)?.to_string();
    let message = validation::thought_message(req.message.as_deref())?;

    let repo = state.thoughts.clone();
    let lookup = id.clone();
    let row = blocking(move || repo.update_message(&lookup, &message))
        .await?
        .ok_or(ApiError::ThoughtNotFound(id))?;

    info!("{} edited thought {}", user.name, row.id);
    Ok(Json(to_thought(row)))
}

pub async fn delete_thought(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Thought>, ApiError> {
    let id = validation::thought_id(&id)?.to_string();

    let repo = state.thoughts.clone();
    let lookup = id.clone();
    let row = blocking(move || repo.delete_thought(&lookup))
        .await?
        .ok_or(ApiError::ThoughtNotFound(id))?;

    info!("{} deleted thought {}", user.name, row.id);
    Ok(Json(to_thought(row)))
}

/// Convert a stored row to the API model. Corrupt columns are logged and
/// replaced by defaults rather than failing the whole listing.
pub(crate) fn to_thought(row: ThoughtRow) -> Thought {
    Thought {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt thought id '{}': {}", row.id, e);
            Uuid::default()
        }),
        created_at: row
            .created_at
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|e| {
                warn!("Corrupt created_at '{}' on thought '{}': {}", row.created_at, row.id, e);
                DateTime::default()
            }),
        message: row.message,
        hearts: row.hearts,
    }
}
