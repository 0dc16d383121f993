use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{error::AppError, models::TagsResponse, state::AppState, store};

/// GET /api/tags
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<TagsResponse>, AppError> {
    let tags = store::tags::all(&state.db).await?;

    Ok(Json(TagsResponse { tags }))
}
