//! Semantic cache administration endpoints

use axum::extract::State;
use serde::Serialize;

use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::SemanticCacheStats;

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    #[serde(flatten)]
    pub stats: SemanticCacheStats,
    pub hit_rate: f32,
    pub similarity_threshold: f32,
    pub ttl_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub removed: usize,
}

/// `GET /cache/stats`
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let cache = state.cache();
    let stats = cache.stats().await;

    Json(CacheStatsResponse {
        hit_rate: stats.hit_rate(),
        stats,
        similarity_threshold: cache.similarity_threshold(),
        ttl_secs: cache.config().ttl_secs,
    })
}

/// `DELETE /cache`
pub async fn invalidate_cache(
    State(state): State<AppState>,
) -> Result<Json<InvalidateResponse>, ApiError> {
    let removed = state.cache().invalidate_all().await?;

    Ok(Json(InvalidateResponse { removed }))
}
