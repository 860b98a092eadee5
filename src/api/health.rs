//! Health, liveness and readiness endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use super::types::Json;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<usize>,
}

#[derive(Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// `GET /`
pub async fn root() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "RAG answer pipeline is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /health`
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// `GET /live`
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// `GET /ready`
///
/// The cache fails open, so an unreachable cache only degrades readiness;
/// an unusable document index makes the service unready.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let checks = vec![check_cache(&state).await, check_index(&state).await];

    let overall_status = if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

async fn check_cache(state: &AppState) -> HealthCheck {
    let cache = state.cache();
    let backend = cache.backend_name().to_string();

    match cache.ping().await {
        Ok(()) => HealthCheck {
            name: "semantic_cache".to_string(),
            status: HealthStatus::Healthy,
            message: None,
            backend: Some(backend),
            entries: Some(cache.stats().await.entries),
        },
        Err(e) => HealthCheck {
            name: "semantic_cache".to_string(),
            status: HealthStatus::Degraded,
            message: Some(e.to_string()),
            backend: Some(backend),
            entries: None,
        },
    }
}

async fn check_index(state: &AppState) -> HealthCheck {
    match state.vector_store.len().await {
        Ok(entries) => HealthCheck {
            name: "document_index".to_string(),
            status: if entries == 0 {
                HealthStatus::Degraded
            } else {
                HealthStatus::Healthy
            },
            message: (entries == 0).then(|| "no documents indexed".to_string()),
            backend: None,
            entries: Some(entries),
        },
        Err(e) => HealthCheck {
            name: "document_index".to_string(),
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
            backend: None,
            entries: None,
        },
    }
}
