use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::{ask, cache, health};
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Build the HTTP router; `/metrics` is mounted at `metrics_path` when a
/// Prometheus handle is supplied
pub fn create_router(state: AppState, metrics: Option<(PrometheusMetrics, &str)>) -> Router {
    let app = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route("/ready", get(health::ready_check))
        .route("/ask", post(ask::ask))
        .route("/cache/stats", get(cache::cache_stats))
        .route("/cache", delete(cache::invalidate_cache))
        .with_state(state);

    let app = match metrics {
        Some((handle, path)) => app
            .merge(create_metrics_router(handle, path))
            .layer(middleware::from_fn(super::middleware::metrics_middleware)),
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::semantic_cache::SemanticCacheConfig;
    use crate::domain::guardrails::mock::{PassthroughGuardrail, PassthroughPostProcessor};
    use crate::domain::{ChunkInput, NoopAuditSink, NoopMetricSink, VectorStore};
    use crate::infrastructure::prompt::TemplatePromptRouter;
    use crate::infrastructure::retrieval::{InMemoryVectorStore, VectorStoreRetriever};
    use crate::infrastructure::semantic_cache::InMemorySemanticCacheStore;
    use crate::infrastructure::services::{
        PipelineDeps, PipelineService, PipelineSettings, SemanticCacheService,
    };

    async fn app_with(generator: MockLlmProvider) -> Router {
        let embeddings = Arc::new(MockEmbeddingProvider::new("mock", 8));
        let vector_store = Arc::new(InMemoryVectorStore::new(embeddings.clone(), "m"));
        vector_store
            .add_documents(vec![ChunkInput::new("Agentic AI systems act autonomously.")])
            .await
            .unwrap();

        let cache = Arc::new(SemanticCacheService::new(
            Arc::new(InMemorySemanticCacheStore::new(10)),
            embeddings,
            "m",
            SemanticCacheConfig::default(),
        ));

        let pipeline = PipelineService::new(
            PipelineDeps {
                cache,
                retriever: Arc::new(VectorStoreRetriever::new(vector_store.clone(), 2)),
                router: Arc::new(TemplatePromptRouter::new("gpt-4.1-nano")),
                generator: Arc::new(generator),
                post_processor: Arc::new(PassthroughPostProcessor),
                guardrail: Arc::new(PassthroughGuardrail),
                audit: Arc::new(NoopAuditSink),
                metrics: Arc::new(NoopMetricSink),
            },
            PipelineSettings::default(),
        );

        create_router(AppState::new(Arc::new(pipeline), vector_store), None)
    }

    fn ask_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ask_miss_then_cached() {
        let app = app_with(MockLlmProvider::new("mock").with_content("Agents act.")).await;

        let response = app
            .clone()
            .oneshot(ask_request(r#"{"question":"What is Agentic AI?","user_id":"u-1"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let first = json_body(response).await;
        assert_eq!(first["answer"], "Agents act.");
        assert_eq!(first["cached"], false);
        assert_eq!(first["user_id"], "u-1");

        let response = app
            .oneshot(ask_request(r#"{"question":"What is Agentic AI?"}"#))
            .await
            .unwrap();
        let second = json_body(response).await;
        assert_eq!(second["answer"], "Agents act.");
        assert_eq!(second["cached"], true);
        assert_eq!(second["user_id"], Value::Null);
    }

    #[tokio::test]
    async fn test_blank_question_is_bad_request() {
        let app = app_with(MockLlmProvider::new("mock").with_content("unused")).await;

        let response = app.oneshot(ask_request(r#"{"question":"   "}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_generation_failure_is_service_unavailable() {
        let app = app_with(MockLlmProvider::new("mock").with_error("upstream down")).await;

        let response = app
            .oneshot(ask_request(r#"{"question":"What is Agentic AI?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_cache_stats_and_invalidate() {
        let app = app_with(MockLlmProvider::new("mock").with_content("A")).await;
        app.clone()
            .oneshot(ask_request(r#"{"question":"q"}"#))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(Request::get("/cache/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let stats = json_body(response).await;
        assert_eq!(stats["backend"], "in_memory");
        assert_eq!(stats["entries"], 1);
        assert_eq!(stats["misses"], 1);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/cache")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_body(response).await["removed"], 1);
    }

    #[tokio::test]
    async fn test_ready_reports_cache_and_index() {
        let app = app_with(MockLlmProvider::new("mock").with_content("A")).await;

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"][0]["backend"], "in_memory");
        assert_eq!(body["checks"][1]["entries"], 1);
    }

    #[tokio::test]
    async fn test_root_banner_and_liveness() {
        let app = app_with(MockLlmProvider::new("mock").with_content("A")).await;

        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            json_body(response).await["message"],
            "RAG answer pipeline is running"
        );

        let response = app
            .oneshot(Request::get("/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
