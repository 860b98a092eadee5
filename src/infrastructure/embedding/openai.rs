//! OpenAI-compatible embeddings endpoint

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::HttpClientTrait;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

const PROVIDER: &str = "openai";

/// Embeds questions and document chunks through `POST {base_url}/v1/embeddings`
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    endpoint: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();

        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            endpoint: format!("{}/v1/embeddings", base_url.trim_end_matches('/')),
        }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

fn request_body(request: &EmbeddingRequest) -> serde_json::Value {
    serde_json::json!({
        "model": request.model(),
        "input": request.texts(),
        "encoding_format": "float",
    })
}

/// Order vectors by input index and check they answer the whole request
fn into_response(body: EmbeddingsBody, expected: usize) -> Result<EmbeddingResponse, DomainError> {
    let mut data = body.data;

    if data.len() != expected {
        return Err(DomainError::provider(
            PROVIDER,
            format!("Expected {} embeddings, received {}", expected, data.len()),
        ));
    }

    data.sort_by_key(|d| d.index);
    if data.iter().enumerate().any(|(i, d)| d.index != i) {
        return Err(DomainError::provider(
            PROVIDER,
            "Embedding indexes do not match the request inputs",
        ));
    }

    let dimensions = data.first().map_or(0, |d| d.embedding.len());
    if data.iter().any(|d| d.embedding.len() != dimensions) {
        return Err(DomainError::provider(
            PROVIDER,
            "Embeddings in one response have different dimensions",
        ));
    }

    if let Some(usage) = body.usage {
        debug!(
            model = %body.model,
            inputs = expected,
            dimensions,
            prompt_tokens = usage.prompt_tokens,
            "Embeddings generated"
        );
    }

    Ok(EmbeddingResponse::new(
        body.model,
        data.into_iter().map(|d| d.embedding).collect(),
    ))
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        request.validate()?;

        let json = self
            .client
            .post_json(&self.endpoint, self.headers(), &request_body(&request))
            .await?;

        let body: EmbeddingsBody = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Failed to parse embedding response: {}", e))
        })?;

        into_response(body, request.len())
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingsBody {
    model: String,
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: Option<EmbeddingsUsage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsUsage {
    prompt_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::MockHttpClient;

    const BASE_URL: &str = "https://api.openai.com";
    const ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

    fn body(indexes: &[usize], dimensions: usize) -> serde_json::Value {
        let data: Vec<serde_json::Value> = indexes
            .iter()
            .map(|&i| {
                serde_json::json!({
                    "object": "embedding",
                    "index": i,
                    "embedding": vec![i as f32 + 0.5; dimensions],
                })
            })
            .collect();

        serde_json::json!({
            "model": "text-embedding-3-small",
            "data": data,
            "usage": { "prompt_tokens": 7, "total_tokens": 7 }
        })
    }

    fn provider(client: MockHttpClient) -> OpenAiEmbeddingProvider<MockHttpClient> {
        OpenAiEmbeddingProvider::with_base_url(client, "test-api-key", BASE_URL)
    }

    #[tokio::test]
    async fn test_embed_question() {
        let provider = provider(MockHttpClient::new().with_response(ENDPOINT, body(&[0], 4)));

        let vector = provider
            .embed(EmbeddingRequest::question("text-embedding-3-small", "What is Agentic AI?"))
            .await
            .unwrap()
            .into_single()
            .unwrap();

        assert_eq!(vector, vec![0.5; 4]);

        let sent = provider.client.last_body().unwrap();
        assert_eq!(sent["model"], "text-embedding-3-small");
        assert_eq!(sent["input"], serde_json::json!(["What is Agentic AI?"]));
    }

    #[tokio::test]
    async fn test_chunks_come_back_in_input_order() {
        let provider = provider(MockHttpClient::new().with_response(ENDPOINT, body(&[2, 0, 1], 2)));

        let vectors = provider
            .embed(EmbeddingRequest::chunks(
                "text-embedding-3-small",
                vec!["a".into(), "b".into(), "c".into()],
            ))
            .await
            .unwrap()
            .into_exactly(3)
            .unwrap();

        assert_eq!(vectors, vec![vec![0.5, 0.5], vec![1.5, 1.5], vec![2.5, 2.5]]);
    }

    #[tokio::test]
    async fn test_short_response_rejected() {
        let provider = provider(MockHttpClient::new().with_response(ENDPOINT, body(&[0], 2)));

        let result = provider
            .embed(EmbeddingRequest::chunks("m", vec!["a".into(), "b".into()]))
            .await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_index_rejected() {
        let provider = provider(MockHttpClient::new().with_response(ENDPOINT, body(&[0, 0], 2)));

        let result = provider
            .embed(EmbeddingRequest::chunks("m", vec!["a".into(), "b".into()]))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mixed_dimensions_rejected() {
        let mixed = serde_json::json!({
            "model": "m",
            "data": [
                { "index": 0, "embedding": [0.1, 0.2] },
                { "index": 1, "embedding": [0.1] }
            ]
        });
        let provider = provider(MockHttpClient::new().with_response(ENDPOINT, mixed));

        let result = provider
            .embed(EmbeddingRequest::chunks("m", vec!["a".into(), "b".into()]))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_blank_question_never_sent() {
        let provider = provider(MockHttpClient::new());

        let result = provider
            .embed(EmbeddingRequest::question("m", "   "))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(provider.client.last_body().is_none());
    }

    #[tokio::test]
    async fn test_http_error_surfaces() {
        let provider = provider(MockHttpClient::new().with_error(ENDPOINT, "Rate limit exceeded"));

        let result = provider.embed(EmbeddingRequest::question("m", "q")).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let client = MockHttpClient::new()
            .with_response("http://localhost:8080/v1/embeddings", body(&[0], 3));
        let provider =
            OpenAiEmbeddingProvider::with_base_url(client, "test-key", "http://localhost:8080/");

        let response = provider
            .embed(EmbeddingRequest::question("m", "q"))
            .await
            .unwrap();

        assert_eq!(response.model(), "text-embedding-3-small");
    }
}
