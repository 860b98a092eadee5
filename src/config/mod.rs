//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuditConfig, EmbeddingConfig, LlmConfig, LogFormat, LoggingConfig,
    RetrievalConfig, ServerConfig, TimeoutConfig, OPENAI_API_KEY_ENV,
};
