//! Semantic cache store implementations

mod factory;
mod in_memory;
mod noop;
mod redis;

pub use factory::SemanticCacheStoreFactory;
pub use in_memory::InMemorySemanticCacheStore;
pub use noop::NoopSemanticCacheStore;
pub use self::redis::RedisSemanticCacheStore;
