//! Ephemeral code store implementations
//!
//! Redis in production, an in-memory store for tests and development.
//! Both implement `verigate_core`'s `CodeStore` trait; TTL expiry is
//! handled entirely inside the store.

pub mod memory_store;
pub mod redis_store;

pub use memory_store::MemoryCodeStore;
pub use redis_store::RedisCodeStore;

#[cfg(test)]
mod tests;
