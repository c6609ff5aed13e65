//! Durable local store implementations.

pub mod file_store;

pub use file_store::FileKeyValueStore;
