//! Sana persistence layer
//!
//! String-keyed asynchronous storage behind the [`KeyValueStore`] trait,
//! standing in for the mobile platform's key-value store. Two backends:
//! [`FileStore`] (one file per key under a data directory) and
//! [`MemoryStore`] (tests and the emergency in-memory path).
//!
//! Values are opaque strings; callers serialize their own payloads.

pub mod error;
pub mod file;
pub mod keys;
pub mod kv;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
