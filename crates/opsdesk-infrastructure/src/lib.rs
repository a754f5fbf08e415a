//! Infrastructure layer for opsdesk.
//!
//! Provides the filesystem-backed implementation of the store repository:
//! path resolution, atomic JSON file writes, versioned snapshot DTOs with
//! migration, and the repository itself.

pub mod json_store_repository;
pub mod paths;
pub mod snapshot;
pub mod storage;

pub use json_store_repository::JsonStoreRepository;
pub use paths::OpsdeskPaths;
