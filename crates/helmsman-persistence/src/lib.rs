//! Helmsman Persistence - Database entities and persistence layer
//!
//! This crate provides:
//! - SeaORM entity definitions
//! - Persistence trait abstractions used by the service crates
//! - Domain model types for persistence operations
//! - The SQL backend (`ExternalDbPersistService`)

pub mod entity;
pub mod model;
pub mod sql;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export entity prelude
pub use entity::prelude::*;

// Re-export persistence traits
pub use traits::{
    ChartPersistence, ChartRefPersistence, ClusterPersistence, DeploymentConfigPersistence,
    EphemeralContainerPersistence, PersistenceService,
};

// Re-export SQL backend
pub use sql::ExternalDbPersistService;
