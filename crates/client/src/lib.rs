//! `careboard-client`
//!
//! **Responsibility:** the dashboard-side data and state layer.
//!
//! This crate provides:
//! - A keyed query cache with in-flight de-duplication and invalidation
//! - An explicit UI state store mutated only through actions
//! - A thin HTTP client for the mock API
//! - A `DataLayer` tying the three together the way the dashboards use them
//!
//! Nothing is persisted; all state lives for the life of the process.

pub mod api;
pub mod data;
pub mod query;
pub mod store;

pub use api::{ApiClient, ClientError};
pub use data::DataLayer;
pub use query::{CacheConfig, QueryCache, QueryError, QueryKey, QuerySnapshot, QueryStatus};
pub use store::{AppAction, AppState, AppStore, Theme};
