//! Runtime layer for UrbanMart sales analytics.
//!
//! Owns the cached record store, reloading it when the source file changes,
//! and turns a store plus filter criteria into the snapshot the dashboard
//! renders.

pub mod snapshot;
pub mod store_cache;

pub use sales_core as core;
pub use sales_data as data;
