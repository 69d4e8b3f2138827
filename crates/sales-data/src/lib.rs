//! Data layer for UrbanMart sales analytics.
//!
//! Loads the sales CSV into a [`RecordStore`](store::RecordStore), keeps a
//! data-quality report of the rows it had to skip, and aggregates filtered
//! views into ranked revenue tables.

pub mod aggregator;
pub mod quality;
pub mod reader;
pub mod store;

pub use sales_core as core;
