//! Terminal UI layer for the UrbanMart dashboard.
//!
//! Provides themes, bar and KPI components, the filter sidebar, dashboard and
//! table views, and the application event loop built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod filter_panel;
pub mod table_view;
pub mod themes;

pub use sales_runtime as runtime;
