//! Reusable line-producing widgets for the dashboard.

pub mod bars;
pub mod header;
pub mod kpi;
