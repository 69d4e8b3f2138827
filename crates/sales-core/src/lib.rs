//! Core domain layer for UrbanMart sales analytics.
//!
//! Holds the sales-line data model, the derived-field computer, the filter
//! engine, error types, number formatting and command-line settings shared by
//! every other crate in the workspace.

pub mod derive;
pub mod error;
pub mod filter;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{Result, RowError, SalesError};
