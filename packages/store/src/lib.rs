#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory stand-ins for the report API and the air quality sample
//! table.
//!
//! Both stores are plain values owned by the caller. Nothing here reads
//! the clock; timestamps are always passed in.

pub mod repository;
pub mod samples;

use thiserror::Error;

pub use repository::InMemoryReportRepository;
pub use samples::{AqiSampleCache, DEFAULT_MAX_AGE_MINUTES, FetchOutcome, RefreshPlan};

/// Errors returned by the in-memory stores.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// No report has the given ID.
    #[error("Report not found: {id}")]
    NotFound {
        /// The missing report ID.
        id: String,
    },

    /// A report with the same ID is already stored.
    #[error("Duplicate report ID: {id}")]
    DuplicateId {
        /// The conflicting report ID.
        id: String,
    },

    /// The report's coordinates are not finite WGS84 values.
    #[error("Report {id} has invalid location ({lat}, {lng})")]
    InvalidLocation {
        /// The rejected report ID.
        id: String,
        /// Rejected latitude.
        lat: f64,
        /// Rejected longitude.
        lng: f64,
    },
}
