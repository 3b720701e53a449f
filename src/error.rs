// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for loading event logs and configuring scans.
//!
//! The search itself never fails: absent dates are empty records and a
//! time-out is reported as a flag on the result.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StreakError>;

#[derive(Error, Debug)]
pub enum StreakError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed event log: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Empty date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("No records for graticule {0:?}")]
    UnknownPartition(String),
}
