// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-scan bookkeeping that is neither index nor search state.

pub mod statistics;

pub use statistics::{Counters, Statistics};
