//! Derived-field and aggregation engine for the project panel.

pub mod dates;
mod domain;
mod error;
pub mod metrics;
pub mod recalc;
pub mod rollup;

pub use domain::*;
pub use error::*;
pub use recalc::{recompute, recompute_at, refresh_derived, FieldChange};
