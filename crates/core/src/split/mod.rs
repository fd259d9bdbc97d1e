//! Split specification handling.
//!
//! An expense is divided among people according to a list of split specs.
//! Each spec names a person and one of three split kinds:
//! - `Equal` - share computed from whatever remains after the other kinds
//! - `Percentage` - share is a fraction of the expense total
//! - `Exact` - share is given literally
//!
//! Validation accumulates every violation instead of failing fast, so a
//! client can fix a whole spec in one round trip. Calculation assumes a
//! validated spec and guarantees the shares sum exactly to the total.

pub mod calculator;
pub mod types;
pub mod validation;

#[cfg(test)]
mod calculator_props;

pub use calculator::calculate_splits;
pub use types::{FinalizedSplit, SplitKind, SplitSpec};
pub use validation::{SplitViolation, validate_splits};
