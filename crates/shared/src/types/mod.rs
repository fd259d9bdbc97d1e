//! Common type definitions.

pub mod id;
pub mod money;

pub use id::{ExpenseId, PersonId, TemplateId};
pub use money::{CENT, SETTLEMENT_TOLERANCE, is_settled, round_to_cents};
