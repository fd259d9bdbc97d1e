//! Shared types for Divvy.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Money rounding and tolerance helpers

pub mod types;
