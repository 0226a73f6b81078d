//! # tally-core
//!
//! Core types shared by every Tally crate.
//!
//! This crate provides:
//! - Wire entities for the paginated sales query (records, edges, cursors, page info)
//! - The import summary returned by the upload mutation
//! - Filter values, raw filter inputs, and the settled query parameters
//! - Sort, update-mode, and startup-strategy enums
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod filter;
