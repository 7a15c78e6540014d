//! # Overview
//! This crate provides an in-memory Project Haystack ontology: a tagged
//! value algebra, the Grid container, four wire-format codecs (Zinc,
//! JSON, CSV, Trio), a filter-expression parser and evaluator, and a
//! filter-to-SQL translator for querying entities persisted as JSON rows.
//!
//! It does not supply an HTTP surface, a storage back-end, or CLI/config
//! plumbing — see [`provider`] for the interface storage back-ends are
//! expected to satisfy.
//!
//! # Example usage
//! ```rust
//! use haystack_core::zinc;
//!
//! let text = "ver:\"3.0\"\ndis\n\"hello\"\n";
//! let grid = zinc::parse_zinc(text).unwrap();
//! assert_eq!(zinc::emit_zinc(&grid).lines().next(), Some("ver:\"3.0\""));
//! ```

pub mod algebra;
pub mod codec;
pub mod error;
pub mod filter;
pub mod grid;
pub mod provider;
pub mod sql;
pub mod tz;
pub mod units;
pub mod value;
pub mod zinc;

pub use error::CoreError;
pub use grid::Grid;
pub use value::{Dict, Number, Ref, Value};
