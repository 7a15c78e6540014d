//! The three auxiliary wire formats (spec §4.D): JSON (Hayson-style sigil
//! encoding), CSV (lossy, deterministic), and Trio (line-oriented). All
//! three share Zinc's scalar grammar for anything beyond framing.

pub mod csv;
pub mod error;
pub mod json;
pub mod trio;

pub use error::CodecError;
