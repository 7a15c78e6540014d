//! The Provider contract (spec §4.H): an abstract, capability-flagged
//! boundary to storage back-ends. This crate specifies the interface
//! only — no URL-loader, relational, or time-series implementation lives
//! here (spec §1 "Out of scope").

use crate::error::{CapabilityError, CoreError};
use crate::filter::FilterNode;
use crate::grid::Grid;
use crate::value::{Ref, Value};
use chrono::{DateTime, FixedOffset};

/// A point-in-time range for `his_read` (mirrors the teacher crate's
/// `HisReadRange`, generalised from SkySpark's server-side keywords to
/// plain datetimes since this crate has no HTTP layer to phrase them for).
#[derive(Clone, Debug, PartialEq)]
pub struct HisRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// A version selector for `read` (spec §6 "an entity MUST have an `id`
/// tag" scoped by a validity interval).
#[derive(Clone, Debug, PartialEq)]
pub enum Version {
    Latest,
    AsOf(DateTime<FixedOffset>),
}

/// Acknowledgement returned by `point_write`.
#[derive(Clone, Debug, PartialEq)]
pub struct WriteAck {
    pub id: Ref,
    pub level: u8,
}

/// A synchronous capability set mirroring the Haystack REST verbs (spec
/// §4.H). Implementations are free to support any subset; an operation
/// this provider does not implement returns `CapabilityError`, never
/// panics.
pub trait Provider {
    /// Server/provider self-description grid.
    fn about(&self) -> Result<Grid, CoreError>;

    /// Run `filter` (in-memory via the evaluator, or translated to SQL if
    /// this provider is relational) and return at most `limit` matching
    /// rows, optionally projected to `select`.
    fn read(
        &self,
        filter: &FilterNode,
        limit: Option<usize>,
        select: Option<&[String]>,
        version: Version,
    ) -> Result<Grid, CoreError>;

    /// Time-series slice for the given point ids over `range`.
    fn his_read(&self, ids: &[Ref], range: &HisRange) -> Result<Grid, CoreError>;

    /// Write a value at the given priority array level.
    fn point_write(
        &self,
        id: &Ref,
        level: u8,
        value: Value,
        who: &str,
        duration: Option<std::time::Duration>,
    ) -> Result<WriteAck, CoreError>;

    /// Invoke a named action on an entity.
    fn invoke_action(
        &self,
        id: &Ref,
        action: &str,
        params: &Grid,
    ) -> Result<Grid, CoreError>;

    /// Every distinct value known for `tag` across the provider's
    /// entities, in an implementation-defined but stable order.
    fn values_for_tag(&self, tag: &str) -> Result<Vec<Value>, CoreError>;

    /// Every version timestamp this provider retains, oldest first.
    fn versions(&self) -> Result<Vec<DateTime<FixedOffset>>, CoreError>;
}

/// Default "not implemented" helper for providers that only support a
/// subset of the contract — call this from the methods you don't back.
pub fn not_implemented(operation: &'static str) -> CoreError {
    CoreError::Capability(CapabilityError { operation })
}
