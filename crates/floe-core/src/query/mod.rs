//! Module: query
//! Responsibility: caller-facing query specs, JSON parsing into them, and
//! compilation into the native store form.
//! Does not own: execution, decoding, pagination state.
//! Boundary: everything here is pure data transformation; no I/O.

mod compile;
mod native;
mod parse;
mod spec;

pub use compile::compile;
pub use native::{
    CompareOp, ContinuationToken, FlatProps, NativeFilter, NativeQuery, QueryPage, RawRow,
};
pub use parse::{filter_from_json, params_from_json, projection_from_json};
pub use spec::{
    FilterEntry, FilterSpec, FilterValue, PageSpec, ProjectionSpec, QuerySpec, RangeOp,
    SortDirection, SortSpec,
};

use thiserror::Error as ThisError;

///
/// QueryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("unknown filter operator: {op}")]
    InvalidOperator { op: String },

    #[error("array filter values are not supported: {field}")]
    ArrayFilter { field: String },

    #[error("filter document must be a JSON object")]
    FilterNotObject,

    #[error("projection document must be a JSON object")]
    ProjectionNotObject,

    #[error("query parameters must be a JSON object")]
    ParamsNotObject,

    #[error("sort document must be a JSON object")]
    SortNotObject,

    #[error("sort direction for {field} must be a number")]
    SortDirectionNotNumber { field: String },

    #[error("{name} must be a non-negative integer")]
    InvalidPageBound { name: &'static str },
}
