//! Module: query::native
//! Responsibility: the compiled query form and the raw row/page shapes a
//! store port works in.
//! Does not own: compilation or record decoding.

use crate::{
    key::{CollectionName, RecordKey},
    query::SortDirection,
    record::RecordId,
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat property set of one stored row, keyed by field name.
pub type FlatProps = BTreeMap<String, Value>;

///
/// CompareOp
///
/// Comparators the native store understands.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    #[must_use]
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

///
/// NativeFilter
///
/// One compiled predicate. Identifier equality is routed to the key,
/// everything else compares a named property.
///

#[derive(Clone, Debug, PartialEq)]
pub enum NativeFilter {
    Field {
        name: String,
        op: CompareOp,
        value: Value,
    },
    KeyEquals {
        id: RecordId,
    },
}

///
/// ContinuationToken
///
/// Opaque resume point handed back by the store with a partial result.
/// Callers never inspect it; it goes back to the same store verbatim.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

///
/// NativeQuery
///
/// Fully compiled query, ready for a store port. `offset` applies to the
/// first execution only; once `start` is set, position comes from the
/// token.
///

#[derive(Clone, Debug, PartialEq)]
pub struct NativeQuery {
    pub collection: CollectionName,
    pub projection: Vec<String>,
    pub filters: Vec<NativeFilter>,
    pub order: Vec<(String, SortDirection)>,
    pub limit: Option<u32>,
    pub offset: u32,
    pub start: Option<ContinuationToken>,
}

///
/// RawRow
///
/// One stored row as the port returns it: complete key plus flat
/// properties, before any unpacking.
///

#[derive(Clone, Debug, PartialEq)]
pub struct RawRow {
    pub key: RecordKey,
    pub props: FlatProps,
}

///
/// QueryPage
///
/// One page of raw rows. A present continuation means the store may have
/// more rows; its absence means the result set is exhausted.
///

#[derive(Clone, Debug, PartialEq)]
pub struct QueryPage {
    pub rows: Vec<RawRow>,
    pub continuation: Option<ContinuationToken>,
}
