//! Core runtime for Floe: values, records, the query compiler, the
//! codec, store ports, and the session surface exported via the
//! `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod codec;
pub mod config;
pub mod error;
pub mod key;
pub mod obs;
pub mod port;
pub mod query;
pub mod record;
pub mod response;
pub mod session;
pub mod types;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, ports, codecs, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        key::CollectionName,
        query::{FilterSpec, PageSpec, ProjectionSpec, QuerySpec, SortSpec},
        record::{ID_FIELD, Record, RecordId},
        session::{Collection, Datastore, Pages},
        types::Timestamp,
        value::Value,
    };
}
