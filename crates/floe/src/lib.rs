//! ## Crate layout
//! - `core`: runtime values, records, query compilation, codec, ports,
//!   and the paginated session surface.
//! - `error`: the public error taxonomy wrapped around core errors.
//!
//! The `prelude` module mirrors the surface used by service code.

pub use floe_core as core;

pub mod error;

pub use error::{Error, ErrorKind, ErrorOrigin};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Service Prelude
///

pub mod prelude {
    pub use crate::{
        Error, ErrorKind, ErrorOrigin,
        core::{
            key::CollectionName,
            port::{MemoryStore, StorePort},
            query::{
                FilterSpec, PageSpec, ProjectionSpec, QuerySpec, RangeOp, SortDirection, SortSpec,
            },
            record::{ID_FIELD, Record, RecordId},
            response::Response,
            session::{Collection, Datastore, Pages},
            types::Timestamp,
            value::Value,
        },
    };
}
