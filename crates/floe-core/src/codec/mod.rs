//! Module: codec
//! Responsibility: translate between caller-facing records (nested
//! values) and the flat property rows the store holds, packing nested
//! values through JSON text.
//! Does not own: key derivation rules beyond the identifier field, store
//! transport.
//! Boundary: encode and decode are pure; a packed row always names its
//! packed fields in the sidecar so decode never guesses.

mod decode;
mod encode;

pub use decode::{DecodeError, decode_row, decode_rows};
pub use encode::{EncodeError, encode};

/// Reserved sidecar property listing the packed field names of a row.
/// Written on encode, consumed on decode, never surfaced in records.
pub const PACKED_FIELD: &str = "__packed__";
