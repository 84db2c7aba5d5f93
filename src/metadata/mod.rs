//! Metadata envelope and its JSON document codec
//!
//! The binary trailer codec lives in `footer`; both produce and consume the
//! same [`MetadataEnvelope`].

mod envelope;
mod errors;
mod json;

pub use envelope::{MetadataEnvelope, AVRO_SCHEMA_KEY};
pub use errors::{MetadataError, MetadataResult, FOOTER_FIELD};
pub use json::MetadataJsonCodec;
