//! # Snapset Codec
//!
//! Encode/decode pairs for Snapset datasets.
//!
//! A [`Codec`] turns an in-memory value into bytes and back. It knows
//! nothing about where the bytes live: the dataset layer hands encoded
//! bytes to a storage backend and feeds read bytes back through the codec.
//!
//! ## Available Codecs
//!
//! - [`JsonCodec`] - Any serde type as JSON (`serde_json`)
//! - [`CborCodec`] - Any serde type as CBOR (`ciborium`)
//! - [`TextCodec`] - UTF-8 text
//! - [`RawCodec`] - Bytes passed through untouched
//!
//! ## Load and save arguments
//!
//! Every call receives a [`CodecArgs`] map configured on the dataset. The
//! map is opaque to the dataset; each codec documents the keys it reads and
//! ignores the rest.
//!
//! ## Usage
//!
//! ```
//! use snapset_codec::{Codec, CodecArgs, JsonCodec};
//! use std::collections::BTreeMap;
//!
//! let codec = JsonCodec::<BTreeMap<String, i64>>::new();
//! let value = BTreeMap::from([("col1".to_string(), 1)]);
//!
//! let bytes = codec.encode(&value, &CodecArgs::new()).unwrap();
//! let decoded = codec.decode(&bytes, &CodecArgs::new()).unwrap();
//! assert_eq!(value, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cbor;
mod error;
mod json;
mod text;

use std::collections::BTreeMap;

pub use cbor::CborCodec;
pub use error::{CodecError, CodecResult};
pub use json::JsonCodec;
pub use text::{RawCodec, TextCodec};

/// Opaque per-dataset arguments handed to every encode/decode call.
pub type CodecArgs = BTreeMap<String, String>;

/// A format-specific encode/decode pair.
///
/// Implementations must be deterministic in the sense that
/// `decode(encode(v)) == v` for every value they accept.
pub trait Codec: Send + Sync {
    /// The in-memory type this codec produces and consumes.
    type Value;

    /// Short, upper-case format name used in dataset type names
    /// (`"JSON"`, `"CBOR"`, ...).
    fn format(&self) -> &'static str;

    /// Encodes `value` to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented in this format
    /// or an argument is invalid.
    fn encode(&self, value: &Self::Value, args: &CodecArgs) -> CodecResult<Vec<u8>>;

    /// Decodes bytes previously produced by [`Codec::encode`].
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are malformed for this format.
    fn decode(&self, bytes: &[u8], args: &CodecArgs) -> CodecResult<Self::Value>;
}

impl<C: Codec + ?Sized> Codec for std::sync::Arc<C> {
    type Value = C::Value;

    fn format(&self) -> &'static str {
        (**self).format()
    }

    fn encode(&self, value: &Self::Value, args: &CodecArgs) -> CodecResult<Vec<u8>> {
        (**self).encode(value, args)
    }

    fn decode(&self, bytes: &[u8], args: &CodecArgs) -> CodecResult<Self::Value> {
        (**self).decode(bytes, args)
    }
}
