//! JSON codec backed by `serde_json`.

use crate::error::{CodecError, CodecResult};
use crate::{Codec, CodecArgs};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Save argument selecting pretty output with the given indent width.
pub const INDENT_ARG: &str = "indent";

/// Encodes any serde type as JSON.
///
/// # Arguments
///
/// - save `indent`: number of spaces per nesting level (pretty output);
///   compact output when absent
///
/// Other keys are ignored.
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    /// Creates a JSON codec.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonCodec")
    }
}

fn indent_width(args: &CodecArgs) -> CodecResult<Option<usize>> {
    let Some(raw) = args.get(INDENT_ARG) else {
        return Ok(None);
    };
    match raw.parse::<usize>() {
        Ok(width) if width <= 16 => Ok(Some(width)),
        Ok(_) => Err(CodecError::invalid_option(INDENT_ARG, raw, "at most 16")),
        Err(_) => Err(CodecError::invalid_option(
            INDENT_ARG,
            raw,
            "expected a non-negative integer",
        )),
    }
}

impl<T> Codec for JsonCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    type Value = T;

    fn format(&self) -> &'static str {
        "JSON"
    }

    fn encode(&self, value: &T, args: &CodecArgs) -> CodecResult<Vec<u8>> {
        let result = match indent_width(args)? {
            None => serde_json::to_vec(value),
            Some(width) => {
                let indent = vec![b' '; width];
                let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
                let mut out = Vec::new();
                let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
                value.serialize(&mut serializer).map(|()| out)
            }
        };
        result.map_err(|e| CodecError::encoding_failed(e.to_string()))
    }

    fn decode(&self, bytes: &[u8], _args: &CodecArgs) -> CodecResult<T> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::decoding_failed(e.to_string()))
    }
}
