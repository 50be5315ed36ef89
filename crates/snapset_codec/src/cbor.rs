//! CBOR codec backed by `ciborium`.

use crate::error::{CodecError, CodecResult};
use crate::{Codec, CodecArgs};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Encodes any serde type as CBOR.
///
/// Takes no arguments; all keys are ignored.
pub struct CborCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> CborCodec<T> {
    /// Creates a CBOR codec.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for CborCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CborCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for CborCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CborCodec")
    }
}

impl<T> Codec for CborCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    type Value = T;

    fn format(&self) -> &'static str {
        "CBOR"
    }

    fn encode(&self, value: &T, _args: &CodecArgs) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        ciborium::into_writer(value, &mut out)
            .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], _args: &CodecArgs) -> CodecResult<T> {
        ciborium::from_reader(bytes).map_err(|e| CodecError::decoding_failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    #[test]
    fn small_integer_encodes_in_one_byte() {
        let codec = CborCodec::<u8>::new();
        assert_eq!(codec.encode(&7, &CodecArgs::new()).unwrap(), vec![0x07]);
    }

    #[test]
    fn truncated_input_fails() {
        let codec = CborCodec::<String>::new();
        let mut bytes = codec
            .encode(&"hello world".to_string(), &CodecArgs::new())
            .unwrap();
        bytes.truncate(4);
        let err = codec.decode(&bytes, &CodecArgs::new()).unwrap_err();
        assert!(matches!(err, CodecError::DecodingFailed { .. }));
    }

    #[test]
    fn wrong_type_fails() {
        let bytes = CborCodec::<String>::new()
            .encode(&"text".to_string(), &CodecArgs::new())
            .unwrap();
        assert!(CborCodec::<i64>::new()
            .decode(&bytes, &CodecArgs::new())
            .is_err());
    }

    proptest! {
        #[test]
        fn table_survives(table in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..16)) {
            let codec = CborCodec::<BTreeMap<String, i64>>::new();
            let bytes = codec.encode(&table, &CodecArgs::new()).unwrap();
            prop_assert_eq!(codec.decode(&bytes, &CodecArgs::new()).unwrap(), table);
        }
    }
}
