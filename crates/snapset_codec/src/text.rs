//! Text and raw byte codecs.

use crate::error::{CodecError, CodecResult};
use crate::{Codec, CodecArgs};

/// Argument naming the text encoding. Only `utf-8` is supported.
pub const ENCODING_ARG: &str = "encoding";

fn check_encoding(args: &CodecArgs) -> CodecResult<()> {
    match args.get(ENCODING_ARG) {
        None => Ok(()),
        Some(enc) if enc.eq_ignore_ascii_case("utf-8") || enc.eq_ignore_ascii_case("utf8") => {
            Ok(())
        }
        Some(enc) => Err(CodecError::invalid_option(
            ENCODING_ARG,
            enc,
            "only utf-8 is supported",
        )),
    }
}

/// Stores a `String` as UTF-8 bytes.
///
/// # Arguments
///
/// - load/save `encoding`: must be `utf-8` when present
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec for TextCodec {
    type Value = String;

    fn format(&self) -> &'static str {
        "Text"
    }

    fn encode(&self, value: &String, args: &CodecArgs) -> CodecResult<Vec<u8>> {
        check_encoding(args)?;
        Ok(value.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8], args: &CodecArgs) -> CodecResult<String> {
        check_encoding(args)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::decoding_failed(e.to_string()))
    }
}

/// Passes bytes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl Codec for RawCodec {
    type Value = Vec<u8>;

    fn format(&self) -> &'static str {
        "Raw"
    }

    fn encode(&self, value: &Vec<u8>, _args: &CodecArgs) -> CodecResult<Vec<u8>> {
        Ok(value.clone())
    }

    fn decode(&self, bytes: &[u8], _args: &CodecArgs) -> CodecResult<Vec<u8>> {
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rejects_invalid_utf8() {
        let err = TextCodec.decode(&[0xff, 0xfe], &CodecArgs::new()).unwrap_err();
        assert!(matches!(err, CodecError::DecodingFailed { .. }));
    }

    #[test]
    fn text_encoding_argument() {
        let utf8 = CodecArgs::from([(ENCODING_ARG.to_string(), "UTF-8".to_string())]);
        assert_eq!(TextCodec.encode(&"hé".to_string(), &utf8).unwrap(), "hé".as_bytes());

        let latin = CodecArgs::from([(ENCODING_ARG.to_string(), "latin-1".to_string())]);
        assert!(matches!(
            TextCodec.encode(&"x".to_string(), &latin),
            Err(CodecError::InvalidOption { .. })
        ));
    }

    #[test]
    fn raw_is_identity() {
        let data = vec![0u8, 1, 2, 255];
        let bytes = RawCodec.encode(&data, &CodecArgs::new()).unwrap();
        assert_eq!(bytes, data);
        assert_eq!(RawCodec.decode(&bytes, &CodecArgs::new()).unwrap(), data);
        assert_eq!(RawCodec.format(), "Raw");
    }
}
