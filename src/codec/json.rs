use std::path::Path;

use serde_json::Value;

use super::{read_utf8, Codec, CodecError, FormatId};
use crate::atomic::write_atomic;
use crate::capability::Capabilities;

/// JSON, canonicalized on both read and write.
///
/// The canonical form is `serde_json`'s pretty printer: two-space indent,
/// non-ASCII kept literally, object keys in source order, numbers with
/// their original digits, no trailing newline.  Decoding therefore also
/// proves the file parses.
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> FormatId { FormatId::Json }

    fn decode(&self, _: &Capabilities, path: &Path) -> Result<String, CodecError> {
        canonicalize(&read_utf8(path, FormatId::Json)?)
    }

    fn encode(&self, _: &Capabilities, path: &Path, text: &str) -> Result<(), CodecError> {
        let canonical = canonicalize(text)?;
        Ok(write_atomic(path, canonical.as_bytes())?)
    }
}

fn canonicalize(text: &str) -> Result<String, CodecError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CodecError::malformed(FormatId::Json, e))?;
    serde_json::to_string_pretty(&value)
        .map_err(|e| CodecError::malformed(FormatId::Json, e))
}
