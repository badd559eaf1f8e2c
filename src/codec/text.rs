use std::path::Path;

use super::{read_utf8, Codec, CodecError, FormatId};
use crate::atomic::write_atomic;
use crate::capability::Capabilities;

/// Raw UTF-8 passthrough.  Needs no engine.
pub struct PlainTextCodec;

impl Codec for PlainTextCodec {
    fn format(&self) -> FormatId { FormatId::PlainText }

    fn decode(&self, _: &Capabilities, path: &Path) -> Result<String, CodecError> {
        read_utf8(path, FormatId::PlainText)
    }

    fn encode(&self, _: &Capabilities, path: &Path, text: &str) -> Result<(), CodecError> {
        Ok(write_atomic(path, text.as_bytes())?)
    }
}
