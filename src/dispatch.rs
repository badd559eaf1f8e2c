//! High-level [`Dispatcher`] API, the surface the CLI and the editor use.
//!
//! ```no_run
//! use filetext::dispatch::Dispatcher;
//!
//! let files = Dispatcher::new();
//! let text = files.read("table.csv")?;
//! files.write("table.csv", &text)?;
//! # Ok::<(), filetext::CodecError>(())
//! ```

use std::path::Path;

use crate::capability::Capabilities;
use crate::codec::{Codec, CodecError};
use crate::registry::{lookup, normalize_extension};

/// Routes reads and writes to the codec registered for a path's extension.
///
/// Errors from codecs are returned unchanged; nothing is retried.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    caps: &'a Capabilities,
}

impl Dispatcher<'static> {
    /// Dispatcher using the process-wide detected capabilities.
    pub fn new() -> Self {
        Self { caps: Capabilities::detected() }
    }
}

impl Default for Dispatcher<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Dispatcher<'a> {
    pub fn with_capabilities(caps: &'a Capabilities) -> Self {
        Self { caps }
    }

    pub fn capabilities(&self) -> &'a Capabilities {
        self.caps
    }

    /// Codec for `path`, or `UnsupportedFormat`.
    pub fn resolve(&self, path: &Path) -> Result<&'static dyn Codec, CodecError> {
        let extension = normalize_extension(path);
        lookup(&extension).ok_or(CodecError::UnsupportedFormat { extension })
    }

    /// Decode `path` into text.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<String, CodecError> {
        let path = path.as_ref();
        let codec = self.resolve(path)?;
        tracing::debug!(path = %path.display(), format = %codec.format(), "decoding");
        codec.decode(self.caps, path)
    }

    /// Encode `text` into `path`, replacing any previous content.
    pub fn write<P: AsRef<Path>>(&self, path: P, text: &str) -> Result<(), CodecError> {
        let path = path.as_ref();
        let codec = self.resolve(path)?;
        tracing::debug!(path = %path.display(), format = %codec.format(), len = text.len(), "encoding");
        codec.encode(self.caps, path, text)
    }
}

/// [`Dispatcher::read`] with the detected capabilities.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String, CodecError> {
    Dispatcher::new().read(path)
}

/// [`Dispatcher::write`] with the detected capabilities.
pub fn write_file<P: AsRef<Path>>(path: P, text: &str) -> Result<(), CodecError> {
    Dispatcher::new().write(path, text)
}
