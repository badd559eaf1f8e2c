//! Format codecs: one decode/encode pair per file family.
//!
//! # Selection policy
//! Every codec starts with the same check against the injected
//! [`Capabilities`]:
//!   1. preferred engine present → use it;
//!   2. otherwise a built-in fallback, if the family has one (plain text,
//!      JSON and delimited text only);
//!   3. otherwise [`CodecError::MissingDependency`].
//!
//! # Text
//! Decoders always return one UTF-8 string.  Encoders render the complete
//! output in memory and hand it to [`crate::atomic::write_atomic`], so a
//! failing encoder never leaves a half-written target behind.

use std::fmt;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::capability::{Capabilities, Engine};

mod delimited;
mod document;
mod json;
mod pdf;
mod raster;
mod spreadsheet;
mod text;
mod yaml;

pub use delimited::CsvCodec;
pub use document::DocxCodec;
pub use json::JsonCodec;
pub use pdf::PdfCodec;
pub use raster::ImageCodec;
pub use spreadsheet::SpreadsheetCodec;
pub use text::PlainTextCodec;
pub use yaml::YamlCodec;

// ── FormatId ─────────────────────────────────────────────────────────────────

/// File family discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatId {
    PlainText,
    Json,
    Csv,
    Yaml,
    Spreadsheet,
    Pdf,
    Document,
    Image,
}

impl FormatId {
    pub const ALL: [FormatId; 8] = [
        FormatId::PlainText,
        FormatId::Json,
        FormatId::Csv,
        FormatId::Yaml,
        FormatId::Spreadsheet,
        FormatId::Pdf,
        FormatId::Document,
        FormatId::Image,
    ];

    /// Human-readable name (diagnostics only, never parsed).
    pub fn name(self) -> &'static str {
        match self {
            FormatId::PlainText   => "text",
            FormatId::Json        => "json",
            FormatId::Csv         => "csv",
            FormatId::Yaml        => "yaml",
            FormatId::Spreadsheet => "spreadsheet",
            FormatId::Pdf         => "pdf",
            FormatId::Document    => "docx",
            FormatId::Image       => "image",
        }
    }

    /// Engine the family prefers when it is available.
    pub fn engine(self) -> Option<Engine> {
        match self {
            FormatId::PlainText | FormatId::Json => None,
            FormatId::Csv | FormatId::Spreadsheet => Some(Engine::Tabular),
            FormatId::Yaml     => Some(Engine::Yaml),
            FormatId::Pdf      => Some(Engine::Pdf),
            FormatId::Document => Some(Engine::Docx),
            FormatId::Image    => Some(Engine::Image),
        }
    }

    /// Every engine an encode needs, in the order they are checked.
    pub fn write_engines(self) -> &'static [Engine] {
        match self {
            FormatId::PlainText | FormatId::Json => &[],
            FormatId::Csv | FormatId::Spreadsheet => &[Engine::Tabular],
            FormatId::Yaml     => &[Engine::Yaml],
            FormatId::Pdf      => &[Engine::Pdf, Engine::PdfWriter],
            FormatId::Document => &[Engine::Docx],
            FormatId::Image    => &[Engine::Image],
        }
    }

    /// Does the family still work with no optional engine?
    pub fn has_fallback(self) -> bool {
        matches!(self, FormatId::PlainText | FormatId::Json | FormatId::Csv)
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Fieldless mirror of [`CodecError`] for matching without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFormat,
    MissingDependency,
    MalformedInput,
    InvalidContent,
    Io,
}

/// Every failure a read or write can end in.  None of them is transient.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unsupported file extension: {extension:?}")]
    UnsupportedFormat { extension: String },
    /// The engine the operation needs is absent or disabled.
    #[error("{engine} ({crates}) is required for this file type but is not available: \
             it was disabled at run time or built without the `{feature}` feature",
            crates = .engine.crates(), feature = .engine.feature())]
    MissingDependency { engine: Engine },
    #[error("Malformed {format} input: {message}")]
    MalformedInput { format: FormatId, message: String },
    #[error("Invalid content: {0}")]
    InvalidContent(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            CodecError::MissingDependency { .. } => ErrorKind::MissingDependency,
            CodecError::MalformedInput { .. }    => ErrorKind::MalformedInput,
            CodecError::InvalidContent(_)        => ErrorKind::InvalidContent,
            CodecError::Io(_)                    => ErrorKind::Io,
        }
    }

    pub(crate) fn missing(engine: Engine) -> Self {
        CodecError::MissingDependency { engine }
    }

    pub(crate) fn malformed(format: FormatId, err: impl fmt::Display) -> Self {
        CodecError::MalformedInput { format, message: err.to_string() }
    }
}

// ── Codec trait ──────────────────────────────────────────────────────────────

/// A decode/encode pair.  Both directions are mandatory, so a registered
/// extension can always be read and written (even if one side only reports
/// a missing engine).
pub trait Codec: Send + Sync {
    fn format(&self) -> FormatId;
    fn decode(&self, caps: &Capabilities, path: &Path) -> Result<String, CodecError>;
    fn encode(&self, caps: &Capabilities, path: &Path, text: &str) -> Result<(), CodecError>;
}

impl fmt::Debug for dyn Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Codec({})", self.format())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Fail with `MissingDependency` unless `engine` is available.
pub(crate) fn require(caps: &Capabilities, engine: Engine) -> Result<(), CodecError> {
    if caps.has(engine) {
        Ok(())
    } else {
        Err(CodecError::missing(engine))
    }
}

/// Read a whole file as UTF-8, reporting invalid bytes as malformed input.
pub(crate) fn read_utf8(path: &Path, format: FormatId) -> Result<String, CodecError> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| CodecError::malformed(format, e))
}

// ── Factory ──────────────────────────────────────────────────────────────────

/// Resolve a family to its codec.
pub fn get_codec(id: FormatId) -> &'static dyn Codec {
    match id {
        FormatId::PlainText   => &PlainTextCodec,
        FormatId::Json        => &JsonCodec,
        FormatId::Csv         => &CsvCodec,
        FormatId::Yaml        => &YamlCodec,
        FormatId::Spreadsheet => &SpreadsheetCodec,
        FormatId::Pdf         => &PdfCodec,
        FormatId::Document    => &DocxCodec,
        FormatId::Image       => &ImageCodec,
    }
}
