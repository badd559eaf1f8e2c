//! Extension → codec table.
//!
//! The table is fixed at compile time and is the only place that decides
//! which extensions are supported.  Keys are lowercase and carry the leading
//! dot.  A miss is a normal `None` here; the dispatcher turns it into
//! [`CodecError::UnsupportedFormat`](crate::codec::CodecError::UnsupportedFormat).

use std::path::Path;

use serde::Serialize;

use crate::capability::Capabilities;
use crate::codec::{get_codec, Codec, FormatId};

/// Every supported extension, in display order.
pub const EXTENSIONS: [(&str, FormatId); 12] = [
    (".txt",  FormatId::PlainText),
    (".json", FormatId::Json),
    (".csv",  FormatId::Csv),
    (".yaml", FormatId::Yaml),
    (".yml",  FormatId::Yaml),
    (".xls",  FormatId::Spreadsheet),
    (".xlsx", FormatId::Spreadsheet),
    (".pdf",  FormatId::Pdf),
    (".docx", FormatId::Document),
    (".png",  FormatId::Image),
    (".jpg",  FormatId::Image),
    (".jpeg", FormatId::Image),
];

/// `".ext"` in lowercase, or `""` when the path has no extension.
pub fn normalize_extension(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy().to_lowercase()),
        None => String::new(),
    }
}

/// Family registered for `extension` (case-insensitive, dot required).
pub fn format_for(extension: &str) -> Option<FormatId> {
    match extension.to_ascii_lowercase().as_str() {
        ".txt"            => Some(FormatId::PlainText),
        ".json"           => Some(FormatId::Json),
        ".csv"            => Some(FormatId::Csv),
        ".yaml" | ".yml"  => Some(FormatId::Yaml),
        ".xls" | ".xlsx"  => Some(FormatId::Spreadsheet),
        ".pdf"            => Some(FormatId::Pdf),
        ".docx"           => Some(FormatId::Document),
        ".png" | ".jpg" | ".jpeg" => Some(FormatId::Image),
        _                 => None,
    }
}

pub fn lookup(extension: &str) -> Option<&'static dyn Codec> {
    format_for(extension).map(get_codec)
}

/// All registered extensions with their codecs.
pub fn entries() -> impl Iterator<Item = (&'static str, &'static dyn Codec)> {
    EXTENSIONS.into_iter().map(|(ext, id)| (ext, get_codec(id)))
}

// ── Listing ──────────────────────────────────────────────────────────────────

/// One row of the `formats` listing.
#[derive(Debug, Clone, Serialize)]
pub struct FormatInfo {
    pub extension: &'static str,
    pub format:    &'static str,
    /// Preferred engine, if the family has one.
    pub engine:    Option<&'static str>,
    pub fallback:  bool,
    /// Can a file of this kind be decoded with the given capabilities?
    pub readable:  bool,
    /// Can one be encoded?  PDF output needs a second engine.
    pub writable:  bool,
}

pub fn describe(caps: &Capabilities) -> Vec<FormatInfo> {
    EXTENSIONS
        .into_iter()
        .map(|(extension, id)| FormatInfo {
            extension,
            format:    id.name(),
            engine:    id.engine().map(|e| e.name()),
            fallback:  id.has_fallback(),
            readable:  id.has_fallback() || id.engine().map_or(true, |e| caps.has(e)),
            writable:  id.has_fallback() || id.write_engines().iter().all(|e| caps.has(*e)),
        })
        .collect()
}
