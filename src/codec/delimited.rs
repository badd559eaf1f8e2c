//! Comma-separated tables.
//!
//! With the tabular engine the grid is re-parsed with full quote handling
//! and re-emitted with minimal quoting, `\n` terminators and the first
//! record as the single header row.
//!
//! Without it a naive fallback splits rows on newlines and fields on commas.
//! Quoted fields containing commas or line breaks are NOT understood by the
//! fallback: `x,"a, b"` is three fields to it.  The text itself still
//! round-trips because the fallback never rewrites field contents.

use std::path::Path;

use super::{read_utf8, Codec, CodecError, FormatId};
use crate::atomic::write_atomic;
use crate::capability::{Capabilities, Engine};

pub struct CsvCodec;

impl Codec for CsvCodec {
    fn format(&self) -> FormatId { FormatId::Csv }

    fn decode(&self, caps: &Capabilities, path: &Path) -> Result<String, CodecError> {
        let raw = read_utf8(path, FormatId::Csv)?;
        if caps.has(Engine::Tabular) {
            engine::reformat(&raw)
        } else {
            tracing::warn!(engine = %Engine::Tabular, "engine unavailable, splitting CSV naively");
            Ok(fallback::decode(&raw))
        }
    }

    fn encode(&self, caps: &Capabilities, path: &Path, text: &str) -> Result<(), CodecError> {
        let out = if caps.has(Engine::Tabular) {
            engine::reformat(text)?
        } else {
            tracing::warn!(engine = %Engine::Tabular, "engine unavailable, joining CSV naively");
            fallback::encode(text)
        };
        Ok(write_atomic(path, out.as_bytes())?)
    }
}

// ── Engine ───────────────────────────────────────────────────────────────────

#[cfg(feature = "tabular")]
pub(super) mod engine {
    use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

    use crate::codec::{CodecError, FormatId};

    /// Parse quote-aware CSV into rows.  Every row must be as wide as the
    /// header row.
    pub(crate) fn parse_grid(text: &str) -> Result<Vec<Vec<String>>, CodecError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(text.as_bytes());
        reader
            .records()
            .map(|rec| {
                rec.map(|r| r.iter().map(str::to_owned).collect())
                    .map_err(|e| CodecError::malformed(FormatId::Csv, e))
            })
            .collect()
    }

    /// Emit rows with minimal quoting and `\n` line ends.
    pub(crate) fn render_grid<R, F>(rows: R) -> Result<String, CodecError>
    where
        R: IntoIterator<Item = F>,
        F: IntoIterator,
        F::Item: AsRef<[u8]>,
    {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(Vec::new());
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| CodecError::malformed(FormatId::Csv, e))?;
        }
        let bytes = writer.into_inner().map_err(|e| CodecError::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| CodecError::malformed(FormatId::Csv, e))
    }

    pub(crate) fn reformat(text: &str) -> Result<String, CodecError> {
        render_grid(parse_grid(text)?)
    }
}

#[cfg(not(feature = "tabular"))]
pub(super) mod engine {
    use crate::capability::Engine;
    use crate::codec::CodecError;

    pub(crate) fn reformat(_: &str) -> Result<String, CodecError> {
        Err(CodecError::missing(Engine::Tabular))
    }
}

// ── Fallback ─────────────────────────────────────────────────────────────────

mod fallback {
    pub(super) fn split_rows(text: &str) -> Vec<Vec<&str>> {
        text.lines().map(|line| line.split(',').collect()).collect()
    }

    fn join_rows(rows: &[Vec<&str>]) -> String {
        rows.iter().map(|row| row.join(",")).collect::<Vec<_>>().join("\n")
    }

    /// Rows joined by `\n`, no trailing newline.
    pub(super) fn decode(raw: &str) -> String {
        join_rows(&split_rows(raw))
    }

    /// Rows joined by `\n`, newline-terminated.
    pub(super) fn encode(text: &str) -> String {
        let mut out = join_rows(&split_rows(text));
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}
