//! Spreadsheets (`.xls`, `.xlsx`), exchanged as CSV text.
//!
//! Only the first sheet is read.  Writes always produce a single-sheet
//! OOXML workbook, whatever the target extension; reads detect the
//! container from the file content, so a `.xls` written here reads back.

use std::path::Path;

use super::{require, Codec, CodecError, FormatId};
use crate::capability::{Capabilities, Engine};

pub struct SpreadsheetCodec;

impl Codec for SpreadsheetCodec {
    fn format(&self) -> FormatId { FormatId::Spreadsheet }

    fn decode(&self, caps: &Capabilities, path: &Path) -> Result<String, CodecError> {
        require(caps, Engine::Tabular)?;
        engine::decode(path)
    }

    fn encode(&self, caps: &Capabilities, path: &Path, text: &str) -> Result<(), CodecError> {
        require(caps, Engine::Tabular)?;
        engine::encode(path, text)
    }
}

#[cfg(feature = "tabular")]
mod engine {
    use std::io::Cursor;
    use std::path::Path;

    use calamine::{open_workbook_auto_from_rs, Data, Reader};
    use chrono::{NaiveDateTime, Timelike};
    use rust_xlsxwriter::{Workbook, XlsxError};

    use crate::atomic::write_atomic;
    use crate::codec::delimited::engine::{parse_grid, render_grid};
    use crate::codec::{CodecError, FormatId};

    const SHEET_NAME: &str = "Sheet1";

    pub(super) fn decode(path: &Path) -> Result<String, CodecError> {
        let bytes = std::fs::read(path)?;
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| CodecError::malformed(FormatId::Spreadsheet, e))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(|e| CodecError::malformed(FormatId::Spreadsheet, e))?,
            None => return Ok(String::new()),
        };
        render_grid(range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>()))
    }

    fn cell_text(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
                Some(dt) => iso_datetime(dt),
                None => cell.to_string(),
            },
            other => other.to_string(),
        }
    }

    /// `2023-03-15` for whole days, `2023-03-15 08:30:00` otherwise.
    fn iso_datetime(dt: NaiveDateTime) -> String {
        if dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 {
            dt.format("%Y-%m-%d").to_string()
        } else {
            dt.format("%Y-%m-%d %H:%M:%S").to_string()
        }
    }

    pub(super) fn encode(path: &Path, text: &str) -> Result<(), CodecError> {
        let rows = parse_grid(text)?;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME).map_err(invalid)?;

        for (r, row) in rows.iter().enumerate() {
            let r = u32::try_from(r)
                .map_err(|_| CodecError::InvalidContent("too many rows for a worksheet".into()))?;
            for (c, cell) in row.iter().enumerate() {
                let c = u16::try_from(c)
                    .map_err(|_| CodecError::InvalidContent("too many columns for a worksheet".into()))?;
                if cell.is_empty() {
                    continue;
                }
                // The header row stays textual; body cells that parse as
                // numbers are stored as numbers.
                let number = if r > 0 { cell.parse::<f64>().ok().filter(|n| n.is_finite()) } else { None };
                let written = match number {
                    Some(n) => sheet.write_number(r, c, n),
                    None    => sheet.write_string(r, c, cell),
                };
                written.map_err(invalid)?;
            }
        }

        let bytes = workbook.save_to_buffer().map_err(invalid)?;
        Ok(write_atomic(path, &bytes)?)
    }

    fn invalid(err: XlsxError) -> CodecError {
        CodecError::InvalidContent(err.to_string())
    }
}

#[cfg(not(feature = "tabular"))]
mod engine {
    use std::path::Path;

    use crate::capability::Engine;
    use crate::codec::CodecError;

    pub(super) fn decode(_: &Path) -> Result<String, CodecError> {
        Err(CodecError::missing(Engine::Tabular))
    }

    pub(super) fn encode(_: &Path, _: &str) -> Result<(), CodecError> {
        Err(CodecError::missing(Engine::Tabular))
    }
}
