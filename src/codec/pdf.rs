//! PDF: text extraction on read, a minimal single-page text layout on write.
//!
//! Reading and writing use independent engines.  Writing checks the reading
//! engine first and the writer second, so a build without the reader cannot
//! produce PDFs it could not read back.
//!
//! Layout of written files: A4, 12 pt Helvetica, first baseline at
//! (40 pt, 800 pt), one input line every 14.4 pt.  There is no pagination;
//! lines that fall below the bottom edge of the page are lost.

use std::path::Path;

use super::{require, Codec, CodecError, FormatId};
use crate::atomic::write_atomic;
use crate::capability::{Capabilities, Engine};

pub struct PdfCodec;

impl Codec for PdfCodec {
    fn format(&self) -> FormatId { FormatId::Pdf }

    fn decode(&self, caps: &Capabilities, path: &Path) -> Result<String, CodecError> {
        require(caps, Engine::Pdf)?;
        reader::decode(path)
    }

    fn encode(&self, caps: &Capabilities, path: &Path, text: &str) -> Result<(), CodecError> {
        for engine in FormatId::Pdf.write_engines() {
            require(caps, *engine)?;
        }
        let bytes = writer::render(text)?;
        Ok(write_atomic(path, &bytes)?)
    }
}

// ── Reader ───────────────────────────────────────────────────────────────────

#[cfg(feature = "pdf")]
mod reader {
    use std::path::Path;

    use lopdf::Document;

    use crate::codec::{CodecError, FormatId};

    /// Page texts joined by `\n`; pages without text are skipped.
    pub(super) fn decode(path: &Path) -> Result<String, CodecError> {
        let bytes = std::fs::read(path)?;
        let doc = Document::load_mem(&bytes).map_err(|e| CodecError::malformed(FormatId::Pdf, e))?;

        let mut pages = Vec::new();
        for page_no in doc.get_pages().into_keys() {
            let text = match doc.extract_text(&[page_no]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(page = page_no, error = %e, "no extractable text");
                    continue;
                }
            };
            let text = text.trim_end_matches(|c| c == '\n' || c == '\r');
            if !text.trim().is_empty() {
                pages.push(text.to_owned());
            }
        }
        Ok(pages.join("\n"))
    }
}

#[cfg(not(feature = "pdf"))]
mod reader {
    use std::path::Path;

    use crate::capability::Engine;
    use crate::codec::CodecError;

    pub(super) fn decode(_: &Path) -> Result<String, CodecError> {
        Err(CodecError::missing(Engine::Pdf))
    }
}

// ── Writer ───────────────────────────────────────────────────────────────────

#[cfg(feature = "pdf-writer")]
mod writer {
    use std::io::{self, BufWriter};

    use printpdf::{BuiltinFont, Mm, PdfDocument};

    use crate::codec::CodecError;

    const PT_TO_MM:    f32 = 25.4 / 72.0;
    const PAGE_WIDTH:  f32 = 595.0;
    const PAGE_HEIGHT: f32 = 842.0;
    const ORIGIN_X:    f32 = 40.0;
    const ORIGIN_Y:    f32 = 800.0;
    const FONT_SIZE:   f32 = 12.0;
    const LEADING:     f32 = 14.4;

    fn mm(pt: f32) -> Mm {
        Mm(pt * PT_TO_MM)
    }

    pub(super) fn render(text: &str) -> Result<Vec<u8>, CodecError> {
        let (doc, page, layer) =
            PdfDocument::new("filetext", mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "text");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(engine_error)?;

        let layer = doc.get_page(page).get_layer(layer);
        layer.begin_text_section();
        layer.set_font(&font, FONT_SIZE);
        layer.set_line_height(LEADING);
        layer.set_text_cursor(mm(ORIGIN_X), mm(ORIGIN_Y));
        for line in text.lines() {
            layer.write_text(line, &font);
            layer.add_line_break();
        }
        layer.end_text_section();

        let mut out = BufWriter::new(Vec::new());
        doc.save(&mut out).map_err(engine_error)?;
        out.into_inner().map_err(|e| CodecError::Io(e.into_error()))
    }

    fn engine_error(err: impl std::fmt::Display) -> CodecError {
        CodecError::Io(io::Error::new(io::ErrorKind::Other, err.to_string()))
    }
}

#[cfg(not(feature = "pdf-writer"))]
mod writer {
    use crate::capability::Engine;
    use crate::codec::CodecError;

    pub(super) fn render(_: &str) -> Result<Vec<u8>, CodecError> {
        Err(CodecError::missing(Engine::PdfWriter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_needs_reader_engine_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let caps = Capabilities::none();

        let err = PdfCodec.encode(&caps, &path, "x").unwrap_err();
        assert!(matches!(err, CodecError::MissingDependency { engine: Engine::Pdf }));
        assert!(!path.exists());
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn write_without_writer_engine_is_missing_dependency() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let caps = Capabilities::detected().without(Engine::PdfWriter);

        let err = PdfCodec.encode(&caps, &path, "x").unwrap_err();
        assert!(matches!(err, CodecError::MissingDependency { engine: Engine::PdfWriter }));
    }

    #[cfg(all(feature = "pdf", feature = "pdf-writer"))]
    #[test]
    fn written_lines_are_extractable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.pdf");
        let caps = Capabilities::detected();

        PdfCodec.encode(caps, &path, "Hello\nWorld\n").unwrap();
        let text = PdfCodec.decode(caps, &path).unwrap();
        let squashed: String = text.split_whitespace().collect();
        assert!(squashed.contains("HelloWorld"), "{text:?}");
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn pages_without_text_are_skipped() {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for body in [None, Some("first"), None, Some("second")] {
            let operations = match body {
                Some(body) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![40.into(), 800.into()]),
                    Operation::new("Tj", vec![Object::string_literal(body)]),
                    Operation::new("ET", vec![]),
                ],
                None => Vec::new(),
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(pages_id, Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => 4,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let dir = tempdir().unwrap();
        let path = dir.path().join("sparse.pdf");
        doc.save(&path).unwrap();

        let text = PdfCodec.decode(Capabilities::detected(), &path).unwrap();
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        assert_eq!(lines, vec!["first", "second"]);
    }
}
