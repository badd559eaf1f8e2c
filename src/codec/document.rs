//! Word-processor documents (`.docx`).
//!
//! Reading keeps only the plain text of top-level paragraphs, one line per
//! paragraph; tables, images and styling are dropped.  Writing creates one
//! unstyled paragraph per input line.

use std::path::Path;

use super::{require, Codec, CodecError, FormatId};
use crate::atomic::write_atomic;
use crate::capability::{Capabilities, Engine};

pub struct DocxCodec;

impl Codec for DocxCodec {
    fn format(&self) -> FormatId { FormatId::Document }

    fn decode(&self, caps: &Capabilities, path: &Path) -> Result<String, CodecError> {
        require(caps, Engine::Docx)?;
        let bytes = std::fs::read(path)?;
        engine::extract(&bytes)
    }

    fn encode(&self, caps: &Capabilities, path: &Path, text: &str) -> Result<(), CodecError> {
        require(caps, Engine::Docx)?;
        let bytes = engine::build(text)?;
        Ok(write_atomic(path, &bytes)?)
    }
}

#[cfg(feature = "docx")]
mod engine {
    use std::io::{self, Cursor};

    use docx_rs::{read_docx, DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild};

    use crate::codec::{CodecError, FormatId};

    pub(super) fn extract(bytes: &[u8]) -> Result<String, CodecError> {
        let docx = read_docx(bytes).map_err(|e| CodecError::malformed(FormatId::Document, e))?;
        let lines: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
                _ => None,
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn paragraph_text(p: &Paragraph) -> String {
        let mut out = String::new();
        for child in &p.children {
            if let ParagraphChild::Run(run) = child {
                for piece in &run.children {
                    match piece {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_)  => out.push('\t'),
                        _ => {}
                    }
                }
            }
        }
        out
    }

    pub(super) fn build(text: &str) -> Result<Vec<u8>, CodecError> {
        let docx = text.lines().fold(Docx::new(), |docx, line| {
            docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)))
        });

        let mut out = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut out)
            .map_err(|e| CodecError::Io(io::Error::new(io::ErrorKind::Other, e.to_string())))?;
        Ok(out.into_inner())
    }
}

#[cfg(not(feature = "docx"))]
mod engine {
    use crate::capability::Engine;
    use crate::codec::CodecError;

    pub(super) fn extract(_: &[u8]) -> Result<String, CodecError> {
        Err(CodecError::missing(Engine::Docx))
    }

    pub(super) fn build(_: &str) -> Result<Vec<u8>, CodecError> {
        Err(CodecError::missing(Engine::Docx))
    }
}
