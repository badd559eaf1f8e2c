//! Raster images (`.png`, `.jpg`, `.jpeg`).
//!
//! Images have no text to extract.  Decoding returns a one-line summary:
//!
//! ```text
//! Image format: PNG, size: (640, 480), mode: RGBA
//! ```
//!
//! Encoding interprets the text as the path of another image and converts
//! that image into the target's format.

use std::path::Path;

use super::{require, Codec, CodecError, FormatId};
use crate::capability::{Capabilities, Engine};

pub struct ImageCodec;

impl Codec for ImageCodec {
    fn format(&self) -> FormatId { FormatId::Image }

    fn decode(&self, caps: &Capabilities, path: &Path) -> Result<String, CodecError> {
        require(caps, Engine::Image)?;
        engine::describe(path)
    }

    fn encode(&self, caps: &Capabilities, path: &Path, text: &str) -> Result<(), CodecError> {
        require(caps, Engine::Image)?;
        // Editors hand over their buffer with a trailing line break.
        let source = Path::new(text.trim_end_matches(|c| c == '\n' || c == '\r'));
        if !source.is_file() {
            return Err(CodecError::InvalidContent(format!(
                "for images, content must be the path of an existing image file (got {:?})",
                source.display().to_string(),
            )));
        }
        engine::convert(source, path)
    }
}

#[cfg(feature = "image")]
mod engine {
    use std::io::Cursor;
    use std::path::Path;

    use image::{ColorType, DynamicImage, ImageError, ImageFormat, ImageReader};

    use crate::atomic::write_atomic;
    use crate::codec::{CodecError, FormatId};

    pub(super) fn describe(path: &Path) -> Result<String, CodecError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| CodecError::malformed(FormatId::Image, "unrecognized image format"))?;
        let img = reader.decode().map_err(decode_error)?;
        Ok(format!(
            "Image format: {}, size: ({}, {}), mode: {}",
            format_name(format),
            img.width(),
            img.height(),
            mode_name(img.color()),
        ))
    }

    pub(super) fn convert(source: &Path, target: &Path) -> Result<(), CodecError> {
        let img = ImageReader::open(source)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| CodecError::InvalidContent(format!("{}: {e}", source.display())))?
            .decode()
            .map_err(|e| CodecError::InvalidContent(format!("{} is not an image: {e}", source.display())))?;

        let ext = target
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let format = ImageFormat::from_extension(&ext).ok_or_else(|| {
            CodecError::InvalidContent(format!("no image encoder for {}", target.display()))
        })?;
        let img = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
            _ => img,
        };

        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format)
            .map_err(|e| CodecError::InvalidContent(e.to_string()))?;
        tracing::debug!(source = %source.display(), ?format, "re-encoded image");
        Ok(write_atomic(target, out.get_ref())?)
    }

    fn decode_error(err: ImageError) -> CodecError {
        match err {
            ImageError::IoError(e) => CodecError::Io(e),
            other => CodecError::malformed(FormatId::Image, other),
        }
    }

    pub(super) fn format_name(format: ImageFormat) -> String {
        format!("{format:?}").to_uppercase()
    }

    /// Conventional short names for pixel layouts.
    pub(super) fn mode_name(color: ColorType) -> String {
        match color {
            ColorType::L8    => "L".into(),
            ColorType::L16   => "I;16".into(),
            ColorType::La8 | ColorType::La16 => "LA".into(),
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => "RGB".into(),
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => "RGBA".into(),
            other => format!("{other:?}"),
        }
    }
}

#[cfg(not(feature = "image"))]
mod engine {
    use std::path::Path;

    use crate::capability::Engine;
    use crate::codec::CodecError;

    pub(super) fn describe(_: &Path) -> Result<String, CodecError> {
        Err(CodecError::missing(Engine::Image))
    }

    pub(super) fn convert(_: &Path, _: &Path) -> Result<(), CodecError> {
        Err(CodecError::missing(Engine::Image))
    }
}
