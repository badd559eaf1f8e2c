//! Editor session: the open / save / save-as actions of a text editor,
//! without any widgets.
//!
//! Every action goes through the [`Dispatcher`], and a failed action leaves
//! the session exactly as it was, so a front end can show the error and
//! carry on.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec::CodecError;
use crate::dispatch::Dispatcher;

pub const TITLE: &str = "File Editor";

#[derive(Error, Debug)]
pub enum SessionError {
    /// `save` was called before the buffer was ever bound to a file.
    #[error("No file name yet; use save-as")]
    NoPath,
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub struct Session<'a> {
    files:  Dispatcher<'a>,
    path:   Option<PathBuf>,
    buffer: String,
}

impl<'a> Session<'a> {
    pub fn new(files: Dispatcher<'a>) -> Self {
        Self { files, path: None, buffer: String::new() }
    }

    // ── Actions ──────────────────────────────────────────────────────────────

    /// Load `path` into the buffer and make it the current file.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        let path = path.as_ref();
        let text = self.files.read(path)?;
        self.buffer = text;
        self.path = Some(path.to_owned());
        tracing::info!(path = %path.display(), "opened");
        Ok(())
    }

    /// Write the buffer back to the current file.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let path = self.path.as_deref().ok_or(SessionError::NoPath)?;
        self.files.write(path, &self.buffer)?;
        tracing::info!(path = %path.display(), "saved");
        Ok(())
    }

    /// Write the buffer to `path`; on success `path` becomes the current file.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        let path = path.as_ref();
        self.files.write(path, &self.buffer)?;
        self.path = Some(path.to_owned());
        tracing::info!(path = %path.display(), "saved as");
        Ok(())
    }

    // ── State ────────────────────────────────────────────────────────────────

    pub fn text(&self) -> &str { &self.buffer }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub fn path(&self) -> Option<&Path> { self.path.as_deref() }

    pub fn title(&self) -> String {
        match &self.path {
            Some(p) => format!("{TITLE} - {}", p.display()),
            None    => TITLE.to_owned(),
        }
    }
}
