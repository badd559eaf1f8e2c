//! Whole-file replacement.
//!
//! The new content goes into a temporary file next to the target, which is
//! then renamed over it.  Readers see either the old file or the new one,
//! and a failure before the rename leaves the old file as it was.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;

/// Replace `path` with `bytes`.  An existing target keeps its permissions;
/// a new one gets the same mode `fs::write` would give it.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut builder = Builder::new();
    if existing.is_none() {
        default_mode(&mut builder);
    }
    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    if let Some(perms) = existing {
        tmp.as_file().set_permissions(perms)?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    tracing::trace!(path = %path.display(), len = bytes.len(), "replaced file");
    Ok(())
}

/// 0o666 before the process umask, instead of the 0o600 of temp files.
#[cfg(unix)]
fn default_mode(builder: &mut Builder) {
    use std::os::unix::fs::PermissionsExt;
    builder.permissions(fs::Permissions::from_mode(0o666));
}

#[cfg(not(unix))]
fn default_mode(_: &mut Builder) {}
