//! Temp-file staging for outputs that must appear together or not at all.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Bytes written and synced to a temp file next to their final path.
///
/// Dropping a staged file without calling [`StagedFile::persist`] removes
/// the temp file.
#[derive(Debug)]
pub(crate) struct StagedFile {
    tmp: NamedTempFile,
    target: PathBuf,
}

/// Write `bytes` to a hidden temp file in the directory of `target`.
///
/// The directory must exist; it is not created.
pub(crate) fn stage_bytes(bytes: &[u8], target: &Path) -> io::Result<StagedFile> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".spray-card-")
        .suffix(".part")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    Ok(StagedFile {
        tmp,
        target: target.to_path_buf(),
    })
}

impl StagedFile {
    /// Rename the temp file over the target path.
    pub(crate) fn persist(self) -> io::Result<PathBuf> {
        let Self { tmp, target } = self;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(target)
    }
}
