//! Writing the generated plugin to disk.
//! Emission is all-or-nothing: if any write fails, everything written so far
//! is removed again.

use crate::error::{Error, Result};
use crate::substitute::{FileContent, TransformedFile};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Ensures the output directory is safe to write to.
///
/// # Errors
/// * `Error::DestinationConflictError` if the path exists and is not an
///   empty directory
pub fn check_destination<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let output_dir = output_dir.as_ref();
    if !output_dir.exists() {
        return Ok(());
    }
    if output_dir.is_dir() && fs::read_dir(output_dir)?.next().is_none() {
        return Ok(());
    }
    Err(Error::DestinationConflictError { output_dir: output_dir.display().to_string() })
}

/// Removes what an unfinished emission created.
struct Rollback<'a> {
    root: &'a Path,
    /// Topmost directory created by this emission, if any
    created: Option<PathBuf>,
    committed: bool,
}

impl Rollback<'_> {
    fn undo(&self) -> std::io::Result<()> {
        match &self.created {
            Some(created) => fs::remove_dir_all(created),
            None => {
                for entry in fs::read_dir(self.root)? {
                    let path = entry?.path();
                    if path.is_dir() {
                        fs::remove_dir_all(&path)?;
                    } else {
                        fs::remove_file(&path)?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl Drop for Rollback<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        warn!("Generation failed, removing partial output in '{}'", self.root.display());
        if let Err(e) = self.undo() {
            warn!("Failed to remove partial output in '{}': {e}", self.root.display());
        }
    }
}

/// Writes transformed files below an output root.
pub struct ProjectEmitter {
    root: PathBuf,
}

impl ProjectEmitter {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `files` and returns their absolute output paths.
    ///
    /// # Errors
    /// * `Error::DestinationConflictError` if the output root is not empty
    /// * `Error::IoError` if a directory or file cannot be written; the
    ///   output root is restored to its previous state first
    pub fn emit(&self, files: &[TransformedFile]) -> Result<Vec<PathBuf>> {
        check_destination(&self.root)?;

        let created = self
            .root
            .ancestors()
            .take_while(|a| !a.as_os_str().is_empty() && !a.exists())
            .last()
            .map(Path::to_path_buf);
        fs::create_dir_all(&self.root)?;
        let mut rollback = Rollback { root: &self.root, created, committed: false };

        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let dest = self.root.join(&file.target);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            match &file.content {
                FileContent::Text(text) => fs::write(&dest, text)?,
                FileContent::Binary(bytes) => fs::write(&dest, bytes)?,
            }
            if let Some(permissions) = &file.permissions {
                fs::set_permissions(&dest, permissions.clone())?;
            }
            debug!("Wrote {}", dest.display());
            written.push(dest);
        }

        rollback.committed = true;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn text_file(target: &str, content: &str) -> TransformedFile {
        TransformedFile {
            source: PathBuf::from(target),
            target: PathBuf::from(target),
            content: FileContent::Text(content.to_string()),
            permissions: None,
        }
    }

    #[test]
    fn test_check_destination() {
        let temp_dir = TempDir::new().unwrap();
        assert!(check_destination(temp_dir.path().join("missing")).is_ok());
        assert!(check_destination(temp_dir.path()).is_ok());

        fs::write(temp_dir.path().join("file.txt"), "x").unwrap();
        assert!(matches!(
            check_destination(temp_dir.path()),
            Err(Error::DestinationConflictError { .. })
        ));
        assert!(check_destination(temp_dir.path().join("file.txt")).is_err());
    }

    #[test]
    fn test_emit_creates_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("out");
        let emitter = ProjectEmitter::new(&root);
        let written = emitter
            .emit(&[text_file("main.php", "<?php"), text_file("includes/Main.php", "class Main {}")])
            .unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(fs::read_to_string(root.join("includes/Main.php")).unwrap(), "class Main {}");
    }

    #[test]
    fn test_emit_rolls_back_created_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("parent").join("out");
        let emitter = ProjectEmitter::new(&root);
        // "a" is written as a file, so "a/b.php" cannot get its directory
        let result = emitter.emit(&[text_file("a", "x"), text_file("a/b.php", "y")]);
        assert!(matches!(result, Err(Error::IoError(_))));
        assert!(!temp_dir.path().join("parent").exists());
    }

    #[test]
    fn test_emit_rolls_back_into_existing_empty_root() {
        let temp_dir = TempDir::new().unwrap();
        let emitter = ProjectEmitter::new(temp_dir.path());
        let result = emitter.emit(&[text_file("a", "x"), text_file("a/b.php", "y")]);
        assert!(result.is_err());
        assert!(temp_dir.path().exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_emit_preserves_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("out");
        let mut file = text_file("bin/build.sh", "#!/bin/sh\n");
        file.permissions = Some(fs::Permissions::from_mode(0o755));
        ProjectEmitter::new(&root).emit(&[file]).unwrap();

        let mode = fs::metadata(root.join("bin/build.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
