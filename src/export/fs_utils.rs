// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Check that the export file may be written.
///
/// Missing file or `force`: Ok. Otherwise asks for confirmation; a closed
/// stdin or any answer but "y" is an error.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if path.is_dir() {
        return Err(AppError::Export(format!("'{}' is a directory", path.display())));
    }
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));

    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer).map_err(AppError::from)?;
    let ans = answer.trim().to_ascii_lowercase();

    if ans == "y" || ans == "yes" {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(
            "cancelled, existing file not overwritten".to_string(),
        ))
    }
}

/// Reject an export target that resolves outside `dir`.
///
/// Both sides are canonicalized so `..` and symlinks cannot escape. A target
/// that does not exist yet is judged by its parent directory.
pub(crate) fn ensure_inside(path: &Path, dir: &Path) -> AppResult<()> {
    let root = dir.canonicalize().map_err(|e| {
        AppError::Export(format!("export_dir '{}' is not usable: {e}", dir.display()))
    })?;

    let target = match path.canonicalize() {
        Ok(p) => p,
        Err(_) => canonical_parent(path).ok_or_else(|| {
            AppError::Export(format!("cannot resolve '{}'", path.display()))
        })?,
    };

    if target.starts_with(&root) {
        Ok(())
    } else {
        Err(AppError::Export(format!(
            "'{}' is outside export_dir '{}'",
            path.display(),
            root.display()
        )))
    }
}

fn canonical_parent(path: &Path) -> Option<PathBuf> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty())?;
    let name = path.file_name()?;
    parent.canonicalize().ok().map(|p| p.join(name))
}
