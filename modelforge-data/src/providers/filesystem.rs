//! Native filesystem provider implementation using `tokio::fs`.
//!
//! Model data roots are read-only during the process lifetime, so every
//! operation here is a plain read; nothing in this module mutates the tree.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::errors::{ModelError, Result};

/// Native filesystem provider using `tokio::fs` for async file operations.
///
/// # Thread Safety
/// This provider is `Send + Sync` and can be safely shared across threads.
#[derive(Debug, Clone)]
pub struct NativeFileSystemProvider;

impl NativeFileSystemProvider {
    /// Read the entire contents of a file as a UTF-8 string.
    pub async fn read_file(path: impl AsRef<Path>) -> Result<String> {
        fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| ModelError::file_system("read", path.as_ref(), e))
    }

    /// Check if a file or directory exists.
    ///
    /// Uses `tokio::fs::metadata`, which handles files and directories
    /// uniformly and is more reliable than trying to open the path.
    pub async fn file_exists(path: &Path) -> Result<bool> {
        match fs::metadata(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ModelError::file_system("check existence", path, e)),
        }
    }

    /// List the immediate sub directories of `dir`, sorted.
    ///
    /// Files are skipped; no recursion into sub directories.
    pub async fn list_directories(dir: &Path) -> Result<Vec<PathBuf>> {
        Self::list_entries(dir, EntryKind::Directory).await
    }

    /// List the `.json` files directly inside `dir`, sorted.
    pub async fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Self::list_entries(dir, EntryKind::File).await?;
        files.retain(|p| p.extension().is_some_and(|ext| ext == "json"));
        Ok(files)
    }

    async fn list_entries(dir: &Path, kind: EntryKind) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(dir)
            .await
            .map_err(|e| ModelError::file_system("access directory", dir, e))?;

        if !metadata.is_dir() {
            return Err(ModelError::file_system(
                "list directory",
                dir,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "path is not a directory"),
            ));
        }

        let mut found = Vec::new();
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| ModelError::file_system("read directory", dir, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ModelError::file_system("read directory entry", dir, e))?
        {
            let path = entry.path();
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| ModelError::file_system("read metadata", &path, e))?;

            let matches = match kind {
                EntryKind::Directory => metadata.is_dir(),
                EntryKind::File => metadata.is_file(),
            };
            if matches {
                found.push(path);
            }
        }

        // Sort for consistent ordering across platforms
        found.sort();

        Ok(found)
    }
}

#[derive(Debug, Clone, Copy)]
enum EntryKind {
    Directory,
    File,
}
