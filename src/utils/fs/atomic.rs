//! Atomic file write operations using temp-and-rename strategy.
//!
//! Readers of a file written through this module see either the old contents
//! or the new contents, never a partial write, even if the process dies
//! mid-write.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// This function:
/// 1. Creates a temporary file in the target's directory
/// 2. Writes and syncs the content to disk
/// 3. Renames the temporary file over the target
///
/// The temporary file lives next to the target so the rename never crosses a
/// filesystem boundary. If any step fails the temporary file is removed and
/// the target is left untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use nvrmap_cli::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> std::io::Result<()> {
/// atomic_write(Path::new("nvr-mapping.json"), b"{}\n")?;
/// # Ok(())
/// # }
/// ```
///
/// # Platform Notes
///
/// - **Unix**: Preserves file permissions of an existing target; new files get `0o644`
/// - **All platforms**: Creates parent directories if they don't exist
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("atomic");
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(parent)?;

    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let permissions = match fs::metadata(path) {
            Ok(metadata) => metadata.permissions(),
            Err(_) => fs::Permissions::from_mode(0o644),
        };
        fs::set_permissions(temp.path(), permissions)?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Reads a file to a string, returning `Ok(None)` if it does not exist.
pub async fn read_if_exists(path: &Path) -> io::Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
