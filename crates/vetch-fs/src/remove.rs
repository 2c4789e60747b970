use std::fs;
use std::io;
use std::path::Path;

use crate::{Error, Result};

/// What [`remove`] found at the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Nothing existed; no filesystem change was made.
    Absent,
    Removed,
}

/// Delete a file, symlink or directory tree unconditionally.
///
/// Read-only (and on Windows hidden/system) attributes are cleared first so
/// that they cannot block deletion. A missing path is not an error.
/// Symlinks are removed themselves; their targets are never touched.
pub fn remove(path: &Path) -> Result<Removal> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Removal::Absent),
        Err(source) => {
            return Err(Error::Metadata {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let outcome = if meta.is_dir() {
        clear_tree(path).and_then(|()| fs::remove_dir_all(path))
    } else {
        clear_attributes(path, &meta).and_then(|()| fs::remove_file(path))
    };

    match outcome {
        Ok(()) => Ok(Removal::Removed),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Removal::Absent),
        Err(source) => Err(Error::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn clear_tree(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    clear_attributes(path, &meta)?;
    if meta.is_dir() {
        for entry in fs::read_dir(path)? {
            clear_tree(&entry?.path())?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn clear_attributes(path: &Path, meta: &fs::Metadata) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if meta.file_type().is_symlink() {
        return Ok(());
    }
    let mode = meta.permissions().mode();
    // directories need rwx for their entries to be listed and unlinked
    let wanted = if meta.is_dir() { mode | 0o700 } else { mode | 0o200 };
    if wanted != mode {
        fs::set_permissions(path, fs::Permissions::from_mode(wanted))?;
    }
    Ok(())
}

#[cfg(windows)]
fn clear_attributes(path: &Path, meta: &fs::Metadata) -> io::Result<()> {
    use std::os::windows::fs::MetadataExt;
    use windows::Win32::Storage::FileSystem::{
        FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_READONLY, FILE_ATTRIBUTE_SYSTEM,
        FILE_FLAGS_AND_ATTRIBUTES, SetFileAttributesW,
    };
    use windows::core::HSTRING;

    if meta.file_type().is_symlink() {
        return Ok(());
    }
    let sticky = FILE_ATTRIBUTE_READONLY.0 | FILE_ATTRIBUTE_HIDDEN.0 | FILE_ATTRIBUTE_SYSTEM.0;
    let attributes = meta.file_attributes();
    if attributes & sticky == 0 {
        return Ok(());
    }
    let wide = HSTRING::from(path.as_os_str());
    unsafe { SetFileAttributesW(&wide, FILE_FLAGS_AND_ATTRIBUTES(attributes & !sticky)) }
        .map_err(io::Error::from)
}

#[cfg(not(any(unix, windows)))]
fn clear_attributes(path: &Path, meta: &fs::Metadata) -> io::Result<()> {
    let mut permissions = meta.permissions();
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions)?;
    }
    Ok(())
}
