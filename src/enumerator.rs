use std::ffi::CString;
use std::os::unix::ffi::OsStrExt as _;
use std::path::{Path, PathBuf};

/// What a path turned out to be, once classified.
pub enum Classification {
    Directory,
    Other,
}

/// Outcome of trying to enumerate a directory's children.
pub enum EnumerationResult {
    /// The directory was accessible; here are its children (fresh,
    /// `parent/name`-joined paths, `.`/`..` already excluded).
    Children(Vec<PathBuf>),
    /// `access(R_OK | X_OK)` reported `EACCES`: the directory exists but
    /// cannot be listed. Its subtree is skipped; no children are produced.
    PermissionDenied,
    /// Any other I/O error while stat'ing or opening the directory.
    IoError(String),
}

/// Classify a path as directory or other, following symlinks transparently
/// (`libc::stat`, matching the original program and `spec.md` §6).
///
/// Returns `Err` with a `strerror`-style message on stat failure (the path
/// vanished, a component isn't a directory, etc).
pub fn classify(path: &Path) -> Result<Classification, String> {
    let c_path = path_to_cstring(path)?;
    let mut stat_buf: libc::stat = unsafe { std::mem::zeroed() };

    // SAFETY: `c_path` is a valid NUL-terminated C string for the duration
    // of the call, and `stat_buf` is a valid, fully-owned out-pointer.
    let rc = unsafe { libc::stat(c_path.as_ptr(), &raw mut stat_buf) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error().to_string());
    }

    if stat_buf.st_mode & libc::S_IFMT == libc::S_IFDIR {
        Ok(Classification::Directory)
    } else {
        Ok(Classification::Other)
    }
}

/// Enumerate a directory's accessible children.
///
/// Checks read+execute access first (`spec.md` §4.3); on `EACCES` the core
/// must *not* push any children of this directory, and the caller is
/// responsible for reporting `PermissionDenied` to the `Reporter`.
pub fn enumerate(dir_path: &Path) -> EnumerationResult {
    match check_access(dir_path) {
        Ok(()) => {}
        Err(AccessError::Denied) => return EnumerationResult::PermissionDenied,
        Err(AccessError::Other(message)) => return EnumerationResult::IoError(message),
    }

    match std::fs::read_dir(dir_path) {
        Ok(read_dir) => {
            let mut children = Vec::new();
            for entry in read_dir {
                match entry {
                    Ok(entry) => children.push(entry.path()),
                    Err(error) => return EnumerationResult::IoError(error.to_string()),
                }
            }
            EnumerationResult::Children(children)
        }
        Err(error) => EnumerationResult::IoError(error.to_string()),
    }
}

enum AccessError {
    Denied,
    Other(String),
}

fn check_access(path: &Path) -> Result<(), AccessError> {
    let c_path = path_to_cstring(path).map_err(AccessError::Other)?;

    // SAFETY: `c_path` is a valid NUL-terminated C string for the call.
    let rc = unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::X_OK) };
    if rc == 0 {
        return Ok(());
    }

    let error = std::io::Error::last_os_error();
    if error.raw_os_error() == Some(libc::EACCES) {
        Err(AccessError::Denied)
    } else {
        Err(AccessError::Other(error.to_string()))
    }
}

fn path_to_cstring(path: &Path) -> Result<CString, String> {
    CString::new(path.as_os_str().as_bytes()).map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_temp_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("pfind_enumerator_test_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create temp test dir");
        dir
    }

    #[test]
    fn classifies_directory_and_file() {
        let dir = unique_temp_dir("classify");
        let file_path = dir.join("leaf.txt");
        std::fs::write(&file_path, b"x").unwrap();

        assert!(matches!(classify(&dir), Ok(Classification::Directory)));
        assert!(matches!(classify(&file_path), Ok(Classification::Other)));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn enumerate_lists_children_excluding_dot_entries() {
        let dir = unique_temp_dir("enumerate");
        std::fs::write(dir.join("a.txt"), b"x").unwrap();
        std::fs::create_dir(dir.join("sub")).unwrap();

        let EnumerationResult::Children(mut children) = enumerate(&dir) else {
            panic!("expected accessible directory");
        };
        children.sort();

        assert_eq!(children, vec![dir.join("a.txt"), dir.join("sub")]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    #[cfg_attr(
        not(unix),
        ignore = "mode-000 permission denial only applies on unix"
    )]
    fn enumerate_reports_permission_denied_for_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt as _;

        // root can read through mode 000, so skip when running as root.
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let dir = unique_temp_dir("denied");
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o000)).unwrap();

        assert!(matches!(enumerate(&dir), EnumerationResult::PermissionDenied));

        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }
}
