//! Collision-free destination naming.
//!
//! Given a target directory and a desired file name, pick a path that does
//! not exist yet. Clashes are resolved the way file managers do it when a
//! file is pasted twice: `photo.png`, `photo (1).png`, `photo (2).png`, ...
//! The numeric marker goes before the whole compound extension, so
//! `archive.tar.gz` becomes `archive (1).tar.gz`.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Answers whether a path is already taken.
pub trait Occupancy {
    fn is_occupied(&self, path: &Path) -> bool;
}

/// Occupancy backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOccupancy;

impl Occupancy for FsOccupancy {
    fn is_occupied(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling symlink still counts as taken
        path.symlink_metadata().is_ok()
    }
}

impl Occupancy for HashSet<PathBuf> {
    fn is_occupied(&self, path: &Path) -> bool {
        self.contains(path)
    }
}

/// Filesystem occupancy plus paths already reserved by earlier decisions.
pub struct Reserved<'a, O: Occupancy> {
    pub inner: &'a O,
    pub claimed: &'a HashSet<PathBuf>,
}

impl<O: Occupancy> Occupancy for Reserved<'_, O> {
    fn is_occupied(&self, path: &Path) -> bool {
        self.claimed.contains(path) || self.inner.is_occupied(path)
    }
}

/// Splits a file name into its base and compound extension.
///
/// Leading dots belong to the base, so dotfiles keep their whole name. The
/// extension is every trailing suffix, starting at the first dot after the
/// leading ones. A name ending in a dot has no extension. Names that are not
/// valid UTF-8 are split on their raw bytes and never altered.
///
/// # Examples
///
/// ```
/// use dirsort::destination::split_compound_extension;
/// use std::ffi::OsStr;
///
/// let (base, ext) = split_compound_extension(OsStr::new("archive.tar.gz"));
/// assert_eq!((base, ext), (OsStr::new("archive"), OsStr::new(".tar.gz")));
///
/// let (base, ext) = split_compound_extension(OsStr::new(".gitignore"));
/// assert_eq!((base, ext), (OsStr::new(".gitignore"), OsStr::new("")));
/// ```
pub fn split_compound_extension(name: &OsStr) -> (&OsStr, &OsStr) {
    let bytes = name.as_encoded_bytes();
    if bytes.last() == Some(&b'.') {
        return (name, OsStr::new(""));
    }

    let leading = bytes.iter().take_while(|&&b| b == b'.').count();
    match bytes[leading..].iter().position(|&b| b == b'.') {
        Some(pos) => {
            let (base, extension) = bytes.split_at(leading + pos);
            // SAFETY: both halves come from `name` split right before an
            // ASCII '.', which is a valid boundary for OS string encodings.
            unsafe {
                (
                    OsStr::from_encoded_bytes_unchecked(base),
                    OsStr::from_encoded_bytes_unchecked(extension),
                )
            }
        }
        None => (name, OsStr::new("")),
    }
}

/// Resolves a destination path in `target_dir` that is free on disk.
pub fn resolve(target_dir: &Path, desired_name: impl AsRef<OsStr>) -> PathBuf {
    resolve_with(&FsOccupancy, target_dir, desired_name)
}

/// Resolves a destination path in `target_dir` that `occupancy` reports as free.
///
/// The check is not atomic: another process creating the same path between
/// this call and the actual move is not guarded against.
pub fn resolve_with<O: Occupancy + ?Sized>(
    occupancy: &O,
    target_dir: &Path,
    desired_name: impl AsRef<OsStr>,
) -> PathBuf {
    let desired_name = desired_name.as_ref();
    let (base, extension) = split_compound_extension(desired_name);

    let mut candidate = target_dir.join(desired_name);
    let mut n: u64 = 1;
    while occupancy.is_occupied(&candidate) {
        candidate = target_dir.join(numbered_name(base, n, extension));
        n += 1;
    }

    if n > 1 {
        tracing::debug!(
            name = %desired_name.to_string_lossy(),
            resolved = %candidate.display(),
            "destination name taken, using numbered variant"
        );
    }
    candidate
}

fn numbered_name(base: &OsStr, n: u64, extension: &OsStr) -> OsString {
    let mut name = OsString::with_capacity(base.len() + extension.len() + 8);
    name.push(base);
    name.push(format!(" ({})", n));
    name.push(extension);
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn occupied(dir: &Path, names: &[&str]) -> HashSet<PathBuf> {
        names.iter().map(|n| dir.join(n)).collect()
    }

    fn split(name: &str) -> (String, String) {
        let (base, ext) = split_compound_extension(OsStr::new(name));
        (
            base.to_string_lossy().into_owned(),
            ext.to_string_lossy().into_owned(),
        )
    }

    fn parts(base: &str, ext: &str) -> (String, String) {
        (base.to_string(), ext.to_string())
    }

    #[test]
    fn test_split_compound_extension() {
        assert_eq!(split("photo.png"), parts("photo", ".png"));
        assert_eq!(split("archive.tar.gz"), parts("archive", ".tar.gz"));
        assert_eq!(split("report.final.docx"), parts("report", ".final.docx"));
        assert_eq!(split(".gitignore"), parts(".gitignore", ""));
        assert_eq!(split(".config.json"), parts(".config", ".json"));
        assert_eq!(split("README"), parts("README", ""));
        assert_eq!(split("file."), parts("file.", ""));
        assert_eq!(split(""), parts("", ""));
        assert_eq!(split("café.tar.gz"), parts("café", ".tar.gz"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_keep_their_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"caf\xe9.png");
        let (base, ext) = split_compound_extension(name);
        assert_eq!(base.as_bytes(), b"caf\xe9");
        assert_eq!(ext.as_bytes(), b".png");

        let dir = Path::new("/virtual/Images");
        let taken: HashSet<PathBuf> = [dir.join(name)].into_iter().collect();
        let resolved = resolve_with(&taken, dir, name);
        assert_eq!(
            resolved.file_name().map(|n| n.as_bytes()),
            Some(&b"caf\xe9 (1).png"[..])
        );
    }

    #[test]
    fn test_resolve_free_name_is_unchanged() {
        let dir = Path::new("/virtual/Images");
        let taken = HashSet::new();
        assert_eq!(
            resolve_with(&taken, dir, "archive.tar.gz"),
            dir.join("archive.tar.gz")
        );
        assert_eq!(resolve_with(&taken, dir, ".gitignore"), dir.join(".gitignore"));
    }

    #[test]
    fn test_resolve_numbers_before_compound_extension() {
        let dir = Path::new("/virtual/Archives");
        let mut taken = occupied(dir, &["archive.tar.gz"]);

        let first = resolve_with(&taken, dir, "archive.tar.gz");
        assert_eq!(first, dir.join("archive (1).tar.gz"));

        taken.insert(first);
        let second = resolve_with(&taken, dir, "archive.tar.gz");
        assert_eq!(second, dir.join("archive (2).tar.gz"));
    }

    #[test]
    fn test_resolve_dotfile_and_extensionless_clash() {
        let dir = Path::new("/virtual/Others");
        let taken = occupied(dir, &[".gitignore", "README"]);

        assert_eq!(
            resolve_with(&taken, dir, ".gitignore"),
            dir.join(".gitignore (1)")
        );
        assert_eq!(resolve_with(&taken, dir, "README"), dir.join("README (1)"));
    }

    #[test]
    fn test_resolve_never_returns_taken_path() {
        let dir = Path::new("/virtual/Images");
        let mut taken = HashSet::new();
        for _ in 0..25 {
            let next = resolve_with(&taken, dir, "photo.png");
            assert!(!taken.contains(&next));
            taken.insert(next);
        }
        assert!(taken.contains(&dir.join("photo (24).png")));
    }

    #[test]
    fn test_reserved_combines_claims_and_inner() {
        let dir = Path::new("/virtual/Images");
        let on_disk = occupied(dir, &["a.png"]);
        let claimed = occupied(dir, &["a (1).png"]);
        let reserved = Reserved {
            inner: &on_disk,
            claimed: &claimed,
        };
        assert_eq!(resolve_with(&reserved, dir, "a.png"), dir.join("a (2).png"));
    }

    #[test]
    fn test_resolve_against_filesystem() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dst = temp_dir.path().join("Images");
        fs::create_dir(&dst).expect("Failed to create Images");
        fs::write(dst.join("photo.png"), "old").expect("Failed to write photo");
        fs::write(dst.join("archive.tar.gz"), "old").expect("Failed to write archive");

        assert_eq!(resolve(&dst, "photo.png"), dst.join("photo (1).png"));
        assert_eq!(resolve(&dst, "archive.tar.gz"), dst.join("archive (1).tar.gz"));
        assert_eq!(resolve(&dst, ".gitignore"), dst.join(".gitignore"));
        assert_eq!(resolve(&dst, "README"), dst.join("README"));
    }

    #[test]
    fn test_resolve_in_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dst = temp_dir.path().join("Videos");
        assert_eq!(resolve(&dst, "clip.mp4"), dst.join("clip.mp4"));
        assert!(!dst.exists());
    }
}
