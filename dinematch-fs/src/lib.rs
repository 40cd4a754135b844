//! Filesystem helpers for dataset, config and report files, built on
//! `cap-std` and `camino`.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// Open a UTF-8 file path for reading using ambient authority.
///
/// # Errors
/// Returns the I/O error raised while opening the file.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Return whether `path` exists and is a regular file.
///
/// # Errors
/// Returns the I/O error raised while inspecting the parent directory.
/// A missing file inside an existing directory is reported as an error of
/// kind [`io::ErrorKind::NotFound`].
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Create or truncate `path` for writing, creating missing parent
/// directories first.
///
/// # Errors
/// Returns the I/O error raised while creating directories or the file.
pub fn create_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
        fs_utf8::Dir::create_ambient_dir_all(parent, ambient_authority())?;
    }
    let (dir, name) = open_dir_and_file(path)?;
    dir.create(name.as_str())
}

fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

#[cfg(test)]
mod tests {
    #![expect(
        clippy::expect_used,
        reason = "tests should fail fast when setup breaks"
    )]

    use std::io::{Read, Write};

    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        (dir, root)
    }

    #[rstest]
    fn create_then_open_round_trips_contents() {
        let (_guard, root) = temp_root();
        let path = root.join("reports/2024/june.json");

        let mut file = create_utf8_file(&path).expect("create file");
        file.write_all(b"{}").expect("write");
        drop(file);

        let mut contents = String::new();
        open_utf8_file(&path)
            .expect("open file")
            .read_to_string(&mut contents)
            .expect("read");
        assert_eq!(contents, "{}");
        assert!(file_is_file(&path).expect("inspect"));
    }

    #[rstest]
    fn directories_are_not_files() {
        let (_guard, root) = temp_root();
        let nested = root.join("nested");
        std::fs::create_dir(&nested).expect("create dir");
        assert!(!file_is_file(&nested).expect("inspect"));
    }

    #[rstest]
    fn missing_files_are_errors() {
        let (_guard, root) = temp_root();
        let err = file_is_file(&root.join("absent.json")).expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
