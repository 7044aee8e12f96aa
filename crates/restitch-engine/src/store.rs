//! Document storage.
//!
//! [`DocumentStore`] is the seam between the engine and wherever documents
//! actually live. The engine only ever reads whole documents and replaces
//! whole documents, so the trait stays at that grain; tests swap in an
//! in-memory store, and [`DirStore`] covers the common case of files under
//! a root directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Reads and replaces documents by name.
pub trait DocumentStore {
    /// Reads a document's full text.
    fn read(&self, name: &str) -> io::Result<String>;

    /// Replaces a document's content.
    ///
    /// The replacement must be all-or-nothing for that document: on error
    /// the previous content is still what a reader sees.
    fn write(&mut self, name: &str, content: &str) -> io::Result<()>;
}

/// Stores documents as files under a root directory.
///
/// Writes go through a temporary file in the document's own directory and
/// land with an atomic rename, so a failure mid-write never leaves a
/// half-written document behind.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirStore { root: root.into() }
    }

    /// The directory document names resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl DocumentStore for DirStore {
    fn read(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.path_of(name))
    }

    fn write(&mut self, name: &str, content: &str) -> io::Result<()> {
        let path = self.path_of(name);
        // Same directory as the target, so the final rename cannot cross
        // filesystems and stays atomic.
        let dir = path.parent().unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        // Temp files are created owner-only; carry an existing target's own
        // permissions across the rename.
        if let Ok(meta) = fs::metadata(&path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::new(dir.path());
        assert_eq!(store.root(), dir.path());

        store.write("page.html", "<p>hi</p>\n").unwrap();
        assert_eq!(store.read("page.html").unwrap(), "<p>hi</p>\n");
    }

    #[test]
    fn write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::new(dir.path());

        store.write("page.html", "old").unwrap();
        store.write("page.html", "new").unwrap();
        assert_eq!(store.read("page.html").unwrap(), "new");
    }

    #[test]
    fn names_may_carry_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        let mut store = DirStore::new(dir.path());

        store.write("docs/page.html", "x").unwrap();
        assert_eq!(store.read("docs/page.html").unwrap(), "x");
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_the_target_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut store = DirStore::new(dir.path());
        store.write("page.html", "new").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert_eq!(store.read("page.html").unwrap(), "new");
    }

    #[test]
    fn missing_document_reads_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        assert!(store.read("absent.html").is_err());
    }

    #[test]
    fn write_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::new(dir.path());
        assert!(store.write("no-such-dir/page.html", "x").is_err());
    }
}
