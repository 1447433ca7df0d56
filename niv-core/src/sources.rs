use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::CoreError;

/// Extension of nivlang source files.
pub const SOURCE_EXTENSION: &str = "nl";
/// Extension of generated output files.
pub const OUTPUT_EXTENSION: &str = "js";

pub fn is_source_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Collect the `.nl` files under `root`, sorted by path. Only the top level
/// is scanned unless `recursive` is set.
pub fn discover_sources(root: impl AsRef<Path>, recursive: bool) -> Result<Vec<PathBuf>, CoreError> {
    let mut walker = WalkDir::new(root.as_ref()).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path) {
        fs::write(path, "func main = {} { }").expect("write source");
    }

    #[test]
    fn finds_top_level_sources_only_by_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).expect("create nested dir");
        write(&dir.path().join("b.nl"));
        write(&dir.path().join("a.nl"));
        write(&dir.path().join("notes.txt"));
        write(&nested.join("c.nl"));

        let files = discover_sources(dir.path(), false).expect("discover");
        assert_eq!(files, vec![dir.path().join("a.nl"), dir.path().join("b.nl")]);
    }

    #[test]
    fn descends_when_recursive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).expect("create nested dir");
        write(&dir.path().join("a.nl"));
        write(&nested.join("c.nl"));

        let files = discover_sources(dir.path(), true).expect("discover");
        assert_eq!(files, vec![dir.path().join("a.nl"), nested.join("c.nl")]);
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = discover_sources(dir.path().join("missing"), false).unwrap_err();
        assert!(matches!(err, CoreError::SourceIo(_)));
    }

    #[test]
    fn recognizes_source_extension() {
        assert!(is_source_file(Path::new("src/main.nl")));
        assert!(!is_source_file(Path::new("src/main.js")));
        assert!(!is_source_file(Path::new("nl")));
    }
}
