//! File location across a list of directories.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{LoadError, Result};

/// Finds files by name in an ordered list of directories.
///
/// # Examples
/// ```
/// use sanduq_loader::FileLocator;
///
/// let locator = FileLocator::new(["/etc/app", "/usr/share/app"]);
/// let err = locator.locate("missing.yml").unwrap_err();
/// assert!(err.is_not_found());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileLocator {
    paths: Vec<PathBuf>,
}

impl FileLocator {
    /// Creates a locator searching `paths` in order.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the search directories.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Returns the first existing file matching `name`.
    ///
    /// Absolute names are checked as-is. Relative names are searched in
    /// each directory, then relative to the working directory when no
    /// directories were configured.
    ///
    /// # Errors
    /// [`LoadError::NotFound`] listing the searched directories.
    pub fn locate(&self, name: &str) -> Result<PathBuf> {
        let candidate = Path::new(name);

        if candidate.is_absolute() {
            if candidate.is_file() {
                return Ok(candidate.to_path_buf());
            }
            return Err(LoadError::not_found(name));
        }

        if self.paths.is_empty() {
            if candidate.is_file() {
                return Ok(candidate.to_path_buf());
            }
            return Err(LoadError::not_found(name));
        }

        for dir in &self.paths {
            let path = dir.join(candidate);
            trace!(path = %path.display(), "Looking for file");
            if path.is_file() {
                return Ok(path);
            }
        }

        Err(LoadError::NotFound {
            resource: name.to_string(),
            searched: self.paths.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn locates_in_first_matching_directory() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(second.path().join("app.yml"), "a: 1").unwrap();

        let locator = FileLocator::new([first.path(), second.path()]);
        assert_eq!(locator.locate("app.yml").unwrap(), second.path().join("app.yml"));

        fs::write(first.path().join("app.yml"), "a: 2").unwrap();
        assert_eq!(locator.locate("app.yml").unwrap(), first.path().join("app.yml"));
    }

    #[test]
    fn absolute_path_is_checked_directly() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("abs.yml");
        fs::write(&file, "").unwrap();

        let locator = FileLocator::new(["/nonexistent"]);
        let name = file.to_str().unwrap();
        assert_eq!(locator.locate(name).unwrap(), file);

        let missing = dir.path().join("missing.yml");
        assert!(locator.locate(missing.to_str().unwrap()).unwrap_err().is_not_found());
    }

    #[test]
    fn missing_file_lists_search_paths() {
        let dir = tempfile::tempdir().unwrap();
        let locator = FileLocator::new([dir.path()]);

        match locator.locate("nope.yml").unwrap_err() {
            LoadError::NotFound { resource, searched } => {
                assert_eq!(resource, "nope.yml");
                assert_eq!(searched, vec![dir.path().to_path_buf()]);
            }
            other => panic!("Expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn directories_are_not_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("conf.yml")).unwrap();

        let locator = FileLocator::new([dir.path()]);
        assert!(locator.locate("conf.yml").is_err());
    }
}
