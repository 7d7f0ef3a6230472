//! A single source file under test.

use std::path::{Path, PathBuf};

/// One discovered fixture: the name the policy is evaluated against and the path handed to the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixture {
    pub name: String,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Build a fixture whose name is the final component of `path`.
    ///
    /// A name that is not valid UTF-8 is converted lossily; `path` is kept as-is for the interpreter.
    ///
    /// ## Returns
    /// - `None` if the path has no final component.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy();
        Some(Self::new(name, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_uses_file_name() {
        let fixture = Fixture::from_path(Path::new("tests/ok.ecl")).unwrap();
        assert_eq!(fixture.name, "ok.ecl");
        assert_eq!(fixture.path, PathBuf::from("tests/ok.ecl"));
    }

    #[cfg(unix)]
    #[test]
    fn test_from_path_with_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("tests").join(OsStr::from_bytes(b"bad\xff.ecl"));
        let fixture = Fixture::from_path(&path).unwrap();
        assert_eq!(fixture.name, "bad\u{FFFD}.ecl");
        assert_eq!(fixture.path, path);
    }

    #[test]
    fn test_from_path_without_file_name() {
        assert!(Fixture::from_path(Path::new("..")).is_none());
    }
}
