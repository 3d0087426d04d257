//! Owned source buffers.
//!
//! The scanner never copies lexeme text: every token borrows from the
//! `SourceFile` that the caller keeps alive for as long as the tokens are in
//! use.

use crate::text::TextPos;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a source file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` is not valid UTF-8 (first bad byte at offset {offset})", .path.display())]
    InvalidUtf8 { path: PathBuf, offset: usize },

    #[error("`{}` is {len} bytes; sources are limited to {} bytes", .path.display(), TextPos::MAX)]
    TooLarge { path: PathBuf, len: usize },
}

/// Result type for source loading operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// A source file held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
}

impl SourceFile {
    /// Wrap already-loaded text.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a whole file into memory, validating that it is UTF-8.
    pub fn load(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        check_addressable(path, bytes.len())?;
        let text = simdutf8::compat::from_utf8(&bytes)
            .map_err(|err| SourceError::InvalidUtf8 {
                path: path.to_path_buf(),
                offset: err.valid_up_to(),
            })?
            .to_owned();
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    /// The path as a display string, used to name the source in reports.
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }

    /// The full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the source text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Spans store byte offsets as [`TextPos`], so every offset in the text
/// must fit in one.
fn check_addressable(path: &Path, len: usize) -> SourceResult<()> {
    if TextPos::try_from(len).is_err() {
        return Err(SourceError::TooLarge {
            path: path.to_path_buf(),
            len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rill_core_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_new_in_memory() {
        let file = SourceFile::new("main.rl", "print 1;");
        assert_eq!(file.name(), "main.rl");
        assert_eq!(file.text(), "print 1;");
        assert_eq!(file.len(), 8);
        assert!(!file.is_empty());
    }

    #[test]
    fn test_load_reads_whole_file() {
        let path = temp_path("ok.rl");
        {
            let mut f = std::fs::File::create(&path).unwrap();
            write!(f, "def f()\n{{ return 1; }}\n").unwrap();
        }
        let file = SourceFile::load(&path).unwrap();
        assert_eq!(file.text(), "def f()\n{ return 1; }\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let path = temp_path("missing.rl");
        let err = SourceFile::load(&path).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().starts_with("failed to read"));
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let path = temp_path("bad.rl");
        std::fs::write(&path, [b'a', 0xff, 0xfe, b'b']).unwrap();
        let err = SourceFile::load(&path).unwrap_err();
        assert!(matches!(err, SourceError::InvalidUtf8 { offset: 1, .. }));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_size_limit_matches_span_offsets() {
        let path = Path::new("huge.rl");
        assert!(check_addressable(path, TextPos::MAX as usize).is_ok());

        let too_long = TextPos::MAX as usize + 1;
        let err = check_addressable(path, too_long).unwrap_err();
        assert!(matches!(err, SourceError::TooLarge { len, .. } if len == too_long));
        assert!(err.to_string().contains("sources are limited to 4294967295 bytes"));
    }
}
