use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use time::Date;

use super::{SegmentSource, SourceError, segment_file_name};

/// Segment source backed by a directory of per-day log files.
#[derive(Debug, Clone)]
pub struct DirSegmentSource {
    root: PathBuf,
}

impl DirSegmentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn segment_path(&self, date: Date) -> PathBuf {
        self.root.join(segment_file_name(date))
    }
}

impl SegmentSource for DirSegmentSource {
    fn read_segment(&self, date: Date) -> Result<Vec<u8>, SourceError> {
        read_log_file(&self.segment_path(date))
    }
}

/// Read a whole log segment file.
///
/// # Errors
/// Returns `SourceError::NotFound` when the file does not exist and
/// `SourceError::Io` for any other read failure.
pub fn read_log_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    match fs::read(path) {
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "read log segment");
            Ok(bytes)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Err(SourceError::NotFound {
            path: path.display().to_string(),
        }),
        Err(err) => Err(SourceError::Io(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::{DirSegmentSource, read_log_file};
    use crate::source::{SegmentSource, SourceError};
    use tempfile::TempDir;
    use time::macros::date;

    #[test]
    fn segment_path_joins_date_key() {
        let source = DirSegmentSource::new("/var/log/pm");
        assert_eq!(
            source.segment_path(date!(2024 - 05 - 01)),
            std::path::Path::new("/var/log/pm/2024-05-01")
        );
    }

    #[test]
    fn reads_existing_segment() {
        let temp = TempDir::new().expect("tempdir");
        std::fs::write(temp.path().join("2024-05-01"), [1u8, 2, 3]).unwrap();
        let source = DirSegmentSource::new(temp.path());
        assert_eq!(
            source.read_segment(date!(2024 - 05 - 01)).unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn missing_segment_is_not_found() {
        let temp = TempDir::new().expect("tempdir");
        let source = DirSegmentSource::new(temp.path());
        let err = source.read_segment(date!(2024 - 05 - 02)).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
        assert!(err.to_string().contains("2024-05-02"));
    }

    #[test]
    fn directory_is_an_io_error() {
        let temp = TempDir::new().expect("tempdir");
        let err = read_log_file(temp.path()).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
