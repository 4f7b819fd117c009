//! Optional archive of submitted canvases, for collecting samples.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::ArchiveConfig;
use crate::util::expand_tilde;

/// Writes each submitted PNG to a directory with a timestamped name.
#[derive(Debug, Clone)]
pub struct SampleArchive {
    directory: PathBuf,
    filename_template: String,
}

impl SampleArchive {
    /// Returns `None` when archiving is disabled.
    pub fn from_config(config: &ArchiveConfig) -> Option<Self> {
        config.enabled.then(|| Self {
            directory: expand_tilde(&config.directory),
            filename_template: config.filename_template.clone(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Saves `png` and returns the written path.
    pub fn save(&self, png: &[u8]) -> io::Result<PathBuf> {
        self.save_at(png, Local::now())
    }

    fn save_at(&self, png: &[u8], now: DateTime<Local>) -> io::Result<PathBuf> {
        let mut stem = String::new();
        write!(stem, "{}", now.format(&self.filename_template)).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid filename template '{}'", self.filename_template),
            )
        })?;

        if !self.directory.exists() {
            log::info!("Creating sample directory: {}", self.directory.display());
            fs::create_dir_all(&self.directory)?;
        }

        let path = unique_path(&self.directory, &stem);
        fs::write(&path, png)?;

        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, Permissions::from_mode(0o600))?;
        }

        log::debug!("Archived {} byte sample to {}", png.len(), path.display());
        Ok(path)
    }
}

/// `<stem>.png`, or `<stem>-N.png` when that name is taken.
fn unique_path(directory: &Path, stem: &str) -> PathBuf {
    let first = directory.join(format!("{stem}.png"));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| directory.join(format!("{stem}-{n}.png")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn archive(dir: &Path) -> SampleArchive {
        SampleArchive::from_config(&ArchiveConfig {
            enabled: true,
            directory: dir.join("samples").to_string_lossy().into_owned(),
            filename_template: "digit_%Y%m%d_%H%M%S".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn disabled_archive_is_none() {
        assert!(SampleArchive::from_config(&ArchiveConfig::default()).is_none());
    }

    #[test]
    fn save_uses_template_and_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let archive = archive(temp.path());
        let now = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();

        let path = archive.save_at(b"png-bytes", now).unwrap();

        assert_eq!(path, temp.path().join("samples/digit_20240506_070809.png"));
        assert_eq!(fs::read(&path).unwrap(), b"png-bytes");
    }

    #[test]
    fn same_second_does_not_overwrite() {
        let temp = tempfile::tempdir().unwrap();
        let archive = archive(temp.path());
        let now = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();

        let first = archive.save_at(b"one", now).unwrap();
        let second = archive.save_at(b"two", now).unwrap();

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("-1.png"));
        assert_eq!(fs::read(&first).unwrap(), b"one");
    }

    #[test]
    fn bad_template_is_an_error_and_writes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let archive = SampleArchive::from_config(&ArchiveConfig {
            enabled: true,
            directory: temp.path().join("samples").to_string_lossy().into_owned(),
            filename_template: "digit_%Q".to_string(),
        })
        .unwrap();
        let now = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();

        let err = archive.save_at(b"png-bytes", now).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(!temp.path().join("samples").exists());
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let path = archive(temp.path()).save(b"x").unwrap();
        let mode = fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
