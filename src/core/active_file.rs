//! The file handle owned by the service loop

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// The single open log file
///
/// Only the service loop holds one of these. Writes go through a buffer that
/// the loop flushes whenever the queue runs empty, and on close.
#[derive(Debug)]
pub struct ActiveFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ActiveFile {
    /// Open `path` for appending, creating it and its parent directory if needed
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(&path)?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one payload followed by the line terminator
    pub fn append(&mut self, payload: &[u8], terminator: &[u8]) -> io::Result<()> {
        self.writer.write_all(payload)?;
        self.writer.write_all(terminator)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush buffered bytes and release the descriptor
    pub fn close(self) -> io::Result<()> {
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        drop(file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_parent_directories() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("deeper").join("app.log");

        let file = ActiveFile::open(&path)?;
        assert_eq!(file.path(), path);
        assert!(path.exists());
        file.close()
    }

    #[test]
    fn test_append_keeps_existing_content() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        fs::write(&path, "existing\n")?;

        let mut file = ActiveFile::open(&path)?;
        file.append(b"added", b"\n")?;
        file.close()?;

        assert_eq!(fs::read_to_string(&path)?, "existing\nadded\n");
        Ok(())
    }

    #[test]
    fn test_flush_makes_bytes_visible() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");

        let mut file = ActiveFile::open(&path)?;
        file.append(b"one", b"\r\n")?;
        file.flush()?;
        assert_eq!(fs::read(&path)?, b"one\r\n");
        file.close()
    }

    #[test]
    fn test_open_directory_fails() {
        let dir = tempdir().unwrap();
        assert!(ActiveFile::open(dir.path()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_private() -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let path = dir.path().join("private.log");
        ActiveFile::open(&path)?.close()?;

        let mode = fs::metadata(&path)?.permissions().mode() & 0o777;
        assert_eq!(mode & 0o077, 0, "group/other bits set: {:o}", mode);
        Ok(())
    }
}
