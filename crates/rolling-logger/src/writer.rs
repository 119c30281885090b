//! Size-based rolling file writer.
//!
//! The active file is `<dir>/<app>.log`. When a write would push it past
//! `max_bytes` it is renamed to `<app>.<timestamp>.<seq>.log` and a fresh file is
//! opened. Only the newest `max_files` rotated files are kept.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::ring_buffer::RingBuffer;

/// Rotation limits for [`RollingFileWriter`].
#[derive(Debug, Clone, Copy)]
pub struct RollingPolicy {
    /// Rotate once the active file would exceed this size.
    pub max_bytes: u64,
    /// Rotated files kept on disk (the active file is not counted).
    pub max_files: usize,
}

impl Default for RollingPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            max_files: 5,
        }
    }
}

struct ActiveFile {
    file: File,
    size: u64,
    rotations: u32,
}

struct Inner {
    dir: PathBuf,
    app_name: String,
    policy: RollingPolicy,
    active: Mutex<ActiveFile>,
    recent: Arc<RingBuffer>,
}

/// A cloneable writer; every clone appends to the same active file.
#[derive(Clone)]
pub struct RollingFileWriter {
    inner: Arc<Inner>,
}

impl RollingFileWriter {
    pub fn new(
        dir: impl Into<PathBuf>,
        app_name: &str,
        policy: RollingPolicy,
        recent: Arc<RingBuffer>,
    ) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let path = active_path(&dir, app_name);
        let file = open_append(&path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            inner: Arc::new(Inner {
                dir,
                app_name: app_name.to_string(),
                policy,
                active: Mutex::new(ActiveFile { file, size, rotations: 0 }),
                recent,
            }),
        })
    }

    /// Path of the file currently being written.
    pub fn active_path(&self) -> PathBuf {
        active_path(&self.inner.dir, &self.inner.app_name)
    }

    /// Rotated files, oldest first.
    pub fn rotated_files(&self) -> io::Result<Vec<PathBuf>> {
        rotated_files(&self.inner.dir, &self.inner.app_name)
    }

    fn rotate(&self, active: &mut ActiveFile) -> io::Result<()> {
        active.file.flush()?;
        let dir = &self.inner.dir;
        let app = &self.inner.app_name;
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f").to_string();

        let mut target = dir.join(format!("{}.{}.{:04}.log", app, stamp, active.rotations));
        while target.exists() {
            active.rotations += 1;
            target = dir.join(format!("{}.{}.{:04}.log", app, stamp, active.rotations));
        }
        active.rotations += 1;
        fs::rename(active_path(dir, app), &target)?;

        let rotated = rotated_files(dir, app)?;
        let excess = rotated.len().saturating_sub(self.inner.policy.max_files);
        for old in rotated.into_iter().take(excess) {
            // The subscriber itself writes here, so report on stderr.
            if let Err(e) = fs::remove_file(&old) {
                eprintln!("rolling-logger: failed to prune {}: {}", old.display(), e);
            }
        }

        active.file = open_append(&active_path(dir, app))?;
        active.size = 0;
        Ok(())
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut active = self
            .inner
            .active
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;

        if active.size > 0 && active.size + buf.len() as u64 > self.inner.policy.max_bytes {
            self.rotate(&mut active)?;
        }

        active.file.write_all(buf)?;
        active.size += buf.len() as u64;
        self.inner.recent.push_chunk(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner.active.lock() {
            Ok(mut active) => active.file.flush(),
            Err(_) => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RollingFileWriter {
    type Writer = RollingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn active_path(dir: &Path, app_name: &str) -> PathBuf {
    dir.join(format!("{}.log", app_name))
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn rotated_files(dir: &Path, app_name: &str) -> io::Result<Vec<PathBuf>> {
    let prefix = format!("{}.", app_name);
    let active = format!("{}.log", app_name);
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&prefix) && n.ends_with(".log") && n != active)
                .unwrap_or(false)
        })
        .collect();
    // Timestamps sort lexicographically.
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(dir: &Path, max_bytes: u64, max_files: usize) -> RollingFileWriter {
        RollingFileWriter::new(
            dir,
            "Test",
            RollingPolicy { max_bytes, max_files },
            Arc::new(RingBuffer::new(16)),
        )
        .expect("create writer")
    }

    #[test]
    fn test_writes_to_active_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = writer(dir.path(), 1024, 3);
        w.write_all(b"hello\n").unwrap();
        w.flush().unwrap();

        let content = fs::read_to_string(w.active_path()).unwrap();
        assert_eq!(content, "hello\n");
        assert!(w.rotated_files().unwrap().is_empty());
    }

    #[test]
    fn test_rotates_when_full() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = writer(dir.path(), 10, 3);
        w.write_all(b"0123456789").unwrap();
        w.write_all(b"abc").unwrap();
        w.flush().unwrap();

        assert_eq!(w.rotated_files().unwrap().len(), 1);
        assert_eq!(fs::read_to_string(w.active_path()).unwrap(), "abc");
    }

    #[test]
    fn test_prunes_old_rotations() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = writer(dir.path(), 4, 2);
        for chunk in ["aaaa", "bbbb", "cccc", "dddd", "eeee"] {
            w.write_all(chunk.as_bytes()).unwrap();
        }
        w.flush().unwrap();

        let rotated = w.rotated_files().unwrap();
        assert_eq!(rotated.len(), 2);
        assert_eq!(fs::read_to_string(&rotated[1]).unwrap(), "dddd");
        assert_eq!(fs::read_to_string(w.active_path()).unwrap(), "eeee");
    }

    #[test]
    fn test_feeds_recent_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let recent = Arc::new(RingBuffer::new(4));
        let mut w = RollingFileWriter::new(dir.path(), "Test", RollingPolicy::default(), recent.clone())
            .unwrap();
        w.write_all(b"first\nsecond\n").unwrap();
        assert_eq!(recent.recent(5), vec!["first", "second"]);
    }
}
