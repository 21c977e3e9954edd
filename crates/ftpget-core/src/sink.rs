//! Destination file for downloaded bytes.
//!
//! The file is opened lazily on the first chunk (binary write, truncate) and
//! never reopened. Chunks are appended in the order the engine delivers them.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Lifecycle of the output handle. There is no way back from `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Unopened,
    Open,
}

/// Outcome of delivering one chunk to the sink.
#[derive(Debug)]
pub enum SinkWrite {
    /// Bytes appended. Zero is a genuine zero-length chunk, not a rejection.
    Written(usize),
    /// Chunk or sink reference was absent; nothing consumed, no file operation.
    Rejected,
    /// Destination could not be opened.
    OpenFailed(io::Error),
    /// Append failed after `written` bytes of the chunk.
    WriteFailed { written: usize, error: io::Error },
}

impl SinkWrite {
    /// Byte count to hand back to the engine. Anything short of the chunk
    /// length makes libcurl abort the transfer.
    pub fn consumed(&self) -> usize {
        match self {
            SinkWrite::Written(n) => *n,
            SinkWrite::WriteFailed { written, .. } => *written,
            SinkWrite::Rejected | SinkWrite::OpenFailed(_) => 0,
        }
    }

    pub fn is_full(&self, chunk_len: usize) -> bool {
        matches!(self, SinkWrite::Written(n) if *n == chunk_len)
    }
}

/// Writes successive chunks into one destination file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
    bytes_written: u64,
    last_error: Option<io::Error>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            bytes_written: 0,
            last_error: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> SinkState {
        if self.file.is_some() {
            SinkState::Open
        } else {
            SinkState::Unopened
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Append one chunk, opening the destination first if needed.
    pub fn write_chunk(&mut self, chunk: Option<&[u8]>) -> SinkWrite {
        let Some(chunk) = chunk else {
            return SinkWrite::Rejected;
        };

        let file = match self.file {
            Some(ref mut f) => f,
            None => match File::options()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)
            {
                Ok(f) => {
                    tracing::debug!(path = %self.path.display(), "opened destination");
                    self.file.insert(f)
                }
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), "cannot open destination: {}", e);
                    self.last_error = Some(clone_io_error(&e));
                    return SinkWrite::OpenFailed(e);
                }
            },
        };

        let (written, error) = append(file, chunk);
        self.bytes_written += written as u64;
        match error {
            None => SinkWrite::Written(written),
            Some(error) => self.fail_write(written, error),
        }
    }

    fn fail_write(&mut self, written: usize, error: io::Error) -> SinkWrite {
        tracing::warn!(
            path = %self.path.display(),
            written,
            "short write to destination: {}",
            error
        );
        self.last_error = Some(clone_io_error(&error));
        SinkWrite::WriteFailed { written, error }
    }

    /// Close the handle (if one was ever opened) and summarise the run.
    /// Consumes the sink, so the close happens exactly once.
    pub fn finish(mut self) -> SinkSummary {
        let state = self.state();
        if let Some(mut file) = self.file.take() {
            if let Err(e) = file.flush().and_then(|_| file.sync_all()) {
                tracing::warn!(path = %self.path.display(), "closing destination failed: {}", e);
                if self.last_error.is_none() {
                    self.last_error = Some(e);
                }
            }
        }
        SinkSummary {
            path: self.path,
            state,
            bytes_written: self.bytes_written,
            write_error: self.last_error,
        }
    }
}

/// Write all of `chunk`, stopping at the first hard error.
fn append(file: &mut File, chunk: &[u8]) -> (usize, Option<io::Error>) {
    let mut written = 0;
    while written < chunk.len() {
        match file.write(&chunk[written..]) {
            Ok(0) => {
                let error =
                    io::Error::new(io::ErrorKind::WriteZero, "destination accepted no bytes");
                return (written, Some(error));
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return (written, Some(e)),
        }
    }
    (written, None)
}

/// Deliver a chunk to a sink that may itself be absent.
pub fn deliver(sink: Option<&mut FileSink>, chunk: Option<&[u8]>) -> SinkWrite {
    match sink {
        Some(sink) => sink.write_chunk(chunk),
        None => SinkWrite::Rejected,
    }
}

/// What the sink did over a whole run.
#[derive(Debug)]
pub struct SinkSummary {
    pub path: PathBuf,
    /// State at close time; `Unopened` means no chunk ever reached the disk.
    pub state: SinkState,
    pub bytes_written: u64,
    pub write_error: Option<io::Error>,
}

fn clone_io_error(e: &io::Error) -> io::Error {
    io::Error::new(e.kind(), e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_are_concatenated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut sink = FileSink::new(&path);
        assert_eq!(sink.state(), SinkState::Unopened);

        let first = sink.write_chunk(Some(&b"hel"[..]));
        assert!(first.is_full(3));
        assert_eq!(sink.state(), SinkState::Open);
        let second = sink.write_chunk(Some(&b"lo, world"[..]));
        assert!(second.is_full(9));
        assert_eq!(sink.state(), SinkState::Open);

        let summary = sink.finish();
        assert_eq!(summary.state, SinkState::Open);
        assert_eq!(summary.bytes_written, 12);
        assert!(summary.write_error.is_none());
        assert_eq!(std::fs::read(&path).unwrap(), b"hello, world");
    }

    #[test]
    fn many_chunks_open_once() {
        // A reopen would truncate, so the final content proves a single open.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("many.bin");
        let mut sink = FileSink::new(&path);
        let mut expected = Vec::new();
        for i in 0u8..50 {
            let chunk = vec![i; (i as usize % 7) + 1];
            assert!(sink.write_chunk(Some(chunk.as_slice())).is_full(chunk.len()));
            expected.extend_from_slice(&chunk);
        }
        sink.finish();
        assert_eq!(std::fs::read(&path).unwrap(), expected);
    }

    #[test]
    fn existing_file_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, b"stale content that is longer").unwrap();
        let mut sink = FileSink::new(&path);
        sink.write_chunk(Some(&b"new"[..]));
        sink.finish();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn zero_chunks_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let sink = FileSink::new(&path);
        let summary = sink.finish();
        assert_eq!(summary.state, SinkState::Unopened);
        assert_eq!(summary.bytes_written, 0);
        assert!(!path.exists());
    }

    #[test]
    fn absent_chunk_is_rejected_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut sink = FileSink::new(&path);
        let w = sink.write_chunk(None);
        assert!(matches!(w, SinkWrite::Rejected));
        assert_eq!(w.consumed(), 0);
        assert_eq!(sink.state(), SinkState::Unopened);
        assert!(!path.exists());
    }

    #[test]
    fn absent_sink_is_rejected() {
        assert!(matches!(deliver(None, Some(&b"abc"[..])), SinkWrite::Rejected));
        assert!(matches!(deliver(None, None), SinkWrite::Rejected));
    }

    #[test]
    fn zero_length_chunk_is_a_write_not_a_rejection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        let mut sink = FileSink::new(&path);
        let w = deliver(Some(&mut sink), Some(&[][..]));
        assert!(matches!(w, SinkWrite::Written(0)));
        assert!(w.is_full(0));
        assert_eq!(sink.state(), SinkState::Open);
        sink.finish();
        assert_eq!(std::fs::read(&path).unwrap(), b"");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_append_is_a_write_failure_not_a_rejection() {
        let mut sink = FileSink::new("/dev/full");
        let w = sink.write_chunk(Some(&b"data"[..]));
        assert!(matches!(w, SinkWrite::WriteFailed { .. }), "{:?}", w);
        assert!(!w.is_full(4));
        assert_eq!(sink.state(), SinkState::Open);

        let summary = sink.finish();
        assert!(summary.write_error.is_some());
    }

    #[test]
    fn unwritable_path_reports_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.txt");
        let mut sink = FileSink::new(&path);
        let w = sink.write_chunk(Some(&b"data"[..]));
        assert!(matches!(w, SinkWrite::OpenFailed(_)));
        assert_eq!(w.consumed(), 0);
        assert!(!w.is_full(4));
        assert_eq!(sink.state(), SinkState::Unopened);

        let summary = sink.finish();
        assert!(summary.write_error.is_some());
        assert!(!path.exists());
    }
}
