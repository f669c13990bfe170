use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, warn};

/// Maximum number of lines read from the end of a log file
pub const DEFAULT_TAIL_LINES: usize = 2000;

/// Bytes read per backward step
const CHUNK_SIZE: u64 = 8 * 1024;

/// Result of a bounded tail read
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TailRead {
    /// Raw lines, oldest first
    pub lines: Vec<String>,

    /// Diagnostic for a read that failed for a reason other than a missing file
    pub error: Option<String>,
}

impl TailRead {
    fn failed(message: String) -> Self {
        Self {
            lines: Vec::new(),
            error: Some(message),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Reads the last lines of a log file without loading the whole file
#[derive(Clone, Debug)]
pub struct LogReader {
    max_lines: usize,
}

impl LogReader {
    pub fn new(max_lines: usize) -> Self {
        Self { max_lines }
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Read at most `max_lines` lines from the end of `path`.
    ///
    /// A missing file yields an empty result. Invalid UTF-8 is replaced
    /// with U+FFFD. Any other I/O failure is logged and reported through
    /// [`TailRead::error`] instead of being returned.
    pub fn read_tail(&self, path: &Path) -> TailRead {
        match self.try_read_tail(path) {
            Ok(lines) => {
                debug!(path = %path.display(), lines = lines.len(), "read log tail");
                TailRead { lines, error: None }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "log file does not exist");
                TailRead::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read log tail");
                TailRead::failed(format!("Failed to read {}: {}", path.display(), e))
            }
        }
    }

    fn try_read_tail(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut file = File::open(path)?;
        let len = file.metadata()?.len();
        let (bytes, from_start) = read_tail_bytes(&mut file, len, self.max_lines)?;
        Ok(split_tail_lines(&bytes, self.max_lines, from_start))
    }
}

impl Default for LogReader {
    fn default() -> Self {
        Self::new(DEFAULT_TAIL_LINES)
    }
}

/// Read backwards from `len` until more than `max_lines` newlines are buffered
/// or the start of the input is reached. Returns the bytes and whether they
/// begin at offset 0.
fn read_tail_bytes<R: Read + Seek>(
    reader: &mut R,
    len: u64,
    max_lines: usize,
) -> io::Result<(Vec<u8>, bool)> {
    let mut pos = len;
    // Newest chunk first
    let mut chunks: Vec<Vec<u8>> = Vec::new();
    let mut newlines = 0usize;

    while pos > 0 && newlines <= max_lines {
        let step = CHUNK_SIZE.min(pos);
        pos -= step;

        reader.seek(SeekFrom::Start(pos))?;
        let mut chunk = vec![0u8; step as usize];
        reader.read_exact(&mut chunk)?;

        newlines += chunk.iter().filter(|&&b| b == b'\n').count();
        chunks.push(chunk);
    }

    chunks.reverse();
    Ok((chunks.concat(), pos == 0))
}

/// Split buffered bytes into at most `max_lines` trailing lines
fn split_tail_lines(bytes: &[u8], max_lines: usize, from_start: bool) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    let mut lines: Vec<&str> = text.split('\n').collect();

    // Mid-file reads start inside a line (possibly inside a character)
    if !from_start && !lines.is_empty() {
        lines.remove(0);
    }
    if lines.last() == Some(&"") {
        lines.pop();
    }

    let start = lines.len().saturating_sub(max_lines);
    lines[start..]
        .iter()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}
