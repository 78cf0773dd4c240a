//! Pair comparators: exact byte equality and fuzzy similarity.
//!
//! Both comparators operate on a single pair of files and share no
//! state between invocations. Read failures are surfaced as
//! [`CompareError`] for the caller to log and count; the orchestrator
//! treats a failed comparison as "no match" rather than aborting.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::scanner::FileRef;

use super::Pair;

/// Read buffer size for streamed exact comparison.
const COMPARE_CHUNK_SIZE: usize = 64 * 1024;

/// Error from comparing a pair of files.
///
/// Clonable (the io source is Arc'd) so it can be collected into scan
/// statistics after the parallel phase.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to read {path}: {source}")]
pub struct CompareError {
    /// Path that could not be read
    pub path: PathBuf,
    /// The underlying I/O error
    #[source]
    pub source: Arc<io::Error>,
}

impl CompareError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source: Arc::new(source),
        }
    }
}

/// Outcome of comparing one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// The pair that was compared
    pub pair: Pair,
    /// Exact mode: whether the files are byte-identical.
    /// Fuzzy mode: whether the ratio met the caller's threshold.
    pub matched: bool,
}

/// Compare two files for exact byte equality.
///
/// The length check runs first, so two files of different sizes never
/// touch the disk. Content is streamed in 64 KiB chunks; the whole
/// file is never held in memory.
///
/// # Errors
///
/// Returns [`CompareError`] if either file cannot be read. Callers
/// treat this as a non-match and keep going.
pub fn compare_exact(a: &FileRef, b: &FileRef) -> Result<bool, CompareError> {
    if a.size != b.size {
        return Ok(false);
    }
    if a.size == 0 {
        // Two empty files are trivially identical.
        return Ok(true);
    }

    let fa = File::open(&a.path).map_err(|e| CompareError::new(&a.path, e))?;
    let fb = File::open(&b.path).map_err(|e| CompareError::new(&b.path, e))?;
    let mut ra = BufReader::with_capacity(COMPARE_CHUNK_SIZE, fa);
    let mut rb = BufReader::with_capacity(COMPARE_CHUNK_SIZE, fb);

    let mut buf_a = vec![0u8; COMPARE_CHUNK_SIZE];
    let mut buf_b = vec![0u8; COMPARE_CHUNK_SIZE];

    loop {
        let na = read_full(&mut ra, &mut buf_a).map_err(|e| CompareError::new(&a.path, e))?;
        let nb = read_full(&mut rb, &mut buf_b).map_err(|e| CompareError::new(&b.path, e))?;

        if na != nb {
            // Sizes were equal at capture time but the files changed
            // under us; whatever is on disk now is not identical.
            return Ok(false);
        }
        if na == 0 {
            return Ok(true);
        }
        if buf_a[..na] != buf_b[..nb] {
            return Ok(false);
        }
    }
}

/// Read until the buffer is full or EOF, returning the byte count.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Compute a fuzzy similarity ratio in [0, 1] between two files.
///
/// This is the quick-ratio upper bound: twice the size of the
/// intersection of the two byte multisets, divided by the total byte
/// count. Byte-identical files score exactly 1.0; lower values rank
/// near-duplicates but prove nothing. A fast estimate, deliberately
/// not an edit distance.
///
/// Two empty files are defined as identical (ratio 1.0).
///
/// # Errors
///
/// Returns [`CompareError`] if either file cannot be read.
pub fn similarity(a: &FileRef, b: &FileRef) -> Result<f64, CompareError> {
    let counts_a = byte_histogram(&a.path)?;
    let counts_b = byte_histogram(&b.path)?;

    let len_a: u64 = counts_a.iter().sum();
    let len_b: u64 = counts_b.iter().sum();
    if len_a + len_b == 0 {
        return Ok(1.0);
    }

    let common: u64 = counts_a
        .iter()
        .zip(counts_b.iter())
        .map(|(&ca, &cb)| ca.min(cb))
        .sum();

    Ok(2.0 * common as f64 / (len_a + len_b) as f64)
}

/// Histogram of byte values for a file, streamed in chunks.
fn byte_histogram(path: &Path) -> Result<[u64; 256], CompareError> {
    let file = File::open(path).map_err(|e| CompareError::new(path, e))?;
    let mut reader = BufReader::with_capacity(COMPARE_CHUNK_SIZE, file);
    let mut counts = [0u64; 256];
    let mut buf = vec![0u8; COMPARE_CHUNK_SIZE];

    loop {
        let n = read_full(&mut reader, &mut buf).map_err(|e| CompareError::new(path, e))?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            counts[byte as usize] += 1;
        }
    }

    Ok(counts)
}
