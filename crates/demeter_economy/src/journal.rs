//! # Operation Journal
//!
//! An append-only audit trail of committed economic operations. Not a
//! recovery log: replay tooling is out of scope, the journal exists so a
//! dispute ("where did my money go?") can be answered from disk.
//!
//! ## Format
//!
//! ```text
//! [4 bytes: magic "DJNL"]
//! [4 bytes: version]
//!
//! Record format:
//! [8 bytes: sequence number]
//! [4 bytes: payload length]
//! [N bytes: payload (UTF-8 line)]
//! [4 bytes: CRC32 of sequence + length + payload]
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::GameResult;

/// Magic bytes identifying a journal file.
const JOURNAL_MAGIC: &[u8; 4] = b"DJNL";

/// Current journal format version.
const JOURNAL_VERSION: u32 = 1;

/// Sanity cap on record payloads; anything larger is corruption.
const MAX_PAYLOAD: u32 = 64 * 1024;

/// The append-only operation journal.
pub struct Journal {
    file: Mutex<BufWriter<File>>,
    path: PathBuf,
    next_seq: AtomicU64,
}

impl Journal {
    /// Opens (or creates) a journal at `path`, appending after any
    /// existing records.
    ///
    /// # Errors
    ///
    /// I/O failure, or an existing file that is not a journal.
    pub fn open(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref().to_path_buf();
        let existing = match std::fs::metadata(&path) {
            Ok(meta) => meta.len() > 0,
            Err(_) => false,
        };

        let next_seq = if existing {
            // Count what is already there so sequence numbers continue.
            read_records(&path)?.last().map_or(0, |(seq, _)| seq + 1)
        } else {
            0
        };

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if !existing {
            file.write_all(JOURNAL_MAGIC)?;
            file.write_all(&JOURNAL_VERSION.to_le_bytes())?;
        }

        Ok(Self {
            file: Mutex::new(BufWriter::new(file)),
            path,
            next_seq: AtomicU64::new(next_seq),
        })
    }

    /// Appends one record. Buffered; call [`Journal::flush`] to force it
    /// to disk.
    ///
    /// # Errors
    ///
    /// I/O failure. The caller's unit of work has already committed when
    /// this runs; a journal failure is surfaced but does not unwind state.
    pub fn append(&self, line: &str) -> GameResult<()> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let payload = line.as_bytes();
        let len = payload.len() as u32;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&seq.to_le_bytes());
        hasher.update(&len.to_le_bytes());
        hasher.update(payload);
        let crc = hasher.finalize();

        let mut file = self.file.lock();
        file.write_all(&seq.to_le_bytes())?;
        file.write_all(&len.to_le_bytes())?;
        file.write_all(payload)?;
        file.write_all(&crc.to_le_bytes())?;
        Ok(())
    }

    /// Flushes buffered records to the OS.
    ///
    /// # Errors
    ///
    /// I/O failure.
    pub fn flush(&self) -> GameResult<()> {
        self.file.lock().flush()?;
        Ok(())
    }

    /// The journal's path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reads and verifies every record in a journal file.
///
/// # Errors
///
/// I/O failure, bad magic, or a CRC mismatch (reported as
/// `InvalidData` at the failing record).
pub fn read_records(path: impl AsRef<Path>) -> GameResult<Vec<(u64, String)>> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != JOURNAL_MAGIC {
        return Err(corrupt("bad journal magic").into());
    }
    let mut version = [0u8; 4];
    reader.read_exact(&mut version)?;

    let mut records = Vec::new();
    loop {
        let mut seq_bytes = [0u8; 8];
        match reader.read_exact(&mut seq_bytes) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err.into()),
        }
        let seq = u64::from_le_bytes(seq_bytes);

        let mut len_bytes = [0u8; 4];
        reader.read_exact(&mut len_bytes)?;
        let len = u32::from_le_bytes(len_bytes);
        if len > MAX_PAYLOAD {
            return Err(corrupt("journal record too large").into());
        }

        let mut payload = vec![0u8; len as usize];
        reader.read_exact(&mut payload)?;

        let mut crc_bytes = [0u8; 4];
        reader.read_exact(&mut crc_bytes)?;
        let stored_crc = u32::from_le_bytes(crc_bytes);

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&seq_bytes);
        hasher.update(&len_bytes);
        hasher.update(&payload);
        if hasher.finalize() != stored_crc {
            return Err(corrupt("journal record failed CRC").into());
        }

        let line = String::from_utf8(payload).map_err(|_| corrupt("journal record not UTF-8"))?;
        records.push((seq, line));
    }
    Ok(records)
}

fn corrupt(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}
