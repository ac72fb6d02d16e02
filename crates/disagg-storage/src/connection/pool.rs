//! Read-only connections for looking up stored results while a run writes.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, TryLockError};

use disagg_core::errors::StorageError;
use rusqlite::{Connection, OpenFlags};

use super::pragmas::apply_read_pragmas;

/// Readers opened per on-disk database.
pub const RESULT_READERS: usize = 4;

/// Fixed set of `query_only` connections to one results file.
///
/// A lookup takes the first idle connection, starting from a rotating
/// offset, and waits on the connection at that offset only when all of
/// them are busy.
pub struct ReaderPool {
    readers: Box<[Mutex<Connection>]>,
    cursor: AtomicUsize,
}

impl ReaderPool {
    /// Opens `count` readers (at least one) on the database at `path`.
    pub fn open(path: &Path, count: usize) -> Result<Self, StorageError> {
        let readers = (0..count.max(1))
            .map(|_| open_reader(path).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            readers: readers.into_boxed_slice(),
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// Runs `f` on an idle reader.
    pub fn read<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let n = self.readers.len();
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % n;
        for offset in 0..n {
            match self.readers[(start + offset) % n].try_lock() {
                Ok(conn) => return f(&conn),
                Err(TryLockError::WouldBlock) => continue,
                Err(TryLockError::Poisoned(_)) => return Err(poisoned()),
            }
        }
        let conn = self.readers[start].lock().map_err(|_| poisoned())?;
        f(&conn)
    }
}

fn open_reader(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| StorageError::SqliteError {
        message: format!("cannot open reader on {}: {e}", path.display()),
    })?;
    apply_read_pragmas(&conn)?;
    Ok(conn)
}

fn poisoned() -> StorageError {
    StorageError::SqliteError {
        message: "result reader poisoned by a panicking query".to_string(),
    }
}
