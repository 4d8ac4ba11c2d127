//! Read-only connections for file-backed databases.
//!
//! Under WAL, readers run alongside the writer and see every committed write.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};

use rusqlite::{Connection, OpenFlags};

use affinity_core::errors::AffinityResult;

use super::pragmas::apply_read_pragmas;
use crate::to_storage_err;

/// Upper bound on `StorageConfig::read_pool_size`.
pub const MAX_READERS: usize = 8;

pub struct ReadPool {
    readers: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ReadPool {
    /// Open `size` read-only connections (clamped to `1..=MAX_READERS`).
    pub fn open(path: &Path, size: usize, busy_timeout_ms: u32) -> AffinityResult<Self> {
        let readers = (0..size.clamp(1, MAX_READERS))
            .map(|_| {
                let conn = Connection::open_with_flags(
                    path,
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )
                .map_err(|e| to_storage_err(format!("open reader: {e}")))?;
                apply_read_pragmas(&conn, busy_timeout_ms)?;
                Ok(Mutex::new(conn))
            })
            .collect::<AffinityResult<Vec<_>>>()?;
        Ok(Self {
            readers,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Run `f` on an idle reader if one is free, otherwise wait for the
    /// reader at the rotating cursor.
    pub fn with_conn<F, T>(&self, f: F) -> AffinityResult<T>
    where
        F: FnOnce(&Connection) -> AffinityResult<T>,
    {
        let guard = self.checkout()?;
        f(&guard)
    }

    pub fn size(&self) -> usize {
        self.readers.len()
    }

    fn checkout(&self) -> AffinityResult<MutexGuard<'_, Connection>> {
        let start = self.cursor.fetch_add(1, Ordering::Relaxed);
        let n = self.readers.len();
        for offset in 0..n {
            match self.readers[(start + offset) % n].try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::WouldBlock) => continue,
                Err(TryLockError::Poisoned(e)) => {
                    return Err(to_storage_err(format!("reader poisoned: {e}")))
                }
            }
        }
        self.readers[start % n]
            .lock()
            .map_err(|e| to_storage_err(format!("reader poisoned: {e}")))
    }
}
