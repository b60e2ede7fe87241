use super::DbPool;
use crate::errors::StorageError;
use backoffice_core::errors::{DatabaseError, Error, Result};
use diesel::SqliteConnection;
use log::{debug, error};
use std::sync::mpsc;
use std::thread;

// A job runs its own transaction and sends its own reply, so the writer
// thread never sees the job's return type.
type Job = Box<dyn FnOnce(&mut SqliteConnection) + Send + 'static>;

const QUEUE_DEPTH: usize = 1024;

/// Handle for sending jobs to the single writer thread.
///
/// Every job runs inside `BEGIN IMMEDIATE`, one at a time, on a connection
/// the writer owns for its whole life. Reads go straight to the pool.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::SyncSender<Job>,
}

impl WriteHandle {
    /// Runs `job` in a write transaction and blocks until it has committed
    /// or rolled back.
    ///
    /// Any error returned by the job rolls the transaction back and is
    /// handed to the caller unchanged.
    pub fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = mpsc::sync_channel::<Result<T>>(1);

        let wrapped: Job = Box::new(move |conn| {
            let result = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);
            // The caller may have gone away; the outcome is committed either way.
            let _ = reply_tx.send(result);
        });

        self.tx.send(wrapped).map_err(|_| writer_stopped())?;
        reply_rx.recv().map_err(|_| writer_stopped())?
    }
}

fn writer_stopped() -> Error {
    Error::Database(DatabaseError::Internal(
        "Database writer is not running".to_string(),
    ))
}

/// Starts the writer thread with one connection taken from `pool`.
///
/// The thread exits once every `WriteHandle` has been dropped.
pub fn spawn_writer(pool: DbPool) -> Result<WriteHandle> {
    let mut conn = pool
        .get()
        .map_err(|e| Error::Database(DatabaseError::ConnectionFailed(e.to_string())))?;
    let (tx, rx) = mpsc::sync_channel::<Job>(QUEUE_DEPTH);

    thread::Builder::new()
        .name("db-writer".to_string())
        .spawn(move || {
            while let Ok(job) = rx.recv() {
                job(&mut *conn);
            }
            debug!("Database writer stopped");
        })
        .map_err(|e| {
            error!("Failed to start database writer: {}", e);
            Error::Database(DatabaseError::Internal(e.to_string()))
        })?;

    Ok(WriteHandle { tx })
}
