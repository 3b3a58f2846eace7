use std::any::Any;

use coinfolio_core::errors::{DatabaseError, Error, Result};
use diesel::SqliteConnection;
use log::{debug, error};
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;

type AnyBox = Box<dyn Any + Send + 'static>;
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type Envelope = (Job<AnyBox>, oneshot::Sender<Result<AnyBox>>);

const QUEUE_CAPACITY: usize = 1024;

fn writer_gone() -> Error {
    Error::Database(DatabaseError::ConnectionFailed(
        "Database writer is not running".to_string(),
    ))
}

/// Handle for submitting write jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Runs `job` on the writer's connection inside an immediate transaction.
    /// Any error returned by the job rolls the transaction back and is handed
    /// back to the caller unchanged.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (ret_tx, ret_rx) = oneshot::channel();
        let erased: Job<AnyBox> = Box::new(move |conn| job(conn).map(|v| Box::new(v) as AnyBox));

        self.tx
            .send((erased, ret_tx))
            .await
            .map_err(|_| writer_gone())?;

        let boxed = ret_rx.await.map_err(|_| writer_gone())??;
        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Writer returned an unexpected result type".to_string(),
            ))
        })
    }
}

/// Spawns the task that owns the single write connection and runs jobs one at a time.
/// Must be called from within a tokio runtime.
pub fn spawn_writer(pool: DbPool) -> Result<WriteHandle> {
    let mut conn = pool.get().map_err(StorageError::from)?;
    let (tx, mut rx) = mpsc::channel::<Envelope>(QUEUE_CAPACITY);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<AnyBox> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);
            if let Err(ref e) = result {
                debug!("Write job rolled back: {}", e);
            }
            if reply_tx.send(result).is_err() {
                error!("Write job caller went away before receiving the result");
            }
        }
        debug!("Database writer stopped");
    });

    Ok(WriteHandle { tx })
}
