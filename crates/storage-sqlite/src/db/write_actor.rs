use std::any::Any;
use std::time::{Duration, Instant};

use diesel::SqliteConnection;
use log::error;
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;
use fintrack_core::errors::{DatabaseError, Error, Result};

// Type alias for the job to be executed by the writer actor.
// It takes a mutable reference to a SqliteConnection and returns a Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type AnyBox = Box<dyn Any + Send + 'static>;

/// A queued job together with its optional commit deadline and reply channel.
struct Envelope {
    job: Job<AnyBox>,
    deadline: Option<(Instant, Duration)>,
    reply: oneshot::Sender<Result<AnyBox>>,
}

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside an immediate transaction: any error it returns
    /// rolls back everything it wrote.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        self.submit(job, None).await
    }

    /// Like [`exec`](Self::exec), but the transaction must commit within
    /// `timeout` of this call. Time spent waiting in the queue counts. When the
    /// deadline passes the transaction is rolled back and
    /// `DatabaseError::TransactionTimeout` is returned.
    pub async fn exec_with_timeout<F, T>(&self, timeout: Duration, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        self.submit(job, Some((Instant::now() + timeout, timeout)))
            .await
    }

    async fn submit<F, T>(&self, job: F, deadline: Option<(Instant, Duration)>) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (reply, ret_rx) = oneshot::channel();
        let envelope = Envelope {
            job: Box::new(move |c| job(c).map(|v| Box::new(v) as AnyBox)),
            deadline,
            reply,
        };

        self.tx.send(envelope).await.map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Writer actor stopped accepting jobs".to_string(),
            ))
        })?;

        let boxed = ret_rx.await.map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Writer actor dropped the job without replying".to_string(),
            ))
        })??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            Error::Unexpected("Writer actor returned a value of the wrong type".to_string())
        })
    }
}

fn check_deadline(deadline: Option<(Instant, Duration)>) -> Result<()> {
    match deadline {
        Some((at, timeout)) if Instant::now() >= at => Err(Error::Database(
            DatabaseError::TransactionTimeout(timeout.as_millis() as u64),
        )),
        _ => Ok(()),
    }
}

/// Spawns a background Tokio task that acts as the single writer to the database.
/// The actor owns one connection from the pool and processes write jobs serially.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                // Dropping the receiver makes every pending and future job fail.
                error!("Writer actor could not acquire a database connection: {}", e);
                return;
            }
        };

        while let Some(Envelope {
            job,
            deadline,
            reply,
        }) = rx.recv().await
        {
            let result: Result<AnyBox> = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    check_deadline(deadline)?;
                    let value = job(c)?;
                    // Returning an error here rolls the transaction back.
                    check_deadline(deadline)?;
                    Ok(value)
                })
                .map_err(Error::from);

            // The requester may have gone away; nothing to do then.
            let _ = reply.send(result);
        }
    });

    WriteHandle { tx }
}
