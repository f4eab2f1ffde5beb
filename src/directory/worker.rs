use super::Action;
use crate::{file, Breaker, ReadingStrategy, Reader, SignatureAlgorithm, E};
use log::{debug, error};
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
    sync::mpsc::{channel, Receiver, SendError, Sender},
    thread::{self, JoinHandle},
};

/// Messages for communication between `DirectoryHasher` and `Worker`.
enum Task {
    /// Hash the given files.
    Hash(Vec<PathBuf>),
    /// Break the listening loop of the `Worker`. Once `Shutdown` has been sent, the `Worker`
    /// cannot be reused.
    Shutdown,
}

/// `Worker` runs one thread which hashes the files it gets. Each file is opened, read and closed
/// inside of one call of the file hashing routine, so a worker never keeps a file open between
/// jobs.
///
/// Error handling: `Worker` doesn't decide what to do with errors. All of them are reported back
/// together with the results of the job, and `DirectoryHasher` applies its tolerance. A panic in
/// a `Reader` or `Hasher` is caught and reported as `E::Panicked` for the file being hashed, so
/// every job gets an answer.
pub(crate) struct Worker {
    pub id: usize,
    tx_task: Sender<Task>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn run<R: Reader + 'static>(
        id: usize,
        tx_queue: Sender<Action>,
        algorithm: SignatureAlgorithm,
        strategy: ReadingStrategy,
        breaker: Breaker,
        halt: Breaker,
    ) -> Self {
        let (tx_task, rx_task): (Sender<Task>, Receiver<Task>) = channel();
        let handle = thread::spawn(move || {
            'outer: while let Ok(task) = rx_task.recv() {
                let jobs = match task {
                    Task::Hash(jobs) => jobs,
                    Task::Shutdown => break 'outer,
                };
                let mut processed = Vec::new();
                let mut failures = Vec::new();
                for path in jobs.into_iter() {
                    if breaker.is_aborted() || halt.is_aborted() {
                        break;
                    }
                    let outcome = guarded(&path, || {
                        file::signature::<R>(&path, algorithm, &strategy, &breaker)
                    });
                    match outcome {
                        Ok(signature) => processed.push((path, signature)),
                        Err(E::Aborted) => break,
                        Err(err) => failures.push((path, err)),
                    }
                }
                if tx_queue
                    .send(Action::Processed(id, processed, failures))
                    .is_err()
                {
                    error!("Hasher worker #{id} cannot communicate with pool and will be closed");
                    break 'outer;
                }
            }
            debug!("Hasher worker #{id} has been shutdown");
        });
        Self {
            id,
            tx_task,
            handle: Some(handle),
        }
    }

    pub fn delegate(&self, jobs: Vec<PathBuf>) -> Result<(), E> {
        self.tx_task
            .send(Task::Hash(jobs))
            .map_err(|SendError(_)| E::JoinError(format!("hasher worker #{} is down", self.id)))
    }

    /// Sends command to `Worker` to exit from a listener loop and waits for the thread.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.tx_task.send(Task::Shutdown);
            let _ = handle.join();
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Runs the hashing of one file, turning a panic into an error of this file.
fn guarded<T, F: FnOnce() -> Result<T, E>>(path: &Path, hashing: F) -> Result<T, E> {
    panic::catch_unwind(AssertUnwindSafe(hashing)).unwrap_or_else(|payload| {
        let reason = panic_message(payload.as_ref());
        error!("Hashing of {} panicked: {reason}", path.display());
        Err(E::Panicked(path.to_path_buf(), reason))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        String::from("unknown reason")
    }
}
