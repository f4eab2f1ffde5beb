use super::{Action, Worker};
use crate::{Breaker, ReadingStrategy, Reader, SignatureAlgorithm, E};
use std::{path::PathBuf, sync::mpsc::Sender};

pub(crate) struct Pool {
    workers: Vec<Worker>,
}

impl Pool {
    pub fn new<R: Reader + 'static>(
        count: usize,
        tx_queue: Sender<Action>,
        algorithm: SignatureAlgorithm,
        strategy: &ReadingStrategy,
        breaker: &Breaker,
        halt: &Breaker,
    ) -> Self {
        let workers = (0..count)
            .map(|id| {
                Worker::run::<R>(
                    id,
                    tx_queue.clone(),
                    algorithm,
                    strategy.clone(),
                    breaker.clone(),
                    halt.clone(),
                )
            })
            .collect();
        Self { workers }
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn delegate(&self, id: usize, jobs: Vec<PathBuf>) -> Result<(), E> {
        self.workers
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| E::JoinError(format!("hasher worker #{id} doesn't exist")))?
            .delegate(jobs)
    }

    /// Stops all workers and waits until their threads are finished.
    pub fn shutdown(&mut self) {
        for worker in self.workers.iter_mut() {
            worker.shutdown();
        }
    }
}
