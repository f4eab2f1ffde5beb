mod collector;
mod filter;
mod map;
pub(crate) mod options;
mod pool;
mod progress;
mod worker;

use crate::{
    reader::{Buffering, Mapping},
    Breaker, Reader, SignatureAlgorithm, E,
};
use collector::Collector;
pub use filter::Filter;
use log::{debug, error, warn};
pub use map::{DirectorySignatureMap, PartialFailure};
pub use options::{Options, Tolerance};
use pool::Pool;
pub use progress::{JobType, Progress, ProgressChannel, Tick};
use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    sync::mpsc::{channel, Receiver, Sender},
    thread,
    time::Instant,
};
use worker::Worker;

/// The minimum number of paths given to a hash worker in one job.
const MIN_PATHS_PER_JOB: usize = 2;
/// The maximum number of paths given to a hash worker in one job.
const MAX_PATHS_PER_JOB: usize = 500;

/// Message from hash workers to `DirectoryHasher`.
pub(crate) enum Action {
    /// Results of one job.
    ///
    /// # Parameters
    /// - `usize`: Worker's ID.
    /// - `Vec<(PathBuf, Signature)>`: Successfully hashed files.
    /// - `Vec<(PathBuf, E)>`: Files which failed, with the related errors.
    Processed(usize, Vec<(PathBuf, crate::Signature)>, Vec<(PathBuf, E)>),
}

/// Applies the tolerance to an error related to the given path. With `Tolerance::StopOnErrors`
/// the error is returned bound to the path; otherwise it's stored in `failures`.
pub(crate) fn report(
    path: PathBuf,
    err: E,
    tolerance: &Tolerance,
    failures: &mut Vec<(PathBuf, E)>,
) -> Result<(), E> {
    match tolerance {
        Tolerance::StopOnErrors => {
            error!("entry: {}; error: {err}", path.display());
            return Err(E::Bound(path, Box::new(err)));
        }
        Tolerance::LogErrors => {
            warn!("entry: {}; error: {err}", path.display());
        }
        Tolerance::DoNotLogErrors => {}
    };
    failures.push((path, err));
    Ok(())
}

/// Calculates signatures of the files of a folder with default settings: fail-fast, chunked
/// reading, one thread per core.
///
/// # Errors
///
/// - `E::NotFound` or `E::NotDirectory` if the root cannot be used.
/// - `E::Bound(path, cause)` for the first file or folder which failed. `E::cause()` gives the
///   underlying `E::NotFound`, `E::AccessDenied`, `E::IOError` and so on.
///
/// # Example
///
/// ```no_run
/// use fhash::{hash_directory, SignatureAlgorithm};
///
/// let signatures = hash_directory(".", true, SignatureAlgorithm::Md5).unwrap();
/// for (path, signature) in &signatures {
///     println!("{}: {signature}", path.display());
/// }
/// ```
pub fn hash_directory<P: AsRef<Path>>(
    root: P,
    recursive: bool,
    algorithm: SignatureAlgorithm,
) -> Result<DirectorySignatureMap, E> {
    DirectoryHasher::new(root, recursive)?.hash(algorithm)
}

/// `DirectoryHasher` collects the files of a root folder (optionally with all nested folders) and
/// calculates the signature of each of them.
///
/// Collecting is done on the calling thread. Hashing is spread between worker threads; results
/// are gathered by the calling thread only, into a map ordered by path. Each call of `hash()`
/// reads the file system again, nothing is cached between calls.
///
/// Errors are handled according to `Tolerance`. With `Tolerance::StopOnErrors` (default) the
/// first error stops the scan and is returned as `E::Bound(path, cause)`; use `E::cause()` to
/// match on the underlying error. Other levels let the scan go on; if some paths have failed, the
/// result is `E::PartialFailure` which carries the signatures of all other files.
///
/// The scan can be interrupted with the `Breaker` given by `breaker()`. In this case `hash()`
/// returns `E::Aborted` after all worker threads are stopped.
#[derive(Debug)]
pub struct DirectoryHasher {
    opt: Options,
    breaker: Breaker,
    progress: Option<ProgressChannel>,
}

impl DirectoryHasher {
    /// Creates a hasher for the given root with default options.
    ///
    /// # Errors
    ///
    /// - `E::NotFound` if the root doesn't exist.
    /// - `E::NotDirectory` if the root isn't a folder.
    pub fn new<P: AsRef<Path>>(root: P, recursive: bool) -> Result<Self, E> {
        Ok(Options::from(root)?.recursive(recursive).hasher())
    }

    pub fn with_options(opt: Options) -> Self {
        let progress = opt.progress.then(Progress::channel);
        Self {
            opt,
            breaker: Breaker::new(),
            progress,
        }
    }

    pub fn root(&self) -> &Path {
        &self.opt.root
    }

    pub fn is_recursive(&self) -> bool {
        self.opt.recursive
    }

    /// Returns a `Breaker` which can be used to abort hashing.
    pub fn breaker(&self) -> Breaker {
        self.breaker.clone()
    }

    /// Returns a channel for tracking the progress of the next call of `hash()`. The channel is
    /// closed as soon as `hash()` is done; before calling `hash()` again a new receiver has to be
    /// requested. Returns `None` if progress tracking isn't enabled in `Options` or if the
    /// receiver has been taken already.
    pub fn progress(&mut self) -> Option<Receiver<Tick>> {
        self.progress.as_mut().and_then(|(_, rx)| rx.take())
    }

    /// Calculates signatures of all collected files with the given algorithm. `Mapping` reader is
    /// used if the reading strategy may require memory mapping, `Buffering` otherwise.
    pub fn hash(&mut self, algorithm: SignatureAlgorithm) -> Result<DirectorySignatureMap, E> {
        if self.opt.reading_strategy.maps() {
            self.hash_with::<Mapping>(algorithm)
        } else {
            self.hash_with::<Buffering>(algorithm)
        }
    }

    /// Same as `hash()`, but with the given implementation of `Reader`.
    pub fn hash_with<R: Reader + 'static>(
        &mut self,
        algorithm: SignatureAlgorithm,
    ) -> Result<DirectorySignatureMap, E> {
        let now = Instant::now();
        self.breaker.reset();
        // The channel stays alive until the end of hashing even if nobody listens to it.
        let channel = self.progress.take();
        let progress = channel.as_ref().map(|(progress, _)| progress);
        let result = self.scan::<R>(algorithm, progress);
        drop(channel);
        self.progress = self.opt.progress.then(Progress::channel);
        debug!(
            "{algorithm} of {} in {}µs / {}ms / {}s",
            self.opt.root.display(),
            now.elapsed().as_micros(),
            now.elapsed().as_millis(),
            now.elapsed().as_secs()
        );
        let (signatures, failures) = result?;
        if failures.is_empty() {
            Ok(signatures)
        } else {
            Err(PartialFailure {
                signatures,
                failures,
            }
            .into())
        }
    }

    fn threads(&self) -> Result<usize, E> {
        let cores = thread::available_parallelism()
            .ok()
            .map(|n| n.get())
            .ok_or(E::OptimalThreadsNumber)?;
        match self.opt.threads {
            Some(threads) if threads == 0 || threads > cores * options::MAX_THREADS_MLT_TO_CORES => {
                Err(E::OptimalThreadsNumber)
            }
            Some(threads) => Ok(threads),
            None => Ok(cores),
        }
    }

    fn scan<R: Reader + 'static>(
        &self,
        algorithm: SignatureAlgorithm,
        progress: Option<&Progress>,
    ) -> Result<(DirectorySignatureMap, Vec<(PathBuf, E)>), E> {
        let threads = self.threads()?;
        let (collected, mut failures) = Collector::new(&self.opt, &self.breaker, progress).collect()?;
        let mut signatures = DirectorySignatureMap::new(algorithm);
        if collected.is_empty() {
            return Ok((signatures, failures));
        }
        let total = collected.len();
        let paths_per_job =
            ((total as f64 * 0.05).ceil() as usize).clamp(MIN_PATHS_PER_JOB, MAX_PATHS_PER_JOB);
        let mut queue: VecDeque<PathBuf> = collected.into();
        let mut next_job = || -> Option<Vec<PathBuf>> {
            let count = paths_per_job.min(queue.len());
            (count > 0).then(|| queue.drain(..count).collect())
        };
        let (tx_queue, rx_queue): (Sender<Action>, Receiver<Action>) = channel();
        let halt = Breaker::new();
        let mut pool = Pool::new::<R>(
            threads.min(total.div_ceil(paths_per_job)),
            tx_queue,
            algorithm,
            &self.opt.reading_strategy,
            &self.breaker,
            &halt,
        );
        debug!(
            "Created pool with {} workers for hashing {total} files",
            pool.workers().len()
        );
        let mut pending: usize = 0;
        let outcome: Result<(), E> = 'outer: {
            for worker in pool.workers() {
                let Some(jobs) = next_job() else {
                    break;
                };
                if let Err(err) = worker.delegate(jobs) {
                    break 'outer Err(err);
                }
                pending += 1;
            }
            while pending > 0 {
                let Ok(Action::Processed(id, processed, reports)) = rx_queue.recv() else {
                    break 'outer Err(E::JoinError(String::from(
                        "all hasher workers are down",
                    )));
                };
                pending -= 1;
                for (path, signature) in processed.into_iter() {
                    signatures.insert(path, signature);
                }
                for (path, err) in reports.into_iter() {
                    if let Err(err) = report(path, err, &self.opt.tolerance, &mut failures) {
                        break 'outer Err(err);
                    }
                }
                if let Some(progress) = progress {
                    progress.notify(JobType::Hashing, signatures.len() + failures.len(), total);
                }
                if self.breaker.is_aborted() {
                    break 'outer Err(E::Aborted);
                }
                if let Some(jobs) = next_job() {
                    if let Err(err) = pool.delegate(id, jobs) {
                        break 'outer Err(err);
                    }
                    pending += 1;
                }
            }
            Ok(())
        };
        if outcome.is_err() {
            halt.abort();
        }
        pool.shutdown();
        outcome?;
        Ok((signatures, failures))
    }
}
