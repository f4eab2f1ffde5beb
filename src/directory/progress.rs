use log::warn;
use std::{
    fmt,
    sync::mpsc::{channel, Receiver, Sender},
};

/// Stage of a directory scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    /// Folders are being listed.
    #[default]
    Collecting,
    /// Collected files are being hashed.
    Hashing,
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Collecting => "collecting",
            Self::Hashing => "hashing",
        })
    }
}

/// One notification about the state of a directory scan. While collecting, `total` is the number
/// of files found so far, so it's always equal to `done`. While hashing, `done` counts both
/// hashed and failed files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tick {
    pub done: usize,
    pub total: usize,
    pub job: JobType,
}

impl Tick {
    /// Share of done work in percents. An empty job is complete.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.done.min(self.total) * 100 / self.total
        }
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}% ({} of {})",
            self.job,
            self.percent(),
            self.done,
            self.total
        )
    }
}

/// Sending side of the progress channel together with the receiver, which is handed out once.
pub type ProgressChannel = (Progress, Option<Receiver<Tick>>);

/// Sends `Tick`s of one scan. Nobody is obliged to listen: if the receiver has been dropped,
/// ticks are discarded.
#[derive(Debug, Clone)]
pub struct Progress {
    tx: Sender<Tick>,
}

impl Progress {
    pub(crate) fn channel() -> ProgressChannel {
        let (tx, rx) = channel();
        (Progress { tx }, Some(rx))
    }

    /// Reports the current state of `job`.
    pub fn notify(&self, job: JobType, done: usize, total: usize) {
        if self.tx.send(Tick { done, total, job }).is_err() {
            warn!("{job} progress is lost: receiver has been dropped");
        }
    }
}
