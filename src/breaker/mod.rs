use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// `Breaker` is used for aborting directory scans and the reading of files. The state is checked
/// cooperatively: between directory entries, between files and between chunks of one file. An
/// aborted operation returns `E::Aborted` once all its threads have stopped, so no file handle
/// outlives the call.
///
/// `DirectoryHasher::hash()` resets the state of its `Breaker` before it starts.
///
/// Cloning: a cloned instance is bound with the parent instance. `Breaker` is safe to be shared
/// between threads.
#[derive(Default, Debug, Clone)]
pub struct Breaker {
    state: Arc<AtomicBool>,
}

impl Breaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&self) {
        self.state.store(false, Ordering::SeqCst)
    }

    /// Checks if the operation has been aborted.
    pub fn is_aborted(&self) -> bool {
        self.state.load(Ordering::SeqCst)
    }

    /// Requests abortion of the operation. It stops at the earliest possible time but not
    /// instantaneously.
    pub fn abort(&self) {
        self.state.store(true, Ordering::SeqCst)
    }
}
