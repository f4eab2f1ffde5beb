use crate::directory::PartialFailure;
use glob::PatternError;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("File or folder {0} doesn't exist")]
    NotFound(PathBuf),
    #[error("Access to {0} is denied")]
    AccessDenied(PathBuf),
    #[error("Fail to read {0}: {1}")]
    IOError(PathBuf, io::Error),
    #[error("Signature algorithm \"{0}\" isn't supported")]
    UnsupportedAlgorithm(String),
    #[error("Path {0} cannot be hashed because it isn't a file")]
    NotFile(PathBuf),
    #[error("Path {0} cannot be used as root because it isn't a folder")]
    NotDirectory(PathBuf),
    #[error("{0}")]
    PartialFailure(Box<PartialFailure>),
    #[error("entry: {0}; error: {1}")]
    Bound(PathBuf, Box<E>),
    #[error("Operation has been aborted")]
    Aborted,
    #[error("Hasher error: {0}")]
    Hasher(String),
    #[error("Reader error on {0}: {1}")]
    Reader(PathBuf, String),
    #[error("Scenario strategy cannot include another scenario strategy")]
    NestedScenarioStrategy,
    #[error("No reading strategy has been defined for file size {0} bytes")]
    NoRangeForScenarioStrategy(u64),
    #[error("Fail to get optimal threads number")]
    OptimalThreadsNumber,
    #[error("Fail get feedback from hashing thread: {0}")]
    JoinError(String),
    #[error("Fail to parse pattern {0}: {1}")]
    PatternError(String, PatternError),
    #[error("Invalid signature \"{0}\"")]
    InvalidSignature(String),
    #[error("Hashing of {0} panicked: {1}")]
    Panicked(PathBuf, String),
}

impl E {
    /// Maps an IO error to the matching variant, binding it to the path which caused it.
    pub fn from_io<P: AsRef<Path>>(path: P, err: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => E::NotFound(path),
            io::ErrorKind::PermissionDenied => E::AccessDenied(path),
            _ => E::IOError(path, err),
        }
    }

    /// Returns the underlying error if this one is bound to a path.
    pub fn cause(&self) -> &E {
        if let E::Bound(_, err) = self {
            err.cause()
        } else {
            self
        }
    }
}

impl From<(String, PatternError)> for E {
    fn from(err: (String, PatternError)) -> Self {
        E::PatternError(err.0, err.1)
    }
}

impl From<PartialFailure> for E {
    fn from(report: PartialFailure) -> Self {
        E::PartialFailure(Box::new(report))
    }
}
