use super::{
    filter::{Filter, FilterAccepted, Filters},
    DirectoryHasher,
};
use crate::{file::absolute, ReadingStrategy, E};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Multiplier of the number of cores which limits the number of hashing threads.
pub(crate) const MAX_THREADS_MLT_TO_CORES: usize = 4;

/// Policy applied to errors on the level of a single file or folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Tolerance {
    /// Fail-soft: problematic paths are logged and skipped. The scan ends with
    /// `E::PartialFailure` if at least one path has failed.
    LogErrors,
    /// Fail-soft as `LogErrors`, but without logging.
    DoNotLogErrors,
    /// Fail-fast: the first error stops the scan.
    #[default]
    StopOnErrors,
}

/// Configuration of `DirectoryHasher`.
///
/// # Example
///
/// ```no_run
/// use fhash::{Filter, Options, SignatureAlgorithm, Tolerance};
///
/// let mut hasher = Options::from("/var/www")
///     .unwrap()
///     .recursive(true)
///     .tolerance(Tolerance::LogErrors)
///     .exclude(Filter::Folders(".git"))
///     .unwrap()
///     .hasher();
/// let signatures = hasher.hash(SignatureAlgorithm::Sha256).unwrap();
/// for (path, signature) in signatures.iter() {
///     println!("{}: {signature}", path.display());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub(crate) root: PathBuf,
    pub(crate) recursive: bool,
    pub(crate) tolerance: Tolerance,
    pub(crate) threads: Option<usize>,
    pub(crate) reading_strategy: ReadingStrategy,
    pub(crate) progress: bool,
    pub(crate) filters: Filters,
}

impl Options {
    /// Creates options for the given root folder. A relative path is joined to the current
    /// working directory.
    ///
    /// # Errors
    ///
    /// - `E::NotFound` if the root doesn't exist.
    /// - `E::NotDirectory` if the root isn't a folder.
    pub fn from<P: AsRef<Path>>(root: P) -> Result<Self, E> {
        let root = absolute(root.as_ref())?;
        let md = fs::metadata(&root).map_err(|err| E::from_io(&root, err))?;
        if !md.is_dir() {
            return Err(E::NotDirectory(root));
        }
        Ok(Self {
            root,
            ..Default::default()
        })
    }

    /// With `true`, all nested folders are read transitively. Otherwise (default) only files
    /// directly placed in the root are hashed.
    pub fn recursive(&mut self, recursive: bool) -> &mut Self {
        self.recursive = recursive;
        self
    }

    pub fn tolerance(&mut self, tolerance: Tolerance) -> &mut Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the number of hashing threads. By default equal to the number of available cores.
    pub fn threads(&mut self, threads: usize) -> &mut Self {
        self.threads = Some(threads);
        self
    }

    pub fn reading_strategy(&mut self, strategy: ReadingStrategy) -> Result<&mut Self, E> {
        strategy.validate()?;
        self.reading_strategy = strategy;
        Ok(self)
    }

    /// Enables progress tracking. See `DirectoryHasher::progress()`.
    pub fn progress(&mut self) -> &mut Self {
        self.progress = true;
        self
    }

    pub fn include<T: AsRef<str>>(&mut self, filter: Filter<T>) -> Result<&mut Self, E> {
        self.filters.add(FilterAccepted::try_from(filter)?, true);
        Ok(self)
    }

    pub fn exclude<T: AsRef<str>>(&mut self, filter: Filter<T>) -> Result<&mut Self, E> {
        self.filters.add(FilterAccepted::try_from(filter)?, false);
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn hasher(&mut self) -> DirectoryHasher {
        DirectoryHasher::with_options(self.clone())
    }
}
