mod strategy;

use crate::{
    hasher::{self, Hasher, SignatureAlgorithm},
    reader::{Buffering, Mapping, Reader},
    Breaker, FileSignatureEntry, Signature, E,
};
use log::debug;
use std::{
    env, fs,
    io::{ErrorKind, Read},
    path::{Path, PathBuf},
    time::Instant,
};
pub use strategy::ReadingStrategy;

/// Size of chunk used with `ReadingStrategy::Buffer`.
pub const BUFFER_SIZE: usize = 1024 * 32;

/// Calculates the signature of a single file with default settings: content is read in chunks,
/// no cancellation.
///
/// # Example
///
/// ```no_run
/// use fhash::{hash_file, SignatureAlgorithm};
///
/// let entry = hash_file("Cargo.toml", SignatureAlgorithm::Md5).unwrap();
/// println!("{}: {}", entry.path.display(), entry.signature);
/// ```
pub fn hash_file<P: AsRef<Path>>(
    path: P,
    algorithm: SignatureAlgorithm,
) -> Result<FileSignatureEntry, E> {
    FileHasher::new(path).hash(algorithm)
}

/// `FileHasher` calculates the signature of one file's content.
///
/// The file is opened for the duration of one `hash()` call only. The handle is owned by the
/// `Reader` and closed when the reader is dropped, on success as well as on any error. Calling
/// `hash()` repeatedly on an unchanged file gives the same signature; nothing is cached between
/// calls.
#[derive(Debug, Clone)]
pub struct FileHasher {
    path: PathBuf,
    strategy: ReadingStrategy,
    breaker: Breaker,
}

impl FileHasher {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            strategy: ReadingStrategy::default(),
            breaker: Breaker::new(),
        }
    }

    pub fn reading_strategy(mut self, strategy: ReadingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Binds the hasher to an external `Breaker`, which allows to abort reading of a big file.
    pub fn breaker(mut self, breaker: &Breaker) -> Self {
        self.breaker = breaker.clone();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Calculates the signature with the given algorithm. `Mapping` reader is used if the reading
    /// strategy may require memory mapping, `Buffering` otherwise.
    ///
    /// # Errors
    ///
    /// - `E::NotFound` if the path doesn't exist.
    /// - `E::AccessDenied` if the file cannot be opened because of permissions.
    /// - `E::NotFile` if the path isn't a regular file.
    /// - `E::IOError` on any other reading error, including errors in the middle of the file.
    /// - `E::Aborted` if the breaker has been triggered.
    pub fn hash(&self, algorithm: SignatureAlgorithm) -> Result<FileSignatureEntry, E> {
        if self.strategy.maps() {
            self.hash_with::<Mapping>(algorithm)
        } else {
            self.hash_with::<Buffering>(algorithm)
        }
    }

    /// Same as `hash()`, but with the given implementation of `Reader`.
    pub fn hash_with<R: Reader>(
        &self,
        algorithm: SignatureAlgorithm,
    ) -> Result<FileSignatureEntry, E> {
        let now = Instant::now();
        let path = absolute(&self.path)?;
        let signature = signature::<R>(&path, algorithm, &self.strategy, &self.breaker)?;
        debug!(
            "{algorithm} of {} in {}µs",
            path.display(),
            now.elapsed().as_micros()
        );
        Ok(FileSignatureEntry { path, signature })
    }
}

/// Makes the path absolute by joining it to the current working directory. The path isn't
/// canonicalized, so symlinks are kept as they are.
pub(crate) fn absolute(path: &Path) -> Result<PathBuf, E> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()
            .map_err(|err| E::from_io(path, err))?
            .join(path))
    }
}

/// Dispatches the algorithm to the matching `Hasher` implementation.
pub(crate) fn signature<R: Reader>(
    path: &Path,
    algorithm: SignatureAlgorithm,
    strategy: &ReadingStrategy,
    breaker: &Breaker,
) -> Result<Signature, E> {
    match algorithm {
        SignatureAlgorithm::Md5 => digest::<hasher::Md5, R>(path, strategy, breaker),
        SignatureAlgorithm::Sha1 => digest::<hasher::Sha1, R>(path, strategy, breaker),
        SignatureAlgorithm::Sha256 => digest::<hasher::Sha256, R>(path, strategy, breaker),
        SignatureAlgorithm::Sha512 => digest::<hasher::Sha512, R>(path, strategy, breaker),
        SignatureAlgorithm::Blake3 => digest::<hasher::Blake, R>(path, strategy, breaker),
    }
}

fn digest<H: Hasher, R: Reader>(
    path: &Path,
    strategy: &ReadingStrategy,
    breaker: &Breaker,
) -> Result<Signature, E> {
    if breaker.is_aborted() {
        return Err(E::Aborted);
    }
    let md = fs::metadata(path).map_err(|err| E::from_io(path, err))?;
    if !md.is_file() {
        return Err(E::NotFile(path.to_path_buf()));
    }
    let strategy = strategy.resolve(md.len())?;
    let mut reader = R::open(path).map_err(|err| E::from_io(path, err))?;
    let mut hasher = H::new();
    match strategy {
        ReadingStrategy::Buffer => {
            let mut buffer = vec![0u8; BUFFER_SIZE];
            loop {
                if breaker.is_aborted() {
                    return Err(E::Aborted);
                }
                let bytes_read = match reader.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                    Err(err) => return Err(E::from_io(path, err)),
                };
                hasher
                    .absorb(&buffer[..bytes_read])
                    .map_err(Into::<E>::into)?;
            }
        }
        ReadingStrategy::Complete => {
            let mut buffer = Vec::with_capacity(md.len() as usize);
            reader
                .read_to_end(&mut buffer)
                .map_err(|err| E::from_io(path, err))?;
            hasher.absorb(&buffer).map_err(Into::<E>::into)?;
        }
        ReadingStrategy::MemoryMapped => {
            let data = reader
                .mmap()
                .map_err(|err| E::Reader(path.to_path_buf(), err.to_string()))?;
            hasher.absorb(data).map_err(Into::<E>::into)?;
        }
        ReadingStrategy::Scenario(..) => {
            return Err(E::NestedScenarioStrategy);
        }
    };
    hasher.finish().map_err(Into::<E>::into)?;
    Ok(Signature::from(hasher.hash().map_err(Into::<E>::into)?))
}
