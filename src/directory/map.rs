use crate::{Signature, SignatureAlgorithm, E};
use std::{
    collections::{btree_map, BTreeMap},
    fmt,
    path::{Path, PathBuf},
};

/// Signatures of the files of one folder, taken at the time of the scan. Keys are absolute paths;
/// entries are ordered by path, so the order doesn't depend on the file system or on the
/// scheduling of hashing threads.
///
/// Paths are compared component by component (the ordering of `Path`), not as raw bytes:
/// `root/a/b` goes before `root/a.txt`, because the component `a` is shorter than `a.txt`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySignatureMap {
    algorithm: SignatureAlgorithm,
    entries: BTreeMap<PathBuf, Signature>,
}

impl DirectorySignatureMap {
    pub(crate) fn new(algorithm: SignatureAlgorithm) -> Self {
        Self {
            algorithm,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, path: PathBuf, signature: Signature) {
        self.entries.insert(path, signature);
    }

    /// Algorithm used to calculate the signatures.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&Signature> {
        self.entries.get(path.as_ref())
    }

    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        self.entries.contains_key(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, PathBuf, Signature> {
        self.entries.iter()
    }

    pub fn paths(&self) -> btree_map::Keys<'_, PathBuf, Signature> {
        self.entries.keys()
    }

    pub fn into_inner(self) -> BTreeMap<PathBuf, Signature> {
        self.entries
    }

    /// Folds the signatures of all files, in path order, into one signature of the whole
    /// folder. An empty map gives an empty signature.
    pub fn digest(&self, algorithm: SignatureAlgorithm) -> Result<Signature, E> {
        if self.entries.is_empty() {
            return Ok(Signature::from(Vec::new()));
        }
        algorithm.digest(self.entries.values().map(|signature| signature.as_bytes()))
    }
}

impl<'a> IntoIterator for &'a DirectorySignatureMap {
    type Item = (&'a PathBuf, &'a Signature);
    type IntoIter = btree_map::Iter<'a, PathBuf, Signature>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for DirectorySignatureMap {
    type Item = (PathBuf, Signature);
    type IntoIter = btree_map::IntoIter<PathBuf, Signature>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Result of a fail-soft scan in which some paths have failed. Carries everything which has been
/// hashed successfully and the list of failed paths with causes.
#[derive(Debug)]
pub struct PartialFailure {
    pub signatures: DirectorySignatureMap,
    pub failures: Vec<(PathBuf, E)>,
}

impl fmt::Display for PartialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s) hashed, {} path(s) failed",
            self.signatures.len(),
            self.failures.len()
        )
    }
}
