use super::{report, JobType, Options, Progress};
use crate::{Breaker, E};
use log::debug;
use std::{
    collections::HashSet,
    fs::{self, read_dir},
    io,
    mem,
    path::{Path, PathBuf},
    time::Instant,
};

pub(crate) type CollectingResult = Result<(Vec<PathBuf>, Vec<(PathBuf, E)>), E>;

/// Reads the root folder (and nested folders in recursive mode) and collects paths to files.
///
/// Collected paths are sorted component by component, the same order as `DirectorySignatureMap`.
/// Symlinks are followed. A link to a file is collected with the path of the link itself. A
/// dangling link is ignored. Each folder is read only once, which keeps linked loops finite.
pub(crate) struct Collector<'a> {
    opt: &'a Options,
    breaker: &'a Breaker,
    progress: Option<&'a Progress>,
    collected: Vec<PathBuf>,
    invalid: Vec<(PathBuf, E)>,
    visited: HashSet<PathBuf>,
}

impl<'a> Collector<'a> {
    pub fn new(opt: &'a Options, breaker: &'a Breaker, progress: Option<&'a Progress>) -> Self {
        Self {
            opt,
            breaker,
            progress,
            collected: Vec::new(),
            invalid: Vec::new(),
            visited: HashSet::new(),
        }
    }

    pub fn collect(mut self) -> CollectingResult {
        let now = Instant::now();
        let root = self.opt.root.clone();
        self.read_folder(&root)?;
        self.collected.sort();
        debug!(
            "collected {} files (ignored: {}) in {}µs / {}ms / {}s; source: {}",
            self.collected.len(),
            self.invalid.len(),
            now.elapsed().as_micros(),
            now.elapsed().as_millis(),
            now.elapsed().as_secs(),
            root.display()
        );
        Ok((
            mem::take(&mut self.collected),
            mem::take(&mut self.invalid),
        ))
    }

    fn report(&mut self, path: &Path, err: io::Error) -> Result<(), E> {
        report(
            path.to_path_buf(),
            E::from_io(path, err),
            &self.opt.tolerance,
            &mut self.invalid,
        )
    }

    fn read_folder(&mut self, folder: &Path) -> Result<(), E> {
        if self.breaker.is_aborted() {
            return Err(E::Aborted);
        }
        match fs::canonicalize(folder) {
            Ok(canonical) => {
                if !self.visited.insert(canonical) {
                    debug!("folder {} has been read already", folder.display());
                    return Ok(());
                }
            }
            Err(err) => return self.report(folder, err),
        }
        let elements = match read_dir(folder) {
            Ok(elements) => elements,
            Err(err) => return self.report(folder, err),
        };
        let mut nested = Vec::new();
        for el in elements {
            if self.breaker.is_aborted() {
                return Err(E::Aborted);
            }
            let path = match el {
                Ok(el) => el.path(),
                Err(err) => {
                    self.report(folder, err)?;
                    continue;
                }
            };
            // Follows symlinks
            let md = match fs::metadata(&path) {
                Ok(md) => md,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    // Dangling symlink or the file has been removed right after reading a folder
                    debug!("{} is ignored: target doesn't exist", path.display());
                    continue;
                }
                Err(err) => {
                    self.report(&path, err)?;
                    continue;
                }
            };
            if md.is_file() {
                if self.opt.filters.file(&path) {
                    self.collected.push(path);
                }
            } else if md.is_dir() && self.opt.recursive && self.opt.filters.folder(&path) {
                nested.push(path);
            }
        }
        if let Some(progress) = self.progress {
            let count = self.collected.len();
            progress.notify(JobType::Collecting, count, count);
        }
        nested.sort();
        for folder in nested {
            self.read_folder(&folder)?;
        }
        Ok(())
    }
}
