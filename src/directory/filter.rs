use crate::E;
use glob::Pattern;
use std::path::Path;

/// Glob pattern used to include or exclude paths while collecting files.
///
/// With `Filter`, a glob pattern can be applied to a file's name or a folder's name only,
/// whereas `Common` is applied to the full path.
#[derive(Debug)]
pub enum Filter<T: AsRef<str>> {
    /// Applied to the name of folder. Excluded folders aren't entered.
    Folders(T),
    /// Applied to the name of file.
    Files(T),
    /// Applied to the full path of files and, for exclusion only, of folders.
    Common(T),
}

impl<T: AsRef<str>> Filter<T> {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Files(s) | Self::Folders(s) | Self::Common(s) => s.as_ref(),
        }
    }
}

impl<T: AsRef<str>> TryFrom<Filter<T>> for FilterAccepted {
    type Error = E;

    fn try_from(filter: Filter<T>) -> Result<Self, Self::Error> {
        let pattern =
            Pattern::new(filter.as_str()).map_err(|err| (filter.as_str().to_string(), err))?;
        Ok(match filter {
            Filter::Files(..) => FilterAccepted::Files(pattern),
            Filter::Folders(..) => FilterAccepted::Folders(pattern),
            Filter::Common(..) => FilterAccepted::Common(pattern),
        })
    }
}

#[derive(Debug, PartialEq, Clone)]
pub(crate) enum FilterAccepted {
    Folders(Pattern),
    Files(Pattern),
    Common(Pattern),
}

impl FilterAccepted {
    /// Returns `None` if the filter isn't applicable to a file.
    pub fn file<P: AsRef<Path>>(&self, path: P) -> Option<bool> {
        let path = path.as_ref();
        match self {
            Self::Files(p) => Some(p.matches_path(Path::new(path.file_name()?))),
            Self::Common(p) => Some(p.matches_path(path)),
            Self::Folders(..) => None,
        }
    }

    /// Returns `None` if the filter isn't applicable to a folder.
    pub fn folder<P: AsRef<Path>>(&self, path: P, include: bool) -> Option<bool> {
        let path = path.as_ref();
        match self {
            Self::Folders(p) => Some(p.matches_path(Path::new(path.file_name()?))),
            Self::Common(p) if !include => Some(p.matches_path(path)),
            Self::Common(..) | Self::Files(..) => None,
        }
    }
}

/// Decides whether a file or a folder takes part in hashing. Exclusion wins over inclusion. An
/// empty list of applicable include filters accepts everything.
#[derive(Debug, Default, Clone)]
pub(crate) struct Filters {
    pub include: Vec<FilterAccepted>,
    pub exclude: Vec<FilterAccepted>,
}

impl Filters {
    pub fn add(&mut self, filter: FilterAccepted, include: bool) {
        if self.include.contains(&filter) || self.exclude.contains(&filter) {
            return;
        }
        if include {
            self.include.push(filter);
        } else {
            self.exclude.push(filter);
        }
    }

    pub fn file<P: AsRef<Path>>(&self, path: P) -> bool {
        if self
            .exclude
            .iter()
            .any(|f| f.file(&path).unwrap_or_default())
        {
            return false;
        }
        let mut applicable = self.include.iter().filter_map(|f| f.file(&path)).peekable();
        applicable.peek().is_none() || applicable.any(|matched| matched)
    }

    pub fn folder<P: AsRef<Path>>(&self, path: P) -> bool {
        if self
            .exclude
            .iter()
            .any(|f| f.folder(&path, false).unwrap_or_default())
        {
            return false;
        }
        let mut applicable = self
            .include
            .iter()
            .filter_map(|f| f.folder(&path, true))
            .peekable();
        applicable.peek().is_none() || applicable.any(|matched| matched)
    }
}
