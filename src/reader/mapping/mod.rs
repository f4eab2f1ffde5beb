mod error;

use super::Reader;
pub use error::E;
use memmap2::{Mmap, MmapOptions};
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

/// Reader which is able to map the file into memory. Falls back to regular reading through `Read`.
pub struct Mapping {
    file: File,
    mmap: Option<Mmap>,
}

impl Reader for Mapping {
    type Error = E;

    fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self {
            file: File::open(path)?,
            mmap: None,
        })
    }

    fn mmap(&mut self) -> Result<&[u8], E> {
        let len = usize::try_from(self.file.metadata()?.len()).map_err(|_| E::FileIsTooBig)?;
        if len == 0 {
            // Empty files cannot be mapped
            return Ok(&[]);
        }
        // Safety: the map is read-only and lives no longer than the reader, which owns the file.
        let mmap = unsafe { MmapOptions::new().len(len).map(&self.file) }?;
        Ok(&self.mmap.insert(mmap)[..])
    }
}

impl Read for Mapping {
    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        self.file.read(buffer)
    }
}
