mod error;

use super::Reader;
pub use error::E;
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

/// Plain reader over an opened file. Doesn't support memory mapping.
pub struct Buffering {
    file: File,
}

impl Reader for Buffering {
    type Error = E;

    fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self {
            file: File::open(path)?,
        })
    }

    fn mmap(&mut self) -> Result<&[u8], E> {
        Err(E::MemoryMappingNotSupported)
    }
}

impl Read for Buffering {
    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        self.file.read(buffer)
    }
}
