pub mod buffering;
pub mod mapping;

pub use buffering::Buffering;
pub use mapping::Mapping;

use std::{error, io, io::Read, path::Path};

/// A trait that extends the standard `Read` trait with the ability to open a file and, optionally,
/// to map it into memory. Implementers of this trait must also implement `Send`.
///
/// For each file that needs to be hashed a new instance is opened and used as follows:
/// - Open the file (with method `open(..)`).
/// - Read the file with `Read` or, for `ReadingStrategy::MemoryMapped`, with `mmap()`.
/// - Drop the instance. An implementation must release the file handle on drop.
pub trait Reader: Read + Send {
    /// The type of error that can occur during memory mapping.
    type Error: error::Error;

    /// Opens the given file for reading. Errors are returned as they are, so the caller can
    /// distinguish a missing file from an access violation.
    ///
    /// # Parameters
    ///
    /// - `path`: A path to the file which will be read.
    fn open<P: AsRef<Path>>(path: P) -> io::Result<Self>
    where
        Self: Sized;

    /// Memory-maps the file for reading. This method will be called only with
    /// `ReadingStrategy::MemoryMapped`.
    ///
    /// If the implementation of `Reader` doesn't support memory mapping, it should return an error.
    ///
    /// # Returns
    ///
    /// - `Result<&[u8], Self::Error>`: On success, returns a reference to the memory-mapped data.
    fn mmap(&mut self) -> Result<&[u8], Self::Error>;
}
