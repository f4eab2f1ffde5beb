mod algorithm;
pub mod blake;
pub mod digest;
mod error;

pub use algorithm::SignatureAlgorithm;
pub use blake::Blake;
pub use digest::{Md5, Sha1, Sha256, Sha512};
pub use error::E;

use std::error::Error as StdError;

/// An incremental digest accumulator. Implementers of this trait must also implement `Send`.
///
/// For each file which has to be hashed, a fresh instance is created and used as follows:
/// - Create the instance (with method `new()`).
/// - Add file's content while it is being read (with method `absorb(..)`).
/// - Finalize hash calculation (with method `finish()`).
/// - Request file's hash (with method `hash()`).
/// - Drop the instance.
///
/// `SignatureAlgorithm` maps each of its variants to one implementation of `Hasher`.
pub trait Hasher: Send {
    /// The type of error that can occur during operations.
    type Error: StdError + Into<crate::E>;

    /// Creates a new accumulator with an empty state.
    fn new() -> Self
    where
        Self: Sized;

    /// Absorbs data into the hasher. Might be called multiple times during the reading of a file.
    ///
    /// # Parameters
    ///
    /// - `data`: A slice of bytes to be absorbed by the hasher.
    fn absorb(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Finalizes the hashing process. Must be called only once, after all data has been absorbed.
    fn finish(&mut self) -> Result<(), Self::Error>;

    /// Retrieves the computed hash. Fails if `finish()` hasn't been called yet.
    fn hash(&self) -> Result<&[u8], Self::Error>;
}
