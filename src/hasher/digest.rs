use super::{Hasher, E};
use sha2::Digest;

/// Hasher over any `Digest` implementation of the RustCrypto family (`md-5`, `sha1`, `sha2`).
pub struct Crypto<D: Digest> {
    hasher: Option<D>,
    hash: Option<Vec<u8>>,
}

pub type Md5 = Crypto<md5::Md5>;
pub type Sha1 = Crypto<sha1::Sha1>;
pub type Sha256 = Crypto<sha2::Sha256>;
pub type Sha512 = Crypto<sha2::Sha512>;

impl<D: Digest> Default for Crypto<D> {
    fn default() -> Self {
        Crypto {
            hasher: Some(D::new()),
            hash: None,
        }
    }
}

impl<D: Digest + Send> Hasher for Crypto<D> {
    type Error = E;

    fn new() -> Self {
        Self::default()
    }

    fn absorb(&mut self, data: &[u8]) -> Result<(), E> {
        let Some(hasher) = self.hasher.as_mut() else {
            return Err(E::AlreadyFinished);
        };
        hasher.update(data);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), E> {
        let Some(hasher) = self.hasher.take() else {
            return Err(E::AlreadyFinished);
        };
        self.hash = Some(hasher.finalize().to_vec());
        Ok(())
    }

    fn hash(&self) -> Result<&[u8], E> {
        Ok(self.hash.as_ref().ok_or(E::NotFinished)?)
    }
}
