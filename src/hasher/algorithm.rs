use super::{Blake, Hasher, Md5, Sha1, Sha256, Sha512};
use crate::{Signature, E};
use std::{fmt, str::FromStr};

/// Cryptographic hash function used to calculate a signature.
///
/// `Md5` is the default one. New algorithms are added as new variants together with a new arm
/// in the dispatching of `FileHasher`.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha256,
    Sha512,
    Blake3,
}

impl SignatureAlgorithm {
    /// All supported algorithms.
    pub const ALL: [SignatureAlgorithm; 5] = [
        SignatureAlgorithm::Md5,
        SignatureAlgorithm::Sha1,
        SignatureAlgorithm::Sha256,
        SignatureAlgorithm::Sha512,
        SignatureAlgorithm::Blake3,
    ];

    /// Length of a produced signature in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 | Self::Blake3 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Calculates a signature of in-memory content given as a sequence of chunks.
    pub fn digest<'a, I>(&self, chunks: I) -> Result<Signature, E>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        match self {
            Self::Md5 => fold::<Md5, I>(chunks),
            Self::Sha1 => fold::<Sha1, I>(chunks),
            Self::Sha256 => fold::<Sha256, I>(chunks),
            Self::Sha512 => fold::<Sha512, I>(chunks),
            Self::Blake3 => fold::<Blake, I>(chunks),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Blake3 => "blake3",
        }
    }
}

fn fold<'a, H: Hasher, I: IntoIterator<Item = &'a [u8]>>(chunks: I) -> Result<Signature, E> {
    let mut hasher = H::new();
    for chunk in chunks {
        hasher.absorb(chunk).map_err(Into::<E>::into)?;
    }
    hasher.finish().map_err(Into::<E>::into)?;
    Ok(Signature::from(hasher.hash().map_err(Into::<E>::into)?))
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = E;

    /// Parses a name like `md5`, `SHA-256` or `blake3`. Case and dashes are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == normalized)
            .ok_or_else(|| E::UnsupportedAlgorithm(s.to_owned()))
    }
}
