use crate::E;
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Digest calculated for some content. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hexadecimal form of the signature.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Signature {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Signature {
    type Err = E;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s.trim())
            .map(Self)
            .map_err(|_| E::InvalidSignature(s.to_owned()))
    }
}

/// Signature of one file together with the absolute path to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSignatureEntry {
    pub path: PathBuf,
    pub signature: Signature,
}

impl FileSignatureEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl From<FileSignatureEntry> for (PathBuf, Signature) {
    fn from(entry: FileSignatureEntry) -> Self {
        (entry.path, entry.signature)
    }
}
