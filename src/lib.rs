#![doc = include_str!("../README.md")]

mod breaker;
pub mod directory;
mod error;
pub mod file;
pub mod hasher;
pub mod reader;
mod signature;
#[cfg(test)]
pub(crate) mod test;

pub use breaker::Breaker;
pub use directory::{
    hash_directory, DirectoryHasher, DirectorySignatureMap, Filter, JobType, Options,
    PartialFailure, Tick, Tolerance,
};
pub use error::E;
pub use file::{hash_file, FileHasher, ReadingStrategy};
pub use hasher::{Hasher, SignatureAlgorithm};
pub use reader::Reader;
pub use signature::{FileSignatureEntry, Signature};
