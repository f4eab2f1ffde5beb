use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("Fail to map file: {0}")]
    IOError(#[from] io::Error),
    #[error("File is too big to be mapped into memory")]
    FileIsTooBig,
}
