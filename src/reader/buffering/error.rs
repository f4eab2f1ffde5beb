use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("Buffering reader doesn't support mapping file into memory")]
    MemoryMappingNotSupported,
}
