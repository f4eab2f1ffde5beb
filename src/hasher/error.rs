use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("Hashing not finished")]
    NotFinished,
    #[error("Hashing already finished")]
    AlreadyFinished,
}

impl From<E> for crate::E {
    fn from(val: E) -> Self {
        crate::E::Hasher(val.to_string())
    }
}
