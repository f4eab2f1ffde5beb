use super::{Hasher, E};
use blake3::{Hash, Hasher as Origin};

/// Hasher based on `blake3` crate.
pub struct Blake {
    hasher: Origin,
    hash: Option<Hash>,
}

impl Default for Blake {
    fn default() -> Self {
        Blake {
            hasher: Origin::new(),
            hash: None,
        }
    }
}

impl Hasher for Blake {
    type Error = E;

    fn new() -> Self {
        Self::default()
    }

    fn absorb(&mut self, data: &[u8]) -> Result<(), E> {
        if self.hash.is_some() {
            return Err(E::AlreadyFinished);
        }
        self.hasher.update(data);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), E> {
        if self.hash.is_some() {
            return Err(E::AlreadyFinished);
        }
        self.hash = Some(self.hasher.finalize());
        Ok(())
    }

    fn hash(&self) -> Result<&[u8], E> {
        Ok(self.hash.as_ref().ok_or(E::NotFinished)?.as_bytes())
    }
}
