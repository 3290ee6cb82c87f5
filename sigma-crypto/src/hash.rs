//! Functionality for hashing public data to scalars.
//!
//! A [`ScalarHasher`] absorbs length-prefixed byte strings and squeezes out a uniformly
//! distributed [`Scalar`]. It backs [`hash_to_scalar`](crate::prime_group::hash_to_scalar), which
//! in turn hashes messages for [`ecdsa`](crate::ecdsa).

use crate::common::Scalar;
use sha3::{Digest, Sha3_512};

/// Holds state used when hashing public data to a [`Scalar`].
#[derive(Debug)]
#[allow(missing_copy_implementations)]
pub struct ScalarHasher {
    hasher: Sha3_512,
}

impl Default for ScalarHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarHasher {
    /// Initialize a new, empty hasher.
    pub fn new() -> Self {
        Self {
            hasher: Sha3_512::new(),
        }
    }

    /// Incorporate arbitrary bytes into the hash.
    ///
    /// Each call is prefixed with the length of `bytes`, so consecutive calls cannot be
    /// confused with a single call on their concatenation.
    pub fn digest_bytes(&mut self, bytes: impl AsRef<[u8]>) {
        let bytes = bytes.as_ref();
        self.hasher.update((bytes.len() as u64).to_be_bytes());
        self.hasher.update(bytes);
    }

    /// A conveniently chainable variant of [`ScalarHasher::digest_bytes`].
    pub fn with_bytes(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.digest_bytes(bytes);
        self
    }

    /// Consume the hasher and reduce the 512-bit digest to a [`Scalar`].
    pub fn finish(self) -> Scalar {
        let mut digested = [0; 64];
        digested.copy_from_slice(self.hasher.finalize().as_ref());
        Scalar::from_bytes_wide(&digested)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        let first = ScalarHasher::new().with_bytes(b"statement").finish();
        let second = ScalarHasher::new().with_bytes(b"statement").finish();
        assert_eq!(first, second);
    }

    #[test]
    fn hashing_separates_inputs() {
        let joined = ScalarHasher::new().with_bytes(b"ab").finish();
        let split = ScalarHasher::new()
            .with_bytes(b"a")
            .with_bytes(b"b")
            .finish();
        assert_ne!(joined, split, "length prefixes should separate the inputs");
    }
}
