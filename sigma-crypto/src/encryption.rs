//! Probabilistic public-key encryption with explicit randomness.
//!
//! Encryption is split into sampling randomness and a deterministic encryption under that
//! randomness, so a party that learns the randomness can re-encrypt a claimed plaintext and
//! compare ciphertexts byte-for-byte.

use crate::{Error, Rng, SerializeElement};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The raw bytes of a ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    /// Wrap raw ciphertext bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw ciphertext bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Unwrap the raw ciphertext bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Ciphertext {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The encrypting side of a probabilistic encryption scheme.
pub trait Encrypt {
    /// The randomness consumed by one encryption.
    type Randomness: Clone + Debug + Send + Sync + SerializeElement;

    /// Sample fresh encryption randomness.
    fn sample_randomness(&self, rng: &mut impl Rng) -> Result<Self::Randomness, Error>;

    /// Encrypt `plaintext` under the given randomness.
    ///
    /// This is deterministic: the same randomness and plaintext always produce the same bytes.
    fn encrypt_with(
        &self,
        randomness: &Self::Randomness,
        plaintext: &[u8],
    ) -> Result<Ciphertext, Error>;

    /// Encrypt `plaintext` under fresh randomness, returning the randomness alongside.
    fn encrypt(
        &self,
        rng: &mut impl Rng,
        plaintext: &[u8],
    ) -> Result<(Ciphertext, Self::Randomness), Error> {
        let randomness = self.sample_randomness(rng)?;
        let ciphertext = self.encrypt_with(&randomness, plaintext)?;
        Ok((ciphertext, randomness))
    }
}

/// The decrypting side of a probabilistic encryption scheme.
pub trait Decrypt {
    /// Recover the plaintext of `ciphertext`.
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Vec<u8>, Error>;
}
