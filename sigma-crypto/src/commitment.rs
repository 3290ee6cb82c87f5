//! Binding, hiding commitments to byte strings.
//!
//! A commitment is produced together with an opening. Publishing the commitment fixes the
//! committed bytes; revealing the opening later lets anyone check that the commitment was to
//! those bytes.
//!
//! [`HashCommitment`] instantiates this with SHA3-256 over a fresh 32-byte nonce followed by the
//! data. The opening is the nonce.

use crate::{Error, Rng, Verification};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt::Debug;

/// A commitment scheme over byte strings.
pub trait CommitmentScheme {
    /// The public commitment.
    type Commitment: Clone + PartialEq + Debug + Send + Sync + Serialize + DeserializeOwned;
    /// The secret needed to open a commitment.
    type Opening: Clone + Debug + Send + Sync + Serialize + DeserializeOwned;

    /// Commit to `data` with fresh randomness.
    fn commit(
        &self,
        rng: &mut impl Rng,
        data: &[u8],
    ) -> Result<(Self::Commitment, Self::Opening), Error>;

    /// Check that `commitment` opens to `data` under `opening`.
    fn verify(
        &self,
        commitment: &Self::Commitment,
        data: &[u8],
        opening: &Self::Opening,
    ) -> Verification;

    /// The canonical byte encoding of a commitment.
    fn commitment_bytes(&self, commitment: &Self::Commitment) -> Vec<u8>;
}

/// Length in bytes of a [`HashCommitment`] nonce.
pub const NONCE_LENGTH: usize = 32;

/// A commitment produced by [`HashCommitment`]: a SHA3-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest256([u8; 32]);

impl Digest256 {
    /// The raw digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// The opening of a [`HashCommitment`]: the nonce hashed ahead of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonce([u8; NONCE_LENGTH]);

/// Commitments of the form `SHA3-256(nonce || data)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashCommitment;

impl HashCommitment {
    fn digest(nonce: &Nonce, data: &[u8]) -> Digest256 {
        let mut hasher = Sha3_256::new();
        hasher.update(nonce.0);
        hasher.update(data);
        let mut digest = [0; 32];
        digest.copy_from_slice(&hasher.finalize());
        Digest256(digest)
    }
}

impl CommitmentScheme for HashCommitment {
    type Commitment = Digest256;
    type Opening = Nonce;

    fn commit(&self, rng: &mut impl Rng, data: &[u8]) -> Result<(Digest256, Nonce), Error> {
        let mut nonce = [0; NONCE_LENGTH];
        rng.try_fill_bytes(&mut nonce)?;
        let nonce = Nonce(nonce);
        Ok((Self::digest(&nonce, data), nonce))
    }

    fn verify(&self, commitment: &Digest256, data: &[u8], opening: &Nonce) -> Verification {
        Verification::from(Self::digest(opening, data) == *commitment)
    }

    fn commitment_bytes(&self, commitment: &Digest256) -> Vec<u8> {
        commitment.0.to_vec()
    }
}
