//! Deterministic byte encoding of the prover's batch.
//!
//! The encoding begins with the number of entries as an 8-byte big-endian integer. Each entry is
//! the fixed-width encoding of a Sigma commitment followed by the raw bytes of the ciphertext
//! produced for that repetition. The prover commits to this encoding and the verifier recomputes
//! it from the claimed batch, so both sides must produce identical bytes.

use serde::{Deserialize, Serialize};
use sigma_crypto::{encryption::Ciphertext, sigma::Encoder, SerializeElement};
use std::fmt;

/// The public part of one repetition: the Sigma commitment and the encrypted `false` response.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct BatchEntry<S: Encoder> {
    /// The Sigma protocol commitment.
    #[serde(with = "SerializeElement")]
    pub commitment: S::Commitment,
    /// The encryption of the encoded response to the `false` challenge.
    pub ciphertext: Ciphertext,
}

impl<S: Encoder> Clone for BatchEntry<S> {
    fn clone(&self) -> Self {
        Self {
            commitment: self.commitment.clone(),
            ciphertext: self.ciphertext.clone(),
        }
    }
}

impl<S: Encoder> fmt::Debug for BatchEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchEntry")
            .field("commitment", &self.commitment)
            .field("ciphertext", &self.ciphertext)
            .finish()
    }
}

/// Encode a batch for the outer commitment.
pub fn encode_batch<S: Encoder>(protocol: &S, batch: &[BatchEntry<S>]) -> Vec<u8> {
    let mut bytes = (batch.len() as u64).to_be_bytes().to_vec();
    for entry in batch {
        bytes.extend(protocol.encode_commitment(&entry.commitment));
        bytes.extend_from_slice(entry.ciphertext.as_bytes());
    }
    bytes
}
