//! This crate includes the interactive proof and encryption primitives used to build verifiable
//! encryption, instantiated over the prime-order groups of the pairing-friendly curve BLS12-381:
//! - A generic framework for three-move Sigma protocols (prover, verifier, extractor and
//!   encoder roles), with typed per-session state machines.
//! - The Schnorr proof of knowledge of a discrete logarithm, with full-field and binary
//!   challenges.
//! - A hash-based binding commitment scheme over byte strings.
//! - Hashed ElGamal encryption of short byte strings with explicit, replayable randomness.
//! - ECDSA signatures over G1.

#![warn(missing_docs)]
#![warn(missing_copy_implementations, missing_debug_implementations)]
#![warn(unused_qualifications, unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(broken_intra_doc_links)]

pub mod commitment;
pub mod dlog;
pub mod ecdsa;
pub mod elgamal;
pub mod encryption;
pub mod hash;
pub mod prime_group;
pub mod sigma;

mod serde;

pub use crate::serde::SerializeElement;
pub use common::Rng;

use thiserror::*;

/// Error types that may arise from cryptographic operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Caused by a failure to read from the randomness source.
    #[error("randomness source failed: {0}")]
    Entropy(#[from] rand::Error),
    /// Caused by attempting to decode a value from a byte string of the wrong length.
    #[error("expected an encoding of {expected} bytes, got {got}")]
    EncodingLength {
        /// The length of the canonical encoding.
        expected: usize,
        /// The actual length of the input.
        got: usize,
    },
    /// Caused by attempting to decode a value from bytes that are not its canonical encoding.
    #[error("bytes are not a canonical encoding of a {0}")]
    InvalidEncoding(&'static str),
    /// Caused by attempting to encode a message that does not fit into a group element.
    #[error("message of {got} bytes exceeds the {max}-byte message space")]
    MessageTooLong {
        /// The largest supported message length.
        max: usize,
        /// The actual message length.
        got: usize,
    },
    /// Caused by a message-to-point search that ran out of counter values.
    #[error("no group element encodes the message within the counter space")]
    EncodingExhausted,
    /// Caused by a ciphertext that does not decrypt to a well-formed message.
    #[error("ciphertext does not decrypt to a well-formed message")]
    DecryptionFailed,
}

/// The result of a verification of some property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the result of a verification should always be checked"]
pub enum Verification {
    /// A verification succeeded.
    Verified,
    /// A verification failed.
    Failed,
}

impl From<bool> for Verification {
    fn from(b: bool) -> Self {
        if b {
            Self::Verified
        } else {
            Self::Failed
        }
    }
}

impl Verification {
    /// Whether the verification succeeded.
    pub fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }
}

mod common {
    //! Common types used internally.

    pub use bls12_381::{G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
    pub use group::{Group, GroupEncoding};

    /// A trait synonym for a cryptographically secure random number generator. This trait is
    /// blanket-implemented for all valid types and will never need to be implemented by-hand.
    pub trait Rng: rand::CryptoRng + rand::RngCore {}
    impl<T: rand::CryptoRng + rand::RngCore> Rng for T {}
}

#[cfg(test)]
pub(crate) mod test {
    use rand::SeedableRng;

    /// Seeded rng for replicable tests.
    pub(crate) fn rng() -> impl crate::Rng {
        const TEST_RNG_SEED: [u8; 32] = *b"NEVER USE THIS FOR ANYTHING REAL";
        rand::rngs::StdRng::from_seed(TEST_RNG_SEED)
    }

    /// A randomness source that is always exhausted.
    #[derive(Debug, Clone, Copy)]
    pub(crate) struct ExhaustedRng;

    impl rand::RngCore for ExhaustedRng {
        fn next_u32(&mut self) -> u32 {
            panic!("exhausted randomness source was read infallibly")
        }

        fn next_u64(&mut self) -> u64 {
            panic!("exhausted randomness source was read infallibly")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("exhausted randomness source was read infallibly")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::from(
                std::num::NonZeroU32::new(rand::Error::CUSTOM_START).unwrap(),
            ))
        }
    }

    impl rand::CryptoRng for ExhaustedRng {}
}
