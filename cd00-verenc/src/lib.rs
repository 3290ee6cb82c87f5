/*!
This crate implements the Camenisch–Damgård cut-and-choose verifiable encryption protocol \[1\]
over the Sigma protocols of `sigma-crypto`.

A prover convinces a verifier that a ciphertext encrypts a witness for a public word, under the
public key of a designated decrypter. The decrypter, trusting only that the proof verified, can
later recover the witness from the ciphertext.

The protocol runs `k` independent repetitions of a binary-challenge Sigma protocol. For each
repetition the prover encrypts its response to the `false` challenge and commits to all
`(commitment, ciphertext)` pairs at once. The verifier opens a random subset of `u` repetitions:

- at an *opened* repetition, the prover answers the `true` challenge in the clear, and the
  verifier keeps the encrypted `false` response;
- at a *closed* repetition, the prover answers the `false` challenge and reveals the encryption
  randomness, so the verifier can check the ciphertext by re-encrypting.

The output ciphertext holds one entry per opened repetition. Decrypting any one of them yields a
second accepting transcript for the same commitment, from which the witness is extracted.

The roles are [`Prover`](prover::Prover), [`Verifier`](verifier::Verifier) and
[`Decrypter`](decrypter::Decrypter), configured by [`Parameters`]. The [`basic`] module holds the
single-repetition variant with two ciphertexts.

 # References

 1: Jan Camenisch and Ivan Damgård. Verifiable encryption, group encryption, and their
 applications to separable group signatures and signature sharing schemes. ASIACRYPT 2000.
*/
#![warn(missing_docs)]
#![warn(missing_copy_implementations, missing_debug_implementations)]
#![warn(unused_qualifications, unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(broken_intra_doc_links)]

/// Iterate in parallel when the `parallel` feature is enabled.
macro_rules! cfg_into_iter {
    ($e: expr) => {{
        #[cfg(feature = "parallel")]
        let result = rayon::iter::IntoParallelIterator::into_par_iter($e);
        #[cfg(not(feature = "parallel"))]
        let result = IntoIterator::into_iter($e);
        result
    }};
}

pub mod basic;
pub mod decrypter;
pub mod encoding;
pub mod parameters;
pub mod prover;
pub mod subset;
pub mod verifier;

pub use parameters::Parameters;
pub use sigma_crypto::{Rng, Verification};
pub use subset::Challenge;
pub use verifier::{CiphertextEntry, VerifiableCiphertext};

use bls12_381::G1Projective;
use sigma_crypto::{
    commitment::HashCommitment,
    dlog::BinaryDlog,
    elgamal::{PublicKey, SecretKey},
};
use thiserror::*;

/// Prover of a discrete logarithm in G1, encrypted under ElGamal.
pub type ElGamalProver = prover::Prover<BinaryDlog<G1Projective>, PublicKey, HashCommitment>;

/// Verifier of a discrete logarithm in G1, encrypted under ElGamal.
pub type ElGamalVerifier = verifier::Verifier<BinaryDlog<G1Projective>, PublicKey, HashCommitment>;

/// Decrypter of a discrete logarithm in G1, encrypted under ElGamal.
pub type ElGamalDecrypter = decrypter::Decrypter<BinaryDlog<G1Projective>, SecretKey>;

/// Error types that may arise while running verifiable encryption.
#[derive(Debug, Error)]
pub enum Error {
    /// Caused by invalid protocol parameters.
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    /// Caused by a failure while building the prover's commitment.
    #[error("commitment failed: {0}")]
    Commit(#[source] sigma_crypto::Error),
    /// Caused by a failure while sampling the verifier's challenge.
    #[error("challenge failed: {0}")]
    Challenge(#[source] sigma_crypto::Error),
    /// Caused by a malformed challenge given to the prover.
    #[error(transparent)]
    Respond(#[from] RespondError),
    /// Caused by a proof that does not verify.
    #[error(transparent)]
    Verify(#[from] VerificationError),
    /// Caused by a ciphertext that does not yield a witness.
    #[error(transparent)]
    Decrypt(#[from] DecryptionError),
}

/// Invalid combinations of [`Parameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// Caused by a protocol without repetitions.
    #[error("the number of repetitions must be positive")]
    ZeroRepetitions,
    /// Caused by a protocol that opens no repetitions, so its ciphertext is always empty.
    #[error("at least one repetition must be opened")]
    NothingOpened,
    /// Caused by opening more repetitions than exist.
    #[error("cannot open {opened} of {repetitions} repetitions")]
    OpenedExceedsRepetitions {
        /// The requested number of opened repetitions.
        opened: usize,
        /// The number of repetitions.
        repetitions: usize,
    },
}

/// A challenge that is not a set of repetition indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RespondError {
    /// Caused by an index past the last repetition.
    #[error("challenge index {index} out of range for {repetitions} repetitions")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The number of repetitions.
        repetitions: usize,
    },
    /// Caused by an index that appears twice.
    #[error("challenge index {index} appears more than once")]
    DuplicateIndex {
        /// The offending index.
        index: usize,
    },
}

/// Reasons a verifier rejects a response.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The claimed batch does not open the prover's commitment.
    #[error("commitment verification failed")]
    CommitmentMismatch,
    /// The Sigma protocol transcript of a repetition does not verify.
    #[error("invalid sigma proof at repetition {index}")]
    InvalidSigmaProof {
        /// The repetition index.
        index: usize,
    },
    /// The re-encrypted response of a closed repetition does not match its ciphertext.
    #[error("invalid encryption at repetition {index}")]
    InvalidEncryption {
        /// The repetition index.
        index: usize,
    },
    /// A closed repetition is missing its encryption randomness.
    #[error("missing encryption randomness at repetition {index}")]
    MissingRandomness {
        /// The repetition index.
        index: usize,
    },
    /// A part of the response does not have one entry per repetition.
    #[error("expected {expected} {part}, got {got}")]
    LengthMismatch {
        /// Which part of the response is malformed.
        part: &'static str,
        /// The number of repetitions.
        expected: usize,
        /// The number of entries received.
        got: usize,
    },
    /// The challenge is not a set of the configured number of repetition indices.
    #[error("malformed challenge")]
    MalformedChallenge,
    /// Re-encrypting a closed repetition failed outright.
    #[error("re-encryption failed at repetition {index}: {source}")]
    Encryption {
        /// The repetition index.
        index: usize,
        /// The underlying failure.
        source: sigma_crypto::Error,
    },
}

/// Reasons a ciphertext does not yield a witness.
#[derive(Debug, Error)]
pub enum DecryptionError {
    /// The ciphertext has no entries.
    #[error("ciphertext has no entries")]
    EmptyCiphertext,
    /// No entry decrypted to a response that completes an accepting transcript.
    #[error("none of the {entries} ciphertext entries yields a witness")]
    NoValidEntry {
        /// The number of entries tried.
        entries: usize,
    },
    /// The decrypted response does not complete an accepting transcript.
    #[error("decrypted response does not verify")]
    InvalidResponse,
    /// The encrypted response could not be recovered.
    #[error("could not recover the encrypted response: {0}")]
    Ciphertext(#[from] sigma_crypto::Error),
}
