//! Generic interactive Sigma protocols.
//!
//! A Sigma protocol is a three-move proof of knowledge of a witness for a public word:
//!
//! 1. The prover sends a *commitment* and keeps the matching *decommitment* secret.
//! 2. The verifier replies with a random *challenge*.
//! 3. The prover sends a *response* computed from the witness, the decommitment and the
//!    challenge, and the verifier accepts or rejects.
//!
//! A relation is described by an implementation of [`Protocol`], which fixes the types used in
//! each move. The behavior of each party is split into role traits: [`Prover`], [`Verifier`],
//! [`Extractor`] (special soundness: recover the witness from two accepting transcripts that
//! share a commitment) and [`Encoder`] (canonical byte encodings). Protocols that compose Sigma
//! protocols, such as verifiable encryption, are generic over these roles, so the relation is
//! known at compile time.
//!
//! The order of the moves is enforced by the session types in this module: a [`Committed`]
//! prover session can answer exactly one challenge, and a [`Challenged`] verifier session can
//! check exactly one response.

use crate::{Error, Rng, SerializeElement, Verification};
use std::fmt;

mod session;

pub use self::session::*;

/// The types exchanged in a run of a Sigma protocol for a fixed relation.
pub trait Protocol {
    /// The public statement being proved.
    type Word: Send + Sync;
    /// The secret that satisfies the relation with the word.
    type Witness: Send + Sync;
    /// The prover's first message.
    type Commitment: Clone + PartialEq + fmt::Debug + Send + Sync + SerializeElement;
    /// The prover's secret state between the first and third messages.
    type Decommitment: Send + Sync;
    /// The verifier's message.
    type Challenge: Copy + PartialEq + fmt::Debug + Send + Sync;
    /// The prover's final message.
    type Response: Clone + fmt::Debug + Send + Sync + SerializeElement;
}

/// The prover role of a Sigma protocol.
pub trait Prover: Protocol {
    /// Run the commitment phase: sample fresh randomness and produce the first message.
    fn commit(
        &self,
        rng: &mut impl Rng,
        word: &Self::Word,
        witness: &Self::Witness,
    ) -> Result<(Self::Commitment, Self::Decommitment), Error>;

    /// Run the response phase for the given challenge.
    ///
    /// **Warning:** answering two different challenges with the same decommitment reveals the
    /// witness. [`Committed`] sessions rule this out.
    fn respond(
        &self,
        word: &Self::Word,
        witness: &Self::Witness,
        decommitment: &Self::Decommitment,
        challenge: Self::Challenge,
    ) -> Self::Response;
}

/// The verifier role of a Sigma protocol.
pub trait Verifier: Protocol {
    /// Sample a challenge for the given commitment.
    fn challenge(
        &self,
        rng: &mut impl Rng,
        commitment: &Self::Commitment,
    ) -> Result<Self::Challenge, Error>;

    /// Check that `(commitment, challenge, response)` is an accepting transcript for `word`.
    fn verify(
        &self,
        word: &Self::Word,
        commitment: &Self::Commitment,
        challenge: Self::Challenge,
        response: &Self::Response,
    ) -> bool;
}

/// The special-soundness extractor of a Sigma protocol.
pub trait Extractor: Protocol {
    /// Recover the witness from two accepting transcripts.
    ///
    /// # Panics
    /// If the transcripts have different commitments or equal challenges. Both indicate a bug in
    /// the caller, and no meaningful witness exists.
    fn extract(&self, first: &Transcript<Self>, second: &Transcript<Self>) -> Self::Witness;
}

/// Canonical, fixed-width byte encodings of the values a Sigma protocol exchanges.
///
/// Decoding is the exact inverse of encoding and rejects anything that is not a canonical
/// encoding.
pub trait Encoder: Protocol {
    /// Length in bytes of an encoded commitment.
    fn commitment_length(&self) -> usize;

    /// Length in bytes of an encoded response.
    fn response_length(&self) -> usize;

    /// Encode a commitment.
    fn encode_commitment(&self, commitment: &Self::Commitment) -> Vec<u8>;

    /// Decode a commitment.
    fn decode_commitment(&self, bytes: &[u8]) -> Result<Self::Commitment, Error>;

    /// Encode a response.
    fn encode_response(&self, response: &Self::Response) -> Vec<u8>;

    /// Decode a response.
    fn decode_response(&self, bytes: &[u8]) -> Result<Self::Response, Error>;

    /// Encode a witness.
    fn encode_witness(&self, witness: &Self::Witness) -> Vec<u8>;

    /// Decode a witness.
    fn decode_witness(&self, bytes: &[u8]) -> Result<Self::Witness, Error>;
}

/// A `(commitment, challenge, response)` triple from one run of a Sigma protocol.
pub struct Transcript<P: Protocol + ?Sized> {
    /// The prover's first message.
    pub commitment: P::Commitment,
    /// The verifier's challenge.
    pub challenge: P::Challenge,
    /// The prover's response.
    pub response: P::Response,
}

impl<P: Protocol + ?Sized> Transcript<P> {
    /// Assemble a transcript.
    pub fn new(commitment: P::Commitment, challenge: P::Challenge, response: P::Response) -> Self {
        Self {
            commitment,
            challenge,
            response,
        }
    }

    /// Check that two transcripts can be fed to an [`Extractor`].
    ///
    /// # Panics
    /// If the commitments differ or the challenges are equal.
    pub fn assert_extractable(&self, other: &Self) {
        assert_eq!(
            self.commitment, other.commitment,
            "cannot extract from transcripts with different commitments"
        );
        assert_ne!(
            self.challenge, other.challenge,
            "cannot extract from transcripts with equal challenges"
        );
    }
}

impl<P: Protocol + ?Sized> Clone for Transcript<P> {
    fn clone(&self) -> Self {
        Self {
            commitment: self.commitment.clone(),
            challenge: self.challenge,
            response: self.response.clone(),
        }
    }
}

impl<P: Protocol + ?Sized> fmt::Debug for Transcript<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("commitment", &self.commitment)
            .field("challenge", &self.challenge)
            .field("response", &self.response)
            .finish()
    }
}

/// The outcome of checking a [`Transcript`].
pub enum Verdict<P: Protocol> {
    /// The transcript is accepting.
    Verified(Transcript<P>),
    /// The transcript is not accepting.
    Rejected(Transcript<P>),
}

impl<P: Protocol> Verdict<P> {
    /// Whether the transcript was accepted.
    pub fn verification(&self) -> Verification {
        Verification::from(matches!(self, Self::Verified(_)))
    }

    /// The transcript that was checked, regardless of the outcome.
    pub fn into_transcript(self) -> Transcript<P> {
        match self {
            Self::Verified(transcript) | Self::Rejected(transcript) => transcript,
        }
    }
}

impl<P: Protocol> fmt::Debug for Verdict<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified(transcript) => f.debug_tuple("Verified").field(transcript).finish(),
            Self::Rejected(transcript) => f.debug_tuple("Rejected").field(transcript).finish(),
        }
    }
}
