//! The Schnorr Sigma protocol for knowledge of a discrete logarithm.
//!
//! Given a public word `X` and a witness `w` such that `X = g * w` for the group generator `g`:
//! 1. The prover samples a nonce `r` and commits to `t = g * r`.
//! 2. The verifier samples a challenge `c`.
//! 3. The prover responds with `s = r + c * w`.
//! 4. The verifier accepts if `g * s == t + X * c`.
//!
//! Two accepting transcripts `(t, c1, s1)` and `(t, c2, s2)` with `c1 != c2` reveal
//! `w = (s1 - s2) / (c1 - c2)`.
//!
//! [`Dlog`] samples challenges from the whole scalar field. [`BinaryDlog`] restricts the
//! challenge to a single bit, which is the form consumed by cut-and-choose constructions.

use crate::{
    common::*,
    prime_group::{
        decode_point, decode_scalar, encode_point, encode_scalar, point_length, random_bit,
        random_scalar, scalar_from_int, SCALAR_LENGTH,
    },
    sigma::{Encoder, Extractor, Protocol, Prover, Transcript, Verifier},
    Error, Rng, SerializeElement,
};
use std::{fmt, marker::PhantomData};

/// A trait synonym for the groups the discrete-log protocols are defined over. This trait is
/// blanket-implemented for all valid types and will never need to be implemented by-hand.
pub trait DlogGroup: Group<Scalar = Scalar> + GroupEncoding + SerializeElement {}
impl<G: Group<Scalar = Scalar> + GroupEncoding + SerializeElement> DlogGroup for G {}

/// Schnorr proof of knowledge of a discrete logarithm in `G`, with challenges drawn from the
/// scalar field.
pub struct Dlog<G> {
    _group: PhantomData<G>,
}

impl<G> Dlog<G> {
    /// Instantiate the protocol.
    pub fn new() -> Self {
        Self {
            _group: PhantomData,
        }
    }
}

impl<G> Default for Dlog<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> Clone for Dlog<G> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<G> Copy for Dlog<G> {}

impl<G> fmt::Debug for Dlog<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dlog")
    }
}

impl<G: DlogGroup> Protocol for Dlog<G> {
    type Word = G;
    type Witness = Scalar;
    type Commitment = G;
    type Decommitment = Scalar;
    type Challenge = Scalar;
    type Response = Scalar;
}

impl<G: DlogGroup> Prover for Dlog<G> {
    fn commit(
        &self,
        rng: &mut impl Rng,
        _word: &G,
        _witness: &Scalar,
    ) -> Result<(G, Scalar), Error> {
        let nonce = random_scalar(rng)?;
        Ok((G::generator() * nonce, nonce))
    }

    fn respond(&self, _word: &G, witness: &Scalar, nonce: &Scalar, challenge: Scalar) -> Scalar {
        nonce + challenge * witness
    }
}

impl<G: DlogGroup> Verifier for Dlog<G> {
    fn challenge(&self, rng: &mut impl Rng, _commitment: &G) -> Result<Scalar, Error> {
        random_scalar(rng)
    }

    fn verify(&self, word: &G, commitment: &G, challenge: Scalar, response: &Scalar) -> bool {
        G::generator() * response == *commitment + *word * challenge
    }
}

impl<G: DlogGroup> Extractor for Dlog<G> {
    fn extract(&self, first: &Transcript<Self>, second: &Transcript<Self>) -> Scalar {
        first.assert_extractable(second);
        let challenge_difference = first.challenge - second.challenge;
        let inverse: Option<Scalar> = challenge_difference.invert().into();
        (first.response - second.response)
            * inverse.expect("distinct challenges have a nonzero difference")
    }
}

impl<G: DlogGroup> Encoder for Dlog<G> {
    fn commitment_length(&self) -> usize {
        point_length::<G>()
    }

    fn response_length(&self) -> usize {
        SCALAR_LENGTH
    }

    fn encode_commitment(&self, commitment: &G) -> Vec<u8> {
        encode_point(commitment)
    }

    fn decode_commitment(&self, bytes: &[u8]) -> Result<G, Error> {
        decode_point(bytes)
    }

    fn encode_response(&self, response: &Scalar) -> Vec<u8> {
        encode_scalar(response).to_vec()
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<Scalar, Error> {
        decode_scalar(bytes)
    }

    fn encode_witness(&self, witness: &Scalar) -> Vec<u8> {
        encode_scalar(witness).to_vec()
    }

    fn decode_witness(&self, bytes: &[u8]) -> Result<Scalar, Error> {
        decode_scalar(bytes)
    }
}

/// Schnorr proof of knowledge of a discrete logarithm in `G`, with a single-bit challenge.
///
/// A single run has soundness error 1/2. It shares commitments, responses and encodings with
/// [`Dlog`]; a challenge bit `c` acts as the scalar `0` or `1`.
pub struct BinaryDlog<G> {
    base: Dlog<G>,
}

impl<G> BinaryDlog<G> {
    /// Instantiate the protocol.
    pub fn new() -> Self {
        Self { base: Dlog::new() }
    }
}

impl<G> Default for BinaryDlog<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> Clone for BinaryDlog<G> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<G> Copy for BinaryDlog<G> {}

impl<G> fmt::Debug for BinaryDlog<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BinaryDlog")
    }
}

/// Interpret a challenge bit as a scalar.
fn challenge_scalar(challenge: bool) -> Scalar {
    scalar_from_int(challenge as u64)
}

impl<G: DlogGroup> Protocol for BinaryDlog<G> {
    type Word = G;
    type Witness = Scalar;
    type Commitment = G;
    type Decommitment = Scalar;
    type Challenge = bool;
    type Response = Scalar;
}

impl<G: DlogGroup> Prover for BinaryDlog<G> {
    fn commit(
        &self,
        rng: &mut impl Rng,
        word: &G,
        witness: &Scalar,
    ) -> Result<(G, Scalar), Error> {
        self.base.commit(rng, word, witness)
    }

    fn respond(&self, word: &G, witness: &Scalar, nonce: &Scalar, challenge: bool) -> Scalar {
        self.base.respond(word, witness, nonce, challenge_scalar(challenge))
    }
}

impl<G: DlogGroup> Verifier for BinaryDlog<G> {
    fn challenge(&self, rng: &mut impl Rng, _commitment: &G) -> Result<bool, Error> {
        random_bit(rng)
    }

    fn verify(&self, word: &G, commitment: &G, challenge: bool, response: &Scalar) -> bool {
        self.base.verify(word, commitment, challenge_scalar(challenge), response)
    }
}

impl<G: DlogGroup> Extractor for BinaryDlog<G> {
    fn extract(&self, first: &Transcript<Self>, second: &Transcript<Self>) -> Scalar {
        first.assert_extractable(second);
        let widen = |transcript: &Transcript<Self>| {
            Transcript::<Dlog<G>>::new(
                transcript.commitment,
                challenge_scalar(transcript.challenge),
                transcript.response,
            )
        };
        self.base.extract(&widen(first), &widen(second))
    }
}

impl<G: DlogGroup> Encoder for BinaryDlog<G> {
    fn commitment_length(&self) -> usize {
        self.base.commitment_length()
    }

    fn response_length(&self) -> usize {
        self.base.response_length()
    }

    fn encode_commitment(&self, commitment: &G) -> Vec<u8> {
        self.base.encode_commitment(commitment)
    }

    fn decode_commitment(&self, bytes: &[u8]) -> Result<G, Error> {
        self.base.decode_commitment(bytes)
    }

    fn encode_response(&self, response: &Scalar) -> Vec<u8> {
        self.base.encode_response(response)
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<Scalar, Error> {
        self.base.decode_response(bytes)
    }

    fn encode_witness(&self, witness: &Scalar) -> Vec<u8> {
        self.base.encode_witness(witness)
    }

    fn decode_witness(&self, bytes: &[u8]) -> Result<Scalar, Error> {
        self.base.decode_witness(bytes)
    }
}
