//! Typed state machines for a single run of a Sigma protocol.
//!
//! ## Prover
//!
//! The prover begins by [`commit()`](Committed::new())ing to fresh randomness, entering the
//! [`Committed`] state and exposing the [`commitment()`](Committed::commitment()). On receiving a
//! challenge, the prover [`respond()`](Committed::respond())s, which consumes the session.
//!
//! ## Verifier
//!
//! On receiving a commitment, the verifier samples a challenge and enters the [`Challenged`]
//! state. On receiving the response, it [`verify()`](Challenged::verify())s, which consumes the
//! session and produces a [`Verdict`].

use crate::{
    sigma::{Prover, Transcript, Verdict, Verifier},
    Error, Rng,
};
use std::fmt;

/// A prover session that has sent its commitment and awaits a challenge.
pub struct Committed<'a, P: Prover> {
    protocol: &'a P,
    word: &'a P::Word,
    witness: &'a P::Witness,
    commitment: P::Commitment,
    decommitment: P::Decommitment,
}

impl<'a, P: Prover> Committed<'a, P> {
    /// Start a prover session by committing to fresh randomness.
    pub fn new(
        protocol: &'a P,
        rng: &mut impl Rng,
        word: &'a P::Word,
        witness: &'a P::Witness,
    ) -> Result<Self, Error> {
        let (commitment, decommitment) = protocol.commit(rng, word, witness)?;
        Ok(Self {
            protocol,
            word,
            witness,
            commitment,
            decommitment,
        })
    }

    /// The commitment to send to the verifier.
    pub fn commitment(&self) -> &P::Commitment {
        &self.commitment
    }

    /// Answer the verifier's challenge.
    ///
    /// Consumes the session: a decommitment answers at most one challenge.
    pub fn respond(self, challenge: P::Challenge) -> P::Response {
        self.protocol
            .respond(self.word, self.witness, &self.decommitment, challenge)
    }
}

impl<P: Prover> fmt::Debug for Committed<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Committed")
            .field("commitment", &self.commitment)
            .finish()
    }
}

/// A verifier session that has sent its challenge and awaits a response.
pub struct Challenged<'a, P: Verifier> {
    protocol: &'a P,
    word: &'a P::Word,
    commitment: P::Commitment,
    challenge: P::Challenge,
}

impl<'a, P: Verifier> Challenged<'a, P> {
    /// Receive the prover's commitment and sample a challenge for it.
    pub fn new(
        protocol: &'a P,
        rng: &mut impl Rng,
        word: &'a P::Word,
        commitment: P::Commitment,
    ) -> Result<Self, Error> {
        let challenge = protocol.challenge(rng, &commitment)?;
        Ok(Self {
            protocol,
            word,
            commitment,
            challenge,
        })
    }

    /// The challenge to send to the prover.
    pub fn challenge(&self) -> P::Challenge {
        self.challenge
    }

    /// Check the prover's response, completing the session.
    pub fn verify(self, response: P::Response) -> Verdict<P> {
        let verified = self.protocol.verify(self.word, &self.commitment, self.challenge, &response);
        let transcript = Transcript::new(self.commitment, self.challenge, response);
        if verified {
            Verdict::Verified(transcript)
        } else {
            tracing::debug!(challenge = ?transcript.challenge, "sigma transcript rejected");
            Verdict::Rejected(transcript)
        }
    }
}

impl<P: Verifier> fmt::Debug for Challenged<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Challenged")
            .field("commitment", &self.commitment)
            .field("challenge", &self.challenge)
            .finish()
    }
}

/// Run a complete, honest session of a Sigma protocol between a prover and a verifier.
pub fn run_session<P: Prover + Verifier>(
    protocol: &P,
    rng: &mut impl Rng,
    word: &P::Word,
    witness: &P::Witness,
) -> Result<Verdict<P>, Error> {
    let prover = Committed::new(protocol, &mut *rng, word, witness)?;
    let verifier = Challenged::new(protocol, &mut *rng, word, prover.commitment().clone())?;
    let challenge = verifier.challenge();
    Ok(verifier.verify(prover.respond(challenge)))
}
