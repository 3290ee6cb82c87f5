/*!
The prover's side of verifiable encryption.

The prover [`commit()`](Prover::commit())s to `k` repetitions of a binary Sigma protocol, each
with an encrypted response to the `false` challenge, and sends the [`Commitment`] to the verifier
while keeping the [`Decommitment`]. On receiving the verifier's [`Challenge`], it
[`respond()`](Prover::respond())s, which consumes the decommitment and produces the [`Response`].

The commitment and the response are serde-serializable for transport to the verifier. The
decommitment holds the witness and never leaves the prover.
*/

use crate::{
    encoding::{encode_batch, BatchEntry},
    Challenge, Error, Parameters, Rng,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use sigma_crypto::{
    commitment::CommitmentScheme,
    encryption::{Ciphertext, Encrypt},
    sigma::{Encoder, Prover as SigmaProver},
    SerializeElement,
};
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The prover's first message: a commitment to the batch of repetitions.
pub type Commitment<C> = <C as CommitmentScheme>::Commitment;

/// The prover's secret state between commitment and response.
pub struct Decommitment<S: SigmaProver + Encoder, E: Encrypt, C: CommitmentScheme> {
    pub(crate) word: S::Word,
    pub(crate) witness: S::Witness,
    pub(crate) batch: Vec<BatchEntry<S>>,
    pub(crate) nonces: Vec<S::Decommitment>,
    pub(crate) randomness: Vec<E::Randomness>,
    pub(crate) opening: C::Opening,
}

impl<S, E, C> fmt::Debug for Decommitment<S, E, C>
where
    S: SigmaProver + Encoder,
    E: Encrypt,
    C: CommitmentScheme,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decommitment")
            .field("batch", &self.batch)
            .finish()
    }
}

/// The prover's answer to a challenge.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Response<S: Encoder, E: Encrypt, C: CommitmentScheme> {
    #[serde(with = "SerializeElement")]
    pub(crate) responses: Vec<S::Response>,
    #[serde(with = "SerializeElement")]
    pub(crate) randomness: Vec<Option<E::Randomness>>,
    pub(crate) batch: Vec<BatchEntry<S>>,
    pub(crate) opening: C::Opening,
}

impl<S: Encoder, E: Encrypt, C: CommitmentScheme> Response<S, E, C> {
    /// The Sigma protocol response for each repetition.
    pub fn responses(&self) -> &[S::Response] {
        &self.responses
    }

    /// The encryption randomness, revealed for closed repetitions only.
    pub fn randomness(&self) -> &[Option<E::Randomness>] {
        &self.randomness
    }

    /// The batch the prover committed to.
    pub fn batch(&self) -> &[BatchEntry<S>] {
        &self.batch
    }
}

impl<S: Encoder, E: Encrypt, C: CommitmentScheme> Clone for Response<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            responses: self.responses.clone(),
            randomness: self.randomness.clone(),
            batch: self.batch.clone(),
            opening: self.opening.clone(),
        }
    }
}

impl<S: Encoder, E: Encrypt, C: CommitmentScheme> fmt::Debug for Response<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("responses", &self.responses)
            .field("randomness", &self.randomness)
            .field("batch", &self.batch)
            .field("opening", &self.opening)
            .finish()
    }
}

/// The prover of verifiable encryption, for the binary Sigma protocol `S`, the encryption scheme
/// `E` of the decrypter and the commitment scheme `C`.
#[derive(Debug, Clone, Copy)]
pub struct Prover<S, E, C> {
    parameters: Parameters,
    protocol: S,
    encryption: E,
    commitments: C,
}

struct Repetition<S: SigmaProver, E: Encrypt> {
    commitment: S::Commitment,
    nonce: S::Decommitment,
    ciphertext: Ciphertext,
    randomness: E::Randomness,
}

impl<S, E, C> Prover<S, E, C>
where
    S: SigmaProver<Challenge = bool> + Encoder + Sync,
    S::Word: Clone,
    S::Witness: Clone,
    E: Encrypt + Sync,
    C: CommitmentScheme,
{
    /// Instantiate a prover.
    pub fn new(parameters: Parameters, protocol: S, encryption: E, commitments: C) -> Self {
        Self {
            parameters,
            protocol,
            encryption,
            commitments,
        }
    }

    /// The parameters this prover runs with.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Commit to `k` encrypted repetitions of the Sigma protocol for `word` and `witness`.
    ///
    /// Each repetition draws from its own generator, seeded from `rng` in order, so the result
    /// does not depend on whether repetitions run in parallel.
    pub fn commit(
        &self,
        rng: &mut impl Rng,
        word: &S::Word,
        witness: &S::Witness,
    ) -> Result<(Commitment<C>, Decommitment<S, E, C>), Error> {
        let seeds = (0..self.parameters.repetitions())
            .map(|_| {
                let mut seed = [0; 32];
                rng.try_fill_bytes(&mut seed).map(|()| seed)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| Error::Commit(err.into()))?;

        let protocol = &self.protocol;
        let encryption = &self.encryption;
        let repetitions = cfg_into_iter!(seeds)
            .map(|seed| commit_repetition(protocol, encryption, seed, word, witness))
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::Commit)?;

        let mut batch = Vec::with_capacity(repetitions.len());
        let mut nonces = Vec::with_capacity(repetitions.len());
        let mut randomness = Vec::with_capacity(repetitions.len());
        for repetition in repetitions {
            batch.push(BatchEntry {
                commitment: repetition.commitment,
                ciphertext: repetition.ciphertext,
            });
            nonces.push(repetition.nonce);
            randomness.push(repetition.randomness);
        }

        let (commitment, opening) = self
            .commitments
            .commit(rng, &encode_batch(protocol, &batch))
            .map_err(Error::Commit)?;
        tracing::debug!(
            repetitions = self.parameters.repetitions(),
            "committed to verifiable encryption batch"
        );

        Ok((
            commitment,
            Decommitment {
                word: word.clone(),
                witness: witness.clone(),
                batch,
                nonces,
                randomness,
                opening,
            },
        ))
    }

    /// Answer the verifier's challenge.
    ///
    /// Opened repetitions answer the `true` challenge. Closed repetitions answer the `false`
    /// challenge and reveal their encryption randomness.
    pub fn respond(
        &self,
        decommitment: Decommitment<S, E, C>,
        challenge: &Challenge,
    ) -> Result<Response<S, E, C>, Error> {
        let Decommitment {
            word,
            witness,
            batch,
            nonces,
            randomness,
            opening,
        } = decommitment;
        let opened = challenge.membership(batch.len())?;

        let responses = nonces
            .iter()
            .zip(&opened)
            .map(|(nonce, &open)| self.protocol.respond(&word, &witness, nonce, open))
            .collect();
        let randomness = randomness
            .into_iter()
            .zip(&opened)
            .map(|(randomness, &open)| if open { None } else { Some(randomness) })
            .collect();

        Ok(Response {
            responses,
            randomness,
            batch,
            opening,
        })
    }
}

fn commit_repetition<S, E>(
    protocol: &S,
    encryption: &E,
    seed: [u8; 32],
    word: &S::Word,
    witness: &S::Witness,
) -> Result<Repetition<S, E>, sigma_crypto::Error>
where
    S: SigmaProver<Challenge = bool> + Encoder,
    E: Encrypt,
{
    let mut rng = StdRng::from_seed(seed);
    let (commitment, nonce) = protocol.commit(&mut rng, word, witness)?;
    let response = protocol.respond(word, witness, &nonce, false);
    let (ciphertext, randomness) =
        encryption.encrypt(&mut rng, &protocol.encode_response(&response))?;
    Ok(Repetition {
        commitment,
        nonce,
        ciphertext,
        randomness,
    })
}
