/*!
The verifier's side of verifiable encryption.

On receiving the prover's commitment, the verifier samples a [`Challenge`] opening a uniformly
random subset of the repetitions. On receiving the [`Response`], it
[`verify()`](Verifier::verify())s every repetition and, if all of them pass, outputs the
[`VerifiableCiphertext`] formed from the opened repetitions.

The ciphertext derives `Serialize` and `Deserialize`, so it can be handed to the decrypter in
any serde format.
*/

use crate::{
    encoding::encode_batch,
    prover::{Commitment, Response},
    subset::random_subset,
    Challenge, Error, Parameters, Rng, VerificationError,
};
use serde::{Deserialize, Serialize};
use sigma_crypto::{
    commitment::CommitmentScheme,
    encryption::{Ciphertext, Encrypt},
    sigma::{Encoder, Verifier as SigmaVerifier},
    SerializeElement,
};
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One opened repetition: the Sigma commitment, the response to the `true` challenge, and the
/// encrypted response to the `false` challenge.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct CiphertextEntry<S: Encoder> {
    #[serde(with = "SerializeElement")]
    commitment: S::Commitment,
    #[serde(with = "SerializeElement")]
    response: S::Response,
    ciphertext: Ciphertext,
}

impl<S: Encoder> CiphertextEntry<S> {
    pub(crate) fn new(
        commitment: S::Commitment,
        response: S::Response,
        ciphertext: Ciphertext,
    ) -> Self {
        Self {
            commitment,
            response,
            ciphertext,
        }
    }

    /// The Sigma protocol commitment.
    pub fn commitment(&self) -> &S::Commitment {
        &self.commitment
    }

    /// The response to the `true` challenge.
    pub fn response(&self) -> &S::Response {
        &self.response
    }

    /// The encrypted response to the `false` challenge.
    pub fn ciphertext(&self) -> &Ciphertext {
        &self.ciphertext
    }
}

impl<S: Encoder> Clone for CiphertextEntry<S> {
    fn clone(&self) -> Self {
        Self::new(
            self.commitment.clone(),
            self.response.clone(),
            self.ciphertext.clone(),
        )
    }
}

impl<S: Encoder> fmt::Debug for CiphertextEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CiphertextEntry")
            .field("commitment", &self.commitment)
            .field("response", &self.response)
            .field("ciphertext", &self.ciphertext)
            .finish()
    }
}

/// The output of a successful verification: one entry per opened repetition, in ascending
/// repetition order.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct VerifiableCiphertext<S: Encoder> {
    entries: Vec<CiphertextEntry<S>>,
}

impl<S: Encoder> VerifiableCiphertext<S> {
    /// The entries of the ciphertext.
    pub fn entries(&self) -> &[CiphertextEntry<S>] {
        &self.entries
    }
}

impl<S: Encoder> Clone for VerifiableCiphertext<S> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<S: Encoder> fmt::Debug for VerifiableCiphertext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifiableCiphertext")
            .field("entries", &self.entries)
            .finish()
    }
}

/// The verifier of verifiable encryption, for the binary Sigma protocol `S`, the encryption scheme
/// `E` of the decrypter and the commitment scheme `C`.
#[derive(Debug, Clone, Copy)]
pub struct Verifier<S, E, C> {
    parameters: Parameters,
    protocol: S,
    encryption: E,
    commitments: C,
}

impl<S, E, C> Verifier<S, E, C>
where
    S: SigmaVerifier<Challenge = bool> + Encoder + Sync,
    E: Encrypt + Sync,
    C: CommitmentScheme,
{
    /// Instantiate a verifier.
    pub fn new(parameters: Parameters, protocol: S, encryption: E, commitments: C) -> Self {
        Self {
            parameters,
            protocol,
            encryption,
            commitments,
        }
    }

    /// The parameters this verifier runs with.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Choose which repetitions to open, uniformly among all subsets of the configured size.
    pub fn challenge(
        &self,
        rng: &mut impl Rng,
        _commitment: &Commitment<C>,
    ) -> Result<Challenge, Error> {
        let indices = random_subset(
            rng,
            self.parameters.repetitions(),
            self.parameters.opened(),
        )?;
        tracing::debug!(opened = ?indices, "sampled verifiable encryption challenge");
        Ok(Challenge::from_indices(indices))
    }

    /// Check the prover's response to `challenge` and output the ciphertext of the opened
    /// repetitions.
    ///
    /// The shape of the response and the commitment are checked before any repetition. If several
    /// repetitions fail, the error names the lowest index.
    pub fn verify(
        &self,
        word: &S::Word,
        commitment: &Commitment<C>,
        challenge: &Challenge,
        response: Response<S, E, C>,
    ) -> Result<VerifiableCiphertext<S>, Error> {
        let result = self.check(word, commitment, challenge, response);
        if let Err(err) = &result {
            tracing::warn!(error = %err, "verifiable encryption rejected");
        }
        result
            .map(|entries| VerifiableCiphertext { entries })
            .map_err(Error::Verify)
    }

    fn check(
        &self,
        word: &S::Word,
        commitment: &Commitment<C>,
        challenge: &Challenge,
        response: Response<S, E, C>,
    ) -> Result<Vec<CiphertextEntry<S>>, VerificationError> {
        let repetitions = self.parameters.repetitions();
        for &(part, got) in [
            ("responses", response.responses.len()),
            ("randomness entries", response.randomness.len()),
            ("batch entries", response.batch.len()),
        ]
        .iter()
        {
            if got != repetitions {
                return Err(VerificationError::LengthMismatch {
                    part,
                    expected: repetitions,
                    got,
                });
            }
        }

        let opened = challenge
            .membership(repetitions)
            .map_err(|_| VerificationError::MalformedChallenge)?;
        if opened.iter().filter(|&&open| open).count() != self.parameters.opened() {
            return Err(VerificationError::MalformedChallenge);
        }

        let batch = encode_batch(&self.protocol, &response.batch);
        if !self
            .commitments
            .verify(commitment, &batch, &response.opening)
            .is_verified()
        {
            return Err(VerificationError::CommitmentMismatch);
        }

        let protocol = &self.protocol;
        let encryption = &self.encryption;
        let response = &response;
        let opened = &opened;
        let checked: Vec<_> = cfg_into_iter!(0..repetitions)
            .map(|index| {
                check_repetition(protocol, encryption, word, response, index, opened[index])
            })
            .collect();

        let mut entries = Vec::with_capacity(self.parameters.opened());
        for result in checked {
            if let Some(entry) = result? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

/// Check one repetition, returning its ciphertext entry if it is opened.
fn check_repetition<S, E, C>(
    protocol: &S,
    encryption: &E,
    word: &S::Word,
    response: &Response<S, E, C>,
    index: usize,
    open: bool,
) -> Result<Option<CiphertextEntry<S>>, VerificationError>
where
    S: SigmaVerifier<Challenge = bool> + Encoder,
    E: Encrypt,
    C: CommitmentScheme,
{
    let entry = &response.batch[index];
    let sigma_response = &response.responses[index];
    if !protocol.verify(word, &entry.commitment, open, sigma_response) {
        return Err(VerificationError::InvalidSigmaProof { index });
    }

    if open {
        return Ok(Some(CiphertextEntry::new(
            entry.commitment.clone(),
            sigma_response.clone(),
            entry.ciphertext.clone(),
        )));
    }

    let randomness = response.randomness[index]
        .as_ref()
        .ok_or(VerificationError::MissingRandomness { index })?;
    let reencrypted = encryption
        .encrypt_with(randomness, &protocol.encode_response(sigma_response))
        .map_err(|source| VerificationError::Encryption { index, source })?;
    if reencrypted != entry.ciphertext {
        return Err(VerificationError::InvalidEncryption { index });
    }
    Ok(None)
}
