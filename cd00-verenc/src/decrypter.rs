//! The designated decrypter's side of verifiable encryption.
//!
//! Each entry of a [`VerifiableCiphertext`] holds an accepting transcript for the `true`
//! challenge and an encrypted response to the `false` challenge on the same commitment.
//! Decrypting that response completes a second transcript, and the witness is extracted from the
//! pair. Entries that do not complete an accepting transcript are skipped.

use crate::{DecryptionError, Error, VerifiableCiphertext};
use sigma_crypto::{
    encryption::{Ciphertext, Decrypt},
    sigma::{Encoder, Extractor, Transcript, Verifier as SigmaVerifier},
};

/// The decrypter of verifiable encryption, for the binary Sigma protocol `S` and the decryption
/// key `D`.
#[derive(Debug, Clone, Copy)]
pub struct Decrypter<S, D> {
    protocol: S,
    decryption: D,
}

impl<S, D> Decrypter<S, D>
where
    S: SigmaVerifier<Challenge = bool> + Extractor + Encoder,
    D: Decrypt,
{
    /// Instantiate a decrypter.
    pub fn new(protocol: S, decryption: D) -> Self {
        Self {
            protocol,
            decryption,
        }
    }

    /// Recover a witness for `word` from the first usable entry of `ciphertext`.
    pub fn decrypt(
        &self,
        ciphertext: &VerifiableCiphertext<S>,
        word: &S::Word,
    ) -> Result<S::Witness, Error> {
        let entries = ciphertext.entries();
        if entries.is_empty() {
            return Err(DecryptionError::EmptyCiphertext.into());
        }

        for (position, entry) in entries.iter().enumerate() {
            let opened =
                Transcript::<S>::new(entry.commitment().clone(), true, entry.response().clone());
            match self.decrypt_entry(word, opened, entry.ciphertext()) {
                Ok(witness) => return Ok(witness),
                Err(err) => tracing::debug!(position, error = %err, "skipping ciphertext entry"),
            }
        }
        Err(DecryptionError::NoValidEntry {
            entries: entries.len(),
        }
        .into())
    }

    fn decrypt_entry(
        &self,
        word: &S::Word,
        opened: Transcript<S>,
        ciphertext: &Ciphertext,
    ) -> Result<S::Witness, DecryptionError> {
        let plaintext = self.decryption.decrypt(ciphertext)?;
        let closed = Transcript::<S>::new(
            opened.commitment.clone(),
            !opened.challenge,
            self.protocol.decode_response(&plaintext)?,
        );
        extract_verified(&self.protocol, word, &opened, &closed)
    }
}

/// Extract the witness from two transcripts on one commitment, provided both are accepting.
pub(crate) fn extract_verified<S>(
    protocol: &S,
    word: &S::Word,
    first: &Transcript<S>,
    second: &Transcript<S>,
) -> Result<S::Witness, DecryptionError>
where
    S: SigmaVerifier<Challenge = bool> + Extractor,
{
    let accepts = |transcript: &Transcript<S>| {
        protocol.verify(
            word,
            &transcript.commitment,
            transcript.challenge,
            &transcript.response,
        )
    };
    if accepts(first) && accepts(second) {
        Ok(protocol.extract(first, second))
    } else {
        Err(DecryptionError::InvalidResponse)
    }
}
