/*!
Verifiable encryption from a single run of a binary Sigma protocol.

The prover commits to one Sigma commitment `t` and encrypts its responses to *both* challenges,
`e_0` and `e_1`. The verifier sends a random bit `c`. The prover reveals `s_c` and the randomness
of `e_c`; the verifier checks the transcript `(t, c, s_c)` and re-encrypts `s_c` to compare with
`e_c`. The [`Ciphertext`] is `(t, c, s_c, e_{1-c})`, and the decrypter extracts the witness from
`(t, c, s_c)` and the decrypted `(t, 1-c, s_{1-c})`.

A cheating prover passes with probability 1/2, so callers repeat the protocol as needed.
Every message and the ciphertext are serde-serializable.
*/

use crate::{decrypter::extract_verified, DecryptionError, Error, Rng, VerificationError};
use serde::{Deserialize, Serialize};
use sigma_crypto::{
    encryption::{self, Decrypt, Encrypt},
    prime_group::random_bit,
    sigma::{Encoder, Extractor, Prover as SigmaProver, Transcript, Verifier as SigmaVerifier},
    SerializeElement,
};
use std::fmt;

/// The prover's first message: the Sigma commitment and encryptions of both responses.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Commitment<S: Encoder> {
    #[serde(with = "SerializeElement")]
    commitment: S::Commitment,
    ciphertexts: [encryption::Ciphertext; 2],
}

impl<S: Encoder> Clone for Commitment<S> {
    fn clone(&self) -> Self {
        Self {
            commitment: self.commitment.clone(),
            ciphertexts: self.ciphertexts.clone(),
        }
    }
}

impl<S: Encoder> fmt::Debug for Commitment<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("commitment", &self.commitment)
            .field("ciphertexts", &self.ciphertexts)
            .finish()
    }
}

/// The prover's secret state: both responses and the randomness of both encryptions.
pub struct Decommitment<S: Encoder, E: Encrypt> {
    responses: [S::Response; 2],
    randomness: [E::Randomness; 2],
}

impl<S: Encoder, E: Encrypt> fmt::Debug for Decommitment<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decommitment").finish()
    }
}

/// The prover's answer to a challenge bit.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Response<S: Encoder, E: Encrypt> {
    #[serde(with = "SerializeElement")]
    response: S::Response,
    #[serde(with = "SerializeElement")]
    randomness: E::Randomness,
}

impl<S: Encoder, E: Encrypt> fmt::Debug for Response<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("response", &self.response)
            .field("randomness", &self.randomness)
            .finish()
    }
}

/// The output of a successful verification.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Ciphertext<S: Encoder> {
    #[serde(with = "SerializeElement")]
    commitment: S::Commitment,
    challenge: bool,
    #[serde(with = "SerializeElement")]
    response: S::Response,
    ciphertext: encryption::Ciphertext,
}

impl<S: Encoder> Ciphertext<S> {
    /// The challenge answered in the clear.
    pub fn challenge(&self) -> bool {
        self.challenge
    }
}

impl<S: Encoder> fmt::Debug for Ciphertext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ciphertext")
            .field("commitment", &self.commitment)
            .field("challenge", &self.challenge)
            .field("response", &self.response)
            .field("ciphertext", &self.ciphertext)
            .finish()
    }
}

fn index(challenge: bool) -> usize {
    challenge as usize
}

/// The prover of the single-run protocol.
#[derive(Debug, Clone, Copy)]
pub struct Prover<S, E> {
    protocol: S,
    encryption: E,
}

impl<S, E> Prover<S, E>
where
    S: SigmaProver<Challenge = bool> + Encoder,
    E: Encrypt,
{
    /// Instantiate a prover.
    pub fn new(protocol: S, encryption: E) -> Self {
        Self {
            protocol,
            encryption,
        }
    }

    /// Commit to the Sigma protocol and encrypt the responses to both challenges.
    pub fn commit(
        &self,
        rng: &mut impl Rng,
        word: &S::Word,
        witness: &S::Witness,
    ) -> Result<(Commitment<S>, Decommitment<S, E>), Error> {
        let (commitment, nonce) = self
            .protocol
            .commit(rng, word, witness)
            .map_err(Error::Commit)?;
        let responses = [
            self.protocol.respond(word, witness, &nonce, false),
            self.protocol.respond(word, witness, &nonce, true),
        ];

        let (e0, r0) = self
            .encryption
            .encrypt(rng, &self.protocol.encode_response(&responses[0]))
            .map_err(Error::Commit)?;
        let (e1, r1) = self
            .encryption
            .encrypt(rng, &self.protocol.encode_response(&responses[1]))
            .map_err(Error::Commit)?;

        Ok((
            Commitment {
                commitment,
                ciphertexts: [e0, e1],
            },
            Decommitment {
                responses,
                randomness: [r0, r1],
            },
        ))
    }

    /// Reveal the response to `challenge` and the randomness of its encryption.
    pub fn respond(&self, decommitment: Decommitment<S, E>, challenge: bool) -> Response<S, E> {
        let Decommitment {
            responses: [s0, s1],
            randomness: [r0, r1],
        } = decommitment;
        let (response, randomness) = if challenge { (s1, r1) } else { (s0, r0) };
        Response {
            response,
            randomness,
        }
    }
}

/// The verifier of the single-run protocol.
#[derive(Debug, Clone, Copy)]
pub struct Verifier<S, E> {
    protocol: S,
    encryption: E,
}

impl<S, E> Verifier<S, E>
where
    S: SigmaVerifier<Challenge = bool> + Encoder,
    E: Encrypt,
{
    /// Instantiate a verifier.
    pub fn new(protocol: S, encryption: E) -> Self {
        Self {
            protocol,
            encryption,
        }
    }

    /// Sample a challenge bit.
    pub fn challenge(
        &self,
        rng: &mut impl Rng,
        _commitment: &Commitment<S>,
    ) -> Result<bool, Error> {
        random_bit(rng).map_err(Error::Challenge)
    }

    /// Check the response and output the ciphertext of the unrevealed response.
    pub fn verify(
        &self,
        word: &S::Word,
        commitment: Commitment<S>,
        challenge: bool,
        response: Response<S, E>,
    ) -> Result<Ciphertext<S>, Error> {
        if !self
            .protocol
            .verify(word, &commitment.commitment, challenge, &response.response)
        {
            tracing::warn!("invalid sigma proof");
            return Err(VerificationError::InvalidSigmaProof { index: 0 }.into());
        }

        let Commitment {
            commitment,
            ciphertexts: [e0, e1],
        } = commitment;
        let (revealed, kept) = if challenge { (e1, e0) } else { (e0, e1) };
        let reencrypted = self
            .encryption
            .encrypt_with(
                &response.randomness,
                &self.protocol.encode_response(&response.response),
            )
            .map_err(|source| VerificationError::Encryption {
                index: index(challenge),
                source,
            })?;
        if reencrypted != revealed {
            tracing::warn!("invalid encryption");
            return Err(VerificationError::InvalidEncryption {
                index: index(challenge),
            }
            .into());
        }

        Ok(Ciphertext {
            commitment,
            challenge,
            response: response.response,
            ciphertext: kept,
        })
    }
}

/// The decrypter of the single-run protocol.
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

    /// Recover a witness for `word` from `ciphertext`.
    pub fn decrypt(
        &self,
        ciphertext: &Ciphertext<S>,
        word: &S::Word,
    ) -> Result<S::Witness, Error> {
        let plaintext = self
            .decryption
            .decrypt(&ciphertext.ciphertext)
            .map_err(DecryptionError::from)?;
        let hidden = self
            .protocol
            .decode_response(&plaintext)
            .map_err(DecryptionError::from)?;

        let revealed = Transcript::<S>::new(
            ciphertext.commitment.clone(),
            ciphertext.challenge,
            ciphertext.response.clone(),
        );
        let hidden = Transcript::<S>::new(
            ciphertext.commitment.clone(),
            !ciphertext.challenge,
            hidden,
        );
        Ok(extract_verified(&self.protocol, word, &revealed, &hidden)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::rng;
    use bls12_381::G1Projective;
    use group::Group;
    use sigma_crypto::{
        dlog::BinaryDlog,
        elgamal::{KeyPair, PublicKey},
        prime_group::random_scalar,
    };

    #[test]
    fn round_trips_for_both_challenges() {
        let mut rng = rng();
        let keys = KeyPair::new(&mut rng).unwrap();
        let prover = Prover::new(BinaryDlog::<G1Projective>::new(), *keys.public_key());
        let verifier = Verifier::new(BinaryDlog::new(), *keys.public_key());
        let decrypter = Decrypter::new(BinaryDlog::new(), *keys.secret_key());

        let witness = random_scalar(&mut rng).unwrap();
        let word = G1Projective::generator() * witness;

        for &challenge in [false, true].iter() {
            let (commitment, decommitment) = prover.commit(&mut rng, &word, &witness).unwrap();
            let response = prover.respond(decommitment, challenge);
            let ciphertext = verifier
                .verify(&word, commitment, challenge, response)
                .unwrap();
            assert_eq!(ciphertext.challenge(), challenge);
            assert_eq!(decrypter.decrypt(&ciphertext, &word).unwrap(), witness);
        }
    }

    #[test]
    fn mismatched_encryption_is_caught() {
        let mut rng = rng();
        let keys = KeyPair::new(&mut rng).unwrap();
        let prover = Prover::new(BinaryDlog::<G1Projective>::new(), keys);
        let verifier = Verifier::new(BinaryDlog::new(), keys);

        let witness = random_scalar(&mut rng).unwrap();
        let word = G1Projective::generator() * witness;
        let (mut commitment, decommitment) = prover.commit(&mut rng, &word, &witness).unwrap();
        commitment.ciphertexts.swap(0, 1);

        let response = prover.respond(decommitment, true);
        assert!(matches!(
            verifier.verify(&word, commitment, true, response),
            Err(Error::Verify(VerificationError::InvalidEncryption { index: 1 }))
        ));
    }

    #[test]
    fn wrong_word_yields_no_witness() {
        let mut rng = rng();
        let keys = KeyPair::new(&mut rng).unwrap();
        let prover = Prover::new(BinaryDlog::<G1Projective>::new(), keys);
        let verifier = Verifier::new(BinaryDlog::new(), keys);
        let decrypter = Decrypter::new(BinaryDlog::new(), keys);

        let witness = random_scalar(&mut rng).unwrap();
        let word = G1Projective::generator() * witness;
        let (commitment, decommitment) = prover.commit(&mut rng, &word, &witness).unwrap();
        let response = prover.respond(decommitment, false);
        let ciphertext = verifier.verify(&word, commitment, false, response).unwrap();

        let other_word = G1Projective::generator() * random_scalar(&mut rng).unwrap();
        assert!(matches!(
            decrypter.decrypt(&ciphertext, &other_word),
            Err(Error::Decrypt(DecryptionError::InvalidResponse))
        ));
    }

    #[test]
    fn messages_cross_the_wire() {
        type Protocol = BinaryDlog<G1Projective>;

        let mut rng = rng();
        let keys = KeyPair::new(&mut rng).unwrap();
        let prover = Prover::new(Protocol::new(), *keys.public_key());
        let verifier = Verifier::new(Protocol::new(), *keys.public_key());
        let decrypter = Decrypter::new(Protocol::new(), *keys.secret_key());

        let witness = random_scalar(&mut rng).unwrap();
        let word = G1Projective::generator() * witness;
        let (commitment, decommitment) = prover.commit(&mut rng, &word, &witness).unwrap();
        let commitment: Commitment<Protocol> =
            bincode::deserialize(&bincode::serialize(&commitment).unwrap()).unwrap();

        let challenge = verifier.challenge(&mut rng, &commitment).unwrap();
        let response = prover.respond(decommitment, challenge);
        let response: Response<Protocol, PublicKey> =
            bincode::deserialize(&bincode::serialize(&response).unwrap()).unwrap();

        let ciphertext = verifier
            .verify(&word, commitment, challenge, response)
            .unwrap();
        let bytes = bincode::serialize(&ciphertext).unwrap();
        let ciphertext: Ciphertext<Protocol> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(ciphertext.challenge(), challenge);
        assert_eq!(decrypter.decrypt(&ciphertext, &word).unwrap(), witness);

        assert!(bincode::deserialize::<Ciphertext<Protocol>>(&bytes[..bytes.len() - 1]).is_err());
    }
}
