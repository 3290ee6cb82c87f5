//! Hashed ElGamal encryption of short byte strings over G1.
//!
//! Under public key `Y = g * x` and randomness `r`, the ciphertext is the compressed point
//! `C1 = g * r` followed by the message XORed with the pad `SHA3-512(tag || Y * r)`. The holder
//! of `x` recomputes the shared point as `C1 * x`, and with it the pad.
//!
//! Both the shared point and `C1` lie in the prime-order subgroup, and the message never
//! enters a group element, so nothing about it can be computed without the secret key.
//! Encryption is deterministic given `r`, which lets a party holding the randomness re-encrypt
//! and compare ciphertexts byte-for-byte.

use crate::{
    common::*,
    encryption::{Ciphertext, Decrypt, Encrypt},
    prime_group::{decode_point, random_scalar},
    Error, Rng, SerializeElement,
};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_512};

/// Length in bytes of a compressed G1 point.
const POINT_LENGTH: usize = 48;

const PAD_TAG: &[u8] = b"sigma-crypto hashed elgamal pad";

/// The longest message that can be encrypted, in bytes.
pub const MESSAGE_CAPACITY: usize = 64;

/// Length in bytes of the ciphertext of a message of `message_length` bytes.
pub const fn ciphertext_length(message_length: usize) -> usize {
    POINT_LENGTH + message_length
}

/// An ElGamal secret key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKey(#[serde(with = "SerializeElement")] Scalar);

/// An ElGamal public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "SerializeElement")] G1Projective);

/// An ElGamal key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl SecretKey {
    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(G1Projective::generator() * self.0)
    }
}

impl KeyPair {
    /// Generate a new key pair.
    pub fn new(rng: &mut impl Rng) -> Result<Self, Error> {
        let secret_key = SecretKey(random_scalar(rng)?);
        Ok(Self {
            public_key: secret_key.public_key(),
            secret_key,
        })
    }

    /// The secret half of the key pair.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// The public half of the key pair.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

/// XOR `bytes` with the pad derived from the shared point.
fn apply_pad(shared: &G1Projective, bytes: &[u8]) -> Vec<u8> {
    let mut hasher = Sha3_512::new();
    hasher.update(PAD_TAG);
    hasher.update(G1Affine::from(shared).to_compressed());
    let pad = hasher.finalize();
    bytes.iter().zip(pad.iter()).map(|(b, p)| b ^ p).collect()
}

impl Encrypt for PublicKey {
    type Randomness = Scalar;

    fn sample_randomness(&self, rng: &mut impl Rng) -> Result<Scalar, Error> {
        random_scalar(rng)
    }

    fn encrypt_with(&self, randomness: &Scalar, plaintext: &[u8]) -> Result<Ciphertext, Error> {
        if plaintext.len() > MESSAGE_CAPACITY {
            return Err(Error::MessageTooLong {
                max: MESSAGE_CAPACITY,
                got: plaintext.len(),
            });
        }
        let c1 = G1Projective::generator() * randomness;
        let shared = self.0 * randomness;

        let mut bytes = Vec::with_capacity(ciphertext_length(plaintext.len()));
        bytes.extend_from_slice(&G1Affine::from(c1).to_compressed());
        bytes.extend(apply_pad(&shared, plaintext));
        Ok(Ciphertext::from_bytes(bytes))
    }
}

impl Decrypt for SecretKey {
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Vec<u8>, Error> {
        let bytes = ciphertext.as_bytes();
        if bytes.len() < POINT_LENGTH {
            return Err(Error::EncodingLength {
                expected: POINT_LENGTH,
                got: bytes.len(),
            });
        }
        let (c1, masked) = bytes.split_at(POINT_LENGTH);
        if masked.len() > MESSAGE_CAPACITY {
            return Err(Error::MessageTooLong {
                max: MESSAGE_CAPACITY,
                got: masked.len(),
            });
        }
        let c1: G1Projective = decode_point(c1).map_err(|_| Error::DecryptionFailed)?;
        Ok(apply_pad(&(c1 * self.0), masked))
    }
}

impl Encrypt for KeyPair {
    type Randomness = Scalar;

    fn sample_randomness(&self, rng: &mut impl Rng) -> Result<Scalar, Error> {
        self.public_key.sample_randomness(rng)
    }

    fn encrypt_with(&self, randomness: &Scalar, plaintext: &[u8]) -> Result<Ciphertext, Error> {
        self.public_key.encrypt_with(randomness, plaintext)
    }
}

impl Decrypt for KeyPair {
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Vec<u8>, Error> {
        self.secret_key.decrypt(ciphertext)
    }
}
