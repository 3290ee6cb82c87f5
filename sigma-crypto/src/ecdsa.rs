//! ECDSA signatures over G1.
//!
//! Messages are hashed to scalars with [`hash_to_scalar`]. A signature on `m` under signing key
//! `d` is `(r, s)` with `r = x(g * k) mod q` for a fresh nonce `k` and `s = (H(m) + r * d) / k`.
//! The x-coordinate of a point is read from its compressed encoding with the flag bits cleared
//! and reduced modulo the group order.

use crate::{
    common::*,
    prime_group::{hash_to_scalar, random_scalar},
    Error, Rng, SerializeElement, Verification,
};
use serde::{Deserialize, Serialize};

/// The flag bits in the first byte of a compressed G1 point.
const FLAG_MASK: u8 = 0b1110_0000;

/// An ECDSA signing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKey(#[serde(with = "SerializeElement")] Scalar);

/// An ECDSA verification key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyingKey(#[serde(with = "SerializeElement")] G1Projective);

/// An ECDSA signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(with = "SerializeElement")]
    r: Scalar,
    #[serde(with = "SerializeElement")]
    s: Scalar,
}

/// The x-coordinate of `point`, reduced modulo the group order.
fn x_coordinate(point: &G1Projective) -> Scalar {
    let mut compressed = G1Affine::from(point).to_compressed();
    compressed[0] &= !FLAG_MASK;
    let mut wide = [0; 64];
    for (wide, byte) in wide.iter_mut().zip(compressed.iter().rev()) {
        *wide = *byte;
    }
    Scalar::from_bytes_wide(&wide)
}

impl SigningKey {
    /// Generate a new signing key.
    pub fn new(rng: &mut impl Rng) -> Result<Self, Error> {
        Ok(Self(random_scalar(rng)?))
    }

    /// Derive the matching verification key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(G1Projective::generator() * self.0)
    }

    /// Sign `message`.
    pub fn sign(&self, rng: &mut impl Rng, message: &[u8]) -> Result<Signature, Error> {
        let digest = hash_to_scalar(message);
        loop {
            let nonce = random_scalar(rng)?;
            let r = x_coordinate(&(G1Projective::generator() * nonce));
            let inverse: Option<Scalar> = nonce.invert().into();
            let inverse = match inverse {
                Some(inverse) if r != Scalar::zero() => inverse,
                _ => continue,
            };
            let s = inverse * (digest + r * self.0);
            if s != Scalar::zero() {
                return Ok(Signature { r, s });
            }
        }
    }
}

impl VerifyingKey {
    /// Check that `signature` is a signature on `message` under this key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Verification {
        let Signature { r, s } = *signature;
        let inverse: Option<Scalar> = s.invert().into();
        let inverse = match inverse {
            Some(inverse) if r != Scalar::zero() => inverse,
            _ => return Verification::Failed,
        };

        let point = G1Projective::generator() * (hash_to_scalar(message) * inverse)
            + self.0 * (r * inverse);
        if bool::from(point.is_identity()) {
            return Verification::Failed;
        }
        Verification::from(x_coordinate(&point) == r)
    }
}
