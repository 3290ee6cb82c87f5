//! Operations on the prime-order groups of BLS12-381 that the protocols in this crate consume.
//!
//! Group arithmetic itself comes from the [`group`] and [`ff`] traits implemented by
//! `bls12_381`: [`Group::generator`], point addition, and multiplication by a [`Scalar`]. This
//! module adds the remaining capabilities:
//! - fallible sampling of uniform scalars and bits from a randomness source,
//! - the group order and canonical fixed-width encodings of scalars and group elements,
//! - hashing byte strings to scalars,
//! - reversible encoding of short messages as group elements ([`MessageEncoding`]).
//!
//! Randomness is always drawn with [`RngCore::try_fill_bytes`](rand::RngCore::try_fill_bytes),
//! so an exhausted source surfaces as [`Error::Entropy`] instead of a panic.

use crate::{common::*, hash::ScalarHasher, Error};
use ff::PrimeField;

/// The order of the prime-order subgroups of BLS12-381, as a big-endian byte string.
pub const ORDER: [u8; 32] = [
    0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8, 0x05,
    0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01,
];

/// Length in bytes of the canonical encoding of a [`Scalar`].
pub const SCALAR_LENGTH: usize = 32;

/// Sample a uniformly random scalar.
///
/// Reads 64 bytes and reduces them modulo the group order, so the bias is negligible.
pub fn random_scalar(rng: &mut impl Rng) -> Result<Scalar, Error> {
    let mut bytes = [0; 64];
    rng.try_fill_bytes(&mut bytes)?;
    Ok(Scalar::from_bytes_wide(&bytes))
}

/// Sample a uniformly random bit.
pub fn random_bit(rng: &mut impl Rng) -> Result<bool, Error> {
    let mut byte = [0; 1];
    rng.try_fill_bytes(&mut byte)?;
    Ok(byte[0] & 1 == 1)
}

/// Embed an integer into the scalar field.
pub fn scalar_from_int(value: u64) -> Scalar {
    Scalar::from(value)
}

/// Hash an arbitrary byte string to a scalar.
pub fn hash_to_scalar(bytes: impl AsRef<[u8]>) -> Scalar {
    ScalarHasher::new().with_bytes(bytes).finish()
}

/// Canonical encoding of a scalar: 32 bytes, little-endian.
pub fn encode_scalar(scalar: &Scalar) -> [u8; SCALAR_LENGTH] {
    scalar.to_repr()
}

/// Decode a scalar from its canonical encoding.
///
/// Fails if `bytes` has the wrong length or encodes an integer that is not reduced modulo the
/// group order.
pub fn decode_scalar(bytes: &[u8]) -> Result<Scalar, Error> {
    if bytes.len() != SCALAR_LENGTH {
        return Err(Error::EncodingLength {
            expected: SCALAR_LENGTH,
            got: bytes.len(),
        });
    }
    let mut repr = [0; SCALAR_LENGTH];
    repr.copy_from_slice(bytes);
    Option::from(Scalar::from_repr(repr)).ok_or(Error::InvalidEncoding("scalar"))
}

/// Length in bytes of the canonical (compressed) encoding of an element of `G`.
pub fn point_length<G: GroupEncoding>() -> usize {
    G::Repr::default().as_ref().len()
}

/// Canonical (compressed) encoding of a group element.
pub fn encode_point<G: GroupEncoding>(point: &G) -> Vec<u8> {
    point.to_bytes().as_ref().to_vec()
}

/// Decode a group element from its canonical encoding.
///
/// Fails if `bytes` has the wrong length, is not a point on the curve, or is not in the
/// prime-order subgroup.
pub fn decode_point<G: GroupEncoding>(bytes: &[u8]) -> Result<G, Error> {
    let mut repr = G::Repr::default();
    if repr.as_ref().len() != bytes.len() {
        return Err(Error::EncodingLength {
            expected: repr.as_ref().len(),
            got: bytes.len(),
        });
    }
    repr.as_mut().copy_from_slice(bytes);
    Option::from(G::from_bytes(&repr)).ok_or(Error::InvalidEncoding("group element"))
}

/// Reversible encoding of short messages as curve points.
///
/// Encoded points lie on the curve but are not, in general, members of the prime-order
/// subgroup. Masking one with a subgroup element does not hide it: multiplying the sum by the
/// group order removes the mask. Encrypt messages as bytes instead (see
/// [`elgamal`](crate::elgamal)).
pub trait MessageEncoding: Group {
    /// The maximum message length, in bytes.
    const MESSAGE_CAPACITY: usize;

    /// Encode `message` as a curve point.
    ///
    /// Fails if the message is longer than [`MessageEncoding::MESSAGE_CAPACITY`] or if no
    /// counter value yields a point.
    fn encode_to_point(message: &[u8]) -> Result<Self, Error>;

    /// Recover the message encoded by [`MessageEncoding::encode_to_point`].
    fn decode_from_point(&self) -> Result<Vec<u8>, Error>;
}

const COMPRESSION_FLAG: u8 = 0b1000_0000;
const INFINITY_FLAG: u8 = 0b0100_0000;
const SORT_FLAG: u8 = 0b0010_0000;

const LENGTH_INDEX: usize = 1;
const MESSAGE_START: usize = 2;
const COUNTER_START: usize = 46;

impl MessageEncoding for G1Projective {
    const MESSAGE_CAPACITY: usize = 32;

    /// The x-coordinate is laid out as `flags | length | message | padding | counter`, with the
    /// 16-bit counter incremented until the coordinate lies on the curve. The high byte of the
    /// coordinate is always zero, so every candidate is below the field modulus.
    fn encode_to_point(message: &[u8]) -> Result<Self, Error> {
        if message.len() > Self::MESSAGE_CAPACITY {
            return Err(Error::MessageTooLong {
                max: Self::MESSAGE_CAPACITY,
                got: message.len(),
            });
        }

        let mut x = [0; 48];
        x[0] = COMPRESSION_FLAG;
        x[LENGTH_INDEX] = message.len() as u8;
        x[MESSAGE_START..MESSAGE_START + message.len()].copy_from_slice(message);

        for counter in 0..=u16::MAX {
            x[COUNTER_START..].copy_from_slice(&counter.to_be_bytes());
            let maybe_point: Option<G1Affine> = G1Affine::from_compressed_unchecked(&x).into();
            if let Some(point) = maybe_point {
                return Ok(point.into());
            }
        }
        Err(Error::EncodingExhausted)
    }

    fn decode_from_point(&self) -> Result<Vec<u8>, Error> {
        let x = G1Affine::from(self).to_compressed();
        if x[0] & INFINITY_FLAG != 0 || x[0] & !(COMPRESSION_FLAG | SORT_FLAG) != 0 {
            return Err(Error::InvalidEncoding("message point"));
        }
        let length = x[LENGTH_INDEX] as usize;
        if length > Self::MESSAGE_CAPACITY {
            return Err(Error::InvalidEncoding("message point"));
        }
        Ok(x[MESSAGE_START..MESSAGE_START + length].to_vec())
    }
}
