//! Serde support for the `bls12_381` values carried in protocol messages.
//!
//! `bls12_381` provides no `Serialize` or `Deserialize` implementations. [`SerializeElement`]
//! stands in for them: it has the shape of a serde "with" module, so a field of an element type
//! is annotated `#[serde(with = "SerializeElement")]`. Points use the compressed encoding and
//! scalars the canonical little-endian encoding. Deserialization rejects non-canonical scalars
//! and points outside the prime-order subgroup.
//!
//! Sequences and optional values of elements are covered too, which is what the per-repetition
//! lists of the cut-and-choose protocols need.

use crate::{
    common::*,
    prime_group::{decode_scalar, encode_scalar, SCALAR_LENGTH},
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize)]
#[serde(transparent)]
struct SerWrapper<'a, G: SerializeElement>(
    #[serde(serialize_with = "<G as SerializeElement>::serialize")] &'a G,
);

#[derive(Deserialize)]
#[serde(transparent)]
struct DeWrapper<G: SerializeElement>(#[serde(with = "SerializeElement")] G);

/// Serde proxy for group elements, scalars and containers of them.
pub trait SerializeElement: Sized {
    /// Serialize `this`.
    fn serialize<S>(this: &Self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer;

    /// Deserialize a value, rejecting non-canonical encodings.
    fn deserialize<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>;
}

impl SerializeElement for G1Projective {
    fn serialize<S>(this: &Self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde_big_array::BigArray::serialize(&G1Affine::from(this).to_compressed(), serializer)
    }

    fn deserialize<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let point: Option<G1Affine> =
            G1Affine::from_compressed(&serde_big_array::BigArray::deserialize(deserializer)?)
                .into();
        point
            .map(Into::into)
            .ok_or_else(|| de::Error::custom("invalid G1 encoding"))
    }
}

impl SerializeElement for G2Projective {
    fn serialize<S>(this: &Self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde_big_array::BigArray::serialize(&G2Affine::from(this).to_compressed(), serializer)
    }

    fn deserialize<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let point: Option<G2Affine> =
            G2Affine::from_compressed(&serde_big_array::BigArray::deserialize(deserializer)?)
                .into();
        point
            .map(Into::into)
            .ok_or_else(|| de::Error::custom("invalid G2 encoding"))
    }
}

impl SerializeElement for Scalar {
    fn serialize<S>(this: &Self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        encode_scalar(this).serialize(serializer)
    }

    fn deserialize<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = <[u8; SCALAR_LENGTH]>::deserialize(deserializer)?;
        decode_scalar(&bytes).map_err(de::Error::custom)
    }
}

impl<G: SerializeElement> SerializeElement for Vec<G> {
    fn serialize<S>(this: &Self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(this.iter().map(SerWrapper))
    }

    fn deserialize<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wrapped = Vec::<DeWrapper<G>>::deserialize(deserializer)?;
        Ok(wrapped.into_iter().map(|DeWrapper(element)| element).collect())
    }
}

impl<G: SerializeElement> SerializeElement for Option<G> {
    fn serialize<S>(this: &Self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        this.as_ref().map(SerWrapper).serialize(serializer)
    }

    fn deserialize<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wrapped = Option::<DeWrapper<G>>::deserialize(deserializer)?;
        Ok(wrapped.map(|DeWrapper(element)| element))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{prime_group::random_scalar, test::rng};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Elements {
        #[serde(with = "SerializeElement")]
        scalar: Scalar,
        #[serde(with = "SerializeElement")]
        points: Vec<G1Projective>,
        #[serde(with = "SerializeElement")]
        g2: G2Projective,
        #[serde(with = "SerializeElement")]
        holes: Vec<Option<Scalar>>,
    }

    #[test]
    fn elements_round_trip_through_bincode() {
        let mut rng = rng();
        let elements = Elements {
            scalar: random_scalar(&mut rng).unwrap(),
            points: (0..3).map(|_| G1Projective::random(&mut rng)).collect(),
            g2: G2Projective::random(&mut rng),
            holes: vec![Some(random_scalar(&mut rng).unwrap()), None],
        };
        let bytes = bincode::serialize(&elements).unwrap();
        let decoded: Elements = bincode::deserialize(&bytes).unwrap();
        assert_eq!(elements, decoded);
    }

    #[test]
    fn non_canonical_scalar_is_rejected() {
        #[derive(Debug, Deserialize)]
        struct JustScalar(#[serde(with = "SerializeElement")] Scalar);

        let bytes = bincode::serialize(&[0xffu8; 32]).unwrap();
        assert!(bincode::deserialize::<JustScalar>(&bytes).is_err());
    }

    #[test]
    fn invalid_point_is_rejected() {
        #[derive(Debug, Deserialize)]
        struct JustPoint(#[serde(with = "SerializeElement")] G1Projective);

        #[derive(Serialize)]
        struct Raw(#[serde(with = "serde_big_array::BigArray")] [u8; 48]);

        let bytes = bincode::serialize(&Raw([0xff; 48])).unwrap();
        assert!(bincode::deserialize::<JustPoint>(&bytes).is_err());
    }
}
