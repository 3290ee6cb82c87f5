//! Uniform sampling of the repetitions a verifier opens.

use crate::{Error, ParameterError, RespondError, Rng};
use serde::{Deserialize, Serialize};

/// The verifier's challenge: the indices of the opened repetitions.
///
/// A challenge received from elsewhere is not trusted; the prover and verifier both check that it
/// is a set of in-range indices before acting on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge(Vec<usize>);

impl Challenge {
    /// Form a challenge that opens the given repetitions.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self(indices.into_iter().collect())
    }

    /// The opened repetition indices.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Whether repetition `index` is opened.
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Mark each of `repetitions` repetitions as opened or closed.
    pub(crate) fn membership(&self, repetitions: usize) -> Result<Vec<bool>, RespondError> {
        let mut opened = vec![false; repetitions];
        for &index in &self.0 {
            match opened.get_mut(index) {
                None => {
                    return Err(RespondError::IndexOutOfRange { index, repetitions });
                }
                Some(true) => return Err(RespondError::DuplicateIndex { index }),
                Some(slot) => *slot = true,
            }
        }
        Ok(opened)
    }
}

/// Sample `count` distinct indices from `0..size`, uniformly among all such subsets.
///
/// Runs the first `count` steps of a Fisher–Yates shuffle of `0..size`. The indices are returned in
/// ascending order.
pub fn random_subset(rng: &mut impl Rng, size: usize, count: usize) -> Result<Vec<usize>, Error> {
    if count > size {
        return Err(ParameterError::OpenedExceedsRepetitions {
            opened: count,
            repetitions: size,
        }
        .into());
    }

    let mut pool: Vec<usize> = (0..size).collect();
    for i in 0..count {
        let j = i + uniform_below(rng, size - i)
            .map_err(|err| Error::Challenge(err.into()))?;
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool.sort_unstable();
    Ok(pool)
}

/// Sample uniformly from `0..bound`, rejecting the values that would bias the reduction.
fn uniform_below(rng: &mut impl Rng, bound: usize) -> Result<usize, rand::Error> {
    debug_assert!(bound > 0);
    let bound = bound as u64;
    // 2^64 mod bound
    let excess = (u64::MAX % bound + 1) % bound;
    loop {
        let mut bytes = [0; 8];
        rng.try_fill_bytes(&mut bytes)?;
        let candidate = u64::from_le_bytes(bytes);
        if candidate <= u64::MAX - excess {
            return Ok((candidate % bound) as usize);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::rng;
    use std::collections::HashMap;

    #[test]
    fn subsets_have_distinct_in_range_indices() {
        let mut rng = rng();
        for &(size, count) in [(1, 1), (8, 3), (16, 16), (40, 10)].iter() {
            let subset = random_subset(&mut rng, size, count).unwrap();
            assert_eq!(subset.len(), count);
            assert!(subset.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(subset.iter().all(|&index| index < size));
        }
    }

    #[test]
    fn oversized_subsets_are_rejected() {
        let mut rng = rng();
        assert!(matches!(
            random_subset(&mut rng, 3, 4),
            Err(Error::Parameters(ParameterError::OpenedExceedsRepetitions {
                opened: 4,
                repetitions: 3
            }))
        ));
    }

    #[test]
    fn subsets_are_uniform() {
        let mut rng = rng();
        let (size, count, samples) = (5, 2, 10_000);
        let mut counts = HashMap::new();
        for _ in 0..samples {
            let subset = random_subset(&mut rng, size, count).unwrap();
            *counts.entry(subset).or_insert(0usize) += 1;
        }

        // C(5, 2) = 10 subsets, 9 degrees of freedom.
        assert_eq!(counts.len(), 10);
        let expected = samples as f64 / 10.0;
        let chi_squared: f64 = counts
            .values()
            .map(|&observed| (observed as f64 - expected).powi(2) / expected)
            .sum();
        // Critical value for p = 0.001.
        assert!(
            chi_squared < 27.88,
            "subset distribution is skewed: chi-squared = {}",
            chi_squared
        );
    }

    #[test]
    fn membership_checks_indices() {
        let challenge = Challenge::from_indices(vec![0, 3]);
        assert_eq!(
            challenge.membership(4).unwrap(),
            vec![true, false, false, true]
        );
        assert!(challenge.contains(3));
        assert!(!challenge.contains(1));
        assert_eq!(
            challenge.membership(3),
            Err(RespondError::IndexOutOfRange {
                index: 3,
                repetitions: 3
            })
        );
        assert_eq!(
            Challenge::from_indices(vec![1, 1]).membership(4),
            Err(RespondError::DuplicateIndex { index: 1 })
        );
    }
}
