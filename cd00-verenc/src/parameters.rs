//! Configuration of the cut-and-choose protocol.

use crate::ParameterError;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// The number of repetitions `k` and the number of opened repetitions `u`.
///
/// A cheating prover is caught unless it guesses the opened subset exactly, so its success
/// probability is at most `1 / C(k, u)`. Opening every repetition leaves nothing to check by
/// re-encryption and gives no soundness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedParameters")]
pub struct Parameters {
    repetitions: usize,
    opened: usize,
}

#[derive(Debug, Deserialize)]
struct UncheckedParameters {
    repetitions: usize,
    opened: usize,
}

impl TryFrom<UncheckedParameters> for Parameters {
    type Error = ParameterError;

    fn try_from(unchecked: UncheckedParameters) -> Result<Self, Self::Error> {
        Self::new(unchecked.repetitions, unchecked.opened)
    }
}

impl Parameters {
    /// Construct parameters for `repetitions` repetitions, `opened` of which are opened.
    pub fn new(repetitions: usize, opened: usize) -> Result<Self, ParameterError> {
        if repetitions == 0 {
            Err(ParameterError::ZeroRepetitions)
        } else if opened == 0 {
            Err(ParameterError::NothingOpened)
        } else if opened > repetitions {
            Err(ParameterError::OpenedExceedsRepetitions {
                opened,
                repetitions,
            })
        } else {
            Ok(Self {
                repetitions,
                opened,
            })
        }
    }

    /// The number of repetitions `k`.
    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// The number of opened repetitions `u`.
    pub fn opened(&self) -> usize {
        self.opened
    }

    /// The number of closed repetitions, `k - u`.
    pub fn closed(&self) -> usize {
        self.repetitions - self.opened
    }

    /// An upper bound on the probability that a cheating prover is not caught, `1 / C(k, u)`.
    pub fn cheating_probability(&self) -> f64 {
        // C(k, u) = prod_{i < u} (k - i) / (i + 1), accumulated in floating point.
        let subsets = (0..self.opened).fold(1.0, |acc, i| {
            acc * (self.repetitions - i) as f64 / (i + 1) as f64
        });
        1.0 / subsets
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn valid_parameters_are_accepted() {
        let parameters = Parameters::new(8, 3).unwrap();
        assert_eq!(parameters.repetitions(), 8);
        assert_eq!(parameters.opened(), 3);
        assert_eq!(parameters.closed(), 5);
        assert!(Parameters::new(1, 1).is_ok());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert_eq!(Parameters::new(0, 0), Err(ParameterError::ZeroRepetitions));
        assert_eq!(Parameters::new(4, 0), Err(ParameterError::NothingOpened));
        assert_eq!(
            Parameters::new(3, 4),
            Err(ParameterError::OpenedExceedsRepetitions {
                opened: 4,
                repetitions: 3
            })
        );
    }

    #[test]
    fn cheating_probability_counts_subsets() {
        let parameters = Parameters::new(8, 3).unwrap();
        assert!((parameters.cheating_probability() - 1.0 / 56.0).abs() < 1e-12);
        let parameters = Parameters::new(4, 4).unwrap();
        assert!((parameters.cheating_probability() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn deserialization_validates() {
        let parameters = Parameters::new(16, 4).unwrap();
        let bytes = bincode::serialize(&parameters).unwrap();
        let decoded: Parameters = bincode::deserialize(&bytes).unwrap();
        assert_eq!(parameters, decoded);

        let bytes = bincode::serialize(&(2usize, 5usize)).unwrap();
        assert!(bincode::deserialize::<Parameters>(&bytes).is_err());
    }
}
