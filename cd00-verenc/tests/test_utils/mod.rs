use rand::SeedableRng;

// Seeded rng for replicable tests.
pub fn seeded_rng() -> impl cd00_verenc::Rng {
    const TEST_RNG_SEED: [u8; 32] = *b"NEVER USE THIS FOR ANYTHING REAL";
    rand::rngs::StdRng::from_seed(TEST_RNG_SEED)
}

/// A randomness source that is always exhausted.
#[derive(Debug, Clone, Copy)]
pub struct ExhaustedRng;

impl rand::RngCore for ExhaustedRng {
    fn next_u32(&mut self) -> u32 {
        panic!("exhausted randomness source was read infallibly")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("exhausted randomness source was read infallibly")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("exhausted randomness source was read infallibly")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::from(
            std::num::NonZeroU32::new(rand::Error::CUSTOM_START).unwrap(),
        ))
    }
}

impl rand::CryptoRng for ExhaustedRng {}
