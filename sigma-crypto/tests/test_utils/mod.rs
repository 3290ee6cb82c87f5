use rand::SeedableRng;

// Seeded rng for replicable tests.
pub fn seeded_rng() -> impl sigma_crypto::Rng {
    const TEST_RNG_SEED: [u8; 32] = *b"NEVER USE THIS FOR ANYTHING REAL";
    rand::rngs::StdRng::from_seed(TEST_RNG_SEED)
}
