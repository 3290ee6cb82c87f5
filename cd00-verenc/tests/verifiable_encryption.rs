mod test_utils;

use bls12_381::{G1Projective, Scalar};
use cd00_verenc::{
    decrypter::Decrypter,
    prover::{Commitment, Response},
    Challenge, DecryptionError, ElGamalDecrypter, ElGamalProver, ElGamalVerifier, Error,
    Parameters, Rng, VerifiableCiphertext, VerificationError,
};
use group::Group;
use sigma_crypto::{
    commitment::HashCommitment,
    dlog::BinaryDlog,
    elgamal::{KeyPair, PublicKey},
    prime_group::random_scalar,
    sigma::Encoder,
};
use test_utils::{seeded_rng, ExhaustedRng};

type Protocol = BinaryDlog<G1Projective>;

struct Parties {
    prover: ElGamalProver,
    verifier: ElGamalVerifier,
    decrypter: ElGamalDecrypter,
}

fn parties(rng: &mut impl Rng, parameters: Parameters) -> Parties {
    let keys = KeyPair::new(rng).unwrap();
    let public_key = *keys.public_key();
    Parties {
        prover: ElGamalProver::new(parameters, Protocol::new(), public_key, HashCommitment),
        verifier: ElGamalVerifier::new(parameters, Protocol::new(), public_key, HashCommitment),
        decrypter: ElGamalDecrypter::new(Protocol::new(), *keys.secret_key()),
    }
}

fn statement(rng: &mut impl Rng) -> (G1Projective, Scalar) {
    let witness = random_scalar(rng).unwrap();
    (G1Projective::generator() * witness, witness)
}

/// Run commit, challenge, respond and verify honestly.
fn prove(
    rng: &mut impl Rng,
    parties: &Parties,
    word: &G1Projective,
    witness: &Scalar,
) -> Result<VerifiableCiphertext<Protocol>, Error> {
    let (commitment, decommitment) = parties.prover.commit(rng, word, witness)?;
    let challenge = parties.verifier.challenge(rng, &commitment)?;
    let response = parties.prover.respond(decommitment, &challenge)?;
    parties
        .verifier
        .verify(word, &commitment, &challenge, response)
}

#[test]
fn witness_is_recovered() {
    let mut rng = seeded_rng();
    let parties = parties(&mut rng, Parameters::new(8, 3).unwrap());
    let (word, witness) = statement(&mut rng);

    let ciphertext = prove(&mut rng, &parties, &word, &witness).unwrap();
    assert_eq!(ciphertext.entries().len(), 3);

    let recovered = parties.decrypter.decrypt(&ciphertext, &word).unwrap();
    let protocol = Protocol::new();
    assert_eq!(
        protocol.encode_witness(&recovered),
        protocol.encode_witness(&witness),
        "recovered witness differs from the original"
    );
}

#[test]
fn witness_is_recovered_for_various_parameters() {
    for &(repetitions, opened) in [(1, 1), (4, 1), (5, 5), (16, 4)].iter() {
        let mut rng = seeded_rng();
        let parties = parties(&mut rng, Parameters::new(repetitions, opened).unwrap());
        let (word, witness) = statement(&mut rng);

        let ciphertext = prove(&mut rng, &parties, &word, &witness).unwrap();
        assert_eq!(ciphertext.entries().len(), opened);
        assert_eq!(
            parties.decrypter.decrypt(&ciphertext, &word).unwrap(),
            witness,
            "failed with {} of {} repetitions opened",
            opened,
            repetitions
        );
    }
}

#[test]
fn portable_ciphertext_decrypts() {
    let mut rng = seeded_rng();
    let parties = parties(&mut rng, Parameters::new(8, 3).unwrap());
    let (word, witness) = statement(&mut rng);
    let ciphertext = prove(&mut rng, &parties, &word, &witness).unwrap();

    let bytes = bincode::serialize(&ciphertext).unwrap();
    let decoded: VerifiableCiphertext<Protocol> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(bincode::serialize(&decoded).unwrap(), bytes);
    assert_eq!(parties.decrypter.decrypt(&decoded, &word).unwrap(), witness);

    assert!(bincode::deserialize::<VerifiableCiphertext<Protocol>>(&bytes[1..]).is_err());
}

#[test]
fn messages_cross_the_wire() {
    let mut rng = seeded_rng();
    let parties = parties(&mut rng, Parameters::new(8, 3).unwrap());
    let (word, witness) = statement(&mut rng);

    let (commitment, decommitment) = parties.prover.commit(&mut rng, &word, &witness).unwrap();
    let commitment: Commitment<HashCommitment> =
        bincode::deserialize(&bincode::serialize(&commitment).unwrap()).unwrap();

    let challenge = parties.verifier.challenge(&mut rng, &commitment).unwrap();
    let challenge: Challenge =
        bincode::deserialize(&bincode::serialize(&challenge).unwrap()).unwrap();

    let response = parties.prover.respond(decommitment, &challenge).unwrap();
    let bytes = bincode::serialize(&response).unwrap();
    let response: Response<Protocol, PublicKey, HashCommitment> =
        bincode::deserialize(&bytes).unwrap();
    assert_eq!(bincode::serialize(&response).unwrap(), bytes);

    let ciphertext = parties
        .verifier
        .verify(&word, &commitment, &challenge, response)
        .unwrap();
    assert_eq!(parties.decrypter.decrypt(&ciphertext, &word).unwrap(), witness);

    // The first response scalar follows the 8-byte length prefix; make it non-canonical.
    let mut corrupted = bytes;
    corrupted[8..40].iter_mut().for_each(|byte| *byte = 0xff);
    assert!(
        bincode::deserialize::<Response<Protocol, PublicKey, HashCommitment>>(&corrupted).is_err()
    );
}

#[test]
fn response_to_another_commitment_is_rejected() {
    let mut rng = seeded_rng();
    let parties = parties(&mut rng, Parameters::new(8, 3).unwrap());
    let (word, witness) = statement(&mut rng);

    let (commitment, _) = parties.prover.commit(&mut rng, &word, &witness).unwrap();
    let (_, other_decommitment) = parties.prover.commit(&mut rng, &word, &witness).unwrap();
    let challenge = parties.verifier.challenge(&mut rng, &commitment).unwrap();
    let response = parties
        .prover
        .respond(other_decommitment, &challenge)
        .unwrap();

    assert!(matches!(
        parties
            .verifier
            .verify(&word, &commitment, &challenge, response),
        Err(Error::Verify(VerificationError::CommitmentMismatch))
    ));
}

#[test]
fn wrong_witness_fails_at_first_opened_index() {
    let mut rng = seeded_rng();
    let parties = parties(&mut rng, Parameters::new(8, 3).unwrap());
    let (word, _) = statement(&mut rng);
    let wrong_witness = random_scalar(&mut rng).unwrap();

    let (commitment, decommitment) = parties
        .prover
        .commit(&mut rng, &word, &wrong_witness)
        .unwrap();
    let challenge = parties.verifier.challenge(&mut rng, &commitment).unwrap();
    let first_opened = challenge.indices()[0];
    let response = parties.prover.respond(decommitment, &challenge).unwrap();

    match parties
        .verifier
        .verify(&word, &commitment, &challenge, response)
    {
        Err(Error::Verify(VerificationError::InvalidSigmaProof { index })) => {
            assert_eq!(index, first_opened)
        }
        other => panic!("expected an invalid sigma proof, got {:?}", other),
    }
}

#[test]
fn mismatched_word_yields_no_witness() {
    let mut rng = seeded_rng();
    let parties = parties(&mut rng, Parameters::new(8, 3).unwrap());
    let (word, witness) = statement(&mut rng);
    let (other_word, _) = statement(&mut rng);
    let ciphertext = prove(&mut rng, &parties, &word, &witness).unwrap();

    assert!(matches!(
        parties.decrypter.decrypt(&ciphertext, &other_word),
        Err(Error::Decrypt(DecryptionError::NoValidEntry { entries: 3 }))
    ));
}

#[test]
fn other_key_yields_no_witness() {
    let mut rng = seeded_rng();
    let parties = parties(&mut rng, Parameters::new(6, 2).unwrap());
    let (word, witness) = statement(&mut rng);
    let ciphertext = prove(&mut rng, &parties, &word, &witness).unwrap();

    let other_keys = KeyPair::new(&mut rng).unwrap();
    let decrypter = Decrypter::new(Protocol::new(), *other_keys.secret_key());
    assert!(matches!(
        decrypter.decrypt(&ciphertext, &word),
        Err(Error::Decrypt(DecryptionError::NoValidEntry { entries: 2 }))
    ));
}

#[test]
fn empty_ciphertext_is_rejected() {
    let mut rng = seeded_rng();
    let parties = parties(&mut rng, Parameters::new(8, 3).unwrap());
    let (word, _) = statement(&mut rng);
    let empty: VerifiableCiphertext<Protocol> = bincode::deserialize(&[0; 8]).unwrap();

    assert!(matches!(
        parties.decrypter.decrypt(&empty, &word),
        Err(Error::Decrypt(DecryptionError::EmptyCiphertext))
    ));
}

#[test]
fn challenge_from_elsewhere_is_validated() {
    let mut rng = seeded_rng();
    let parties = parties(&mut rng, Parameters::new(8, 3).unwrap());
    let (word, witness) = statement(&mut rng);

    let (commitment, decommitment) = parties.prover.commit(&mut rng, &word, &witness).unwrap();
    let challenge = Challenge::from_indices(vec![7, 0, 4]);
    let response = parties.prover.respond(decommitment, &challenge).unwrap();
    let ciphertext = parties
        .verifier
        .verify(&word, &commitment, &challenge, response)
        .unwrap();
    assert_eq!(parties.decrypter.decrypt(&ciphertext, &word).unwrap(), witness);
}

#[test]
fn exhausted_randomness_is_reported() {
    let mut rng = seeded_rng();
    let parties = parties(&mut rng, Parameters::new(8, 3).unwrap());
    let (word, witness) = statement(&mut rng);

    assert!(matches!(
        parties.prover.commit(&mut ExhaustedRng, &word, &witness),
        Err(Error::Commit(sigma_crypto::Error::Entropy(_)))
    ));

    let (commitment, _): (Commitment<HashCommitment>, _) =
        parties.prover.commit(&mut rng, &word, &witness).unwrap();
    assert!(matches!(
        parties.verifier.challenge(&mut ExhaustedRng, &commitment),
        Err(Error::Challenge(sigma_crypto::Error::Entropy(_)))
    ));
}
