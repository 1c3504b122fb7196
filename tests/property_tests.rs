use crypto_handles::{CipherAlgorithm, CipherHandle, Direction};

use proptest::prelude::*;

// Strategy for picking a cipher this build supports
fn algorithms() -> impl Strategy<Value = CipherAlgorithm> {
    let available: Vec<_> = CipherAlgorithm::ALL
        .into_iter()
        .filter(|a| a.is_available())
        .collect();
    prop::sample::select(available)
}

// Strategy for generating data buffers
fn data() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..1000)
}

fn key_material(algorithm: CipherAlgorithm, seed: u8) -> (Vec<u8>, Vec<u8>) {
    let key = (0..algorithm.key_length()).map(|i| seed.wrapping_add(i as u8)).collect();
    let iv = (0..algorithm.iv_length()).map(|i| seed ^ (i as u8)).collect();
    (key, iv)
}

proptest! {
    #[test]
    fn test_decrypt_inverts_encrypt(algorithm in algorithms(), seed in any::<u8>(), plaintext in data()) {
        let (key, iv) = key_material(algorithm, seed);

        let mut encryptor = CipherHandle::create_init(algorithm, &key, &iv, Direction::Encrypt).unwrap();
        let ciphertext = encryptor.encrypt(&plaintext).unwrap();
        prop_assert_eq!(ciphertext.len(), plaintext.len());

        let mut decryptor = CipherHandle::create_init(algorithm, &key, &iv, Direction::Decrypt).unwrap();
        prop_assert_eq!(decryptor.decrypt(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_split_point_does_not_change_output(
        algorithm in algorithms(),
        seed in any::<u8>(),
        plaintext in data(),
        split in any::<prop::sample::Index>(),
    ) {
        let (key, iv) = key_material(algorithm, seed);
        let at = split.index(plaintext.len() + 1);

        let mut whole = CipherHandle::create_init(algorithm, &key, &iv, Direction::Encrypt).unwrap();
        let expected = whole.encrypt(&plaintext).unwrap();

        let mut parts = CipherHandle::create_init(algorithm, &key, &iv, Direction::Encrypt).unwrap();
        let mut output = parts.encrypt(&plaintext[..at]).unwrap();
        output.extend(parts.encrypt(&plaintext[at..]).unwrap());

        prop_assert_eq!(output, expected);
    }
}
