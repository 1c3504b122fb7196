use std::collections::HashSet;

use crypto_handles::{Result, digest, digest256, fast_random, strong_random};

#[test]
fn test_strong_random_does_not_repeat() -> Result<()> {
    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let sample = strong_random(16)?;
        assert_eq!(sample.len(), 16);
        assert!(seen.insert(sample), "16-byte sample repeated");
    }
    Ok(())
}

#[test]
fn test_fast_random_does_not_repeat() -> Result<()> {
    let mut seen = HashSet::new();
    for _ in 0..1000 {
        assert!(seen.insert(fast_random(16)?));
    }
    Ok(())
}

#[test]
fn test_digest_of_empty_input() {
    assert_eq!(
        digest(b""),
        [
            0xda, 0x39, 0xa3, 0xee, 0x5e, 0x6b, 0x4b, 0x0d, 0x32, 0x55,
            0xbf, 0xef, 0x95, 0x60, 0x18, 0x90, 0xaf, 0xd8, 0x07, 0x09,
        ]
    );
    assert_eq!(&digest256(b"")[..4], &[0xe3, 0xb0, 0xc4, 0x42]);
}
