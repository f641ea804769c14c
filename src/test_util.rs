use crate::sequence::DnaSequence;

/// Deterministic pseudo-random ACGT sequence for tests (no RNG dependency).
pub fn test_sequence(length: usize, seed: u64) -> DnaSequence {
    const BASES: [char; 4] = ['A', 'C', 'G', 'T'];
    let mut state = seed.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
    let mut text = String::with_capacity(length);
    for _ in 0..length {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        text.push(BASES[((state >> 33) & 3) as usize]);
    }
    DnaSequence::new(text).unwrap()
}
