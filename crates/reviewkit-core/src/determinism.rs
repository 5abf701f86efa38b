//! Deterministic pseudo-randomness for display purposes.
//!
//! Anything that should look shuffled but must not flicker between renders
//! derives a seed from a stable string and drives a small LCG with it. The
//! same seed always yields the same sequence, on any platform.

/// Polynomial rolling hash (djb2) of a seed string.
pub fn seed_from_str(input: &str) -> u32 {
    let mut h = 5381u32;
    for b in input.bytes() {
        h = h.wrapping_mul(33).wrapping_add(b as u32);
    }
    h
}

/// Linear congruential generator. Not remotely cryptographic; cheap,
/// portable and reproducible, which is all display shuffling needs.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345);
        self.state
    }

    /// Uniform-ish float in [0, 1].
    pub fn next_f32(&mut self) -> f32 {
        self.next_u32() as f32 / u32::MAX as f32
    }

    /// Index below `bound`; 0 when `bound` is 0.
    pub fn next_range(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        (self.next_u32() as usize) % bound
    }

    /// In-place Fisher-Yates driven by this generator.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        if items.len() < 2 {
            return;
        }
        for i in (1..items.len()).rev() {
            let j = self.next_range(i + 1);
            items.swap(i, j);
        }
    }
}
