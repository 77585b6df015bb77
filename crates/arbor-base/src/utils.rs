//! Utility functions and helpers.

/// Fast xorshift PRNG for non-cryptographic randomness.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a new PRNG with the given seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: if seed == 0 { 1 } else { seed } }
    }

    /// Generates the next random u64.
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generates a random f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generates a random index in `0..bound`. `bound` must be non-zero.
    pub fn next_below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }

    /// Generates a random integer in the inclusive range `[low, high]`.
    pub fn next_in_range(&mut self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        low + self.next() % (high - low + 1)
    }
}

/// Distance from `x` to the nearest integer.
#[must_use]
pub fn fractionality(x: f64) -> f64 {
    (x - x.round()).abs()
}

/// Whether `x` is integral within `tolerance`.
#[must_use]
pub fn is_integral(x: f64, tolerance: f64) -> bool {
    fractionality(x) <= tolerance
}
