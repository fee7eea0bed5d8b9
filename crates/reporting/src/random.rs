//! Seeded linear-congruential stream backing the synthetic dataset.
//!
//! Reproducibility depends on the exact sequence of draws, not only on the
//! seed, so every consumer receives the stream by `&mut` and the draw order
//! is fixed by the caller (see `generator`).
//!
//! The step is evaluated in double precision, like the browser dashboard the
//! reference dataset came from. Once the product passes 2^53 its low bits are
//! rounded away before the state is masked, so exact integer arithmetic would
//! produce a different stream from the second draw on.

const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;
/// 2^31 - 1. Masks the state to 31 bits and scales draws into [0, 1].
const MODULUS_MASK: u64 = 0x7fff_ffff;
/// The product is reduced to 32 bits before masking.
const TWO_POW_32: f64 = 4_294_967_296.0;

#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u64,
    draws: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed,
            draws: 0,
        }
    }

    /// Advance the state: the multiply-add is rounded to f64, reduced mod 2^32,
    /// then masked to 31 bits.
    pub fn next_f64(&mut self) -> f64 {
        let product = self.state as f64 * MULTIPLIER as f64 + INCREMENT as f64;
        self.state = (product.rem_euclid(TWO_POW_32) as u64) & MODULUS_MASK;
        self.draws += 1;
        self.state as f64 / MODULUS_MASK as f64
    }

    /// `base + draw * spread`, evaluated in that order.
    pub fn scaled(&mut self, base: f64, spread: f64) -> f64 {
        base + self.next_f64() * spread
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}
