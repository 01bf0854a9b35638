//! Deterministic random draws for restock selection.
//!
//! Every restock pick is derived from a seed, so a session replayed with the
//! same session seed picks the same items in the same order.

/// Seeded random source.
///
/// Implementations must be deterministic: the same seed always yields the
/// same value.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn index(&self, seed: u64, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        // Multiply-shift maps the 32-bit draw onto the range without the
        // modulo skew towards low indices.
        let len = len.min(u32::MAX as usize) as u64;
        ((self.next_u32(seed) as u64 * len) >> 32) as usize
    }
}

/// PCG-XSH-RR generator: one LCG step followed by an xorshift and a
/// state-dependent rotation.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Mixes the inputs of one draw into a seed.
///
/// * `session_seed` - fixed for a whole run
/// * `draw` - how many picks this container has made so far
/// * `container` - distinguishes dispensers sharing a session seed
/// * `context` - separates independent draws made for the same pick
pub fn compute_seed(session_seed: u64, draw: u64, container: u32, context: u32) -> u64 {
    let mut hash = session_seed;
    hash ^= draw.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (container as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // SplitMix-style finalizer
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
