// Tiny RNG (no external crate) for brush texture.
// Each engine owns its own generator, so two canvases never share state and a
// fixed seed replays the exact same pencil grain and watercolor blooms.

/// Deterministic xorshift32 RNG.
/// Visual: controls pencil grain and watercolor radius/opacity/colour jitter.
#[derive(Debug, Clone)]
pub struct Rng32 {
    state: u32,
}

impl Rng32 {
    pub const DEFAULT_SEED: u32 = 0xC0FFEE;

    pub fn from_seed(seed: u32) -> Self {
        Self { state: seed | 1 } // xorshift must never hold 0
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        // Xorshift—fast and good enough for visual noise
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform [0,1)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / ((1u32 << 24) as f32)
    }

    /// Uniform [min,max)
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Uniform integer in [0,n). `n` must be non-zero.
    #[inline]
    pub fn below(&mut self, n: u32) -> u32 {
        ((self.next_u32() as u64 * n as u64) >> 32) as u32
    }
}

impl Default for Rng32 {
    fn default() -> Self {
        Self::from_seed(Self::DEFAULT_SEED)
    }
}
