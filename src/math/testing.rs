//! Deterministic series for unit tests

/// Pseudo-noise in [-0.5, 0.5) from a 64-bit LCG
pub(crate) fn noise(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as f64) / ((1u64 << 31) as f64) - 0.5
        })
        .collect()
}

/// Cumulative sum of [`noise`] starting at `start`
pub(crate) fn random_walk(n: usize, seed: u64, start: f64) -> Vec<f64> {
    let mut level = start;
    noise(n, seed)
        .into_iter()
        .map(|e| {
            level += e;
            level
        })
        .collect()
}
