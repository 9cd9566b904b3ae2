//! Deterministic seeding: string hash and stateless pseudo-random generator.
//!
//! Both functions are pure: the same input yields the same output on every
//! call, and no generator state advances between calls. The embedding builder
//! seeds each component independently as `pseudo_random(seed + i)`.
//!
//! # Invariants
//! - `string_hash` is non-negative and stable for identical text.
//! - `pseudo_random` returns values in [0.0, 1.0).

/// 31-multiplier rolling hash over UTF-16 code units.
///
/// Accumulates `hash = (hash << 5) - hash + unit` with 32-bit signed
/// wraparound at every step and returns the absolute value of the final
/// accumulator. `i32::MIN` maps to `2^31`, which is why the result is `u32`.
///
/// ```
/// use attention_lens::seed::string_hash;
/// assert_eq!(string_hash("a"), 97);
/// assert_eq!(string_hash("hello"), 99_162_322);
/// ```
pub fn string_hash(text: &str) -> u32 {
    let mut h: i32 = 0;
    for unit in text.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(unit as i32);
    }
    h.unsigned_abs()
}

/// Stateless sine-based generator: `frac(sin(seed) × 10000)`.
///
/// Smooth in `seed`, so neighbouring seeds are correlated at small scale but the
/// ×10000 stretch makes the fractional part look uniform enough for toy vectors.
pub fn pseudo_random(seed: f64) -> f64 {
    let x = seed.sin() * 10_000.0;
    x - x.floor()
}
