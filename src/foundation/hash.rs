/// FNV-1a 64 over `s`, seeded.
pub(crate) fn stable_hash64(seed: u64, s: &str) -> u64 {
    let mut h = 0xcbf2_9ce4_8422_2325u64 ^ seed;
    for &b in s.as_bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0000_0100_0000_01B3);
    }
    h
}

/// SplitMix64 finalizer.
pub(crate) fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic value in `[-1, 1)` derived from `(seed, key, salt)`.
pub(crate) fn unit_jitter(seed: u64, key: &str, salt: u64) -> f64 {
    let bits = mix64(stable_hash64(seed, key) ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    // 53 high bits -> [0, 1)
    let unit = (bits >> 11) as f64 / (1u64 << 53) as f64;
    unit * 2.0 - 1.0
}
