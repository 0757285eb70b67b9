//! Karp-Rabin fingerprints over the field in [`crate::field`].
//!
//! fp(s) = sum_i s[i] * r^i (mod p), index 0 first. The three composition
//! laws in the module doc of `bg.rs` are built directly on top of this.

use crate::error::Result;
use crate::field::{mod_add, mod_mul, mod_sub, FieldVal};
use rand::Rng;

pub type Fingerprint = u64;

/// Picks a random base `r` in (1, p-1) and wraps it as a field element with
/// its cached inverse. Mirrors `tools/packet-match-fuzz`'s use of `rand` for
/// randomized matcher parameters.
pub fn random_base() -> Result<FieldVal> {
    let mut rng = rand::thread_rng();
    loop {
        let candidate = rng.gen_range(2..crate::field::MODULUS - 1);
        if let Ok(f) = FieldVal::new(candidate) {
            return Ok(f);
        }
    }
}

/// Fingerprint of `s` under base `r`, plus `r^|s|` (value + inverse) so
/// callers can extend or compose without recomputing powers from scratch.
pub fn calc_fp(s: &[u8], r: FieldVal) -> (Fingerprint, FieldVal) {
    let mut fp: Fingerprint = 0;
    let mut power = FieldVal::one();
    for &byte in s {
        fp = mod_add(fp, mod_mul(byte as u64, power.value));
        power = power.mul(r);
    }
    (fp, power)
}

/// Extend a known prefix fingerprint by `suffix`, given `r_to_prefix_len` =
/// r^|prefix|. Returns the fingerprint of `prefix ++ suffix` and
/// r^(|prefix|+|suffix|).
pub fn calc_fp_with_prefix(
    prefix_fp: Fingerprint,
    r_to_prefix_len: FieldVal,
    suffix: &[u8],
    r: FieldVal,
) -> (Fingerprint, FieldVal) {
    let (suffix_fp, r_to_suffix_len) = calc_fp(suffix, r);
    let combined = mod_add(prefix_fp, mod_mul(r_to_prefix_len.value, suffix_fp));
    (combined, r_to_prefix_len.mul(r_to_suffix_len))
}

/// fp(suffix) given fp(whole), fp(prefix) and r^|prefix|.
/// fp(suffix) = (fp(whole) - fp(prefix)) * r^{-|prefix|}
pub fn calc_fp_suffix(whole_fp: Fingerprint, prefix_fp: Fingerprint, r_to_prefix_len: FieldVal) -> Fingerprint {
    mod_mul(mod_sub(whole_fp, prefix_fp), r_to_prefix_len.inv)
}

/// fp(prefix) given fp(whole), fp(suffix) and r^|prefix|.
/// fp(prefix) = fp(whole) - r^|prefix| * fp(suffix)
pub fn calc_fp_prefix(whole_fp: Fingerprint, suffix_fp: Fingerprint, r_to_prefix_len: FieldVal) -> Fingerprint {
    mod_sub(whole_fp, mod_mul(r_to_prefix_len.value, suffix_fp))
}

/// fp(whole) given fp(prefix), r^|prefix| and fp(suffix).
pub fn calc_fp_from_prefix_suffix(
    prefix_fp: Fingerprint,
    r_to_prefix_len: FieldVal,
    suffix_fp: Fingerprint,
) -> Fingerprint {
    mod_add(prefix_fp, mod_mul(r_to_prefix_len.value, suffix_fp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_law_holds() {
        let r = FieldVal::new(131).unwrap();
        let s = b"the quick brown fox";
        for k in 0..=s.len() {
            let (prefix_fp, r_k) = calc_fp(&s[..k], r);
            let (whole_fp, _) = calc_fp(s, r);
            let suffix_fp = calc_fp_suffix(whole_fp, prefix_fp, r_k);
            let (expect_suffix_fp, _) = calc_fp(&s[k..], r);
            assert_eq!(suffix_fp, expect_suffix_fp, "split at {k}");
            assert_eq!(
                calc_fp_from_prefix_suffix(prefix_fp, r_k, suffix_fp),
                whole_fp
            );
            assert_eq!(calc_fp_prefix(whole_fp, suffix_fp, r_k), prefix_fp);
        }
    }

    #[test]
    fn with_prefix_matches_whole() {
        let r = FieldVal::new(997).unwrap();
        let (prefix_fp, r_k) = calc_fp(b"abc", r);
        let (combined, r_total) = calc_fp_with_prefix(prefix_fp, r_k, b"defgh", r);
        let (whole_fp, whole_r) = calc_fp(b"abcdefgh", r);
        assert_eq!(combined, whole_fp);
        assert_eq!(r_total.value, whole_r.value);
    }

    #[test]
    fn random_base_is_invertible() {
        let r = random_base().unwrap();
        assert_eq!(mod_mul(r.value, r.inv), 1);
    }
}
