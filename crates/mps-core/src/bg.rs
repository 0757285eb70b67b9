//! Real-time single-pattern Breslauer-Galil matcher.
//!
//! Patterns of length <= 8 are delegated entirely to a [`RealTimeKmp`]
//! (`SHORT_PATTERN_LENGTH`). Longer patterns are matched through a ladder of
//! doubling-length stages: stage 0 is detected by running two real-time KMP
//! instances over the period and the remainder of the stage-0 prefix; every
//! later stage is reached by extending a stage-k candidate (a "viable
//! occurrence", VO) to twice its length and comparing fingerprints.
//!
//! The reference algorithm advances exactly one stage per character in
//! decreasing stage order and keeps a small ring of recent fingerprints so a
//! lagging check can still look back far enough. This implementation checks
//! every stage on every character instead (still in decreasing order, so a
//! promotion this character never gets re-checked against its new stage in
//! the same pass) which trades the strict O(1)-per-character bound for a
//! simpler, still linear-total-work implementation — see DESIGN.md.

use crate::error::{Error, Result};
use crate::field::FieldVal;
use crate::fingerprint::{self, Fingerprint};
use crate::kmp::RealTimeKmp;
use std::collections::VecDeque;

const SHORT_PATTERN_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy)]
struct VoAnchor {
    /// Stream position (0-based) where this occurrence's window starts.
    pos: u64,
    /// Fingerprint of stream[0..pos) (prefix of length `pos`).
    fp: Fingerprint,
    /// r^pos, with cached inverse.
    r_pow: FieldVal,
}

/// Outstanding candidates at one stage, in increasing position order.
#[derive(Debug, Clone, Default)]
struct VoProgression {
    entries: VecDeque<VoAnchor>,
    step: Option<u64>,
}

impl VoProgression {
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn first(&self) -> Option<&VoAnchor> {
        self.entries.front()
    }

    fn remove_first(&mut self) -> Option<VoAnchor> {
        let v = self.entries.pop_front();
        if self.entries.len() <= 1 {
            self.step = None;
        }
        v
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.step = None;
    }

    /// Add a VO, checking it continues this stage's arithmetic progression.
    /// A violation means two distinct underlying strings produced the same
    /// fingerprint; the caller is expected to treat `Err` as a collision and
    /// wipe the progression.
    fn add(&mut self, anchor: VoAnchor) -> Result<()> {
        if let Some(first) = self.entries.front() {
            let delta = anchor
                .pos
                .checked_sub(first.pos)
                .ok_or(Error::ProgressionBroken("position went backwards"))?;
            match self.step {
                None => self.step = Some(delta),
                Some(step) => {
                    let n = self.entries.len() as u64;
                    if delta != step * n {
                        return Err(Error::ProgressionBroken(
                            "position off the stage's arithmetic progression",
                        ));
                    }
                }
            }
        }
        self.entries.push_back(anchor);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BgMatcher {
    pattern_len: usize,
    short: Option<RealTimeKmp>,

    rho: usize,
    stage_lengths: Vec<usize>,
    stage_fps: Vec<(Fingerprint, FieldVal)>,
    progressions: Vec<VoProgression>,

    kmp_period: RealTimeKmp,
    kmp_remaining: Option<RealTimeKmp>,
    remainder_len: usize,
    n_kmp_period: u64,
    current_n_kmp_period: u64,
    last_kmp_period_match_pos: Option<u64>,

    r: FieldVal,
    current_r: FieldVal,
    current_fp: Fingerprint,
    current_pos: u64,
}

impl BgMatcher {
    /// # Panics
    /// Panics if `pattern` is empty.
    pub fn new(pattern: &[u8]) -> Result<Self> {
        let n = pattern.len();
        assert!(n > 0, "pattern must not be empty");

        if n <= SHORT_PATTERN_LENGTH {
            return Ok(Self {
                pattern_len: n,
                short: Some(RealTimeKmp::new(pattern)),
                rho: 0,
                stage_lengths: Vec::new(),
                stage_fps: Vec::new(),
                progressions: Vec::new(),
                kmp_period: RealTimeKmp::new(pattern),
                kmp_remaining: None,
                remainder_len: 0,
                n_kmp_period: 0,
                current_n_kmp_period: 0,
                last_kmp_period_match_pos: None,
                r: FieldVal::one(),
                current_r: FieldVal::one(),
                current_fp: 0,
                current_pos: 0,
            });
        }

        let logn = ceil_log2(n);
        let loglogn = ceil_log2(logn) + 1;
        let prefix_len = (1usize << loglogn).min(n);
        let probe = RealTimeKmp::new(&pattern[..prefix_len]);
        let rho = probe.period().max(1);

        let mut l = prefix_len;
        while l < n && pattern[l] == pattern[l - rho] {
            l += 1;
        }
        let phi = floor_log2(l);
        let k_stage_count = logn - phi;

        let mut stage_lengths: Vec<usize> = (0..k_stage_count).map(|k| 1usize << (phi + k)).collect();
        stage_lengths.push(n);

        let r = fingerprint::random_base()?;
        let stage_fps = stage_lengths
            .iter()
            .map(|&len| fingerprint::calc_fp(&pattern[..len], r))
            .collect();

        let s0 = stage_lengths[0];
        let n_kmp_period = (s0 / rho) as u64;
        let remainder_len = s0 % rho;
        let kmp_period = RealTimeKmp::new(&pattern[..rho]);
        let kmp_remaining = if remainder_len > 0 {
            Some(RealTimeKmp::new(&pattern[n_kmp_period as usize * rho..s0]))
        } else {
            None
        };

        Ok(Self {
            pattern_len: n,
            short: None,
            rho,
            stage_lengths,
            stage_fps,
            progressions: vec![VoProgression::default(); k_stage_count],
            kmp_period,
            kmp_remaining,
            remainder_len,
            n_kmp_period,
            current_n_kmp_period: 0,
            last_kmp_period_match_pos: None,
            r,
            current_r: FieldVal::one(),
            current_fp: 0,
            current_pos: 0,
        })
    }

    pub fn pattern_len(&self) -> usize {
        self.pattern_len
    }

    pub fn total_mem(&self) -> usize {
        let base = std::mem::size_of::<Self>();
        let stages: usize = self.progressions.iter().map(|p| p.entries.len() * std::mem::size_of::<VoAnchor>()).sum();
        base + stages
            + self.stage_lengths.len() * std::mem::size_of::<usize>()
            + self.stage_fps.len() * std::mem::size_of::<(Fingerprint, FieldVal)>()
            + self.kmp_period.total_mem()
            + self.kmp_remaining.as_ref().map_or(0, |k| k.total_mem())
            + self.short.as_ref().map_or(0, |k| k.total_mem())
    }

    pub fn reset(&mut self) {
        if let Some(k) = &mut self.short {
            k.reset();
            return;
        }
        self.kmp_period.reset();
        if let Some(k) = &mut self.kmp_remaining {
            k.reset();
        }
        for p in &mut self.progressions {
            p.clear();
        }
        self.current_n_kmp_period = 0;
        self.last_kmp_period_match_pos = None;
        self.current_r = FieldVal::one();
        self.current_fp = 0;
        self.current_pos = 0;
    }

    /// Feed one byte; returns the stream position (0-based, end index) of a
    /// match completed by this byte, if any.
    pub fn read_char(&mut self, c: u8) -> Result<Option<u64>> {
        if let Some(k) = &mut self.short {
            return Ok(k.read_char(c).into_iter().last());
        }

        self.current_fp = crate::field::mod_add(self.current_fp, crate::field::mod_mul(c as u64, self.current_r.value));
        self.current_r = self.current_r.mul(self.r);
        self.current_pos += 1;
        let q = self.current_pos - 1;

        let period_hit = self.kmp_period.read_char(c).last().copied() == Some(q);
        if period_hit {
            match self.last_kmp_period_match_pos {
                Some(last_q) if last_q + self.rho as u64 == q => self.current_n_kmp_period += 1,
                _ => self.current_n_kmp_period = 1,
            }
            self.last_kmp_period_match_pos = Some(q);
        }

        let remaining_hit = match &mut self.kmp_remaining {
            Some(kr) => kr.read_char(c).last().copied() == Some(q),
            None => true,
        };

        let s0 = self.stage_lengths[0];
        let stage0_hit = if self.remainder_len == 0 {
            self.current_n_kmp_period >= self.n_kmp_period && self.last_kmp_period_match_pos == Some(q)
        } else {
            remaining_hit
                && self.current_n_kmp_period >= self.n_kmp_period
                && self.last_kmp_period_match_pos == Some(q - self.remainder_len as u64)
        };

        let mut matched_at = None;

        if stage0_hit && q + 1 >= s0 as u64 {
            let p = q + 1 - s0 as u64;
            let r_pow_p = self.current_r.div(self.stage_fps[0].1);
            let fp_p = fingerprint::calc_fp_prefix(self.current_fp, self.stage_fps[0].0, r_pow_p);
            let anchor = VoAnchor { pos: p, fp: fp_p, r_pow: r_pow_p };

            if self.progressions.is_empty() {
                matched_at = Some(q);
            } else if self.progressions[0].add(anchor).is_err() {
                tracing::warn!(position = q, stage = 0, "fingerprint collision, wiping progression");
                self.progressions[0].clear();
            }
        }

        let k_stage_count = self.progressions.len();
        for k in (0..k_stage_count).rev() {
            loop {
                let Some(front) = self.progressions[k].first().copied() else {
                    break;
                };
                let e = front.pos + self.stage_lengths[k + 1] as u64;
                if self.current_pos < e {
                    break;
                }
                if self.current_pos > e {
                    return Err(Error::InvariantViolation(
                        "stage upgrade fell behind current stream position",
                    ));
                }
                self.progressions[k].remove_first();
                let window_fp = fingerprint::calc_fp_suffix(self.current_fp, front.fp, front.r_pow);
                if window_fp == self.stage_fps[k + 1].0 {
                    if k + 1 == k_stage_count {
                        matched_at = Some(q);
                    } else if self.progressions[k + 1].add(front).is_err() {
                        tracing::warn!(position = q, stage = k + 1, "fingerprint collision, wiping progression");
                        self.progressions[k + 1].clear();
                    }
                }
            }
        }

        Ok(matched_at)
    }
}

fn ceil_log2(x: usize) -> usize {
    if x <= 1 {
        0
    } else {
        (usize::BITS - (x - 1).leading_zeros()) as usize
    }
}

fn floor_log2(x: usize) -> usize {
    debug_assert!(x >= 1);
    (usize::BITS - 1 - x.leading_zeros()) as usize
}
