//! Measurement driver: feeds stream files through an engine under test and
//! an Aho-Corasick oracle in lock step, classifying every position and
//! accumulating hardware counters around the engine's own work.
//!
//! Streams are read in fixed-size chunks rather than all at once, so that
//! paging the stream file in doesn't get counted as part of the matching
//! work being measured.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use mps_core::patterns_tree::{PatternId, PatternsTree};
use mps_core::registry::Engine;

use crate::perf::CounterGroup;

const STREAM_BUFFER_SIZE: usize = 100 * 1024;

#[derive(Debug, Default, Clone, Copy)]
pub struct SuccessRate {
    pub success: u64,
    pub partial_success: u64,
    pub false_negative: u64,
    pub false_positive: u64,
}

pub struct InstanceStats {
    pub success_rate: SuccessRate,
    pub software_counters: Vec<(&'static str, u64)>,
    pub hardware_counters: Vec<(&'static str, u64)>,
    pub total_mem: usize,
}

/// Run `engine` against every stream file, comparing its per-byte identities
/// against `oracle`'s, and return the accumulated success-rate and
/// perf-counter totals.
pub fn measure_single_instance(
    engine: &mut Engine,
    oracle: &mut Engine,
    tree: &PatternsTree,
    stream_paths: &[std::path::PathBuf],
) -> anyhow::Result<InstanceStats> {
    let mut software = CounterGroup::software()?;
    let mut hardware = CounterGroup::hardware()?;
    let mut software_totals = Vec::new();
    let mut hardware_totals = Vec::new();
    let mut success_rate = SuccessRate::default();
    let mut buf = vec![0u8; STREAM_BUFFER_SIZE];

    for path in stream_paths {
        oracle.reset();
        engine.reset();
        let mut file = File::open(path)
            .with_context(|| format!("opening stream file {}", path.display()))?;

        loop {
            let n = read_chunk(&mut file, &mut buf, path)?;
            if n == 0 {
                break;
            }

            software.arm()?;
            hardware.arm()?;
            let mut engine_ids: Vec<Option<PatternId>> = Vec::with_capacity(n);
            for &byte in &buf[..n] {
                engine_ids.push(engine.read_char(byte)?);
            }
            software.disarm()?;
            hardware.disarm()?;
            software.accumulate_into(&mut software_totals)?;
            hardware.accumulate_into(&mut hardware_totals)?;
            software.reset()?;
            hardware.reset()?;

            for (&byte, engine_id) in buf[..n].iter().zip(engine_ids.iter()) {
                let oracle_id = oracle.read_char(byte)?;
                classify(*engine_id, oracle_id, tree, &mut success_rate);
            }

            if n < STREAM_BUFFER_SIZE {
                break;
            }
        }
    }

    Ok(InstanceStats {
        success_rate,
        software_counters: software_totals,
        hardware_counters: hardware_totals,
        total_mem: engine.total_mem(),
    })
}

fn read_chunk(file: &mut File, buf: &mut [u8], path: &Path) -> anyhow::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = file.read(&mut buf[total..]).with_context(|| format!("reading stream file {}", path.display()))?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}

fn classify(engine_id: Option<PatternId>, oracle_id: Option<PatternId>, tree: &PatternsTree, rate: &mut SuccessRate) {
    match (engine_id, oracle_id) {
        (a, r) if a == r => rate.success += 1,
        (Some(a), Some(r)) if tree.is_pattern_suffix(a, r) => rate.partial_success += 1,
        (None, _) => rate.false_negative += 1,
        (Some(_), _) => rate.false_positive += 1,
    }
}
