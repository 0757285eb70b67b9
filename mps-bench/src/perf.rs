//! Hardware performance-counter groups.
//!
//! Two fixed groups are armed around each stream chunk fed to the engine
//! under test: a software group (page faults, wall clock, task clock) that
//! works under any kernel, and a hardware group (retired instructions,
//! branches, cycles) that needs PMU access. Both are read with
//! `PERF_FORMAT_GROUP` semantics via the `perf-event` crate, so every
//! counter in a group shares one enable/disable/reset.

use perf_event::events::{Hardware, Software};
use perf_event::{Builder, Counter, Group};

pub struct CounterGroup {
    group: Group,
    labels: Vec<&'static str>,
    counters: Vec<Counter>,
}

impl CounterGroup {
    pub fn software() -> anyhow::Result<Self> {
        let mut group = Group::new()?;
        let labels = vec!["page-faults", "cpu-clock", "task-clock"];
        let counters = vec![
            Builder::new().group(&mut group).kind(Software::PAGE_FAULTS).build()?,
            Builder::new().group(&mut group).kind(Software::CPU_CLOCK).build()?,
            Builder::new().group(&mut group).kind(Software::TASK_CLOCK).build()?,
        ];
        Ok(Self { group, labels, counters })
    }

    pub fn hardware() -> anyhow::Result<Self> {
        let mut group = Group::new()?;
        let labels = vec!["instructions", "branch-instructions", "cpu-cycles", "bus-cycles", "ref-cycles"];
        let counters = vec![
            Builder::new().group(&mut group).kind(Hardware::INSTRUCTIONS).build()?,
            Builder::new().group(&mut group).kind(Hardware::BRANCH_INSTRUCTIONS).build()?,
            Builder::new().group(&mut group).kind(Hardware::CPU_CYCLES).build()?,
            Builder::new().group(&mut group).kind(Hardware::BUS_CYCLES).build()?,
            Builder::new().group(&mut group).kind(Hardware::REF_CPU_CYCLES).build()?,
        ];
        Ok(Self { group, labels, counters })
    }

    pub fn reset(&mut self) -> anyhow::Result<()> {
        self.group.reset()?;
        Ok(())
    }

    pub fn arm(&mut self) -> anyhow::Result<()> {
        self.group.enable()?;
        Ok(())
    }

    pub fn disarm(&mut self) -> anyhow::Result<()> {
        self.group.disable()?;
        Ok(())
    }

    /// Accumulate this group's current counts into `totals`, keyed by label.
    pub fn accumulate_into(&mut self, totals: &mut Vec<(&'static str, u64)>) -> anyhow::Result<()> {
        let counts = self.group.read()?;
        for (label, counter) in self.labels.iter().zip(self.counters.iter()) {
            let value = counts[counter];
            match totals.iter_mut().find(|(l, _)| l == label) {
                Some((_, total)) => *total += value,
                None => totals.push((label, value)),
            }
        }
        Ok(())
    }
}
