//! Result formatting: a comfy-table summary on stdout, and an optional
//! plain-text dump to a `-o` file for later diffing between runs.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::measure::InstanceStats;

pub struct Report<'a> {
    pub engine_name: &'a str,
    pub stats: &'a InstanceStats,
}

pub fn print_table(reports: &[Report<'_>]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "engine", "mem (B)", "success", "partial", "false-", "false+",
    ]);
    for report in reports {
        let rate = &report.stats.success_rate;
        table.add_row(vec![
            report.engine_name.to_string(),
            report.stats.total_mem.to_string(),
            rate.success.to_string(),
            rate.partial_success.to_string(),
            rate.false_negative.to_string(),
            rate.false_positive.to_string(),
        ]);
    }
    println!("{table}");

    for report in reports {
        println!("\n{} counters:", report.engine_name);
        for (label, value) in report.stats.software_counters.iter().chain(&report.stats.hardware_counters) {
            println!("  {label:<20} {value}");
        }
    }
}

pub fn write_to_file(path: &Path, reports: &[Report<'_>]) -> anyhow::Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating output file {}", path.display()))?;
    for report in reports {
        let rate = &report.stats.success_rate;
        writeln!(file, "engine {} :", report.engine_name)?;
        writeln!(file, "  total memory: {}", report.stats.total_mem)?;
        writeln!(
            file,
            "  success = {}; partial = {}; false_neg = {}; false_pos = {}",
            rate.success, rate.partial_success, rate.false_negative, rate.false_positive
        )?;
        writeln!(file, "  perf events:")?;
        for (label, value) in report.stats.software_counters.iter().chain(&report.stats.hardware_counters) {
            writeln!(file, "    {label} : {value}")?;
        }
    }
    Ok(())
}
