use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mps_core::patterns_tree::PatternsTree;
use mps_core::registry::{all_engine_kinds, EngineBuilder, EngineKind};

mod dict;
mod error;
mod measure;
mod output;
mod perf;

/// Benchmark every registered multi-pattern search engine against an
/// Aho-Corasick oracle, over a dictionary and a set of streams.
#[derive(Parser, Debug)]
#[command(name = "mps-bench")]
#[command(about = "Benchmark streaming multi-pattern search engines against an Aho-Corasick oracle")]
struct Cli {
    /// Dictionary file, one pattern per line. Repeatable.
    #[arg(short = 'd')]
    dictionaries: Vec<PathBuf>,

    /// Stream file to search. Repeatable.
    #[arg(short = 's')]
    streams: Vec<PathBuf>,

    /// Also write the results to this file.
    #[arg(short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    if cli.dictionaries.is_empty() {
        anyhow::bail!("at least one -d dictionary file is required");
    }
    if cli.streams.is_empty() {
        anyhow::bail!("at least one -s stream file is required");
    }

    let patterns = dict::load(&cli.dictionaries)?;
    let (tree, assigned) = PatternsTree::build(&patterns);

    let mut oracle = build_engine(EngineKind::AhoCorasickDense, &assigned)?;

    let mut reports = Vec::new();
    for kind in all_engine_kinds() {
        let mut engine = build_engine(*kind, &assigned)?;
        let stats = measure::measure_single_instance(&mut engine, &mut oracle, &tree, &cli.streams)
            .with_context(|| format!("measuring engine {}", kind.name()))?;
        reports.push((kind.name(), stats));
    }

    let report_refs: Vec<output::Report<'_>> =
        reports.iter().map(|(name, stats)| output::Report { engine_name: name, stats }).collect();
    output::print_table(&report_refs);

    if let Some(path) = &cli.output {
        output::write_to_file(path, &report_refs)?;
    }

    Ok(())
}

fn build_engine(kind: EngineKind, assigned: &[(Vec<u8>, usize)]) -> anyhow::Result<mps_core::registry::Engine> {
    let mut builder = EngineBuilder::create(kind);
    for (bytes, id) in assigned {
        builder.add_pattern(bytes, *id);
    }
    Ok(builder.compile()?)
}
