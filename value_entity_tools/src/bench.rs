use std::hint::black_box;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use value_entity::{NaiveEngine, ValueEntity};
use value_entity_tools::people::{sample_names, PersonName, PersonNameHandCoded};

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Engine {
    All,
    Cached,
    Naive,
    HandCoded,
}

/// Times structural equality and hashing of person names under each engine
#[derive(Parser)]
struct Args {
    /// Number of names to build
    #[arg(long, default_value_t = 5_000_000)]
    count: usize,

    /// Engine(s) to time
    #[arg(long, value_enum, default_value_t = Engine::All)]
    engine: Engine,
}

struct Inputs {
    derived: Vec<PersonName>,
    hand: Vec<PersonNameHandCoded>,
}

fn build_inputs(count: usize) -> anyhow::Result<Inputs> {
    let progress = ProgressBar::new(count as u64);
    progress.set_style(ProgressStyle::with_template("{msg:8} {wide_bar} {human_pos}/{human_len} {elapsed}")?);
    progress.set_draw_target(ProgressDrawTarget::stdout_with_hz(2 /* hz */));
    progress.set_message("building");

    let mut derived = Vec::with_capacity(count);
    let mut hand = Vec::with_capacity(count);
    for (i, (first, last)) in sample_names(count).enumerate() {
        derived.push(PersonName::new(&first, &last));
        hand.push(PersonNameHandCoded::new(&first, &last));
        if i % 65_536 == 0 {
            progress.set_position(i as u64);
        }
    }
    progress.finish_and_clear();

    Ok(Inputs { derived, hand })
}

// Compares element i with element n-1-i, as a mix of equal and unequal pairs
fn time_equals<T>(items: &[T], equals: impl Fn(&T, &T) -> bool) -> Duration {
    let start = Instant::now();
    let last = items.len().saturating_sub(1);
    for (i, item) in items.iter().enumerate() {
        black_box(equals(item, &items[last - i]));
    }
    start.elapsed()
}

fn time_hash<T>(items: &[T], hash: impl Fn(&T) -> u64) -> Duration {
    let start = Instant::now();
    for item in items {
        black_box(hash(item));
    }
    start.elapsed()
}

fn report(label: &str, equals: Duration, hash: Duration) {
    println!("{label:<11} equals: {:>8.3}s  hash: {:>8.3}s", equals.as_secs_f64(), hash.as_secs_f64());
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    run_bench(Args::parse())
}

fn run_bench(args: Args) -> anyhow::Result<()> {
    println!("Bench starting with {} names...", args.count);
    let inputs = build_inputs(args.count)?;

    // Warm up so synthesis is not part of the first measurement
    let warm = PersonName::new("", "");
    black_box(warm.value_eq(&warm));
    info!("Cached functions ready for {} fields", PersonName::cache_entry().descriptors().len());

    let wants = |engine: Engine| args.engine == Engine::All || args.engine == engine;

    if wants(Engine::Cached) {
        let equals = time_equals(&inputs.derived, |a, b| a.value_eq(b));
        let hash = time_hash(&inputs.derived, |a| a.value_hash());
        report("cached", equals, hash);
    }

    if wants(Engine::Naive) {
        let naive = NaiveEngine::<PersonName>::new()
            .context("Failed to set up the naive engine for PersonName")?;
        let equals = time_equals(&inputs.derived, |a, b| naive.equals(a, b));
        let hash = time_hash(&inputs.derived, |a| naive.hash(a));
        report("naive", equals, hash);
    }

    if wants(Engine::HandCoded) {
        let equals = time_equals(&inputs.hand, |a, b| a == b);
        let hash = time_hash(&inputs.hand, PersonNameHandCoded::hand_hash);
        report("hand-coded", equals, hash);
    }

    Ok(())
}
