//! Criterion benchmarks for pattern ranking.
//!
//! Uses synthetic pattern tables (random operator chains with random
//! multiplicities) to measure scoring and sorting overhead.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pattern_rank::cost::{EmulatableBlock, EmulationTable, GateCostModel};
use pattern_rank::pattern::{Occurrence, Operator, PatternCode, PatternEntry};
use pattern_rank::ranking::{Direction, Metric, PatternOrder, RankContext, Ranker, TieBreaker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ===========================================================================
// Synthetic workload
// ===========================================================================

fn random_code<R: Rng>(rng: &mut R) -> PatternCode {
    let depth = rng.random_range(1..6);
    let mut tokens = Vec::new();
    let mut leaves = 1usize;
    for _ in 0..depth {
        let op = Operator::ALL[rng.random_range(0..Operator::ALL.len())];
        tokens.push(op.tag());
        leaves += op.arity() - 1;
    }
    tokens.extend(std::iter::repeat(0).take(leaves));
    PatternCode::parse(&tokens).expect("operator chain is well formed")
}

fn random_entries(n: usize, seed: u64) -> Vec<PatternEntry<Occurrence>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let code = random_code(&mut rng);
            let len = code.operation_node_count();
            let count = rng.random_range(0..40);
            let occurrences = (0..count)
                .map(|_| Occurrence::new((0..len).map(|_| rng.random()).collect()))
                .collect();
            PatternEntry::unchecked(code, occurrences)
        })
        .collect()
}

fn emulation_for(entries: &[PatternEntry<Occurrence>]) -> EmulationTable {
    entries
        .iter()
        .map(|e| (e.code().clone(), EmulatableBlock::new(e.code().clone(), 1)))
        .collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_single_rule(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_order");
    let model = GateCostModel::default();

    for &n in &[100usize, 1_000, 10_000] {
        let entries = random_entries(n, 42);
        let emulation = emulation_for(&entries);
        let ctx = RankContext::new(&model).with_emulation(&emulation);

        for metric in [Metric::Profit, Metric::EmulationProfit, Metric::PatternSize] {
            let order = PatternOrder::descending(metric).with_tie_breaker(TieBreaker::ByCode);
            group.bench_with_input(
                BenchmarkId::new(format!("{metric:?}"), n),
                &entries,
                |b, entries| b.iter(|| black_box(order.sort_indices(black_box(entries), &ctx))),
            );
        }
    }
    group.finish();
}

fn bench_multi_rule(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranker");
    let model = GateCostModel::default();
    let ctx = RankContext::new(&model);

    for &n in &[100usize, 1_000, 10_000] {
        let entries = random_entries(n, 7);
        let ranker = Ranker::new()
            .with_rule(Metric::Profit)
            .with_rule(Metric::OccurrenceCount)
            .with_direction(Direction::Descending);
        group.bench_with_input(BenchmarkId::from_parameter(n), &entries, |b, entries| {
            b.iter(|| black_box(ranker.sort_indices(black_box(entries), &ctx)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_rule, bench_multi_rule);
criterion_main!(benches);
