use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use memory_casino::game::{self, CardId, Face, GameMode, GameState, ScoringConfig};
use rand::{SeedableRng, rngs::StdRng};
use std::collections::BTreeMap;
use std::hint::black_box;

fn deal(pairs: usize, mode: GameMode) -> GameState {
    let mut rng = StdRng::seed_from_u64(42);
    game::create_initial_state(pairs, ScoringConfig::default(), mode, &mut rng).unwrap()
}

/// Pairs in table order, the way a perfect memory would play them
fn solution(state: &GameState) -> Vec<(CardId, CardId)> {
    let mut by_face: BTreeMap<Face, Vec<CardId>> = BTreeMap::new();
    for card in &state.cards {
        by_face.entry(card.face).or_default().push(card.id);
    }
    by_face.into_values().map(|ids| (ids[0], ids[1])).collect()
}

/// Benchmark dealing tables of increasing size
fn bench_deal(c: &mut Criterion) {
    let mut group = c.benchmark_group("deal");
    for pairs in [6, 8, 12, 26] {
        group.bench_with_input(BenchmarkId::from_parameter(pairs), &pairs, |b, &pairs| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                game::create_initial_state(
                    black_box(pairs),
                    ScoringConfig::default(),
                    GameMode::Standard,
                    &mut rng,
                )
            });
        });
    }
    group.finish();
}

/// Benchmark a single flip on a fresh table
fn bench_flip(c: &mut Criterion) {
    let state = deal(12, GameMode::Standard);
    let id = state.cards[0].id;
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("flip_first_card", |b| {
        b.iter(|| game::flip_card(black_box(&state), black_box(id), &mut rng));
    });
}

/// Benchmark a whole perfect game per mode
fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_game");
    for mode in [GameMode::Standard, GameMode::HighRoller] {
        let start = deal(12, mode);
        let pairs = solution(&start);
        group.bench_with_input(BenchmarkId::from_parameter(mode), &start, |b, start| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                let mut state = start.clone();
                for &(first, second) in &pairs {
                    state = game::flip_card(&state, first, &mut rng).0;
                    state = game::flip_card(&state, second, &mut rng).0;
                }
                game::apply_final_bonuses(&state, 30)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_deal, bench_flip, bench_full_game);
criterion_main!(benches);
