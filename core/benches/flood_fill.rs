use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use infinisweeper_core::*;

fn oracle_throughput(c: &mut Criterion) {
    let oracle = SeededOracle::new(1_234, GameConfig::DEFAULT_MINE_CHANCE);
    c.bench_function("neighbor_mine_count 32x32", |b| {
        b.iter(|| {
            let mut total = 0u32;
            for x in -16..16 {
                for y in -16..16 {
                    total += u32::from(oracle.neighbor_mine_count(black_box(Cell::new(x, y))));
                }
            }
            total
        })
    });
}

fn large_flood_fill(c: &mut Criterion) {
    let radius = 60;
    let mut mines = Vec::new();
    for d in -radius..=radius {
        mines.extend([
            Cell::new(d, -radius),
            Cell::new(d, radius),
            Cell::new(-radius, d),
            Cell::new(radius, d),
        ]);
    }
    let layout = MineLayout::from_mine_cells(&mines);

    c.bench_function("flood fill 119x119 region", |b| {
        b.iter(|| {
            let state = FieldState::new(0, GameConfig::DEFAULT_SECTOR_SIZE).unwrap();
            let mut engine = PlayEngine::with_oracle(&layout, state, None);
            black_box(engine.reveal(Cell::ORIGIN))
        })
    });
}

criterion_group!(benches, oracle_throughput, large_flood_fill);
criterion_main!(benches);
