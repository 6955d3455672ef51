//! Benchmark: route table matching
//!
//! # Background
//!
//! `match_path` runs once per navigation. The exact-pattern map is
//! consulted first; everything else is a linear scan in declared order
//! with a non-allocating segment walk. Parameters are extracted only for
//! the winning rule.
//!
//! # What to watch
//!
//! - Exact hits should stay flat as the table grows
//! - Dynamic hits grow with the position of the winning rule
//! - Misses pay for the full scan; they are the worst case

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use roost_auth::{Permission, ResourceType, RouteRule, RouteTable};
use roost_types::TryNew;

fn table_with(padding: usize) -> RouteTable {
    let mut rules = vec![
        RouteRule::public("/houses"),
        RouteRule::protected("/admin/expansion").requires(Permission::ManageAllHouses),
    ];
    for i in 0..padding {
        rules.push(
            RouteRule::protected(format!("/section{i}/:houseId/page"))
                .requires(Permission::ViewHouse)
                .scoped_to(ResourceType::House),
        );
    }
    rules.push(
        RouteRule::protected("/admin/:houseId/residents")
            .requires(Permission::ManageResidents)
            .scoped_to(ResourceType::House),
    );
    RouteTable::try_new(rules).expect("bench table should validate")
}

fn bench_match_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_path");

    for padding in [0usize, 16, 64] {
        let table = table_with(padding);

        group.bench_with_input(BenchmarkId::new("exact", padding), &table, |b, t| {
            b.iter(|| black_box(t.match_path(black_box("/admin/expansion"))));
        });

        group.bench_with_input(BenchmarkId::new("dynamic_last", padding), &table, |b, t| {
            b.iter(|| black_box(t.match_path(black_box("/admin/H1/residents"))));
        });

        group.bench_with_input(BenchmarkId::new("miss", padding), &table, |b, t| {
            b.iter(|| black_box(t.match_path(black_box("/totally/unknown/path"))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_match_path);
criterion_main!(benches);
