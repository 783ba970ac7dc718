use amosat::sat::clause::Clause;
use amosat::sat::cnf::Cnf;
use amosat::sat::consistency::check_consistency;
use amosat::sat::dimacs::parse_str;
use amosat::sat::dpll::Dpll;
use amosat::sat::literal::Literal;
use amosat::sat::propagation::simplify;
use amosat::sat::solver::Solver;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;

fn var(kind: &str, a: usize, b: usize) -> Literal {
    Literal::new(format!("{kind}{a}_{b}"))
}

/// `pigeons` pigeons into `pigeons - 1` holes: every pigeon sits somewhere,
/// no hole is shared.
fn pigeonhole(pigeons: usize) -> Cnf {
    let holes = pigeons - 1;
    let mut clauses = Vec::new();
    for p in 0..pigeons {
        clauses.push(Clause::or((0..holes).map(|h| var("p", p, h))).unwrap());
    }
    for h in 0..holes {
        clauses.push(Clause::at_most_one((0..pigeons).map(|p| var("p", p, h))).unwrap());
    }
    Cnf::new(clauses).unwrap()
}

/// One queen per row, at most one per column and diagonal.
fn queens(n: usize) -> Cnf {
    let mut clauses = Vec::new();
    for r in 0..n {
        clauses.push(Clause::or((0..n).map(|c| var("q", r, c))).unwrap());
        clauses.push(Clause::at_most_one((0..n).map(|c| var("q", r, c))).unwrap());
    }
    for c in 0..n {
        clauses.push(Clause::at_most_one((0..n).map(|r| var("q", r, c))).unwrap());
    }
    for d in 0..(2 * n - 1) {
        let down: Vec<_> = (0..n)
            .filter_map(|r| (d >= r && d - r < n).then(|| var("q", r, d - r)))
            .collect();
        if down.len() > 1 {
            clauses.push(Clause::at_most_one(down).unwrap());
        }
        let up: Vec<_> = (0..n)
            .filter_map(|r| (d + r + 1 >= n && d + r + 1 - n < n).then(|| var("q", r, d + r + 1 - n)))
            .collect();
        if up.len() > 1 {
            clauses.push(Clause::at_most_one(up).unwrap());
        }
    }
    Cnf::new(clauses).unwrap()
}

/// `x0`, `-x0 x1`, `-x1 x2`, ... settled by propagation alone.
fn implication_chain(n: usize) -> Cnf {
    let mut text = String::from("x0 0\n");
    for i in 1..n {
        text.push_str(&format!("-x{} x{i} 0\n", i - 1));
    }
    parse_str(&text).unwrap()
}

fn bench_pigeonhole(c: &mut Criterion) {
    let mut group = c.benchmark_group("pigeonhole");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    for pigeons in [3, 4, 5] {
        let cnf = pigeonhole(pigeons);
        group.bench_with_input(BenchmarkId::from_parameter(pigeons), &cnf, |b, cnf| {
            b.iter(|| {
                let mut solver = Dpll::new();
                black_box(solver.solve(cnf.clone()));
            });
        });
    }
    group.finish();
}

fn bench_queens(c: &mut Criterion) {
    let mut group = c.benchmark_group("queens");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    for n in [4, 6, 8] {
        let cnf = queens(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &cnf, |b, cnf| {
            b.iter(|| {
                let mut solver = Dpll::new();
                black_box(solver.solve(cnf.clone()));
            });
        });
    }
    group.finish();
}

fn bench_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagation");

    for n in [50, 200] {
        let cnf = implication_chain(n);
        group.bench_with_input(BenchmarkId::new("simplify", n), &cnf, |b, cnf| {
            b.iter(|| {
                let mut cnf = cnf.clone();
                black_box(simplify(&mut cnf));
            });
        });
        group.bench_with_input(BenchmarkId::new("check_consistency", n), &cnf, |b, cnf| {
            b.iter(|| black_box(check_consistency(cnf)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pigeonhole, bench_queens, bench_propagation);

criterion_main!(benches);
