use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizforge_core::tags::{
    cluster_similar_tags, find_similar_tags, levenshtein_distance, recommend_tags, similarity,
};
use quizforge_core::Tag;

fn generate_tags(n: usize) -> Vec<Tag> {
    let stems = ["algebra", "geometry", "calculus", "physics", "chemistry", "수학", "과학"];
    (0..n)
        .map(|i| Tag::new(format!("{}-{}", stems[i % stems.len()], i / stems.len())).unwrap())
        .collect()
}

fn bench_levenshtein(c: &mut Criterion) {
    let mut group = c.benchmark_group("levenshtein");

    group.bench_function("short", |b| {
        b.iter(|| levenshtein_distance(black_box("kitten"), black_box("sitting")))
    });

    group.bench_function("hangul", |b| {
        b.iter(|| levenshtein_distance(black_box("수학문제풀이"), black_box("수학문제")))
    });

    let long_a = "linear-algebra-and-matrix-decomposition".repeat(2);
    let long_b = "linear-algebra-with-matrix-factorization".repeat(2);
    group.bench_function("long", |b| {
        b.iter(|| levenshtein_distance(black_box(&long_a), black_box(&long_b)))
    });

    group.bench_function("similarity_normalized", |b| {
        b.iter(|| similarity(black_box("  Linear  Algebra "), black_box("linear-algebra")))
    });

    group.finish();
}

fn bench_tag_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("tag_operations");

    let small = generate_tags(20);
    let large = generate_tags(200);

    group.bench_function("find_similar_20", |b| {
        b.iter(|| find_similar_tags(black_box("algebr"), black_box(&small), 0.6, 5))
    });

    group.bench_function("find_similar_200", |b| {
        b.iter(|| find_similar_tags(black_box("algebr"), black_box(&large), 0.6, 5))
    });

    group.bench_function("cluster_20", |b| {
        b.iter(|| cluster_similar_tags(black_box(&small), true, 0.8))
    });

    group.bench_function("cluster_200", |b| {
        b.iter(|| cluster_similar_tags(black_box(&large), true, 0.8))
    });

    group.bench_function("recommend_200", |b| {
        b.iter(|| {
            recommend_tags(
                black_box("Solving quadratic equations with algebra"),
                black_box(Some("A calculus refresher and some geometry")),
                black_box(&large),
                5,
                2,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_levenshtein, bench_tag_operations);
criterion_main!(benches);
