use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use quizforge_core::answer::{
    AnswerKey, BlankAnswer, FillBlankAnswer, MatchPair, MatchingAnswer, OrderingAnswer,
    ShortAnswerAnswer,
};
use quizforge_core::config::GradingConfig;
use quizforge_core::{AnswerContent, AnswerContentData, AnswerGradingService, Submission};

fn answer(points: f64, key: AnswerKey) -> AnswerContent {
    AnswerContent::new(AnswerContentData::new(points, key)).unwrap()
}

fn bench_grade_answer(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade_answer");
    let service = AnswerGradingService::default();

    let short = answer(
        5.0,
        AnswerKey::ShortAnswer(ShortAnswerAnswer {
            accepted_answers: vec!["Paris".into(), "Paris, France".into()],
            case_sensitive: false,
            trim_whitespace: true,
        }),
    );
    let short_submission = Submission::new("short_answer", json!("  paris  "));

    let matching = answer(
        20.0,
        AnswerKey::Matching(MatchingAnswer {
            correct_matches: (0..10)
                .map(|i| MatchPair::new(format!("l{i}"), format!("r{i}")))
                .collect(),
            allows_partial_credit: Some(true),
        }),
    );
    let matching_submission = Submission::new(
        "matching",
        json!((0..10)
            .map(|i| json!({"leftId": format!("l{i}"), "rightId": format!("r{}", (i + i % 2) % 10)}))
            .collect::<Vec<_>>()),
    );

    let fill_blank = answer(
        10.0,
        AnswerKey::FillBlank(FillBlankAnswer {
            blanks: (0..8)
                .map(|i| BlankAnswer {
                    id: format!("b{i}"),
                    accepted_answers: vec![format!("word{i}"), format!("Wörd{i}")],
                    case_sensitive: false,
                })
                .collect(),
            allows_partial_credit: None,
        }),
    );
    let fill_submission = Submission::new(
        "fill_blank",
        json!({"b0": "WORD0", "b1": "word1", "b2": "nope", "b3": "wörd3"}),
    );

    let ordering = answer(
        10.0,
        AnswerKey::Ordering(OrderingAnswer {
            correct_order: (0..20).map(|i| format!("step{i}")).collect(),
            allows_partial_credit: None,
        }),
    );
    let ordering_submission = Submission::new(
        "ordering",
        json!((0..20).rev().map(|i| format!("step{i}")).collect::<Vec<_>>()),
    );

    group.bench_function("short_answer", |b| {
        b.iter(|| service.grade_answer(black_box(&short_submission), black_box(&short)))
    });

    group.bench_function("matching_10", |b| {
        b.iter(|| service.grade_answer(black_box(&matching_submission), black_box(&matching)))
    });

    group.bench_function("fill_blank_8", |b| {
        b.iter(|| service.grade_answer(black_box(&fill_submission), black_box(&fill_blank)))
    });

    group.bench_function("ordering_20", |b| {
        b.iter(|| service.grade_answer(black_box(&ordering_submission), black_box(&ordering)))
    });

    let strict = AnswerGradingService::new(GradingConfig::strict());
    group.bench_function("matching_10_strict", |b| {
        b.iter(|| strict.grade_answer(black_box(&matching_submission), black_box(&matching)))
    });

    group.bench_function("type_mismatch", |b| {
        b.iter(|| service.grade_answer(black_box(&short_submission), black_box(&matching)))
    });

    group.finish();
}

criterion_group!(benches, bench_grade_answer);
criterion_main!(benches);
