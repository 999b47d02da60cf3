//! Aggregate lifecycle and serialization over the sample problem drafts.

use std::path::{Path, PathBuf};

use serde_json::json;

use quizforge_core::config::TagManagementConfig;
use quizforge_core::{
    AnswerContent, AnswerGradingService, Difficulty, DomainError, Problem, ProblemContent,
    ProblemDraft, ProblemType, Submission, Tag, TagManagementService,
};

fn problems_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../problems")
}

fn load_draft(name: &str) -> ProblemDraft {
    let path = problems_dir().join(name);
    let content = std::fs::read_to_string(&path).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn every_sample_draft_is_valid() {
    let curator = TagManagementService::default();
    let mut kinds = Vec::new();
    for entry in std::fs::read_dir(problems_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let draft: ProblemDraft =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let problem = Problem::from_draft(draft, &curator)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        kinds.push(problem.problem_type());
    }
    for kind in ProblemType::ALL {
        assert!(kinds.contains(&kind), "no sample for {kind}");
    }
}

#[test]
fn every_sample_survives_serialization() {
    let curator = TagManagementService::default();
    for entry in std::fs::read_dir(problems_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let draft: ProblemDraft =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let problem = Problem::from_draft(draft, &curator).unwrap();
        let name = path.display();

        let content = problem.content();
        assert_eq!(
            &ProblemContent::from_primitive(content.to_primitive()).unwrap(),
            content,
            "{name}"
        );
        assert_eq!(&ProblemContent::from_json(&content.to_json()).unwrap(), content, "{name}");
        let text = serde_json::to_string(content).unwrap();
        assert_eq!(&serde_json::from_str::<ProblemContent>(&text).unwrap(), content, "{name}");

        let answer = problem.correct_answer();
        assert_eq!(
            &AnswerContent::from_primitive(answer.to_primitive()).unwrap(),
            answer,
            "{name}"
        );
        assert_eq!(&AnswerContent::from_json(&answer.to_json()).unwrap(), answer, "{name}");
        let text = serde_json::to_string(answer).unwrap();
        assert_eq!(&serde_json::from_str::<AnswerContent>(&text).unwrap(), answer, "{name}");
    }
}

#[test]
fn sample_grades_like_the_matching_scenario() {
    let problem = Problem::from_draft(
        load_draft("country-capitals.json"),
        &TagManagementService::default(),
    )
    .unwrap();
    let submission: Submission = serde_json::from_str(
        &std::fs::read_to_string(problems_dir().join("../submissions/country-capitals.json"))
            .unwrap(),
    )
    .unwrap();
    let result = problem.grade(&submission, &AnswerGradingService::default());
    assert_eq!(result.score, 10.0);
    assert_eq!(result.max_score, 15.0);
}

#[test]
fn lifecycle() {
    let mut problem = Problem::from_draft(
        load_draft("planets-order.json"),
        &TagManagementService::default(),
    )
    .unwrap();
    let id = problem.id();
    assert!(problem.is_active());
    assert_eq!(problem.difficulty(), Difficulty::medium());

    problem.add_tag(Tag::new("solar-system").unwrap()).unwrap();
    assert!(matches!(
        problem.add_tag(Tag::new("PLANETS").unwrap()),
        Err(DomainError::DuplicateTag(_))
    ));
    problem.remove_tag("astronomy").unwrap();
    problem.change_difficulty("hard".parse().unwrap());
    problem.deactivate();

    let restored = Problem::from_json(&problem.to_json()).unwrap();
    assert_eq!(restored.id(), id);
    assert_eq!(restored, problem);
    assert!(!restored.is_active());
    assert_eq!(restored.tags().len(), 2);
    assert!(restored.updated_at() >= restored.created_at());
}

#[test]
fn switching_variant_needs_both_halves() {
    let mut problem = Problem::from_draft(
        load_draft("earth-orbit.json"),
        &TagManagementService::default(),
    )
    .unwrap();

    let content = ProblemContent::from_json(&json!({
        "type": "short_answer",
        "data": {"type": "short_answer", "title": "Closest star"}
    }))
    .unwrap();
    let answer = AnswerContent::from_json(&json!({
        "type": "short_answer",
        "data": {"type": "short_answer", "points": 2, "acceptedAnswers": ["the Sun", "Sun"]}
    }))
    .unwrap();

    assert!(matches!(
        problem.update_content(content.clone()),
        Err(DomainError::TypeMismatch { .. })
    ));
    assert_eq!(problem.problem_type(), ProblemType::TrueFalse);

    problem.update_content_and_answer(content, answer).unwrap();
    assert_eq!(problem.problem_type(), ProblemType::ShortAnswer);
    let result = problem.grade(
        &Submission::new("short_answer", json!("sun")),
        &AnswerGradingService::default(),
    );
    assert!(result.is_correct);
}

#[test]
fn strict_curator_rejects_long_tag_lists() {
    let mut draft = load_draft("capital-of-france.json");
    draft.tags = (0..6).map(|i| format!("tag{i}")).collect();
    let strict = TagManagementService::new(TagManagementConfig::strict());
    assert_eq!(
        Problem::from_draft(draft, &strict).unwrap_err(),
        DomainError::TagLimitExceeded { count: 6, max: 5 }
    );
}

#[test]
fn invalid_draft_reports_first_rule() {
    let mut draft = load_draft("capital-of-france.json");
    draft.correct_answer.points = 1001.0;
    let err = Problem::from_draft(draft, &TagManagementService::default()).unwrap_err();
    assert!(matches!(err, DomainError::OutOfRange(_)));

    let mut draft = load_draft("capital-of-france.json");
    draft.teacher_id = " ".into();
    let err = Problem::from_draft(draft, &TagManagementService::default()).unwrap_err();
    assert_eq!(err.to_string(), "Teacher id is required");
}
