//! The `Problem` aggregate.
//!
//! A problem owns its content, answer key, difficulty and tags. All changes
//! go through methods that keep the content and answer key on the same
//! variant and refresh `updated_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::answer::{AnswerContent, AnswerContentData};
use crate::content::{ProblemContent, ProblemContentData};
use crate::difficulty::Difficulty;
use crate::error::{DomainError, DomainResult};
use crate::grading::{AnswerGradingService, GradingResult, Submission};
use crate::kind::ProblemType;
use crate::tag::{normalize_tag_name, Tag};
use crate::tags::TagCurator;
use crate::validation::validate_non_empty;

/// Persisted form of a [`Problem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSnapshot {
    pub id: Uuid,
    pub teacher_id: String,
    pub content: ProblemContentData,
    pub correct_answer: AnswerContentData,
    pub difficulty: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Authoring document for a new problem, as written by hand or imported.
///
/// ```json
/// {
///   "teacherId": "t-1",
///   "content": {"type": "true_false", "title": "Sky", "statement": "The sky is blue"},
///   "correctAnswer": {"type": "true_false", "points": 5, "isTrue": true},
///   "difficulty": 2,
///   "tags": ["science"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDraft {
    pub teacher_id: String,
    pub content: ProblemContentData,
    pub correct_answer: AnswerContentData,
    /// 1 to 5, medium when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProblemSnapshot", into = "ProblemSnapshot")]
pub struct Problem {
    id: Uuid,
    teacher_id: String,
    content: ProblemContent,
    correct_answer: AnswerContent,
    difficulty: Difficulty,
    tags: Vec<Tag>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn check_agreement(content: &ProblemContent, answer: &AnswerContent) -> DomainResult<()> {
    if content.problem_type() != answer.problem_type() {
        return Err(DomainError::TypeMismatch {
            content: content.problem_type().to_string(),
            answer: answer.problem_type().to_string(),
        });
    }
    Ok(())
}

fn dedupe_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut unique: Vec<Tag> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

impl Problem {
    /// Create an active problem with a fresh id.
    ///
    /// # Errors
    ///
    /// Fails when `teacher_id` is blank or the answer key is for a different
    /// variant than the content. Repeated tags are collapsed, not rejected.
    pub fn create(
        teacher_id: impl Into<String>,
        content: ProblemContent,
        correct_answer: AnswerContent,
        difficulty: Difficulty,
        tags: Vec<Tag>,
    ) -> DomainResult<Self> {
        let teacher_id = teacher_id.into();
        validate_non_empty(&teacher_id, "Teacher id")?;
        check_agreement(&content, &correct_answer)?;

        let now = Utc::now();
        let problem = Self {
            id: Uuid::new_v4(),
            teacher_id,
            content,
            correct_answer,
            difficulty,
            tags: dedupe_tags(tags),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        debug!(id = %problem.id, problem_type = %problem.problem_type(), "created problem");
        Ok(problem)
    }

    /// Build a problem from an authoring document.
    ///
    /// Tags pass through `curator`, which deduplicates and enforces its limit.
    pub fn from_draft(draft: ProblemDraft, curator: &dyn TagCurator) -> DomainResult<Self> {
        let content = ProblemContent::new(draft.content)?;
        let correct_answer = AnswerContent::new(draft.correct_answer)?;
        let difficulty = match draft.difficulty {
            Some(level) => Difficulty::new(level)?,
            None => Difficulty::default(),
        };
        let tags = draft
            .tags
            .iter()
            .map(Tag::new)
            .collect::<DomainResult<Vec<_>>>()?;
        let tags = curator.normalize_tags(&tags)?;
        Self::create(draft.teacher_id, content, correct_answer, difficulty, tags)
    }

    /// Rebuild a persisted problem, keeping its id, state and timestamps.
    pub fn restore(snapshot: ProblemSnapshot) -> DomainResult<Self> {
        validate_non_empty(&snapshot.teacher_id, "Teacher id")?;
        let content = ProblemContent::new(snapshot.content)?;
        let correct_answer = AnswerContent::new(snapshot.correct_answer)?;
        check_agreement(&content, &correct_answer)?;
        let tags = snapshot
            .tags
            .iter()
            .map(Tag::new)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self {
            id: snapshot.id,
            teacher_id: snapshot.teacher_id,
            content,
            correct_answer,
            difficulty: Difficulty::new(snapshot.difficulty)?,
            tags: dedupe_tags(tags),
            is_active: snapshot.is_active,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn teacher_id(&self) -> &str {
        &self.teacher_id
    }

    pub fn problem_type(&self) -> ProblemType {
        self.content.problem_type()
    }

    pub fn content(&self) -> &ProblemContent {
        &self.content
    }

    pub fn correct_answer(&self) -> &AnswerContent {
        &self.correct_answer
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.matches_name(name))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    /// Attach `tag`, failing without change if the name is already present.
    pub fn add_tag(&mut self, tag: Tag) -> DomainResult<()> {
        if self.tags.contains(&tag) {
            return Err(DomainError::DuplicateTag(tag.name().to_string()));
        }
        self.tags.push(tag);
        self.touch();
        Ok(())
    }

    /// Detach the tag called `name` (normalized before comparing).
    pub fn remove_tag(&mut self, name: &str) -> DomainResult<Tag> {
        let Some(index) = self.tags.iter().position(|t| t.matches_name(name)) else {
            return Err(DomainError::TagNotFound(normalize_tag_name(name)));
        };
        let removed = self.tags.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn change_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.touch();
    }

    /// Replace the content; it must stay on the answer key's variant.
    pub fn update_content(&mut self, content: ProblemContent) -> DomainResult<()> {
        check_agreement(&content, &self.correct_answer)?;
        self.content = content;
        self.touch();
        Ok(())
    }

    /// Replace the answer key; it must stay on the content's variant.
    pub fn update_correct_answer(&mut self, correct_answer: AnswerContent) -> DomainResult<()> {
        check_agreement(&self.content, &correct_answer)?;
        self.correct_answer = correct_answer;
        self.touch();
        Ok(())
    }

    /// Replace both at once, which is how a problem changes variant.
    pub fn update_content_and_answer(
        &mut self,
        content: ProblemContent,
        correct_answer: AnswerContent,
    ) -> DomainResult<()> {
        check_agreement(&content, &correct_answer)?;
        self.content = content;
        self.correct_answer = correct_answer;
        self.touch();
        Ok(())
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    /// Grade a submission against this problem's answer key.
    pub fn grade(&self, submission: &Submission, service: &AnswerGradingService) -> GradingResult {
        service.grade_answer(submission, &self.correct_answer)
    }

    pub fn to_primitive(&self) -> ProblemSnapshot {
        ProblemSnapshot {
            id: self.id,
            teacher_id: self.teacher_id.clone(),
            content: self.content.to_primitive(),
            correct_answer: self.correct_answer.to_primitive(),
            difficulty: i64::from(self.difficulty.level()),
            tags: self.tags.iter().map(|t| t.name().to_string()).collect(),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn from_primitive(snapshot: ProblemSnapshot) -> DomainResult<Self> {
        Self::restore(snapshot)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.to_primitive())
    }

    pub fn from_json(value: &serde_json::Value) -> DomainResult<Self> {
        let snapshot: ProblemSnapshot = serde_json::from_value(value.clone())?;
        Self::restore(snapshot)
    }
}

impl TryFrom<ProblemSnapshot> for Problem {
    type Error = DomainError;

    fn try_from(snapshot: ProblemSnapshot) -> Result<Self, Self::Error> {
        Self::restore(snapshot)
    }
}

impl From<Problem> for ProblemSnapshot {
    fn from(problem: Problem) -> Self {
        problem.to_primitive()
    }
}
