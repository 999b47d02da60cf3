//! quizforge-core — problem content, answer keys, grading, and tag curation.
//!
//! This crate defines the value objects and the `Problem` aggregate that
//! authoring tools build, the grading service that scores learner
//! submissions against a stored answer key, and the tag management functions
//! used to keep a tag taxonomy tidy. Everything here is synchronous and pure.

pub mod answer;
pub mod config;
pub mod content;
pub mod difficulty;
pub mod error;
pub mod grading;
pub mod grading_policy;
pub mod kind;
pub mod problem;
pub mod scoring;
pub mod tag;
pub mod tags;
pub mod validation;

pub use answer::{AnswerContent, AnswerContentData};
pub use content::{ProblemContent, ProblemContentData};
pub use difficulty::Difficulty;
pub use error::{DomainError, DomainResult};
pub use grading::{AnswerGradingService, GradingResult, Submission, SubmittedAnswer};
pub use kind::ProblemType;
pub use problem::{Problem, ProblemDraft, ProblemSnapshot};
pub use tag::Tag;
pub use tags::{TagCurator, TagManagementService};
