use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default salary-research location when none is given.
pub const DEFAULT_LOCATION: &str = "United States";

// ═══════════════════════════════════════════════════════════
// Task kinds
// ═══════════════════════════════════════════════════════════

/// The nine analysis / generation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    ResumeScore,
    JobMatch,
    OptimizationBullets,
    KeywordExtraction,
    CoverLetter,
    SkillGap,
    ElevatorPitch,
    SalaryResearch,
    CultureAnalysis,
}

impl TaskKind {
    pub fn all() -> &'static [TaskKind] {
        &[
            Self::ResumeScore,
            Self::JobMatch,
            Self::OptimizationBullets,
            Self::KeywordExtraction,
            Self::CoverLetter,
            Self::SkillGap,
            Self::ElevatorPitch,
            Self::SalaryResearch,
            Self::CultureAnalysis,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResumeScore => "resume_score",
            Self::JobMatch => "job_match",
            Self::OptimizationBullets => "optimization_bullets",
            Self::KeywordExtraction => "keyword_extraction",
            Self::CoverLetter => "cover_letter",
            Self::SkillGap => "skill_gap",
            Self::ElevatorPitch => "elevator_pitch",
            Self::SalaryResearch => "salary_research",
            Self::CultureAnalysis => "culture_analysis",
        }
    }

    /// Fields that must be present and non-blank for this kind.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::ResumeScore => &["resume"],
            Self::JobMatch
            | Self::OptimizationBullets
            | Self::SkillGap
            | Self::ElevatorPitch => &["resume", "job_description"],
            Self::KeywordExtraction => &["job_description"],
            Self::CoverLetter => &["resume", "job_description", "company"],
            Self::SalaryResearch => &["job_title", "years_experience", "location"],
            Self::CultureAnalysis => &["company"],
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════
// Request
// ═══════════════════════════════════════════════════════════

/// One task invocation with its input fields. Built per call, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub kind: TaskKind,
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub years_experience: Option<u32>,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub industry: String,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

impl TaskRequest {
    pub fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            resume: String::new(),
            job_description: String::new(),
            company: String::new(),
            job_title: String::new(),
            years_experience: None,
            location: default_location(),
            industry: String::new(),
        }
    }

    pub fn with_resume(mut self, resume: &str) -> Self {
        self.resume = resume.to_string();
        self
    }

    pub fn with_job_description(mut self, job_description: &str) -> Self {
        self.job_description = job_description.to_string();
        self
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = company.to_string();
        self
    }

    pub fn with_job_title(mut self, job_title: &str) -> Self {
        self.job_title = job_title.to_string();
        self
    }

    pub fn with_years_experience(mut self, years: u32) -> Self {
        self.years_experience = Some(years);
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    pub fn with_industry(mut self, industry: &str) -> Self {
        self.industry = industry.to_string();
        self
    }

    fn field_present(&self, name: &str) -> bool {
        match name {
            "resume" => !self.resume.trim().is_empty(),
            "job_description" => !self.job_description.trim().is_empty(),
            "company" => !self.company.trim().is_empty(),
            "job_title" => !self.job_title.trim().is_empty(),
            "years_experience" => self.years_experience.is_some(),
            "location" => !self.location.trim().is_empty(),
            "industry" => !self.industry.trim().is_empty(),
            _ => false,
        }
    }

    /// First required field that is absent or blank.
    pub fn missing_field(&self) -> Option<&'static str> {
        self.kind
            .required_fields()
            .iter()
            .copied()
            .find(|f| !self.field_present(f))
    }
}

// ═══════════════════════════════════════════════════════════
// Result
// ═══════════════════════════════════════════════════════════

/// Why a task produced no usable content. `Display` is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TaskFailure {
    #[error("Error extracting PDF: {0}")]
    Decode(String),

    #[error("Sorry, the API is currently experiencing high traffic. Please try again in a few minutes.")]
    RateLimited,

    /// Detail is for logs; the message shown is fixed.
    #[error("Error: Unable to process request. Please try again later.")]
    Unavailable(String),

    #[error("Error: API calls failed after multiple retries. Please try again later.")]
    RetriesExhausted,

    #[error("Error: Could not parse keywords")]
    Parse(String),

    #[error("Error: The service returned an empty response. Please try again.")]
    EmptyResponse,

    #[error("Error: Missing required input: {0}")]
    MissingField(&'static str),
}

impl TaskFailure {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Outcome of one task. Never partially structured.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum TaskResult {
    Text(String),
    Keywords(Vec<String>),
    Failed(TaskFailure),
}

impl TaskResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_keywords(&self) -> Option<&[String]> {
        match self {
            Self::Keywords(keywords) => Some(keywords),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&TaskFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_task_kinds_with_snake_case_names() {
        assert_eq!(TaskKind::all().len(), 9);
        assert_eq!(TaskKind::KeywordExtraction.to_string(), "keyword_extraction");
        let json = serde_json::to_string(&TaskKind::SalaryResearch).unwrap();
        assert_eq!(json, "\"salary_research\"");
    }

    #[test]
    fn as_str_round_trips_through_serde() {
        for kind in TaskKind::all() {
            let parsed: TaskKind =
                serde_json::from_str(&format!("\"{}\"", kind.as_str())).unwrap();
            assert_eq!(parsed, *kind);
        }
    }

    #[test]
    fn request_defaults_location_to_united_states() {
        let request = TaskRequest::new(TaskKind::SalaryResearch);
        assert_eq!(request.location, "United States");
        assert_eq!(request.industry, "");

        let from_json: TaskRequest =
            serde_json::from_str(r#"{"kind": "salary_research", "job_title": "SRE"}"#).unwrap();
        assert_eq!(from_json.location, "United States");
    }

    #[test]
    fn missing_field_reports_first_absent_requirement() {
        let request = TaskRequest::new(TaskKind::CoverLetter)
            .with_resume("resume")
            .with_job_description("   ");
        assert_eq!(request.missing_field(), Some("job_description"));

        let complete = request.with_job_description("jd").with_company("Acme");
        assert_eq!(complete.missing_field(), None);
    }

    #[test]
    fn culture_analysis_does_not_require_industry() {
        let request = TaskRequest::new(TaskKind::CultureAnalysis).with_company("Acme");
        assert_eq!(request.missing_field(), None);
    }

    #[test]
    fn salary_research_requires_years() {
        let request = TaskRequest::new(TaskKind::SalaryResearch).with_job_title("SRE");
        assert_eq!(request.missing_field(), Some("years_experience"));
    }

    #[test]
    fn failure_messages_are_fixed_strings() {
        assert_eq!(
            TaskFailure::RateLimited.user_message(),
            "Sorry, the API is currently experiencing high traffic. Please try again in a few minutes."
        );
        assert_eq!(
            TaskFailure::Unavailable("401 bad key".into()).user_message(),
            "Error: Unable to process request. Please try again later."
        );
        assert_eq!(
            TaskFailure::RetriesExhausted.user_message(),
            "Error: API calls failed after multiple retries. Please try again later."
        );
        assert_eq!(
            TaskFailure::Parse("no array".into()).user_message(),
            "Error: Could not parse keywords"
        );
    }

    #[test]
    fn result_serializes_with_status_tag() {
        let ok = serde_json::to_value(TaskResult::Keywords(vec!["Rust".into()])).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "keywords", "value": ["Rust"]}));

        let failed = serde_json::to_value(TaskResult::Failed(TaskFailure::RateLimited)).unwrap();
        assert_eq!(failed["status"], "failed");
        assert_eq!(failed["value"]["kind"], "rate_limited");
    }

    #[test]
    fn accessors_match_variant() {
        let text = TaskResult::Text("hi".into());
        assert!(text.is_success());
        assert_eq!(text.as_text(), Some("hi"));
        assert!(text.as_keywords().is_none());

        let failed = TaskResult::Failed(TaskFailure::EmptyResponse);
        assert!(!failed.is_success());
        assert_eq!(failed.failure(), Some(&TaskFailure::EmptyResponse));
    }
}
