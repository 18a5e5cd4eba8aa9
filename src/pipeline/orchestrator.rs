use chrono::{Local, NaiveDate};

use super::extraction::{
    decode_document, Document, ExtractionError, PdfExtractor, PdfTextExtractor,
};
use super::generation::{
    GeminiClient, GenerationError, LlmClient, ResilientClient, ServiceFailure, Sleeper,
    ThreadSleeper,
};
use super::parser::extract_json_array;
use super::sanitize::prepare_input;
use super::task::{TaskFailure, TaskKind, TaskRequest, TaskResult};
use crate::config::AnalyzerConfig;

/// Short prompt used to check the service answers at all.
const PROBE_PROMPT: &str = "Test";

/// Facade over extraction, prompt building, the resilient client and parsing.
/// Owns the only service client for its lifetime.
pub struct CareerAnalyzer<S: Sleeper = ThreadSleeper> {
    client: ResilientClient<Box<dyn LlmClient + Send + Sync>, S>,
    extractor: Box<dyn PdfExtractor + Send + Sync>,
    max_input_chars: usize,
}

impl CareerAnalyzer<ThreadSleeper> {
    /// Build the production analyzer: Gemini over HTTPS, pdf-extract decoding.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, GenerationError> {
        let gemini = GeminiClient::from_config(config)?;
        tracing::info!(model = %config.model, "Initialized generation client");
        Ok(Self::with_parts(
            Box::new(gemini),
            Box::new(PdfTextExtractor),
            config,
            ThreadSleeper,
        ))
    }
}

impl<S: Sleeper> CareerAnalyzer<S> {
    /// Assemble from explicit parts (alternate clients, extractors, sleepers).
    pub fn with_parts(
        llm: Box<dyn LlmClient + Send + Sync>,
        extractor: Box<dyn PdfExtractor + Send + Sync>,
        config: &AnalyzerConfig,
        sleeper: S,
    ) -> Self {
        Self {
            client: ResilientClient::with_sleeper(llm, config.retry.clone(), sleeper),
            extractor,
            max_input_chars: config.max_input_chars,
        }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Send one probe prompt, without retry; true when the service answers.
    pub fn verify_connection(&self) -> bool {
        match self.client.inner().generate(PROBE_PROMPT) {
            Ok(_) => {
                tracing::info!(model = %self.model_name(), "Generation service reachable");
                true
            }
            Err(e) => {
                tracing::error!(model = %self.model_name(), error = %e, "Generation service check failed");
                false
            }
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Document
    // ═══════════════════════════════════════════════════════════

    pub fn decode_document(&self, bytes: &[u8]) -> Result<Document, ExtractionError> {
        decode_document(self.extractor.as_ref(), bytes)
    }

    /// Decode an upload into a task result: the extracted text or a decode failure.
    pub fn extract_resume_text(&self, bytes: &[u8]) -> TaskResult {
        match self.decode_document(bytes) {
            Ok(document) => TaskResult::Text(document.text),
            Err(e) => TaskResult::Failed(TaskFailure::Decode(e.to_string())),
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Tasks
    // ═══════════════════════════════════════════════════════════

    pub fn resume_score(&self, resume: &str) -> TaskResult {
        self.run(&TaskRequest::new(TaskKind::ResumeScore).with_resume(resume))
    }

    pub fn job_match(&self, resume: &str, job_description: &str) -> TaskResult {
        self.run(
            &TaskRequest::new(TaskKind::JobMatch)
                .with_resume(resume)
                .with_job_description(job_description),
        )
    }

    pub fn optimization_bullets(&self, resume: &str, job_description: &str) -> TaskResult {
        self.run(
            &TaskRequest::new(TaskKind::OptimizationBullets)
                .with_resume(resume)
                .with_job_description(job_description),
        )
    }

    pub fn keyword_extraction(&self, job_description: &str) -> TaskResult {
        self.run(&TaskRequest::new(TaskKind::KeywordExtraction).with_job_description(job_description))
    }

    pub fn cover_letter(&self, resume: &str, job_description: &str, company: &str) -> TaskResult {
        self.run(
            &TaskRequest::new(TaskKind::CoverLetter)
                .with_resume(resume)
                .with_job_description(job_description)
                .with_company(company),
        )
    }

    pub fn skill_gap(&self, resume: &str, job_description: &str) -> TaskResult {
        self.run(
            &TaskRequest::new(TaskKind::SkillGap)
                .with_resume(resume)
                .with_job_description(job_description),
        )
    }

    pub fn elevator_pitch(&self, resume: &str, job_description: &str) -> TaskResult {
        self.run(
            &TaskRequest::new(TaskKind::ElevatorPitch)
                .with_resume(resume)
                .with_job_description(job_description),
        )
    }

    /// `location` of `None` means the United States.
    pub fn salary_research(
        &self,
        job_title: &str,
        years_experience: u32,
        location: Option<&str>,
    ) -> TaskResult {
        let mut request = TaskRequest::new(TaskKind::SalaryResearch)
            .with_job_title(job_title)
            .with_years_experience(years_experience);
        if let Some(location) = location {
            request = request.with_location(location);
        }
        self.run(&request)
    }

    pub fn culture_analysis(&self, company: &str, industry: &str) -> TaskResult {
        self.run(
            &TaskRequest::new(TaskKind::CultureAnalysis)
                .with_company(company)
                .with_industry(industry),
        )
    }

    /// Run any task, dating cover letters with today's local date.
    pub fn run(&self, request: &TaskRequest) -> TaskResult {
        self.run_on(request, Local::now().date_naive())
    }

    /// Run any task with an explicit date.
    pub fn run_on(&self, request: &TaskRequest, today: NaiveDate) -> TaskResult {
        let _span = tracing::info_span!("task", task = %request.kind, model = %self.model_name())
            .entered();

        let prepared = self.prepare(request);
        let prompt = match prepared.prompt(today) {
            Ok(prompt) => prompt,
            Err(failure) => {
                tracing::warn!(error = %failure, "Task rejected before calling the service");
                return TaskResult::Failed(failure);
            }
        };

        let outcome = self.client.call(&prompt);
        tracing::debug!(attempts = outcome.attempts.len(), "Service call resolved");

        let text = match outcome.result {
            Ok(text) => text,
            Err(failure) => return TaskResult::Failed(service_failure(failure)),
        };

        if text.trim().is_empty() {
            tracing::warn!("Service returned an empty reply");
            return TaskResult::Failed(TaskFailure::EmptyResponse);
        }

        match request.kind {
            TaskKind::KeywordExtraction => match extract_json_array(&text) {
                Ok(keywords) => {
                    tracing::info!(count = keywords.len(), "Keywords extracted");
                    TaskResult::Keywords(keywords)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Error extracting keywords");
                    TaskResult::Failed(TaskFailure::Parse(e.to_string()))
                }
            },
            _ => TaskResult::Text(text),
        }
    }

    /// Apply the input cap to the long free-text fields.
    fn prepare(&self, request: &TaskRequest) -> TaskRequest {
        let mut prepared = request.clone();
        prepared.resume = prepare_input(&request.resume, self.max_input_chars, "resume").text;
        prepared.job_description =
            prepare_input(&request.job_description, self.max_input_chars, "job_description").text;
        prepared
    }
}

fn service_failure(failure: ServiceFailure) -> TaskFailure {
    match failure {
        ServiceFailure::RateLimited { .. } => TaskFailure::RateLimited,
        ServiceFailure::Unavailable(e) => TaskFailure::Unavailable(e.to_string()),
        ServiceFailure::RetriesExhausted => TaskFailure::RetriesExhausted,
    }
}
