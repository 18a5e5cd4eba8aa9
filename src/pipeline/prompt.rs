//! Prompt catalog: one pure builder per task kind.
//!
//! Each builder embeds the output shape it expects back (word caps, bullet
//! format, JSON array). Builders never fail and never truncate; input
//! preparation happens before they are called.

use chrono::NaiveDate;

use super::task::{TaskFailure, TaskKind, TaskRequest};

/// Date format used in generated cover letters, e.g. "October 19, 2026".
pub const COVER_LETTER_DATE_FORMAT: &str = "%B %d, %Y";

pub fn build_resume_score_prompt(resume: &str) -> String {
    format!(
        r#"Analyze this resume briefly:

{resume}

Provide a VERY CONCISE analysis (maximum 200 words):
1. Resume Score (0-100)
2. Top 5 skills identified
3. One-line experience summary
4. Three quick improvement suggestions
"#
    )
}

pub fn build_job_match_prompt(resume: &str, job_description: &str) -> String {
    format!(
        r#"Compare this resume and job description quickly:

RESUME:
{resume}

JOB DESCRIPTION:
{job_description}

Provide a VERY BRIEF analysis (maximum 250 words):
1. Match Score (0-100)
2. Top 3 matching skills
3. Top 3 missing skills
4. Three specific improvement tips
"#
    )
}

pub fn build_optimization_bullets_prompt(resume: &str, job_description: &str) -> String {
    format!(
        r#"Based on this resume and job description, provide ONLY 5-7 key bullet points
that should be added to the resume to better match the job.

RESUME:
{resume}

JOB DESCRIPTION:
{job_description}

Format as bullet points (•).
"#
    )
}

pub fn build_keyword_extraction_prompt(job_description: &str) -> String {
    format!(
        r#"Extract the most important skills, technologies, and qualifications from this job description:

{job_description}

Return ONLY a JSON array of strings containing the top 10-15 keywords/phrases.
Format: ["keyword1", "keyword2", "keyword3", ...]
"#
    )
}

/// `today` is injected so the builder stays pure.
pub fn build_cover_letter_prompt(
    resume: &str,
    job_description: &str,
    company: &str,
    today: NaiveDate,
) -> String {
    let date = today.format(COVER_LETTER_DATE_FORMAT);
    format!(
        r#"Create a professional cover letter based on this resume and job description:

RESUME:
{resume}

JOB DESCRIPTION:
{job_description}

COMPANY:
{company}

Write a concise, compelling cover letter that:
1. Highlights relevant experience from the resume
2. Shows enthusiasm for the specific company
3. Addresses key requirements from the job description
4. Maintains a professional but personable tone
5. Is properly formatted with today's date and appropriate salutation/closing

Use today's date: {date}
"#
    )
}

pub fn build_skill_gap_prompt(resume: &str, job_description: &str) -> String {
    format!(
        r#"Analyze the skill gaps between this resume and job description:

RESUME:
{resume}

JOB DESCRIPTION:
{job_description}

Provide:
1. A list of specific skills/qualifications missing from the resume but required in the job
2. For each missing skill, suggest a specific learning resource (course, certification, or practice project)
3. Estimate the time investment needed to acquire each skill (in weeks/months)

Format as a clear, structured list with main skills as headings.
"#
    )
}

pub fn build_elevator_pitch_prompt(resume: &str, job_description: &str) -> String {
    format!(
        r#"Create a compelling 30-second elevator pitch based on this resume and job description:

RESUME:
{resume}

JOB DESCRIPTION:
{job_description}

The elevator pitch should:
1. Highlight the candidate's most relevant skills and experience
2. Align with the specific job requirements
3. Include a unique value proposition
4. Be conversational and engaging (approximately 100 words)
5. End with a strong closing statement

Write this in first person as if the candidate is speaking.
"#
    )
}

pub fn build_salary_research_prompt(job_title: &str, years_experience: u32, location: &str) -> String {
    format!(
        r#"Provide salary information for:

JOB TITLE: {job_title}
EXPERIENCE: {years_experience} years
LOCATION: {location}

Include:
1. Estimated salary range (low, median, high)
2. Factors that might affect compensation
3. Additional benefits commonly offered for this position

Note: This is general information only, based on industry averages.
"#
    )
}

pub fn build_culture_analysis_prompt(company: &str, industry: &str) -> String {
    format!(
        r#"Provide a brief analysis of company culture for preparation:

COMPANY: {company}
INDUSTRY: {industry}

Include:
1. Key values the company likely emphasizes
2. Work environment characteristics
3. How to align your application materials with their culture

Note: This is general guidance based on industry trends and publicly available information.
"#
    )
}

impl TaskRequest {
    /// Build the prompt for this request's kind.
    ///
    /// Fails only when a required field is missing; `today` is used by the
    /// cover letter and ignored otherwise.
    pub fn prompt(&self, today: NaiveDate) -> Result<String, TaskFailure> {
        if let Some(field) = self.missing_field() {
            return Err(TaskFailure::MissingField(field));
        }

        let prompt = match self.kind {
            TaskKind::ResumeScore => build_resume_score_prompt(&self.resume),
            TaskKind::JobMatch => build_job_match_prompt(&self.resume, &self.job_description),
            TaskKind::OptimizationBullets => {
                build_optimization_bullets_prompt(&self.resume, &self.job_description)
            }
            TaskKind::KeywordExtraction => build_keyword_extraction_prompt(&self.job_description),
            TaskKind::CoverLetter => build_cover_letter_prompt(
                &self.resume,
                &self.job_description,
                &self.company,
                today,
            ),
            TaskKind::SkillGap => build_skill_gap_prompt(&self.resume, &self.job_description),
            TaskKind::ElevatorPitch => {
                build_elevator_pitch_prompt(&self.resume, &self.job_description)
            }
            TaskKind::SalaryResearch => build_salary_research_prompt(
                &self.job_title,
                self.years_experience.unwrap_or_default(),
                &self.location,
            ),
            TaskKind::CultureAnalysis => {
                build_culture_analysis_prompt(&self.company, &self.industry)
            }
        };

        Ok(prompt)
    }
}
