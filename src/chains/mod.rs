// src/chains/mod.rs
use crate::llm::{Completer, LlmError};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

pub mod prompts;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("content too big or response was malformed; unable to parse job posting")]
    Malformed,

    #[error("job posting JSON missing required field `{0}`")]
    MissingField(&'static str),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Structured job posting extracted from one scraped page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub role: String,
    pub experience: String,
    pub skills: String,
    pub description: String,
}

/// The two prompt chains: job extraction and cold-email drafting.
pub struct Chain {
    llm: Box<dyn Completer>,
    title_pattern: Regex,
}

impl Chain {
    pub fn new(llm: Box<dyn Completer>) -> Self {
        // Tolerates both ASCII and typographic apostrophes in "I'd"
        let title_pattern = Regex::new(
            "(Hi, I just came across the )(.*?)( position and I believe I['\u{2019}]d be a great fit)",
        )
        .expect("invalid email title pattern");

        Self { llm, title_pattern }
    }

    /// Extract exactly one job posting from cleaned page text.
    ///
    /// When the parsed role does not contain `fallback_title` as a
    /// case-insensitive substring, the role is overwritten with the
    /// fallback. This guards against the model inventing a different
    /// title than the page's literal heading.
    pub async fn extract_job(
        &self,
        cleaned_text: &str,
        fallback_title: Option<&str>,
    ) -> Result<JobPosting, ExtractionError> {
        let prompt = prompts::extraction_prompt(cleaned_text);
        let raw = self.llm.complete(&prompt).await?;

        let mut job = parse_job_posting(&raw)?;
        if let Some(title) = fallback_title {
            if !job.role.is_empty() && !job.role.to_lowercase().contains(&title.to_lowercase()) {
                warn!(
                    "Extracted role {:?} does not match page title, using {:?}",
                    job.role, title
                );
                job.role = title.to_string();
            }
        }

        info!("Extracted job posting for role: {}", job.role);
        Ok(job)
    }

    /// Draft a cold email for the role, then force the role name in the
    /// opening sentence to match `role` verbatim even if the model
    /// paraphrased it.
    pub async fn write_mail(
        &self,
        role: &str,
        job_description: &str,
        experience: &str,
    ) -> Result<String, LlmError> {
        let prompt = prompts::email_prompt(role, job_description, experience);
        let raw = self.llm.complete(&prompt).await?;
        Ok(self.fix_title_in_email(&raw, role))
    }

    fn fix_title_in_email(&self, email: &str, correct_title: &str) -> String {
        self.title_pattern
            .replace_all(email, |caps: &Captures| {
                format!("{}{}{}", &caps[1], correct_title, &caps[3])
            })
            .into_owned()
    }
}

/// Parse the raw LLM response as a single JSON object with the four
/// required keys. Models wrap JSON in markdown fences or preamble text
/// often enough that the object is located first, then parsed strictly.
fn parse_job_posting(raw: &str) -> Result<JobPosting, ExtractionError> {
    let span = extract_json_span(raw).ok_or(ExtractionError::Malformed)?;
    let value: Value = serde_json::from_str(span).map_err(|_| ExtractionError::Malformed)?;

    if !value.is_object() {
        return Err(ExtractionError::Malformed);
    }

    Ok(JobPosting {
        role: field_as_string(&value, "role")?,
        experience: field_as_string(&value, "experience")?,
        skills: field_as_string(&value, "skills")?,
        description: field_as_string(&value, "description")?,
    })
}

/// Read a field as a string, joining string arrays with ", " since the
/// model is allowed to return `skills` as a list.
fn field_as_string(value: &Value, key: &'static str) -> Result<String, ExtractionError> {
    match value.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Array(items)) => {
            let parts: Vec<&str> = items.iter().filter_map(|item| item.as_str()).collect();
            if parts.is_empty() {
                Err(ExtractionError::MissingField(key))
            } else {
                Ok(parts.join(", "))
            }
        }
        _ => Err(ExtractionError::MissingField(key)),
    }
}

fn extract_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Completer returning canned responses in order.
    struct MockCompleter {
        responses: Mutex<Vec<String>>,
    }

    impl MockCompleter {
        fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().map(String::from).collect()),
            }
        }
    }

    #[async_trait]
    impl Completer for MockCompleter {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            self.responses
                .lock()
                .expect("poisoned mock")
                .pop()
                .ok_or(LlmError::EmptyCompletion)
        }
    }

    const WELL_FORMED: &str = r#"{"role": "Data Analyst II", "experience": "2+ years with SQL.",
        "skills": "SQL, Excel", "description": "Analyze business data."}"#;

    #[test]
    fn test_parse_well_formed_response() {
        let job = parse_job_posting(WELL_FORMED).unwrap();
        assert_eq!(job.role, "Data Analyst II");
        assert_eq!(job.skills, "SQL, Excel");
        assert_eq!(job.description, "Analyze business data.");
    }

    #[test]
    fn test_parse_tolerates_code_fences() {
        let raw = format!("```json\n{}\n```", WELL_FORMED);
        let job = parse_job_posting(&raw).unwrap();
        assert_eq!(job.role, "Data Analyst II");
    }

    #[test]
    fn test_parse_skills_array_joined() {
        let raw = r#"{"role": "ML Engineer", "experience": "x",
            "skills": ["Python", "PyTorch"], "description": "y"}"#;
        let job = parse_job_posting(raw).unwrap();
        assert_eq!(job.skills, "Python, PyTorch");
    }

    #[test]
    fn test_parse_malformed_response_fails() {
        assert!(matches!(
            parse_job_posting("Sorry, the page was too long to process."),
            Err(ExtractionError::Malformed)
        ));
        assert!(matches!(
            parse_job_posting("{not json at all"),
            Err(ExtractionError::Malformed)
        ));
    }

    #[test]
    fn test_parse_missing_field_fails() {
        let raw = r#"{"role": "QA Engineer", "experience": "x", "skills": "y"}"#;
        assert!(matches!(
            parse_job_posting(raw),
            Err(ExtractionError::MissingField("description"))
        ));
    }

    #[tokio::test]
    async fn test_extract_job_overwrites_role_with_fallback_title() {
        let response = r#"{"role": "Business Intelligence Analyst", "experience": "x",
            "skills": "y", "description": "z"}"#;
        let chain = Chain::new(Box::new(MockCompleter::new(vec![response])));
        let job = chain
            .extract_job("page text", Some("Analyst, IT BI"))
            .await
            .unwrap();
        assert_eq!(job.role, "Analyst, IT BI");
    }

    #[tokio::test]
    async fn test_extract_job_keeps_role_containing_fallback_title() {
        let response = r#"{"role": "Senior Data Analyst II (Remote)", "experience": "x",
            "skills": "y", "description": "z"}"#;
        let chain = Chain::new(Box::new(MockCompleter::new(vec![response])));
        let job = chain
            .extract_job("page text", Some("data analyst ii"))
            .await
            .unwrap();
        assert_eq!(job.role, "Senior Data Analyst II (Remote)");
    }

    #[tokio::test]
    async fn test_write_mail_fixes_role_in_opening_sentence() {
        let email = "Hey, I hope you are doing well.\n\
            Hi, I just came across the Software Engineer position and I believe I'd be a great fit. Here's why:\n\
            - Your role is focused on APIs.\n\
            Would you be open to a quick coffee chat this week to explore this further?";
        let chain = Chain::new(Box::new(MockCompleter::new(vec![email])));
        let fixed = chain.write_mail("Backend Developer", "desc", "exp").await.unwrap();
        assert!(fixed.contains(
            "Hi, I just came across the Backend Developer position and I believe I'd be a great fit"
        ));
        assert!(!fixed.contains("Software Engineer"));
        assert!(fixed.contains("Your role is focused on APIs."));
        assert!(fixed.starts_with("Hey, I hope you are doing well."));
    }

    #[tokio::test]
    async fn test_write_mail_handles_typographic_apostrophe() {
        let email = "Hi, I just came across the Data Scientist position and I believe I\u{2019}d be a great fit.";
        let chain = Chain::new(Box::new(MockCompleter::new(vec![email])));
        let fixed = chain.write_mail("Ml Engineer", "desc", "exp").await.unwrap();
        assert!(fixed.contains("the Ml Engineer position"));
    }
}
