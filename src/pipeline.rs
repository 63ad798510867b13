// src/pipeline.rs
use crate::chains::{Chain, ExtractionError};
use crate::llm::LlmError;
use crate::portfolio::{self, GeneralRole, Portfolio, PortfolioError};
use crate::scrape::{JobScraper, ScrapeError, ScrapedJobPage};
use crate::utils;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Portfolio(#[from] PortfolioError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Final output of one generation request.
#[derive(Debug, Clone)]
pub struct GeneratedEmail {
    pub role: String,
    pub general_role: GeneralRole,
    pub email: String,
}

/// Run the whole flow for one URL: scrape, normalize, extract, classify,
/// retrieve experience, draft the email.
pub async fn generate_cold_email(
    scraper: &JobScraper,
    chain: &Chain,
    portfolio: &Portfolio,
    url: &str,
) -> Result<GeneratedEmail, PipelineError> {
    let page = scraper.fetch(url).await?;
    generate_from_page(chain, portfolio, page).await
}

/// Post-scrape half of the pipeline, separated so it can run against an
/// already-parsed page.
pub async fn generate_from_page(
    chain: &Chain,
    portfolio: &Portfolio,
    page: ScrapedJobPage,
) -> Result<GeneratedEmail, PipelineError> {
    let cleaned = utils::clean_text(&page.body_text);
    let combined_text = format!("Job Title: {}\n\n{}", page.title, cleaned);

    portfolio.load_portfolio().await?;

    let mut job = chain.extract_job(&combined_text, Some(&page.title)).await?;
    // The page heading is authoritative for the role name
    job.role = page.title.clone();

    let job_role = job.role.trim().to_string();
    let job_description = job.description.trim().to_string();

    let general_role = portfolio::map_to_general_role(&job_role);
    info!("Mapped role {:?} to general role {}", job_role, general_role);

    let experience = portfolio.query_experience_by_role(general_role).await?;
    let email = chain.write_mail(&job_role, &job_description, &experience).await?;

    Ok(GeneratedEmail {
        role: job_role,
        general_role,
        email,
    })
}
