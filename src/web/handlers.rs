// src/web/handlers.rs
use crate::chains::{Chain, ExtractionError};
use crate::pipeline::{self, PipelineError};
use crate::portfolio::Portfolio;
use crate::scrape::JobScraper;
use crate::web::types::{EmailResponse, ErrorResponse, GenerateEmailRequest};
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

/// Everything one request needs, shared across the Rocket workers.
pub struct AppState {
    pub scraper: JobScraper,
    pub chain: Chain,
    pub portfolio: Portfolio,
    pub default_job_url: String,
}

pub async fn generate_email_handler(
    request: Json<GenerateEmailRequest>,
    state: &State<AppState>,
) -> Result<Json<EmailResponse>, Json<ErrorResponse>> {
    let url = request
        .url
        .clone()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| state.default_job_url.clone());

    info!("Generating cold email for job posting: {}", url);

    match pipeline::generate_cold_email(&state.scraper, &state.chain, &state.portfolio, &url).await
    {
        Ok(generated) => {
            info!("Generated email for role: {}", generated.role);
            Ok(Json(EmailResponse {
                success: true,
                role: generated.role,
                general_role: generated.general_role.label().to_string(),
                email: generated.email,
            }))
        }
        Err(e) => {
            error!("Email generation failed: {}", e);
            Err(Json(ErrorResponse::new(e.to_string(), error_code(&e))))
        }
    }
}

fn error_code(err: &PipelineError) -> &'static str {
    match err {
        PipelineError::Scrape(_) => "NETWORK_ERROR",
        PipelineError::Extraction(ExtractionError::Llm(_)) => "LLM_ERROR",
        PipelineError::Extraction(_) => "EXTRACTION_ERROR",
        PipelineError::Portfolio(_) => "STORE_ERROR",
        PipelineError::Llm(_) => "LLM_ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::portfolio::PortfolioError;
    use crate::scrape::ScrapeError;

    #[test]
    fn test_error_codes_map_per_stage() {
        let scrape = PipelineError::Scrape(ScrapeError::Status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        ));
        assert_eq!(error_code(&scrape), "NETWORK_ERROR");

        let extraction = PipelineError::Extraction(ExtractionError::Malformed);
        assert_eq!(error_code(&extraction), "EXTRACTION_ERROR");

        let extraction_llm =
            PipelineError::Extraction(ExtractionError::Llm(LlmError::EmptyCompletion));
        assert_eq!(error_code(&extraction_llm), "LLM_ERROR");

        let store = PipelineError::Portfolio(PortfolioError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing csv",
        )));
        assert_eq!(error_code(&store), "STORE_ERROR");

        let llm = PipelineError::Llm(LlmError::EmptyCompletion);
        assert_eq!(error_code(&llm), "LLM_ERROR");
    }
}
