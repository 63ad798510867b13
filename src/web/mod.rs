// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use handlers::AppState;
pub use types::*;

use crate::chains::Chain;
use crate::environment::EnvironmentConfig;
use crate::llm::GroqClient;
use crate::portfolio::Portfolio;
use crate::scrape::JobScraper;
use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::{get, options, post, routes, Request, Response, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/generate-email", data = "<request>")]
pub async fn generate_email(
    request: Json<GenerateEmailRequest>,
    state: &State<AppState>,
) -> Result<Json<EmailResponse>, Json<ErrorResponse>> {
    handlers::generate_email_handler(request, state).await
}

#[get("/health")]
pub fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[options("/<_..>")]
pub fn all_options() {
    // CORS preflight, headers are set by the fairing
}

/// Build the shared application state and launch the Rocket server.
pub async fn start_web_server(config: EnvironmentConfig, port: u16) -> Result<()> {
    let llm = GroqClient::from_env(config.groq_base_url.clone(), config.groq_model.clone())
        .context("Failed to initialize LLM client")?;

    let portfolio = Portfolio::open(&config.portfolio_csv_path, &config.vector_store_path)
        .await
        .context("Failed to open portfolio")?;

    let state = AppState {
        scraper: JobScraper::new(),
        chain: Chain::new(Box::new(llm)),
        portfolio,
        default_job_url: config.default_job_url.clone(),
    };

    info!("Starting cold email generator API on port {}", port);

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .mount("/", routes![generate_email, health, all_options])
        .launch()
        .await
        .context("Rocket server failed")?;

    Ok(())
}
