pub mod chains;
pub mod environment;
pub mod llm;
pub mod pipeline;
pub mod portfolio;
pub mod scrape;
pub mod utils;
pub mod web;

pub use chains::{Chain, JobPosting};
pub use pipeline::{generate_cold_email, GeneratedEmail, PipelineError};
pub use web::start_web_server;
