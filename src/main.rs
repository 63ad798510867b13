use anyhow::Result;
use clap::{Parser, Subcommand};
use email_generator::chains::Chain;
use email_generator::environment::EnvironmentConfig;
use email_generator::llm::GroqClient;
use email_generator::portfolio::Portfolio;
use email_generator::scrape::JobScraper;
use email_generator::{generate_cold_email, start_web_server};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "coldmail")]
#[command(about = "Cold outreach email generator for scraped job postings")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve {
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Generate one email for a job URL and print it to stdout
    Generate {
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = EnvironmentConfig::load()?;

    info!("Portfolio CSV: {}", config.portfolio_csv_path.display());
    info!("Vector store: {}", config.vector_store_path.display());
    info!("Model: {}", config.groq_model);

    match cli.command.unwrap_or(Command::Serve { port: 8000 }) {
        Command::Serve { port } => start_web_server(config, port).await,
        Command::Generate { url } => run_generate(config, url).await,
    }
}

async fn run_generate(config: EnvironmentConfig, url: Option<String>) -> Result<()> {
    let url = url.unwrap_or_else(|| config.default_job_url.clone());

    let llm = GroqClient::from_env(config.groq_base_url.clone(), config.groq_model.clone())?;
    let chain = Chain::new(Box::new(llm));
    let scraper = JobScraper::new();
    let portfolio = Portfolio::open(&config.portfolio_csv_path, &config.vector_store_path).await?;

    let generated = generate_cold_email(&scraper, &chain, &portfolio, &url).await?;

    println!("Email for Role: {}", generated.role);
    println!();
    println!("{}", generated.email);

    Ok(())
}
