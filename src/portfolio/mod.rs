// src/portfolio/mod.rs
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

pub mod embedding;
pub mod store;

pub use store::{RetrievedExperience, StoreError, VectorStore};

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("failed to read portfolio file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse portfolio file: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Closed set of normalized role categories used to group retrieval
/// queries. Free-text job titles are mapped onto these by keyword
/// containment, first table match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralRole {
    DataAnalyst,
    DataScientist,
    SoftwareEngineer,
    QaEngineer,
    MlEngineer,
    DataEngineer,
}

impl GeneralRole {
    pub fn label(&self) -> &'static str {
        match self {
            GeneralRole::DataAnalyst => "Data Analyst",
            GeneralRole::DataScientist => "Data Scientist",
            GeneralRole::SoftwareEngineer => "Software Engineer",
            GeneralRole::QaEngineer => "Qa Engineer",
            GeneralRole::MlEngineer => "Ml Engineer",
            GeneralRole::DataEngineer => "Data Engineer",
        }
    }
}

impl fmt::Display for GeneralRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Ordered trigger table. Order matters: a title containing both "data
// analyst" and "data scientist" classifies as Data Analyst because its
// row comes first.
const ROLE_TRIGGERS: &[(GeneralRole, &[&str])] = &[
    (
        GeneralRole::DataAnalyst,
        &[
            "data analyst",
            "business analyst",
            "financial analyst",
            "portfolio analyst",
            "healthcare analyst",
        ],
    ),
    (
        GeneralRole::DataScientist,
        &["data scientist", "research scientist", "quantitative researcher"],
    ),
    (
        GeneralRole::SoftwareEngineer,
        &["software engineer", "developer", "full stack", "frontend", "backend"],
    ),
    (
        GeneralRole::QaEngineer,
        &[
            "qa engineer",
            "quality engineer",
            "test engineer",
            "automation engineer",
            "performance engineer",
        ],
    ),
    (
        GeneralRole::MlEngineer,
        &["ml engineer", "machine learning", "ai engineer"],
    ),
    (GeneralRole::DataEngineer, &["data engineer", "etl developer"]),
];

/// Map a free-text job title to a general role. Total function: titles
/// matching no trigger default to Data Analyst.
pub fn map_to_general_role(job_title: &str) -> GeneralRole {
    let title = job_title.to_lowercase();
    for (role, triggers) in ROLE_TRIGGERS {
        if triggers.iter().any(|trigger| title.contains(trigger)) {
            return *role;
        }
    }
    GeneralRole::DataAnalyst
}

/// One row of the portfolio CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceRecord {
    #[serde(rename = "Experience")]
    pub experience: String,
    #[serde(rename = "general_role")]
    pub general_role: String,
    #[serde(rename = "Skills")]
    pub skills: String,
}

/// Personal-experience snippets loaded from CSV and served out of the
/// vector store.
pub struct Portfolio {
    records: Vec<ExperienceRecord>,
    store: VectorStore,
}

impl Portfolio {
    pub async fn open(csv_path: &Path, store_path: &Path) -> Result<Self, PortfolioError> {
        let records = read_records(csv_path)?;
        info!(
            "Loaded {} portfolio records from {}",
            records.len(),
            csv_path.display()
        );

        let store = VectorStore::open(store_path).await?;
        Ok(Self { records, store })
    }

    /// Populate the vector store from the CSV records, once. Skipped
    /// whenever the collection already holds entries.
    pub async fn load_portfolio(&self) -> Result<(), PortfolioError> {
        if self.store.count().await? > 0 {
            debug!("Vector store already populated, skipping load");
            return Ok(());
        }

        for record in &self.records {
            let id = Uuid::new_v4().to_string();
            self.store
                .add(&id, &record.experience, &record.general_role, &record.skills)
                .await?;
        }

        info!("Populated vector store with {} experiences", self.records.len());
        Ok(())
    }

    /// Number of experiences currently held by the vector store.
    pub async fn size(&self) -> Result<i64, PortfolioError> {
        Ok(self.store.count().await?)
    }

    /// Retrieve the two most relevant stored experiences for a role,
    /// rendered as "<role>: <experience text>" blocks joined by blank
    /// lines. Empty string when the store has nothing to offer.
    pub async fn query_experience_by_role(
        &self,
        role: GeneralRole,
    ) -> Result<String, PortfolioError> {
        let results = self.store.query(&role.label().to_lowercase(), 2).await?;

        Ok(results
            .iter()
            .map(|r| format!("{}: {}", r.role, r.document))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

fn read_records(path: &Path) -> Result<Vec<ExperienceRecord>, PortfolioError> {
    let bytes = std::fs::read(path)?;
    let text = decode_portfolio_bytes(bytes);

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let records = reader.deserialize().collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

// Spreadsheet CSV exports are sometimes ISO-8859-1 rather than UTF-8;
// every Latin-1 byte maps directly to the same Unicode scalar.
fn decode_portfolio_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    }
}
