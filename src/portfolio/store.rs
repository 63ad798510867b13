// src/portfolio/store.rs
use super::embedding;
use chrono::Utc;
use sqlx::SqlitePool;
use std::cmp::Ordering;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("vector store unavailable: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("failed to prepare vector store directory: {0}")]
    Io(#[from] std::io::Error),
}

/// One stored experience snippet returned by a similarity query.
#[derive(Debug, Clone)]
pub struct RetrievedExperience {
    pub document: String,
    pub role: String,
    pub skills: String,
    pub score: f32,
}

/// Persistent experience collection backed by SQLite. Documents are
/// stored with their embedding BLOB and ranked in-process by cosine
/// similarity at query time.
pub struct VectorStore {
    pool: SqlitePool,
}

impl VectorStore {
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&database_url).await?;

        let store = Self { pool };
        store.migrate().await?;

        info!("Vector store ready: {}", database_url);
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS experiences (
                id TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                role TEXT NOT NULL,
                skills TEXT NOT NULL,
                embedding BLOB NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM experiences")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn add(
        &self,
        id: &str,
        document: &str,
        role: &str,
        skills: &str,
    ) -> Result<(), StoreError> {
        let blob = embedding::to_blob(&embedding::embed(document));

        sqlx::query(
            "INSERT INTO experiences (id, document, role, skills, embedding, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(document)
        .bind(role)
        .bind(skills)
        .bind(blob)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Return the `k` stored documents most similar to the query text,
    /// best match first. Empty result when the collection is empty.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievedExperience>, StoreError> {
        let query_vector = embedding::embed(text);

        let rows: Vec<(String, String, String, Vec<u8>)> =
            sqlx::query_as("SELECT document, role, skills, embedding FROM experiences")
                .fetch_all(&self.pool)
                .await?;

        let mut scored: Vec<RetrievedExperience> = rows
            .into_iter()
            .map(|(document, role, skills, blob)| RetrievedExperience {
                score: embedding::cosine_similarity(&query_vector, &embedding::from_blob(&blob)),
                document,
                role,
                skills,
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn open_temp_store() -> (tempfile::TempDir, VectorStore) {
        let dir = tempdir().expect("tempdir");
        let store = VectorStore::open(&dir.path().join("vectorstore.db"))
            .await
            .expect("open store");
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_starts_empty() {
        let (_dir, store) = open_temp_store().await;
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.query("data analyst", 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_count() {
        let (_dir, store) = open_temp_store().await;
        store
            .add("id-1", "Built dashboards in Tableau", "Data Analyst", "SQL, Tableau")
            .await
            .unwrap();
        store
            .add("id-2", "Trained ML models", "Ml Engineer", "Python")
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_query_returns_top_k_best_first() {
        let (_dir, store) = open_temp_store().await;
        store
            .add(
                "id-1",
                "Analyzed data and built data analyst dashboards",
                "Data Analyst",
                "SQL",
            )
            .await
            .unwrap();
        store
            .add("id-2", "Wrote backend services in Rust", "Software Engineer", "Rust")
            .await
            .unwrap();
        store
            .add("id-3", "Automated QA test suites", "Qa Engineer", "Selenium")
            .await
            .unwrap();

        let results = store.query("data analyst", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].role, "Data Analyst");
        assert!(results[0].score >= results[1].score);
    }
}
