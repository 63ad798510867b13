// src/portfolio/embedding.rs
// Feature-hashed bag-of-words embeddings. The portfolio holds a handful
// of snippets, so a deterministic local embedding with cosine similarity
// is enough for top-k retrieval and keeps queries fully offline.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const EMBEDDING_DIM: usize = 256;

/// Embed text as an L2-normalized hashed term-frequency vector.
pub fn embed(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; EMBEDDING_DIM];

    for token in tokenize(text) {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let bucket = (hasher.finish() % EMBEDDING_DIM as u64) as usize;
        vector[bucket] += 1.0;
    }

    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut vector {
            *v /= norm;
        }
    }

    vector
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Serialize an embedding as little-endian f32 bytes for BLOB storage.
pub fn to_blob(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn from_blob(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_is_deterministic() {
        assert_eq!(embed("data analyst dashboards"), embed("data analyst dashboards"));
    }

    #[test]
    fn test_embed_is_normalized_and_case_insensitive() {
        let vector = embed("Built ETL pipelines in Python");
        assert_eq!(vector.len(), EMBEDDING_DIM);
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);

        assert_eq!(embed("Data Analyst"), embed("data analyst"));
    }

    #[test]
    fn test_similar_text_scores_higher() {
        let query = embed("data analyst");
        let close = embed("data analyst dashboards and SQL reporting");
        let far = embed("kernel driver development in C");
        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }

    #[test]
    fn test_blob_round_trip() {
        let vector = embed("software engineer backend services");
        assert_eq!(from_blob(&to_blob(&vector)), vector);
    }

    #[test]
    fn test_empty_text_embeds_to_zero_vector() {
        let vector = embed("   ");
        assert!(vector.iter().all(|v| *v == 0.0));
        assert_eq!(cosine_similarity(&vector, &embed("anything")), 0.0);
    }
}
