//! In-memory vector index with cosine top-k search.
//!
//! Holds one normalized vector per chunk, addressed by position. Rebuilt
//! whenever the owning document changes; the chunk cache is the persistent
//! layer, the index never touches disk.

use super::traits::{Embedder, EmbeddingError};

#[derive(Default)]
pub struct VectorIndex {
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed `texts` in batches and index them in order.
    pub async fn build(
        texts: &[&str],
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> Result<Self, EmbeddingError> {
        let mut index = Self::new();
        for batch in texts.chunks(batch_size.max(1)) {
            let embeddings = embedder.embed_batch(batch).await?;
            for embedding in embeddings {
                index.add(embedding);
            }
        }
        Ok(index)
    }

    /// Add a vector; stored normalized so search is a dot product.
    pub fn add(&mut self, mut vector: Vec<f32>) {
        normalize(&mut vector);
        self.vectors.push(vector);
    }

    /// Top-k most similar entries as `(position, cosine similarity)`,
    /// best first.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<(usize, f32)> {
        let mut query = query.to_vec();
        normalize(&mut query);

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(&query, v)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[test]
    fn search_ranks_by_cosine_similarity() {
        let mut index = VectorIndex::new();
        index.add(vec![1.0, 0.0]);
        index.add(vec![0.0, 1.0]);
        index.add(vec![1.0, 1.0]);

        let results = index.search(&[1.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0);
        assert!((results[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(results[1].0, 2);
    }

    #[test]
    fn search_handles_k_larger_than_index() {
        let mut index = VectorIndex::new();
        index.add(vec![1.0, 0.0]);
        let results = index.search(&[1.0, 0.0], 10);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn zero_vector_scores_zero() {
        let mut index = VectorIndex::new();
        index.add(vec![0.0, 0.0]);
        let results = index.search(&[1.0, 0.0], 1);
        assert_eq!(results[0].1, 0.0);
    }

    struct CountingEmbedder {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn build_batches_embedding_calls() {
        let embedder = CountingEmbedder {
            calls: std::sync::atomic::AtomicUsize::new(0),
        };
        let texts: Vec<String> = (0..5).map(|i| format!("text {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();

        let index = VectorIndex::build(&refs, &embedder, 2).await.unwrap();
        assert_eq!(index.len(), 5);
        assert_eq!(embedder.calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }
}
