//! Token-hash embeddings.
//!
//! Each token is hashed with FNV-1a into one of [`DIMENSIONS`] buckets with a
//! hash-derived sign, then the vector is L2-normalized. Identical tokens land
//! in the same bucket, so cosine similarity measures weighted token overlap.

/// Embedding width.
pub const DIMENSIONS: usize = 256;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001b3;

fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Lowercased alphanumeric tokens with a light plural fold ("games" -> "game").
fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| match t.strip_suffix('s') {
            Some(stem) if stem.len() >= 3 && !stem.ends_with('s') => stem.to_string(),
            _ => t.to_string(),
        })
        .collect()
}

fn add_feature(vector: &mut [f32], feature: &str, weight: f32) {
    let hash = fnv1a64(feature.as_bytes());
    let idx = (hash % DIMENSIONS as u64) as usize;
    let sign = if (hash >> 32) & 1 == 0 { 1.0 } else { -1.0 };
    vector[idx] += sign * weight;
}

/// Embed text into a unit vector (all zeros if it has no tokens).
pub fn embed(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; DIMENSIONS];
    let tokens = tokens(text);

    for token in &tokens {
        add_feature(&mut vector, &format!("t:{token}"), 1.0);
    }
    for pair in tokens.windows(2) {
        add_feature(&mut vector, &format!("b:{}_{}", pair[0], pair[1]), 0.5);
    }

    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut vector {
            *v /= norm;
        }
    }
    vector
}

/// Cosine similarity of two unit vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_is_normalized() {
        let v = embed("Pandemic - Cooperative game");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        assert!(embed("  -- ").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_identical_text_has_similarity_one() {
        let a = embed("Azul - Abstract game");
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_plural_folding() {
        assert_eq!(tokens("Party games, Cards"), vec!["party", "game", "card"]);
        // Short words and double-s endings stay intact
        assert_eq!(tokens("bus class"), vec!["bus", "class"]);
    }
}
