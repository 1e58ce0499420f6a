use crate::embedding::Embedding;
use crate::error::{MatchError, Result};

/// Guard against a zero denominator for degenerate all-zero vectors.
const EPSILON: f32 = 1e-9;

/// Cosine similarity of two equal-length vectors. Unequal lengths are a
/// caller bug and fail loudly rather than silently truncating.
pub fn cosine(a: &Embedding, b: &Embedding) -> Result<f32> {
    if a.len() != b.len() {
        return Err(MatchError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let mut dot = 0.0f32;
    let mut a_norm = 0.0f32;
    let mut b_norm = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        a_norm += x * x;
        b_norm += y * y;
    }
    Ok(dot / (a_norm.sqrt() * b_norm.sqrt() + EPSILON))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_similarity_is_one() {
        let v = vec![0.3f32, -0.7, 0.2, 0.9];
        let score = cosine(&v, &v).unwrap();
        assert!((score - 1.0).abs() < 1e-4);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let a = vec![1.0f32, 0.0];
        let b = vec![0.0f32, 1.0];
        assert!(cosine(&a, &b).unwrap().abs() < 1e-6);
    }

    #[test]
    fn opposite_vectors_score_negative_one() {
        let a = vec![0.5f32, -0.25, 0.125];
        let b: Vec<f32> = a.iter().map(|v| -v).collect();
        let score = cosine(&a, &b).unwrap();
        assert!((score + 1.0).abs() < 1e-4);
    }

    #[test]
    fn zero_vectors_do_not_divide_by_zero() {
        let zero = vec![0.0f32; 8];
        assert_eq!(cosine(&zero, &zero).unwrap(), 0.0);
    }

    #[test]
    fn mismatched_lengths_error() {
        let a = vec![1.0f32; 4];
        let b = vec![1.0f32; 5];
        match cosine(&a, &b) {
            Err(MatchError::DimensionMismatch { left, right }) => {
                assert_eq!(left, 4);
                assert_eq!(right, 5);
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }
}
