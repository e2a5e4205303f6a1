//! Cosine similarity between two embedding vectors.

use super::error::ScoreError;

/// Cosine similarity: `dot(a, b) / (|a| * |b|)`, clamped to `[-1, 1]`.
///
/// Accumulates in `f64`. Both vectors must be non-empty and of equal length.
/// Returns `NaN` when either vector has zero magnitude; callers treat that as a
/// non-match.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, ScoreError> {
    if a.len() != b.len() {
        return Err(ScoreError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(ScoreError::Empty);
    }

    let (mut dot, mut mag_a, mut mag_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom == 0.0 {
        return Ok(f64::NAN);
    }
    Ok((dot / denom).clamp(-1.0, 1.0))
}

/// Express a similarity as a percentage rounded to two decimals.
pub fn percentage(score: f64) -> f64 {
    (score * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = [0.3, -1.2, 4.0, 0.0];
        let s = cosine_similarity(&v, &v).unwrap();
        assert!((s - 1.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn orthogonal_and_opposite() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
        let s = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((s + 1.0).abs() < 1e-9);
    }

    #[test]
    fn magnitude_does_not_matter() {
        let s = cosine_similarity(&[1.0, 1.0], &[10.0, 10.0]).unwrap();
        assert!((s - 1.0).abs() < 1e-9);
        let s = cosine_similarity(&[3.0, 4.0], &[4.0, 3.0]).unwrap();
        assert!((s - 0.96).abs() < 1e-6);
    }

    #[test]
    fn scores_stay_in_bounds() {
        let vectors: [&[f32]; 5] = [
            &[0.1, 0.2, 0.3],
            &[-5.0, 0.5, 2.5],
            &[1e-3, 1e3, -7.0],
            &[0.333, 0.333, 0.333],
            &[-1.0, -1.0, -1.0],
        ];
        for a in vectors {
            for b in vectors {
                let s = cosine_similarity(a, b).unwrap();
                assert!((-1.0..=1.0).contains(&s), "{a:?} vs {b:?} gave {s}");
                let flipped = cosine_similarity(b, a).unwrap();
                assert!((s - flipped).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn zero_magnitude_is_nan() {
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap().is_nan());
        assert!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]).unwrap().is_nan());
    }

    #[test]
    fn mismatched_or_empty_is_an_error() {
        assert_eq!(
            cosine_similarity(&[1.0, 2.0], &[1.0]),
            Err(ScoreError::DimensionMismatch { left: 2, right: 1 })
        );
        assert_eq!(cosine_similarity(&[], &[]), Err(ScoreError::Empty));
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(0.123456), 12.35);
        assert_eq!(percentage(1.0), 100.0);
        assert_eq!(percentage(-0.5), -50.0);
        assert_eq!(percentage(0.0), 0.0);
    }
}
