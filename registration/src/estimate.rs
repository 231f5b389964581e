//! Closed-form similarity estimation from 3D point correspondences.
//!
//! Least-squares absolute orientation (Umeyama): centroids, cross-covariance,
//! SVD, reflection correction, then scale and translation from the rotation.

use glam::{DMat3, DVec3};
use nalgebra::{Matrix3, Vector3};

use crate::transform::SimilarityTransform3D;

/// Fewest pairs that determine a 3D similarity transform.
pub const MIN_FIT_POINTS: usize = 3;

// Singular values below this fraction of the largest one count as zero.
const RANK_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometricFitError {
    #[error("Point sets differ in length: {source_len} source vs {target_len} target points")]
    MismatchedLengths {
        source_len: usize,
        target_len: usize,
    },
    #[error("Similarity fit needs at least {required} point pairs, got {count}")]
    TooFewPoints { count: usize, required: usize },
    #[error("Degenerate point configuration: {0}")]
    DegenerateConfiguration(&'static str),
}

/// Similarity transform `T` minimizing `Σ |T(source[i]) - target[i]|²`.
pub fn estimate_similarity(
    source: &[DVec3],
    target: &[DVec3],
) -> Result<SimilarityTransform3D, GeometricFitError> {
    if source.len() != target.len() {
        return Err(GeometricFitError::MismatchedLengths {
            source_len: source.len(),
            target_len: target.len(),
        });
    }
    if source.len() < MIN_FIT_POINTS {
        return Err(GeometricFitError::TooFewPoints {
            count: source.len(),
            required: MIN_FIT_POINTS,
        });
    }

    let n = source.len() as f64;
    let source_centroid = centroid(source);
    let target_centroid = centroid(target);

    let mut covariance = Matrix3::<f64>::zeros();
    let mut source_var = 0.0;
    for (s, t) in source.iter().zip(target.iter()) {
        let sc = to_vector3(*s - source_centroid);
        let tc = to_vector3(*t - target_centroid);
        covariance += tc * sc.transpose();
        source_var += sc.norm_squared();
    }
    covariance /= n;
    source_var /= n;

    if !source_var.is_finite() || source_var < 1e-12 {
        return Err(GeometricFitError::DegenerateConfiguration(
            "source points coincide",
        ));
    }

    let svd = covariance.svd(true, true);
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Err(GeometricFitError::DegenerateConfiguration(
            "covariance decomposition failed",
        ));
    };
    let singular = svd.singular_values;

    let largest = singular.iter().copied().fold(0.0_f64, f64::max);
    let rank = singular
        .iter()
        .filter(|&&value| value > largest * RANK_TOLERANCE)
        .count();
    if largest <= 0.0 || rank < 2 {
        return Err(GeometricFitError::DegenerateConfiguration(
            "points are collinear",
        ));
    }

    // Flip the weakest axis when U * V^T would be a reflection.
    let weakest = (0..3)
        .min_by(|&a, &b| singular[a].total_cmp(&singular[b]))
        .unwrap_or(2);
    let mut correction = Matrix3::<f64>::identity();
    if u.determinant() * v_t.determinant() < 0.0 {
        correction[(weakest, weakest)] = -1.0;
    }

    let rotation = u * correction * v_t;
    let trace: f64 = (0..3).map(|i| singular[i] * correction[(i, i)]).sum();
    let scale = trace / source_var;
    if !scale.is_finite() || scale <= 1e-12 {
        return Err(GeometricFitError::DegenerateConfiguration(
            "fitted scale is not positive",
        ));
    }

    let linear = DMat3::from_cols_slice(rotation.as_slice()) * scale;
    let translation = target_centroid - linear * source_centroid;
    let transform = SimilarityTransform3D::from_parts(linear, translation);

    if !transform.is_valid() {
        return Err(GeometricFitError::DegenerateConfiguration(
            "fitted transform is not finite",
        ));
    }

    Ok(transform)
}

/// Distance between each mapped source point and its target.
pub fn fit_residuals(
    transform: &SimilarityTransform3D,
    source: &[DVec3],
    target: &[DVec3],
) -> Vec<f64> {
    source
        .iter()
        .zip(target.iter())
        .map(|(s, t)| transform.apply(*s).distance(*t))
        .collect()
}

pub fn rms_error(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = residuals.iter().map(|r| r * r).sum();
    (sum_sq / residuals.len() as f64).sqrt()
}

pub(crate) fn centroid(points: &[DVec3]) -> DVec3 {
    if points.is_empty() {
        return DVec3::ZERO;
    }

    let sum: DVec3 = points.iter().copied().sum();
    sum / points.len() as f64
}

fn to_vector3(v: DVec3) -> Vector3<f64> {
    Vector3::new(v.x, v.y, v.z)
}
