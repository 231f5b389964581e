//! Similarity transform between two embryo frames.

use glam::{DAffine3, DMat3, DMat4, DQuat, DVec3};

/// Uniform scale + rotation + translation in 3D.
///
/// Stored as a 3x4 affine map (`DAffine3`): `p' = s * R * p + t`.
/// Only the constructors in this crate produce values, so the linear part
/// is always a positive multiple of a rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityTransform3D {
    affine: DAffine3,
}

impl Default for SimilarityTransform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Display for SimilarityTransform3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let t = self.translation();
        let (axis, angle) = self.rotation().to_axis_angle();
        write!(
            f,
            "Similarity3D(t=({:.2}, {:.2}, {:.2}), rot={:.3}° about ({:.3}, {:.3}, {:.3}), scale={:.4})",
            t.x,
            t.y,
            t.z,
            angle.to_degrees(),
            axis.x,
            axis.y,
            axis.z,
            self.scale_factor()
        )
    }
}

impl SimilarityTransform3D {
    pub fn identity() -> Self {
        Self {
            affine: DAffine3::IDENTITY,
        }
    }

    pub fn translation_only(t: DVec3) -> Self {
        Self {
            affine: DAffine3::from_translation(t),
        }
    }

    /// `rotation` must be normalized and `scale` positive.
    pub fn from_scale_rotation_translation(scale: f64, rotation: DQuat, translation: DVec3) -> Self {
        debug_assert!(scale > 0.0, "similarity scale must be positive, got {scale}");
        debug_assert!(rotation.is_normalized(), "rotation must be a unit quaternion");

        Self {
            affine: DAffine3::from_scale_rotation_translation(
                DVec3::splat(scale),
                rotation,
                translation,
            ),
        }
    }

    pub(crate) fn from_parts(scaled_rotation: DMat3, translation: DVec3) -> Self {
        Self {
            affine: DAffine3::from_mat3_translation(scaled_rotation, translation),
        }
    }

    /// Map a point from the source frame into the target frame.
    pub fn apply(&self, p: DVec3) -> DVec3 {
        self.affine.transform_point3(p)
    }

    /// Map a direction (no translation).
    pub fn apply_vector(&self, v: DVec3) -> DVec3 {
        self.affine.transform_vector3(v)
    }

    /// Inverse map, `(1/s) * R^T * (p - t)`.
    pub fn inverse(&self) -> Self {
        let scale = self.scale_factor();
        let rotation_t = self.rotation_matrix().transpose();
        let linear = rotation_t * (1.0 / scale);

        Self::from_parts(linear, -(linear * self.affine.translation))
    }

    /// `self * other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            affine: self.affine * other.affine,
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.affine.matrix3.determinant().cbrt()
    }

    pub fn rotation_matrix(&self) -> DMat3 {
        self.affine.matrix3 * (1.0 / self.scale_factor())
    }

    /// Unit quaternion with non-negative `w`.
    pub fn rotation(&self) -> DQuat {
        let q = DQuat::from_mat3(&self.rotation_matrix()).normalize();
        if q.w < 0.0 {
            -q
        } else {
            q
        }
    }

    /// Rotation angle in radians, in `[0, π]`.
    pub fn rotation_angle(&self) -> f64 {
        self.rotation().to_axis_angle().1
    }

    pub fn translation(&self) -> DVec3 {
        self.affine.translation
    }

    pub fn as_affine(&self) -> &DAffine3 {
        &self.affine
    }

    /// 4x4 homogeneous matrix, last row `[0, 0, 0, 1]`.
    pub fn to_homogeneous(&self) -> DMat4 {
        DMat4::from(self.affine)
    }

    /// Entry-wise comparison of the 3x4 matrices.
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f64) -> bool {
        self.affine.abs_diff_eq(other.affine, max_abs_diff)
    }

    /// A transform is usable when its linear part is finite and not collapsed.
    pub fn is_valid(&self) -> bool {
        let det = self.affine.matrix3.determinant();
        det.is_finite() && det > 1e-12 && self.affine.translation.is_finite()
    }
}
