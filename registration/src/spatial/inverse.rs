use super::SpatialRegistration;
use crate::estimate::GeometricFitError;
use crate::transform::SimilarityTransform3D;

/// Registration from B to A, derived from a registration from A to B.
#[derive(Debug, Clone)]
pub struct InverseRegistration<R> {
    forward: R,
}

impl<R: SpatialRegistration> InverseRegistration<R> {
    pub fn new(forward: R) -> Self {
        Self { forward }
    }

    pub fn forward(&self) -> &R {
        &self.forward
    }

    pub fn into_forward(self) -> R {
        self.forward
    }
}

impl<R: SpatialRegistration> SpatialRegistration for InverseRegistration<R> {
    fn transform_between(
        &self,
        timepoint_a: u32,
        timepoint_b: u32,
    ) -> Result<SimilarityTransform3D, GeometricFitError> {
        Ok(self
            .forward
            .transform_between(timepoint_b, timepoint_a)?
            .inverse())
    }
}
