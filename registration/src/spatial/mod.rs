//! Spatial registration strategies.
//!
//! | Strategy | Landmarks | Time dependence |
//! |----------|-----------|-----------------|
//! | [`FixedRegistration`] | ends of paired root branches | none |
//! | [`DynamicLandmarkRegistration::from_roots`] | paired root subtrees | per timepoint pair |
//! | [`DynamicLandmarkRegistration::from_landmarks`] | shared landmark tags | per timepoint pair |
//! | [`InverseRegistration`] | those of the wrapped registration | as wrapped |

use std::sync::Arc;

use lineage::{CellId, RegisteredGraphs};

use crate::config::{RegistrationConfig, SpatialRegistrationMethod};
use crate::error::RegistrationError;
use crate::estimate::GeometricFitError;
use crate::transform::SimilarityTransform3D;

mod dynamic;
mod fixed;
mod inverse;

pub use dynamic::DynamicLandmarkRegistration;
pub use fixed::FixedRegistration;
pub use inverse::InverseRegistration;

#[cfg(test)]
mod tests;

/// Maps positions of graph A at `timepoint_a` to positions of graph B at `timepoint_b`.
pub trait SpatialRegistration: std::fmt::Debug + Send + Sync {
    fn transform_between(
        &self,
        timepoint_a: u32,
        timepoint_b: u32,
    ) -> Result<SimilarityTransform3D, GeometricFitError>;
}

impl<T: SpatialRegistration + ?Sized> SpatialRegistration for Box<T> {
    fn transform_between(
        &self,
        timepoint_a: u32,
        timepoint_b: u32,
    ) -> Result<SimilarityTransform3D, GeometricFitError> {
        (**self).transform_between(timepoint_a, timepoint_b)
    }
}

impl<T: SpatialRegistration + ?Sized> SpatialRegistration for Arc<T> {
    fn transform_between(
        &self,
        timepoint_a: u32,
        timepoint_b: u32,
    ) -> Result<SimilarityTransform3D, GeometricFitError> {
        (**self).transform_between(timepoint_a, timepoint_b)
    }
}

/// Builds the registration selected by `config.method`.
pub fn create_registration(
    graphs: &RegisteredGraphs,
    config: &RegistrationConfig,
) -> Result<Box<dyn SpatialRegistration>, RegistrationError> {
    tracing::info!(
        "Registering \"{}\" onto \"{}\": {}",
        graphs.graph_a().name(),
        graphs.graph_b().name(),
        config.method.description()
    );

    Ok(match config.method {
        SpatialRegistrationMethod::FixedRoots => Box::new(FixedRegistration::new(graphs, config)?),
        SpatialRegistrationMethod::DynamicRoots => {
            Box::new(DynamicLandmarkRegistration::from_roots(graphs, config)?)
        }
        SpatialRegistrationMethod::DynamicLandmarks => {
            Box::new(DynamicLandmarkRegistration::from_landmarks(graphs, config)?)
        }
    })
}

/// Paired roots, failing when fewer than the configured minimum exist.
fn required_paired_roots(
    graphs: &RegisteredGraphs,
    config: &RegistrationConfig,
) -> Result<Vec<(CellId, CellId)>, RegistrationError> {
    let roots = graphs.paired_roots();
    let required = config.required_pairs();
    if roots.len() < required {
        return Err(RegistrationError::InsufficientPairedRoots {
            found: roots.len(),
            required,
        });
    }

    Ok(roots)
}
