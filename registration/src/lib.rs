//! Spatial registration of two cell lineage graphs.
//!
//! Maps positions of one embryo dataset into the frame of another:
//!
//! - **Estimator**: closed-form least-squares similarity transform (scale,
//!   rotation, translation) from paired 3D points
//! - **Fixed registration**: one transform fitted on the ends of the paired
//!   root branches
//! - **Dynamic registration**: a transform per pair of timepoints, fitted on
//!   smoothed landmark trajectories built from paired root subtrees or from
//!   a shared landmark tag set
//! - **Inverse registration**: the same mapping in the opposite direction
//!
//! ```ignore
//! let config = RegistrationConfig::from_file("registration.yml")?;
//! let registration = config.method.create(&graphs, &config)?;
//! let transform = registration.transform_between(10, 12)?;
//! let position_in_b = transform.apply(position_in_a);
//! ```

pub mod config;
pub mod error;
pub mod estimate;
pub mod spatial;
pub mod trajectory;
pub mod transform;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigFormat, RegistrationConfig, SpatialRegistrationMethod};
pub use error::{GraphSide, RegistrationError};
pub use estimate::{estimate_similarity, fit_residuals, rms_error, GeometricFitError};
pub use spatial::{
    create_registration, DynamicLandmarkRegistration, FixedRegistration, InverseRegistration,
    SpatialRegistration,
};
pub use trajectory::Trajectory;
pub use transform::SimilarityTransform3D;
