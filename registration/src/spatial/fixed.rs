use glam::DVec3;
use lineage::{branch_end, RegisteredGraphs};

use super::{required_paired_roots, SpatialRegistration};
use crate::config::RegistrationConfig;
use crate::error::RegistrationError;
use crate::estimate::{estimate_similarity, fit_residuals, rms_error, GeometricFitError};
use crate::transform::SimilarityTransform3D;

/// One transform for every pair of timepoints.
///
/// Fitted once on the last cell of each paired root branch, i.e. the cell
/// right before the first division of that root.
#[derive(Debug, Clone)]
pub struct FixedRegistration {
    transform: SimilarityTransform3D,
    rms_error: f64,
    num_pairs: usize,
}

impl FixedRegistration {
    pub fn new(
        graphs: &RegisteredGraphs,
        config: &RegistrationConfig,
    ) -> Result<Self, RegistrationError> {
        let graph_a = graphs.graph_a();
        let graph_b = graphs.graph_b();

        let (source, target): (Vec<DVec3>, Vec<DVec3>) = required_paired_roots(graphs, config)?
            .into_iter()
            .filter_map(|(root_a, root_b)| {
                let end_a = graph_a.position(branch_end(graph_a, root_a))?;
                let end_b = graph_b.position(branch_end(graph_b, root_b))?;
                Some((end_a, end_b))
            })
            .unzip();

        let transform = estimate_similarity(&source, &target)?;
        let rms_error = rms_error(&fit_residuals(&transform, &source, &target));

        tracing::info!(
            "Fixed registration from {} root branches: {}",
            source.len(),
            transform
        );
        tracing::debug!("Fixed registration rms error {:.4}", rms_error);

        Ok(Self {
            transform,
            rms_error,
            num_pairs: source.len(),
        })
    }

    pub fn transform(&self) -> SimilarityTransform3D {
        self.transform
    }

    /// RMS distance between mapped and actual branch ends.
    pub fn rms_error(&self) -> f64 {
        self.rms_error
    }

    pub fn num_pairs(&self) -> usize {
        self.num_pairs
    }
}

impl SpatialRegistration for FixedRegistration {
    fn transform_between(
        &self,
        _timepoint_a: u32,
        _timepoint_b: u32,
    ) -> Result<SimilarityTransform3D, GeometricFitError> {
        Ok(self.transform)
    }
}
