use glam::DVec3;
use lineage::{LineageGraph, RegisteredGraphs, TagSet};

use super::{required_paired_roots, SpatialRegistration};
use crate::config::RegistrationConfig;
use crate::error::{GraphSide, RegistrationError};
use crate::estimate::{estimate_similarity, GeometricFitError};
use crate::trajectory::Trajectory;
use crate::transform::SimilarityTransform3D;

/// Time-varying registration fitted on pairs of landmark trajectories.
///
/// Every query samples the trajectories of graph A at `timepoint_a` and those
/// of graph B at `timepoint_b` and fits a new transform. Nothing is cached.
#[derive(Debug, Clone)]
pub struct DynamicLandmarkRegistration {
    pairs: Vec<(Trajectory, Trajectory)>,
    labels: Vec<String>,
}

impl DynamicLandmarkRegistration {
    /// Landmarks are the paired roots, each tracked through its whole subtree.
    pub fn from_roots(
        graphs: &RegisteredGraphs,
        config: &RegistrationConfig,
    ) -> Result<Self, RegistrationError> {
        let graph_a = graphs.graph_a();
        let graph_b = graphs.graph_b();
        let half_window = config.smoothing_half_window;

        let mut pairs = Vec::new();
        let mut labels = Vec::new();
        for (root_a, root_b) in required_paired_roots(graphs, config)? {
            let trajectory_a =
                Trajectory::from_cells(graph_a, graph_a.descendants(root_a), half_window);
            let trajectory_b =
                Trajectory::from_cells(graph_b, graph_b.descendants(root_b), half_window);

            if let (Some(trajectory_a), Some(trajectory_b)) = (trajectory_a, trajectory_b) {
                pairs.push((trajectory_a, trajectory_b));
                labels.push(
                    graph_a
                        .cell(root_a)
                        .map(|cell| cell.label.clone())
                        .unwrap_or_default(),
                );
            }
        }

        tracing::info!(
            "Dynamic registration from {} root subtrees",
            pairs.len()
        );

        Ok(Self { pairs, labels })
    }

    /// Landmarks are the labels shared by the landmark tag sets of both graphs.
    pub fn from_landmarks(
        graphs: &RegisteredGraphs,
        config: &RegistrationConfig,
    ) -> Result<Self, RegistrationError> {
        let graph_a = graphs.graph_a();
        let graph_b = graphs.graph_b();
        let half_window = config.smoothing_half_window;

        let tags_a = find_tag_set(graph_a, GraphSide::A, &config.landmarks_tag_set)?;
        let tags_b = find_tag_set(graph_b, GraphSide::B, &config.landmarks_tag_set)?;

        let mut pairs = Vec::new();
        let mut labels = Vec::new();
        let mut unmatched = Vec::new();

        for label in tags_a.labels() {
            let cells_a = tags_a.cells_with_tag(label);
            let cells_b = tags_b.cells_with_tag(label);
            if cells_a.is_empty() || cells_b.is_empty() {
                unmatched.push(label.clone());
                continue;
            }

            let trajectory_a = Trajectory::from_cells(graph_a, cells_a.iter().copied(), half_window);
            let trajectory_b = Trajectory::from_cells(graph_b, cells_b.iter().copied(), half_window);
            match (trajectory_a, trajectory_b) {
                (Some(trajectory_a), Some(trajectory_b)) => {
                    pairs.push((trajectory_a, trajectory_b));
                    labels.push(label.clone());
                }
                _ => unmatched.push(label.clone()),
            }
        }
        unmatched.extend(
            tags_b
                .labels()
                .iter()
                .filter(|label| !tags_a.has_label(label))
                .cloned(),
        );

        if !unmatched.is_empty() {
            tracing::warn!(
                "Landmark tags not usable for registration: {}",
                unmatched.join(", ")
            );
        }

        let required = config.required_pairs();
        if pairs.len() < required {
            return Err(RegistrationError::InsufficientPairedLandmarks {
                found: pairs.len(),
                required,
                labels_a: tags_a.labels().to_vec(),
                labels_b: tags_b.labels().to_vec(),
                unmatched,
            });
        }

        tracing::info!(
            "Dynamic registration from {} landmark tags: {}",
            pairs.len(),
            labels.join(", ")
        );

        Ok(Self { pairs, labels })
    }

    pub fn num_landmarks(&self) -> usize {
        self.pairs.len()
    }

    /// Root labels or tag labels, in landmark order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl SpatialRegistration for DynamicLandmarkRegistration {
    fn transform_between(
        &self,
        timepoint_a: u32,
        timepoint_b: u32,
    ) -> Result<SimilarityTransform3D, GeometricFitError> {
        let (source, target): (Vec<DVec3>, Vec<DVec3>) = self
            .pairs
            .iter()
            .map(|(trajectory_a, trajectory_b)| {
                (trajectory_a.at(timepoint_a), trajectory_b.at(timepoint_b))
            })
            .unzip();

        let transform = estimate_similarity(&source, &target)?;
        tracing::debug!(
            "Dynamic registration t{} -> t{}: {}",
            timepoint_a,
            timepoint_b,
            transform
        );

        Ok(transform)
    }
}

fn find_tag_set<'a>(
    graph: &'a LineageGraph,
    side: GraphSide,
    name: &str,
) -> Result<&'a TagSet, RegistrationError> {
    graph
        .tag_set(name)
        .ok_or_else(|| RegistrationError::MissingTagSet {
            side,
            graph: graph.name().to_string(),
            name: name.to_string(),
        })
}
