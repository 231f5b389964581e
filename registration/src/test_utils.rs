use std::ops::Range;
use std::sync::Arc;

use glam::{DQuat, DVec3};
use lineage::{CellId, LineageGraph, RegisteredGraphs};

pub(crate) const NUM_TIMEPOINTS: u32 = 10;
const DIVISION_TIMEPOINT: u32 = 5;
const ROOT_POSITIONS: [DVec3; 3] = [
    DVec3::new(10.0, 0.0, 1.0),
    DVec3::new(0.0, 10.0, -1.0),
    DVec3::new(-8.0, -6.0, 2.0),
];
const DAUGHTER_OFFSET: DVec3 = DVec3::new(1.0, 0.5, 0.0);

/// Three roots spinning about Z by `angle_per_timepoint` per timepoint.
///
/// Each root divides once, at [`DIVISION_TIMEPOINT`], into two daughters placed
/// symmetrically around it, so the centroid of every subtree stays on the
/// circle of its root. Root `k` and its daughters are tagged with
/// `landmarks[k]` when a label is given.
///
/// Returns the graph and the branch starts `[root, daughter, daughter]` per root.
pub(crate) fn rotating_embryo(
    name: &str,
    angle_per_timepoint: f64,
    landmarks: &[&str],
) -> (LineageGraph, Vec<[CellId; 3]>) {
    let mut graph = LineageGraph::new(name);
    let mut branch_starts = Vec::new();

    for (k, &base) in ROOT_POSITIONS.iter().enumerate() {
        let label = format!("R{}", k + 1);
        let root_track = add_track(
            &mut graph,
            None,
            0..DIVISION_TIMEPOINT,
            base,
            angle_per_timepoint,
            &label,
        );
        let last = *root_track.last().unwrap();
        let first_daughter = add_track(
            &mut graph,
            Some(last),
            DIVISION_TIMEPOINT..NUM_TIMEPOINTS,
            base + DAUGHTER_OFFSET,
            angle_per_timepoint,
            &format!("{label}.1"),
        );
        let second_daughter = add_track(
            &mut graph,
            Some(last),
            DIVISION_TIMEPOINT..NUM_TIMEPOINTS,
            base - DAUGHTER_OFFSET,
            angle_per_timepoint,
            &format!("{label}.2"),
        );

        branch_starts.push([root_track[0], first_daughter[0], second_daughter[0]]);
    }

    if !landmarks.is_empty() {
        graph
            .add_tag_set("landmarks", landmarks.iter().copied())
            .unwrap();
        for (&label, starts) in landmarks.iter().zip(branch_starts.iter()) {
            let subtree: Vec<CellId> = graph.descendants(starts[0]).collect();
            for cell in subtree {
                graph.tag_cell("landmarks", label, cell).unwrap();
            }
        }
    }

    (graph, branch_starts)
}

/// Embryo A spinning by `+angle`, embryo B by `-angle` per timepoint.
///
/// All daughter branches are mapped, roots only for the first `paired_roots`.
pub(crate) fn rotating_pair(
    angle_per_timepoint: f64,
    paired_roots: usize,
    landmarks_a: &[&str],
    landmarks_b: &[&str],
) -> RegisteredGraphs {
    let (graph_a, starts_a) = rotating_embryo("A", angle_per_timepoint, landmarks_a);
    let (graph_b, starts_b) = rotating_embryo("B", -angle_per_timepoint, landmarks_b);

    let mut pairs = Vec::new();
    for (k, (a, b)) in starts_a.iter().zip(starts_b.iter()).enumerate() {
        if k < paired_roots {
            pairs.push((a[0], b[0]));
        }
        pairs.push((a[1], b[1]));
        pairs.push((a[2], b[2]));
    }

    RegisteredGraphs::new(Arc::new(graph_a), Arc::new(graph_b), pairs).unwrap()
}

fn add_track(
    graph: &mut LineageGraph,
    parent: Option<CellId>,
    timepoints: Range<u32>,
    position: DVec3,
    angle_per_timepoint: f64,
    label: &str,
) -> Vec<CellId> {
    let mut track: Vec<CellId> = Vec::new();
    for t in timepoints {
        let rotation = DQuat::from_rotation_z(angle_per_timepoint * t as f64);
        let cell = graph.add_cell(t, rotation * position, label);
        if let Some(previous) = track.last().copied().or(parent) {
            graph.add_edge(previous, cell).unwrap();
        }
        track.push(cell);
    }

    track
}
