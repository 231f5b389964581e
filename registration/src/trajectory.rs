//! Landmark trajectories: one smoothed position per timepoint.

use glam::DVec3;
use lineage::{CellId, LineageGraph};

/// Centroid track of a group of cells, indexed by timepoint.
///
/// Built in three steps: positions of the cells at the same timepoint are
/// averaged, timepoints without cells are filled by linear interpolation
/// between the nearest known ones (held constant before the first and after
/// the last known timepoint), and the result is smoothed with a centered
/// moving average.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    positions: Vec<DVec3>,
}

impl Trajectory {
    /// Track of `cells` over the whole time range of `graph`.
    ///
    /// Returns `None` when none of the cells belongs to the graph.
    pub fn from_cells<I>(graph: &LineageGraph, cells: I, half_window: usize) -> Option<Self>
    where
        I: IntoIterator<Item = CellId>,
    {
        let num_timepoints = graph.num_timepoints();
        let mut sums = vec![DVec3::ZERO; num_timepoints];
        let mut counts = vec![0usize; num_timepoints];

        for cell in cells.into_iter().filter_map(|id| graph.cell(id)) {
            let t = cell.timepoint as usize;
            sums[t] += cell.position;
            counts[t] += 1;
        }

        let samples: Vec<Option<DVec3>> = sums
            .iter()
            .zip(counts.iter())
            .map(|(&sum, &count)| (count > 0).then(|| sum / count as f64))
            .collect();

        Self::from_samples(&samples, half_window)
    }

    /// Track from per-timepoint samples; `None` marks a missing timepoint.
    ///
    /// Returns `None` when every sample is missing.
    pub fn from_samples(samples: &[Option<DVec3>], half_window: usize) -> Option<Self> {
        let filled = fill_gaps(samples)?;
        Some(Self {
            positions: moving_average(&filled, half_window),
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Position at `timepoint`, clamped to the last known timepoint.
    pub fn at(&self, timepoint: u32) -> DVec3 {
        let last = self.positions.len().saturating_sub(1);
        self.positions[(timepoint as usize).min(last)]
    }
}

fn fill_gaps(samples: &[Option<DVec3>]) -> Option<Vec<DVec3>> {
    let known: Vec<(usize, DVec3)> = samples
        .iter()
        .enumerate()
        .filter_map(|(t, sample)| sample.map(|p| (t, p)))
        .collect();
    let &(first_t, first_p) = known.first()?;
    let &(last_t, last_p) = known.last()?;

    let mut filled = Vec::with_capacity(samples.len());
    filled.extend(std::iter::repeat(first_p).take(first_t));
    for pair in known.windows(2) {
        let (t0, p0) = pair[0];
        let (t1, p1) = pair[1];
        for t in t0..t1 {
            let f = (t - t0) as f64 / (t1 - t0) as f64;
            filled.push(p0.lerp(p1, f));
        }
    }
    filled.push(last_p);
    filled.extend(std::iter::repeat(last_p).take(samples.len() - last_t - 1));

    debug_assert_eq!(filled.len(), samples.len());
    Some(filled)
}

// Window is truncated at both ends of the sequence.
fn moving_average(positions: &[DVec3], half_window: usize) -> Vec<DVec3> {
    (0..positions.len())
        .map(|t| {
            let lo = t.saturating_sub(half_window);
            let hi = (t + half_window + 1).min(positions.len());
            let window = &positions[lo..hi];
            window.iter().copied().sum::<DVec3>() / window.len() as f64
        })
        .collect()
}
