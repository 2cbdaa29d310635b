//! Boundary detection on deviation series.

use log::warn;
use serde::{Deserialize, Serialize};

/// Per-sentence boundary indicators. Index 0 is always a boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeVector(Vec<bool>);

impl EdgeVector {
    /// Wraps raw indicators, forcing the document start to be a boundary.
    pub fn new(mut edges: Vec<bool>) -> Self {
        if let Some(first) = edges.first_mut() {
            *first = true;
        }
        Self(edges)
    }

    /// Builds an edge vector of length `len` with boundaries at `positions`.
    ///
    /// Positions outside `0..len` are ignored.
    pub fn from_boundaries(len: usize, positions: &[usize]) -> Self {
        let mut edges = vec![false; len];
        for &p in positions {
            if p < len {
                edges[p] = true;
            }
        }
        Self::new(edges)
    }

    /// Number of sentences covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-sentence document.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a segment starts at sentence `index`.
    #[inline]
    pub fn is_boundary(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Indices where a segment starts, ascending (includes 0).
    pub fn boundaries(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &e)| e)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of segment starts (equals the number of segments).
    pub fn boundary_count(&self) -> usize {
        self.0.iter().filter(|&&e| e).count()
    }

    /// The raw indicators.
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

/// Turns a deviation series into boundary indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDetector {
    /// Every strict local maximum is a boundary.
    Unconstrained,
    /// Aim for exactly `segments` segments, i.e. `segments - 1` inner boundaries.
    Constrained {
        /// Requested number of segments.
        segments: usize,
    },
}

impl EdgeDetector {
    /// Detects boundaries. Identical input always yields identical output.
    pub fn detect(&self, deviation: &[f64]) -> EdgeVector {
        let t = deviation.len();
        if t < 2 {
            return EdgeVector::new(vec![true; t]);
        }

        let peaks = local_maxima(deviation);
        let edges = match *self {
            EdgeDetector::Unconstrained => peaks,
            EdgeDetector::Constrained { segments } => {
                let wanted = segments.saturating_sub(1);
                let selected = select_constrained(deviation, &peaks, wanted);
                if selected.len() < wanted {
                    warn!(
                        "requested {} boundaries but the series only supports {}",
                        wanted,
                        selected.len()
                    );
                }
                let mut edges = vec![false; t];
                for i in selected {
                    edges[i] = true;
                }
                edges
            }
        };

        EdgeVector::new(edges)
    }
}

/// Marks strict local maxima. Only interior positions `1..=T-2` are tested.
fn local_maxima(deviation: &[f64]) -> Vec<bool> {
    let t = deviation.len();
    let mut peaks = vec![false; t];
    for i in 1..t.saturating_sub(1) {
        peaks[i] = deviation[i - 1] < deviation[i] && deviation[i + 1] < deviation[i];
    }
    peaks
}

/// Picks up to `wanted` boundary indices, strongest peaks first, then the
/// largest raw deviations. Index 0 is never picked.
fn select_constrained(deviation: &[f64], peaks: &[bool], wanted: usize) -> Vec<usize> {
    let mut chosen = vec![false; deviation.len()];
    let mut selected = Vec::with_capacity(wanted);

    let mut peak_order: Vec<usize> = (1..peaks.len())
        .filter(|&i| peaks[i] && deviation[i] != 0.0)
        .collect();
    sort_descending(&mut peak_order, deviation);
    for i in peak_order.into_iter().take(wanted) {
        chosen[i] = true;
        selected.push(i);
    }

    if selected.len() < wanted {
        let mut fill_order: Vec<usize> = (1..deviation.len()).filter(|&i| !chosen[i]).collect();
        sort_descending(&mut fill_order, deviation);
        let missing = wanted - selected.len();
        selected.extend(fill_order.into_iter().take(missing));
    }

    selected
}

/// Sorts indices by descending value; ties keep ascending index order.
fn sort_descending(indices: &mut [usize], values: &[f64]) {
    indices.sort_by(|&a, &b| values[b].total_cmp(&values[a]).then(a.cmp(&b)));
}
