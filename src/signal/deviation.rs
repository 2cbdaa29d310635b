//! Deviation signals over smoothed embedding trajectories.

use crate::error::{Result, TopicSegError};
use crate::similarity::cosine_distance;
use ndarray::Array2;

/// Cosine distance of each row to its predecessor.
///
/// `dev[0]` is 0; the edge detector always forces a boundary there.
pub fn unidirectional(embeddings: &Array2<f64>) -> Vec<f64> {
    let t = embeddings.nrows();
    let mut dev = vec![0.0; t];
    for i in 1..t {
        dev[i] = cosine_distance(embeddings.row(i), embeddings.row(i - 1));
    }
    dev
}

/// Geometric mean of a forward-looking and a backward-looking distance.
///
/// The forward term at `t` compares `fw[t]` with `fw[t + 1]` (0 at the last
/// index); the backward term compares `bw[t - 1]` with `bw[t - 2]` (0 for
/// `t <= 2`). Both matrices must have the same shape.
pub fn bidirectional(forward: &Array2<f64>, backward: &Array2<f64>) -> Result<Vec<f64>> {
    if forward.nrows() != backward.nrows() {
        return Err(TopicSegError::mismatch(forward.nrows(), backward.nrows()));
    }
    if forward.ncols() != backward.ncols() {
        return Err(TopicSegError::mismatch(forward.ncols(), backward.ncols()));
    }

    let t = forward.nrows();
    let dev = (0..t)
        .map(|i| {
            let fwd = if i + 1 < t {
                cosine_distance(forward.row(i), forward.row(i + 1))
            } else {
                0.0
            };
            let bwd = if i > 2 {
                cosine_distance(backward.row(i - 1), backward.row(i - 2))
            } else {
                0.0
            };
            let value = (fwd * bwd).sqrt();
            if value.is_finite() {
                value
            } else {
                0.0
            }
        })
        .collect();
    Ok(dev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_unidirectional_detects_switch() {
        let m = array![[1.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0]];
        let dev = unidirectional(&m);
        assert_eq!(dev.len(), 4);
        assert_eq!(dev[0], 0.0);
        assert!(dev[1].abs() < 1e-12);
        assert!((dev[2] - 1.0).abs() < 1e-12);
        assert!(dev[3].abs() < 1e-12);
    }

    #[test]
    fn test_unidirectional_zero_rows() {
        let m = Array2::<f64>::zeros((3, 2));
        assert_eq!(unidirectional(&m), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_bidirectional_boundary_terms() {
        let fw = array![[1.0, 0.0], [0.0, 1.0], [1.0, 0.0], [0.0, 1.0], [1.0, 0.0]];
        let bw = fw.clone();
        let dev = bidirectional(&fw, &bw).unwrap();

        assert_eq!(dev.len(), 5);
        assert_eq!(dev[0], 0.0);
        assert_eq!(dev[1], 0.0);
        assert_eq!(dev[2], 0.0);
        // t = 3: fwd = d(fw3, fw4) = 1, bwd = d(bw2, bw1) = 1
        assert!((dev[3] - 1.0).abs() < 1e-12);
        // last index has no forward neighbour
        assert_eq!(dev[4], 0.0);
    }

    #[test]
    fn test_bidirectional_shape_mismatch() {
        let fw = Array2::<f64>::zeros((4, 2));
        let bw = Array2::<f64>::zeros((3, 2));
        assert!(matches!(
            bidirectional(&fw, &bw),
            Err(TopicSegError::DimensionMismatch { expected: 4, actual: 3 })
        ));
    }
}
