//! Principal component projection of embedding trajectories.
//!
//! The eigen-decomposition runs cyclic Jacobi rotations on whichever of the
//! D×D scatter matrix or the T×T Gram matrix is smaller. Both share the same
//! non-zero spectrum, so the projected scores agree up to numerical error.

use crate::config::Centering;
use crate::error::{Result, TopicSegError};
use log::debug;
use ndarray::{Array1, Array2, Axis};

/// Maximum number of full Jacobi sweeps.
const MAX_SWEEPS: usize = 64;

/// Relative off-diagonal mass below which the matrix counts as diagonal.
const CONVERGENCE_EPS: f64 = 1e-24;

/// Gram eigenvalues below this fraction of the largest are treated as zero.
const RANK_TOLERANCE: f64 = 1e-10;

/// Projects a T×D matrix onto its top-K principal directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PcaReducer {
    components: usize,
    centering: Centering,
}

impl PcaReducer {
    /// Creates a reducer keeping `components` directions.
    pub fn new(components: usize, centering: Centering) -> Result<Self> {
        if components == 0 {
            return Err(TopicSegError::InvalidParameter(
                "PCA needs at least one component".to_string(),
            ));
        }
        Ok(Self {
            components,
            centering,
        })
    }

    /// Number of output columns.
    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }

    /// Returns the T×K matrix of principal component scores.
    ///
    /// Columns are ordered by descending explained variance. Each direction is
    /// sign-normalised so its largest-magnitude loading is positive. When T is
    /// smaller than K the trailing columns are zero.
    pub fn reduce(&self, input: &Array2<f64>) -> Result<Array2<f64>> {
        let (t, d) = input.dim();
        if self.components > d {
            return Err(TopicSegError::InvalidParameter(format!(
                "cannot keep {} components of {}-dimensional embeddings",
                self.components, d
            )));
        }

        let mut output = Array2::<f64>::zeros((t, self.components));
        if t == 0 {
            return Ok(output);
        }

        let data = match self.centering {
            Centering::Centered => match input.mean_axis(Axis(0)) {
                Some(mean) => input - &mean,
                None => input.clone(),
            },
            Centering::Uncentered => input.clone(),
        };

        if d <= t {
            let scatter = data.t().dot(&data);
            let (eigenvalues, eigenvectors) = symmetric_eigen(scatter);
            let order = descending_order(&eigenvalues);
            debug!(
                "PCA via {}x{} scatter matrix, leading eigenvalue {:.4}",
                d,
                d,
                order.first().map(|&i| eigenvalues[i]).unwrap_or(0.0)
            );

            for (col, &idx) in order.iter().take(self.components).enumerate() {
                let mut direction = eigenvectors.column(idx).to_owned();
                if leading_sign(&direction) < 0.0 {
                    direction.mapv_inplace(|x| -x);
                }
                output.column_mut(col).assign(&data.dot(&direction));
            }
        } else {
            let gram = data.dot(&data.t());
            let (eigenvalues, eigenvectors) = symmetric_eigen(gram);
            let order = descending_order(&eigenvalues);
            debug!("PCA via {}x{} Gram matrix", t, t);
            let floor = order
                .first()
                .map(|&i| eigenvalues[i].abs() * RANK_TOLERANCE)
                .unwrap_or(0.0);

            for (col, &idx) in order.iter().take(self.components).enumerate() {
                let lambda = eigenvalues[idx].max(0.0);
                if lambda <= floor || lambda == 0.0 {
                    continue;
                }
                let mut basis = eigenvectors.column(idx).to_owned();
                // Sign follows the loading vector X^T u, as in the scatter branch.
                let loading = data.t().dot(&basis);
                if leading_sign(&loading) < 0.0 {
                    basis.mapv_inplace(|x| -x);
                }
                basis.mapv_inplace(|x| x * lambda.sqrt());
                output.column_mut(col).assign(&basis);
            }
        }

        Ok(output)
    }
}

/// Sets the first `n` columns of `matrix` to zero.
pub fn zero_leading_columns(matrix: &mut Array2<f64>, n: usize) {
    let n = n.min(matrix.ncols());
    for col in 0..n {
        matrix.column_mut(col).fill(0.0);
    }
}

/// Eigen-decomposition of a real symmetric matrix by cyclic Jacobi rotations.
///
/// Returns the eigenvalues (diagonal after convergence) and the matrix whose
/// columns are the corresponding unit eigenvectors.
fn symmetric_eigen(mut a: Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut v = Array2::<f64>::eye(n);

    let total: f64 = a.iter().map(|x| x * x).sum();
    if total == 0.0 || !total.is_finite() {
        return (a.diag().to_owned(), v);
    }

    for _ in 0..MAX_SWEEPS {
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[[p, q]] * a[[p, q]];
            }
        }
        if off <= CONVERGENCE_EPS * total {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() <= f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = if theta == 0.0 {
                    1.0
                } else {
                    theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt())
                };
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    (a.diag().to_owned(), v)
}

/// Indices of `values` sorted by descending value, ties by ascending index.
fn descending_order(values: &Array1<f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]).then(a.cmp(&b)));
    order
}

/// Sign of the largest-magnitude entry (first one on ties).
fn leading_sign(vector: &Array1<f64>) -> f64 {
    let mut best = 0.0f64;
    for &x in vector.iter() {
        if x.abs() > best.abs() {
            best = x;
        }
    }
    if best < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rejects_too_many_components() {
        let reducer = PcaReducer::new(3, Centering::Centered).unwrap();
        let input = Array2::<f64>::zeros((5, 2));
        assert!(matches!(
            reducer.reduce(&input),
            Err(TopicSegError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_zero_components() {
        assert!(PcaReducer::new(0, Centering::Centered).is_err());
    }

    #[test]
    fn test_jacobi_diagonalises() {
        let m = array![[4.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]];
        let (values, vectors) = symmetric_eigen(m.clone());
        // A v = lambda v for every column
        for i in 0..3 {
            let v = vectors.column(i);
            let av = m.dot(&v);
            for k in 0..3 {
                assert!((av[k] - values[i] * v[k]).abs() < 1e-9);
            }
        }
        let trace: f64 = values.iter().sum();
        assert!((trace - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_projection_along_dominant_axis() {
        // Points spread along x, tiny noise along y.
        let input = array![
            [-2.0, 0.1],
            [-1.0, -0.1],
            [0.0, 0.05],
            [1.0, -0.05],
            [2.0, 0.0]
        ];
        let reducer = PcaReducer::new(1, Centering::Centered).unwrap();
        let out = reducer.reduce(&input).unwrap();
        assert_eq!(out.dim(), (5, 1));
        for (i, expected) in [-2.0, -1.0, 0.0, 1.0, 2.0].iter().enumerate() {
            assert!((out[[i, 0]] - expected).abs() < 0.1);
        }
    }

    #[test]
    fn test_gram_branch_matches_scatter_branch() {
        // 3 rows x 4 dims uses the Gram path; its transpose-free twin with
        // duplicated rows (6 x 4) uses the scatter path with the same geometry.
        let input = array![
            [1.0, 2.0, 0.0, -1.0],
            [0.0, 1.0, 3.0, 1.0],
            [2.0, -1.0, 1.0, 0.0]
        ];
        let reducer = PcaReducer::new(2, Centering::Uncentered).unwrap();
        let gram = reducer.reduce(&input).unwrap();

        let doubled = ndarray::concatenate(Axis(0), &[input.view(), input.view()]).unwrap();
        let scatter = reducer.reduce(&doubled).unwrap();

        for i in 0..3 {
            for c in 0..2 {
                assert!((gram[[i, c]] - scatter[[i, c]]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_short_document_pads_with_zeros() {
        let input = array![[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0]];
        let reducer = PcaReducer::new(4, Centering::Centered).unwrap();
        let out = reducer.reduce(&input).unwrap();
        assert_eq!(out.dim(), (2, 4));
        for i in 0..2 {
            for c in 1..4 {
                assert!(out[[i, c]].abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_zero_leading_columns() {
        let mut m = Array2::<f64>::ones((3, 4));
        zero_leading_columns(&mut m, 2);
        assert_eq!(m.column(0).sum(), 0.0);
        assert_eq!(m.column(1).sum(), 0.0);
        assert_eq!(m.column(2).sum(), 3.0);

        zero_leading_columns(&mut m, 10);
        assert_eq!(m.sum(), 0.0);
    }

    #[test]
    fn test_descending_order_ties_by_index() {
        let values = array![0.5, 2.0, 0.5, -1.0, 2.0];
        assert_eq!(descending_order(&values), vec![1, 4, 0, 2, 3]);
    }
}
