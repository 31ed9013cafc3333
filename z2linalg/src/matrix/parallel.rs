use crate::error::{Result, Z2Error};
use crate::lanes::LaneOps;
use crate::matrix::{RowMatrix, Z2Matrix};

use rayon::prelude::*;

/// Data-parallel versions of the row-major algorithms. Results are identical to the sequential
/// ones.
pub trait ParallelMatrixOps {
    /// Parallel version of [`RowMatrix::gauss`]
    fn par_gauss(&mut self, full: bool) -> Vec<usize>;

    /// Parallel version of [`RowMatrix::rank`]
    fn par_rank(&self) -> usize;

    /// Parallel version of [`RowMatrix::try_mul`]
    fn par_mul(&self, rhs: &RowMatrix) -> Result<RowMatrix>;
}

impl ParallelMatrixOps for RowMatrix {
    fn par_gauss(&mut self, full: bool) -> Vec<usize> {
        let rows = self.rows();
        let cols = self.cols();
        let mut row = 0;
        let mut pcol = 0;
        let mut pcols = vec![];
        while row < rows {
            let mut next_row = None;
            'outer: while pcol < cols {
                for i in row..rows {
                    if self.data.lanes[i].bit(pcol) {
                        next_row = Some(i);
                        break 'outer;
                    }
                }
                pcol += 1;
            }

            if let Some(row1) = next_row {
                if row != row1 {
                    self.swap_lanes(row, row1);
                }

                let row_vec = self.data.lanes[row].clone();
                self.data.lanes[(row1 + 1)..]
                    .par_iter_mut()
                    .for_each(|target| {
                        if target.bit(pcol) {
                            target.xor_in(&row_vec);
                        }
                    });

                row += 1;
                pcols.push(pcol);
                pcol += 1;
            } else {
                break;
            }
        }

        if full {
            for row in (0..pcols.len()).rev() {
                let pcol = pcols[row];
                let row_vec = self.data.lanes[row].clone();
                self.data.lanes[0..row].par_iter_mut().for_each(|target| {
                    if target.bit(pcol) {
                        target.xor_in(&row_vec);
                    }
                });
            }
        }

        pcols
    }

    fn par_rank(&self) -> usize {
        self.clone().par_gauss(false).len()
    }

    fn par_mul(&self, rhs: &RowMatrix) -> Result<RowMatrix> {
        if self.cols() != rhs.rows() {
            return Err(Z2Error::dimension("mul", self.size(), rhs.size()));
        }

        let mut res = RowMatrix::zeros(self.rows(), rhs.cols());
        res.data
            .lanes
            .par_iter_mut()
            .zip(self.data.lanes.par_iter())
            .for_each(|(out, row)| {
                row.iter().enumerate().for_each(|(l, b)| {
                    if b {
                        out.xor_in(&rhs.data.lanes[l]);
                    }
                });
            });

        Ok(res)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn par_gauss_matches_sequential() {
        let mut rng = SmallRng::seed_from_u64(1);
        for (rows, cols) in [(8, 20), (50, 50), (130, 90)] {
            let m = RowMatrix::random(&mut rng, rows, cols);
            let mut seq = m.clone();
            let mut par = m.clone();
            assert_eq!(seq.gauss(true), par.par_gauss(true));
            assert_eq!(seq, par);
            assert_eq!(m.rank(), m.par_rank());
        }
    }

    #[test]
    fn par_mul_matches_sequential() {
        let mut rng = SmallRng::seed_from_u64(2);
        let a = RowMatrix::random(&mut rng, 40, 70);
        let b = RowMatrix::random(&mut rng, 70, 30);
        assert_eq!(a.par_mul(&b).unwrap(), &a * &b);
        assert!(a.par_mul(&a).is_err());
    }
}
