use crate::error::{Result, Z2Error};
use crate::lanes::{LaneOps, Lanes};
use crate::matrix::{ColMatrix, Z2Matrix};
use crate::vector::{IntoBit, Z2Vector};
use std::ops::Mul;

/// A matrix over GF(2) stored in row-major order.
///
/// Each row is a [`Z2Vector`] of length `cols`, so row operations (and everything built on
/// them: elimination, rank, solving, multiplication) cost one word operation per row.
///
/// # Examples
///
/// ```
/// use z2linalg::{RowMatrix, Z2Matrix};
///
/// // rows are read from the low bit of each word
/// let m = RowMatrix::from_words(&[1, 3, 5], 3);
/// assert_eq!(
///     m.to_dense(),
///     vec![
///         vec![true, false, false],
///         vec![true, true, false],
///         vec![true, false, true],
///     ]
/// );
/// assert_eq!(m.rank(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowMatrix {
    /// one lane per row, each of length `cols`
    pub(crate) data: Lanes,
}

lane_matrix!(RowMatrix, true);

impl RowMatrix {
    /// Creates a matrix whose row `i` is the low `cols` bits of `words[i]`. Entries
    /// at position 64 or above are zero; use [`RowMatrix::from_limbs`] for longer rows.
    pub fn from_words(words: &[u64], cols: usize) -> Self {
        RowMatrix {
            data: Lanes::from_words(words, cols),
        }
    }

    /// Creates a matrix whose row `i` is read from the little-endian limbs `limbs[i]`,
    /// keeping the low `cols` bits. Missing limbs are zero.
    pub fn from_limbs<L: AsRef<[u64]>>(limbs: &[L], cols: usize) -> Self {
        RowMatrix {
            data: Lanes::from_limbs(limbs, cols),
        }
    }

    /// Creates a matrix from its rows, each of which must have length `cols`
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Dimension`] if some row has a different length.
    pub fn from_vectors(rows: Vec<Z2Vector>, cols: usize) -> Result<Self> {
        Ok(RowMatrix {
            data: Lanes::from_vectors(rows, cols)?,
        })
    }

    /// Returns row `i`
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    #[inline]
    pub fn row(&self, i: usize) -> &Z2Vector {
        &self.data.lanes[i]
    }

    #[inline]
    pub fn as_rows(&self) -> &[Z2Vector] {
        &self.data.lanes
    }

    #[inline]
    pub fn into_rows(self) -> Vec<Z2Vector> {
        self.data.lanes
    }

    /// Returns the transpose in column-major layout. The rows of `self` become the columns of
    /// the result without moving any bits.
    #[inline]
    pub fn transpose(self) -> ColMatrix {
        ColMatrix { data: self.data }
    }

    /// Over GF(2) the adjoint is the transpose
    #[inline]
    pub fn adjoint(self) -> ColMatrix {
        self.transpose()
    }

    /// Returns a transposed copy of the matrix, still in row-major layout. This relocates every
    /// bit.
    #[inline]
    pub fn transposed(&self) -> RowMatrix {
        RowMatrix {
            data: self.data.relocated(),
        }
    }

    /// Matrix-vector product: entry `i` of the result is the dot product of row `i` with `v`.
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Dimension`] if `v.len() != cols`.
    pub fn try_mul_vector(&self, v: &Z2Vector) -> Result<Z2Vector> {
        if v.len() != self.cols() {
            return Err(Z2Error::dimension(
                "mul_vector",
                self.size(),
                (v.len(), 1),
            ));
        }

        Ok(Z2Vector::build(self.rows(), |i| {
            self.data.lanes[i].word().and_parity(v.word())
        }))
    }

    /// Matrix product. Row `i` of the result is the sum of the rows of `rhs` selected by the set
    /// bits of row `i` of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Dimension`] if `self.cols() != rhs.rows()`.
    pub fn try_mul(&self, rhs: &RowMatrix) -> Result<RowMatrix> {
        if self.cols() != rhs.rows() {
            return Err(Z2Error::dimension("mul", self.size(), rhs.size()));
        }
        let _span =
            tracing::debug_span!("mul", m = self.rows(), k = self.cols(), n = rhs.cols()).entered();

        let mut res = RowMatrix::zeros(self.rows(), rhs.cols());
        for (row, out) in self.data.lanes.iter().zip(res.data.lanes.iter_mut()) {
            row.iter().enumerate().for_each(|(l, b)| {
                if b {
                    out.xor_in(&rhs.data.lanes[l]);
                }
            });
        }

        Ok(res)
    }

    /// Solves `self * X = rhs` for `X`.
    ///
    /// Elimination runs on `self` while every row operation is replayed on a copy of `rhs`,
    /// which is the right-hand block of the augmented matrix `[self | rhs]`. Once `self` has
    /// been reduced to the identity, that block holds `X`.
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Dimension`] if `self` is not square or `rhs` has a different number
    /// of rows, and [`Z2Error::Singular`] if `self` does not have full rank.
    pub fn solve(&self, rhs: &RowMatrix) -> Result<RowMatrix> {
        self.check_system("solve", rhs.size())?;
        let _span = tracing::debug_span!("solve", size = self.rows(), rhs_cols = rhs.cols())
            .entered();

        let mut x = rhs.clone();
        self.reduce_with(&mut x)?;
        Ok(x)
    }

    /// Solves `self * x = b` for a single right-hand side
    ///
    /// # Errors
    ///
    /// As for [`RowMatrix::solve`].
    pub fn solve_vector(&self, b: &Z2Vector) -> Result<Z2Vector> {
        self.check_system("solve_vector", (b.len(), 1))?;
        let _span = tracing::debug_span!("solve_vector", size = self.rows()).entered();

        let mut x = b.clone();
        self.reduce_with(&mut x)?;
        Ok(x)
    }

    /// Compute the inverse of an invertible matrix
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Dimension`] if the matrix is not square and [`Z2Error::Singular`] if
    /// it is not invertible.
    pub fn inverse(&self) -> Result<RowMatrix> {
        self.solve(&RowMatrix::identity(self.rows()))
    }

    fn check_system(&self, op: &'static str, rhs: (usize, usize)) -> Result<()> {
        if !self.is_square() || rhs.0 != self.rows() {
            return Err(Z2Error::dimension(op, self.size(), rhs));
        }
        Ok(())
    }

    /// Reduces a copy of `self` to the identity, replaying the row operations on `proxy`
    fn reduce_with(&self, proxy: &mut impl LaneOps) -> Result<()> {
        let size = self.rows();
        let rank = self.data.clone().gauss_helper(true, proxy).len();
        if rank != size {
            tracing::debug!(rank, size, "coefficient matrix is singular");
            return Err(Z2Error::Singular { rank, size });
        }
        Ok(())
    }
}

impl From<&ColMatrix> for RowMatrix {
    /// Same matrix in row-major layout
    fn from(value: &ColMatrix) -> Self {
        RowMatrix {
            data: value.data.relocated(),
        }
    }
}

impl From<ColMatrix> for RowMatrix {
    fn from(value: ColMatrix) -> Self {
        RowMatrix::from(&value)
    }
}

impl Mul for &RowMatrix {
    type Output = RowMatrix;

    fn mul(self, rhs: Self) -> Self::Output {
        self.try_mul(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Mul<&Z2Vector> for &RowMatrix {
    type Output = Z2Vector;

    fn mul(self, rhs: &Z2Vector) -> Self::Output {
        self.try_mul_vector(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn from_words_scenario() {
        let m = RowMatrix::from_words(&[1, 3, 5], 3);
        assert_eq!(m.size(), (3, 3));
        let expected = [[1, 0, 0], [1, 1, 0], [1, 0, 1]];
        assert_eq!(m, RowMatrix::from_dense(&expected).unwrap());
    }

    #[test]
    fn wide_rows_from_limbs() {
        let m = RowMatrix::from_limbs(&[[0b11, 1 << 3], [0, u64::MAX]], 70);
        assert_eq!(m.size(), (2, 70));
        assert!(m[(0, 0)] && m[(0, 1)] && m[(0, 67)]);
        assert_eq!(m.row(0).weight(), 3);
        assert_eq!(m.row(1).weight(), 6);
        assert!(m.is_padding_clear());

        // words stop at 64 bits
        let n = RowMatrix::from_words(&[u64::MAX], 70);
        assert_eq!(n.row(0).weight(), 64);
        assert_eq!(n, RowMatrix::from_limbs(&[[u64::MAX]], 70));
    }

    #[test]
    fn from_dense_ragged() {
        let rows: Vec<Vec<u8>> = vec![vec![1, 0], vec![1]];
        assert!(matches!(
            RowMatrix::from_dense(&rows),
            Err(Z2Error::Dimension { .. })
        ));
        let empty: Vec<Vec<bool>> = vec![];
        assert_eq!(RowMatrix::from_dense(&empty).unwrap().size(), (0, 0));
    }

    #[test]
    fn identity() {
        let m = RowMatrix::identity(100);
        for i in 0..100 {
            for j in 0..100 {
                assert_eq!(m[(i, j)], i == j);
            }
            assert_eq!(m.row(i).weight(), 1);
        }
    }

    #[test]
    fn get_set() {
        let mut m = RowMatrix::zeros(3, 70);
        m.set(2, 69, true).unwrap();
        m.set(0, 1, true).unwrap();
        assert!(m.get(2, 69).unwrap());
        assert!(!m.get(2, 68).unwrap());
        assert!(m.get(3, 0).is_err());
        assert!(m.set(0, 70, true).is_err());
        assert!(m.is_padding_clear());
    }

    #[test]
    fn transpose() {
        let mut rng = SmallRng::seed_from_u64(1);
        let m = RowMatrix::random(&mut rng, 10, 4);
        let n = m.transposed();
        let t = m.clone().transpose();
        assert_eq!(n.size(), (4, 10));
        assert_eq!(t.size(), (4, 10));
        for i in 0..m.rows() {
            for j in 0..m.cols() {
                assert_eq!(m[(i, j)], n[(j, i)]);
                assert_eq!(m[(i, j)], t[(j, i)]);
            }
        }
        assert_eq!(n, t);
        assert_eq!(t.transpose(), m);

        let m = RowMatrix::random(&mut rng, 300, 200);
        let n = m.transposed();
        for i in 0..m.rows() {
            for j in 0..m.cols() {
                assert_eq!(m[(i, j)], n[(j, i)]);
            }
        }
        assert_eq!(n.transposed(), m);
    }

    #[test]
    fn bitwise() {
        let a = RowMatrix::from_words(&[0b0011, 0b0101], 4);
        let b = RowMatrix::from_words(&[0b0101, 0b0110], 4);
        assert_eq!(&a & &b, RowMatrix::from_words(&[0b0001, 0b0100], 4));
        assert_eq!(&a | &b, RowMatrix::from_words(&[0b0111, 0b0111], 4));
        assert_eq!(&a ^ &b, RowMatrix::from_words(&[0b0110, 0b0011], 4));
        assert_eq!(a.nor(&b).unwrap(), RowMatrix::from_words(&[0b1000, 0b1000], 4));
        assert_eq!(a.nand(&b).unwrap(), RowMatrix::from_words(&[0b1110, 0b1011], 4));
        assert_eq!(!&a, RowMatrix::from_words(&[0b1100, 0b1010], 4));
        assert!((!a.clone()).is_padding_clear());
        assert!(a.nor(&b).unwrap().is_padding_clear());

        let c = RowMatrix::zeros(2, 5);
        assert!(matches!(a.and(&c), Err(Z2Error::Dimension { .. })));
    }

    #[test]
    fn add_and_scale() {
        let mut rng = SmallRng::seed_from_u64(2);
        let a = RowMatrix::random(&mut rng, 7, 9);
        assert!((&a + &a).is_zero());
        let mut b = a.clone();
        b *= true;
        assert_eq!(a, b);
        b *= false;
        assert!(b.is_zero());

        let mut c = a.clone();
        let err = c.try_add_assign(&RowMatrix::zeros(9, 7));
        assert!(matches!(err, Err(Z2Error::Dimension { .. })));
        assert_eq!(c, a);
    }

    #[test]
    fn fill() {
        let mut m = RowMatrix::zeros(3, 67);
        m.fill(true);
        assert!(m.is_padding_clear());
        assert!(m.as_rows().iter().all(|r| r.weight() == 67));
        assert!(m.similar().is_zero());
        m.fill(false);
        assert!(m.is_zero());
    }

    #[test]
    fn mul_vector() {
        // [1 0 1]   [1]   [1]
        // [0 1 1] * [1] = [1]
        // [1 1 0]   [0]   [0]
        let m = RowMatrix::from_dense(&[[1, 0, 1], [0, 1, 1], [1, 1, 0]]).unwrap();
        let v = Z2Vector::from_dense([1, 1, 0]);
        assert_eq!(&m * &v, Z2Vector::from_dense([1, 1, 0]));
        assert!(matches!(
            m.try_mul_vector(&Z2Vector::zeros(2)),
            Err(Z2Error::Dimension { .. })
        ));
    }

    #[test]
    fn matrix_mult() {
        let mut rng = SmallRng::seed_from_u64(1);
        let m1 = RowMatrix::random(&mut rng, 80, 100);
        let m2 = RowMatrix::random(&mut rng, 100, 70);
        let m3 = &m1 * &m2;

        for i in 0..m3.rows() {
            for j in 0..m3.cols() {
                let mut b = false;
                for k in 0..m1.cols() {
                    b ^= m1.bit(i, k) & m2.bit(k, j);
                }
                assert_eq!(m3.bit(i, j), b);
            }
        }

        assert!(m1.try_mul(&m1).is_err());
    }

    #[test]
    fn rank_and_det() {
        assert_eq!(RowMatrix::identity(70).rank(), 70);
        assert_eq!(RowMatrix::zeros(5, 9).rank(), 0);
        assert!(RowMatrix::identity(5).det().unwrap());

        // third row is the sum of the first two
        let m = RowMatrix::from_words(&[0b011, 0b110, 0b101], 3);
        assert_eq!(m.rank(), 2);
        assert!(!m.det().unwrap());
        assert!(matches!(
            RowMatrix::zeros(2, 3).det(),
            Err(Z2Error::Dimension { .. })
        ));
    }

    #[test]
    fn matrix_inv() {
        let mut rng = SmallRng::seed_from_u64(1);
        let sz = 100;
        let m = RowMatrix::random_invertible(&mut rng, sz);
        let n = m.inverse().unwrap();
        let id = RowMatrix::identity(sz);

        assert_eq!(&m * &n, id);
        assert_eq!(&n * &m, id);
    }

    #[test]
    fn solve() {
        let mut rng = SmallRng::seed_from_u64(3);
        let a = RowMatrix::random_invertible(&mut rng, 20);
        let b = RowMatrix::random(&mut rng, 20, 5);
        let x = a.solve(&b).unwrap();
        assert_eq!(&a * &x, b);

        let v = Z2Vector::random(&mut rng, 20);
        let y = a.solve_vector(&v).unwrap();
        assert_eq!(&a * &y, v);
    }

    #[test]
    fn solve_singular() {
        let a = RowMatrix::from_words(&[0b011, 0b110, 0b101], 3);
        let b = RowMatrix::identity(3);
        assert_eq!(a.solve(&b), Err(Z2Error::Singular { rank: 2, size: 3 }));
        assert!(matches!(a.inverse(), Err(Z2Error::Singular { .. })));
        assert!(matches!(
            a.solve(&RowMatrix::zeros(2, 3)),
            Err(Z2Error::Dimension { .. })
        ));
        assert!(matches!(
            RowMatrix::zeros(2, 3).solve(&RowMatrix::zeros(2, 1)),
            Err(Z2Error::Dimension { .. })
        ));
    }

    #[test]
    fn gauss_reduced() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut m = RowMatrix::random(&mut rng, 8, 20);
        let rank = m.rank();
        let pivots = m.gauss(true);
        assert_eq!(pivots.len(), rank);
        for (r, &p) in pivots.iter().enumerate() {
            for i in 0..m.rows() {
                assert_eq!(m[(i, p)], i == r);
            }
        }
    }
}
