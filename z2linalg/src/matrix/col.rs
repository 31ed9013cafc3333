use crate::error::{Result, Z2Error};
use crate::lanes::{LaneOps, Lanes};
use crate::matrix::{RowMatrix, Z2Matrix};
use crate::vector::{IntoBit, Z2Vector};
use std::ops::Mul;

/// A matrix over GF(2) stored in column-major order.
///
/// Each column is a [`Z2Vector`] of length `rows`. Elimination on a `ColMatrix` works with
/// column operations, so [`ColMatrix::gauss`] produces column echelon form; rank and
/// determinant agree with the row-major layout.
///
/// # Examples
///
/// ```
/// use z2linalg::{ColMatrix, Z2Matrix};
///
/// // columns are read from the low bit of each word
/// let m = ColMatrix::from_words(&[1, 3, 5], 3);
/// assert_eq!(
///     m.to_dense(),
///     vec![
///         vec![true, true, true],
///         vec![false, true, false],
///         vec![false, false, true],
///     ]
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColMatrix {
    /// one lane per column, each of length `rows`
    pub(crate) data: Lanes,
}

lane_matrix!(ColMatrix, false);

impl ColMatrix {
    /// Creates a matrix whose column `j` is the low `rows` bits of `words[j]`. Entries at
    /// position 64 or above are zero; use [`ColMatrix::from_limbs`] for longer columns.
    pub fn from_words(words: &[u64], rows: usize) -> Self {
        ColMatrix {
            data: Lanes::from_words(words, rows),
        }
    }

    /// Creates a matrix whose column `j` is read from the little-endian limbs `limbs[j]`,
    /// keeping the low `rows` bits. Missing limbs are zero.
    pub fn from_limbs<L: AsRef<[u64]>>(limbs: &[L], rows: usize) -> Self {
        ColMatrix {
            data: Lanes::from_limbs(limbs, rows),
        }
    }

    /// Creates a matrix from its columns, each of which must have length `rows`
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Dimension`] if some column has a different length.
    pub fn from_vectors(cols: Vec<Z2Vector>, rows: usize) -> Result<Self> {
        Ok(ColMatrix {
            data: Lanes::from_vectors(cols, rows)?,
        })
    }

    /// Returns column `j`
    ///
    /// # Panics
    ///
    /// Panics if `j >= cols`.
    #[inline]
    pub fn col(&self, j: usize) -> &Z2Vector {
        &self.data.lanes[j]
    }

    #[inline]
    pub fn as_cols(&self) -> &[Z2Vector] {
        &self.data.lanes
    }

    #[inline]
    pub fn into_cols(self) -> Vec<Z2Vector> {
        self.data.lanes
    }

    /// Returns the transpose in row-major layout. The columns of `self` become the rows of the
    /// result without moving any bits.
    #[inline]
    pub fn transpose(self) -> RowMatrix {
        RowMatrix { data: self.data }
    }

    /// Over GF(2) the adjoint is the transpose
    #[inline]
    pub fn adjoint(self) -> RowMatrix {
        self.transpose()
    }

    /// Returns a transposed copy of the matrix, still in column-major layout. This relocates
    /// every bit.
    #[inline]
    pub fn transposed(&self) -> ColMatrix {
        ColMatrix {
            data: self.data.relocated(),
        }
    }

    /// Matrix-vector product: the sum of the columns selected by the set bits of `v`.
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

        let mut res = Z2Vector::zeros(self.rows());
        for (col, b) in self.data.lanes.iter().zip(v.iter()) {
            if b {
                res.xor_in(col);
            }
        }
        Ok(res)
    }

    /// Matrix product. Column `j` of the result is the sum of the columns of `self` selected by
    /// the set bits of column `j` of `rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Dimension`] if `self.cols() != rhs.rows()`.
    pub fn try_mul(&self, rhs: &ColMatrix) -> Result<ColMatrix> {
        if self.cols() != rhs.rows() {
            return Err(Z2Error::dimension("mul", self.size(), rhs.size()));
        }
        let _span =
            tracing::debug_span!("mul", m = self.rows(), k = self.cols(), n = rhs.cols()).entered();

        let cols = rhs
            .data
            .lanes
            .iter()
            .map(|c| self.try_mul_vector(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(ColMatrix {
            data: Lanes::from_vectors(cols, self.rows())?,
        })
    }
}

impl From<&RowMatrix> for ColMatrix {
    /// Same matrix in column-major layout
    fn from(value: &RowMatrix) -> Self {
        ColMatrix {
            data: value.data.relocated(),
        }
    }
}

impl From<RowMatrix> for ColMatrix {
    fn from(value: RowMatrix) -> Self {
        ColMatrix::from(&value)
    }
}

impl Mul for &ColMatrix {
    type Output = ColMatrix;

    fn mul(self, rhs: Self) -> Self::Output {
        self.try_mul(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Mul<&Z2Vector> for &ColMatrix {
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
        let m = ColMatrix::from_words(&[1, 3, 5], 3);
        let expected = [[1, 1, 1], [0, 1, 0], [0, 0, 1]];
        assert_eq!(m, ColMatrix::from_dense(&expected).unwrap());
        assert_eq!(m.col(1).to_u64(), Some(3));
    }

    #[test]
    fn wide_columns_from_limbs() {
        let m = ColMatrix::from_limbs(&[vec![0u64, 1], vec![1u64]], 100);
        assert_eq!(m.size(), (100, 2));
        assert!(m[(64, 0)] && m[(0, 1)]);
        assert_eq!(m.col(0).weight(), 1);
        assert_eq!(m.col(1).weight(), 1);
        assert_eq!(m, RowMatrix::from(&m));
    }

    #[test]
    fn non_square_shapes() {
        let m = ColMatrix::zeros(3, 0);
        assert_eq!(m.size(), (3, 0));
        assert_eq!(m.rank(), 0);
        let m = ColMatrix::zeros(0, 4);
        assert_eq!(m.size(), (0, 4));
        assert_eq!(m.transposed().size(), (4, 0));
    }

    #[test]
    fn identity() {
        let m = ColMatrix::identity(70);
        for j in 0..70 {
            assert_eq!(m.col(j).weight(), 1);
            assert!(m[(j, j)]);
        }
        assert_eq!(m.rank(), 70);
        assert!(m.det().unwrap());
    }

    #[test]
    fn layout_conversion() {
        let mut rng = SmallRng::seed_from_u64(1);
        let c = ColMatrix::random(&mut rng, 13, 75);
        let r = RowMatrix::from(&c);
        assert_eq!(r.size(), c.size());
        assert_eq!(r, c);
        assert_eq!(ColMatrix::from(r.clone()), c);
        assert_eq!(RowMatrix::from_matrix(&c), r);
        assert_eq!(ColMatrix::from_matrix(&r), c);
    }

    #[test]
    fn complement_padding() {
        let mut m = ColMatrix::zeros(5, 3);
        m.complement();
        assert!(m.is_padding_clear());
        assert!(m.as_cols().iter().all(|c| c.to_u64() == Some(0b11111)));
        assert!((!m).is_zero());
    }

    #[test]
    fn mul_vector_matches_rows() {
        let mut rng = SmallRng::seed_from_u64(2);
        let c = ColMatrix::random(&mut rng, 9, 12);
        let r = RowMatrix::from(&c);
        for _ in 0..10 {
            let v = Z2Vector::random(&mut rng, 12);
            assert_eq!(&c * &v, &r * &v);
        }
    }

    #[test]
    fn matrix_mult() {
        let mut rng = SmallRng::seed_from_u64(3);
        let a = ColMatrix::random(&mut rng, 6, 8);
        let b = ColMatrix::random(&mut rng, 8, 5);
        let prod = &a * &b;
        let expected = &RowMatrix::from(&a) * &RowMatrix::from(&b);
        assert_eq!(prod, expected);
        assert!(matches!(a.try_mul(&a), Err(Z2Error::Dimension { .. })));
    }

    #[test]
    fn rank_matches_row_layout() {
        let mut rng = SmallRng::seed_from_u64(4);
        for (rows, cols) in [(5, 5), (4, 9), (9, 4), (70, 66)] {
            let c = ColMatrix::random(&mut rng, rows, cols);
            assert_eq!(c.rank(), RowMatrix::from(&c).rank());
        }
    }

    #[test]
    fn column_echelon() {
        let mut m = ColMatrix::from_words(&[0b110, 0b011, 0b101], 3);
        let pivots = m.gauss(true);
        assert_eq!(pivots, vec![0, 1]);
        assert!(m.col(2).is_zero());
    }
}
