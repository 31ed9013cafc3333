//! Matrices over GF(2) in two physical layouts.
//!
//! [`RowMatrix`] packs each row into a [`Z2Vector`](crate::Z2Vector) and [`ColMatrix`] packs each
//! column. Both implement [`Z2Matrix`], and every operation they share yields the same entries
//! regardless of layout. Converting between layouts is always explicit:
//!
//! - [`RowMatrix::transpose`] / [`ColMatrix::transpose`] reinterpret the packed lanes in the
//!   other layout, which transposes the matrix in O(1) without moving any bits;
//! - `From<&ColMatrix> for RowMatrix` (and the reverse) keep the shape and relocate every bit;
//! - [`RowMatrix::transposed`] / [`ColMatrix::transposed`] keep the layout and relocate every bit.
//!
//! Only single-entry access is provided. Reading or writing a block costs one call per entry.

use crate::error::{Result, Z2Error};

/// Operations common to both matrix layouts
pub trait Z2Matrix {
    /// Returns `(rows, cols)`
    fn size(&self) -> (usize, usize);

    /// Gets the entry at row `i`, column `j`
    ///
    /// # Panics
    ///
    /// Panics if the entry is out of bounds. Use [`Z2Matrix::get`] for a fallible read.
    fn bit(&self, i: usize, j: usize) -> bool;

    /// Sets the entry at row `i`, column `j` to `b`
    ///
    /// # Panics
    ///
    /// Panics if the entry is out of bounds. Use [`Z2Matrix::set`] for a fallible write.
    fn set_bit(&mut self, i: usize, j: usize, b: bool);

    #[inline]
    fn rows(&self) -> usize {
        self.size().0
    }

    #[inline]
    fn cols(&self) -> usize {
        self.size().1
    }

    #[inline]
    fn is_square(&self) -> bool {
        let (rows, cols) = self.size();
        rows == cols
    }

    /// Returns [`Z2Error::EntryIndex`] unless `(i, j)` lies inside the matrix
    #[inline]
    fn check_entry(&self, i: usize, j: usize) -> Result<()> {
        let (rows, cols) = self.size();
        if i < rows && j < cols {
            Ok(())
        } else {
            Err(Z2Error::EntryIndex {
                row: i,
                col: j,
                rows,
                cols,
            })
        }
    }

    /// Gets the entry at row `i`, column `j`
    #[inline]
    fn get(&self, i: usize, j: usize) -> Result<bool> {
        self.check_entry(i, j)?;
        Ok(self.bit(i, j))
    }

    /// Sets the entry at row `i`, column `j` to `value`
    #[inline]
    fn set(&mut self, i: usize, j: usize, value: bool) -> Result<()> {
        self.check_entry(i, j)?;
        self.set_bit(i, j, value);
        Ok(())
    }

    /// Returns the entries as a vector of rows
    fn to_dense(&self) -> Vec<Vec<bool>> {
        let (rows, cols) = self.size();
        (0..rows)
            .map(|i| (0..cols).map(|j| self.bit(i, j)).collect())
            .collect()
    }

    /// Compares shape and entries with a matrix of any layout
    fn entries_eq(&self, other: &dyn Z2Matrix) -> bool {
        let (rows, cols) = self.size();
        if other.size() != (rows, cols) {
            return false;
        }
        (0..rows).all(|i| (0..cols).all(|j| self.bit(i, j) == other.bit(i, j)))
    }
}

/// Implements everything the two layouts share in terms of their lanes.
///
/// `$row_lanes` is `true` when lanes are rows. The invoking module must have `Z2Matrix`,
/// `LaneOps`, `Lanes`, `Z2Vector`, `IntoBit`, `Result` and `Z2Error` in scope.
macro_rules! lane_matrix {
    ($name:ident, $row_lanes:expr) => {
        impl $name {
            /// `(lane count, lane length)` for a matrix of the given shape
            #[inline]
            fn lane_shape(rows: usize, cols: usize) -> (usize, usize) {
                if $row_lanes {
                    (rows, cols)
                } else {
                    (cols, rows)
                }
            }

            /// `(lane, position)` holding entry `(i, j)`
            #[inline]
            fn locate(i: usize, j: usize) -> (usize, usize) {
                if $row_lanes {
                    (i, j)
                } else {
                    (j, i)
                }
            }

            /// Creates a `rows` x `cols` matrix with all entries zero
            pub fn zeros(rows: usize, cols: usize) -> Self {
                let (count, lane_len) = Self::lane_shape(rows, cols);
                $name {
                    data: Lanes::zeros(count, lane_len),
                }
            }

            /// Creates the `size` x `size` identity matrix
            pub fn identity(size: usize) -> Self {
                $name {
                    data: Lanes::identity(size),
                }
            }

            /// Returns a zero matrix with the same shape and layout
            #[inline]
            pub fn similar(&self) -> Self {
                let (rows, cols) = self.size();
                Self::zeros(rows, cols)
            }

            /// Builds a matrix from a function `f` that determines the value of each entry
            pub fn build(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
                let mut m = Self::zeros(rows, cols);
                for i in 0..rows {
                    for j in 0..cols {
                        if f(i, j) {
                            let (lane, pos) = Self::locate(i, j);
                            m.data.lanes[lane].set_bit(pos, true);
                        }
                    }
                }
                m
            }

            /// Creates a matrix from a dense sequence of rows, coercing each entry with
            /// [`IntoBit`]. An empty sequence gives a 0 x 0 matrix.
            ///
            /// # Errors
            ///
            /// Returns [`Z2Error::Dimension`] if the rows have different lengths.
            pub fn from_dense<T: IntoBit + Copy, R: AsRef<[T]>>(data: &[R]) -> Result<Self> {
                let data: Vec<&[T]> = data.iter().map(|r| AsRef::<[T]>::as_ref(r)).collect();
                let rows = data.len();
                let cols = data.first().map_or(0, |r| r.len());
                if let Some(bad) = data.iter().find(|r| r.len() != cols) {
                    return Err(Z2Error::dimension(
                        "from_dense",
                        (rows, cols),
                        (1, bad.len()),
                    ));
                }
                Ok(Self::build(rows, cols, |i, j| data[i][j].into_bit()))
            }

            /// Copies the entries of a matrix of any layout into this layout
            pub fn from_matrix(m: &(impl Z2Matrix + ?Sized)) -> Self {
                let (rows, cols) = m.size();
                Self::build(rows, cols, |i, j| m.bit(i, j))
            }

            /// Creates a uniformly random `rows` x `cols` matrix
            #[inline]
            pub fn random(rng: &mut impl rand::Rng, rows: usize, cols: usize) -> Self {
                let (count, lane_len) = Self::lane_shape(rows, cols);
                $name {
                    data: Lanes::random(rng, count, lane_len),
                }
            }

            /// Creates a random invertible `size` x `size` matrix by applying random lane
            /// additions to the identity
            pub fn random_invertible(rng: &mut impl rand::Rng, size: usize) -> Self {
                let mut m = Self::identity(size);
                if size < 2 {
                    return m;
                }

                for _ in 0..10 * size * size {
                    let l1 = rng.random_range(0..size);
                    let mut l2 = rng.random_range(0..size - 1);
                    if l2 >= l1 {
                        l2 += 1;
                    }
                    LaneOps::add_lane(&mut m.data, l1, l2);
                }

                m
            }

            /// Sets every entry to `value`
            #[inline]
            pub fn fill(&mut self, value: bool) {
                self.data.fill(value);
            }

            /// Multiplies by a scalar in place. Left and right multiplication coincide.
            #[inline]
            pub fn scale(&mut self, s: bool) {
                self.data.scale(s);
            }

            /// Complements every entry in place
            #[inline]
            pub fn complement(&mut self) {
                self.data.complement();
            }

            /// Checks if every entry is zero
            #[inline]
            pub fn is_zero(&self) -> bool {
                self.data.is_zero()
            }

            /// Checks the padding invariant of every lane
            pub fn is_padding_clear(&self) -> bool {
                self.data.lanes.iter().all(|l| l.is_padding_clear())
            }

            #[inline]
            fn check_shape(&self, op: &'static str, rhs: &Self) -> Result<()> {
                if self.size() != rhs.size() {
                    Err(Z2Error::dimension(op, self.size(), rhs.size()))
                } else {
                    Ok(())
                }
            }

            fn zip_checked(
                &self,
                op: &'static str,
                rhs: &Self,
                f: impl Fn(&mut Z2Vector, &Z2Vector),
            ) -> Result<Self> {
                self.check_shape(op, rhs)?;
                let mut res = self.clone();
                res.data.zip_with(&rhs.data, f);
                Ok(res)
            }

            /// Entrywise AND
            pub fn and(&self, rhs: &Self) -> Result<Self> {
                self.zip_checked("and", rhs, |a, b| a.and_in(b))
            }

            /// Entrywise OR
            pub fn or(&self, rhs: &Self) -> Result<Self> {
                self.zip_checked("or", rhs, |a, b| a.or_in(b))
            }

            /// Entrywise XOR, the same as [`Self::try_add`]
            pub fn xor(&self, rhs: &Self) -> Result<Self> {
                self.zip_checked("xor", rhs, |a, b| a.xor_in(b))
            }

            /// Entrywise NOR
            pub fn nor(&self, rhs: &Self) -> Result<Self> {
                self.zip_checked("nor", rhs, |a, b| {
                    a.or_in(b);
                    a.complement();
                })
            }

            /// Entrywise NAND
            pub fn nand(&self, rhs: &Self) -> Result<Self> {
                self.zip_checked("nand", rhs, |a, b| {
                    a.and_in(b);
                    a.complement();
                })
            }

            /// Matrix sum over GF(2).
            ///
            /// # Errors
            ///
            /// Returns [`Z2Error::Dimension`] if the shapes differ.
            pub fn try_add(&self, rhs: &Self) -> Result<Self> {
                self.zip_checked("add", rhs, |a, b| a.xor_in(b))
            }

            /// In-place version of [`Self::try_add`]. `self` is untouched on error.
            pub fn try_add_assign(&mut self, rhs: &Self) -> Result<()> {
                self.check_shape("add", rhs)?;
                self.data.zip_with(&rhs.data, |a, b| a.xor_in(b));
                Ok(())
            }

            /// Perform gaussian elimination over the lanes, returning the pivot positions.
            ///
            /// If `full` is true, then perform full Gauss-Jordan to produce reduced echelon
            /// form, otherwise just return echelon form.
            #[inline]
            pub fn gauss(&mut self, full: bool) -> Vec<usize> {
                self.data.gauss_helper(full, &mut ())
            }

            /// Compute the rank of the matrix using gaussian elimination
            pub fn rank(&self) -> usize {
                let (rows, cols) = self.size();
                let _span = tracing::debug_span!("rank", rows, cols).entered();
                self.data.rank()
            }

            /// Determinant over GF(2): `true` exactly when the matrix has full rank.
            ///
            /// # Errors
            ///
            /// Returns [`Z2Error::Dimension`] if the matrix is not square.
            pub fn det(&self) -> Result<bool> {
                let (rows, cols) = self.size();
                if rows != cols {
                    return Err(Z2Error::dimension("det", (rows, cols), (rows, rows)));
                }
                Ok(self.rank() == rows)
            }
        }

        impl Z2Matrix for $name {
            #[inline]
            fn size(&self) -> (usize, usize) {
                let (count, lane_len) = (self.data.count(), self.data.lane_len);
                if $row_lanes {
                    (count, lane_len)
                } else {
                    (lane_len, count)
                }
            }

            #[inline]
            fn bit(&self, i: usize, j: usize) -> bool {
                let (rows, cols) = self.size();
                assert!(
                    i < rows && j < cols,
                    "entry ({i}, {j}) is out of bounds for a {rows}x{cols} matrix"
                );
                let (lane, pos) = Self::locate(i, j);
                self.data.lanes[lane].bit(pos)
            }

            #[inline]
            fn set_bit(&mut self, i: usize, j: usize, b: bool) {
                let (rows, cols) = self.size();
                assert!(
                    i < rows && j < cols,
                    "entry ({i}, {j}) is out of bounds for a {rows}x{cols} matrix"
                );
                let (lane, pos) = Self::locate(i, j);
                self.data.lanes[lane].set_bit(pos, b);
            }
        }

        impl LaneOps for $name {
            #[inline]
            fn add_lane(&mut self, from: usize, to: usize) {
                self.data.add_lane(from, to);
            }

            #[inline]
            fn swap_lanes(&mut self, a: usize, b: usize) {
                self.data.swap_lanes(a, b);
            }
        }

        impl std::ops::Index<(usize, usize)> for $name {
            type Output = bool;

            #[inline]
            fn index(&self, index: (usize, usize)) -> &Self::Output {
                if self.bit(index.0, index.1) {
                    &true
                } else {
                    &false
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let (rows, cols) = self.size();
                for i in 0..rows {
                    for j in 0..cols {
                        write!(f, " {} ", if self.bit(i, j) { 1 } else { 0 })?;
                    }
                    writeln!(f)?;
                }

                Ok(())
            }
        }

        impl std::ops::Not for $name {
            type Output = $name;

            #[inline]
            fn not(mut self) -> Self::Output {
                self.complement();
                self
            }
        }

        impl std::ops::Not for &$name {
            type Output = $name;

            #[inline]
            fn not(self) -> Self::Output {
                !self.clone()
            }
        }

        impl std::ops::BitAnd for &$name {
            type Output = $name;

            fn bitand(self, rhs: Self) -> Self::Output {
                self.and(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }

        impl std::ops::BitOr for &$name {
            type Output = $name;

            fn bitor(self, rhs: Self) -> Self::Output {
                self.or(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }

        impl std::ops::BitXor for &$name {
            type Output = $name;

            fn bitxor(self, rhs: Self) -> Self::Output {
                self.xor(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }

        impl std::ops::Add for &$name {
            type Output = $name;

            fn add(self, rhs: Self) -> Self::Output {
                self.try_add(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }

        impl std::ops::Add for $name {
            type Output = $name;

            fn add(mut self, rhs: Self) -> Self::Output {
                self += &rhs;
                self
            }
        }

        impl std::ops::AddAssign<&$name> for $name {
            fn add_assign(&mut self, rhs: &$name) {
                self.try_add_assign(rhs).unwrap_or_else(|e| panic!("{e}"));
            }
        }

        impl std::ops::MulAssign<bool> for $name {
            #[inline]
            fn mul_assign(&mut self, rhs: bool) {
                self.scale(rhs);
            }
        }
    };
}

pub mod col;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod row;

pub use col::ColMatrix;
pub use row::RowMatrix;

/// Entrywise comparison across layouts
impl PartialEq<ColMatrix> for RowMatrix {
    fn eq(&self, other: &ColMatrix) -> bool {
        self.entries_eq(other)
    }
}

impl PartialEq<RowMatrix> for ColMatrix {
    fn eq(&self, other: &RowMatrix) -> bool {
        self.entries_eq(other)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn dyn_interface() {
        let mut rng = SmallRng::seed_from_u64(1);
        let r = RowMatrix::random(&mut rng, 5, 7);
        let c = ColMatrix::from(&r);
        let ms: [&dyn Z2Matrix; 2] = [&r, &c];
        for m in ms {
            assert_eq!(m.size(), (5, 7));
            assert_eq!(m.to_dense(), r.to_dense());
            assert!(m.get(5, 0).is_err());
            assert!(m.get(0, 7).is_err());
        }
    }

    #[test]
    fn set_out_of_bounds() {
        let mut r = RowMatrix::zeros(2, 3);
        assert_eq!(
            r.set(2, 0, true),
            Err(Z2Error::EntryIndex {
                row: 2,
                col: 0,
                rows: 2,
                cols: 3
            })
        );
        let mut c = ColMatrix::zeros(2, 3);
        assert!(c.set(0, 3, true).unwrap_err().is_index_error());
        assert!(r.is_zero() && c.is_zero());
    }

    #[test]
    fn cross_layout_eq() {
        let r = RowMatrix::from_words(&[1, 3, 5], 3);
        let c = ColMatrix::from_words(&[0b111, 0b010, 0b100], 3);
        assert_eq!(r, c);
        assert_eq!(c, r);
        assert_ne!(r, ColMatrix::from_words(&[1, 3, 5], 3));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_panics() {
        let m = ColMatrix::zeros(2, 2);
        let _b: bool = m[(0, 2)];
    }
}
