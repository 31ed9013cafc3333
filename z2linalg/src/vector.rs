use crate::error::{Result, Z2Error};
use crate::width::{min_limbs, Limb};
use crate::word::PackedWord;
use rand::Rng;
use std::fmt;
use std::ops::{Add, AddAssign, Index, Mul, MulAssign};

/// Conversion of a scalar to an element of GF(2).
///
/// Any non-zero numeric value maps to `true` and zero maps to `false`; a `bool` maps to
/// itself. Dense constructors throughout the crate coerce their input with this rule.
pub trait IntoBit {
    fn into_bit(self) -> bool;
}

impl IntoBit for bool {
    #[inline]
    fn into_bit(self) -> bool {
        self
    }
}

impl<T: IntoBit + Copy> IntoBit for &T {
    #[inline]
    fn into_bit(self) -> bool {
        (*self).into_bit()
    }
}

macro_rules! int_into_bit {
    ($($t:ty),*) => {
        $(
            impl IntoBit for $t {
                #[inline]
                fn into_bit(self) -> bool {
                    self != 0
                }
            }
        )*
    };
}

int_into_bit!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl IntoBit for f32 {
    #[inline]
    fn into_bit(self) -> bool {
        self != 0.0
    }
}

impl IntoBit for f64 {
    #[inline]
    fn into_bit(self) -> bool {
        self != 0.0
    }
}

/// A vector over GF(2), packed into a single [`PackedWord`].
///
/// The word is always of the smallest class holding `len` bits (see
/// [`minimal_width`](crate::width::minimal_width)), entry `i` is bit `i` of the word, and every
/// bit at position `len` or above is zero.
///
/// # Examples
///
/// ```
/// use z2linalg::Z2Vector;
///
/// let v = Z2Vector::from_int(0b10110, 5);
/// let entries: Vec<bool> = v.iter().collect();
/// assert_eq!(entries, vec![false, true, true, false, true]);
///
/// let u = Z2Vector::from_int(0b011, 3);
/// assert!(Z2Vector::from_int(0b101, 3).dot(&u).unwrap());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Z2Vector {
    data: PackedWord,
    len: usize,
}

impl Z2Vector {
    /// Creates a vector of length `len` with all entries zero
    #[inline]
    pub fn zeros(len: usize) -> Self {
        Z2Vector {
            data: PackedWord::zeroed(len),
            len,
        }
    }

    /// Creates a vector of length `len` from the low `len` bits of `value`. Higher bits of
    /// `value` are discarded.
    #[inline]
    pub fn from_int(value: u64, len: usize) -> Self {
        Z2Vector {
            data: PackedWord::from_u64(value, len),
            len,
        }
    }

    /// Creates a vector of length `len` from little-endian limbs, discarding any bit at position
    /// `len` or above.
    #[inline]
    pub fn from_limbs(limbs: &[Limb], len: usize) -> Self {
        Z2Vector {
            data: PackedWord::from_limbs(limbs, len),
            len,
        }
    }

    /// Creates a vector from a dense sequence, coercing each element with [`IntoBit`].
    ///
    /// ```
    /// use z2linalg::Z2Vector;
    ///
    /// let v = Z2Vector::from_dense([25, 0, -3, 0]);
    /// assert_eq!(v, Z2Vector::from_int(0b0101, 4));
    /// ```
    pub fn from_dense<T: IntoBit>(data: impl IntoIterator<Item = T>) -> Self {
        let bits: Vec<bool> = data.into_iter().map(IntoBit::into_bit).collect();
        Self::build(bits.len(), |i| bits[i])
    }

    /// Builds a vector of length `len` where entry `i` is `f(i)`
    pub fn build(len: usize, mut f: impl FnMut(usize) -> bool) -> Self {
        let mut v = Self::zeros(len);
        for i in 0..len {
            if f(i) {
                v.data.assign_bit(i, true);
            }
        }
        v
    }

    /// Creates a uniformly random vector of length `len`
    #[inline]
    pub fn random(rng: &mut impl Rng, len: usize) -> Self {
        let limbs: Vec<Limb> = (0..min_limbs(len)).map(|_| rng.random::<Limb>()).collect();
        Self::from_limbs(&limbs, len)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The word backing this vector
    #[inline]
    pub fn word(&self) -> &PackedWord {
        &self.data
    }

    /// Returns the entries as little-endian limbs
    #[inline]
    pub fn to_limbs(&self) -> Vec<Limb> {
        self.data.to_limbs()
    }

    /// Returns the entries read as an integer, or `None` if an entry at position 64 or above is
    /// set.
    pub fn to_u64(&self) -> Option<u64> {
        let limbs = self.data.to_limbs();
        if limbs.iter().skip(1).any(|&l| l != 0) {
            None
        } else {
            Some(limbs.first().copied().unwrap_or(0))
        }
    }

    /// Gets the entry at position `i`
    ///
    /// # Panics
    ///
    /// Panics if `i >= len`. Use [`Z2Vector::get`] for a fallible read.
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        assert!(i < self.len, "index {i} is out of bounds for length {}", self.len);
        self.data.bit(i)
    }

    /// Sets the entry at position `i` to `b`, without bounds checking against `len`
    #[inline]
    pub(crate) fn set_bit(&mut self, i: usize, b: bool) {
        debug_assert!(i < self.len);
        self.data.assign_bit(i, b);
    }

    #[inline]
    fn check(&self, i: usize) -> Result<()> {
        if i >= self.len {
            Err(Z2Error::Index {
                index: i,
                bound: self.len,
            })
        } else {
            Ok(())
        }
    }

    /// Gets the entry at position `i`.
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Index`] if `i >= len`.
    #[inline]
    pub fn get(&self, i: usize) -> Result<bool> {
        self.check(i)?;
        Ok(self.data.bit(i))
    }

    /// Sets the entry at position `i` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Index`] if `i >= len`.
    #[inline]
    pub fn set(&mut self, i: usize, value: bool) -> Result<()> {
        self.check(i)?;
        self.data.assign_bit(i, value);
        Ok(())
    }

    /// Sets every entry to `value`. Padding bits stay zero.
    #[inline]
    pub fn fill(&mut self, value: bool) {
        if value {
            self.data.fill_ones(self.len);
        } else {
            self.data.clear();
        }
    }

    /// Multiplies by a scalar in place: zeroes the vector if `s` is zero, otherwise leaves it
    /// unchanged.
    #[inline]
    pub fn scale(&mut self, s: bool) {
        if !s {
            self.data.clear();
        }
    }

    /// Entrywise sum (XOR) of two vectors.
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Dimension`] if the lengths differ.
    #[inline]
    pub fn try_add(&self, rhs: &Z2Vector) -> Result<Z2Vector> {
        let mut res = self.clone();
        res.try_add_assign(rhs)?;
        Ok(res)
    }

    /// In-place version of [`Z2Vector::try_add`]. `self` is untouched on error.
    #[inline]
    pub fn try_add_assign(&mut self, rhs: &Z2Vector) -> Result<()> {
        self.check_len("add", rhs)?;
        self.xor_in(rhs);
        Ok(())
    }

    /// Dot product over GF(2): the parity of the number of positions set in both vectors.
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Dimension`] if the lengths differ.
    #[inline]
    pub fn dot(&self, rhs: &Z2Vector) -> Result<bool> {
        self.check_len("dot", rhs)?;
        Ok(self.data.and_parity(&rhs.data))
    }

    #[inline]
    fn check_len(&self, op: &'static str, rhs: &Z2Vector) -> Result<()> {
        if self.len != rhs.len {
            Err(Z2Error::dimension(op, (1, self.len), (1, rhs.len)))
        } else {
            Ok(())
        }
    }

    /// Returns the number of 1s in the vector (Hamming weight)
    #[inline]
    pub fn weight(&self) -> usize {
        self.data.count_ones() as usize
    }

    /// Checks if the vector consists of all zero bits
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.data.is_zero()
    }

    /// Returns an iterator over the entries, starting at position 0
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.data.bit(i))
    }

    // Lane-level operations used by the matrix types. Lengths are checked by the caller.

    #[inline]
    pub(crate) fn xor_in(&mut self, rhs: &Z2Vector) {
        debug_assert_eq!(self.len, rhs.len);
        self.data.xor_assign(&rhs.data);
    }

    #[inline]
    pub(crate) fn and_in(&mut self, rhs: &Z2Vector) {
        debug_assert_eq!(self.len, rhs.len);
        self.data.and_assign(&rhs.data);
    }

    #[inline]
    pub(crate) fn or_in(&mut self, rhs: &Z2Vector) {
        debug_assert_eq!(self.len, rhs.len);
        self.data.or_assign(&rhs.data);
    }

    /// Complements every entry, then clears the padding bits the complement turned on
    #[inline]
    pub(crate) fn complement(&mut self) {
        self.data.not_assign();
        self.data.mask_to(self.len);
    }

    /// Checks the padding invariant. Always true unless this crate has a bug.
    #[inline]
    pub fn is_padding_clear(&self) -> bool {
        let mut masked = self.data.clone();
        masked.mask_to(self.len);
        masked == self.data
    }
}

/// Formats the vector for display
impl fmt::Display for Z2Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, b) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", if b { 1 } else { 0 })?;
        }
        write!(f, "]")
    }
}

/// Allows indexing into the vector to return the entry at `index`
impl Index<usize> for Z2Vector {
    type Output = bool;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        if self.get(index).unwrap_or_else(|e| panic!("{e}")) {
            &true
        } else {
            &false
        }
    }
}

impl Add for &Z2Vector {
    type Output = Z2Vector;

    fn add(self, rhs: Self) -> Self::Output {
        self.try_add(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Add for Z2Vector {
    type Output = Z2Vector;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += &rhs;
        self
    }
}

impl AddAssign<&Z2Vector> for Z2Vector {
    fn add_assign(&mut self, rhs: &Z2Vector) {
        self.try_add_assign(rhs).unwrap_or_else(|e| panic!("{e}"));
    }
}

/// Right scalar multiplication
impl MulAssign<bool> for Z2Vector {
    #[inline]
    fn mul_assign(&mut self, rhs: bool) {
        self.scale(rhs);
    }
}

impl Mul<bool> for Z2Vector {
    type Output = Z2Vector;

    #[inline]
    fn mul(mut self, rhs: bool) -> Self::Output {
        self.scale(rhs);
        self
    }
}

/// Left scalar multiplication, identical to right multiplication
impl Mul<Z2Vector> for bool {
    type Output = Z2Vector;

    #[inline]
    fn mul(self, mut rhs: Z2Vector) -> Self::Output {
        rhs.scale(self);
        rhs
    }
}

impl FromIterator<bool> for Z2Vector {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Z2Vector::from_dense(iter)
    }
}

impl From<Vec<bool>> for Z2Vector {
    fn from(value: Vec<bool>) -> Self {
        Z2Vector::from_dense(value)
    }
}

impl From<Z2Vector> for Vec<bool> {
    fn from(value: Z2Vector) -> Self {
        value.iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn from_int_reads_low_to_high() {
        let v = Z2Vector::from_int(0b10110, 5);
        assert_eq!(v.len(), 5);
        let bits: Vec<bool> = v.into();
        assert_eq!(bits, vec![false, true, true, false, true]);
    }

    #[test]
    fn from_int_masks() {
        let v = Z2Vector::from_int(0xff, 3);
        assert_eq!(v.to_u64(), Some(0b111));
        assert!(v.is_padding_clear());
    }

    #[test]
    fn from_dense_coerces() {
        let v = Z2Vector::from_dense([3u8, 0, 1, 0, 200]);
        assert_eq!(v.to_u64(), Some(0b10101));
        let w = Z2Vector::from_dense([0.5f64, 0.0]);
        assert_eq!(w.to_u64(), Some(0b01));
        let e = Z2Vector::from_dense(Vec::<bool>::new());
        assert!(e.is_empty());
    }

    #[test]
    fn get_set() {
        let mut v = Z2Vector::zeros(10);
        v.set(3, true).unwrap();
        v.set(9, true).unwrap();
        assert!(v.get(3).unwrap());
        assert!(!v.get(4).unwrap());
        assert_eq!(v.weight(), 2);
        assert_eq!(v.get(10), Err(Z2Error::Index { index: 10, bound: 10 }));
        assert!(v.set(12, true).is_err());
        assert_eq!(v.weight(), 2);
    }

    #[test]
    fn fill_keeps_padding() {
        for len in [0, 1, 5, 8, 13, 64, 65, 200] {
            let mut v = Z2Vector::zeros(len);
            v.fill(true);
            assert_eq!(v.weight(), len);
            assert!(v.is_padding_clear());
            v.fill(false);
            assert!(v.is_zero());
        }
    }

    #[test]
    fn scalar_mul() {
        let v = Z2Vector::from_int(0b1101, 4);
        assert_eq!(v.clone() * true, v);
        assert_eq!(true * v.clone(), v);
        assert!((v.clone() * false).is_zero());
        let mut w = v.clone();
        w *= false;
        assert_eq!(w, Z2Vector::zeros(4));
    }

    #[test]
    fn add_and_dot() {
        let u = Z2Vector::from_int(0b101, 3);
        let v = Z2Vector::from_int(0b011, 3);
        assert_eq!(&u + &v, Z2Vector::from_int(0b110, 3));
        assert!(u.dot(&v).unwrap());
        assert!(!u.dot(&u).unwrap());

        let w = Z2Vector::zeros(4);
        assert!(matches!(u.try_add(&w), Err(Z2Error::Dimension { .. })));
        assert!(matches!(u.dot(&w), Err(Z2Error::Dimension { .. })));
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn add_mismatch_panics() {
        let _ = &Z2Vector::zeros(3) + &Z2Vector::zeros(4);
    }

    #[test]
    fn wide_vectors() {
        let mut rng = SmallRng::seed_from_u64(1);
        let u = Z2Vector::random(&mut rng, 150);
        let v = Z2Vector::random(&mut rng, 150);
        assert!(u.is_padding_clear());

        let mut expected = false;
        for i in 0..150 {
            expected ^= u[i] & v[i];
        }
        assert_eq!(u.dot(&v).unwrap(), expected);

        let sum = &u + &v;
        for i in 0..150 {
            assert_eq!(sum[i], u[i] ^ v[i]);
        }
        assert_eq!(Z2Vector::from_int(7, 100).to_u64(), Some(7));
    }

    #[test]
    fn complement_clears_padding() {
        let mut v = Z2Vector::from_int(0b0101, 4);
        v.complement();
        assert_eq!(v.to_u64(), Some(0b1010));
        assert!(v.is_padding_clear());

        let mut w = Z2Vector::zeros(70);
        w.complement();
        assert_eq!(w.weight(), 70);
        assert!(w.is_padding_clear());
    }

    #[test]
    fn display() {
        assert_eq!(Z2Vector::from_int(0b110, 3).to_string(), "[0, 1, 1]");
    }
}
