/// A limb of an arbitrary-precision word. This is an alias for [`u64`]
pub type Limb = u64;

/// Number of bits in a [`Limb`]
pub const LIMBSIZE: usize = 64;

/// Returns the minimum number of [`Limb`]s required to store the given number of bits.
///
/// If `bits` is not a multiple of [`LIMBSIZE`], the result is rounded up to ensure all bits fit.
#[inline]
pub fn min_limbs(bits: usize) -> usize {
    bits / LIMBSIZE + if bits % LIMBSIZE == 0 { 0 } else { 1 }
}

/// The storage class of a [`PackedWord`](crate::word::PackedWord).
///
/// Fixed-width classes hold up to 8, 16, 32 or 64 bits. Anything longer falls back to
/// [`WidthClass::Arbitrary`], which stores as many [`Limb`]s as needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidthClass {
    W8,
    W16,
    W32,
    W64,
    Arbitrary,
}

/// Returns the smallest width class able to hold `bits` bits.
///
/// ```
/// use z2linalg::width::{minimal_width, WidthClass};
///
/// assert_eq!(minimal_width(5), WidthClass::W8);
/// assert_eq!(minimal_width(9), WidthClass::W16);
/// assert_eq!(minimal_width(32), WidthClass::W32);
/// assert_eq!(minimal_width(33), WidthClass::W64);
/// assert_eq!(minimal_width(100), WidthClass::Arbitrary);
/// ```
#[inline]
pub const fn minimal_width(bits: usize) -> WidthClass {
    match bits {
        0..=8 => WidthClass::W8,
        9..=16 => WidthClass::W16,
        17..=32 => WidthClass::W32,
        33..=64 => WidthClass::W64,
        _ => WidthClass::Arbitrary,
    }
}

impl WidthClass {
    /// The inverse of [`minimal_width`]: the number of bits held by a fixed-width class, or
    /// `None` for [`WidthClass::Arbitrary`].
    #[inline]
    pub const fn bits(self) -> Option<usize> {
        match self {
            WidthClass::W8 => Some(8),
            WidthClass::W16 => Some(16),
            WidthClass::W32 => Some(32),
            WidthClass::W64 => Some(64),
            WidthClass::Arbitrary => None,
        }
    }

    #[inline]
    pub const fn is_fixed(self) -> bool {
        !matches!(self, WidthClass::Arbitrary)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn minimal_width_boundaries() {
        assert_eq!(minimal_width(0), WidthClass::W8);
        assert_eq!(minimal_width(8), WidthClass::W8);
        assert_eq!(minimal_width(16), WidthClass::W16);
        assert_eq!(minimal_width(17), WidthClass::W32);
        assert_eq!(minimal_width(64), WidthClass::W64);
        assert_eq!(minimal_width(65), WidthClass::Arbitrary);
    }

    #[test]
    fn width_inverse() {
        for bits in 1..=64 {
            let class = minimal_width(bits);
            let width = class.bits().unwrap();
            assert!(width >= bits);
            assert_eq!(minimal_width(width), class);
        }
        assert_eq!(WidthClass::Arbitrary.bits(), None);
    }

    #[test]
    fn limbs() {
        assert_eq!(min_limbs(0), 0);
        assert_eq!(min_limbs(1), 1);
        assert_eq!(min_limbs(64), 1);
        assert_eq!(min_limbs(65), 2);
        assert_eq!(min_limbs(300), 5);
    }
}
