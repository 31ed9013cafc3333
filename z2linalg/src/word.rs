use crate::error::{Result, Z2Error};
use crate::width::{min_limbs, minimal_width, Limb, WidthClass, LIMBSIZE};
use std::fmt;

/// A fixed-width unsigned word, or an arbitrary-precision word stored as little-endian
/// [`Limb`]s.
///
/// Bit `i` of a word is the coefficient of `2^i`, i.e. positions are counted from the least
/// significant bit. When a word backs a vector of logical length `len`, every bit at position
/// `len` or above is zero. All vector and matrix operations in this crate maintain that
/// invariant.
///
/// # Examples
///
/// ```
/// use z2linalg::word::PackedWord;
///
/// let w = PackedWord::from(0b10110u8);
/// assert_eq!(w.set_bit(true, 0).unwrap(), PackedWord::from(0b10111u8));
/// assert_eq!(w.set_bit(false, 0).unwrap(), w);
/// assert!(w.get_bit(8).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PackedWord {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Wide(Box<[Limb]>),
}

/// Returns a [`u64`] with the lowest `len` bits set
#[inline]
pub(crate) fn low_mask(len: usize) -> u64 {
    if len >= LIMBSIZE {
        u64::MAX
    } else {
        (1u64 << len) - 1
    }
}

/// Applies a compound assignment operator limb-by-limb to two words of the same class
macro_rules! zip_assign {
    ($lhs:expr, $rhs:expr, $op:tt) => {
        match ($lhs, $rhs) {
            (PackedWord::U8(a), PackedWord::U8(b)) => *a $op *b,
            (PackedWord::U16(a), PackedWord::U16(b)) => *a $op *b,
            (PackedWord::U32(a), PackedWord::U32(b)) => *a $op *b,
            (PackedWord::U64(a), PackedWord::U64(b)) => *a $op *b,
            (PackedWord::Wide(a), PackedWord::Wide(b)) => {
                for (a, b) in a.iter_mut().zip(b.iter()) {
                    *a $op *b;
                }
            }
            _ => unreachable!("words backing equal lengths share a width class"),
        }
    };
}

impl PackedWord {
    /// Returns the all-zero word of the minimal class holding `bits` bits.
    #[inline]
    pub fn zeroed(bits: usize) -> Self {
        match minimal_width(bits) {
            WidthClass::W8 => PackedWord::U8(0),
            WidthClass::W16 => PackedWord::U16(0),
            WidthClass::W32 => PackedWord::U32(0),
            WidthClass::W64 => PackedWord::U64(0),
            WidthClass::Arbitrary => PackedWord::Wide(vec![0; min_limbs(bits)].into()),
        }
    }

    /// Builds a word of the minimal class for `bits` bits from `value`, clearing every bit at
    /// position `bits` or above.
    pub fn from_u64(value: u64, bits: usize) -> Self {
        Self::from_limbs(&[value], bits)
    }

    /// Builds a word of the minimal class for `bits` bits from little-endian `limbs`, clearing
    /// every bit at position `bits` or above. Missing limbs are taken to be zero.
    pub fn from_limbs(limbs: &[Limb], bits: usize) -> Self {
        let low = limbs.first().copied().unwrap_or(0);
        let mut word = match PackedWord::zeroed(bits) {
            PackedWord::U8(_) => PackedWord::U8(low as u8),
            PackedWord::U16(_) => PackedWord::U16(low as u16),
            PackedWord::U32(_) => PackedWord::U32(low as u32),
            PackedWord::U64(_) => PackedWord::U64(low),
            PackedWord::Wide(mut data) => {
                for (d, l) in data.iter_mut().zip(limbs.iter()) {
                    *d = *l;
                }
                PackedWord::Wide(data)
            }
        };
        word.mask_to(bits);
        word
    }

    /// Returns the little-endian limbs of this word
    pub fn to_limbs(&self) -> Vec<Limb> {
        match self {
            PackedWord::U8(w) => vec![*w as Limb],
            PackedWord::U16(w) => vec![*w as Limb],
            PackedWord::U32(w) => vec![*w as Limb],
            PackedWord::U64(w) => vec![*w],
            PackedWord::Wide(l) => l.to_vec(),
        }
    }

    /// The class this word belongs to
    #[inline]
    pub fn class(&self) -> WidthClass {
        match self {
            PackedWord::U8(_) => WidthClass::W8,
            PackedWord::U16(_) => WidthClass::W16,
            PackedWord::U32(_) => WidthClass::W32,
            PackedWord::U64(_) => WidthClass::W64,
            PackedWord::Wide(_) => WidthClass::Arbitrary,
        }
    }

    /// Number of bits physically stored in this word
    #[inline]
    pub fn width(&self) -> usize {
        match self {
            PackedWord::Wide(l) => l.len() * LIMBSIZE,
            w => w.class().bits().unwrap_or(0),
        }
    }

    /// Returns the bit at position `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Index`] if `pos` is not below [`PackedWord::width`].
    #[inline]
    pub fn get_bit(&self, pos: usize) -> Result<bool> {
        self.check(pos)?;
        Ok(self.bit(pos))
    }

    /// Returns a copy of this word with bit `pos` set to `value`, all other bits unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Z2Error::Index`] if `pos` is not below [`PackedWord::width`].
    #[inline]
    pub fn set_bit(&self, value: bool, pos: usize) -> Result<Self> {
        let mut word = self.clone();
        word.set_bit_mut(value, pos)?;
        Ok(word)
    }

    /// In-place version of [`PackedWord::set_bit`].
    #[inline]
    pub fn set_bit_mut(&mut self, value: bool, pos: usize) -> Result<()> {
        self.check(pos)?;
        self.assign_bit(pos, value);
        Ok(())
    }

    #[inline]
    fn check(&self, pos: usize) -> Result<()> {
        let bound = self.width();
        if pos >= bound {
            Err(Z2Error::Index { index: pos, bound })
        } else {
            Ok(())
        }
    }

    /// Unchecked read, panics if `pos` is outside the stored limbs
    #[inline]
    pub(crate) fn bit(&self, pos: usize) -> bool {
        match self {
            PackedWord::U8(w) => (w >> pos) & 1 == 1,
            PackedWord::U16(w) => (w >> pos) & 1 == 1,
            PackedWord::U32(w) => (w >> pos) & 1 == 1,
            PackedWord::U64(w) => (w >> pos) & 1 == 1,
            PackedWord::Wide(l) => (l[pos / LIMBSIZE] >> (pos % LIMBSIZE)) & 1 == 1,
        }
    }

    /// Unchecked write, panics if `pos` is outside the stored limbs
    #[inline]
    pub(crate) fn assign_bit(&mut self, pos: usize, value: bool) {
        macro_rules! assign {
            ($w:expr, $t:ty, $pos:expr, $value:expr) => {{
                let m: $t = 1 << $pos;
                if $value {
                    *$w |= m;
                } else {
                    *$w &= !m;
                }
            }};
        }
        match self {
            PackedWord::U8(w) => assign!(w, u8, pos, value),
            PackedWord::U16(w) => assign!(w, u16, pos, value),
            PackedWord::U32(w) => assign!(w, u32, pos, value),
            PackedWord::U64(w) => assign!(w, u64, pos, value),
            PackedWord::Wide(l) => assign!(&mut l[pos / LIMBSIZE], u64, pos % LIMBSIZE, value),
        }
    }

    /// Clears every bit at position `len` or above.
    ///
    /// This is the step that restores the padding invariant after a whole-word complement.
    #[inline]
    pub fn mask_to(&mut self, len: usize) {
        match self {
            PackedWord::U8(w) => *w &= low_mask(len) as u8,
            PackedWord::U16(w) => *w &= low_mask(len) as u16,
            PackedWord::U32(w) => *w &= low_mask(len) as u32,
            PackedWord::U64(w) => *w &= low_mask(len),
            PackedWord::Wide(l) => {
                for (i, limb) in l.iter_mut().enumerate() {
                    *limb &= low_mask(len.saturating_sub(i * LIMBSIZE));
                }
            }
        }
    }

    /// Sets the bits below `len` to one and all others to zero
    #[inline]
    pub(crate) fn fill_ones(&mut self, len: usize) {
        match self {
            PackedWord::U8(w) => *w = low_mask(len) as u8,
            PackedWord::U16(w) => *w = low_mask(len) as u16,
            PackedWord::U32(w) => *w = low_mask(len) as u32,
            PackedWord::U64(w) => *w = low_mask(len),
            PackedWord::Wide(l) => {
                for (i, limb) in l.iter_mut().enumerate() {
                    *limb = low_mask(len.saturating_sub(i * LIMBSIZE));
                }
            }
        }
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        match self {
            PackedWord::U8(w) => *w = 0,
            PackedWord::U16(w) => *w = 0,
            PackedWord::U32(w) => *w = 0,
            PackedWord::U64(w) => *w = 0,
            PackedWord::Wide(l) => l.iter_mut().for_each(|limb| *limb = 0),
        }
    }

    /// Whole-word complement, including padding bits. Callers must follow up with
    /// [`PackedWord::mask_to`].
    #[inline]
    pub(crate) fn not_assign(&mut self) {
        match self {
            PackedWord::U8(w) => *w = !*w,
            PackedWord::U16(w) => *w = !*w,
            PackedWord::U32(w) => *w = !*w,
            PackedWord::U64(w) => *w = !*w,
            PackedWord::Wide(l) => l.iter_mut().for_each(|limb| *limb = !*limb),
        }
    }

    #[inline]
    pub(crate) fn xor_assign(&mut self, rhs: &PackedWord) {
        zip_assign!(self, rhs, ^=);
    }

    #[inline]
    pub(crate) fn and_assign(&mut self, rhs: &PackedWord) {
        zip_assign!(self, rhs, &=);
    }

    #[inline]
    pub(crate) fn or_assign(&mut self, rhs: &PackedWord) {
        zip_assign!(self, rhs, |=);
    }

    /// Parity of the number of positions set in both words
    #[inline]
    pub(crate) fn and_parity(&self, rhs: &PackedWord) -> bool {
        let parity = match (self, rhs) {
            (PackedWord::U8(a), PackedWord::U8(b)) => (a & b).count_ones(),
            (PackedWord::U16(a), PackedWord::U16(b)) => (a & b).count_ones(),
            (PackedWord::U32(a), PackedWord::U32(b)) => (a & b).count_ones(),
            (PackedWord::U64(a), PackedWord::U64(b)) => (a & b).count_ones(),
            (PackedWord::Wide(a), PackedWord::Wide(b)) => a
                .iter()
                .zip(b.iter())
                .fold(0, |c, (a, b)| c ^ ((a & b).count_ones() & 1)),
            _ => unreachable!("words backing equal lengths share a width class"),
        };
        parity & 1 == 1
    }

    #[inline]
    pub fn count_ones(&self) -> u32 {
        match self {
            PackedWord::U8(w) => w.count_ones(),
            PackedWord::U16(w) => w.count_ones(),
            PackedWord::U32(w) => w.count_ones(),
            PackedWord::U64(w) => w.count_ones(),
            PackedWord::Wide(l) => l.iter().map(|limb| limb.count_ones()).sum(),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        match self {
            PackedWord::U8(w) => *w == 0,
            PackedWord::U16(w) => *w == 0,
            PackedWord::U32(w) => *w == 0,
            PackedWord::U64(w) => *w == 0,
            PackedWord::Wide(l) => l.iter().all(|&limb| limb == 0),
        }
    }
}

macro_rules! word_from {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<$t> for PackedWord {
                #[inline]
                fn from(value: $t) -> Self {
                    PackedWord::$variant(value)
                }
            }
        )*
    };
}

word_from!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);

/// Uses every bit of the limbs, so the class is chosen for `64 * value.len()` bits
impl From<Vec<Limb>> for PackedWord {
    fn from(value: Vec<Limb>) -> Self {
        PackedWord::from_limbs(&value, value.len() * LIMBSIZE)
    }
}

/// Prints the word most significant bit first, as wide as its class
impl fmt::Binary for PackedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackedWord::U8(w) => write!(f, "{:08b}", w),
            PackedWord::U16(w) => write!(f, "{:016b}", w),
            PackedWord::U32(w) => write!(f, "{:032b}", w),
            PackedWord::U64(w) => write!(f, "{:064b}", w),
            PackedWord::Wide(l) => {
                for limb in l.iter().rev() {
                    write!(f, "{:064b}", limb)?;
                }
                Ok(())
            }
        }
    }
}
