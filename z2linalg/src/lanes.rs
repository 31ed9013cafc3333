//! Storage shared by both matrix layouts, and Gaussian elimination over it.
//!
//! A matrix is held as a sequence of equal-length [`Z2Vector`]s called lanes: the rows of a
//! [`RowMatrix`](crate::RowMatrix) or the columns of a [`ColMatrix`](crate::ColMatrix). Every
//! algorithm that only needs whole-lane operations (XOR one lane into another, swap two lanes)
//! lives here, so both layouts share a single implementation.

use crate::error::{Result, Z2Error};
use crate::vector::Z2Vector;
use crate::width::Limb;
use rand::Rng;

/// Lane operations replayed on a companion value during elimination.
///
/// Gaussian elimination calls these for every lane swap and lane addition it performs, which
/// lets a caller carry along an augmented block (e.g. the right-hand side of a linear system)
/// without building the augmented matrix explicitly.
pub trait LaneOps {
    /// Adds (XORs) lane `from` into lane `to`
    fn add_lane(&mut self, from: usize, to: usize);

    /// Swaps lanes `a` and `b`
    fn swap_lanes(&mut self, a: usize, b: usize);
}

impl LaneOps for () {
    #[inline]
    fn add_lane(&mut self, _: usize, _: usize) {}

    #[inline]
    fn swap_lanes(&mut self, _: usize, _: usize) {}
}

/// A column vector viewed as a sequence of one-bit lanes
impl LaneOps for Z2Vector {
    #[inline]
    fn add_lane(&mut self, from: usize, to: usize) {
        if self.bit(from) {
            let b = self.bit(to);
            self.set_bit(to, !b);
        }
    }

    #[inline]
    fn swap_lanes(&mut self, a: usize, b: usize) {
        let (x, y) = (self.bit(a), self.bit(b));
        self.set_bit(a, y);
        self.set_bit(b, x);
    }
}

/// An ordered sequence of lanes, each of length `lane_len`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Lanes {
    pub(crate) lanes: Vec<Z2Vector>,
    pub(crate) lane_len: usize,
}

impl Lanes {
    #[inline]
    pub(crate) fn zeros(count: usize, lane_len: usize) -> Self {
        Lanes {
            lanes: vec![Z2Vector::zeros(lane_len); count],
            lane_len,
        }
    }

    /// Lane `i` has only bit `i` set
    pub(crate) fn identity(size: usize) -> Self {
        let mut data = Lanes::zeros(size, size);
        for (i, lane) in data.lanes.iter_mut().enumerate() {
            lane.set_bit(i, true);
        }
        data
    }

    /// Builds lanes from raw words, masking each to `lane_len` bits
    pub(crate) fn from_words(words: &[u64], lane_len: usize) -> Self {
        Lanes {
            lanes: words
                .iter()
                .map(|&w| Z2Vector::from_int(w, lane_len))
                .collect(),
            lane_len,
        }
    }

    /// Builds lanes from little-endian limb slices, masking each to `lane_len` bits
    pub(crate) fn from_limbs<L: AsRef<[Limb]>>(limbs: &[L], lane_len: usize) -> Self {
        Lanes {
            lanes: limbs
                .iter()
                .map(|l| Z2Vector::from_limbs(l.as_ref(), lane_len))
                .collect(),
            lane_len,
        }
    }

    /// Takes ownership of `lanes`, which must all have length `lane_len`
    pub(crate) fn from_vectors(lanes: Vec<Z2Vector>, lane_len: usize) -> Result<Self> {
        if let Some(bad) = lanes.iter().find(|l| l.len() != lane_len) {
            return Err(Z2Error::dimension(
                "from_vectors",
                (1, lane_len),
                (1, bad.len()),
            ));
        }
        Ok(Lanes { lanes, lane_len })
    }

    #[inline]
    pub(crate) fn random(rng: &mut impl Rng, count: usize, lane_len: usize) -> Self {
        Lanes {
            lanes: (0..count).map(|_| Z2Vector::random(rng, lane_len)).collect(),
            lane_len,
        }
    }

    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.lanes.len()
    }

    /// Returns the lanes with bits relocated so that bit `j` of lane `i` becomes bit `i` of
    /// lane `j`.
    pub(crate) fn relocated(&self) -> Lanes {
        let mut out = Lanes::zeros(self.lane_len, self.count());
        for (i, lane) in self.lanes.iter().enumerate() {
            for j in 0..self.lane_len {
                if lane.bit(j) {
                    out.lanes[j].set_bit(i, true);
                }
            }
        }
        out
    }

    #[inline]
    pub(crate) fn fill(&mut self, value: bool) {
        self.lanes.iter_mut().for_each(|l| l.fill(value));
    }

    #[inline]
    pub(crate) fn scale(&mut self, s: bool) {
        self.lanes.iter_mut().for_each(|l| l.scale(s));
    }

    #[inline]
    pub(crate) fn complement(&mut self) {
        self.lanes.iter_mut().for_each(|l| l.complement());
    }

    #[inline]
    pub(crate) fn is_zero(&self) -> bool {
        self.lanes.iter().all(|l| l.is_zero())
    }

    /// Applies `f` lane-by-lane. Shapes must already have been checked to match.
    pub(crate) fn zip_with(&mut self, rhs: &Lanes, f: impl Fn(&mut Z2Vector, &Z2Vector)) {
        debug_assert_eq!(
            (self.count(), self.lane_len),
            (rhs.count(), rhs.lane_len)
        );
        for (a, b) in self.lanes.iter_mut().zip(rhs.lanes.iter()) {
            f(a, b);
        }
    }

    /// Perform gaussian elimination over the lanes, replaying every lane operation on `proxy`,
    /// and return the pivot positions.
    ///
    /// The pivot cursor starts at bit position 0 and only moves forward. At each step the first
    /// remaining lane with a 1 at the cursor is swapped into place and XORed into every later
    /// lane with a 1 there. Elimination stops once the lanes or the positions run out.
    ///
    /// If `full` is true, back-substitution then clears each pivot position in the lanes above
    /// it, producing reduced echelon form.
    pub(crate) fn gauss_helper(&mut self, full: bool, proxy: &mut impl LaneOps) -> Vec<usize> {
        let _span = tracing::trace_span!(
            "gauss",
            lanes = self.count(),
            lane_len = self.lane_len,
            full
        )
        .entered();

        let mut lane = 0;
        let mut pivot = 0;
        let mut pivots = vec![];
        while lane < self.count() {
            let mut next_lane = None;
            'outer: while pivot < self.lane_len {
                for i in lane..self.count() {
                    if self.lanes[i].bit(pivot) {
                        next_lane = Some(i);
                        break 'outer;
                    }
                }
                pivot += 1;
            }

            if let Some(lane1) = next_lane {
                if lane != lane1 {
                    self.swap_lanes(lane, lane1);
                    proxy.swap_lanes(lane, lane1);
                }

                // lanes strictly between `lane` and `lane1` were scanned and have a 0 here
                for i in (lane1 + 1)..self.count() {
                    if self.lanes[i].bit(pivot) {
                        self.add_lane(lane, i);
                        proxy.add_lane(lane, i);
                    }
                }

                lane += 1;
                pivots.push(pivot);
                pivot += 1;
            } else {
                break;
            }
        }

        if full {
            for lane in (0..pivots.len()).rev() {
                let pivot = pivots[lane];
                for i in 0..lane {
                    if self.lanes[i].bit(pivot) {
                        self.add_lane(lane, i);
                        proxy.add_lane(lane, i);
                    }
                }
            }
        }

        tracing::trace!(rank = pivots.len(), "elimination finished");
        pivots
    }

    /// Rank of the lanes, computed on a scratch copy
    #[inline]
    pub(crate) fn rank(&self) -> usize {
        self.clone().gauss_helper(false, &mut ()).len()
    }
}

impl LaneOps for Lanes {
    #[inline]
    fn add_lane(&mut self, from: usize, to: usize) {
        debug_assert_ne!(from, to);
        if from < to {
            let (head, tail) = self.lanes.split_at_mut(to);
            tail[0].xor_in(&head[from]);
        } else {
            let (head, tail) = self.lanes.split_at_mut(from);
            head[to].xor_in(&tail[0]);
        }
    }

    #[inline]
    fn swap_lanes(&mut self, a: usize, b: usize) {
        self.lanes.swap(a, b);
    }
}
