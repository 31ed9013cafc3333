/// Errors reported by vector and matrix operations.
///
/// Every error is raised before any mutation takes place, so a failed operation leaves its
/// operands untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Z2Error {
    /// A bit position outside `[0, bound)` of a word or vector
    #[error("index {index} is out of bounds for length {bound}")]
    Index { index: usize, bound: usize },

    /// An entry outside `[0, rows) x [0, cols)` of a matrix
    #[error("entry ({row}, {col}) is out of bounds for a {rows}x{cols} matrix")]
    EntryIndex {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Operand shapes are incompatible for the requested operation
    #[error("dimension mismatch in {op}: {lhs:?} vs {rhs:?}")]
    Dimension {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// The coefficient matrix of a linear system is not of full rank
    #[error("matrix is singular: rank {rank} < {size}")]
    Singular { rank: usize, size: usize },
}

pub type Result<T, E = Z2Error> = std::result::Result<T, E>;

impl Z2Error {
    #[inline]
    pub(crate) fn dimension(op: &'static str, lhs: (usize, usize), rhs: (usize, usize)) -> Self {
        Z2Error::Dimension { op, lhs, rhs }
    }

    /// Returns `true` for either flavour of out-of-bounds access
    pub fn is_index_error(&self) -> bool {
        matches!(self, Z2Error::Index { .. } | Z2Error::EntryIndex { .. })
    }
}
