use std::fmt;

/// The logical 2-D shape of a matrix: `rows x cols`, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    rows: usize,
    cols: usize,
}

/// A (row, col) position inside an [`Extent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Index2 {
    pub row: usize,
    pub col: usize,
}

impl Index2 {
    pub fn new(row: usize, col: usize) -> Self {
        Index2 { row, col }
    }
}

impl Extent {
    /// Create a new extent from a row and column count.
    pub fn new(rows: usize, cols: usize) -> Self {
        Extent { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements, or `None` if `rows * cols` overflows.
    pub fn checked_numel(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Returns true if the extent holds no elements (either dimension is 0).
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Flat offset of `idx` in a row-major buffer of this extent.
    pub fn offset(&self, idx: Index2) -> usize {
        idx.row * self.cols + idx.col
    }

    /// Inverse of [`Extent::offset`].
    ///
    /// # Panics
    /// Panics if `cols == 0`; an empty extent has no valid offsets.
    pub fn index_of(&self, offset: usize) -> Index2 {
        Index2::new(offset / self.cols, offset % self.cols)
    }

    /// All positions in row-major order.
    pub fn indices(&self) -> impl Iterator<Item = Index2> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Index2::new(row, col)))
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}x{}]", self.rows, self.cols)
    }
}

impl From<(usize, usize)> for Extent {
    fn from((rows, cols): (usize, usize)) -> Self {
        Extent::new(rows, cols)
    }
}
