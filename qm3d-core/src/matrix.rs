/// Variable-dimension real matrices, rotation builders and LU solving
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{MathError, Result};
use crate::math_util;
use crate::vector::{NumericSequence, Vector};

/// Stand-in pivot used by [`Matrix::lu_decompose`] when elimination
/// produces an exact zero on the diagonal.
pub const TINY: f64 = 1.0e-20;

/// Construction options for [`Matrix::with_options`].
///
/// Both fields may only grow the supplied data. Giving just one of them
/// fixes the other at the supplied size, or 1 when nothing was supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatrixOptions {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
}

/// Row permutation and its parity produced by [`Matrix::lu_decompose`]
#[derive(Debug, Clone, PartialEq)]
pub struct LuPivots {
    /// `permutation[i]` is the row swapped with row `i` at step `i`
    pub permutation: Vec<usize>,
    /// +1.0 for an even number of row swaps, -1.0 for odd
    pub parity: f64,
    /// First elimination step whose zero pivot was replaced with [`TINY`]
    pub substituted_pivot: Option<usize>,
}

/// A dense matrix stored row-major
#[derive(Debug, Clone, Default)]
pub struct Matrix {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A `rows` x `cols` matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            nrows: rows,
            ncols: cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix from rows, right-padding short rows with zeros
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Self {
        let ncols = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let mut matrix = Self::zeros(rows.len(), ncols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            matrix.data[i * ncols..i * ncols + row.len()].copy_from_slice(row);
        }
        matrix
    }

    /// Build a matrix from rows and grow it to the requested shape
    pub fn with_options<R: AsRef<[f64]>>(rows: &[R], options: MatrixOptions) -> Result<Self> {
        let supplied = Self::from_rows(rows);

        if let Some(requested) = options.rows {
            if requested < supplied.nrows {
                return Err(MathError::Configuration(format!(
                    "cannot specify fewer rows ({}) than supplied ({})",
                    requested, supplied.nrows
                )));
            }
        }
        if let Some(requested) = options.cols {
            if requested < supplied.ncols {
                return Err(MathError::Configuration(format!(
                    "cannot specify fewer columns ({}) than supplied ({})",
                    requested, supplied.ncols
                )));
            }
        }

        let target_rows = match (options.rows, options.cols) {
            (Some(rows), _) => rows,
            (None, Some(_)) => supplied.nrows.max(1),
            (None, None) => supplied.nrows,
        };
        let target_cols = match (options.cols, options.rows) {
            (Some(cols), _) => cols,
            (None, Some(_)) => supplied.ncols.max(1),
            (None, None) => supplied.ncols,
        };

        if (target_rows, target_cols) == supplied.size() {
            return Ok(supplied);
        }
        let mut matrix = Self::zeros(target_rows, target_cols);
        for i in 0..supplied.nrows {
            matrix.data[i * target_cols..i * target_cols + supplied.ncols]
                .copy_from_slice(&supplied[i]);
        }
        Ok(matrix)
    }

    /// The `n` x `n` identity matrix
    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::zeros(n, n);
        for i in 0..n {
            matrix.data[i * n + i] = 1.0;
        }
        matrix
    }

    /// `(rows, cols)`
    pub fn size(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Iterate over the rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.nrows).map(move |i| &self[i])
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_row(row)?;
        self.check_col(col)?;
        Ok(self.data[row * self.ncols + col])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_row(row)?;
        self.check_col(col)?;
        self.data[row * self.ncols + col] = value;
        Ok(())
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.nrows {
            return Err(MathError::out_of_bounds(row, self.nrows));
        }
        Ok(())
    }

    fn check_col(&self, col: usize) -> Result<()> {
        if col >= self.ncols {
            return Err(MathError::out_of_bounds(col, self.ncols));
        }
        Ok(())
    }

    /// A copy of row `index`
    pub fn row(&self, index: usize) -> Result<Vector> {
        self.check_row(index)?;
        Ok(Vector::from_slice(&self[index]))
    }

    /// A copy of column `index`
    pub fn column(&self, index: usize) -> Result<Vector> {
        self.check_col(index)?;
        Ok(self.rows().map(|row| row[index]).collect())
    }

    /// Replace row `index`; `values` must have exactly `ncols` entries
    pub fn set_row<S: NumericSequence + ?Sized>(&mut self, index: usize, values: &S) -> Result<()> {
        self.check_row(index)?;
        if values.seq_len() != self.ncols {
            return Err(MathError::size_mismatch(self.ncols, values.seq_len()));
        }
        for (j, slot) in self[index].iter_mut().enumerate() {
            *slot = values.seq_get(j);
        }
        Ok(())
    }

    /// Element-wise sum; both matrices must have the same shape
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        if self.size() != other.size() {
            return Err(MathError::SizeMismatch(format!(
                "cannot add a {}x{} matrix to a {}x{} matrix",
                other.nrows, other.ncols, self.nrows, self.ncols
            )));
        }
        Ok(Self {
            nrows: self.nrows,
            ncols: self.ncols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a + b)
                .collect(),
        })
    }

    /// Multiply every element by `scalar` in place
    pub fn scale(&mut self, scalar: f64) {
        for x in &mut self.data {
            *x *= scalar;
        }
    }

    /// A scaled copy; `self` is left unchanged
    pub fn scaled_copy(&self, scalar: f64) -> Matrix {
        let mut copy = self.clone();
        copy.scale(scalar);
        copy
    }

    /// `self * v`; the length of `v` must equal the column count
    pub fn multiply_vector<S: NumericSequence + ?Sized>(&self, v: &S) -> Result<Vector> {
        if v.seq_len() != self.ncols {
            return Err(MathError::DimensionMismatch(format!(
                "incompatible object sizes: {}x{} matrix and {} vector",
                self.nrows,
                self.ncols,
                v.seq_len()
            )));
        }
        Ok(self
            .rows()
            .map(|row| row.iter().enumerate().map(|(j, a)| a * v.seq_get(j)).sum::<f64>())
            .collect())
    }

    /// `self * other`; requires `self.ncols == other.nrows`
    pub fn multiply_matrix(&self, other: &Matrix) -> Result<Matrix> {
        if self.ncols != other.nrows {
            return Err(MathError::DimensionMismatch(format!(
                "incompatible object sizes: {}x{} matrix and {}x{} matrix",
                self.nrows, self.ncols, other.nrows, other.ncols
            )));
        }
        let mut product = Self::zeros(self.nrows, other.ncols);
        for i in 0..self.nrows {
            for j in 0..other.ncols {
                let mut sum = 0.0;
                for k in 0..self.ncols {
                    sum += self[i][k] * other[k][j];
                }
                product[i][j] = sum;
            }
        }
        Ok(product)
    }

    /// The outer (tensor) product `v1 ⊗ v2`
    pub fn outer_product<A, B>(v1: &A, v2: &B) -> Matrix
    where
        A: NumericSequence + ?Sized,
        B: NumericSequence + ?Sized,
    {
        let mut product = Self::zeros(v1.seq_len(), v2.seq_len());
        for i in 0..product.nrows {
            for j in 0..product.ncols {
                product[i][j] = v1.seq_get(i) * v2.seq_get(j);
            }
        }
        product
    }

    pub fn transpose(&self) -> Matrix {
        let mut transposed = Self::zeros(self.ncols, self.nrows);
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                transposed[j][i] = self[i][j];
            }
        }
        transposed
    }

    /// Right-handed rotation about the x axis
    pub fn rotation_about_x(angle_degrees: f64) -> Matrix {
        let (s, c) = math_util::sin_cos_of_degrees(angle_degrees);
        Self::from_rows(&[[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]])
    }

    /// Right-handed rotation about the y axis
    pub fn rotation_about_y(angle_degrees: f64) -> Matrix {
        let (s, c) = math_util::sin_cos_of_degrees(angle_degrees);
        Self::from_rows(&[[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]])
    }

    /// Right-handed rotation about the z axis
    pub fn rotation_about_z(angle_degrees: f64) -> Matrix {
        let (s, c) = math_util::sin_cos_of_degrees(angle_degrees);
        Self::from_rows(&[[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Tilt by `altitude` above the xy plane, then turn by `azimuth`
    /// about z. Altitude must lie in [-90, 90] degrees.
    pub fn azimuth_altitude(azimuth: f64, altitude: f64) -> Result<Matrix> {
        if !(-90.0..=90.0).contains(&altitude) {
            return Err(MathError::InvalidArgument(format!(
                "altitude {} is outside [-90, 90] degrees",
                altitude
            )));
        }
        Self::rotation_about_z(azimuth).multiply_matrix(&Self::rotation_about_y(-altitude))
    }

    /// LU-decompose a square matrix in place with partial pivoting.
    ///
    /// On return `self` holds U on and above the diagonal and the
    /// multipliers of L (unit diagonal implied) below it, for the rows
    /// permuted as recorded in the returned pivots. A row that is entirely
    /// zero fails with [`MathError::Singular`]; a zero pivot met during
    /// elimination is replaced with [`TINY`] so near-singular systems still
    /// decompose.
    pub fn lu_decompose(&mut self) -> Result<LuPivots> {
        if !self.is_square() {
            return Err(MathError::DimensionMismatch(format!(
                "LU decomposition needs a square matrix, got {}x{}",
                self.nrows, self.ncols
            )));
        }
        let n = self.nrows;

        // Implicit scaling: 1 / largest magnitude of each row.
        let mut row_scale = Vec::with_capacity(n);
        for (i, row) in self.rows().enumerate() {
            let big = row.iter().fold(0.0f64, |big, x| big.max(x.abs()));
            if big == 0.0 {
                return Err(MathError::Singular { row: i });
            }
            row_scale.push(1.0 / big);
        }

        let mut permutation = vec![0; n];
        let mut parity = 1.0;
        let mut substituted_pivot = None;

        for j in 0..n {
            for i in 0..j {
                let mut sum = self[i][j];
                for k in 0..i {
                    sum -= self[i][k] * self[k][j];
                }
                self[i][j] = sum;
            }

            let mut big = 0.0;
            let mut pivot_row = j;
            for i in j..n {
                let mut sum = self[i][j];
                for k in 0..j {
                    sum -= self[i][k] * self[k][j];
                }
                self[i][j] = sum;
                let figure_of_merit = row_scale[i] * sum.abs();
                if figure_of_merit >= big {
                    big = figure_of_merit;
                    pivot_row = i;
                }
            }

            if pivot_row != j {
                self.swap_rows(pivot_row, j);
                parity = -parity;
                row_scale[pivot_row] = row_scale[j];
            }
            permutation[j] = pivot_row;

            if self[j][j] == 0.0 {
                log::debug!("LU pivot {} is zero, substituting {:e}", j, TINY);
                self[j][j] = TINY;
                substituted_pivot = substituted_pivot.or(Some(j));
            }
            if j + 1 < n {
                let inverse_pivot = 1.0 / self[j][j];
                for i in j + 1..n {
                    self[i][j] *= inverse_pivot;
                }
            }
        }

        Ok(LuPivots {
            permutation,
            parity,
            substituted_pivot,
        })
    }

    /// Solve `A x = b` where `self` holds the LU factors of `A` and
    /// `permutation` the pivots from [`Matrix::lu_decompose`]. `b` is
    /// overwritten with the solution and returned.
    pub fn lu_back_substitute(&self, permutation: &[usize], mut b: Vector) -> Result<Vector> {
        if !self.is_square() {
            return Err(MathError::DimensionMismatch(format!(
                "back-substitution needs a square matrix, got {}x{}",
                self.nrows, self.ncols
            )));
        }
        let n = self.nrows;
        if permutation.len() != n {
            return Err(MathError::size_mismatch(n, permutation.len()));
        }
        if b.len() != n {
            return Err(MathError::size_mismatch(n, b.len()));
        }
        if let Some(&bad) = permutation.iter().find(|&&p| p >= n) {
            return Err(MathError::out_of_bounds(bad, n));
        }

        // Forward substitution, unscrambling the permutation as we go.
        // `first_nonzero` skips the leading zeros of b.
        let mut first_nonzero: Option<usize> = None;
        for i in 0..n {
            let pivot_row = permutation[i];
            let mut sum = b[pivot_row];
            b[pivot_row] = b[i];
            if let Some(start) = first_nonzero {
                for j in start..i {
                    sum -= self[i][j] * b[j];
                }
            } else if sum != 0.0 {
                first_nonzero = Some(i);
            }
            b[i] = sum;
        }

        for i in (0..n).rev() {
            let mut sum = b[i];
            for j in i + 1..n {
                sum -= self[i][j] * b[j];
            }
            b[i] = sum / self[i][i];
        }
        Ok(b)
    }

    /// Solve `self * x = b`, leaving `self` untouched
    pub fn solve(&self, b: &Vector) -> Result<Vector> {
        let mut factors = self.clone();
        let pivots = factors.lu_decompose()?;
        factors.lu_back_substitute(&pivots.permutation, b.clone())
    }

    /// Determinant of a square matrix; a singular matrix gives 0
    pub fn determinant(&self) -> Result<f64> {
        let mut factors = self.clone();
        match factors.lu_decompose() {
            Ok(LuPivots {
                substituted_pivot: Some(_),
                ..
            }) => Ok(0.0),
            Ok(pivots) => Ok((0..factors.nrows).fold(pivots.parity, |det, i| det * factors[i][i])),
            Err(MathError::Singular { .. }) => Ok(0.0),
            Err(e) => Err(e),
        }
    }

    /// The inverse of a square matrix, column by column from one LU.
    ///
    /// Fails with [`MathError::Singular`] when any pivot vanished, rather
    /// than returning the huge entries a [`TINY`] pivot would produce.
    pub fn inverse(&self) -> Result<Matrix> {
        let mut factors = self.clone();
        let pivots = factors.lu_decompose()?;
        if let Some(row) = pivots.substituted_pivot {
            return Err(MathError::Singular { row });
        }
        let n = self.nrows;
        let mut inverse = Self::zeros(n, n);
        for j in 0..n {
            let mut unit = Vector::new(vec![0.0; n]);
            unit[j] = 1.0;
            let column = factors.lu_back_substitute(&pivots.permutation, unit)?;
            for i in 0..n {
                inverse[i][j] = column[i];
            }
        }
        Ok(inverse)
    }

    /// Round every element to `places` decimal places in place
    pub fn round(&mut self, places: i32) -> &mut Self {
        for x in &mut self.data {
            *x = math_util::round_to_places(*x, places);
        }
        self
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for j in 0..self.ncols {
            self.data.swap(a * self.ncols + j, b * self.ncols + j);
        }
    }
}

impl Index<usize> for Matrix {
    type Output = [f64];

    fn index(&self, row: usize) -> &[f64] {
        assert!(row < self.nrows, "row {} out of bounds ({} rows)", row, self.nrows);
        &self.data[row * self.ncols..(row + 1) * self.ncols]
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, row: usize) -> &mut [f64] {
        assert!(row < self.nrows, "row {} out of bounds ({} rows)", row, self.nrows);
        &mut self.data[row * self.ncols..(row + 1) * self.ncols]
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Matrix) -> bool {
        self.size() == other.size() && self.data == other.data
    }
}

impl<const R: usize, const C: usize> PartialEq<[[f64; C]; R]> for Matrix {
    fn eq(&self, other: &[[f64; C]; R]) -> bool {
        self.size() == (R, C) && self.rows().zip(other.iter()).all(|(a, b)| a == b.as_slice())
    }
}

impl PartialEq<Vec<Vec<f64>>> for Matrix {
    fn eq(&self, other: &Vec<Vec<f64>>) -> bool {
        self.nrows == other.len() && self.rows().zip(other.iter()).all(|(a, b)| a == b.as_slice())
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                write!(f, "\n  ")?;
            }
            write!(f, "[")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, " {:.6}", x)?;
            }
            write!(f, " ]")?;
        }
        write!(f, " ]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq as assert_text_eq;

    fn assert_close(actual: &Matrix, expected: &Matrix, tolerance: f64) {
        assert_eq!(actual.size(), expected.size());
        for (a, b) in actual.rows().zip(expected.rows()) {
            for (x, y) in a.iter().zip(b) {
                assert!((x - y).abs() < tolerance, "{}\n!=\n{}", actual, expected);
            }
        }
    }

    fn sample() -> Matrix {
        Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]])
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Matrix::default().size(), (0, 0));
        assert_eq!(
            Matrix::with_options::<[f64; 0]>(&[], MatrixOptions { rows: Some(3), cols: None })
                .unwrap()
                .size(),
            (3, 1)
        );
        assert_eq!(
            Matrix::with_options::<[f64; 0]>(&[], MatrixOptions { rows: None, cols: Some(2) })
                .unwrap()
                .size(),
            (1, 2)
        );
        assert_eq!(Matrix::from_rows(&[[1.0, 0.0], [0.0, 1.0]]).size(), (2, 2));
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let m = Matrix::from_rows(&[vec![1.0], vec![2.0, 6.0], vec![3.0]]);
        assert_eq!(m, [[1.0, 0.0], [2.0, 6.0], [3.0, 0.0]]);
    }

    #[test]
    fn test_options_grow_only() {
        let rows = [vec![1.0], vec![2.0, 6.0], vec![3.0]];
        let m = Matrix::with_options(&rows, MatrixOptions { rows: Some(4), cols: Some(3) }).unwrap();
        assert_eq!(
            m,
            [[1.0, 0.0, 0.0], [2.0, 6.0, 0.0], [3.0, 0.0, 0.0], [0.0, 0.0, 0.0]]
        );

        let too_few_rows = Matrix::with_options(&rows, MatrixOptions { rows: Some(2), cols: None });
        assert!(matches!(too_few_rows, Err(MathError::Configuration(_))));

        let too_few_cols = Matrix::with_options(&rows, MatrixOptions { rows: None, cols: Some(1) });
        assert!(matches!(too_few_cols, Err(MathError::Configuration(_))));
    }

    #[test]
    fn test_get_set() {
        let mut m = sample();
        assert_eq!(m[1][1], 5.0);
        m[1][1] = -7.0;
        assert_eq!(m[1][1], -7.0);
        assert_eq!(m[1][2], 6.0);

        m.set(2, 0, 11.0).unwrap();
        assert_eq!(m.get(2, 0).unwrap(), 11.0);
        assert_eq!(m.get(3, 0), Err(MathError::IndexOutOfBounds { index: 3, len: 3 }));
        assert!(m.set(0, 3, 1.0).is_err());
    }

    #[test]
    fn test_equality() {
        let m = sample();
        assert_eq!(m, m.clone());
        assert_eq!(m, [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_ne!(m, [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, -9.0]]);
        assert_ne!(m, Matrix::from_rows(&[[1.0, 2.0], [4.0, 5.0], [7.0, 8.0]]));
        assert_eq!(m, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]]);
    }

    #[test]
    fn test_scaling() {
        let mut m = sample();
        let tripled = m.scaled_copy(3.0);
        assert_eq!(m, [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(tripled, [[3.0, 6.0, 9.0], [12.0, 15.0, 18.0], [21.0, 24.0, 27.0]]);
        m.scale(3.0);
        assert_eq!(m, tripled);
    }

    #[test]
    fn test_row_and_column() {
        let m = sample();
        assert_eq!(m.row(1).unwrap(), [4.0, 5.0, 6.0]);
        assert_eq!(m.column(1).unwrap(), [2.0, 5.0, 8.0]);
        assert_eq!(m.column(2).unwrap(), [3.0, 6.0, 9.0]);
        assert!(matches!(m.row(900), Err(MathError::IndexOutOfBounds { .. })));
        assert!(matches!(m.column(3), Err(MathError::IndexOutOfBounds { .. })));

        // Copies, not views
        let mut row = m.row(0).unwrap();
        row[0] = 100.0;
        assert_eq!(m[0][0], 1.0);
    }

    #[test]
    fn test_set_row() {
        let mut m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        m.set_row(1, &[0.0, 0.0]).unwrap();
        assert_eq!(m, [[1.0, 2.0], [0.0, 0.0], [5.0, 6.0]]);
        assert!(matches!(m.set_row(1, &[1.0]), Err(MathError::SizeMismatch(_))));
        assert!(matches!(m.set_row(3, &[1.0, 1.0]), Err(MathError::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_identity() {
        assert_eq!(Matrix::identity(1), [[1.0]]);
        let mut m = Matrix::identity(3);
        assert_eq!(m, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        m.scale(-2.0);
        assert_eq!(m, [[-2.0, 0.0, 0.0], [0.0, -2.0, 0.0], [0.0, 0.0, -2.0]]);
    }

    #[test]
    fn test_add() {
        let m1 = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let m2 = Matrix::from_rows(&[[7.0, 8.0, 9.0], [10.0, 11.0, 12.0]]);
        assert_eq!(m1.add(&m2).unwrap(), [[8.0, 10.0, 12.0], [14.0, 16.0, 18.0]]);
        assert_eq!(m1, [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);

        let square = Matrix::from_rows(&[[1.0, 1.0], [1.0, 1.0]]);
        let tall = Matrix::from_rows(&[[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]]);
        assert!(matches!(square.add(&tall), Err(MathError::SizeMismatch(_))));
    }

    #[test]
    fn test_multiply_vector() {
        let v = Matrix::identity(3).multiply_vector(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(v, [1.0, 2.0, 3.0]);

        // 90 degrees counterclockwise
        let m = Matrix::from_rows(&[[0.0, -1.0], [1.0, 0.0]]);
        let mut v = Vector::from([1.0, 1.0]);
        for expected in [[-1.0, 1.0], [-1.0, -1.0], [1.0, -1.0], [1.0, 1.0]] {
            v = m.multiply_vector(&v).unwrap();
            assert_eq!(v, expected);
        }

        let wide = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(wide.multiply_vector(&[1.0, 1.0, 1.0]).unwrap().len(), 2);

        let m = Matrix::from_rows(&[[1.0, 1.0], [1.0, 1.0]]);
        assert!(matches!(
            m.multiply_vector(&[1.0, 2.0, 3.0]),
            Err(MathError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_multiply_matrix() {
        assert_eq!(Matrix::identity(3).multiply_matrix(&sample()).unwrap(), sample());

        let m1 = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let m2 = Matrix::from_rows(&[
            [-1.0, 2.0, -3.0, 4.0],
            [-5.0, 6.0, -7.0, 8.0],
            [-9.0, 10.0, -11.0, 12.0],
        ]);
        let m3 = m1.multiply_matrix(&m2).unwrap();
        assert_eq!(m3.size(), (2, 4));
        assert_eq!(m3[0][0], Vector::from([1.0, 2.0, 3.0]).dot(&[-1.0, -5.0, -9.0]).unwrap());
        assert_eq!(m3, [[-38.0, 44.0, -50.0, 56.0], [-83.0, 98.0, -113.0, 128.0]]);

        assert!(matches!(m2.multiply_matrix(&m1), Err(MathError::DimensionMismatch(_))));
    }

    #[test]
    fn test_transpose_and_outer_product() {
        let m = Matrix::from_rows(&[[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]]);
        assert_eq!(m.transpose(), [[1.0, 5.0], [2.0, 6.0], [3.0, 7.0], [4.0, 8.0]]);

        let outer = Matrix::outer_product(&Vector::from([1.0, 2.0, 3.0]), &[4.0, 5.0]);
        assert_eq!(outer, [[4.0, 5.0], [8.0, 10.0], [12.0, 15.0]]);
    }

    #[test]
    fn test_rotations() {
        let x = [1.0, 0.0, 0.0];
        let y = Matrix::rotation_about_z(90.0).multiply_vector(&x).unwrap();
        assert!((y[0]).abs() < 1e-12 && (y[1] - 1.0).abs() < 1e-12);

        let z = Matrix::rotation_about_y(-90.0).multiply_vector(&x).unwrap();
        assert!((z[2] - 1.0).abs() < 1e-12);

        let up = [0.0, 1.0, 0.0];
        let z = Matrix::rotation_about_x(90.0).multiply_vector(&up).unwrap();
        assert!((z[2] - 1.0).abs() < 1e-12);

        assert_close(
            &Matrix::rotation_about_z(30.0).multiply_matrix(&Matrix::rotation_about_z(-30.0)).unwrap(),
            &Matrix::identity(3),
            1e-12,
        );
    }

    #[test]
    fn test_azimuth_altitude() {
        let m = Matrix::azimuth_altitude(90.0, 0.0).unwrap();
        assert_close(&m, &Matrix::rotation_about_z(90.0), 1e-12);

        let zenith = Matrix::azimuth_altitude(45.0, 90.0)
            .unwrap()
            .multiply_vector(&[1.0, 0.0, 0.0])
            .unwrap();
        assert!((zenith[2] - 1.0).abs() < 1e-12);

        assert!(matches!(
            Matrix::azimuth_altitude(0.0, 90.5),
            Err(MathError::InvalidArgument(_))
        ));
        assert!(Matrix::azimuth_altitude(0.0, -90.0).is_ok());
    }

    #[test]
    fn test_lu_decompose_and_solve() {
        let a = Matrix::from_rows(&[[2.0, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]]);
        let mut factors = a.clone();
        let pivots = factors.lu_decompose().unwrap();
        assert_eq!(pivots.permutation.len(), 3);
        assert!(pivots.parity == 1.0 || pivots.parity == -1.0);

        let x = factors
            .lu_back_substitute(&pivots.permutation, Vector::from([8.0, -11.0, -3.0]))
            .unwrap();
        for (xi, expected) in x.iter().zip([2.0, 3.0, -1.0]) {
            assert!((xi - expected).abs() < 1e-12);
        }

        let x = a.solve(&Vector::from([8.0, -11.0, -3.0])).unwrap();
        let b = a.multiply_vector(&x).unwrap();
        for (bi, expected) in b.iter().zip([8.0, -11.0, -3.0]) {
            assert!((bi - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_lu_rejects_zero_row() {
        let mut m = Matrix::from_rows(&[[1.0, 2.0], [0.0, 0.0]]);
        assert_eq!(m.lu_decompose(), Err(MathError::Singular { row: 1 }));

        let mut wide = Matrix::from_rows(&[[1.0, 2.0, 3.0]]);
        assert!(matches!(wide.lu_decompose(), Err(MathError::DimensionMismatch(_))));
    }

    #[test]
    fn test_lu_substitutes_tiny_pivot() {
        // Rank deficient but with no zero row: decomposes instead of failing.
        let mut m = Matrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]);
        let pivots = m.lu_decompose().unwrap();
        assert_eq!(m[1][1], TINY);
        assert_eq!(pivots.substituted_pivot, Some(1));

        let mut regular = Matrix::from_rows(&[[4.0, 7.0], [2.0, 6.0]]);
        assert_eq!(regular.lu_decompose().unwrap().substituted_pivot, None);
    }

    #[test]
    fn test_rank_deficient_determinant_and_inverse() {
        let dependent_rows = Matrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]);
        assert_eq!(dependent_rows.determinant().unwrap(), 0.0);
        assert_eq!(dependent_rows.inverse(), Err(MathError::Singular { row: 1 }));

        let zero_column = Matrix::from_rows(&[[0.0, 1.0], [0.0, 2.0]]);
        assert_eq!(zero_column.determinant().unwrap(), 0.0);
        assert_eq!(zero_column.inverse(), Err(MathError::Singular { row: 0 }));

        // Solving still goes through the substituted pivot.
        assert!(dependent_rows.solve(&Vector::from([1.0, 2.0])).is_ok());
    }

    #[test]
    fn test_lu_back_substitute_checks_sizes() {
        let mut m = Matrix::identity(2);
        let pivots = m.lu_decompose().unwrap();
        assert!(matches!(
            m.lu_back_substitute(&pivots.permutation, Vector::from([1.0, 2.0, 3.0])),
            Err(MathError::SizeMismatch(_))
        ));
        assert!(matches!(
            m.lu_back_substitute(&[0], Vector::from([1.0, 2.0])),
            Err(MathError::SizeMismatch(_))
        ));
    }

    #[test]
    fn test_determinant_and_inverse() {
        let a = Matrix::from_rows(&[[4.0, 7.0], [2.0, 6.0]]);
        assert!((a.determinant().unwrap() - 10.0).abs() < 1e-12);
        assert_eq!(Matrix::from_rows(&[[0.0, 0.0], [1.0, 1.0]]).determinant().unwrap(), 0.0);

        let inverse = a.inverse().unwrap();
        assert_close(&inverse, &Matrix::from_rows(&[[0.6, -0.7], [-0.2, 0.4]]), 1e-12);
        assert_close(&a.multiply_matrix(&inverse).unwrap(), &Matrix::identity(2), 1e-12);

        // Swapping rows flips the sign.
        let swapped = Matrix::from_rows(&[[2.0, 6.0], [4.0, 7.0]]);
        assert!((swapped.determinant().unwrap() + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_round() {
        let mut m = Matrix::rotation_about_z(90.0);
        m.round(6);
        assert_eq!(m, [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_display() {
        assert_text_eq!(
            sample().to_string(),
            "[ [ 1.000000, 2.000000, 3.000000 ]\n  [ 4.000000, 5.000000, 6.000000 ]\n  [ 7.000000, 8.000000, 9.000000 ] ]"
        );
    }
}
