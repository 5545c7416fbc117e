/// Variable-length real vectors
use std::fmt;
use std::ops::{Index, IndexMut, Mul, Neg};

use crate::error::{MathError, Result};
use crate::math_util;

/// A readable sequence of numbers with a known length.
///
/// Vector arithmetic and equality accept anything implementing this, so
/// plain arrays and slices can stand in for a `Vector` operand.
pub trait NumericSequence {
    fn seq_len(&self) -> usize;
    fn seq_get(&self, index: usize) -> f64;
}

impl NumericSequence for [f64] {
    fn seq_len(&self) -> usize {
        self.len()
    }

    fn seq_get(&self, index: usize) -> f64 {
        self[index]
    }
}

impl<const N: usize> NumericSequence for [f64; N] {
    fn seq_len(&self) -> usize {
        N
    }

    fn seq_get(&self, index: usize) -> f64 {
        self[index]
    }
}

impl NumericSequence for Vec<f64> {
    fn seq_len(&self) -> usize {
        self.len()
    }

    fn seq_get(&self, index: usize) -> f64 {
        self[index]
    }
}

impl NumericSequence for Vector {
    fn seq_len(&self) -> usize {
        self.elements.len()
    }

    fn seq_get(&self, index: usize) -> f64 {
        self.elements[index]
    }
}

/// Construction options for [`Vector::with_options`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VectorOptions {
    /// Zero-pad the vector up to this length
    pub size: Option<usize>,
}

/// A dense, dynamically sized vector of `f64`
#[derive(Debug, Clone, Default)]
pub struct Vector {
    elements: Vec<f64>,
}

impl Vector {
    pub fn new(elements: Vec<f64>) -> Self {
        Self { elements }
    }

    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            elements: values.to_vec(),
        }
    }

    /// Copy any numeric sequence into a new vector
    pub fn from_sequence<S: NumericSequence + ?Sized>(seq: &S) -> Self {
        (0..seq.seq_len()).map(|i| seq.seq_get(i)).collect()
    }

    /// Build a vector from `values`, zero-padded to `options.size`.
    ///
    /// Asking for a size smaller than `values.len()` is a configuration
    /// error.
    pub fn with_options(values: &[f64], options: VectorOptions) -> Result<Self> {
        let mut elements = values.to_vec();
        if let Some(size) = options.size {
            if size < values.len() {
                return Err(MathError::Configuration(format!(
                    "cannot allocate {} elements when {} are already specified",
                    size,
                    values.len()
                )));
            }
            elements.resize(size, 0.0);
        }
        Ok(Self { elements })
    }

    /// A vector of `n` zeros; `n` must be at least 1
    pub fn zeros(n: usize) -> Result<Self> {
        Self::filled(n, 0.0)
    }

    /// A vector of `n` ones; `n` must be at least 1
    pub fn ones(n: usize) -> Result<Self> {
        Self::filled(n, 1.0)
    }

    fn filled(n: usize, value: f64) -> Result<Self> {
        if n < 1 {
            return Err(MathError::InvalidArgument(
                "vector length must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            elements: vec![value; n],
        })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.elements.iter()
    }

    pub fn get(&self, index: usize) -> Result<f64> {
        self.elements
            .get(index)
            .copied()
            .ok_or_else(|| MathError::out_of_bounds(index, self.elements.len()))
    }

    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.elements.len();
        let slot = self
            .elements
            .get_mut(index)
            .ok_or_else(|| MathError::out_of_bounds(index, len))?;
        *slot = value;
        Ok(())
    }

    /// Remove the element at `index`, shifting later elements down
    pub fn remove(&mut self, index: usize) -> Result<f64> {
        if index >= self.elements.len() {
            return Err(MathError::out_of_bounds(index, self.elements.len()));
        }
        Ok(self.elements.remove(index))
    }

    fn check_same_len<S: NumericSequence + ?Sized>(&self, other: &S) -> Result<()> {
        if self.len() != other.seq_len() {
            return Err(MathError::size_mismatch(self.len(), other.seq_len()));
        }
        Ok(())
    }

    /// Element-wise sum as a new vector
    pub fn add<S: NumericSequence + ?Sized>(&self, other: &S) -> Result<Vector> {
        self.check_same_len(other)?;
        Ok(self
            .elements
            .iter()
            .enumerate()
            .map(|(i, x)| x + other.seq_get(i))
            .collect())
    }

    /// Element-wise difference as a new vector
    pub fn subtract<S: NumericSequence + ?Sized>(&self, other: &S) -> Result<Vector> {
        self.check_same_len(other)?;
        Ok(self
            .elements
            .iter()
            .enumerate()
            .map(|(i, x)| x - other.seq_get(i))
            .collect())
    }

    /// Multiply every element by `scalar` in place
    pub fn scale(&mut self, scalar: f64) {
        for x in &mut self.elements {
            *x *= scalar;
        }
    }

    /// A scaled copy; `self` is left unchanged
    pub fn scaled_copy(&self, scalar: f64) -> Vector {
        let mut copy = self.clone();
        copy.scale(scalar);
        copy
    }

    /// Dot (inner) product
    pub fn dot<S: NumericSequence + ?Sized>(&self, other: &S) -> Result<f64> {
        self.check_same_len(other)?;
        Ok(self
            .elements
            .iter()
            .enumerate()
            .map(|(i, x)| x * other.seq_get(i))
            .sum())
    }

    /// Cross product of two 3-vectors
    pub fn cross<S: NumericSequence + ?Sized>(&self, other: &S) -> Result<Vector> {
        if self.len() != 3 || other.seq_len() != 3 {
            return Err(MathError::DimensionMismatch(format!(
                "cross product needs two 3-vectors, got lengths {} and {}",
                self.len(),
                other.seq_len()
            )));
        }
        let (x1, y1, z1) = (self.elements[0], self.elements[1], self.elements[2]);
        let (x2, y2, z2) = (other.seq_get(0), other.seq_get(1), other.seq_get(2));
        Ok(Vector::new(vec![
            y1 * z2 - y2 * z1,
            z1 * x2 - z2 * x1,
            x1 * y2 - x2 * y1,
        ]))
    }

    /// Euclidean (L2) norm
    pub fn norm(&self) -> f64 {
        self.elements.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Scale to unit length in place.
    ///
    /// A zero vector has no direction; every element becomes NaN.
    pub fn normalize(&mut self) -> &mut Self {
        let inverse = 1.0 / self.norm();
        self.scale(inverse);
        self
    }

    /// A unit-length copy (see [`Vector::normalize`] for the zero case)
    pub fn normalized(&self) -> Vector {
        let mut copy = self.clone();
        copy.normalize();
        copy
    }

    /// Round every element to `places` decimal places in place
    pub fn round(&mut self, places: i32) -> &mut Self {
        for x in &mut self.elements {
            *x = math_util::round_to_places(*x, places);
        }
        self
    }

    /// The ASCII STL `vertex` line for the first three elements
    pub fn to_stl_vertex(&self) -> String {
        let at = |i: usize| self.elements.get(i).copied().unwrap_or(0.0);
        format!(
            "vertex {} {} {}",
            math_util::format_scientific(at(0)),
            math_util::format_scientific(at(1)),
            math_util::format_scientific(at(2))
        )
    }
}

impl<S: NumericSequence + ?Sized> PartialEq<S> for Vector {
    fn eq(&self, other: &S) -> bool {
        self.len() == other.seq_len()
            && self
                .elements
                .iter()
                .enumerate()
                .all(|(i, x)| *x == other.seq_get(i))
    }
}

impl From<Vec<f64>> for Vector {
    fn from(elements: Vec<f64>) -> Self {
        Self::new(elements)
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(values: [f64; N]) -> Self {
        Self::from_slice(&values)
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.elements[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.elements[index]
    }
}

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.scaled_copy(-1.0)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(mut self) -> Vector {
        self.scale(-1.0);
        self
    }
}

impl Mul<f64> for &Vector {
    type Output = Vector;

    fn mul(self, scalar: f64) -> Vector {
        self.scaled_copy(scalar)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(mut self, scalar: f64) -> Vector {
        self.scale(scalar);
        self
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for (i, x) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.6}", x)?;
        }
        if !self.elements.is_empty() {
            write!(f, " ")?;
        }
        write!(f, "]")
    }
}
