/// Quaternions `s + ai + bj + ck`, stored as a scalar and a 3-vector.
///
/// The imaginary units obey Hamilton's rules:
/// `i² = j² = k² = ijk = -1`, `ij = k`, `jk = i`, `ki = j`,
/// `ji = -k`, `kj = -i`, `ik = -j`.
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{MathError, Result};
use crate::matrix::Matrix;
use crate::vector::{NumericSequence, Vector};

#[derive(Debug, Clone, PartialEq)]
pub struct Quaternion {
    s: f64,
    v: Vector,
}

impl Quaternion {
    pub fn new(s: f64, a: f64, b: f64, c: f64) -> Self {
        Self {
            s,
            v: Vector::from([a, b, c]),
        }
    }

    /// Build `[s, v]`; `v` must have exactly three components
    pub fn from_scalar_vector<S: NumericSequence + ?Sized>(s: f64, v: &S) -> Result<Self> {
        if v.seq_len() != 3 {
            return Err(MathError::DimensionMismatch(format!(
                "quaternion vector part needs 3 components, got {}",
                v.seq_len()
            )));
        }
        Ok(Self::new(s, v.seq_get(0), v.seq_get(1), v.seq_get(2)))
    }

    /// The multiplicative identity `[1, 0, 0, 0]`
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// The unit quaternion rotating by `angle` radians about `axis`.
    ///
    /// `axis` is expected to be unit length already; it is not normalized.
    pub fn for_rotation<S: NumericSequence + ?Sized>(axis: &S, angle: f64) -> Result<Self> {
        if axis.seq_len() != 3 {
            return Err(MathError::DimensionMismatch(format!(
                "rotation axis needs 3 components, got {}",
                axis.seq_len()
            )));
        }
        let (sin_half, cos_half) = (angle / 2.0).sin_cos();
        Ok(Self::new(
            cos_half,
            axis.seq_get(0) * sin_half,
            axis.seq_get(1) * sin_half,
            axis.seq_get(2) * sin_half,
        ))
    }

    pub fn scalar(&self) -> f64 {
        self.s
    }

    pub fn vector(&self) -> &Vector {
        &self.v
    }

    /// Components as `[s, a, b, c]`
    pub fn components(&self) -> [f64; 4] {
        [self.s, self.v[0], self.v[1], self.v[2]]
    }

    /// Compare against a `[s, a, b, c]` sequence
    pub fn compare(&self, seq: &[f64]) -> bool {
        seq.len() == 4 && self.components() == seq
    }

    pub fn add(&self, other: &Quaternion) -> Quaternion {
        Self::new(
            self.s + other.s,
            self.v[0] + other.v[0],
            self.v[1] + other.v[1],
            self.v[2] + other.v[2],
        )
    }

    pub fn subtract(&self, other: &Quaternion) -> Quaternion {
        Self::new(
            self.s - other.s,
            self.v[0] - other.v[0],
            self.v[1] - other.v[1],
            self.v[2] - other.v[2],
        )
    }

    /// Multiply every component by `scalar` in place
    pub fn scale(&mut self, scalar: f64) {
        self.s *= scalar;
        self.v.scale(scalar);
    }

    pub fn scaled_copy(&self, scalar: f64) -> Quaternion {
        let mut copy = self.clone();
        copy.scale(scalar);
        copy
    }

    /// The Hamilton product `self * other`, expanded per component
    pub fn multiply(&self, other: &Quaternion) -> Quaternion {
        let (s1, a1, b1, c1) = (self.s, self.v[0], self.v[1], self.v[2]);
        let (s2, a2, b2, c2) = (other.s, other.v[0], other.v[1], other.v[2]);
        Self::new(
            s1 * s2 - a1 * a2 - b1 * b2 - c1 * c2,
            s1 * a2 + a1 * s2 + b1 * c2 - c1 * b2,
            s1 * b2 - a1 * c2 + b1 * s2 + c1 * a2,
            s1 * c2 + a1 * b2 - b1 * a2 + c1 * s2,
        )
    }

    pub fn conjugate(&self) -> Quaternion {
        Self {
            s: self.s,
            v: -&self.v,
        }
    }

    /// `sqrt(s² + |v|²)`
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    fn norm_squared(&self) -> f64 {
        self.s * self.s + self.v.iter().map(|x| x * x).sum::<f64>()
    }

    /// Scale to unit norm in place
    pub fn normalize(&mut self) -> &mut Self {
        let inverse = 1.0 / self.norm();
        self.scale(inverse);
        self
    }

    /// `conjugate / norm²` as a new quaternion
    pub fn inverse(&self) -> Quaternion {
        let mut inverse = self.conjugate();
        inverse.scale(1.0 / self.norm_squared());
        inverse
    }

    /// Replace `self` with its inverse
    pub fn invert(&mut self) -> &mut Self {
        *self = self.inverse();
        self
    }

    /// Rotate a 3-vector by this quaternion: the vector part of `q [0, v] q⁻¹`
    pub fn rotate_vector<S: NumericSequence + ?Sized>(&self, v: &S) -> Result<Vector> {
        let pure = Self::from_scalar_vector(0.0, v)?;
        let rotated = self.multiply(&pure).multiply(&self.inverse());
        Ok(rotated.v)
    }

    /// The 3x3 rotation matrix of a unit quaternion
    pub fn to_rotation_matrix(&self) -> Matrix {
        let (w, x, y, z) = (self.s, self.v[0], self.v[1], self.v[2]);
        Matrix::from_rows(&[
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ])
    }

    /// Render as `s + ai - bj + ck`, keeping a trailing `.0` on whole
    /// components: `1.0 + 2.0i - 3.0j + 0.5k`
    pub fn to_hamilton_string(&self) -> String {
        let term = |value: f64, unit: char| {
            let sign = if value >= 0.0 { '+' } else { '-' };
            format!(" {} {:?}{}", sign, value.abs(), unit)
        };
        format!(
            "{:?}{}{}{}",
            self.s,
            term(self.v[0], 'i'),
            term(self.v[1], 'j'),
            term(self.v[2], 'k')
        )
    }
}

impl Add for &Quaternion {
    type Output = Quaternion;

    fn add(self, other: &Quaternion) -> Quaternion {
        Quaternion::add(self, other)
    }
}

impl Sub for &Quaternion {
    type Output = Quaternion;

    fn sub(self, other: &Quaternion) -> Quaternion {
        self.subtract(other)
    }
}

impl Mul for &Quaternion {
    type Output = Quaternion;

    fn mul(self, other: &Quaternion) -> Quaternion {
        self.multiply(other)
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, other: Quaternion) -> Quaternion {
        self.multiply(&other)
    }
}

impl Neg for &Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        self.scaled_copy(-1.0)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {:.6}, {} ]", self.s, self.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The geometric form `[s1 s2 - v1·v2, s1 v2 + s2 v1 + v1 × v2]`,
    /// kept as an independent check of the expanded product.
    fn geometric_product(q1: &Quaternion, q2: &Quaternion) -> Quaternion {
        let s = q1.scalar() * q2.scalar() - q1.vector().dot(q2.vector()).unwrap();
        let v = q2
            .vector()
            .scaled_copy(q1.scalar())
            .add(&q1.vector().scaled_copy(q2.scalar()))
            .unwrap()
            .add(&q1.vector().cross(q2.vector()).unwrap())
            .unwrap();
        Quaternion::from_scalar_vector(s, &v).unwrap()
    }

    fn basis() -> (Quaternion, Quaternion, Quaternion) {
        (
            Quaternion::new(0.0, 1.0, 0.0, 0.0),
            Quaternion::new(0.0, 0.0, 1.0, 0.0),
            Quaternion::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    fn assert_close(actual: &Quaternion, expected: [f64; 4], tolerance: f64) {
        for (a, b) in actual.components().iter().zip(expected) {
            assert!((a - b).abs() < tolerance, "{} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_equality() {
        let q1 = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let q2 = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q1, q2);
        let q3 = Quaternion::from_scalar_vector(1.0, &Vector::from([2.0, 3.0, 4.0])).unwrap();
        assert_eq!(q2, q3);
        assert_ne!(q1, Quaternion::new(1.0, 2.0, 3.0, 5.0));
    }

    #[test]
    fn test_from_scalar_vector_needs_three() {
        assert!(matches!(
            Quaternion::from_scalar_vector(1.0, &[1.0, 2.0]),
            Err(MathError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_compare() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert!(q.compare(&[1.0, 2.0, 3.0, 4.0]));
        assert!(!q.compare(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        assert!(!q.compare(&[0.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_add_and_subtract() {
        let q1 = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let q2 = Quaternion::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(&q1 + &q2, Quaternion::new(6.0, 8.0, 10.0, 12.0));
        assert!((&q2 - &q1).compare(&[4.0, 4.0, 4.0, 4.0]));
        assert!(q1.compare(&[1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_scale() {
        let q1 = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let mut q2 = q1.scaled_copy(3.0);
        assert!(q1.compare(&[1.0, 2.0, 3.0, 4.0]));
        assert!(q2.compare(&[3.0, 6.0, 9.0, 12.0]));
        q2.scale(5.0);
        assert!(q2.compare(&[15.0, 30.0, 45.0, 60.0]));
    }

    #[test]
    fn test_multiply() {
        let q1 = Quaternion::new(-2.0, 0.0, 0.0, 0.0);
        let q2 = Quaternion::new(5.0, 0.0, 0.0, 0.0);
        assert!(q1.multiply(&q2).compare(&[-10.0, 0.0, 0.0, 0.0]));

        let q1 = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let q2 = Quaternion::new(4.0, 3.0, 2.0, 1.0);
        assert_eq!(&q1 * &q2, Quaternion::new(-12.0, 6.0, 24.0, 12.0));

        let qa = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let qb = Quaternion::new(2.0, 3.0, 4.0, 5.0);
        assert!(qa.multiply(&qb).compare(&[-36.0, 6.0, 12.0, 12.0]));
    }

    #[test]
    fn test_multiply_matches_geometric_form() {
        let samples = [
            Quaternion::new(-2.0, 0.0, 0.0, 0.0),
            Quaternion::new(1.0, 2.0, 3.0, 4.0),
            Quaternion::new(4.0, 3.0, 2.0, 1.0),
            Quaternion::new(0.5, -1.25, 3.75, -0.125),
            Quaternion::new(-7.0, 0.1, 0.2, -0.3),
        ];
        for q1 in &samples {
            for q2 in &samples {
                let expected = geometric_product(q1, q2).components();
                assert_close(&q1.multiply(q2), expected, 1e-12);
            }
        }
    }

    #[test]
    fn test_hamilton_rules() {
        let neg1 = Quaternion::new(-1.0, 0.0, 0.0, 0.0);
        let (i, j, k) = basis();

        for product in [&i * &i, &j * &j, &k * &k, &(&i * &j) * &k] {
            assert_eq!(product, neg1);
        }
        assert_eq!(&i * &j, k);
        assert_eq!(&j * &k, i);
        assert_eq!(&k * &i, j);
        assert_eq!(&j * &i, -&k);
        assert_eq!(&k * &j, -&i);
        assert_eq!(&i * &k, -&j);

        // Same rules through the geometric form
        assert_eq!(geometric_product(&i, &i), neg1);
        assert_eq!(geometric_product(&geometric_product(&i, &j), &k), neg1);
        assert_eq!(geometric_product(&i, &j), k);
        assert_eq!(geometric_product(&j, &i), -&k);
        assert_eq!(geometric_product(&k, &j), -&i);
        assert_eq!(geometric_product(&i, &k), -&j);
    }

    #[test]
    fn test_conjugate_and_norm() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert!(q.conjugate().compare(&[1.0, -2.0, -3.0, -4.0]));
        assert_eq!(q.norm(), 30f64.sqrt());

        let mut unit = q.clone();
        unit.normalize();
        assert!((unit.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverse() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_close(&q.multiply(&q.inverse()), [1.0, 0.0, 0.0, 0.0], 1e-12);

        let mut inverted = q.clone();
        inverted.invert();
        assert_close(&inverted.multiply(&q), [1.0, 0.0, 0.0, 0.0], 1e-12);
        assert_eq!(inverted, q.inverse());
    }

    #[test]
    fn test_for_rotation() {
        let half_turn = Quaternion::for_rotation(&[0.0, 0.0, 1.0], std::f64::consts::PI).unwrap();
        assert_close(&half_turn, [0.0, 0.0, 0.0, 1.0], 1e-12);
        assert!((half_turn.norm() - 1.0).abs() < 1e-12);

        let quarter = Quaternion::for_rotation(&[0.0, 0.0, 1.0], std::f64::consts::FRAC_PI_2).unwrap();
        let y = quarter.rotate_vector(&[1.0, 0.0, 0.0]).unwrap();
        assert!(y[0].abs() < 1e-12 && (y[1] - 1.0).abs() < 1e-12 && y[2].abs() < 1e-12);

        assert!(matches!(
            Quaternion::for_rotation(&[1.0, 0.0], 1.0),
            Err(MathError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_rotation_matrix_matches_matrix_builders() {
        let angle = 30.0f64;
        let q = Quaternion::for_rotation(&[0.0, 0.0, 1.0], angle.to_radians()).unwrap();
        let expected = Matrix::rotation_about_z(angle);
        let actual = q.to_rotation_matrix();
        for (a, b) in actual.rows().zip(expected.rows()) {
            for (x, y) in a.iter().zip(b) {
                assert!((x - y).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_display() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q.to_string(), "[ 1.000000, [ 2.000000, 3.000000, 4.000000 ] ]");
        assert_eq!(
            Quaternion::new(1.5, -2.0, 3.0, -0.25).to_hamilton_string(),
            "1.5 - 2.0i + 3.0j - 0.25k"
        );
        assert_eq!(
            Quaternion::new(1.0, 0.0, -3.0, 0.5).to_hamilton_string(),
            "1.0 + 0.0i - 3.0j + 0.5k"
        );
    }
}
