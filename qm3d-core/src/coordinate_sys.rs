/// Coordinate frames defined relative to a parent frame
use std::rc::Rc;

use crate::error::{MathError, Result};
use crate::matrix::Matrix;
use crate::vector::{NumericSequence, Vector};

/// A named coordinate system expressed in terms of an optional parent.
///
/// The basis rows are this frame's x, y and z unit vectors written in parent
/// coordinates, so for a point `x` in the parent frame and origin `O`:
///
/// `B (x - O) = x'` (parent to local) and `Bᵀ x' + O = x` (local to parent).
#[derive(Debug, Clone)]
pub struct CoordinateSys {
    name: String,
    parent: Option<Rc<CoordinateSys>>,
    basis: Matrix,
    // Recomputed whenever the basis is assigned.
    basis_transpose: Matrix,
    origin: Vector,
}

impl CoordinateSys {
    /// A frame with the identity basis at the parent's origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            basis: Matrix::identity(3),
            basis_transpose: Matrix::identity(3),
            origin: Vector::from([0.0, 0.0, 0.0]),
        }
    }

    pub fn with_parent(mut self, parent: Rc<CoordinateSys>) -> Result<Self> {
        self.set_parent(Some(parent))?;
        Ok(self)
    }

    pub fn with_basis(mut self, basis: Matrix) -> Result<Self> {
        self.set_basis(basis)?;
        Ok(self)
    }

    pub fn with_origin(mut self, origin: Vector) -> Result<Self> {
        self.set_origin(origin)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn parent(&self) -> Option<&Rc<CoordinateSys>> {
        self.parent.as_ref()
    }

    /// Set (or clear) the parent frame.
    ///
    /// A frame may not appear among its own ancestors. On rejection the
    /// frame is left without a parent.
    pub fn set_parent(&mut self, parent: Option<Rc<CoordinateSys>>) -> Result<()> {
        let mut ancestor = parent.as_deref();
        while let Some(frame) = ancestor {
            if std::ptr::eq(frame, &*self) || *frame == *self {
                log::debug!("rejecting '{}' as an ancestor of itself", self.name);
                self.parent = None;
                return Err(MathError::InvalidArgument(format!(
                    "cannot assign coordinate system '{}' to be its own parent",
                    self.name
                )));
            }
            ancestor = frame.parent.as_deref();
        }
        self.parent = parent;
        Ok(())
    }

    pub fn basis(&self) -> &Matrix {
        &self.basis
    }

    /// Replace the basis; it must be 3x3
    pub fn set_basis(&mut self, basis: Matrix) -> Result<()> {
        if basis.size() != (3, 3) {
            return Err(MathError::DimensionMismatch(format!(
                "basis must be 3x3, got {}x{}",
                basis.nrows(),
                basis.ncols()
            )));
        }
        self.basis_transpose = basis.transpose();
        self.basis = basis;
        Ok(())
    }

    pub fn origin(&self) -> &Vector {
        &self.origin
    }

    /// Replace the origin; it must be a 3-vector
    pub fn set_origin(&mut self, origin: Vector) -> Result<()> {
        if origin.len() != 3 {
            return Err(MathError::DimensionMismatch(format!(
                "origin must have 3 components, got {}",
                origin.len()
            )));
        }
        self.origin = origin;
        Ok(())
    }

    /// Map a point from this frame into the parent frame
    pub fn to_parent<S: NumericSequence + ?Sized>(&self, v: &S) -> Result<Vector> {
        self.basis_transpose.multiply_vector(v)?.add(&self.origin)
    }

    /// Map a point from the parent frame into this frame
    pub fn from_parent<S: NumericSequence + ?Sized>(&self, v: &S) -> Result<Vector> {
        let offset = Vector::from_sequence(v).subtract(&self.origin)?;
        self.basis.multiply_vector(&offset)
    }

    /// Map a point from this frame up through every ancestor to the root
    pub fn to_root<S: NumericSequence + ?Sized>(&self, v: &S) -> Result<Vector> {
        let mut point = self.to_parent(v)?;
        let mut frame = self.parent.as_deref();
        while let Some(current) = frame {
            point = current.to_parent(&point)?;
            frame = current.parent.as_deref();
        }
        Ok(point)
    }

    /// Map a point from the root frame down into this frame
    pub fn from_root<S: NumericSequence + ?Sized>(&self, v: &S) -> Result<Vector> {
        let mut chain = vec![self];
        let mut frame = self.parent.as_deref();
        while let Some(current) = frame {
            chain.push(current);
            frame = current.parent.as_deref();
        }

        let mut point = Vector::from_sequence(v);
        for current in chain.iter().rev() {
            point = current.from_parent(&point)?;
        }
        Ok(point)
    }
}

impl PartialEq for CoordinateSys {
    fn eq(&self, other: &CoordinateSys) -> bool {
        self.name == other.name
            && self.parent == other.parent
            && self.basis == other.basis
            && self.origin == other.origin
    }
}
