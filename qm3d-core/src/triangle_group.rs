/// Indexed triangle meshes built from shared vertices and undirected edges
///
/// A [`TriangleGroup`] stores each distinct vertex once. Triangles and edges
/// refer to vertices by index, so adjacent facets share both. The regular
/// solids generated here are wound counter-clockwise when viewed from outside,
/// so facet normals point away from the origin.
use crate::error::{MathError, Result};
use crate::math_util;
use crate::stl;
use crate::vector::Vector;

/// Half-width and half-height of the golden rectangles that frame a unit icosahedron
const ICOSAHEDRON_X: f64 = 0.525731112119133606;
const ICOSAHEDRON_Z: f64 = 0.850650808352039932;

/// Slack allowed when checking that a facet's circumcircle fits the unit sphere
const UNIT_SPHERE_TOLERANCE: f64 = 1e-9;

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 4, 1],
    [0, 9, 4],
    [9, 5, 4],
    [4, 5, 8],
    [4, 8, 1],
    [8, 10, 1],
    [8, 3, 10],
    [5, 3, 8],
    [5, 2, 3],
    [2, 7, 3],
    [7, 10, 3],
    [7, 6, 10],
    [7, 11, 6],
    [11, 0, 6],
    [0, 1, 6],
    [6, 1, 10],
    [9, 0, 11],
    [9, 11, 2],
    [9, 2, 5],
    [7, 2, 11],
];

#[derive(Debug, Clone, Default)]
pub struct TriangleGroup {
    vertices: Vec<Vector>,
    edges: Vec<(usize, usize)>,
    triangles: Vec<[usize; 3]>,
}

impl TriangleGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// A regular tetrahedron inscribed in the unit sphere with one vertex on +z
    pub fn tetrahedron() -> Self {
        let theta = (-1.0f64 / 3.0).acos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let around = |alpha: f64| {
            let (sin_alpha, cos_alpha) = math_util::sin_cos_of_degrees(alpha);
            Vector::from([sin_theta * cos_alpha, sin_theta * sin_alpha, cos_theta])
        };

        let a = Vector::from([0.0, 0.0, 1.0]);
        let b = around(0.0);
        let c = around(120.0);
        let d = around(240.0);

        let mut group = Self::new();
        group.insert_triangle(&a, &d, &b);
        group.insert_triangle(&a, &c, &d);
        group.insert_triangle(&a, &b, &c);
        group.insert_triangle(&b, &d, &c);
        group
    }

    /// A regular icosahedron inscribed in the unit sphere
    pub fn icosahedron() -> Self {
        let (x, z) = (ICOSAHEDRON_X, ICOSAHEDRON_Z);
        // Three mutually orthogonal golden rectangles, four corners each.
        let points: Vec<Vector> = (0..12usize)
            .map(|i| {
                let odd = i & 1 != 0;
                let high = i & 2 != 0;
                let sign = |negative: bool, value: f64| if negative { -value } else { value };
                match i {
                    0..=3 => Vector::from([sign(!odd, x), 0.0, sign(high, z)]),
                    4..=7 => Vector::from([0.0, sign(high, z), sign(odd, x)]),
                    _ => Vector::from([sign(odd, z), sign(high, x), 0.0]),
                }
            })
            .collect();

        let mut group = Self::new();
        for [i, j, k] in ICOSAHEDRON_FACES {
            group.insert_triangle(&points[i], &points[k], &points[j]);
        }
        group
    }

    /// Add a triangle by its corner positions, returning the triangle index.
    ///
    /// Corners already present in the group are reused. A triangle that is a
    /// cyclic rotation of an existing one is not added again; the reversed
    /// winding counts as a distinct triangle.
    pub fn add_triangle(&mut self, a: &Vector, b: &Vector, c: &Vector) -> Result<usize> {
        for corner in [a, b, c] {
            if corner.len() != 3 {
                return Err(MathError::DimensionMismatch(format!(
                    "triangle corners must have 3 components, got {}",
                    corner.len()
                )));
            }
        }
        if a == b || b == c || c == a {
            return Err(MathError::InvalidArgument(
                "triangle corners must be distinct".to_string(),
            ));
        }
        Ok(self.insert_triangle(a, b, c))
    }

    fn insert_triangle(&mut self, a: &Vector, b: &Vector, c: &Vector) -> usize {
        let corners = [self.add_vertex(a), self.add_vertex(b), self.add_vertex(c)];
        self.add_edge(corners[0], corners[1]);
        self.add_edge(corners[1], corners[2]);
        self.add_edge(corners[2], corners[0]);

        let rotations = [
            corners,
            [corners[1], corners[2], corners[0]],
            [corners[2], corners[0], corners[1]],
        ];
        let existing = self
            .triangles
            .iter()
            .position(|t| rotations.contains(t));
        match existing {
            Some(index) => index,
            None => {
                self.triangles.push(corners);
                self.triangles.len() - 1
            }
        }
    }

    fn add_vertex(&mut self, v: &Vector) -> usize {
        match self.vertices.iter().position(|existing| existing == v) {
            Some(index) => index,
            None => {
                self.vertices.push(v.clone());
                self.vertices.len() - 1
            }
        }
    }

    fn add_edge(&mut self, i: usize, j: usize) -> usize {
        let existing = self
            .edges
            .iter()
            .position(|&(p, q)| (p == i && q == j) || (p == j && q == i));
        match existing {
            Some(index) => index,
            None => {
                self.edges.push((i, j));
                self.edges.len() - 1
            }
        }
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn n_faces(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertices(&self) -> &[Vector] {
        &self.vertices
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Corner positions of a triangle in winding order
    pub fn triangle_corners(&self, index: usize) -> Result<[&Vector; 3]> {
        let [a, b, c] = *self
            .triangles
            .get(index)
            .ok_or_else(|| MathError::out_of_bounds(index, self.triangles.len()))?;
        Ok([&self.vertices[a], &self.vertices[b], &self.vertices[c]])
    }

    pub fn edge_length(&self, index: usize) -> Result<f64> {
        let (i, j) = *self
            .edges
            .get(index)
            .ok_or_else(|| MathError::out_of_bounds(index, self.edges.len()))?;
        Ok(self.vertices[i].subtract(&self.vertices[j])?.norm())
    }

    /// Unit normal of a triangle following the right-hand rule on its winding
    pub fn facet_normal(&self, index: usize) -> Result<Vector> {
        let [a, b, c] = self.triangle_corners(index)?;
        let ab = b.subtract(a)?;
        let ac = c.subtract(a)?;
        Ok(ab.cross(&ac)?.normalized())
    }

    /// Split every triangle into four, pushing the new edge midpoints out to
    /// the unit sphere.
    ///
    /// Each triangle ABC becomes ADF, DBE, ECF and DEF where D, E and F are
    /// the projected midpoints of AB, BC and CA.
    pub fn spherical_subdivide(&mut self) -> Result<()> {
        let mut refined = Self::new();
        for index in 0..self.triangles.len() {
            let [a, b, c] = self.triangle_corners(index)?;
            let d = a.add(b)?.scaled_copy(0.5).normalized();
            let e = b.add(c)?.scaled_copy(0.5).normalized();
            let f = c.add(a)?.scaled_copy(0.5).normalized();

            refined.insert_triangle(a, &d, &f);
            refined.insert_triangle(&d, b, &e);
            refined.insert_triangle(&e, c, &f);
            refined.insert_triangle(&d, &e, &f);
        }

        log::debug!(
            "subdivided {} faces into {} ({} vertices, {} edges)",
            self.n_faces(),
            refined.n_faces(),
            refined.n_vertices(),
            refined.n_edges()
        );
        *self = refined;
        Ok(())
    }

    /// Largest gap between a flat facet and the unit sphere it approximates.
    ///
    /// For each triangle the circumscribed circle is found from the law of
    /// sines; the sagitta of a unit sphere over that circle is the deviation.
    /// A facet whose circumcircle is wider than the unit sphere cannot lie on
    /// it, and fails with [`MathError::InvalidArgument`].
    pub fn max_spherical_deviation(&self) -> Result<f64> {
        let mut deviation: f64 = 0.0;
        for index in 0..self.triangles.len() {
            let [a, b, c] = self.triangle_corners(index)?;
            let chord = a.subtract(c)?.norm();
            let ba = a.subtract(b)?.normalized();
            let bc = c.subtract(b)?.normalized();
            let angle_abc = ba.dot(&bc)?.clamp(-1.0, 1.0).acos();

            let diameter = chord / angle_abc.sin();
            let radius = diameter * 0.5;
            if radius.is_nan() || radius > 1.0 + UNIT_SPHERE_TOLERANCE {
                return Err(MathError::InvalidArgument(format!(
                    "triangle {} has circumradius {}, it does not lie on the unit sphere",
                    index, radius
                )));
            }
            let half_angle = radius.min(1.0).asin();
            deviation = deviation.max(1.0 - half_angle.cos());
        }
        Ok(deviation)
    }

    /// Render the group as an ASCII STL solid
    pub fn to_stl(&self, name: &str) -> Result<String> {
        stl::write_ascii_stl(self, name)
    }
}
