/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use qm3d_core::{CoordinateSys, Matrix, TriangleGroup, Vector};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// Points closer to the camera than this are clipped
const NEAR_PLANE: f64 = 0.1;

/// ASCII renderer that converts triangle groups to terminal characters.
///
/// Geometry is expressed in the camera frame: +z points away from the
/// viewer, +y up the screen and +x to the right.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Current contents of one terminal row
    pub fn line(&self, y: usize) -> String {
        self.char_buffer[y * self.width..(y + 1) * self.width].iter().collect()
    }

    /// Draw every facet of `group` after rotating it by `rotation` and
    /// viewing it from `camera`.
    pub fn render_group(
        &mut self,
        group: &TriangleGroup,
        rotation: &Matrix,
        camera: &CoordinateSys,
    ) -> qm3d_core::Result<()> {
        let mut eye_points = Vec::with_capacity(group.n_vertices());
        for vertex in group.vertices() {
            let world = rotation.multiply_vector(vertex)?;
            eye_points.push(camera.from_parent(&world)?);
        }
        let screen_points: Vec<Option<(f64, f64, f64)>> =
            eye_points.iter().map(|p| self.project(p)).collect();

        // Light comes from the viewer.
        let toward_viewer = Vector::from([0.0, 0.0, -1.0]);
        for (index, &[a, b, c]) in group.triangles().iter().enumerate() {
            let (Some(pa), Some(pb), Some(pc)) = (screen_points[a], screen_points[b], screen_points[c])
            else {
                continue; // Triangle is clipped
            };

            let world_normal = rotation.multiply_vector(&group.facet_normal(index)?)?;
            let normal = camera.basis().multiply_vector(&world_normal)?;
            let brightness = normal.dot(&toward_viewer)?.max(0.0);

            let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f64) as usize;
            let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
            self.rasterize_triangle(&[pa, pb, pc], LUMINOSITY_RAMP[char_index]);
        }
        Ok(())
    }

    /// Perspective-project a camera-frame point to (column, row, depth)
    pub fn project(&self, point: &Vector) -> Option<(f64, f64, f64)> {
        let depth = point[2];
        if depth < NEAR_PLANE {
            return None;
        }
        let focal = self.height as f64;
        let x = self.width as f64 * 0.5 + point[0] / depth * focal * CELL_ASPECT;
        let y = self.height as f64 * 0.5 - point[1] / depth * focal;
        Some((x, y, depth))
    }

    fn rasterize_triangle(&mut self, coords: &[(f64, f64, f64); 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
