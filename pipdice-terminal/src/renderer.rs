/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Matrix4;
use pipdice_core::{Camera, LabelBitmap, Mesh, Rgb, Triangle, VIEW_AXIS};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Floor so faces turned away from the light stay visible
const AMBIENT: f32 = 0.15;

/// ASCII renderer that converts die meshes to tinted terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, camera: &Camera, tint: Rgb) {
        for triangle in mesh.triangles() {
            self.render_triangle(&triangle, model_matrix, camera, tint);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, model_matrix: &Matrix4<f32>, camera: &Camera, tint: Rgb) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(vertex, model_matrix, self.width as u32, self.height as u32) {
                Some(projected) => *slot = projected,
                None => return, // Triangle is clipped
            }
        }

        // Light comes from the viewer, so faces shown head-on are brightest
        let normal = model_matrix.transform_vector(&triangle.outward_normal());
        let facing = normal.dot(&VIEW_AXIS);
        if facing <= 0.0 {
            return;
        }
        let brightness = AMBIENT + (1.0 - AMBIENT) * facing;

        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];
        let shade = |c: u8| (c as f32 * brightness) as u8;
        let color = Color::Rgb {
            r: shade(tint.r),
            g: shade(tint.g),
            b: shade(tint.b),
        };

        self.rasterize_triangle(&screen_coords, character, color);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Color) {
        let [v0, v1, v2] = *coords;

        // Bounding box, clipped to the screen
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py)) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                    self.color_buffer[idx] = color;
                }
            }
        }
    }

    /// Stamp a label image into a `cols` x `rows` box whose top-left cell is `(left, top)`
    pub fn draw_label(&mut self, bitmap: &LabelBitmap, left: usize, top: usize, cols: usize, rows: usize) {
        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = (left + col, top + row);
                if x >= self.width || y >= self.height {
                    continue;
                }
                let bx = (col * 2 + 1) * bitmap.size / (cols * 2);
                let by = (row * 2 + 1) * bitmap.size / (rows * 2);
                let idx = y * self.width + x;
                self.char_buffer[idx] = if bitmap.get(bx, by).unwrap_or(0) > 127 { '#' } else { ' ' };
                self.color_buffer[idx] = Color::Yellow;
                self.depth_buffer[idx] = f32::NEG_INFINITY;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipdice_core::{generate, LabelImageGenerator, LabelStyle, RasterLabelGenerator};

    #[test]
    fn test_barycentric_corners_and_degenerate() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)).unwrap();
        assert!((w0 - 1.0).abs() < 1e-6 && w1.abs() < 1e-6 && w2.abs() < 1e-6);
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn test_die_covers_screen_centre() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let camera = Camera::new(40, 20);
        renderer.render_mesh(&generate(6), &Matrix4::identity(), &camera, Rgb::WHITE);
        // Looking straight at the +Z face of the cube: fully lit
        assert_eq!(renderer.char_at(20, 10), '@');
        assert_eq!(renderer.char_at(0, 0), ' ');
    }

    #[test]
    fn test_clear_resets_buffers() {
        let mut renderer = AsciiRenderer::new(10, 10);
        renderer.render_mesh(&generate(20), &Matrix4::identity(), &Camera::new(10, 10), Rgb::WHITE);
        renderer.clear();
        assert!((0..10).all(|y| (0..10).all(|x| renderer.char_at(x, y) == ' ')));
    }

    #[test]
    fn test_label_stamp() {
        let bitmap = RasterLabelGenerator::new(64).generate(1, LabelStyle::Dots);
        let mut renderer = AsciiRenderer::new(20, 10);
        renderer.draw_label(&bitmap, 0, 0, 8, 8);
        // The single pip covers the middle of the box
        assert_eq!(renderer.char_at(3, 3), '#');
        assert_eq!(renderer.char_at(0, 0), ' ');
    }
}
