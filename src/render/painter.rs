use super::canvas::{Canvas, Rgba};
use super::gradient::Paint;
use super::path::{Path, Point};

/// Thinnest stroke, in canvas pixels from the center line, that still
/// lights a full pixel row.
const MIN_HALF_WIDTH: f64 = 0.55;

/// Drawing operations the scene issues each frame. Coordinates are in
/// surface (logical) pixels.
pub trait DrawTarget {
    /// Drop everything drawn so far.
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint);
    fn fill_path(&mut self, path: &Path, paint: &Paint);
    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f64);
}

/// Rasterizes surface-space drawing onto a terminal canvas.
/// One canvas pixel covers `scale` surface pixels in each direction.
pub struct Painter<'a> {
    canvas: &'a mut Canvas,
    scale: f64,
    /// Scratch mask so overlapping stroke segments blend each pixel once.
    mask: Vec<bool>,
}

impl<'a> Painter<'a> {
    pub fn new(canvas: &'a mut Canvas, scale: f64) -> Self {
        let size = canvas.width * canvas.height;
        Painter {
            canvas,
            scale: scale.max(f64::EPSILON),
            mask: vec![false; size],
        }
    }

    fn to_canvas(&self, p: Point) -> Point {
        Point::new(p.x / self.scale, p.y / self.scale)
    }

    /// Inclusive pixel range whose centers may fall inside `lo..hi`.
    fn pixel_span(&self, lo: f64, hi: f64, limit: usize) -> Option<(usize, usize)> {
        if limit == 0 || hi < 0.0 {
            return None;
        }
        let start = (lo - 0.5).ceil().max(0.0) as usize;
        let end = ((hi - 0.5).floor().max(-1.0) as isize).min(limit as isize - 1);
        if end < start as isize {
            return None;
        }
        Some((start, end as usize))
    }
}

impl DrawTarget for Painter<'_> {
    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        let a = self.to_canvas(Point::new(x, y));
        let b = self.to_canvas(Point::new(x + w, y + h));
        let Some((x0, x1)) = self.pixel_span(a.x.min(b.x), a.x.max(b.x), self.canvas.width) else {
            return;
        };
        let Some((y0, y1)) = self.pixel_span(a.y.min(b.y), a.y.max(b.y), self.canvas.height) else {
            return;
        };
        for py in y0..=y1 {
            let color = paint.at((py as f64 + 0.5) * self.scale);
            for px in x0..=x1 {
                self.canvas.blend(px, py, color);
            }
        }
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        let scale = self.scale;
        let local = path.map(|p| Point::new(p.x / scale, p.y / scale));
        let Some((min, max)) = local.bounds() else {
            return;
        };
        let Some((y0, y1)) = self.pixel_span(min.y, max.y, self.canvas.height) else {
            return;
        };

        let mut crossings: Vec<f64> = Vec::new();
        for py in y0..=y1 {
            let cy = py as f64 + 0.5;
            crossings.clear();
            for (a, b) in local.fill_edges() {
                if (a.y > cy) != (b.y > cy) {
                    crossings.push(a.x + (cy - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(f64::total_cmp);

            let color = paint.at(cy * scale);
            for span in crossings.chunks_exact(2) {
                if let Some((x0, x1)) = self.pixel_span(span[0], span[1], self.canvas.width) {
                    for px in x0..=x1 {
                        self.canvas.blend(px, py, color);
                    }
                }
            }
        }
    }

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f64) {
        let half = (width / self.scale * 0.5).max(MIN_HALF_WIDTH);
        let (w, h) = (self.canvas.width, self.canvas.height);
        self.mask.fill(false);
        let mut touched: Vec<usize> = Vec::new();

        for (a, b) in path.segments() {
            let (a, b) = (self.to_canvas(a), self.to_canvas(b));
            let Some((x0, x1)) = self.pixel_span(a.x.min(b.x) - half, a.x.max(b.x) + half, w) else {
                continue;
            };
            let Some((y0, y1)) = self.pixel_span(a.y.min(b.y) - half, a.y.max(b.y) + half, h) else {
                continue;
            };
            for py in y0..=y1 {
                for px in x0..=x1 {
                    let idx = py * w + px;
                    if self.mask[idx] {
                        continue;
                    }
                    let c = Point::new(px as f64 + 0.5, py as f64 + 0.5);
                    if distance_to_segment(c, a, b) <= half {
                        self.mask[idx] = true;
                        touched.push(idx);
                    }
                }
            }
        }

        for idx in touched {
            self.canvas.blend(idx % w, idx / w, color);
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq < f64::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ColorMode, RenderMode};

    fn canvas(cols: usize, rows: usize) -> Canvas {
        Canvas::new(cols, rows, RenderMode::Ascii, ColorMode::TrueColor)
    }

    fn lit(c: &Canvas) -> usize {
        c.pixels.iter().filter(|&&p| p > 0.0).count()
    }

    #[test]
    fn test_fill_rect_covers_whole_canvas() {
        let mut c = canvas(10, 8);
        Painter::new(&mut c, 1.0).fill_rect(0.0, 0.0, 10.0, 8.0, &Rgba::opaque(1, 2, 3).into());
        assert_eq!(lit(&c), 80);
    }

    #[test]
    fn test_fill_rect_respects_scale() {
        let mut c = canvas(10, 10);
        // 50 surface px at scale 5 is 10 canvas px; 25 is half of it.
        Painter::new(&mut c, 5.0).fill_rect(0.0, 0.0, 25.0, 50.0, &Rgba::opaque(9, 9, 9).into());
        assert_eq!(lit(&c), 5 * 10);
    }

    #[test]
    fn test_fill_path_square() {
        let mut c = canvas(10, 10);
        let mut p = Path::new();
        p.move_to(2.0, 2.0).line_to(6.0, 2.0).line_to(6.0, 6.0).line_to(2.0, 6.0).close();
        Painter::new(&mut c, 1.0).fill_path(&p, &Rgba::opaque(255, 0, 0).into());
        assert_eq!(lit(&c), 16);
        assert_eq!(c.colors[3 * 10 + 3], (255, 0, 0));
        assert_eq!(c.pixels[0], 0.0);
    }

    #[test]
    fn test_fill_path_offscreen_is_noop() {
        let mut c = canvas(4, 4);
        let p = Path::circle(-50.0, -50.0, 3.0);
        Painter::new(&mut c, 1.0).fill_path(&p, &Rgba::opaque(255, 0, 0).into());
        assert_eq!(lit(&c), 0);
    }

    #[test]
    fn test_stroke_thin_line_lights_one_row() {
        let mut c = canvas(10, 5);
        // A 2 px stroke is thinner than one canvas pixel at scale 5.
        let p = Path::line(0.0, 12.5, 50.0, 12.5);
        Painter::new(&mut c, 5.0).stroke_path(&p, Rgba::opaque(0, 255, 0), 2.0);
        for x in 0..10 {
            assert!(c.pixels[2 * 10 + x] > 0.0);
        }
        assert_eq!(lit(&c), 10);
    }

    #[test]
    fn test_stroke_joint_blends_once() {
        let mut c = canvas(10, 10);
        let mut p = Path::new();
        p.move_to(1.5, 5.5).line_to(5.5, 5.5).line_to(5.5, 1.5);
        Painter::new(&mut c, 1.0).stroke_path(&p, Rgba::new(255, 255, 255, 0.5), 1.0);
        // The shared corner pixel would read 0.75 if blended twice.
        assert!((c.pixels[5 * 10 + 5] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_distance_to_segment() {
        let d = distance_to_segment(Point::new(5.0, 3.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-12);
        let end = distance_to_segment(Point::new(13.0, 4.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((end - 5.0).abs() < 1e-12);
    }
}
