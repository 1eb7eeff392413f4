use std::f64::consts::TAU;

/// Line segments used to approximate one quadratic curve.
const QUAD_STEPS: usize = 8;
/// Line segments used to approximate a full ellipse.
const ELLIPSE_STEPS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// One connected run of points, optionally closed back to its start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubPath {
    pub points: Vec<Point>,
    pub closed: bool,
}

/// A polyline path built with canvas-style commands. Curves are flattened
/// as they are added, so a path is always a list of straight segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.subpaths.push(SubPath {
            points: vec![Point::new(x, y)],
            closed: false,
        });
        self
    }

    /// Add a straight segment. Without a current point this starts a new subpath.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        match self.current_mut() {
            Some(sub) => sub.points.push(Point::new(x, y)),
            None => {
                self.move_to(x, y);
            }
        }
        self
    }

    /// Quadratic Bézier from the current point through control (cx, cy) to (x, y).
    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> &mut Self {
        let Some(start) = self.current_point() else {
            return self.move_to(x, y);
        };
        for step in 1..=QUAD_STEPS {
            let t = step as f64 / QUAD_STEPS as f64;
            let u = 1.0 - t;
            let px = u * u * start.x + 2.0 * u * t * cx + t * t * x;
            let py = u * u * start.y + 2.0 * u * t * cy + t * t * y;
            self.line_to(px, py);
        }
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if let Some(sub) = self.current_mut() {
            sub.closed = true;
        }
        self
    }

    /// Closed axis-aligned ellipse centered at (cx, cy).
    pub fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        let mut path = Path::new();
        for i in 0..ELLIPSE_STEPS {
            let a = i as f64 / ELLIPSE_STEPS as f64 * TAU;
            path.line_to(cx + a.cos() * rx, cy + a.sin() * ry);
        }
        path.close();
        path
    }

    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Path::ellipse(cx, cy, r, r)
    }

    /// Open two-point path.
    pub fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let mut path = Path::new();
        path.move_to(x0, y0).line_to(x1, y1);
        path
    }

    #[cfg(test)]
    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    /// Straight segments to stroke. Closed subpaths include their closing edge.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.subpaths.iter().flat_map(|sub| {
            let open = sub.points.windows(2).map(|w| (w[0], w[1]));
            let closing = match (sub.closed, sub.points.first(), sub.points.last()) {
                (true, Some(&first), Some(&last)) if sub.points.len() > 2 => Some((last, first)),
                _ => None,
            };
            open.chain(closing)
        })
    }

    /// Edges used for filling: every subpath is treated as closed.
    pub fn fill_edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.subpaths.iter().flat_map(|sub| {
            let n = sub.points.len();
            (0..n).map(move |i| (sub.points[i], sub.points[(i + 1) % n]))
        })
    }

    /// (min, max) corners of all points.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut it = self.subpaths.iter().flat_map(|s| s.points.iter());
        let first = *it.next()?;
        let (min, max) = it.fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Some((min, max))
    }

    /// Apply `f` to every point.
    pub fn map(&self, f: impl Fn(Point) -> Point) -> Path {
        Path {
            subpaths: self
                .subpaths
                .iter()
                .map(|s| SubPath {
                    points: s.points.iter().copied().map(&f).collect(),
                    closed: s.closed,
                })
                .collect(),
        }
    }

    fn current_mut(&mut self) -> Option<&mut SubPath> {
        self.subpaths.last_mut().filter(|s| !s.closed)
    }

    fn current_point(&self) -> Option<Point> {
        self.subpaths
            .last()
            .filter(|s| !s.closed)
            .and_then(|s| s.points.last().copied())
    }
}
