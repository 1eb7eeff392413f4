use super::canvas::Rgba;

/// A color stop in a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(t: f64, color: Rgba) -> Self {
        ColorStop { t, color }
    }
}

/// Linear gradient between color stops. Samples by parameter t in 0.0..=1.0.
/// Alpha is interpolated along with the channels.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGradient {
    stops: Vec<ColorStop>,
}

impl ColorGradient {
    /// Create a gradient from a list of color stops. Stops should be sorted by t.
    pub fn new(stops: Vec<ColorStop>) -> Self {
        assert!(stops.len() >= 2, "ColorGradient requires at least 2 stops");
        ColorGradient { stops }
    }

    /// Sample the gradient at parameter t (0.0..=1.0).
    pub fn sample(&self, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let first = self.stops[0];
        if t <= first.t {
            return first.color;
        }
        let last = self.stops[self.stops.len() - 1];
        if t >= last.t {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.t && t <= b.t {
                let frac = (t - a.t) / (b.t - a.t);
                let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
                return Rgba::new(
                    lerp(a.color.r, b.color.r),
                    lerp(a.color.g, b.color.g),
                    lerp(a.color.b, b.color.b),
                    a.color.a + (b.color.a - a.color.a) * frac,
                );
            }
        }
        last.color
    }
}

/// A gradient running top-to-bottom between two surface rows.
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalGradient {
    pub y0: f64,
    pub y1: f64,
    pub stops: ColorGradient,
}

impl VerticalGradient {
    pub fn new(y0: f64, y1: f64, stops: ColorGradient) -> Self {
        VerticalGradient { y0, y1, stops }
    }

    /// Color at surface row `y`. Rows outside `y0..=y1` take the end colors.
    pub fn at(&self, y: f64) -> Rgba {
        let span = self.y1 - self.y0;
        let t = if span.abs() < f64::EPSILON { 0.0 } else { (y - self.y0) / span };
        self.stops.sample(t)
    }
}

/// Fill style for shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Vertical(VerticalGradient),
}

impl Paint {
    pub fn at(&self, y: f64) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Vertical(g) => g.at(y),
        }
    }
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}
