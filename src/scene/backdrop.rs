//! Cosmetic layers painted behind the waves: bobbing tech markers and a
//! falling binary stream.

use rand::RngExt;

use crate::render::{ColorGradient, ColorStop, DrawTarget, Paint, Path, Rgba, VerticalGradient};

use super::surface::Surface;

/// A floating marker at a fixed spot on the surface.
struct Marker {
    color: (u8, u8, u8),
    /// Diameter in pixels
    size: f64,
    /// Top-left corner as fractions of the surface
    top: f64,
    left: f64,
    /// Seconds per bob cycle
    period: f64,
}

const MARKERS: [Marker; 9] = [
    Marker { color: (255, 54, 33), size: 60.0, top: 0.20, left: 0.10, period: 4.0 },
    Marker { color: (55, 118, 171), size: 50.0, top: 0.60, left: 0.05, period: 3.5 },
    Marker { color: (97, 218, 251), size: 65.0, top: 0.70, left: 0.90, period: 4.5 },
    Marker { color: (226, 90, 28), size: 55.0, top: 0.40, left: 0.80, period: 4.2 },
    Marker { color: (41, 181, 232), size: 45.0, top: 0.30, left: 0.15, period: 3.8 },
    Marker { color: (0, 173, 212), size: 55.0, top: 0.50, left: 0.50, period: 4.0 },
    Marker { color: (240, 80, 50), size: 50.0, top: 0.80, left: 0.20, period: 3.2 },
    Marker { color: (0, 120, 212), size: 60.0, top: 0.55, left: 0.85, period: 4.6 },
    Marker { color: (0, 120, 212), size: 55.0, top: 0.25, left: 0.65, period: 3.7 },
];

const MARKER_ALPHA: f64 = 0.4;
/// Reflection strength relative to the marker.
const REFLECTION: f64 = 0.3;
/// Peak upward bob in pixels.
const BOB_HEIGHT: f64 = 20.0;
/// Start delay between consecutive markers, seconds.
const MARKER_STAGGER: f64 = 0.5;

const STREAM_COLUMNS: usize = 20;
const STREAM_PATTERNS: [[bool; 5]; 2] = [
    [true, false, true, true, false],
    [false, true, false, false, true],
];
const STREAM_COLOR: (u8, u8, u8) = (14, 165, 233);
/// Overall stream opacity before each column's own opacity.
const STREAM_ALPHA: f64 = 0.35;
const DIGIT_W: f64 = 7.0;
const DIGIT_H: f64 = 10.0;
/// Columns start this far above the top edge.
const STREAM_LEAD: f64 = 20.0;

/// Ease-in-out curve on 0..=1.
fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Upward offset (negative y) for a marker `seconds` into the animation.
/// Rests at zero until its delay passes, then cycles 0 → -20 → 0.
fn bob_offset(index: usize, period: f64, seconds: f64) -> f64 {
    let local = seconds - index as f64 * MARKER_STAGGER;
    if local <= 0.0 || period <= 0.0 {
        return 0.0;
    }
    let phase = (local / period).fract();
    let rise = if phase < 0.5 { phase * 2.0 } else { (1.0 - phase) * 2.0 };
    -BOB_HEIGHT * ease_in_out(rise)
}

#[derive(Debug, Clone, PartialEq)]
struct StreamColumn {
    /// Left edge as a fraction of surface width
    x: f64,
    /// Seconds to fall the full height
    duration: f64,
    /// Seconds before the first fall
    delay: f64,
    opacity: f64,
    bits: [bool; 5],
}

impl StreamColumn {
    fn random(rng: &mut impl RngExt) -> Self {
        StreamColumn {
            x: rng.random_range(0.0..1.0),
            duration: rng.random_range(2.0..=7.0),
            delay: rng.random_range(0.0..=5.0),
            opacity: rng.random_range(0.0..=1.0),
            bits: STREAM_PATTERNS[rng.random_range(0..STREAM_PATTERNS.len())],
        }
    }

    /// Top edge of the column, or `None` while still waiting for its delay.
    fn top(&self, surface_height: f64, seconds: f64) -> Option<f64> {
        let local = seconds - self.delay;
        if local < 0.0 {
            return None;
        }
        let progress = (local / self.duration).fract();
        Some(-STREAM_LEAD + progress * (surface_height + STREAM_LEAD))
    }
}

/// Background decoration drawn between the sky gradient and the waves.
#[derive(Debug, Clone)]
pub struct Backdrop {
    columns: Vec<StreamColumn>,
    /// Seconds per tick at the nominal frame rate
    tick_seconds: f64,
}

impl Backdrop {
    /// Build with a freshly randomized stream. `fps` converts ticks to seconds.
    pub fn new(fps: u32) -> Self {
        let mut rng = rand::rng();
        let columns = (0..STREAM_COLUMNS).map(|_| StreamColumn::random(&mut rng)).collect();
        Backdrop {
            columns,
            tick_seconds: 1.0 / fps.max(1) as f64,
        }
    }

    pub fn draw<T: DrawTarget + ?Sized>(&self, target: &mut T, surface: &Surface, time: f64) {
        let seconds = time * self.tick_seconds;
        self.draw_stream(target, surface, seconds);
        self.draw_markers(target, surface, seconds);
    }

    fn draw_stream<T: DrawTarget + ?Sized>(&self, target: &mut T, surface: &Surface, seconds: f64) {
        let (r, g, b) = STREAM_COLOR;
        for col in &self.columns {
            let Some(top) = col.top(surface.height(), seconds) else {
                continue;
            };
            let left = col.x * surface.width();
            let alpha = col.opacity * STREAM_ALPHA;
            for (i, &on) in col.bits.iter().enumerate() {
                let a = if on { alpha } else { alpha * 0.35 };
                let paint = Paint::Solid(Rgba::new(r, g, b, a));
                target.fill_rect(left + i as f64 * DIGIT_W, top, DIGIT_W - 1.0, DIGIT_H, &paint);
            }
        }
    }

    fn draw_markers<T: DrawTarget + ?Sized>(&self, target: &mut T, surface: &Surface, seconds: f64) {
        for (i, m) in MARKERS.iter().enumerate() {
            let (r, g, b) = m.color;
            let radius = m.size * 0.5;
            let cx = m.left * surface.width() + radius;
            let cy = m.top * surface.height() + radius + bob_offset(i, m.period, seconds);

            let body = Rgba::new(r, g, b, MARKER_ALPHA);
            target.fill_path(&Path::circle(cx, cy, radius * 0.5), &Paint::Solid(body));

            // Mirrored copy below, fading out downward.
            let ry = cy + m.size;
            let fade = ColorGradient::new(vec![
                ColorStop::new(0.0, body.with_alpha(MARKER_ALPHA * REFLECTION)),
                ColorStop::new(1.0, body.with_alpha(0.0)),
            ]);
            let paint = Paint::Vertical(VerticalGradient::new(ry - radius * 0.5, ry + radius * 0.5, fade));
            target.fill_path(&Path::circle(cx, ry, radius * 0.5), &paint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bob_rests_before_delay() {
        assert_eq!(bob_offset(4, 3.8, 1.9), 0.0);
    }

    #[test]
    fn test_bob_peaks_mid_cycle() {
        let peak = bob_offset(0, 4.0, 2.0);
        assert!((peak + BOB_HEIGHT).abs() < 1e-9);
        let back = bob_offset(0, 4.0, 4.0);
        assert!(back.abs() < 1e-9);
    }

    #[test]
    fn test_bob_stays_in_range() {
        for step in 0..500 {
            let s = step as f64 * 0.037;
            for (i, m) in MARKERS.iter().enumerate() {
                let y = bob_offset(i, m.period, s);
                assert!((-BOB_HEIGHT..=0.0).contains(&y));
            }
        }
    }

    #[test]
    fn test_random_columns_within_ranges() {
        let b = Backdrop::new(30);
        assert_eq!(b.columns.len(), STREAM_COLUMNS);
        for c in &b.columns {
            assert!((0.0..1.0).contains(&c.x));
            assert!((2.0..=7.0).contains(&c.duration));
            assert!((0.0..=5.0).contains(&c.delay));
            assert!((0.0..=1.0).contains(&c.opacity));
            assert!(STREAM_PATTERNS.contains(&c.bits));
        }
    }

    #[test]
    fn test_column_falls_and_wraps() {
        let col = StreamColumn { x: 0.5, duration: 4.0, delay: 1.0, opacity: 1.0, bits: STREAM_PATTERNS[0] };
        assert_eq!(col.top(600.0, 0.5), None);
        assert_eq!(col.top(600.0, 1.0), Some(-STREAM_LEAD));
        let mid = col.top(600.0, 3.0).unwrap();
        assert!((mid - (-STREAM_LEAD + 0.5 * (600.0 + STREAM_LEAD))).abs() < 1e-9);
        assert_eq!(col.top(600.0, 5.0), Some(-STREAM_LEAD));
    }

    #[test]
    fn test_tick_seconds_from_fps() {
        let b = Backdrop::new(25);
        assert!((b.tick_seconds - 0.04).abs() < 1e-12);
    }
}
