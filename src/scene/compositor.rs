//! Paints one complete frame of the water scene.

use crate::render::{ColorGradient, ColorStop, DrawTarget, Paint, Path, Rgba, VerticalGradient};

use super::backdrop::Backdrop;
use super::surface::Surface;
use super::vessel;
use super::wave::{WaveField, WaveSpec};

/// Horizontal sampling step along each wave, in pixels.
pub const WAVE_STEP: usize = 5;
pub const WAVE_LINE_WIDTH: f64 = 2.0;
/// Per-layer opacity falloff: each wave further back keeps this share.
const LAYER_FALLOFF: f64 = 0.75;

const SKY: (u8, u8, u8) = (15, 23, 42);
const CREST: Rgba = Rgba::opaque(59, 130, 246);
const BODY: Rgba = Rgba::opaque(37, 99, 235);
const DEEP: Rgba = Rgba::opaque(30, 58, 138);

fn layer_weight(index: usize) -> f64 {
    LAYER_FALLOFF.powi(index as i32)
}

/// Full-surface tint, clear at the top and deepening toward the bottom.
pub fn sky_gradient(surface_height: f64) -> VerticalGradient {
    let (r, g, b) = SKY;
    VerticalGradient::new(
        0.0,
        surface_height,
        ColorGradient::new(vec![
            ColorStop::new(0.0, Rgba::new(r, g, b, 0.0)),
            ColorStop::new(0.5, Rgba::new(r, g, b, 0.1)),
            ColorStop::new(1.0, Rgba::new(r, g, b, 0.2)),
        ]),
    )
}

/// Fill for wave `index`, running from its baseline to the surface bottom.
pub fn wave_fill(index: usize, baseline: f64, surface_height: f64) -> VerticalGradient {
    let k = layer_weight(index);
    VerticalGradient::new(
        baseline,
        surface_height,
        ColorGradient::new(vec![
            ColorStop::new(0.0, CREST.with_alpha(0.85 * k)),
            ColorStop::new(0.5, BODY.with_alpha(0.6 * k)),
            ColorStop::new(1.0, DEEP.with_alpha(0.4 * k)),
        ]),
    )
}

/// Outline color for the crest of wave `index`.
pub fn wave_stroke(index: usize) -> Rgba {
    CREST.with_alpha(0.95 * layer_weight(index))
}

/// Open polyline along the wave crest, sampled every [`WAVE_STEP`] pixels
/// starting at the resting baseline on the left edge.
pub fn crest_path(wave: &WaveSpec, index: usize, surface_width: f64, time: f64) -> Path {
    let mut path = Path::new();
    path.move_to(0.0, wave.baseline);
    let mut x = 0usize;
    while x as f64 <= surface_width {
        let fx = x as f64;
        path.line_to(fx, wave.height_at(index, fx, time));
        x += WAVE_STEP;
    }
    path
}

/// The crest closed down to the bottom edge of the surface.
pub fn body_path(crest: &Path, surface_width: f64, surface_height: f64) -> Path {
    let mut path = crest.clone();
    path.line_to(surface_width, surface_height)
        .line_to(0.0, surface_height)
        .close();
    path
}

/// Draw one frame: sky, optional backdrop, waves back to front, then the boat.
pub fn compose<T: DrawTarget + ?Sized>(
    target: &mut T,
    surface: &Surface,
    field: &WaveField,
    time: f64,
    backdrop: Option<&Backdrop>,
) {
    let (w, h) = (surface.width(), surface.height());

    target.clear();
    target.fill_rect(0.0, 0.0, w, h, &Paint::Vertical(sky_gradient(h)));

    if let Some(backdrop) = backdrop {
        backdrop.draw(target, surface, time);
    }

    for (i, wave) in field.iter().enumerate() {
        let crest = crest_path(wave, i, w, time);
        target.fill_path(&body_path(&crest, w, h), &Paint::Vertical(wave_fill(i, wave.baseline, h)));
        target.stroke_path(&crest, wave_stroke(i), WAVE_LINE_WIDTH);
    }

    if let Some(front) = field.front() {
        vessel::draw(target, front, w, time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Viewport;
    use crate::scene::testing::{DrawCall, RecordingTarget};

    fn surface(w: f64, h: f64) -> Surface {
        let mut s = Surface::new(None);
        s.fit(Viewport::new(w, h));
        s
    }

    #[test]
    fn test_frame_starts_with_full_overwrite() {
        let s = surface(800.0, 600.0);
        let mut rec = RecordingTarget::default();
        compose(&mut rec, &s, &WaveField::standard(600.0), 0.0, None);
        assert_eq!(rec.calls[0], DrawCall::Clear);
        assert_eq!(rec.calls[1], DrawCall::FillRect { w: 800.0, h: 600.0 });
    }

    #[test]
    fn test_each_wave_filled_then_stroked() {
        let s = surface(800.0, 600.0);
        let mut rec = RecordingTarget::default();
        compose(&mut rec, &s, &WaveField::standard(600.0), 0.0, None);
        let waves: Vec<&DrawCall> = rec.calls[2..8].iter().collect();
        for pair in waves.chunks(2) {
            assert!(matches!(pair[0], DrawCall::FillPath));
            assert!(matches!(pair[1], DrawCall::StrokePath));
        }
    }

    #[test]
    fn test_crest_samples_every_five_pixels() {
        let field = WaveField::standard(600.0);
        let crest = crest_path(field.front().unwrap(), 0, 800.0, 0.0);
        let pts = &crest.subpaths()[0].points;
        // moveTo plus x = 0, 5, ..., 800
        assert_eq!(pts.len(), 1 + 161);
        assert_eq!(pts[1].x, 0.0);
        assert_eq!(pts[2].x, 5.0);
        assert_eq!(pts.last().unwrap().x, 800.0);
        assert_eq!(pts[1].y, 420.0);
    }

    #[test]
    fn test_body_closes_to_bottom() {
        let field = WaveField::standard(600.0);
        let crest = crest_path(field.front().unwrap(), 0, 800.0, 0.0);
        let body = body_path(&crest, 800.0, 600.0);
        let sub = &body.subpaths()[0];
        assert!(sub.closed);
        let n = sub.points.len();
        assert_eq!(sub.points[n - 2].x, 800.0);
        assert_eq!(sub.points[n - 1].y, 600.0);
    }

    #[test]
    fn test_layer_opacity_decreases_with_index() {
        for i in 0..5 {
            assert!(wave_stroke(i + 1).a < wave_stroke(i).a);
            let a = wave_fill(i, 0.0, 1.0);
            let b = wave_fill(i + 1, 0.0, 1.0);
            for t in [0.0, 0.5, 1.0] {
                assert!(b.stops.sample(t).a < a.stops.sample(t).a);
            }
        }
    }

    #[test]
    fn test_sky_is_clear_at_top() {
        let g = sky_gradient(600.0);
        assert_eq!(g.at(0.0).a, 0.0);
        assert!((g.at(600.0).a - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_compose_paints_terminal_canvas() {
        use crate::render::{Canvas, ColorMode, Painter, RenderMode};
        let mut canvas = Canvas::new(80, 30, RenderMode::HalfBlock, ColorMode::TrueColor);
        let s = surface(80.0 * 5.0, 60.0 * 5.0);
        let field = WaveField::standard(s.height());
        compose(&mut Painter::new(&mut canvas, 5.0), &s, &field, 0.0, None);
        // Bottom row is under every wave, the top row is open sky.
        let bottom = (canvas.height - 1) * canvas.width;
        assert!(canvas.pixels[bottom + 2] > 0.5);
        assert!(canvas.pixels[2] < 0.05);
    }
}
