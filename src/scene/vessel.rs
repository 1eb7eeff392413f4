//! The small sailboat that rides the front wave: hull, mast, flag and a
//! seated figure.

use crate::render::{DrawTarget, Paint, Path, Point, Rgba};

use super::wave::WaveSpec;

/// How far the hull sits above the water line, in pixels.
pub const HULL_CLEARANCE: f64 = 8.0;
/// Horizontal drift as a fraction of surface width.
const DRIFT_FRACTION: f64 = 0.18;
/// Radians per tick of the horizontal drift. Much slower than any wave.
const DRIFT_SPEED: f64 = 0.006;
const MAST_HEIGHT: f64 = 24.0;

const SHADOW: Rgba = Rgba::new(10, 20, 40, 0.25);
const HULL: Rgba = Rgba::opaque(146, 64, 14);
const MAST: Rgba = Rgba::opaque(253, 230, 138);
const FLAG: Rgba = Rgba::opaque(239, 68, 68);
const FLAG_OUTLINE: Rgba = Rgba::new(0, 0, 0, 0.25);
const HEAD: Rgba = Rgba::opaque(253, 230, 138);
const BODY: Rgba = Rgba::new(203, 213, 225, 0.7);

/// Where the boat sits this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselPose {
    pub x: f64,
    pub y: f64,
}

impl VesselPose {
    /// Drift around the surface center and sit on the front wave.
    pub fn on_wave(front: &WaveSpec, surface_width: f64, time: f64) -> Self {
        let x = surface_width * 0.5 + (time * DRIFT_SPEED).sin() * surface_width * DRIFT_FRACTION;
        let y = front.height_at(0, x, time) - HULL_CLEARANCE;
        VesselPose { x, y }
    }

    pub fn mast_top(&self) -> Point {
        Point::new(self.x, self.y - 2.0 - MAST_HEIGHT)
    }
}

/// Cloth-like flag: two edges whose flutter grows from the mast to the free end.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagRibbon {
    pub top: Vec<Point>,
    pub bottom: Vec<Point>,
}

impl FlagRibbon {
    pub const SEGMENTS: usize = 6;
    pub const WIDTH: f64 = 22.0;
    pub const HEIGHT: f64 = 10.0;
    /// Radians per tick
    pub const SPEED: f64 = 0.18;
    pub const BASE_AMPLITUDE: f64 = 3.0;
    /// Phase lag between neighbouring points
    const LAG: f64 = 0.5;

    /// Damping factor for point `i`: 0.3 at the mast, 1.0 at the free end.
    pub fn damping(i: usize) -> f64 {
        0.3 + 0.7 * (i as f64 / Self::SEGMENTS as f64)
    }

    pub fn amplitude(i: usize) -> f64 {
        Self::BASE_AMPLITUDE * Self::damping(i)
    }

    pub fn at(mast_top: Point, time: f64) -> Self {
        let mut top = Vec::with_capacity(Self::SEGMENTS + 1);
        let mut bottom = Vec::with_capacity(Self::SEGMENTS + 1);
        top.push(mast_top);
        bottom.push(Point::new(mast_top.x, mast_top.y + Self::HEIGHT));

        for i in 1..=Self::SEGMENTS {
            let fi = i as f64;
            let x = mast_top.x + 2.0 + fi / Self::SEGMENTS as f64 * Self::WIDTH;
            let amp = Self::amplitude(i);
            let phase = time * Self::SPEED + fi * Self::LAG;
            top.push(Point::new(x, mast_top.y + phase.sin() * amp - fi * 0.15));
            bottom.push(Point::new(
                x,
                mast_top.y + Self::HEIGHT + (phase + 0.5).sin() * amp * 0.7 + fi * 0.08,
            ));
        }
        FlagRibbon { top, bottom }
    }

    /// Closed outline: along the top edge, back along the bottom edge.
    pub fn outline(&self) -> Path {
        let mut path = Path::new();
        for (i, p) in self.top.iter().chain(self.bottom.iter().rev()).enumerate() {
            if i == 0 {
                path.move_to(p.x, p.y);
            } else {
                path.line_to(p.x, p.y);
            }
        }
        path.close();
        path
    }
}

fn hull(bx: f64, by: f64) -> Path {
    let mut path = Path::new();
    path.move_to(bx - 28.0, by + 4.0)
        .quad_to(bx - 12.0, by + 18.0, bx + 28.0, by + 4.0)
        .line_to(bx + 18.0, by - 2.0)
        .quad_to(bx, by + 10.0, bx - 18.0, by - 2.0)
        .close();
    path
}

/// Draw the boat on the front wave. Later parts cover earlier ones.
pub fn draw<T: DrawTarget + ?Sized>(target: &mut T, front: &WaveSpec, surface_width: f64, time: f64) {
    let pose = VesselPose::on_wave(front, surface_width, time);
    let (bx, by) = (pose.x, pose.y);

    target.fill_path(&Path::ellipse(bx, by + 14.0, 24.0, 6.0), &Paint::Solid(SHADOW));
    target.fill_path(&hull(bx, by), &Paint::Solid(HULL));

    let mast_top = pose.mast_top();
    target.stroke_path(&Path::line(bx, by - 2.0, bx, mast_top.y), MAST, 2.0);

    let flag = FlagRibbon::at(mast_top, time).outline();
    target.fill_path(&flag, &Paint::Solid(FLAG));
    target.stroke_path(&flag, FLAG_OUTLINE, 1.0);

    // Head bob runs on its own clock, separate from the hull's ride on the wave.
    let head_x = bx - 6.0;
    let head_y = by - 2.0 + (time * 0.08).sin() * 1.5;
    target.fill_path(&Path::circle(head_x, head_y - 6.0, 4.0), &Paint::Solid(HEAD));
    target.stroke_path(&Path::line(head_x, head_y - 2.0, head_x, head_y + 6.0), BODY, 2.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::wave::WaveField;

    #[test]
    fn test_damping_grows_from_mast_to_free_end() {
        assert!((FlagRibbon::damping(0) - 0.3).abs() < 1e-12);
        assert!((FlagRibbon::damping(FlagRibbon::SEGMENTS) - 1.0).abs() < 1e-12);
        for i in 1..=FlagRibbon::SEGMENTS {
            assert!(FlagRibbon::amplitude(i) > FlagRibbon::amplitude(i - 1));
        }
    }

    #[test]
    fn test_flag_is_pinned_at_mast() {
        let mast = Point::new(100.0, 50.0);
        for t in [0.0, 13.0, 250.0] {
            let flag = FlagRibbon::at(mast, t);
            assert_eq!(flag.top.len(), FlagRibbon::SEGMENTS + 1);
            assert_eq!(flag.top[0], mast);
            assert_eq!(flag.bottom[0], Point::new(100.0, 60.0));
            let end = flag.top.last().unwrap();
            assert!((end.x - (100.0 + 2.0 + FlagRibbon::WIDTH)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_free_end_displacement_within_its_amplitude() {
        let mast = Point::new(0.0, 0.0);
        let last = FlagRibbon::SEGMENTS;
        for t in 0..400 {
            let flag = FlagRibbon::at(mast, t as f64);
            let drift = last as f64 * 0.15;
            let dy = flag.top[last].y + drift;
            assert!(dy.abs() <= FlagRibbon::amplitude(last) + 1e-9);
        }
    }

    #[test]
    fn test_outline_visits_top_then_bottom_reversed() {
        let flag = FlagRibbon::at(Point::new(0.0, 0.0), 0.0);
        let path = flag.outline();
        let pts = &path.subpaths()[0].points;
        assert_eq!(pts.len(), 2 * (FlagRibbon::SEGMENTS + 1));
        assert_eq!(pts[0], flag.top[0]);
        assert_eq!(*pts.last().unwrap(), flag.bottom[0]);
        assert!(path.subpaths()[0].closed);
    }

    #[test]
    fn test_pose_rides_front_wave() {
        let field = WaveField::standard(600.0);
        let front = field.front().unwrap();
        for t in [0.0, 100.0, 1234.0] {
            let pose = VesselPose::on_wave(front, 800.0, t);
            assert!(pose.x >= 800.0 * (0.5 - DRIFT_FRACTION) - 1e-9);
            assert!(pose.x <= 800.0 * (0.5 + DRIFT_FRACTION) + 1e-9);
            let water = field.height(0, pose.x, t).unwrap();
            assert!((water - HULL_CLEARANCE - pose.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pose_at_time_zero_is_centered() {
        let field = WaveField::standard(600.0);
        let pose = VesselPose::on_wave(field.front().unwrap(), 800.0, 0.0);
        assert_eq!(pose.x, 400.0);
    }
}
