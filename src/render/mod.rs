mod ansi;
pub mod braille;
pub mod canvas;
pub mod gradient;
pub mod halfblock;
pub mod painter;
pub mod path;

pub use canvas::{Canvas, ColorMode, RenderMode, Rgba};
pub use gradient::{ColorGradient, ColorStop, Paint, VerticalGradient};
pub use painter::{DrawTarget, Painter};
pub use path::{Path, Point};
