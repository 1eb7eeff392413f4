use crossterm::style::Color;

use super::ansi::SgrRun;

/// How to render sub-cell pixels to terminal characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderMode {
    /// Unicode braille characters (2x4 per cell = highest resolution)
    Braille,
    /// Half-block characters ▀▄█ (1x2 per cell)
    HalfBlock,
    /// Plain ASCII characters with density mapping
    Ascii,
}

impl RenderMode {
    /// Sub-cell pixels per terminal cell as (columns, rows).
    pub fn cell_pixels(self) -> (usize, usize) {
        match self {
            RenderMode::Braille => (2, 4),
            RenderMode::HalfBlock => (1, 2),
            RenderMode::Ascii => (1, 1),
        }
    }
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// No color, monochrome
    Mono,
    /// ANSI 16 colors
    Ansi16,
    /// 256-color palette
    Ansi256,
    /// 24-bit true color (RGB)
    TrueColor,
}

/// An RGB color with a straight (non-premultiplied) alpha in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Rgba { a, ..self }
    }
}

/// A pixel-level canvas that gets rendered to terminal characters.
/// Coordinates are in "sub-cell" pixel space.
pub struct Canvas {
    /// Width in pixels (sub-cell)
    pub width: usize,
    /// Height in pixels (sub-cell)
    pub height: usize,
    /// Coverage per pixel: 0.0 = untouched background, 1.0 = fully painted
    pub pixels: Vec<f64>,
    /// Per-pixel color. Displayed color is `color * coverage`.
    pub colors: Vec<(u8, u8, u8)>,
    pub render_mode: RenderMode,
    pub color_mode: ColorMode,
    /// Color quantization step (0 = off, 4/8/16 = round RGB to nearest N).
    pub color_quant: u8,
}

impl Canvas {
    pub fn new(
        term_cols: usize,
        term_rows: usize,
        render_mode: RenderMode,
        color_mode: ColorMode,
    ) -> Self {
        let (cx, cy) = render_mode.cell_pixels();
        let (px_w, px_h) = (term_cols * cx, term_rows * cy);
        let size = px_w * px_h;
        Canvas {
            width: px_w,
            height: px_h,
            pixels: vec![0.0; size],
            colors: vec![(0, 0, 0); size],
            render_mode,
            color_mode,
            color_quant: 0,
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0.0);
        self.colors.fill((0, 0, 0));
    }

    /// Source-over blend a translucent color onto a pixel. Bounds-checked.
    #[inline]
    pub fn blend(&mut self, x: usize, y: usize, src: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let a = src.a.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = y * self.width + x;
        let v = self.pixels[idx];
        let keep = v * (1.0 - a);
        let out_v = keep + a;
        let (r, g, b) = self.colors[idx];
        let mix = |dst: u8, s: u8| -> u8 {
            ((dst as f64 * keep + s as f64 * a) / out_v).round().clamp(0.0, 255.0) as u8
        };
        self.colors[idx] = (mix(r, src.r), mix(g, src.g), mix(b, src.b));
        self.pixels[idx] = out_v.min(1.0);
    }

    /// Terminal dimensions needed for this canvas
    pub fn term_size(&self) -> (usize, usize) {
        let (cx, cy) = self.render_mode.cell_pixels();
        (self.width / cx, self.height / cy)
    }

    /// Render the canvas to a string buffer for output
    pub fn render(&self) -> String {
        match self.render_mode {
            RenderMode::Braille => super::braille::render(self),
            RenderMode::HalfBlock => super::halfblock::render(self),
            RenderMode::Ascii => self.render_ascii(),
        }
    }

    fn render_ascii(&self) -> String {
        const RAMP: &[u8] = b" .:-=+*#%@";
        let (cols, rows) = self.term_size();
        let mut out = String::with_capacity(cols * rows * 10);
        let mut run = SgrRun::new();

        for row in 0..rows {
            for col in 0..cols {
                let idx = row * self.width + col;
                let v = self.pixels[idx].clamp(0.0, 1.0);
                let ch = RAMP[(v * (RAMP.len() - 1) as f64) as usize] as char;
                if self.color_mode != ColorMode::Mono && v > 0.0 {
                    let (r, g, b) = self.colors[idx];
                    run.set(&mut out, &color_to_fg(self.map_color(r, g, b)));
                } else {
                    run.reset(&mut out);
                }
                out.push(ch);
            }
            run.end_row(&mut out, row);
        }
        out
    }

    pub fn map_color(&self, r: u8, g: u8, b: u8) -> Color {
        let (r, g, b) = if self.color_quant > 1 {
            let q = self.color_quant as u16;
            (
                ((r as u16 + q / 2) / q * q).min(255) as u8,
                ((g as u16 + q / 2) / q * q).min(255) as u8,
                ((b as u16 + q / 2) / q * q).min(255) as u8,
            )
        } else {
            (r, g, b)
        };
        match self.color_mode {
            ColorMode::Mono => Color::White,
            ColorMode::TrueColor => Color::Rgb { r, g, b },
            ColorMode::Ansi256 => {
                let idx = 16 + (36 * (r as u16 / 51)) + (6 * (g as u16 / 51)) + (b as u16 / 51);
                Color::AnsiValue(idx as u8)
            }
            ColorMode::Ansi16 => {
                let brightness = (r as u16 + g as u16 + b as u16) / 3;
                if brightness < 40 {
                    Color::Black
                } else if b > r && b > g {
                    if brightness > 150 {
                        Color::Blue
                    } else {
                        Color::DarkBlue
                    }
                } else if g > r && g > b {
                    if brightness > 150 {
                        Color::Cyan
                    } else {
                        Color::DarkCyan
                    }
                } else if r > g && r > b {
                    if brightness > 150 {
                        Color::Red
                    } else {
                        Color::DarkRed
                    }
                } else if r > 180 && g > 160 {
                    Color::Yellow
                } else if brightness > 180 {
                    Color::White
                } else {
                    Color::Grey
                }
            }
        }
    }
}

pub fn color_to_fg(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("38;2;{};{};{}", r, g, b),
        Color::AnsiValue(v) => format!("38;5;{}", v),
        Color::Black => "30".into(),
        Color::DarkRed => "31".into(),
        Color::DarkGreen => "32".into(),
        Color::DarkYellow => "33".into(),
        Color::DarkBlue => "34".into(),
        Color::DarkMagenta => "35".into(),
        Color::DarkCyan => "36".into(),
        Color::Grey => "37".into(),
        Color::DarkGrey => "90".into(),
        Color::Red => "91".into(),
        Color::Green => "92".into(),
        Color::Yellow => "93".into(),
        Color::Blue => "94".into(),
        Color::Magenta => "95".into(),
        Color::Cyan => "96".into(),
        Color::White => "97".into(),
        _ => "37".into(),
    }
}

pub fn color_to_bg(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("48;2;{};{};{}", r, g, b),
        Color::AnsiValue(v) => format!("48;5;{}", v),
        Color::Black => "40".into(),
        Color::DarkRed => "41".into(),
        Color::DarkGreen => "42".into(),
        Color::DarkYellow => "43".into(),
        Color::DarkBlue => "44".into(),
        Color::DarkMagenta => "45".into(),
        Color::DarkCyan => "46".into(),
        Color::Grey => "47".into(),
        Color::DarkGrey => "100".into(),
        Color::Red => "101".into(),
        Color::Green => "102".into(),
        Color::Yellow => "103".into(),
        Color::Blue => "104".into(),
        Color::Magenta => "105".into(),
        Color::Cyan => "106".into(),
        Color::White => "107".into(),
        _ => "40".into(),
    }
}
