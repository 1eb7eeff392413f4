use super::ansi::SgrRun;
use super::canvas::{Canvas, ColorMode, color_to_fg};

/// Braille dot positions within a 2x4 cell:
/// (0,0) (1,0)    dot1 dot4
/// (0,1) (1,1)    dot2 dot5
/// (0,2) (1,2)    dot3 dot6
/// (0,3) (1,3)    dot7 dot8
///
/// Unicode braille: U+2800 + dot_bits
const BRAILLE_OFFSET: u32 = 0x2800;
const DOT_MAP: [(usize, usize, u32); 8] = [
    (0, 0, 0x01),
    (0, 1, 0x02),
    (0, 2, 0x04),
    (1, 0, 0x08),
    (1, 1, 0x10),
    (1, 2, 0x20),
    (0, 3, 0x40),
    (1, 3, 0x80),
];

/// Minimum coverage for a dot to be raised. Translucent water layers sit
/// above this, the near-transparent sky gradient below it.
const THRESHOLD: f64 = 0.3;

pub fn render(canvas: &Canvas) -> String {
    let (term_cols, term_rows) = canvas.term_size();
    let mut out = String::with_capacity(term_cols * term_rows * 20);
    let mut run = SgrRun::new();

    for row in 0..term_rows {
        for col in 0..term_cols {
            let (bits, rgb) = sample_cell(canvas, col * 2, row * 4);
            let ch = char::from_u32(BRAILLE_OFFSET + bits).unwrap_or(' ');

            match rgb {
                Some((r, g, b)) if canvas.color_mode != ColorMode::Mono => {
                    run.set(&mut out, &color_to_fg(canvas.map_color(r, g, b)));
                }
                _ => run.reset(&mut out),
            }
            out.push(ch);
        }
        run.end_row(&mut out, row);
    }
    out
}

/// Dot bits for the 2x4 block at (px, py) plus the average color of the raised dots.
fn sample_cell(canvas: &Canvas, px: usize, py: usize) -> (u32, Option<(u8, u8, u8)>) {
    let mut bits = 0;
    let (mut tr, mut tg, mut tb, mut lit) = (0u32, 0u32, 0u32, 0u32);

    for &(dx, dy, bit) in &DOT_MAP {
        let (x, y) = (px + dx, py + dy);
        if x >= canvas.width || y >= canvas.height {
            continue;
        }
        let idx = y * canvas.width + x;
        if canvas.pixels[idx] > THRESHOLD {
            bits |= bit;
            let (r, g, b) = canvas.colors[idx];
            tr += r as u32;
            tg += g as u32;
            tb += b as u32;
            lit += 1;
        }
    }

    let rgb = (lit > 0).then(|| ((tr / lit) as u8, (tg / lit) as u8, (tb / lit) as u8));
    (bits, rgb)
}
