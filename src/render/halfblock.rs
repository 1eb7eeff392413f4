use super::ansi::SgrRun;
use super::canvas::{Canvas, ColorMode, color_to_bg, color_to_fg};

/// Coverage below which a half-block pixel counts as empty background.
/// Half-block scales color by coverage, so only true near-black is dropped.
const DARK_THRESHOLD: f64 = 0.02;

pub fn render(canvas: &Canvas) -> String {
    let (term_cols, term_rows) = canvas.term_size();
    let mut out = String::with_capacity(term_cols * term_rows * 10);
    let mut run = SgrRun::new();

    for row in 0..term_rows {
        for col in 0..term_cols {
            let top_idx = row * 2 * canvas.width + col;
            let bot_idx = top_idx + canvas.width;
            let top_v = canvas.pixels[top_idx];
            let bot_v = canvas.pixels[bot_idx];
            let top_dark = top_v < DARK_THRESHOLD;
            let bot_dark = bot_v < DARK_THRESHOLD;

            if canvas.color_mode == ColorMode::Mono {
                out.push(match (!top_dark, !bot_dark) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
                continue;
            }
            if top_dark && bot_dark {
                run.reset(&mut out);
                out.push(' ');
                continue;
            }

            let shade = |idx: usize, v: f64| {
                let (r, g, b) = canvas.colors[idx];
                let s = |c: u8| (c as f64 * v.clamp(0.0, 1.0)) as u8;
                canvas.map_color(s(r), s(g), s(b))
            };
            let sgr = format!(
                "{};{}",
                color_to_fg(shade(top_idx, top_v)),
                color_to_bg(shade(bot_idx, bot_v))
            );
            run.set(&mut out, &sgr);
            out.push('▀');
        }
        run.end_row(&mut out, row);
    }
    out
}
