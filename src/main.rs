mod config;
mod console;
mod error;
mod host;
mod render;
mod scene;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode},
    execute, terminal,
};
use log::{error, info, warn};

use config::{Config, ShellConfig};
use console::Console;
use error::{AppError, Result};
use host::{TerminalHost, Viewport};
use render::{Canvas, ColorMode, Painter, RenderMode};
use scene::{RendererOptions, WaveRenderer};

/// Smallest terminal the scene is drawn in.
const MIN_COLS: u16 = 10;
const MIN_ROWS: u16 = 5;

#[derive(Parser)]
#[command(name = "tidemark", about = "Layered terminal waves with a small boat riding the swell")]
struct Cli {
    /// Render mode
    #[arg(short, long, value_enum)]
    render: Option<RenderMode>,

    /// Color mode
    #[arg(short, long, value_enum)]
    color: Option<ColorMode>,

    /// Target FPS (1-120). The scene advances one tick per frame.
    #[arg(short, long)]
    fps: Option<u32>,

    /// Logical pixels per canvas pixel (1-16)
    #[arg(short = 's', long)]
    pixel_scale: Option<f64>,

    /// Hide the status bar for pure animation mode
    #[arg(long)]
    clean: bool,

    /// Paint floating markers and a binary stream behind the waves
    #[arg(long)]
    backdrop: bool,

    /// Start without the system-log console
    #[arg(long)]
    no_console: bool,

    /// Style tag carried on the drawing surface
    #[arg(long)]
    class: Option<String>,

    /// Write logs to this file (RUST_LOG selects the level)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the config file path and exit
    #[arg(long)]
    show_config: bool,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,
}

/// Effective settings after layering CLI over config over defaults.
struct Settings {
    render_mode: RenderMode,
    color_mode: ColorMode,
    frame_dur: Duration,
    pixel_scale: f64,
    hide_status: bool,
    color_quant: u8,
    console: bool,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("tidemark: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.show_config {
        match config::config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("No config directory on this platform"),
        }
        return Ok(());
    }
    if cli.init_config {
        let path = config::config_path().ok_or_else(|| {
            AppError::Io(io::Error::new(io::ErrorKind::NotFound, "no config directory"))
        })?;
        config::write_default_config(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    // Start logging before the config is read when the CLI names the file.
    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }
    let loaded = config::load_config()?;
    if cli.log_file.is_none()
        && let Some(path) = loaded.config.log_file.as_deref()
    {
        init_logging(path)?;
    }
    match (&loaded.source, &loaded.warning) {
        (_, Some(e)) => {
            warn!("{}; using defaults", e);
            eprintln!("Warning: {}", e);
        }
        (Some(path), None) => info!("config loaded from {}", path.display()),
        (None, None) => info!("no config file, using defaults"),
    }
    let (settings, options, shell) = resolve(&cli, loaded.config);

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let mut writer = BufWriter::with_capacity(256 * 1024, stdout);
    let result = run_loop(&mut writer, settings, options, shell);

    // Cleanup
    execute!(writer, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}

/// The alternate screen owns the terminal, so logs only go to a file.
/// Without one the `log` macros stay silent.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    info!("logging to {}", path.display());
    Ok(())
}

fn resolve(cli: &Cli, cfg: Config) -> (Settings, RendererOptions, ShellConfig) {
    let fps = cli.fps.or(cfg.fps).unwrap_or(30).clamp(1, 120);
    let settings = Settings {
        render_mode: cli.render.or(cfg.render.map(Into::into)).unwrap_or(RenderMode::HalfBlock),
        color_mode: cli.color.or(cfg.color.map(Into::into)).unwrap_or(ColorMode::TrueColor),
        frame_dur: Duration::from_secs_f64(1.0 / fps as f64),
        pixel_scale: cli
            .pixel_scale
            .filter(|s| s.is_finite())
            .or(cfg.pixel_scale.filter(|s| s.is_finite()))
            .unwrap_or(5.0)
            .clamp(1.0, 16.0),
        hide_status: cli.clean || cfg.clean.unwrap_or(false),
        color_quant: cfg.color_quant.unwrap_or(0),
        console: !cli.no_console && cfg.console.unwrap_or(true),
    };
    let options = RendererOptions {
        class: cli.class.clone().or(cfg.class),
        waves: cfg.waves.unwrap_or_else(|| scene::wave::WaveProfile::STANDARD.to_vec()),
        backdrop: cli.backdrop || cfg.backdrop.unwrap_or(false),
        fps,
    };
    (settings, options, cfg.shell)
}

const RENDER_MODES: [RenderMode; 3] = [RenderMode::HalfBlock, RenderMode::Braille, RenderMode::Ascii];
const COLOR_MODES: [ColorMode; 4] = [ColorMode::TrueColor, ColorMode::Ansi256, ColorMode::Ansi16, ColorMode::Mono];

fn build_canvas(cols: u16, rows: u16, s: &Settings) -> Canvas {
    let display_rows = if s.hide_status { rows as usize } else { (rows as usize).saturating_sub(1) };
    let mut canvas = Canvas::new(cols as usize, display_rows, s.render_mode, s.color_mode);
    canvas.color_quant = s.color_quant;
    canvas
}

fn viewport_of(canvas: &Canvas, pixel_scale: f64) -> Viewport {
    Viewport::new(canvas.width as f64 * pixel_scale, canvas.height as f64 * pixel_scale)
}

fn fits(cols: u16, rows: u16) -> bool {
    cols >= MIN_COLS && rows >= MIN_ROWS
}

fn run_loop(
    stdout: &mut BufWriter<io::Stdout>,
    mut s: Settings,
    options: RendererOptions,
    shell: ShellConfig,
) -> Result<()> {
    let (mut cols, mut rows) = terminal::size()?;
    let mut canvas = build_canvas(cols, rows, &s);
    let mut host = TerminalHost::new(viewport_of(&canvas, s.pixel_scale), fits(cols, rows));

    let mut renderer = WaveRenderer::new(options);
    if !renderer.mount(&mut host) {
        return Err(AppError::TerminalTooSmall {
            cols,
            rows,
            min_cols: MIN_COLS,
            min_rows: MIN_ROWS,
        });
    }
    let mut console = s.console.then(|| Console::new(shell));

    let start = Instant::now();
    let mut frame_count: u64 = 0;
    let mut actual_fps: f64 = 0.0;
    let mut fps_update = Instant::now();

    // Track if we need to rebuild canvas
    let mut rebuild_canvas = false;

    loop {
        let frame_start = Instant::now();

        // Handle input (non-blocking)
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Resize(w, h) => {
                    if fits(w, h) {
                        cols = w;
                        rows = h;
                        rebuild_canvas = true;
                    }
                }
                Event::Key(key) => {
                    if let Some(c) = console.as_mut()
                        && c.handle_key(key, start.elapsed())
                    {
                        continue;
                    }
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            renderer.unmount(&mut host);
                            return Ok(());
                        }
                        // Cycle render mode
                        KeyCode::Char('r') => {
                            let idx = RENDER_MODES.iter().position(|&m| m == s.render_mode).unwrap_or(0);
                            s.render_mode = RENDER_MODES[(idx + 1) % RENDER_MODES.len()];
                            if let Some(c) = console.as_mut() {
                                c.system(format!("Render mode switched to {:?}", s.render_mode));
                            }
                            rebuild_canvas = true;
                        }
                        // Cycle color mode
                        KeyCode::Char('c') => {
                            let idx = COLOR_MODES.iter().position(|&m| m == s.color_mode).unwrap_or(0);
                            s.color_mode = COLOR_MODES[(idx + 1) % COLOR_MODES.len()];
                            if let Some(c) = console.as_mut() {
                                c.system(format!("Color mode switched to {:?}", s.color_mode));
                            }
                            rebuild_canvas = true;
                        }
                        // Toggle status bar
                        KeyCode::Char('h') => {
                            s.hide_status = !s.hide_status;
                            rebuild_canvas = true;
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Rebuild canvas if mode changed or terminal resized
        if rebuild_canvas {
            // Re-read size to get the settled value
            let (settled_cols, settled_rows) = terminal::size()?;
            if fits(settled_cols, settled_rows) {
                cols = settled_cols;
                rows = settled_rows;
            }
            canvas = build_canvas(cols, rows, &s);
            let viewport = viewport_of(&canvas, s.pixel_scale);
            host.set_available(fits(cols, rows));
            for listener in host.resize(viewport) {
                renderer.on_resize(listener, viewport);
            }
            if let Some(c) = console.as_mut() {
                c.system(format!("Viewport resized to {}x{}", cols, rows));
            }
            // Reset terminal state completely
            write!(stdout, "\x1b[2J\x1b[H")?;
            stdout.flush()?;
            rebuild_canvas = false;
        }

        if let Some(c) = console.as_mut() {
            c.tick(start.elapsed());
        }

        // Deliver the frames requested since the last iteration
        let mut drew = false;
        for handle in host.take_frames() {
            let mut painter = Painter::new(&mut canvas, s.pixel_scale);
            drew |= renderer.on_frame(handle, &mut host, &mut painter);
        }
        if !drew {
            std::thread::sleep(s.frame_dur);
            continue;
        }
        let frame = canvas.render();

        // Skip this frame if the terminal changed size under us
        let (check_cols, check_rows) = terminal::size()?;
        if check_cols != cols || check_rows != rows {
            rebuild_canvas = fits(check_cols, check_rows);
            if rebuild_canvas {
                cols = check_cols;
                rows = check_rows;
            }
            std::thread::sleep(Duration::from_millis(50));
            continue;
        }

        // Build entire frame into buffer before flushing
        stdout.write_all(b"\x1b[H")?;
        stdout.write_all(frame.as_bytes())?;

        let status_row = rows as usize;
        let overlay_bottom = if s.hide_status { status_row } else { status_row.saturating_sub(1) };
        if let Some(c) = console.as_ref() {
            stdout.write_all(c.render_overlay(cols as usize, overlay_bottom, &canvas).as_bytes())?;
        }

        // Status bar
        frame_count += 1;
        if fps_update.elapsed() >= Duration::from_secs(1) {
            actual_fps = frame_count as f64 / fps_update.elapsed().as_secs_f64();
            frame_count = 0;
            fps_update = Instant::now();
        }
        if !s.hide_status {
            let tag = renderer.surface().class().map(|c| format!(" [{}]", c)).unwrap_or_default();
            let status = format!(
                " tidemark{} | {:?} | {:?} | {:.0} fps | t={} | [tab] console  [:] type  [r] render  [c] color  [h] hide  [q] quit ",
                tag,
                s.render_mode,
                s.color_mode,
                actual_fps,
                renderer.ticks().unwrap_or(0),
            );
            let w = cols as usize;
            let truncated: String = status.chars().take(w).collect();
            let padded = format!("{:<width$}", truncated, width = w);
            write!(stdout, "\x1b[{};1H\x1b[7m{}\x1b[0m", status_row, padded)?;
        }

        // Single flush per frame
        stdout.flush()?;

        // Sleep to target FPS
        let elapsed = frame_start.elapsed();
        if elapsed < s.frame_dur {
            std::thread::sleep(s.frame_dur - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("tidemark").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_without_config() {
        let (s, o, _) = resolve(&cli(&[]), Config::default());
        assert_eq!(s.render_mode, RenderMode::HalfBlock);
        assert_eq!(s.color_mode, ColorMode::TrueColor);
        assert_eq!(s.pixel_scale, 5.0);
        assert!(s.console);
        assert_eq!(o.fps, 30);
        assert_eq!(o.waves.len(), 3);
        assert!(!o.backdrop);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cfg = Config {
            fps: Some(12),
            pixel_scale: Some(3.0),
            class: Some("from-config".into()),
            ..Config::default()
        };
        let (s, o, _) = resolve(&cli(&["--fps", "500", "--class", "from-cli", "-r", "braille"]), cfg);
        assert_eq!(o.fps, 120);
        assert_eq!(s.pixel_scale, 3.0);
        assert_eq!(s.render_mode, RenderMode::Braille);
        assert_eq!(o.class.as_deref(), Some("from-cli"));
    }

    #[test]
    fn test_non_finite_pixel_scale_falls_back() {
        let (s, _, _) = resolve(&cli(&["-s", "NaN"]), Config::default());
        assert_eq!(s.pixel_scale, 5.0);

        let cfg = Config {
            pixel_scale: Some(f64::INFINITY),
            ..Config::default()
        };
        let (s, _, _) = resolve(&cli(&[]), cfg);
        assert_eq!(s.pixel_scale, 5.0);

        let cfg = Config {
            pixel_scale: Some(3.0),
            ..Config::default()
        };
        let (s, _, _) = resolve(&cli(&["-s", "NaN"]), cfg);
        assert_eq!(s.pixel_scale, 3.0);
    }

    #[test]
    fn test_scene_mounts_with_sanitized_scale() {
        let (s, o, _) = resolve(&cli(&["-s", "NaN"]), Config::default());
        let canvas = build_canvas(80, 24, &s);
        let mut host = TerminalHost::new(viewport_of(&canvas, s.pixel_scale), fits(80, 24));
        let mut renderer = WaveRenderer::new(o);
        assert!(renderer.mount(&mut host));
    }

    #[test]
    fn test_viewport_scales_canvas() {
        let canvas = Canvas::new(80, 24, RenderMode::HalfBlock, ColorMode::Mono);
        assert_eq!(viewport_of(&canvas, 5.0), Viewport::new(400.0, 240.0));
    }

    #[test]
    fn test_status_row_reserved() {
        let s = Settings {
            render_mode: RenderMode::HalfBlock,
            color_mode: ColorMode::Mono,
            frame_dur: Duration::from_millis(33),
            pixel_scale: 5.0,
            hide_status: false,
            color_quant: 0,
            console: false,
        };
        let canvas = build_canvas(80, 24, &s);
        assert_eq!(canvas.term_size(), (80, 23));
    }
}
