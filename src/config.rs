use crate::error::{AppError, Result};
use crate::render::{ColorMode, RenderMode};
use crate::scene::wave::WaveProfile;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// User configuration loaded from config file.
/// All fields are optional. CLI flags override config, config overrides defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default render mode
    pub render: Option<RenderModeConfig>,
    /// Default color mode
    pub color: Option<ColorModeConfig>,
    /// Target FPS (1-120)
    pub fps: Option<u32>,
    /// Logical pixels per canvas pixel (1-16)
    pub pixel_scale: Option<f64>,
    /// Hide status bar
    pub clean: Option<bool>,
    /// Color quantization step (0 = off, 4/8/16 = coarser colors for less output)
    pub color_quant: Option<u8>,
    /// Style tag carried on the drawing surface
    pub class: Option<String>,
    /// Write log output to this file
    pub log_file: Option<PathBuf>,
    /// Paint floating markers and the binary stream behind the waves
    pub backdrop: Option<bool>,
    /// Show the system-log console overlay
    pub console: Option<bool>,
    /// Wave layers, back to front. Replaces the default three.
    pub waves: Option<Vec<WaveProfile>>,
    /// Console command responses
    pub shell: ShellConfig,
}

/// Lines printed by the console's `about`, `skills` and `contact` commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub about: Vec<String>,
    pub skills: Vec<String>,
    pub contact: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            about: vec!["tidemark | a small boat on a terminal sea.".into()],
            skills: vec!["Stack: Rust, crossterm, clap, serde, toml.".into()],
            contact: vec!["Set [shell] contact lines in config.toml.".into()],
        }
    }
}

/// Render mode names for config file (kebab-case friendly)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderModeConfig {
    Braille,
    HalfBlock,
    Ascii,
}

impl From<RenderModeConfig> for RenderMode {
    fn from(c: RenderModeConfig) -> Self {
        match c {
            RenderModeConfig::Braille => RenderMode::Braille,
            RenderModeConfig::HalfBlock => RenderMode::HalfBlock,
            RenderModeConfig::Ascii => RenderMode::Ascii,
        }
    }
}

/// Color mode names for config file (kebab-case friendly)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorModeConfig {
    Mono,
    Ansi16,
    Ansi256,
    TrueColor,
}

impl From<ColorModeConfig> for ColorMode {
    fn from(c: ColorModeConfig) -> Self {
        match c {
            ColorModeConfig::Mono => ColorMode::Mono,
            ColorModeConfig::Ansi16 => ColorMode::Ansi16,
            ColorModeConfig::Ansi256 => ColorMode::Ansi256,
            ColorModeConfig::TrueColor => ColorMode::TrueColor,
        }
    }
}

impl Config {
    /// Parse config text. Wave profiles are validated here so a bad
    /// `[[waves]]` table is reported instead of silently ignored.
    pub fn parse(path: &Path, contents: &str) -> Result<Config> {
        let config: Config = toml::from_str(contents).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(waves) = &config.waves {
            WaveProfile::validate(waves)?;
        }
        Ok(config)
    }
}

/// Get the config file path: ~/.config/tidemark/config.toml
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tidemark").join("config.toml"))
}

/// Result of reading the config file, kept for logging once the logger is up.
#[derive(Debug, Default)]
pub struct Loaded {
    pub config: Config,
    /// The file the config came from, if one was read
    pub source: Option<PathBuf>,
    /// Parse failure that fell back to defaults
    pub warning: Option<AppError>,
}

/// Load config from file. Returns default config if the file doesn't exist
/// or doesn't parse; invalid wave profiles are an error.
pub fn load_config() -> Result<Loaded> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Loaded::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Loaded> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Ok(Loaded::default());
    };
    match Config::parse(path, &contents) {
        Ok(config) => Ok(Loaded {
            config,
            source: Some(path.to_path_buf()),
            warning: None,
        }),
        Err(e @ AppError::InvalidWaves(_)) => Err(e),
        Err(e) => Ok(Loaded {
            warning: Some(e),
            ..Loaded::default()
        }),
    }
}

/// Write the commented default config. Refuses to overwrite an existing file.
pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists", path.display()),
        )));
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, default_config_string())?;
    Ok(())
}

/// Generate a default config file with all options commented out
pub fn default_config_string() -> String {
    r#"# tidemark configuration
# Use --show-config to see the active config file path.
# CLI flags override these settings.

# Default render mode: braille, half-block, ascii
# render = "braille"

# Default color mode: mono, ansi16, ansi256, true-color
# color = "true-color"

# Target FPS (1-120). Motion advances one tick per frame.
# fps = 30

# Logical pixels per canvas pixel (1-16). Larger = bigger boat and waves.
# pixel_scale = 5.0

# Hide status bar
# clean = false

# Color quantization step (0 = off, 4/8/16 = coarser colors, less output)
# color_quant = 0

# Style tag shown in the status bar
# class = "hero-water"

# Write logs here (RUST_LOG selects the level, default info)
# log_file = "/tmp/tidemark.log"

# Floating markers and binary stream behind the waves
# backdrop = true

# System-log console overlay
# console = true

# Wave layers, back to front. Baselines are fractions of the initial height
# and must increase from one wave to the next.
# [[waves]]
# amplitude = 30.0
# frequency = 0.02
# speed = 0.05
# baseline = 0.70
#
# [[waves]]
# amplitude = 20.0
# frequency = 0.015
# speed = 0.03
# baseline = 0.75

# Console command responses
# [shell]
# about = ["Your Name | What you do."]
# skills = ["Stack: ..."]
# contact = ["Email: you@example.com"]
"#
    .to_string()
}
