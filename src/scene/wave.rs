use std::f64::consts::FRAC_PI_3;

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Per-wave configuration before it is anchored to a surface height.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WaveProfile {
    /// Peak displacement in pixels
    pub amplitude: f64,
    /// Radians per pixel
    pub frequency: f64,
    /// Radians per tick
    pub speed: f64,
    /// Resting line as a fraction of surface height
    pub baseline: f64,
}

impl WaveProfile {
    /// The three-layer field used when nothing is configured.
    pub const STANDARD: [WaveProfile; 3] = [
        WaveProfile { amplitude: 30.0, frequency: 0.02, speed: 0.05, baseline: 0.70 },
        WaveProfile { amplitude: 20.0, frequency: 0.015, speed: 0.03, baseline: 0.75 },
        WaveProfile { amplitude: 15.0, frequency: 0.01, speed: 0.02, baseline: 0.80 },
    ];

    /// Check a profile list: non-empty, finite, non-negative amplitude and
    /// frequency, and strictly increasing baselines.
    pub fn validate(profiles: &[WaveProfile]) -> Result<()> {
        if profiles.is_empty() {
            return Err(AppError::InvalidWaves("at least one wave is required".into()));
        }
        for (i, p) in profiles.iter().enumerate() {
            let finite = [p.amplitude, p.frequency, p.speed, p.baseline]
                .iter()
                .all(|v| v.is_finite());
            if !finite {
                return Err(AppError::InvalidWaves(format!("wave {} has a non-finite value", i)));
            }
            if p.amplitude < 0.0 || p.frequency < 0.0 {
                return Err(AppError::InvalidWaves(format!(
                    "wave {}: amplitude and frequency must be non-negative",
                    i
                )));
            }
        }
        if let Some(i) = profiles.windows(2).position(|w| w[1].baseline <= w[0].baseline) {
            return Err(AppError::InvalidWaves(format!(
                "baseline of wave {} must be below wave {}",
                i + 1,
                i
            )));
        }
        Ok(())
    }
}

/// One sinusoidal wave anchored to a pixel baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSpec {
    pub amplitude: f64,
    pub frequency: f64,
    pub speed: f64,
    /// Pixels from the top of the surface
    pub baseline: f64,
}

impl WaveSpec {
    /// Vertical position of this wave at `x` when it sits at `index` in its field.
    #[inline]
    pub fn height_at(&self, index: usize, x: f64, time: f64) -> f64 {
        self.baseline
            + self.amplitude * (x * self.frequency + time * self.speed + phase_stagger(index)).sin()
    }
}

/// Fixed phase offset that keeps sibling waves out of lockstep.
#[inline]
pub fn phase_stagger(index: usize) -> f64 {
    index as f64 * FRAC_PI_3
}

/// The ordered set of waves, back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveField {
    waves: Vec<WaveSpec>,
}

impl WaveField {
    /// Anchor each profile's baseline fraction to `surface_height`. The
    /// resulting pixel baselines are kept as-is when the surface later resizes.
    pub fn anchored(profiles: &[WaveProfile], surface_height: f64) -> Self {
        let waves = profiles
            .iter()
            .map(|p| WaveSpec {
                amplitude: p.amplitude,
                frequency: p.frequency,
                speed: p.speed,
                baseline: surface_height * p.baseline,
            })
            .collect();
        WaveField { waves }
    }

    #[cfg(test)]
    pub fn standard(surface_height: f64) -> Self {
        WaveField::anchored(&WaveProfile::STANDARD, surface_height)
    }

    #[cfg(test)]
    pub fn height(&self, index: usize, x: f64, time: f64) -> Option<f64> {
        self.waves.get(index).map(|w| w.height_at(index, x, time))
    }

    pub fn front(&self) -> Option<&WaveSpec> {
        self.waves.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WaveSpec> {
        self.waves.iter()
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }
}

/// Tick counter shared by every moving part of the scene. Advances by one
/// per delivered frame, so motion speed follows the frame rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeCounter {
    ticks: u64,
}

impl TimeCounter {
    pub const STEP: u64 = 1;

    pub fn new() -> Self {
        TimeCounter::default()
    }

    pub fn advance(&mut self) {
        self.ticks = self.ticks.saturating_add(Self::STEP);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn time(&self) -> f64 {
        self.ticks as f64
    }
}
