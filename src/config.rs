use anyhow::{Context, Result};
use log::info;
use serde::{Serialize, Deserialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::core::note::NoteNaming;
use crate::core::oscillator::Waveform;

pub const MIN_VOLUME: f32 = 0.0;
pub const MAX_VOLUME: f32 = 1.0;

/// Harmonic content of the custom waveform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonicConfig {
    pub sine: Vec<f32>,
    /// Missing cosine terms mean all zero, as many as there are sine terms
    pub cosine: Option<Vec<f32>>,
}

impl HarmonicConfig {
    pub fn sine_terms(&self) -> &[f32] {
        &self.sine
    }

    pub fn cosine_terms(&self) -> Vec<f32> {
        self.cosine.clone().unwrap_or_else(|| vec![0.0; self.sine.len()])
    }
}

impl Default for HarmonicConfig {
    fn default() -> Self {
        Self {
            sine: vec![0.0, 0.0, 1.0, 0.0, 1.0],
            cosine: None,
        }
    }
}

/// Start-up settings. Read once, never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PianoConfig {
    pub volume: f32,
    pub waveform: Waveform,
    pub custom_waveform: HarmonicConfig,
    pub note_names: NoteNaming,
}

impl Default for PianoConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            waveform: Waveform::Sine,
            custom_waveform: HarmonicConfig::default(),
            note_names: NoteNaming::default(),
        }
    }
}

impl PianoConfig {
    /// Load from the user config directory, falling back to defaults when
    /// no file exists
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Self = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config.sanitized())
    }

    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("virtual-piano");
        path.push("config.json");
        Some(path)
    }

    fn sanitized(mut self) -> Self {
        self.volume = clamp_volume(self.volume);
        self
    }
}

pub fn clamp_volume(level: f32) -> f32 {
    if level.is_nan() {
        return MIN_VOLUME;
    }
    level.clamp(MIN_VOLUME, MAX_VOLUME)
}
