use serde::{Serialize, Deserialize};
use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

use super::periodic::PeriodicWave;

/// Waveform choices offered by the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Custom, // Uses the harmonic descriptor from the configuration
}

impl Waveform {
    pub const ALL: [Waveform; 5] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
        Waveform::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Square => "Square",
            Waveform::Sawtooth => "Sawtooth",
            Waveform::Triangle => "Triangle",
            Waveform::Custom => "Custom",
        }
    }

    /// Resolve the selector value into something an oscillator can play
    pub fn to_shape(self, custom: &Arc<PeriodicWave>) -> OscillatorShape {
        match self {
            Waveform::Sine => OscillatorShape::Sine,
            Waveform::Square => OscillatorShape::Square,
            Waveform::Sawtooth => OscillatorShape::Sawtooth,
            Waveform::Triangle => OscillatorShape::Triangle,
            Waveform::Custom => OscillatorShape::Periodic(Arc::clone(custom)),
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shape of a running oscillator
#[derive(Debug, Clone)]
pub enum OscillatorShape {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Periodic(Arc<PeriodicWave>),
}

impl OscillatorShape {
    /// Sample one cycle at `phase` in [0, 1)
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            OscillatorShape::Sine => (2.0 * PI * phase).sin(),
            OscillatorShape::Square => if phase < 0.5 { 1.0 } else { -1.0 },
            OscillatorShape::Sawtooth => 2.0 * phase - 1.0,
            OscillatorShape::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    -4.0 + 4.0 * phase
                }
            },
            OscillatorShape::Periodic(wave) => wave.sample(phase),
        }
    }

    pub fn is_periodic(&self) -> bool {
        matches!(self, OscillatorShape::Periodic(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_shapes() {
        assert!(OscillatorShape::Sine.sample(0.0).abs() < 1e-6);
        assert!((OscillatorShape::Sine.sample(0.25) - 1.0).abs() < 1e-6);
        assert_eq!(OscillatorShape::Square.sample(0.1), 1.0);
        assert_eq!(OscillatorShape::Square.sample(0.6), -1.0);
        assert_eq!(OscillatorShape::Sawtooth.sample(0.0), -1.0);
        assert!((OscillatorShape::Triangle.sample(0.25) - 1.0).abs() < 1e-6);
        assert!((OscillatorShape::Triangle.sample(0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_custom_resolves_to_periodic() {
        let custom = Arc::new(PeriodicWave::new(&[0.0, 0.0], &[0.0, 1.0]).unwrap());
        assert!(Waveform::Custom.to_shape(&custom).is_periodic());
        for waveform in &Waveform::ALL[..4] {
            assert!(!waveform.to_shape(&custom).is_periodic());
        }
    }

    #[test]
    fn test_waveform_config_names() {
        let parsed: Waveform = serde_json::from_str("\"sawtooth\"").unwrap();
        assert_eq!(parsed, Waveform::Sawtooth);
        assert_eq!(serde_json::to_string(&Waveform::Custom).unwrap(), "\"custom\"");
    }
}
