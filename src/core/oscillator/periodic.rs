use std::f32::consts::PI;
use thiserror::Error;

/// Samples in one rendered cycle
pub const PERIODIC_TABLE_SIZE: usize = 2048;

#[derive(Debug, Error, PartialEq)]
pub enum WaveformError {
    #[error("harmonic arrays differ in length: {real} cosine terms, {imag} sine terms")]
    LengthMismatch { real: usize, imag: usize },

    #[error("at least two harmonic terms are required, got {0}")]
    TooShort(usize),
}

/// Custom waveform described by its harmonic content.
///
/// `real[k]` and `imag[k]` are the cosine and sine amplitudes of harmonic `k`.
/// Index 0 would be a DC offset and is ignored. The rendered cycle is
/// normalised so its peak amplitude is 1.
#[derive(Debug, Clone)]
pub struct PeriodicWave {
    real: Vec<f32>,
    imag: Vec<f32>,
    table: Vec<f32>,
}

impl PeriodicWave {
    pub fn new(real: &[f32], imag: &[f32]) -> Result<Self, WaveformError> {
        if real.len() != imag.len() {
            return Err(WaveformError::LengthMismatch { real: real.len(), imag: imag.len() });
        }
        if real.len() < 2 {
            return Err(WaveformError::TooShort(real.len()));
        }

        let mut table: Vec<f32> = (0..PERIODIC_TABLE_SIZE)
            .map(|i| {
                let phase = 2.0 * PI * i as f32 / PERIODIC_TABLE_SIZE as f32;
                real.iter()
                    .zip(imag)
                    .enumerate()
                    .skip(1)
                    .map(|(k, (a, b))| {
                        let angle = phase * k as f32;
                        a * angle.cos() + b * angle.sin()
                    })
                    .sum()
            })
            .collect();

        let peak = table.iter().fold(0.0f32, |max, &s| max.max(s.abs()));
        if peak > 0.0 {
            for sample in table.iter_mut() {
                *sample /= peak;
            }
        }

        Ok(Self {
            real: real.to_vec(),
            imag: imag.to_vec(),
            table,
        })
    }

    /// Cosine-phase coefficients
    pub fn real(&self) -> &[f32] {
        &self.real
    }

    /// Sine-phase coefficients
    pub fn imag(&self) -> &[f32] {
        &self.imag
    }

    pub fn sample(&self, phase: f32) -> f32 {
        let len = self.table.len();
        let position = phase.rem_euclid(1.0) * len as f32;
        let index = position.floor() as usize % len;
        let next_index = (index + 1) % len;
        let fraction = position - position.floor();

        self.table[index] * (1.0 - fraction) + self.table[next_index] * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_mismatched_lengths() {
        let err = PeriodicWave::new(&[0.0; 3], &[0.0; 5]).unwrap_err();
        assert_eq!(err, WaveformError::LengthMismatch { real: 3, imag: 5 });
    }

    #[test]
    fn test_rejects_single_term() {
        assert_eq!(PeriodicWave::new(&[0.0], &[1.0]).unwrap_err(), WaveformError::TooShort(1));
    }

    #[test]
    fn test_fundamental_sine_matches_sine() {
        let wave = PeriodicWave::new(&[0.0, 0.0], &[0.0, 1.0]).unwrap();
        for i in 0..16 {
            let phase = i as f32 / 16.0;
            assert!((wave.sample(phase) - (2.0 * PI * phase).sin()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_normalised_peak() {
        let wave = PeriodicWave::new(&[0.0; 5], &[0.0, 0.0, 1.0, 0.0, 1.0]).unwrap();
        let peak = (0..PERIODIC_TABLE_SIZE)
            .map(|i| wave.sample(i as f32 / PERIODIC_TABLE_SIZE as f32).abs())
            .fold(0.0f32, f32::max);
        assert!((peak - 1.0).abs() < 1e-4);
        assert_eq!(wave.imag(), &[0.0, 0.0, 1.0, 0.0, 1.0]);
        assert!(wave.real().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_dc_term_ignored() {
        let wave = PeriodicWave::new(&[5.0, 0.0], &[0.0, 0.0]).unwrap();
        assert_eq!(wave.sample(0.3), 0.0);
    }
}
