mod periodic;
mod waveform;

pub use self::periodic::{PeriodicWave, WaveformError, PERIODIC_TABLE_SIZE};
pub use self::waveform::{OscillatorShape, Waveform};

/// Phase-accumulating tone generator for one voice
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    shape: OscillatorShape,
    phase: f32,
    phase_increment: f32,
}

impl ToneGenerator {
    pub fn new(shape: OscillatorShape, frequency: f32, sample_rate: f32) -> Self {
        Self {
            shape,
            phase: 0.0,
            phase_increment: frequency / sample_rate,
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let value = self.shape.sample(self.phase);
        self.phase = (self.phase + self.phase_increment) % 1.0;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_wraps_once_per_cycle() {
        // 4 samples per cycle at 100 Hz / 400 Hz
        let mut generator = ToneGenerator::new(OscillatorShape::Square, 100.0, 400.0);
        let cycle: Vec<f32> = (0..8).map(|_| generator.next_sample()).collect();
        assert_eq!(cycle, vec![1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0]);
    }
}
