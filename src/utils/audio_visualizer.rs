// Waveform previews for the control panel

use crate::core::oscillator::OscillatorShape;

/// Sample one cycle of `shape` as `[phase, value]` plot points
pub fn generate_waveform_preview(shape: &OscillatorShape, samples: usize) -> Vec<[f32; 2]> {
    (0..samples)
        .map(|i| {
            let phase = i as f32 / samples as f32;
            [phase, shape.sample(phase)]
        })
        .collect()
}
