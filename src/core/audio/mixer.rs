use cpal::{FromSample, Sample};
use crossbeam_channel::Receiver;

use super::OscillatorId;
use crate::core::note::KEY_COUNT;
use crate::core::oscillator::{OscillatorShape, ToneGenerator};

/// Commands sent from the UI thread to the audio callback
#[derive(Debug, Clone)]
pub enum MixerCommand {
    Start { id: OscillatorId, shape: OscillatorShape, frequency: f32 },
    Stop(OscillatorId),
    SetGain(f32),
}

/// Audio-thread side of the output: sums every running generator through
/// the shared gain stage
pub struct Mixer {
    sample_rate: f32,
    gain: f32,
    generators: Vec<(OscillatorId, ToneGenerator)>,
    commands: Receiver<MixerCommand>,
}

impl Mixer {
    pub fn new(sample_rate: f32, gain: f32, commands: Receiver<MixerCommand>) -> Self {
        Self {
            sample_rate,
            gain,
            // One slot per key so starting a voice never allocates on the audio thread
            generators: Vec::with_capacity(KEY_COUNT),
            commands,
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn active_count(&self) -> usize {
        self.generators.len()
    }

    /// Apply every pending command without blocking
    pub fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: MixerCommand) {
        match command {
            MixerCommand::Start { id, shape, frequency } => {
                let generator = ToneGenerator::new(shape, frequency, self.sample_rate);
                self.generators.push((id, generator));
            },
            MixerCommand::Stop(id) => {
                self.generators.retain(|(running, _)| *running != id);
            },
            MixerCommand::SetGain(gain) => {
                self.gain = gain;
            },
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.generators.is_empty() {
            return 0.0;
        }

        let sum: f32 = self.generators
            .iter_mut()
            .map(|(_, generator)| generator.next_sample())
            .sum();

        (sum * self.gain).clamp(-1.0, 1.0)
    }

    /// Fill an interleaved buffer, writing the same value to every channel
    pub fn render<T>(&mut self, data: &mut [T], channels: usize)
    where
        T: Sample + FromSample<f32>,
    {
        self.drain_commands();
        for frame in data.chunks_mut(channels.max(1)) {
            let value = T::from_sample(self.next_sample());
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
    }
}
