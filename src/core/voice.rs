use anyhow::{Context, Result};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{clamp_volume, PianoConfig};
use crate::core::audio::{AudioOutput, OscillatorId};
use crate::core::note::NoteKey;
use crate::core::oscillator::{OscillatorShape, PeriodicWave, Waveform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Idle,
    Sounding,
}

/// One sounding oscillator, owned by the registry slot of its key
#[derive(Debug)]
pub struct Voice {
    pub oscillator: OscillatorId,
    pub waveform: Waveform,
    pub frequency: f32,
    pub state: VoiceState,
}

impl Voice {
    fn stop<O: AudioOutput>(&mut self, output: &mut O) {
        if self.state == VoiceState::Running {
            output.stop_oscillator(self.oscillator);
            self.state = VoiceState::Stopped;
        }
    }
}

/// Starts a voice when a key goes down and stops it when the key comes up,
/// keeping at most one voice per key. All voices share the output's gain.
pub struct ToneVoiceManager<O: AudioOutput> {
    output: O,
    custom_wave: Arc<PeriodicWave>,
    waveform: Waveform,
    voices: HashMap<NoteKey, Voice>,
}

impl<O: AudioOutput> ToneVoiceManager<O> {
    pub fn new(mut output: O, config: &PianoConfig) -> Result<Self> {
        let harmonics = &config.custom_waveform;
        let custom_wave = PeriodicWave::new(&harmonics.cosine_terms(), harmonics.sine_terms())
            .context("Invalid custom waveform harmonics")?;

        output.set_gain(clamp_volume(config.volume));

        Ok(Self {
            output,
            custom_wave: Arc::new(custom_wave),
            waveform: config.waveform,
            voices: HashMap::new(),
        })
    }

    /// Start a voice for `key`. Pressing a key that is already sounding does nothing.
    pub fn press(&mut self, key: NoteKey, frequency: f32) {
        if self.voices.contains_key(&key) {
            return;
        }

        let shape = self.shape_for(self.waveform);
        let oscillator = self.output.start_oscillator(shape, frequency);
        debug!("Press {:?} at {:.2} Hz ({})", key, frequency, self.waveform);

        self.voices.insert(key, Voice {
            oscillator,
            waveform: self.waveform,
            frequency,
            state: VoiceState::Running,
        });
    }

    /// Stop and forget the voice for `key`, if there is one
    pub fn release(&mut self, key: NoteKey) {
        if let Some(mut voice) = self.voices.remove(&key) {
            voice.stop(&mut self.output);
            debug!("Release {:?}", key);
        }
    }

    pub fn release_all(&mut self) {
        for (_, mut voice) in self.voices.drain() {
            voice.stop(&mut self.output);
        }
    }

    pub fn set_volume(&mut self, level: f32) {
        self.output.set_gain(clamp_volume(level));
    }

    pub fn volume(&self) -> f32 {
        self.output.gain()
    }

    /// Waveform used by the next press; sounding voices keep theirs
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn shape_for(&self, waveform: Waveform) -> OscillatorShape {
        waveform.to_shape(&self.custom_wave)
    }

    pub fn custom_wave(&self) -> &Arc<PeriodicWave> {
        &self.custom_wave
    }

    pub fn key_state(&self, key: NoteKey) -> KeyState {
        if self.voices.contains_key(&key) {
            KeyState::Sounding
        } else {
            KeyState::Idle
        }
    }

    pub fn is_sounding(&self, key: NoteKey) -> bool {
        self.key_state(key) == KeyState::Sounding
    }

    pub fn voice(&self, key: NoteKey) -> Option<&Voice> {
        self.voices.get(&key)
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<O: AudioOutput> Drop for ToneVoiceManager<O> {
    fn drop(&mut self) {
        self.release_all();
    }
}
