//! In-memory [`AudioOutput`] for tests

use std::collections::BTreeMap;

use super::{AudioOutput, OscillatorId};
use crate::core::oscillator::OscillatorShape;

#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub gain: f32,
    pub running: BTreeMap<OscillatorId, (OscillatorShape, f32)>,
    pub started: usize,
    pub stopped: Vec<OscillatorId>,
    next_id: u64,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioOutput for RecordingOutput {
    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn gain(&self) -> f32 {
        self.gain
    }

    fn start_oscillator(&mut self, shape: OscillatorShape, frequency: f32) -> OscillatorId {
        self.next_id += 1;
        let id = OscillatorId(self.next_id);
        self.running.insert(id, (shape, frequency));
        self.started += 1;
        id
    }

    fn stop_oscillator(&mut self, id: OscillatorId) {
        if self.running.remove(&id).is_some() {
            self.stopped.push(id);
        }
    }
}
