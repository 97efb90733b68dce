//! Audio output boundary and its cpal-backed implementation

mod mixer;
mod output;
#[cfg(test)]
pub mod recording;

pub use self::mixer::{Mixer, MixerCommand};
pub use self::output::CpalOutput;

use crate::core::oscillator::OscillatorShape;

/// Handle of a tone generator started on an [`AudioOutput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OscillatorId(pub u64);

/// A sink with one shared gain stage that tone generators are wired into
pub trait AudioOutput {
    /// Set the gain applied to every oscillator, current and future
    fn set_gain(&mut self, gain: f32);

    fn gain(&self) -> f32;

    /// Start a generator immediately and connect it to the gain stage
    fn start_oscillator(&mut self, shape: OscillatorShape, frequency: f32) -> OscillatorId;

    /// Stop a generator. Unknown ids are ignored.
    fn stop_oscillator(&mut self, id: OscillatorId);
}
